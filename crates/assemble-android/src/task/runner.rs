//! Tool runners do the actual work of tool backed tasks, such as compilers and shrinkers.

use crate::exception::{BuildError, BuildResult};
use log::{debug, info};
use std::fmt::{Debug, Formatter};
use std::process::Command;
use std::sync::Arc;

/// Runs the tool that backs a task of type `T`.
pub trait ToolRunner<T>: Send + Sync {
    fn run(&self, task: &T) -> BuildResult;
}

assert_obj_safe!(ToolRunner<()>);

impl<T, F> ToolRunner<T> for F
where
    F: Fn(&T) -> BuildResult + Send + Sync,
{
    fn run(&self, task: &T) -> BuildResult {
        (self)(task)
    }
}

/// A shared, optional tool runner held by a task.
pub struct Runner<T>(Option<Arc<dyn ToolRunner<T>>>);

impl<T> Runner<T> {
    pub fn new<R: ToolRunner<T> + 'static>(runner: R) -> Self {
        Self(Some(Arc::new(runner)))
    }

    pub fn from_shared(runner: Arc<dyn ToolRunner<T>>) -> Self {
        Self(Some(runner))
    }

    pub fn is_set(&self) -> bool {
        self.0.is_some()
    }

    /// Runs the tool. A task without a tool does nothing.
    pub fn run(&self, name: &str, task: &T) -> BuildResult {
        match &self.0 {
            Some(runner) => runner.run(task),
            None => {
                debug!("no tool configured for {}", name);
                Ok(())
            }
        }
    }
}

impl<T> Default for Runner<T> {
    fn default() -> Self {
        Self(None)
    }
}

impl<T> Clone for Runner<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> Debug for Runner<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.0.is_some() {
            write!(f, "Runner(<tool>)")
        } else {
            write!(f, "Runner(<none>)")
        }
    }
}

/// Runs a command to completion, failing if it exits unsuccessfully.
pub fn run_command(mut command: Command) -> BuildResult {
    info!("running {:?}", command);
    let status = command.status()?;
    if status.success() {
        Ok(())
    } else {
        Err(BuildError::new(format!("{:?} exited with {}", command.get_program(), status)).into())
    }
}
