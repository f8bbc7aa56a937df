//! Tasks are the unit of work of a project.
//!
//! A task type implements [`Task`], which provides its main action. Instances live inside an
//! [`Executable`], which adds the task's identity, its dependencies and the extra actions that
//! run before and after the main action. The project hands out [`TaskHandle`]s to executables.

use crate::exception::BuildResult;
use crate::project::Project;
use std::fmt::Debug;

pub mod executable;
pub mod execution;
pub mod runner;
pub mod task_container;

pub use executable::{Action, Executable, TaskState};
pub use runner::ToolRunner;
pub use task_container::{AnyTask, TaskContainer, TaskHandle};

/// A type of task.
pub trait Task: Debug + Default + Send + 'static {
    /// The main action of the task. Runs after every `do_first` action and before every
    /// `do_last` action.
    fn task_action(task: &mut Executable<Self>, project: &Project) -> BuildResult;
}

/// A task that has no actions by default.
#[derive(Debug, Default)]
pub struct Empty;

impl Task for Empty {
    fn task_action(_task: &mut Executable<Self>, _project: &Project) -> BuildResult {
        Ok(())
    }
}

assert_impl_all!(TaskHandle<Empty>: Send, Sync, Clone);
