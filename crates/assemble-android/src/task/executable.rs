use super::Task;
use crate::exception::{BuildException, BuildResult};
use crate::identifier::TaskId;
use crate::project::Project;
use log::trace;
use std::fmt::{Debug, Formatter};
use std::ops::{Deref, DerefMut};

/// An action that is run by an executable, either before or after the main task action.
pub type Action<T> = Box<dyn Fn(&mut Executable<T>, &Project) -> BuildResult + Send>;

/// The execution state of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Executed,
    Skipped,
    Failed,
}

/// The wrapped task itself
pub struct Executable<T: Task> {
    pub task: T,
    task_id: TaskId,
    depends_on: Vec<TaskId>,
    first: Vec<Action<T>>,
    last: Vec<Action<T>>,
    enabled: bool,
    state: TaskState,
}

impl<T: Task> Executable<T> {
    pub fn new(task_id: TaskId, task: T) -> Self {
        Self {
            task,
            task_id,
            depends_on: vec![],
            first: vec![],
            last: vec![],
            enabled: true,
            state: TaskState::Pending,
        }
    }

    pub fn task_id(&self) -> &TaskId {
        &self.task_id
    }

    /// Adds a task this task depends on. Adding the same task twice has no effect.
    pub fn depends_on(&mut self, task: &TaskId) {
        if !self.depends_on.contains(task) {
            self.depends_on.push(task.clone());
        }
    }

    pub fn dependencies(&self) -> &[TaskId] {
        &self.depends_on
    }

    /// Adds an action that runs before every other action. Actions added later run earlier.
    pub fn do_first<F>(&mut self, a: F)
    where
        F: Fn(&mut Executable<T>, &Project) -> BuildResult + Send + 'static,
    {
        self.first.push(Box::new(a));
    }

    /// Adds an action that runs after every other action.
    pub fn do_last<F>(&mut self, a: F)
    where
        F: Fn(&mut Executable<T>, &Project) -> BuildResult + Send + 'static,
    {
        self.last.push(Box::new(a));
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn state(&self) -> TaskState {
        self.state
    }

    /// Runs the `do_first` actions, the task action, then the `do_last` actions.
    ///
    /// A task is only ever executed once, later calls do nothing.
    pub fn execute(&mut self, project: &Project) -> BuildResult {
        if self.state != TaskState::Pending {
            trace!("{} already {:?}", self.task_id, self.state);
            return Ok(());
        }
        if !self.enabled {
            trace!("{} is disabled, skipping", self.task_id);
            self.state = TaskState::Skipped;
            return Ok(());
        }

        let first: Vec<Action<T>> = std::mem::take(&mut self.first).into_iter().rev().collect();
        let last: Vec<Action<T>> = std::mem::take(&mut self.last);
        let main: Action<T> = Box::new(T::task_action);

        let result = self.run_actions(project, first.iter().chain(Some(&main)).chain(last.iter()));
        self.state = match result {
            Ok(()) => TaskState::Executed,
            Err(_) => TaskState::Failed,
        };
        result
    }

    fn run_actions<'a, I>(&mut self, project: &Project, actions: I) -> BuildResult
    where
        I: IntoIterator<Item = &'a Action<T>>,
    {
        for action in actions {
            match action(self, project) {
                Ok(()) | Err(BuildException::StopAction) => {}
                Err(BuildException::StopTask) => return Ok(()),
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}

impl<T: Task> Debug for Executable<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executable")
            .field("task", &self.task)
            .field("id", &self.task_id)
            .field("depends_on", &self.depends_on)
            .finish_non_exhaustive()
    }
}

impl<T: Task> Deref for Executable<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.task
    }
}

impl<T: Task> DerefMut for Executable<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.task
    }
}
