//! The task container

use super::{Executable, Task, TaskState};
use crate::exception::BuildResult;
use crate::identifier::TaskId;
use crate::project::{Project, ProjectError};
use parking_lot::Mutex;
use std::any::{type_name, Any};
use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// A shared handle to a registered task.
pub struct TaskHandle<T: Task> {
    id: TaskId,
    inner: Arc<Mutex<Executable<T>>>,
}

impl<T: Task> Clone for TaskHandle<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            inner: self.inner.clone(),
        }
    }
}

impl<T: Task> TaskHandle<T> {
    fn new(id: TaskId) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Executable::new(id.clone(), T::default()))),
            id,
        }
    }

    pub fn id(&self) -> &TaskId {
        &self.id
    }

    /// Reads from the task.
    ///
    /// Must not be called from within one of this task's own actions.
    pub fn with<R, F: FnOnce(&Executable<T>) -> R>(&self, func: F) -> R {
        let guard = self.inner.lock();
        func(&guard)
    }

    /// Configures the task.
    ///
    /// Must not be called from within one of this task's own actions.
    pub fn configure_with<R, F: FnOnce(&mut Executable<T>) -> R>(&self, func: F) -> R {
        let mut guard = self.inner.lock();
        func(&mut guard)
    }
}

impl<T: Task> Debug for TaskHandle<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "TaskHandle<{}>({})", type_name::<T>(), self.id)
    }
}

/// A type erased task handle.
pub trait AnyTask: Send + Sync {
    fn task_id(&self) -> &TaskId;
    fn dependencies(&self) -> Vec<TaskId>;
    fn state(&self) -> TaskState;
    fn execute(&self, project: &Project) -> BuildResult;
    fn as_any(&self) -> &dyn Any;
}

assert_obj_safe!(AnyTask);

impl<T: Task> AnyTask for TaskHandle<T> {
    fn task_id(&self) -> &TaskId {
        &self.id
    }

    fn dependencies(&self) -> Vec<TaskId> {
        self.with(|e| e.dependencies().to_vec())
    }

    fn state(&self) -> TaskState {
        self.with(|e| e.state())
    }

    fn execute(&self, project: &Project) -> BuildResult {
        self.configure_with(|e| e.execute(project))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Contains every task registered to a project
#[derive(Default)]
pub struct TaskContainer {
    tasks: BTreeMap<TaskId, Box<dyn AnyTask>>,
}

impl TaskContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new task.
    ///
    /// # Error
    /// Errors if a task with this id is already registered.
    pub fn register_task<T: Task>(&mut self, task_id: TaskId) -> Result<TaskHandle<T>, ProjectError> {
        if self.tasks.contains_key(&task_id) {
            return Err(ProjectError::TaskAlreadyRegistered(task_id));
        }
        let handle = TaskHandle::<T>::new(task_id.clone());
        self.tasks.insert(task_id, Box::new(handle.clone()));
        Ok(handle)
    }

    pub fn contains(&self, task_id: &TaskId) -> bool {
        self.tasks.contains_key(task_id)
    }

    pub fn get_tasks(&self) -> Vec<TaskId> {
        self.tasks.keys().cloned().collect()
    }

    pub fn get_task(&self, task_id: &TaskId) -> Result<&dyn AnyTask, ProjectError> {
        self.tasks
            .get(task_id)
            .map(|b| b.as_ref())
            .ok_or_else(|| ProjectError::IdentifierMissing(task_id.clone()))
    }

    /// Gets a task with a known type
    pub fn get_typed<T: Task>(&self, task_id: &TaskId) -> Result<TaskHandle<T>, ProjectError> {
        self.get_task(task_id)?
            .as_any()
            .downcast_ref::<TaskHandle<T>>()
            .cloned()
            .ok_or_else(|| ProjectError::WrongTaskType(task_id.clone(), type_name::<T>()))
    }
}

impl Debug for TaskContainer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.tasks.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Empty;

    #[test]
    fn register_and_find() {
        let mut container = TaskContainer::new();
        let id = TaskId::new("hello").unwrap();
        let handle = container.register_task::<Empty>(id.clone()).unwrap();
        assert_eq!(handle.id(), &id);
        assert!(container.get_typed::<Empty>(&id).is_ok());
        assert!(matches!(
            container.register_task::<Empty>(id),
            Err(ProjectError::TaskAlreadyRegistered(_))
        ));
    }
}
