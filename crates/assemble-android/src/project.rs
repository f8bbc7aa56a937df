//! The project contains the tasks, layout information, and other related objects that would help
//! with project building.

use crate::dependencies::{ConfigurationContainer, DependencyResolver, MavenLocal};
use crate::error::PayloadError;
use crate::identifier::TaskId;
use crate::plugins::extensions::{Extension, ExtensionAware, ExtensionContainer};
use crate::plugins::Plugin;
use crate::task::execution::ExecutionPlan;
use crate::task::{Task, TaskContainer, TaskHandle};
use log::{debug, info};
use std::any::type_name;
use std::fmt::{Debug, Display, Formatter};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

pub mod error;

pub use error::{ProjectError, ProjectResult};

type AfterEvaluate = Box<dyn FnOnce(&mut Project) -> ProjectResult>;

/// A project is configured in two phases. First, plugins are applied and tasks are registered.
/// Then the project is [evaluated](Project::evaluate), which runs every
/// [`after_evaluate`](Project::after_evaluate) callback. Only evaluated projects execute tasks.
///
/// # Example
/// ```
/// # use assemble_android::Project;
/// # use assemble_android::task::Empty;
/// let mut project = Project::temp("example");
/// let task = project.register_task::<Empty>("helloWorld").unwrap();
/// task.configure_with(|task| {
///     task.do_first(|_, _| {
///         println!("Hello, World");
///         Ok(())
///     })
/// });
/// project.execute(&["helloWorld"]).unwrap();
/// ```
pub struct Project {
    name: String,
    project_dir: PathBuf,
    build_dir: PathBuf,
    task_container: TaskContainer,
    extensions: ExtensionContainer,
    configurations: ConfigurationContainer,
    applied_plugins: Vec<String>,
    after_evaluate: Vec<AfterEvaluate>,
    evaluated: bool,
    resolver: Arc<dyn DependencyResolver>,
    _temp_dir: Option<TempDir>,
}

impl Debug for Project {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Project {:?}", self.name)
    }
}

impl Display for Project {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "project {:?}", self.name)
    }
}

impl Project {
    /// Creates a project in a directory. The build directory is `<dir>/build`.
    pub fn in_dir(name: &str, path: impl AsRef<Path>) -> Self {
        let project_dir = path.as_ref().to_path_buf();
        Self {
            name: name.to_string(),
            build_dir: project_dir.join("build"),
            project_dir,
            task_container: TaskContainer::new(),
            extensions: ExtensionContainer::default(),
            configurations: ConfigurationContainer::default(),
            applied_plugins: vec![],
            after_evaluate: vec![],
            evaluated: false,
            resolver: Arc::new(MavenLocal::user_default()),
            _temp_dir: None,
        }
    }

    /// Creates a project in a temporary directory that lives as long as the project.
    pub fn temp(name: &str) -> Self {
        match tempfile::Builder::new().prefix(name).tempdir() {
            Ok(temp) => {
                let mut project = Self::in_dir(name, temp.path());
                project._temp_dir = Some(temp);
                project
            }
            Err(_) => Self::in_dir(name, std::env::temp_dir().join(name)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    pub fn set_build_dir(&mut self, dir: impl AsRef<Path>) {
        self.build_dir = self.project_dir.join(dir);
    }

    pub fn task_container(&self) -> &TaskContainer {
        &self.task_container
    }

    /// Registers a new task in this project.
    pub fn register_task<T: Task>(&mut self, name: &str) -> ProjectResult<TaskHandle<T>> {
        let id = TaskId::new(name)?;
        debug!("registering task {} of type {}", id, type_name::<T>());
        Ok(self.task_container.register_task::<T>(id)?)
    }

    /// Gets a registered task of a known type.
    pub fn task<T: Task>(&self, name: &str) -> ProjectResult<TaskHandle<T>> {
        let id = TaskId::new(name)?;
        Ok(self.task_container.get_typed::<T>(&id)?)
    }

    pub fn configurations(&self) -> &ConfigurationContainer {
        &self.configurations
    }

    pub fn configurations_mut(&mut self) -> &mut ConfigurationContainer {
        &mut self.configurations
    }

    pub fn dependency_resolver(&self) -> &dyn DependencyResolver {
        self.resolver.as_ref()
    }

    pub fn set_dependency_resolver<R: DependencyResolver + 'static>(&mut self, resolver: R) {
        self.resolver = Arc::new(resolver);
    }

    /// Gets an extension of a type, failing if none (or more than one) is registered.
    pub fn require_extension<E: Extension>(&self) -> ProjectResult<&E> {
        self.extension::<E>()
            .ok_or_else(|| PayloadError::new(ProjectError::MissingExtension(type_name::<E>())))
    }

    /// Gets a mutable extension of a type, failing if none (or more than one) is registered.
    pub fn require_extension_mut<E: Extension>(&mut self) -> ProjectResult<&mut E> {
        self.extension_mut::<E>()
            .ok_or_else(|| PayloadError::new(ProjectError::MissingExtension(type_name::<E>())))
    }

    /// Applies a plugin. Applying a plugin with an id that was already applied does nothing.
    pub fn apply_plugin<P: Plugin>(&mut self) -> ProjectResult {
        let plugin = P::default();
        let id = plugin.plugin_id().to_string();
        if self.has_plugin(&id) {
            return Ok(());
        }
        info!("applying plugin {} to {}", id, self);
        plugin.apply(self)?;
        self.applied_plugins.push(id);
        Ok(())
    }

    pub fn has_plugin(&self, id: &str) -> bool {
        self.applied_plugins.iter().any(|p| p == id)
    }

    /// Adds a callback that runs once the project is evaluated.
    pub fn after_evaluate<F>(&mut self, func: F)
    where
        F: FnOnce(&mut Project) -> ProjectResult + 'static,
    {
        self.after_evaluate.push(Box::new(func));
    }

    pub fn is_evaluated(&self) -> bool {
        self.evaluated
    }

    /// Finishes the configuration of the project by running every `after_evaluate` callback,
    /// including callbacks added by other callbacks, in order.
    ///
    /// # Error
    /// Errors if the project was already evaluated, or if any callback fails.
    pub fn evaluate(&mut self) -> ProjectResult {
        if self.evaluated {
            return Err(ProjectError::AlreadyEvaluated.into());
        }
        self.evaluated = true;
        while !self.after_evaluate.is_empty() {
            let callbacks = std::mem::take(&mut self.after_evaluate);
            for callback in callbacks {
                callback(self)?;
            }
        }
        Ok(())
    }

    /// Executes the requested tasks and everything they depend on, evaluating the project
    /// first if necessary. Returns the tasks in the order they were run.
    pub fn execute(&mut self, tasks: &[&str]) -> ProjectResult<Vec<TaskId>> {
        if !self.evaluated {
            self.evaluate()?;
        }
        let requested = tasks
            .iter()
            .map(TaskId::new)
            .collect::<Result<Vec<_>, _>>()?;
        let project: &Project = self;
        let plan = ExecutionPlan::new(&project.task_container, &requested)?;

        for id in plan.order() {
            let task = project.task_container.get_task(id)?;
            debug!("executing {}", id);
            task.execute(project).map_err(|e| ProjectError::TaskFailed {
                id: id.clone(),
                message: e.to_string(),
            })?;
        }
        Ok(plan.order().to_vec())
    }
}

impl ExtensionAware for Project {
    fn extensions(&self) -> &ExtensionContainer {
        &self.extensions
    }

    fn extensions_mut(&mut self) -> &mut ExtensionContainer {
        &mut self.extensions
    }
}
