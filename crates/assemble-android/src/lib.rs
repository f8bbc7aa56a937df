//! The android build model that assemble plugins are wired against.
//!
//! A [`Project`](project::Project) owns a task graph that is configured eagerly but executed
//! lazily. Plugins register tasks and [`after_evaluate`](project::Project::after_evaluate)
//! callbacks, actions are attached with [`do_first`](task::Executable::do_first) and
//! [`do_last`](task::Executable::do_last), and the graph only runs once the project has been
//! evaluated.
//!
//! The [`android`] module contains the android specific part of the model: variants, source
//! sets and the `JavaCompile`, `Dex` and `ProGuard` tasks.

#[macro_use]
extern crate static_assertions;

pub mod android;
pub mod dependencies;
pub mod error;
pub mod exception;
pub mod file_collection;
pub mod identifier;
pub mod logging;
pub mod plugins;
pub mod project;
pub mod task;

pub use exception::{BuildException, BuildResult};
pub use project::{Project, ProjectError, ProjectResult};
pub use task::{Executable, Task, TaskHandle};
