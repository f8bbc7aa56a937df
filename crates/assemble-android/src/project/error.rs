//! The project error type. Should be returned during building of the project.

use crate::dependencies::configurations::ConfigurationError;
use crate::dependencies::AcquisitionError;
use crate::error::PayloadError;
use crate::identifier::{InvalidId, TaskId};
use crate::plugins::extensions::ExtensionError;
use std::error::Error;
use std::fmt::Display;
use std::io;

#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("Identifier Missing: {0}")]
    IdentifierMissing(TaskId),
    #[error("Task {0} already registered")]
    TaskAlreadyRegistered(TaskId),
    #[error("Task {0} is not of type {1}")]
    WrongTaskType(TaskId, &'static str),
    #[error("Task graph contains a cycle through {0}")]
    TaskCycle(TaskId),
    #[error("Task {id} failed: {message}")]
    TaskFailed { id: TaskId, message: String },
    #[error("Project already evaluated")]
    AlreadyEvaluated,
    #[error("Extension of type {0} not registered")]
    MissingExtension(&'static str),
    #[error(transparent)]
    InvalidIdentifier(#[from] InvalidId),
    #[error(transparent)]
    IoError(#[from] io::Error),
    #[error(transparent)]
    ExtensionError(#[from] ExtensionError),
    #[error(transparent)]
    ConfigurationError(#[from] ConfigurationError),
    #[error(transparent)]
    AcquisitionError(#[from] AcquisitionError),
    #[error("{0}")]
    PluginFailure(Box<dyn Error + Send + Sync>),
    #[error("{0}")]
    CustomError(String),
}

impl ProjectError {
    pub fn custom<E: Display + Send + Sync + 'static>(error: E) -> Self {
        Self::CustomError(error.to_string())
    }

    /// Wraps an error raised by a plugin
    pub fn plugin<E: Error + Send + Sync + 'static>(error: E) -> Self {
        Self::PluginFailure(Box::new(error))
    }

    /// Gets the plugin error, if this error was raised by a plugin with that error type
    pub fn plugin_error<E: Error + 'static>(&self) -> Option<&E> {
        match self {
            ProjectError::PluginFailure(e) => e.downcast_ref::<E>(),
            _ => None,
        }
    }
}

#[macro_export]
macro_rules! payload_from {
    ($from:ty, $ty:ty) => {
        impl From<$from> for $crate::error::PayloadError<$ty>
        where
            $from: Into<$ty>,
        {
            fn from(e: $from) -> Self {
                let err: $ty = e.into();
                $crate::error::PayloadError::new(err)
            }
        }
    };
}

payload_from!(ProjectError, ProjectError);
payload_from!(InvalidId, ProjectError);
payload_from!(io::Error, ProjectError);
payload_from!(ExtensionError, ProjectError);
payload_from!(ConfigurationError, ProjectError);
payload_from!(AcquisitionError, ProjectError);

pub type Result<T> = std::result::Result<T, PayloadError<ProjectError>>;
pub type ProjectResult<T = ()> = Result<T>;
