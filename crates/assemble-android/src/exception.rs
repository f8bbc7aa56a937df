//! Build time exceptions

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Raised by task actions.
///
/// `StopAction` and `StopTask` are control flow, only `Error` fails a build.
#[derive(Debug)]
pub enum BuildException {
    StopAction,
    StopTask,
    Error(Box<dyn Error + Send + Sync>),
}

impl BuildException {
    pub fn new<E: 'static + Error + Send + Sync>(e: E) -> Self {
        BuildException::Error(Box::new(e))
    }

    pub fn custom(e: &str) -> Self {
        BuildException::Error(Box::new(BuildError::new(e)))
    }
}

impl<E: 'static + Error + Send + Sync> From<E> for BuildException {
    fn from(e: E) -> Self {
        Self::new(e)
    }
}

impl Display for BuildException {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildException::StopAction => write!(f, "action stopped"),
            BuildException::StopTask => write!(f, "task stopped"),
            BuildException::Error(e) => write!(f, "{}", e),
        }
    }
}

pub type BuildResult<T = ()> = Result<T, BuildException>;

/// Represents any error
#[derive(Debug, thiserror::Error)]
#[error("{}", message)]
pub struct BuildError {
    message: String,
    #[source]
    inner: Option<Box<dyn Error + Send + Sync>>,
}

impl BuildError {
    /// Create a new, arbitrary build error
    pub fn new(message: impl AsRef<str>) -> Self {
        Self {
            message: message.as_ref().to_string(),
            inner: None,
        }
    }

    /// Create a new build error with a cause
    pub fn with_inner<E: Error + Send + Sync + 'static>(message: impl AsRef<str>, e: E) -> Self {
        Self {
            message: message.as_ref().to_string(),
            inner: Some(Box::new(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn io_errors_become_build_errors() {
        fn fails() -> BuildResult {
            Err(io::Error::new(io::ErrorKind::NotFound, "gone"))?;
            Ok(())
        }
        let err = fails().unwrap_err();
        assert!(matches!(err, BuildException::Error(_)));
        assert_eq!(err.to_string(), "gone");
    }
}
