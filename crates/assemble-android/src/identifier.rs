//! Identifiers are used by tasks and configurations.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::{Debug, Display, Formatter};
use std::ops::Deref;

static VALID_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z][\w-]*$").expect("valid identifier regex"));

/// Checks whether a string is a valid identifier
pub fn is_valid_identifier(id: &str) -> bool {
    VALID_ID.is_match(id)
}

/// The identifier of a task within a project.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct TaskId(String);

impl TaskId {
    /// Create a new task id
    ///
    /// # Error
    /// Errors if it isn't a valid identifier.
    ///
    /// # Example
    /// ```
    /// # use assemble_android::identifier::TaskId;
    /// assert!(TaskId::new("compileDebugScala").is_ok());
    /// assert!(TaskId::new("&task").is_err());
    /// assert!(TaskId::new("2132").is_err());
    /// ```
    pub fn new<S: AsRef<str>>(id: S) -> Result<Self, InvalidId> {
        let id = id.as_ref();
        if is_valid_identifier(id) {
            Ok(Self(id.to_string()))
        } else {
            Err(InvalidId(id.to_string()))
        }
    }
}

impl Deref for TaskId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for TaskId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Debug for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\"", self.0)
    }
}

impl TryFrom<&str> for TaskId {
    type Error = InvalidId;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        TaskId::new(value)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Invalid Identifier {0:?}")]
pub struct InvalidId(pub String);
