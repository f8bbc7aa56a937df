//! Errors raised while wiring scala into an android project

use crate::probe::ProbeError;
use assemble_android::error::PayloadError;
use assemble_android::ProjectError;

#[derive(Debug, thiserror::Error)]
pub enum ScalaAndroidError {
    #[error(
        "apply android plugin first: the android-scala plugin requires either \
         com.android.application or com.android.library"
    )]
    AndroidPluginMissing,
    #[error("the android-scala plugin does not support the {0} option")]
    IncompatibleOption(&'static str),
    #[error("the scala extension can not be changed once the project has been evaluated")]
    ExtensionFrozen,
    #[error(transparent)]
    Probe(#[from] ProbeError),
}

impl From<ScalaAndroidError> for PayloadError<ProjectError> {
    fn from(e: ScalaAndroidError) -> Self {
        PayloadError::new(ProjectError::plugin(e))
    }
}
