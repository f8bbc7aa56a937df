//! The `scala` extension, the user facing configuration of the plugin

use crate::compile::zinc::ZincCompiler;
use crate::compile::ScalaCompile;
use crate::error::ScalaAndroidError;
use assemble_android::task::runner::Runner;
use assemble_android::task::ToolRunner;

/// The name the extension is registered under
pub const SCALA_EXTENSION: &str = "scala";

/// Configures how scala sources are compiled.
///
/// The extension can be changed until the project is evaluated, after which every setter
/// fails with [`ScalaAndroidError::ExtensionFrozen`].
#[derive(Debug)]
pub struct ScalaExtension {
    additional_parameters: Option<String>,
    compiler: Runner<ScalaCompile>,
    frozen: bool,
}

impl Default for ScalaExtension {
    fn default() -> Self {
        Self {
            additional_parameters: None,
            compiler: Runner::new(ZincCompiler::default()),
            frozen: false,
        }
    }
}

impl ScalaExtension {
    /// Extra arguments passed to the scala compiler, as a single string
    pub fn additional_parameters(&self) -> Option<&str> {
        self.additional_parameters.as_deref()
    }

    pub fn set_additional_parameters(
        &mut self,
        parameters: impl AsRef<str>,
    ) -> Result<(), ScalaAndroidError> {
        self.check_frozen()?;
        self.additional_parameters = Some(parameters.as_ref().to_string());
        Ok(())
    }

    /// The additional parameters, split on whitespace
    pub fn parameter_list(&self) -> Vec<String> {
        self.additional_parameters
            .as_deref()
            .map(|params| params.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    pub fn compiler(&self) -> &Runner<ScalaCompile> {
        &self.compiler
    }

    /// Replaces the tool that compiles scala sources
    pub fn set_compiler<R: ToolRunner<ScalaCompile> + 'static>(
        &mut self,
        compiler: R,
    ) -> Result<(), ScalaAndroidError> {
        self.check_frozen()?;
        self.compiler = Runner::new(compiler);
        Ok(())
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub(crate) fn freeze(&mut self) {
        self.frozen = true;
    }

    fn check_frozen(&self) -> Result<(), ScalaAndroidError> {
        if self.frozen {
            Err(ScalaAndroidError::ExtensionFrozen)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assemble_android::BuildResult;

    #[test]
    fn parameters_split_on_whitespace() {
        let mut extension = ScalaExtension::default();
        assert!(extension.parameter_list().is_empty());
        extension
            .set_additional_parameters(" -feature   -deprecation\n-Xlint ")
            .unwrap();
        assert_eq!(
            extension.parameter_list(),
            vec!["-feature", "-deprecation", "-Xlint"]
        );
    }

    #[test]
    fn frozen_extension_rejects_changes() {
        let mut extension = ScalaExtension::default();
        extension.freeze();
        assert!(matches!(
            extension.set_additional_parameters("-feature"),
            Err(ScalaAndroidError::ExtensionFrozen)
        ));
        assert!(extension
            .set_compiler(|_: &ScalaCompile| -> BuildResult { Ok(()) })
            .is_err());
        assert_eq!(extension.additional_parameters(), None);
    }
}
