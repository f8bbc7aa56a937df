//! The plugin's view of a host variant.

use crate::work_dir::WorkDirLayout;
use assemble_android::android::BaseVariant;
use assemble_android::identifier::TaskId;
use heck::ToUpperCamelCase;
use std::ops::Deref;
use std::path::PathBuf;

/// Prefix of the zinc configurations created by the plugin
pub const ZINC_CONFIGURATION_PREFIX: &str = "androidScalaPluginZincFor";

/// Wraps a [`BaseVariant`] with the names and paths the plugin derives from it. The variant
/// itself is never changed.
#[derive(Debug, Clone, Copy)]
pub struct ScalaVariant<'v> {
    variant: &'v BaseVariant,
    layout: &'v WorkDirLayout,
}

impl<'v> ScalaVariant<'v> {
    pub fn new(variant: &'v BaseVariant, layout: &'v WorkDirLayout) -> Self {
        Self { variant, layout }
    }

    pub fn variant(&self) -> &'v BaseVariant {
        self.variant
    }

    /// The variant being tested, seen through the same layout
    pub fn tested(&self) -> Option<ScalaVariant<'v>> {
        self.variant
            .tested_variant()
            .map(|tested| ScalaVariant::new(tested, self.layout))
    }

    fn task_suffix(&self) -> String {
        self.variant.name().to_upper_camel_case()
    }

    pub fn scala_compile_name(&self) -> String {
        format!("compile{}Scala", self.task_suffix())
    }

    pub fn scala_proguard_name(&self) -> String {
        format!("proguard{}Scala", self.task_suffix())
    }

    /// The zinc configuration used to compile this variant, named after its java compile task
    pub fn zinc_configuration_name(&self, java_compile: &TaskId) -> String {
        format!(
            "{}{}",
            ZINC_CONFIGURATION_PREFIX,
            java_compile.to_upper_camel_case()
        )
    }

    pub fn work_dir(&self) -> PathBuf {
        self.layout.work_dir(self.variant.name())
    }

    pub fn classes_dir(&self) -> PathBuf {
        self.work_dir().join("classes")
    }

    pub fn analysis_file(&self) -> PathBuf {
        self.work_dir().join("analysis.txt")
    }

    pub fn injars_fragment(&self) -> PathBuf {
        self.work_dir().join("proguard-injars.txt")
    }

    pub fn proguarded_jar(&self) -> PathBuf {
        self.work_dir().join("proguarded-classes.jar")
    }

    /// Where test shrinking of this variant prints its configuration
    pub fn test_configuration_dump(&self) -> PathBuf {
        self.work_dir().join("test-proguard-configuration.txt")
    }
}

impl Deref for ScalaVariant<'_> {
    type Target = BaseVariant;

    fn deref(&self) -> &Self::Target {
        self.variant
    }
}
