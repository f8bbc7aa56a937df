//! The android part of the build model.
//!
//! Applying [`AppPlugin`] or [`LibraryPlugin`] registers the [`AndroidExtension`], which holds
//! the platform boot classpath, the default configuration, the source sets and the variants of
//! the project.

use crate::file_collection::SourceDirectorySet;
use crate::plugins::extensions::ExtensionAware;
use crate::plugins::Plugin;
use crate::project::{Project, ProjectResult};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub mod archive;
pub mod tasks;
pub mod variant;

pub use variant::{BaseVariant, VariantBuilder, VariantKind};

/// The name the android extension is registered under
pub const ANDROID_EXTENSION: &str = "android";

/// Source sets every android project starts with
pub const DEFAULT_SOURCE_SETS: &[&str] = &["main", "test", "androidTest"];

/// Options applied to every variant
#[derive(Debug, Clone, Default)]
pub struct DefaultConfig {
    pub proguard_files: Vec<PathBuf>,
    pub test_proguard_files: Vec<PathBuf>,
    /// Whether the jack toolchain replaces javac and proguard
    pub jack_enabled: bool,
}

impl DefaultConfig {
    pub fn proguard_file(&mut self, file: impl AsRef<Path>) {
        let file = file.as_ref().to_path_buf();
        if !self.proguard_files.contains(&file) {
            self.proguard_files.push(file);
        }
    }

    pub fn test_proguard_file(&mut self, file: impl AsRef<Path>) {
        let file = file.as_ref().to_path_buf();
        if !self.test_proguard_files.contains(&file) {
            self.test_proguard_files.push(file);
        }
    }
}

/// An android source set. Only the java sources are modelled.
#[derive(Debug, Clone)]
pub struct AndroidSourceSet {
    name: String,
    pub java: SourceDirectorySet,
}

impl AndroidSourceSet {
    pub fn new(name: &str, project_dir: &Path) -> Self {
        let mut java = SourceDirectorySet::new(format!("{} Java source", name));
        java.src_dir(project_dir.join("src").join(name).join("java"))
            .include("**/*.java");
        Self {
            name: name.to_string(),
            java,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// The `android` extension
#[derive(Debug)]
pub struct AndroidExtension {
    library: bool,
    project_dir: PathBuf,
    pub boot_classpath: Vec<PathBuf>,
    pub default_config: DefaultConfig,
    source_sets: BTreeMap<String, AndroidSourceSet>,
    variants: Vec<BaseVariant>,
}

impl AndroidExtension {
    fn new(project_dir: &Path, library: bool) -> Self {
        let mut extension = Self {
            library,
            project_dir: project_dir.to_path_buf(),
            boot_classpath: vec![],
            default_config: DefaultConfig::default(),
            source_sets: BTreeMap::new(),
            variants: vec![],
        };
        for name in DEFAULT_SOURCE_SETS {
            extension.source_set(name);
        }
        extension
    }

    /// Whether this is the extension of a library project
    pub fn is_library(&self) -> bool {
        self.library
    }

    /// Gets a source set, creating it if it doesn't exist
    pub fn source_set(&mut self, name: &str) -> &mut AndroidSourceSet {
        let project_dir = &self.project_dir;
        self.source_sets
            .entry(name.to_string())
            .or_insert_with(|| AndroidSourceSet::new(name, project_dir))
    }

    pub fn source_sets(&self) -> impl Iterator<Item = &AndroidSourceSet> {
        self.source_sets.values()
    }

    pub fn source_sets_mut(&mut self) -> impl Iterator<Item = &mut AndroidSourceSet> {
        self.source_sets.values_mut()
    }

    pub fn add_variant(&mut self, variant: BaseVariant) {
        self.variants.push(variant);
    }

    /// Every variant, production and test
    pub fn variants(&self) -> &[BaseVariant] {
        &self.variants
    }

    pub fn variant(&self, name: &str) -> Option<&BaseVariant> {
        self.variants.iter().find(|v| v.name() == name)
    }
}

/// The `com.android.application` plugin
#[derive(Debug, Default)]
pub struct AppPlugin;

impl Plugin for AppPlugin {
    fn apply(&self, project: &mut Project) -> ProjectResult {
        let extension = AndroidExtension::new(project.project_dir(), false);
        project.extensions_mut().add(ANDROID_EXTENSION, extension)?;
        Ok(())
    }

    fn plugin_id(&self) -> &str {
        "com.android.application"
    }
}

/// The `com.android.library` plugin
#[derive(Debug, Default)]
pub struct LibraryPlugin;

impl Plugin for LibraryPlugin {
    fn apply(&self, project: &mut Project) -> ProjectResult {
        let extension = AndroidExtension::new(project.project_dir(), true);
        project.extensions_mut().add(ANDROID_EXTENSION, extension)?;
        Ok(())
    }

    fn plugin_id(&self) -> &str {
        "com.android.library"
    }
}
