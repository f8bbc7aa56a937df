//! Build variants and the tasks each of them owns.

use super::tasks::{Dex, JavaCompile, ProGuard};
use super::AndroidExtension;
use crate::project::{Project, ProjectResult};
use crate::task::TaskHandle;
use heck::ToUpperCamelCase;
use log::debug;

/// What kind of artifact a variant produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantKind {
    Application,
    Library,
}

/// One concrete build configuration, such as `debug` or `releaseAndroidTest`.
///
/// Test variants carry the variant they test.
#[derive(Debug, Clone)]
pub struct BaseVariant {
    name: String,
    package: String,
    kind: VariantKind,
    tested_variant: Option<Box<BaseVariant>>,
    source_sets: Vec<String>,
    java_compile: TaskHandle<JavaCompile>,
    dex: TaskHandle<Dex>,
    proguard: Option<TaskHandle<ProGuard>>,
}

impl BaseVariant {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The application id of this variant
    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn kind(&self) -> VariantKind {
        self.kind
    }

    pub fn is_library(&self) -> bool {
        self.kind == VariantKind::Library
    }

    pub fn is_test(&self) -> bool {
        self.tested_variant.is_some()
    }

    pub fn tested_variant(&self) -> Option<&BaseVariant> {
        self.tested_variant.as_deref()
    }

    /// The names of the source sets compiled into this variant
    pub fn source_sets(&self) -> &[String] {
        &self.source_sets
    }

    pub fn java_compile(&self) -> &TaskHandle<JavaCompile> {
        &self.java_compile
    }

    pub fn dex(&self) -> &TaskHandle<Dex> {
        &self.dex
    }

    pub fn proguard(&self) -> Option<&TaskHandle<ProGuard>> {
        self.proguard.as_ref()
    }
}

/// Creates a variant and registers its tasks.
///
/// ```
/// # use assemble_android::Project;
/// # use assemble_android::android::{AppPlugin, VariantBuilder};
/// let mut project = Project::temp("builder");
/// project.apply_plugin::<AppPlugin>().unwrap();
/// let debug = VariantBuilder::new("debug", "com.app").build(&mut project).unwrap();
/// assert_eq!(debug.java_compile().id().to_string(), "compileDebugJavaWithJavac");
/// ```
#[derive(Debug)]
pub struct VariantBuilder {
    name: String,
    package: String,
    kind: VariantKind,
    source_sets: Vec<String>,
    tested: Option<BaseVariant>,
    minify: bool,
}

impl VariantBuilder {
    pub fn new(name: &str, package: &str) -> Self {
        Self {
            name: name.to_string(),
            package: package.to_string(),
            kind: VariantKind::Application,
            source_sets: vec!["main".to_string()],
            tested: None,
            minify: false,
        }
    }

    pub fn kind(mut self, kind: VariantKind) -> Self {
        self.kind = kind;
        self
    }

    /// Adds a source set to the variant. Every variant starts with `main`.
    pub fn source_set(mut self, name: &str) -> Self {
        if !self.source_sets.iter().any(|s| s == name) {
            self.source_sets.push(name.to_string());
        }
        self
    }

    /// Makes this a test variant of another variant.
    ///
    /// Test variants compile the `androidTest` source set instead of `main`, against the classes
    /// of the tested variant.
    pub fn testing(mut self, tested: &BaseVariant) -> Self {
        self.source_sets.retain(|s| s != "main");
        if self.source_sets.is_empty() {
            self.source_sets.push("androidTest".to_string());
        }
        self.tested = Some(tested.clone());
        self
    }

    /// Whether the variant gets a proguard task
    pub fn minify(mut self, minify: bool) -> Self {
        self.minify = minify;
        self
    }

    /// Registers the `compile<Name>JavaWithJavac`, `dex<Name>` and, when minified,
    /// `proguard<Name>` tasks and adds the variant to the android extension.
    ///
    /// # Error
    /// Errors if the android extension is missing or if a task name is already taken.
    pub fn build(self, project: &mut Project) -> ProjectResult<BaseVariant> {
        project.require_extension::<AndroidExtension>()?;
        let capitalized = self.name.to_upper_camel_case();

        let java_compile =
            project.register_task::<JavaCompile>(&format!("compile{}JavaWithJavac", capitalized))?;
        let destination = project
            .build_dir()
            .join("intermediates")
            .join("classes")
            .join(&self.name);
        let dex_dir = project.build_dir().join("intermediates").join("dex").join(&self.name);

        let sources = {
            let android = project.require_extension_mut::<AndroidExtension>()?;
            let mut sources = vec![];
            for set in &self.source_sets {
                sources.extend(android.source_set(set).java.files());
            }
            sources
        };
        let boot_classpath = project
            .require_extension::<AndroidExtension>()?
            .boot_classpath
            .clone();

        java_compile.configure_with(|task| {
            task.source = sources;
            task.destination_dir = destination.clone();
            task.options.boot_classpath = boot_classpath;
        });
        if let Some(tested) = &self.tested {
            let tested_compile = tested.java_compile();
            let tested_classes = tested_compile.with(|java| java.destination_dir.clone());
            java_compile.configure_with(|task| {
                task.classpath.push(tested_classes);
                task.depends_on(tested_compile.id());
            });
        }

        let dex = project.register_task::<Dex>(&format!("dex{}", capitalized))?;
        dex.configure_with(|task| {
            task.input_files.push(destination.clone());
            task.output_dir = dex_dir;
            task.depends_on(java_compile.id());
        });

        let proguard = if self.minify {
            let proguard = project.register_task::<ProGuard>(&format!("proguard{}", capitalized))?;
            let android = project.require_extension::<AndroidExtension>()?;
            let files = if self.tested.is_some() {
                android.default_config.test_proguard_files.clone()
            } else {
                android.default_config.proguard_files.clone()
            };
            proguard.configure_with(|task| {
                for file in files {
                    task.configuration(file);
                }
            });
            Some(proguard)
        } else {
            None
        };

        let variant = BaseVariant {
            name: self.name,
            package: self.package,
            kind: self.kind,
            tested_variant: self.tested.map(Box::new),
            source_sets: self.source_sets,
            java_compile,
            dex,
            proguard,
        };
        debug!("created variant {}", variant.name);
        project
            .require_extension_mut::<AndroidExtension>()?
            .add_variant(variant.clone());
        Ok(variant)
    }
}
