//! Compiling scala sources of a variant.
//!
//! For every variant with the scala library on its classpath a `compile<Variant>Scala` task is
//! created in front of the variant's java compile task. The scala task compiles the variant's
//! java and scala sources together, javac then compiles against the scala classes, and once
//! javac is done the scala classes are moved into the java destination directory so every
//! later task sees a single set of classes.

use crate::error::ScalaAndroidError;
use crate::probe;
use crate::variant::ScalaVariant;
use crate::wiring::WiringContext;
use assemble_android::android::tasks::CompileOptions;
use assemble_android::dependencies::{Configuration, ExternalDependency};
use assemble_android::exception::BuildResult;
use assemble_android::task::runner::Runner;
use assemble_android::task::{Executable, Task, TaskHandle};
use assemble_android::{Project, ProjectResult};
use itertools::Itertools;
use log::{debug, info, trace, warn};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub mod zinc;

/// Options only the scala compiler understands
#[derive(Debug, Clone, Default)]
pub struct ScalaCompileOptions {
    pub encoding: Option<String>,
    pub additional_parameters: Vec<String>,
}

/// Compiles scala and java sources together with zinc
#[derive(Debug, Default)]
pub struct ScalaCompile {
    pub source: Vec<PathBuf>,
    pub classpath: Vec<PathBuf>,
    pub destination_dir: PathBuf,
    pub source_compatibility: String,
    pub target_compatibility: String,
    pub options: CompileOptions,
    pub scala_options: ScalaCompileOptions,
    /// The incremental compilation analysis of zinc
    pub analysis_file: PathBuf,
    /// The configuration the zinc classpath is resolved from
    pub zinc_configuration: Option<Configuration>,
    pub zinc_classpath: Vec<PathBuf>,
    pub compiler: Runner<ScalaCompile>,
}

impl Task for ScalaCompile {
    fn task_action(task: &mut Executable<Self>, project: &Project) -> BuildResult {
        if let Some(configuration) = task.zinc_configuration.clone() {
            let resolved = configuration.resolve(project.dependency_resolver())?;
            task.zinc_classpath = resolved.files().to_vec();
        }
        task.compiler.run(task.task_id(), &task.task)
    }
}

/// Creates the scala compile task of a variant, if the variant uses scala.
///
/// # Error
/// Errors if the variant's classpath can't be probed, or if the task can't be registered.
pub fn wire(
    project: &mut Project,
    ctx: &WiringContext,
    variant: &ScalaVariant,
) -> ProjectResult<Option<TaskHandle<ScalaCompile>>> {
    let java_compile = variant.java_compile().clone();

    let probe_classpath: Vec<PathBuf> = java_compile.with(|java| {
        java.classpath
            .iter()
            .filter(|entry| !ctx.boot_classpath.contains(*entry))
            .cloned()
            .collect()
    });
    let version = match probe::scala_version(&probe_classpath).map_err(ScalaAndroidError::from)? {
        Some(version) => version,
        None => {
            debug!("no scala library in {}, not compiling scala", variant.name());
            return Ok(None);
        }
    };

    let zinc = zinc_configuration(
        project,
        &variant.zinc_configuration_name(java_compile.id()),
        &version,
    )?;
    let scala_compile = project.register_task::<ScalaCompile>(&variant.scala_compile_name())?;
    info!(
        "compiling scala {} sources of {} with {}",
        version,
        variant.name(),
        scala_compile.id()
    );

    let destination = variant.classes_dir();
    let scala_sources = ctx.scala_sources.files(variant.source_sets());
    java_compile.with(|java| {
        scala_compile.configure_with(|scala| {
            scala.source = java
                .source
                .iter()
                .chain(&scala_sources)
                .cloned()
                .unique()
                .collect();
            scala.classpath = java.classpath.clone();
            scala.source_compatibility = java.source_compatibility.clone();
            scala.target_compatibility = java.target_compatibility.clone();
            scala.options.encoding = java.options.encoding.clone();
            scala.scala_options.encoding = java.options.encoding.clone();
            scala
                .options
                .boot_classpath
                .extend(java.options.boot_classpath.iter().cloned());
            scala.destination_dir = destination.clone();
            scala.analysis_file = variant.analysis_file();
            scala.scala_options.additional_parameters = ctx.additional_parameters.clone();
            scala.zinc_configuration = Some(zinc);
            scala.compiler = ctx.compiler.clone();
            for dependency in java.dependencies() {
                scala.depends_on(dependency);
            }
            scala.do_first(|task, _| {
                fs::create_dir_all(&task.destination_dir)?;
                Ok(())
            });
        })
    });

    let scala_id = scala_compile.id().clone();
    java_compile.configure_with(|java| {
        java.classpath.push(destination.clone());
        java.depends_on(&scala_id);
        java.do_last(move |task, _| {
            let moved = merge_classes(&destination, &task.destination_dir)?;
            debug!("moved {} scala classes into {:?}", moved, task.destination_dir);
            Ok(())
        });
    });

    Ok(Some(scala_compile))
}

/// Gets the zinc configuration with this name. A new configuration gets the scala compiler of
/// `version` and the zinc driver.
fn zinc_configuration(
    project: &mut Project,
    name: &str,
    version: &str,
) -> ProjectResult<Configuration> {
    let created = !project.configurations().contains(name);
    let configuration = project.configurations_mut().maybe_create(name);
    if created {
        configuration.add_dependency(ExternalDependency::new(
            "org.scala-lang",
            "scala-compiler",
            version,
        ))?;
        configuration.add_dependency(zinc::zinc_dependency())?;
    }
    Ok(configuration)
}

/// Moves every file of `from` into `into`, keeping relative paths and modification times. A file
/// that already exists in `into` is replaced, with a warning if its content differs.
///
/// Returns the number of moved files.
pub fn merge_classes(from: &Path, into: &Path) -> io::Result<usize> {
    if !from.is_dir() {
        return Ok(0);
    }
    let mut moved = 0;
    for entry in WalkDir::new(from).min_depth(1) {
        let entry = entry.map_err(io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry.path().strip_prefix(from).unwrap_or(entry.path());
        let target = into.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        if target.exists() {
            if fs::read(&target)? != fs::read(entry.path())? {
                warn!("{:?} differs between javac and scalac, keeping the scala class", relative);
            }
            fs::remove_file(&target)?;
        }
        move_file(entry.path(), &target)?;
        moved += 1;
    }
    Ok(moved)
}

fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }
    trace!("copying {:?} to {:?}", from, to);
    let modified = fs::metadata(from)?.modified()?;
    fs::copy(from, to)?;
    File::options().write(true).open(to)?.set_modified(modified)?;
    fs::remove_file(from)
}
