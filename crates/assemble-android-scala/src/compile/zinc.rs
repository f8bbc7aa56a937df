//! Runs the zinc command line compiler

use super::ScalaCompile;
use assemble_android::dependencies::ExternalDependency;
use assemble_android::exception::{BuildError, BuildResult};
use assemble_android::task::runner::run_command;
use assemble_android::task::ToolRunner;
use log::info;
use std::env::join_paths;
use std::path::{Path, PathBuf};
use std::process::Command;

/// The version of the zinc driver
pub const ZINC_VERSION: &str = "0.3.7";

/// The main class of zinc
pub const ZINC_MAIN: &str = "com.typesafe.zinc.Main";

pub fn zinc_dependency() -> ExternalDependency {
    ExternalDependency::new("com.typesafe.zinc", "zinc", ZINC_VERSION)
}

/// Compiles with `java -cp <zinc classpath> com.typesafe.zinc.Main`
#[derive(Debug, Clone)]
pub struct ZincCompiler {
    java: PathBuf,
}

impl ZincCompiler {
    pub fn new(java: impl AsRef<Path>) -> Self {
        Self {
            java: java.as_ref().to_path_buf(),
        }
    }

    /// Builds the zinc invocation for a task
    pub fn command(&self, task: &ScalaCompile) -> BuildResult<Command> {
        if task.zinc_classpath.is_empty() {
            return Err(BuildError::new("the zinc classpath is empty").into());
        }
        let mut cmd = Command::new(&self.java);
        cmd.arg("-cp")
            .arg(join_paths(&task.zinc_classpath)?)
            .arg(ZINC_MAIN);

        let scala_path = task
            .zinc_classpath
            .iter()
            .filter(|jar| {
                jar.file_name()
                    .and_then(|name| name.to_str())
                    .map_or(false, |name| name.starts_with("scala-"))
            })
            .collect::<Vec<_>>();
        if !scala_path.is_empty() {
            cmd.arg("-scala-path").arg(join_paths(scala_path)?);
        }

        cmd.arg("-d").arg(&task.destination_dir);
        cmd.arg("-analysis-cache").arg(&task.analysis_file);
        if !task.classpath.is_empty() {
            cmd.arg("-classpath").arg(join_paths(&task.classpath)?);
        }
        if !task.options.boot_classpath.is_empty() {
            cmd.arg("-S-javabootclasspath")
                .arg(format!("-S{}", join_paths(&task.options.boot_classpath)?.to_string_lossy()));
        }
        if let Some(encoding) = &task.scala_options.encoding {
            cmd.arg("-S-encoding").arg(format!("-S{}", encoding));
        }
        if let Some(encoding) = &task.options.encoding {
            cmd.arg("-C-encoding").arg(format!("-C{}", encoding));
        }
        if !task.source_compatibility.is_empty() {
            cmd.arg("-C-source")
                .arg(format!("-C{}", task.source_compatibility));
        }
        if !task.target_compatibility.is_empty() {
            cmd.arg("-C-target")
                .arg(format!("-C{}", task.target_compatibility));
        }
        for parameter in &task.scala_options.additional_parameters {
            cmd.arg(format!("-S{}", parameter));
        }
        cmd.args(&task.source);
        Ok(cmd)
    }
}

impl Default for ZincCompiler {
    fn default() -> Self {
        Self::new("java")
    }
}

impl ToolRunner<ScalaCompile> for ZincCompiler {
    fn run(&self, task: &ScalaCompile) -> BuildResult {
        if task.source.is_empty() {
            info!("no sources to compile");
            return Ok(());
        }
        run_command(self.command(task)?)
    }
}
