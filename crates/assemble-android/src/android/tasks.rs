//! The android tasks: java compilation, dexing and proguard.

use crate::exception::{BuildError, BuildResult};
use crate::project::Project;
use crate::task::runner::{run_command, Runner};
use crate::task::{Executable, Task, ToolRunner};
use log::info;
use std::env::join_paths;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Options shared by jvm compilers
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    pub encoding: Option<String>,
    pub boot_classpath: Vec<PathBuf>,
    pub compiler_args: Vec<String>,
}

/// Compiles java sources
#[derive(Debug, Default)]
pub struct JavaCompile {
    pub source: Vec<PathBuf>,
    pub classpath: Vec<PathBuf>,
    pub destination_dir: PathBuf,
    pub source_compatibility: String,
    pub target_compatibility: String,
    pub options: CompileOptions,
    pub compiler: Runner<JavaCompile>,
}

impl Task for JavaCompile {
    fn task_action(task: &mut Executable<Self>, _project: &Project) -> BuildResult {
        fs::create_dir_all(&task.destination_dir)?;
        task.compiler.run(task.task_id(), &task.task)
    }
}

/// Runs `javac`
#[derive(Debug, Clone)]
pub struct Javac {
    executable: PathBuf,
}

impl Javac {
    pub fn new(executable: impl AsRef<Path>) -> Self {
        Self {
            executable: executable.as_ref().to_path_buf(),
        }
    }
}

impl Default for Javac {
    fn default() -> Self {
        Self::new("javac")
    }
}

impl ToolRunner<JavaCompile> for Javac {
    fn run(&self, task: &JavaCompile) -> BuildResult {
        if task.source.is_empty() {
            info!("no java sources, skipping javac");
            return Ok(());
        }
        let mut cmd = Command::new(&self.executable);
        cmd.arg("-d").arg(&task.destination_dir);
        if !task.classpath.is_empty() {
            cmd.arg("-classpath").arg(join_paths(&task.classpath)?);
        }
        if !task.options.boot_classpath.is_empty() {
            cmd.arg("-bootclasspath")
                .arg(join_paths(&task.options.boot_classpath)?);
        }
        if let Some(encoding) = &task.options.encoding {
            cmd.arg("-encoding").arg(encoding);
        }
        if !task.source_compatibility.is_empty() {
            cmd.arg("-source").arg(&task.source_compatibility);
        }
        if !task.target_compatibility.is_empty() {
            cmd.arg("-target").arg(&task.target_compatibility);
        }
        cmd.args(&task.options.compiler_args);
        cmd.args(&task.source);
        run_command(cmd)
    }
}

/// Converts class files into dex files
#[derive(Debug, Default)]
pub struct Dex {
    pub input_files: Vec<PathBuf>,
    pub libraries: Vec<PathBuf>,
    pub output_dir: PathBuf,
    pub dexer: Runner<Dex>,
}

impl Dex {
    /// Makes a single jar the only input of this task. The separate library list is cleared, as
    /// the jar is expected to already contain the libraries.
    pub fn redirect_to(&mut self, jar: impl AsRef<Path>) {
        self.input_files = vec![jar.as_ref().to_path_buf()];
        self.libraries.clear();
    }
}

impl Task for Dex {
    fn task_action(task: &mut Executable<Self>, _project: &Project) -> BuildResult {
        task.dexer.run(task.task_id(), &task.task)
    }
}

/// A jar (or class directory) passed to proguard, with an optional filter such as
/// `!META-INF/MANIFEST.MF`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JarSpec {
    pub path: PathBuf,
    pub filter: Option<String>,
}

impl JarSpec {
    fn render(&self) -> String {
        match &self.filter {
            Some(filter) => format!("{}({})", self.path.display(), filter),
            None => self.path.display().to_string(),
        }
    }
}

/// Shrinks, optimizes and obfuscates classes
#[derive(Debug)]
pub struct ProGuard {
    configuration_files: Vec<PathBuf>,
    injars: Vec<JarSpec>,
    library_jars: Vec<JarSpec>,
    out_jars: Vec<JarSpec>,
    keeps: Vec<String>,
    obfuscation: bool,
    optimization: bool,
    shrinking: bool,
    print_configuration: Option<PathBuf>,
    pub shrinker: Runner<ProGuard>,
}

impl Default for ProGuard {
    fn default() -> Self {
        Self {
            configuration_files: vec![],
            injars: vec![],
            library_jars: vec![],
            out_jars: vec![],
            keeps: vec![],
            obfuscation: true,
            optimization: true,
            shrinking: true,
            print_configuration: None,
            shrinker: Runner::default(),
        }
    }
}

impl ProGuard {
    /// Adds a configuration file. Adding the same file twice has no effect.
    pub fn configuration(&mut self, file: impl AsRef<Path>) {
        let file = file.as_ref().to_path_buf();
        if !self.configuration_files.contains(&file) {
            self.configuration_files.push(file);
        }
    }

    pub fn configuration_files(&self) -> &[PathBuf] {
        &self.configuration_files
    }

    pub fn injars(&mut self, path: impl AsRef<Path>, filter: Option<&str>) {
        self.injars.push(JarSpec {
            path: path.as_ref().to_path_buf(),
            filter: filter.map(str::to_string),
        });
    }

    pub fn libraryjars(&mut self, path: impl AsRef<Path>, filter: Option<&str>) {
        self.library_jars.push(JarSpec {
            path: path.as_ref().to_path_buf(),
            filter: filter.map(str::to_string),
        });
    }

    pub fn outjars(&mut self, path: impl AsRef<Path>, filter: Option<&str>) {
        self.out_jars.push(JarSpec {
            path: path.as_ref().to_path_buf(),
            filter: filter.map(str::to_string),
        });
    }

    pub fn in_jars(&self) -> &[JarSpec] {
        &self.injars
    }

    pub fn library_jars(&self) -> &[JarSpec] {
        &self.library_jars
    }

    pub fn out_jars(&self) -> &[JarSpec] {
        &self.out_jars
    }

    /// The files proguard produces
    pub fn out_jar_files(&self) -> Vec<PathBuf> {
        self.out_jars.iter().map(|spec| spec.path.clone()).collect()
    }

    /// Adds a keep rule, such as `class com.app.** { *; }`
    pub fn keep(&mut self, rule: impl AsRef<str>) {
        self.keeps.push(rule.as_ref().to_string());
    }

    pub fn keeps(&self) -> &[String] {
        &self.keeps
    }

    pub fn dont_obfuscate(&mut self) {
        self.obfuscation = false;
    }

    pub fn dont_optimize(&mut self) {
        self.optimization = false;
    }

    pub fn dont_shrink(&mut self) {
        self.shrinking = false;
    }

    pub fn obfuscation(&self) -> bool {
        self.obfuscation
    }

    pub fn optimization(&self) -> bool {
        self.optimization
    }

    pub fn shrinking(&self) -> bool {
        self.shrinking
    }

    /// Writes the fully resolved configuration to a file when the task runs
    pub fn print_configuration(&mut self, file: impl AsRef<Path>) {
        self.print_configuration = Some(file.as_ref().to_path_buf());
    }

    pub fn print_configuration_file(&self) -> Option<&Path> {
        self.print_configuration.as_deref()
    }

    /// Renders every option of this task as proguard directives
    pub fn render_configuration(&self) -> String {
        let mut output = String::new();
        for file in &self.configuration_files {
            let _ = writeln!(output, "-include {}", file.display());
        }
        for spec in &self.injars {
            let _ = writeln!(output, "-injars {}", spec.render());
        }
        for spec in &self.library_jars {
            let _ = writeln!(output, "-libraryjars {}", spec.render());
        }
        for spec in &self.out_jars {
            let _ = writeln!(output, "-outjars {}", spec.render());
        }
        for keep in &self.keeps {
            let _ = writeln!(output, "-keep {}", keep);
        }
        if !self.shrinking {
            output.push_str("-dontshrink\n");
        }
        if !self.optimization {
            output.push_str("-dontoptimize\n");
        }
        if !self.obfuscation {
            output.push_str("-dontobfuscate\n");
        }
        output
    }
}

impl Task for ProGuard {
    fn task_action(task: &mut Executable<Self>, _project: &Project) -> BuildResult {
        if let Some(file) = &task.print_configuration {
            if let Some(parent) = file.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(file, task.render_configuration())?;
        }
        for out in &task.out_jars {
            if let Some(parent) = out.path.parent() {
                fs::create_dir_all(parent)?;
            }
        }
        task.shrinker.run(task.task_id(), &task.task)
    }
}

/// Runs proguard from its jar with `java -jar proguard.jar @<configuration>`
#[derive(Debug, Clone)]
pub struct ProGuardCli {
    java: PathBuf,
    proguard_jar: PathBuf,
}

impl ProGuardCli {
    pub fn new(proguard_jar: impl AsRef<Path>) -> Self {
        Self {
            java: PathBuf::from("java"),
            proguard_jar: proguard_jar.as_ref().to_path_buf(),
        }
    }
}

impl ToolRunner<ProGuard> for ProGuardCli {
    fn run(&self, task: &ProGuard) -> BuildResult {
        let configuration = tempfile::Builder::new()
            .prefix("proguard")
            .suffix(".pro")
            .tempfile()?;
        fs::write(configuration.path(), task.render_configuration())?;
        if task.out_jars.is_empty() {
            return Err(BuildError::new("proguard requires at least one -outjars").into());
        }
        let mut cmd = Command::new(&self.java);
        cmd.arg("-jar")
            .arg(&self.proguard_jar)
            .arg(format!("@{}", configuration.path().display()));
        run_command(cmd)
    }
}
