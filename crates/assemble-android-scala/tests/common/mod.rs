//! A small android project with fake tools, shared by the integration tests.

#![allow(dead_code)]

use assemble_android::android::tasks::{JavaCompile, ProGuard};
use assemble_android::android::{AndroidExtension, AppPlugin, LibraryPlugin};
use assemble_android::dependencies::{AcquisitionError, ExternalDependency};
use assemble_android::logging::{init_root_logger, OutputType};
use assemble_android::plugins::extensions::ExtensionAware;
use assemble_android::task::runner::Runner;
use assemble_android::{BuildResult, Project};
use log::LevelFilter;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use zip::write::FileOptions;
use zip::{ZipArchive, ZipWriter};

pub const REPOSITORY: &str = "/repo";

pub fn init_logging() {
    let _ = init_root_logger(LevelFilter::Debug, OutputType::Basic);
}

/// Writes a jar with some entries
pub fn jar(path: &Path, entries: &[(&str, &[u8])]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let mut writer = ZipWriter::new(File::create(path).unwrap());
    for (name, content) in entries {
        writer.start_file(*name, FileOptions::default()).unwrap();
        writer.write_all(content).unwrap();
    }
    writer.finish().unwrap();
}

/// The entry names of a jar, sorted
pub fn jar_entries(path: &Path) -> Vec<String> {
    let archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut names = archive.file_names().map(str::to_string).collect::<Vec<_>>();
    names.sort();
    names
}

/// Writes a scala library jar of some version
pub fn scala_library(dir: &Path, version: &str) -> PathBuf {
    let path = dir.join(format!("libs/scala-library-{}.jar", version));
    let properties = format!("version.number={}\nmaven.version.number={}\n", version, version);
    jar(
        &path,
        &[
            ("scala/util/Properties.class", b"".as_slice()),
            ("scala/Option.class", b"".as_slice()),
            ("library.properties", properties.as_bytes()),
        ],
    );
    path
}

/// Writes a source file of a source set, such as `("main", "scala", "com/app/Main.scala")`
pub fn source(project: &Project, source_set: &str, language: &str, file: &str) -> PathBuf {
    let path = project
        .project_dir()
        .join("src")
        .join(source_set)
        .join(language)
        .join(file);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, format!("// {}", file)).unwrap();
    path
}

/// Creates an android project with a platform jar on its boot classpath.
pub fn android_project(name: &str, library: bool) -> Project {
    init_logging();
    let mut project = Project::temp(name);
    if library {
        project.apply_plugin::<LibraryPlugin>().unwrap();
    } else {
        project.apply_plugin::<AppPlugin>().unwrap();
    }
    let android_jar = project.project_dir().join("sdk/android.jar");
    jar(&android_jar, &[("android/app/Activity.class", b"".as_slice())]);
    project
        .extension_mut::<AndroidExtension>()
        .unwrap()
        .boot_classpath
        .push(android_jar);
    project.set_dependency_resolver(
        |dependency: &ExternalDependency| -> Result<Vec<PathBuf>, AcquisitionError> {
            Ok(vec![Path::new(REPOSITORY).join(dependency.repository_path())])
        },
    );
    project
}

/// The class file a fake compiler produces for a source, relative to its destination
pub fn class_file(source: &Path) -> PathBuf {
    let components = source
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>();
    let root = components
        .iter()
        .rposition(|c| c == "java" || c == "scala")
        .map_or(0, |index| index + 1);
    let mut class: PathBuf = components[root..].iter().collect();
    class.set_extension("class");
    class
}

fn write_class(destination: &Path, source: &Path, compiler: &str) -> BuildResult {
    let class = destination.join(class_file(source));
    fs::create_dir_all(class.parent().unwrap_or(destination))?;
    fs::write(class, compiler)?;
    Ok(())
}

/// A javac that writes one class per java source
pub fn fake_javac() -> Runner<JavaCompile> {
    Runner::new(|task: &JavaCompile| -> BuildResult {
        for source in &task.source {
            write_class(&task.destination_dir, source, "javac")?;
        }
        Ok(())
    })
}

/// Reads the directories declared with `-injars` in configuration files
fn declared_injars(task: &ProGuard) -> Vec<PathBuf> {
    task.configuration_files()
        .iter()
        .filter_map(|file| fs::read_to_string(file).ok())
        .flat_map(|text| {
            text.lines()
                .filter_map(|line| line.strip_prefix("-injars "))
                .map(PathBuf::from)
                .collect::<Vec<_>>()
        })
        .collect()
}

/// A proguard that copies every class of its input directories into each of its outputs.
/// Outputs ending in `.jar` are written as jars, other outputs as directories.
pub fn fake_proguard() -> Runner<ProGuard> {
    Runner::new(|task: &ProGuard| -> BuildResult {
        let mut classes: BTreeMap<String, Vec<u8>> = BTreeMap::new();
        let inputs = declared_injars(task)
            .into_iter()
            .chain(task.in_jars().iter().map(|spec| spec.path.clone()));
        for input in inputs.filter(|input| input.is_dir()) {
            for file in assemble_android_scala::shrink::cleanup::relative_files(&input) {
                let mut content = vec![];
                File::open(input.join(&file))?.read_to_end(&mut content)?;
                classes.insert(file, content);
            }
        }
        for out in task.out_jar_files() {
            if out.extension().map_or(false, |ext| ext == "jar") {
                let entries = classes
                    .iter()
                    .map(|(name, content)| (name.as_str(), content.as_slice()))
                    .collect::<Vec<_>>();
                jar(&out, &entries);
            } else {
                for (name, content) in &classes {
                    let path = out.join(name);
                    fs::create_dir_all(path.parent().unwrap_or(&out))?;
                    fs::write(path, content)?;
                }
            }
        }
        Ok(())
    })
}
