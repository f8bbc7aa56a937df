//! Adds scala source directories to every android source set.

use assemble_android::android::AndroidExtension;
use assemble_android::file_collection::SourceDirectorySet;
use assemble_android::plugins::extensions::ExtensionAware;
use assemble_android::{Project, ProjectResult};
use log::debug;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// The name the registry is registered under
pub const SCALA_SOURCE_SETS: &str = "scalaSourceSets";

/// The scala sources of every source set, by source set name
#[derive(Debug, Clone, Default)]
pub struct ScalaSourceSets {
    sets: BTreeMap<String, SourceDirectorySet>,
}

impl ScalaSourceSets {
    pub fn get(&self, source_set: &str) -> Option<&SourceDirectorySet> {
        self.sets.get(source_set)
    }

    /// The scala files of some source sets. Unknown source sets have no files.
    pub fn files<S: AsRef<str>>(&self, source_sets: &[S]) -> Vec<PathBuf> {
        source_sets
            .iter()
            .filter_map(|name| self.sets.get(name.as_ref()))
            .flat_map(SourceDirectorySet::files)
            .collect()
    }

    fn add(&mut self, source_set: &str, dir: &Path) {
        self.sets
            .entry(source_set.to_string())
            .or_insert_with(|| SourceDirectorySet::new(format!("{} Scala source", source_set)))
            .src_dir(dir)
            .include(SCALA_INCLUDE);
    }
}

const SCALA_INCLUDE: &str = "**/*.scala";

/// The conventional scala directory of a source set
pub fn scala_dir(project_dir: &Path, source_set: &str) -> PathBuf {
    project_dir.join("src").join(source_set).join("scala")
}

/// Adds `src/<name>/scala` to every android source set. The java source set only indexes
/// the directory, so javac never sees scala files.
///
/// Running this more than once adds nothing new for source sets that were already handled.
pub fn install(project: &mut Project) -> ProjectResult {
    let project_dir = project.project_dir().to_path_buf();
    if !project.extensions().contains(SCALA_SOURCE_SETS) {
        project
            .extensions_mut()
            .add(SCALA_SOURCE_SETS, ScalaSourceSets::default())?;
    }

    let mut registry = std::mem::take(project.require_extension_mut::<ScalaSourceSets>()?);
    let android = project.require_extension_mut::<AndroidExtension>()?;
    for source_set in android.source_sets_mut() {
        let dir = scala_dir(&project_dir, source_set.name());
        registry.add(source_set.name(), &dir);
        if let Some(scala) = registry.get(source_set.name()) {
            source_set.java.index_only(scala);
        }
        debug!("{} source set includes {:?}", source_set.name(), dir);
    }
    *project.require_extension_mut::<ScalaSourceSets>()? = registry;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn files_of_unknown_source_sets_are_empty() {
        let dir = tempfile::tempdir().unwrap();
        let main = scala_dir(dir.path(), "main");
        fs::create_dir_all(main.join("com/app")).unwrap();
        fs::write(main.join("com/app/Main.scala"), "").unwrap();
        fs::write(main.join("com/app/Notes.txt"), "").unwrap();

        let mut sets = ScalaSourceSets::default();
        sets.add("main", &main);
        sets.add("main", &main);
        assert_eq!(sets.get("main").map(|set| set.src_dirs().len()), Some(1));
        assert_eq!(
            sets.files(&["main", "free"]),
            vec![main.join("com/app/Main.scala")]
        );
        assert!(sets.files(&["free"]).is_empty());
    }
}
