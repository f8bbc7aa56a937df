//! Defines source directory sets, collections of files found in a set of directories.

use glob::Pattern;
use log::warn;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A named set of source directories, filtered by include patterns.
///
/// A set can also carry *indexed* directories. Those are visible to tools inspecting the set,
/// but never contribute to [`files`](SourceDirectorySet::files).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceDirectorySet {
    name: String,
    src_dirs: BTreeSet<PathBuf>,
    includes: BTreeSet<String>,
    indexed: BTreeMap<PathBuf, BTreeSet<String>>,
}

impl SourceDirectorySet {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            name: name.as_ref().to_string(),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds a source directory. Adding the same directory twice has no effect.
    pub fn src_dir(&mut self, dir: impl AsRef<Path>) -> &mut Self {
        self.src_dirs.insert(dir.as_ref().to_path_buf());
        self
    }

    /// Adds an include pattern, such as `**/*.java`. No include patterns includes every file.
    pub fn include(&mut self, pattern: impl AsRef<str>) -> &mut Self {
        self.includes.insert(pattern.as_ref().to_string());
        self
    }

    /// Makes the directories of another set visible through this one without compiling them.
    pub fn index_only(&mut self, other: &SourceDirectorySet) -> &mut Self {
        for dir in &other.src_dirs {
            self.indexed
                .entry(dir.clone())
                .or_default()
                .extend(other.includes.iter().cloned());
        }
        self
    }

    pub fn src_dirs(&self) -> &BTreeSet<PathBuf> {
        &self.src_dirs
    }

    pub fn includes(&self) -> &BTreeSet<String> {
        &self.includes
    }

    pub fn indexed_dirs(&self) -> &BTreeMap<PathBuf, BTreeSet<String>> {
        &self.indexed
    }

    /// Every directory visible through this set, compiled or indexed
    pub fn all_dirs(&self) -> BTreeSet<PathBuf> {
        self.src_dirs
            .iter()
            .chain(self.indexed.keys())
            .cloned()
            .collect()
    }

    /// Gets the files of the source directories that match the include patterns.
    pub fn files(&self) -> Vec<PathBuf> {
        let patterns: Vec<Pattern> = self
            .includes
            .iter()
            .filter_map(|p| match Pattern::new(p) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    warn!("ignoring invalid pattern {:?} in {}: {}", p, self.name, e);
                    None
                }
            })
            .collect();

        let mut output = BTreeSet::new();
        for dir in &self.src_dirs {
            if !dir.is_dir() {
                continue;
            }
            for entry in WalkDir::new(dir).into_iter().filter_map(Result::ok) {
                if !entry.file_type().is_file() {
                    continue;
                }
                let relative = entry.path().strip_prefix(dir).unwrap_or(entry.path());
                if patterns.is_empty() || patterns.iter().any(|p| p.matches_path(relative)) {
                    output.insert(entry.into_path());
                }
            }
        }
        output.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn files_respect_includes() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("com/app")).unwrap();
        fs::write(dir.path().join("com/app/Main.scala"), "").unwrap();
        fs::write(dir.path().join("com/app/Helper.java"), "").unwrap();

        let mut set = SourceDirectorySet::new("main Scala source");
        set.src_dir(dir.path()).include("**/*.scala");
        assert_eq!(set.files(), vec![dir.path().join("com/app/Main.scala")]);
    }

    #[test]
    fn indexed_dirs_are_not_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("Main.scala"), "").unwrap();

        let mut scala = SourceDirectorySet::new("scala");
        scala.src_dir(dir.path()).include("**/*.scala");
        let mut java = SourceDirectorySet::new("java");
        java.include("**/*.java");
        java.index_only(&scala).index_only(&scala);

        assert!(java.files().is_empty());
        assert_eq!(java.indexed_dirs().len(), 1);
        assert!(java.all_dirs().contains(dir.path()));
    }
}
