//! Makes proguard aware of scala classes.
//!
//! Production variants of applications get their own proguard task that shrinks the merged
//! java and scala classes. Test variants get a proguard task that shrinks the test classes
//! against the already shrunk production classes, after which the test classes are stripped
//! from the production artifact again.

use assemble_android::android::tasks::ProGuard;
use indexmap::IndexSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub mod cleanup;
pub mod production;
pub mod test;

/// Filter applied to the jars proguard writes
pub const MANIFEST_FILTER: &str = "!META-INF/MANIFEST.MF";

/// Default proguard rules for scala code
pub const SCALA_PROGUARD_DEFAULTS: &str = include_str!("../resources/proguard-android-scala.txt");

/// Default proguard rules for scala test code
pub const SCALA_TEST_PROGUARD_DEFAULTS: &str =
    include_str!("../resources/proguard-android-scala-test.txt");

/// A generated proguard configuration file declaring a directory of classes as input.
///
/// Fragments are written when the task using them runs, and rewritten on every run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFragment {
    path: PathBuf,
    injars: PathBuf,
}

impl ConfigFragment {
    pub fn injars(path: impl AsRef<Path>, classes: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            injars: classes.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The directory declared by this fragment
    pub fn declared(&self) -> &Path {
        &self.injars
    }

    pub fn contents(&self) -> String {
        format!("-injars {}\n", self.injars.display())
    }

    pub fn write(&self) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, self.contents())
    }
}

/// Sorts the jars of a shrink task into input jars and library jars.
///
/// Input jars are the candidates for input, minus anything already declared elsewhere and
/// anything forced to be a library. Library jars are the library candidates and forced
/// libraries that aren't input jars. No jar is ever both.
#[derive(Debug, Clone, Default)]
pub struct JarSelection {
    input: IndexSet<PathBuf>,
    library: IndexSet<PathBuf>,
    declared: IndexSet<PathBuf>,
    forced_library: IndexSet<PathBuf>,
}

impl JarSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input<I: IntoIterator<Item = PathBuf>>(&mut self, jars: I) -> &mut Self {
        self.input.extend(jars);
        self
    }

    pub fn library<I: IntoIterator<Item = PathBuf>>(&mut self, jars: I) -> &mut Self {
        self.library.extend(jars);
        self
    }

    /// A jar or directory that is already passed to proguard through a configuration file
    pub fn declared(&mut self, path: impl AsRef<Path>) -> &mut Self {
        self.declared.insert(path.as_ref().to_path_buf());
        self
    }

    /// Jars that must be library jars, even if they are input candidates
    pub fn force_library<I: IntoIterator<Item = PathBuf>>(&mut self, jars: I) -> &mut Self {
        self.forced_library.extend(jars);
        self
    }

    pub fn in_jars(&self) -> Vec<PathBuf> {
        self.input
            .iter()
            .filter(|jar| !self.declared.contains(*jar) && !self.forced_library.contains(*jar))
            .cloned()
            .collect()
    }

    pub fn library_jars(&self) -> Vec<PathBuf> {
        let in_jars: IndexSet<PathBuf> = self.in_jars().into_iter().collect();
        self.library
            .iter()
            .chain(&self.forced_library)
            .filter(|jar| !in_jars.contains(*jar) && !self.declared.contains(*jar))
            .cloned()
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect()
    }

    /// Passes the selection to a proguard task
    pub fn apply_to(&self, proguard: &mut ProGuard) {
        for jar in self.in_jars() {
            proguard.injars(jar, None);
        }
        for jar in self.library_jars() {
            proguard.libraryjars(jar, None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn selection_never_repeats_a_jar() {
        let mut selection = JarSelection::new();
        selection
            .input(paths(&["classes", "support.jar", "scala-library.jar"]))
            .library(paths(&["android.jar", "support.jar", "android.jar"]))
            .declared("classes");

        assert_eq!(selection.in_jars(), paths(&["support.jar", "scala-library.jar"]));
        assert_eq!(selection.library_jars(), paths(&["android.jar"]));
    }

    #[test]
    fn forced_libraries_are_not_input() {
        let mut selection = JarSelection::new();
        selection
            .input(paths(&["app.jar", "support.jar"]))
            .force_library(paths(&["app.jar"]));
        assert_eq!(selection.in_jars(), paths(&["support.jar"]));
        assert_eq!(selection.library_jars(), paths(&["app.jar"]));
    }

    #[test]
    fn fragment_declares_injars() {
        let dir = tempfile::tempdir().unwrap();
        let fragment = ConfigFragment::injars(dir.path().join("a/b/injars.txt"), "/classes");
        fragment.write().unwrap();
        assert_eq!(
            fs::read_to_string(fragment.path()).unwrap(),
            "-injars /classes\n"
        );
    }
}
