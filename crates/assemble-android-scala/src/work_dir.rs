//! Where the plugin keeps its intermediate files.

use std::path::{Path, PathBuf};

/// The directory in the build directory owned by this plugin
pub const PLUGIN_DIR: &str = "android-scala";

/// Resolves the plugin's scratch paths. Nothing here touches the file system, directories are
/// created by the tasks that first write into them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkDirLayout {
    root: PathBuf,
}

impl WorkDirLayout {
    pub fn new(build_dir: impl AsRef<Path>) -> Self {
        Self {
            root: build_dir.as_ref().join(PLUGIN_DIR),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The scratch directory of a single variant, `<build>/android-scala/variant/<name>`
    pub fn work_dir(&self, variant: &str) -> PathBuf {
        self.root.join("variant").join(variant)
    }

    /// The proguard defaults for scala code
    pub fn scala_proguard_config(&self) -> PathBuf {
        self.root.join("proguard-android-scala.txt")
    }

    /// The proguard defaults for scala test code
    pub fn test_proguard_config(&self) -> PathBuf {
        self.root.join("proguard-android-scala-test.txt")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_only_depend_on_names() {
        let layout = WorkDirLayout::new("/project/build");
        assert_eq!(
            layout.work_dir("debugAndroidTest"),
            Path::new("/project/build/android-scala/variant/debugAndroidTest")
        );
        assert_eq!(layout.work_dir("debug"), layout.work_dir("debug"));
        assert_eq!(
            layout.test_proguard_config(),
            Path::new("/project/build/android-scala/proguard-android-scala-test.txt")
        );
        assert!(!layout.root().exists());
    }
}
