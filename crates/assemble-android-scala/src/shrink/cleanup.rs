//! Removes test classes from production artifacts.

use assemble_android::android::archive::ArchiveEditor;
use log::{debug, warn};
use std::collections::BTreeSet;
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Collects failures instead of propagating them. Every failure is logged as a warning.
#[derive(Debug, Default)]
pub struct BestEffort {
    warnings: Vec<String>,
}

impl BestEffort {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, message: impl Display) {
        let message = message.to_string();
        warn!("{}", message);
        self.warnings.push(message);
    }

    /// Records the error of a failed operation, if it failed
    pub fn attempt<T, E: Display>(&mut self, context: impl Display, result: Result<T, E>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.warn(format_args!("{}: {}", context, e));
                None
            }
        }
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// What [`strip_test_classes`] did
#[derive(Debug, Default, PartialEq, Eq)]
pub struct StripReport {
    /// How many files or archive entries were removed
    pub removed: usize,
    /// Test files that weren't found in any output
    pub not_found: BTreeSet<String>,
}

/// The relative paths, separated by `/`, of every file in a directory
pub fn relative_files(dir: &Path) -> BTreeSet<String> {
    WalkDir::new(dir)
        .min_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            let relative = entry.path().strip_prefix(dir).ok()?;
            let parts = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>();
            Some(parts.join("/"))
        })
        .collect()
}

/// Removes every file found in `test_classes` from every output. Directory outputs lose the
/// file at the same relative path, archive outputs lose the entry with that name. Outputs that
/// don't exist are skipped.
///
/// Nothing here fails: removal errors are collected by `policy`.
pub fn strip_test_classes(
    test_classes: &Path,
    outputs: &[PathBuf],
    archives: &dyn ArchiveEditor,
    policy: &mut BestEffort,
) -> StripReport {
    let test_files = relative_files(test_classes);
    let mut report = StripReport {
        removed: 0,
        not_found: test_files.clone(),
    };
    if test_files.is_empty() {
        return report;
    }

    for output in outputs {
        if output.is_dir() {
            for file in &test_files {
                let path = output.join(file);
                if fs::symlink_metadata(&path).is_err() {
                    continue;
                }
                if policy
                    .attempt(format_args!("could not delete {:?}", path), fs::remove_file(&path))
                    .is_some()
                {
                    report.removed += 1;
                    report.not_found.remove(file);
                }
            }
        } else if output.is_file() {
            let entries = test_files.iter().cloned().collect::<Vec<_>>();
            let removed = policy.attempt(
                format_args!("could not remove test classes from {:?}", output),
                archives.remove_entries(output, &entries),
            );
            for entry in removed.unwrap_or_default() {
                report.removed += 1;
                report.not_found.remove(&entry);
            }
        } else {
            debug!("{:?} does not exist, nothing to strip", output);
        }
    }
    debug!(
        "removed {} test classes from {} outputs",
        report.removed,
        outputs.len()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use assemble_android::android::archive::{ArchiveError, ZipArchives};
    use std::io;
    use tempfile::tempdir;

    #[test]
    fn strips_directory_outputs() {
        let dir = tempdir().unwrap();
        let test_classes = dir.path().join("test");
        let production = dir.path().join("production");
        for root in [&test_classes, &production] {
            fs::create_dir_all(root.join("com/app")).unwrap();
            fs::write(root.join("com/app/FooTest.class"), "").unwrap();
        }
        fs::write(production.join("com/app/Main.class"), "").unwrap();
        fs::write(test_classes.join("com/app/OnlyTest.class"), "").unwrap();

        let mut policy = BestEffort::new();
        let report = strip_test_classes(
            &test_classes,
            &[production.clone(), dir.path().join("missing.jar")],
            &ZipArchives,
            &mut policy,
        );

        assert!(!production.join("com/app/FooTest.class").exists());
        assert!(production.join("com/app/Main.class").exists());
        assert_eq!(report.removed, 1);
        assert_eq!(
            report.not_found.into_iter().collect::<Vec<_>>(),
            vec!["com/app/OnlyTest.class"]
        );
        assert!(policy.is_clean());
    }

    #[test]
    fn archive_failures_are_warnings() {
        let dir = tempdir().unwrap();
        let test_classes = dir.path().join("test");
        fs::create_dir_all(&test_classes).unwrap();
        fs::write(test_classes.join("FooTest.class"), "").unwrap();
        let jar = dir.path().join("out.jar");
        fs::write(&jar, "").unwrap();

        let failing = |_: &Path, _: &[String]| -> Result<Vec<String>, ArchiveError> {
            Err(io::Error::new(io::ErrorKind::Other, "locked").into())
        };
        struct Failing<F>(F);
        impl<F> ArchiveEditor for Failing<F>
        where
            F: Fn(&Path, &[String]) -> Result<Vec<String>, ArchiveError> + Send + Sync,
        {
            fn remove_entries(
                &self,
                archive: &Path,
                entries: &[String],
            ) -> Result<Vec<String>, ArchiveError> {
                (self.0)(archive, entries)
            }
        }

        let mut policy = BestEffort::new();
        let report = strip_test_classes(&test_classes, &[jar], &Failing(failing), &mut policy);
        assert_eq!(report.removed, 0);
        assert_eq!(policy.warnings().len(), 1);
        assert!(policy.warnings()[0].contains("locked"));
    }

    #[test]
    fn directory_failures_are_warnings() {
        let dir = tempdir().unwrap();
        let test_classes = dir.path().join("test");
        let production = dir.path().join("production");
        fs::create_dir_all(test_classes.join("com/app")).unwrap();
        fs::write(test_classes.join("com/app/FooTest.class"), "").unwrap();
        fs::write(test_classes.join("com/app/BarTest.class"), "").unwrap();
        // a directory where a class file is expected can't be removed as a file
        fs::create_dir_all(production.join("com/app/FooTest.class")).unwrap();
        fs::write(production.join("com/app/BarTest.class"), "").unwrap();

        let mut policy = BestEffort::new();
        let report = strip_test_classes(&test_classes, &[production.clone()], &ZipArchives, &mut policy);

        assert_eq!(report.removed, 1);
        assert!(!production.join("com/app/BarTest.class").exists());
        assert!(production.join("com/app/FooTest.class").is_dir());
        assert_eq!(
            report.not_found.into_iter().collect::<Vec<_>>(),
            vec!["com/app/FooTest.class"]
        );
        assert_eq!(policy.warnings().len(), 1);
        assert!(policy.warnings()[0].contains("could not delete"));
    }
}
