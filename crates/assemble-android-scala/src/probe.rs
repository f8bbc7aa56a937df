//! Detects the scala runtime on a classpath.
//!
//! The classpath is searched the way a class loader dedicated to it would search it: entries
//! are opened one after another, in order, until one of them defines the runtime's marker
//! class. The loader itself is a [`ProbeContext`], which holds every archive it opened and
//! releases them when closed.

use log::{debug, trace};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;
use zip::result::ZipError;
use zip::ZipArchive;

/// The class that is only present if the scala library is on the classpath
pub const MARKER_CLASS: &str = "scala/util/Properties.class";

/// The resource the scala library reports its version from
pub const VERSION_RESOURCE: &str = "library.properties";

const VERSION_KEY: &str = "version.number";

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("could not read classpath entry {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("classpath entry {path:?} is not a readable archive")]
    Archive {
        path: PathBuf,
        #[source]
        source: ZipError,
    },
    #[error("{path:?} contains the scala runtime but doesn't declare its version")]
    MissingVersion { path: PathBuf },
}

/// Finds the version of the scala library on a classpath, if the library is there.
///
/// # Error
/// Errors if a classpath entry can not be read. A classpath without the scala library is not
/// an error.
pub fn scala_version(classpath: &[PathBuf]) -> Result<Option<String>, ProbeError> {
    let mut context = ProbeContext::open(classpath);
    let version = context.scala_version();
    context.close();
    version
}

enum ClassRoot {
    Directory(PathBuf),
    Archive {
        path: PathBuf,
        archive: ZipArchive<File>,
    },
}

impl ClassRoot {
    fn open(path: &Path) -> Result<Option<Self>, ProbeError> {
        if path.is_dir() {
            return Ok(Some(ClassRoot::Directory(path.to_path_buf())));
        }
        if !path.is_file() {
            trace!("skipping missing classpath entry {:?}", path);
            return Ok(None);
        }
        let file = File::open(path).map_err(|source| ProbeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let archive = ZipArchive::new(file).map_err(|source| ProbeError::Archive {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Some(ClassRoot::Archive {
            path: path.to_path_buf(),
            archive,
        }))
    }

    fn path(&self) -> &Path {
        match self {
            ClassRoot::Directory(path) => path,
            ClassRoot::Archive { path, .. } => path,
        }
    }

    fn defines(&self, resource: &str) -> bool {
        match self {
            ClassRoot::Directory(path) => path.join(resource).is_file(),
            ClassRoot::Archive { archive, .. } => archive.file_names().any(|name| name == resource),
        }
    }

    fn read(&mut self, resource: &str) -> Result<Option<String>, ProbeError> {
        match self {
            ClassRoot::Directory(path) => {
                let file = path.join(resource);
                if !file.is_file() {
                    return Ok(None);
                }
                fs::read_to_string(&file)
                    .map(Some)
                    .map_err(|source| ProbeError::Io { path: file, source })
            }
            ClassRoot::Archive { path, archive } => {
                let mut entry = match archive.by_name(resource) {
                    Ok(entry) => entry,
                    Err(ZipError::FileNotFound) => return Ok(None),
                    Err(source) => {
                        return Err(ProbeError::Archive {
                            path: path.clone(),
                            source,
                        })
                    }
                };
                let mut text = String::new();
                entry
                    .read_to_string(&mut text)
                    .map_err(|source| ProbeError::Io {
                        path: path.clone(),
                        source,
                    })?;
                Ok(Some(text))
            }
        }
    }
}

/// An isolated view of a classpath. Entries are only opened when a lookup reaches them.
pub struct ProbeContext {
    pending: std::vec::IntoIter<PathBuf>,
    opened: Vec<ClassRoot>,
}

impl ProbeContext {
    pub fn open(classpath: &[PathBuf]) -> Self {
        Self {
            pending: classpath.to_vec().into_iter(),
            opened: vec![],
        }
    }

    /// Finds the first classpath entry that defines a resource, returning its index in the
    /// opened entries.
    fn find(&mut self, resource: &str) -> Result<Option<usize>, ProbeError> {
        if let Some(index) = self.opened.iter().position(|root| root.defines(resource)) {
            return Ok(Some(index));
        }
        for path in self.pending.by_ref() {
            if let Some(root) = ClassRoot::open(&path)? {
                let defines = root.defines(resource);
                self.opened.push(root);
                if defines {
                    return Ok(Some(self.opened.len() - 1));
                }
            }
        }
        Ok(None)
    }

    /// Whether a class, such as `scala/Option.class`, can be found
    #[cfg(test)]
    fn contains(&mut self, class: &str) -> Result<bool, ProbeError> {
        Ok(self.find(class)?.is_some())
    }

    /// The version of the scala library, read from the entry that defines the library's marker
    /// class.
    pub fn scala_version(&mut self) -> Result<Option<String>, ProbeError> {
        let index = match self.find(MARKER_CLASS)? {
            Some(index) => index,
            None => return Ok(None),
        };
        let root = &mut self.opened[index];
        let path = root.path().to_path_buf();
        let properties = root
            .read(VERSION_RESOURCE)?
            .ok_or_else(|| ProbeError::MissingVersion { path: path.clone() })?;
        let version = parse_properties(&properties)
            .remove(VERSION_KEY)
            .ok_or(ProbeError::MissingVersion { path: path.clone() })?;
        debug!("found scala {} in {:?}", version, path);
        Ok(Some(version))
    }

    /// Releases every opened entry.
    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if !self.opened.is_empty() {
            trace!("closing {} classpath entries", self.opened.len());
        }
        self.opened.clear();
    }
}

impl Drop for ProbeContext {
    fn drop(&mut self) {
        self.release();
    }
}

/// Parses java properties, one `key=value` or `key: value` per line
fn parse_properties(text: &str) -> BTreeMap<String, String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('!'))
        .filter_map(|line| {
            let split = line.find(|c: char| c == '=' || c == ':')?;
            let (key, value) = line.split_at(split);
            Some((key.trim().to_string(), value[1..].trim().to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;
    use zip::write::FileOptions;
    use zip::ZipWriter;

    fn jar(path: &Path, entries: &[(&str, &str)]) {
        let mut writer = ZipWriter::new(File::create(path).unwrap());
        for (name, content) in entries {
            writer.start_file(*name, FileOptions::default()).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
    }

    #[test]
    fn finds_version_in_archive() {
        let dir = tempdir().unwrap();
        let library = dir.path().join("scala-library-2.11.7.jar");
        jar(
            &library,
            &[
                (MARKER_CLASS, ""),
                (VERSION_RESOURCE, "#comment\nversion.number=2.11.7\nosgi.version.number:2.11.7.v20150622"),
            ],
        );
        let other = dir.path().join("support.jar");
        jar(&other, &[("android/support/Foo.class", "")]);

        let version = scala_version(&[other, dir.path().join("missing.jar"), library]).unwrap();
        assert_eq!(version.as_deref(), Some("2.11.7"));
    }

    #[test]
    fn finds_version_in_directory() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("scala/util")).unwrap();
        fs::write(dir.path().join(MARKER_CLASS), "").unwrap();
        fs::write(dir.path().join(VERSION_RESOURCE), "version.number = 2.12.1\n").unwrap();
        assert_eq!(
            scala_version(&[dir.path().to_path_buf()]).unwrap(),
            Some("2.12.1".to_string())
        );
    }

    #[test]
    fn absent_runtime_is_not_an_error() {
        let dir = tempdir().unwrap();
        let other = dir.path().join("support.jar");
        jar(&other, &[("android/support/Foo.class", "")]);
        assert_eq!(scala_version(&[other]).unwrap(), None);
        assert_eq!(scala_version(&[]).unwrap(), None);
    }

    #[test]
    fn corrupt_archive_is_an_error() {
        let dir = tempdir().unwrap();
        let broken = dir.path().join("broken.jar");
        fs::write(&broken, "definitely not a zip").unwrap();
        assert!(matches!(
            scala_version(&[broken]),
            Err(ProbeError::Archive { .. })
        ));
    }

    #[test]
    fn marker_without_version() {
        let dir = tempdir().unwrap();
        let library = dir.path().join("scala-library.jar");
        jar(&library, &[(MARKER_CLASS, "")]);
        assert!(matches!(
            scala_version(&[library]),
            Err(ProbeError::MissingVersion { .. })
        ));
    }

    #[test]
    fn lookups_reuse_opened_entries() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("first.jar");
        jar(&first, &[("a/A.class", "")]);
        let second = dir.path().join("second.jar");
        jar(&second, &[("b/B.class", "")]);

        let mut context = ProbeContext::open(&[first, second]);
        assert!(context.contains("b/B.class").unwrap());
        assert!(context.contains("a/A.class").unwrap());
        assert!(!context.contains("c/C.class").unwrap());
        context.close();
    }
}
