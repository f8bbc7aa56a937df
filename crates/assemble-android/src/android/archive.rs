//! Editing of packaged archives

use log::trace;
use std::collections::BTreeSet;
use std::fs::File;
use std::io;
use std::path::Path;
use tempfile::NamedTempFile;
use zip::result::ZipError;
use zip::{ZipArchive, ZipWriter};

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("{archive}: {source}")]
    Zip {
        archive: String,
        #[source]
        source: ZipError,
    },
}

/// Removes entries from archives in place
pub trait ArchiveEditor: Send + Sync {
    /// Removes the entries with these names, such as `com/app/FooTest.class`, returning the names
    /// that were actually removed. Names that aren't in the archive are ignored.
    fn remove_entries(&self, archive: &Path, entries: &[String])
        -> Result<Vec<String>, ArchiveError>;
}

assert_obj_safe!(ArchiveEditor);

/// Edits zip (and jar) archives by rewriting them without the removed entries
#[derive(Debug, Default, Clone, Copy)]
pub struct ZipArchives;

impl ArchiveEditor for ZipArchives {
    fn remove_entries(
        &self,
        archive: &Path,
        entries: &[String],
    ) -> Result<Vec<String>, ArchiveError> {
        let zip_error = |source: ZipError| ArchiveError::Zip {
            archive: archive.display().to_string(),
            source,
        };
        let wanted: BTreeSet<&str> = entries.iter().map(String::as_str).collect();

        let mut reader = ZipArchive::new(File::open(archive)?).map_err(zip_error)?;
        if !reader.file_names().any(|name| wanted.contains(name)) {
            trace!("nothing to remove from {:?}", archive);
            return Ok(vec![]);
        }

        let parent = archive.parent().unwrap_or_else(|| Path::new("."));
        let mut rewritten = NamedTempFile::new_in(parent)?;
        let mut removed = vec![];
        {
            let mut writer = ZipWriter::new(rewritten.as_file_mut());
            for index in 0..reader.len() {
                let entry = reader.by_index_raw(index).map_err(zip_error)?;
                if wanted.contains(entry.name()) {
                    removed.push(entry.name().to_string());
                    continue;
                }
                writer.raw_copy_file(entry).map_err(zip_error)?;
            }
            writer.finish().map_err(zip_error)?;
        }
        drop(reader);
        rewritten.persist(archive).map_err(|e| e.error)?;
        Ok(removed)
    }
}
