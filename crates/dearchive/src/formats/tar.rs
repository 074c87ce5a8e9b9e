//! TAR entry source.

use std::io::Read;

use crate::ExtractionError;
use crate::Result;
use crate::formats::traits::EntrySource;
use crate::formats::traits::SourceEntry;
use crate::types::Entry;

/// Entry source over a [`tar::Archive`].
///
/// Regular files, directories and symlinks are produced. Hard links,
/// device nodes and FIFOs are skipped with a debug log. GNU long names
/// and PAX headers are resolved by the `tar` crate.
///
/// The archive stays owned by the caller, since `tar::Entries` borrows it.
///
/// # Examples
///
/// ```no_run
/// use dearchive::Extractor;
/// use dearchive::formats::TarSource;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let file = std::fs::File::open("archive.tar")?;
/// let mut archive = tar::Archive::new(file);
/// let mut source = TarSource::new(&mut archive)?;
/// let report = Extractor::default().extract(&mut source, "/tmp/out")?;
/// # Ok(())
/// # }
/// ```
pub struct TarSource<'a, R: 'a + Read> {
    entries: tar::Entries<'a, R>,
    format_name: &'static str,
}

impl<'a, R: Read + 'a> TarSource<'a, R> {
    /// Starts iterating the entries of `archive`.
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError::InvalidArchive` if the archive has already
    /// been read from.
    pub fn new(archive: &'a mut tar::Archive<R>) -> Result<Self> {
        let entries = archive.entries().map_err(|e| {
            ExtractionError::InvalidArchive(format!("failed to read TAR entries: {e}"))
        })?;
        Ok(Self {
            entries,
            format_name: "tar",
        })
    }

    /// Overrides the reported format name, e.g. `tar.gz`.
    #[must_use]
    pub const fn with_format_name(mut self, name: &'static str) -> Self {
        self.format_name = name;
        self
    }
}

impl<'a, R: Read + 'a> EntrySource for TarSource<'a, R> {
    fn next_entry(&mut self) -> Result<Option<SourceEntry<'_>>> {
        for entry_result in self.entries.by_ref() {
            let tar_entry = entry_result.map_err(|e| {
                ExtractionError::InvalidArchive(format!("failed to read TAR entry: {e}"))
            })?;

            let name = String::from_utf8_lossy(&tar_entry.path_bytes()).into_owned();
            let header = tar_entry.header();
            let kind = header.entry_type();
            let mode = header.mode().unwrap_or_else(|e| {
                log::debug!("unreadable mode for '{name}': {e}");
                0
            });

            let entry = if kind.is_dir() {
                Entry::directory(name)
            } else if kind.is_symlink() {
                let target = tar_entry
                    .link_name_bytes()
                    .map(|t| String::from_utf8_lossy(&t).into_owned())
                    .unwrap_or_default();
                Entry::symlink(name, target)
            } else if kind.is_file() || kind.is_contiguous() || kind.is_gnu_sparse() {
                Entry::file(name, Some(tar_entry.size()))
            } else {
                log::debug!("skipping unsupported tar entry '{name}' ({kind:?})");
                continue;
            };

            let entry = entry.with_mode(mode);
            return Ok(Some(if entry.entry_type.is_file() {
                SourceEntry::new(entry, tar_entry)
            } else {
                SourceEntry::empty(entry)
            }));
        }
        Ok(None)
    }

    fn format_name(&self) -> &str {
        self.format_name
    }
}
