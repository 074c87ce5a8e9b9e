//! In-memory entry source.

use std::collections::VecDeque;
use std::io::Cursor;

use crate::Result;
use crate::formats::traits::EntrySource;
use crate::formats::traits::SourceEntry;
use crate::types::Entry;

/// Entry source over entries already held in memory.
///
/// Useful when entries come from somewhere other than an archive file, and
/// for tests.
///
/// # Examples
///
/// ```
/// use dearchive::formats::EntrySource;
/// use dearchive::formats::MemorySource;
///
/// let mut source = MemorySource::new()
///     .with_directory("subdir")
///     .with_file("subdir/test2", b"test2".to_vec());
/// assert_eq!(source.len(), 2);
/// assert_eq!(source.format_name(), "memory");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    entries: VecDeque<(Entry, Vec<u8>)>,
}

impl MemorySource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry with content.
    pub fn push(&mut self, entry: Entry, content: Vec<u8>) {
        self.entries.push_back((entry, content));
    }

    /// Appends an entry with content.
    #[must_use]
    pub fn with_entry(mut self, entry: Entry, content: Vec<u8>) -> Self {
        self.push(entry, content);
        self
    }

    /// Appends a regular file.
    #[must_use]
    pub fn with_file(self, name: impl Into<String>, content: Vec<u8>) -> Self {
        let entry = Entry::file(name, Some(content.len() as u64));
        self.with_entry(entry, content)
    }

    /// Appends a directory.
    #[must_use]
    pub fn with_directory(self, name: impl Into<String>) -> Self {
        self.with_entry(Entry::directory(name), Vec::new())
    }

    /// Appends a symlink.
    #[must_use]
    pub fn with_symlink(self, name: impl Into<String>, target: impl Into<String>) -> Self {
        self.with_entry(Entry::symlink(name, target), Vec::new())
    }

    /// Returns the number of entries not yet produced.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if every entry has been produced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(Entry, Vec<u8>)> for MemorySource {
    fn from_iter<I: IntoIterator<Item = (Entry, Vec<u8>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl EntrySource for MemorySource {
    fn next_entry(&mut self) -> Result<Option<SourceEntry<'_>>> {
        Ok(self
            .entries
            .pop_front()
            .map(|(entry, content)| SourceEntry::new(entry, Cursor::new(content))))
    }

    fn format_name(&self) -> &str {
        "memory"
    }
}
