//! Common traits for archive entry sources.

use std::fmt;
use std::io::Read;

use crate::Result;
use crate::types::Entry;

/// One entry pulled from a source, with a reader over its content.
///
/// The reader is only valid until the next call to
/// [`EntrySource::next_entry`]. Directories and symlinks carry an empty
/// reader.
pub struct SourceEntry<'a> {
    /// Entry metadata.
    pub entry: Entry,
    /// Entry content.
    pub content: Box<dyn Read + 'a>,
}

impl<'a> SourceEntry<'a> {
    /// Pairs an entry with its content reader.
    pub fn new(entry: Entry, content: impl Read + 'a) -> Self {
        Self {
            entry,
            content: Box::new(content),
        }
    }

    /// Pairs an entry with an empty reader.
    #[must_use]
    pub fn empty(entry: Entry) -> Self {
        Self::new(entry, std::io::empty())
    }
}

impl fmt::Debug for SourceEntry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceEntry")
            .field("entry", &self.entry)
            .finish_non_exhaustive()
    }
}

/// Pull-based, sequential producer of archive entries.
///
/// Implementations decode a container format; the extraction driver owns
/// everything else. Entries are produced once, in archive order.
pub trait EntrySource {
    /// Returns the next entry, or `None` once the archive is exhausted.
    ///
    /// # Errors
    ///
    /// Returns an error if the archive is corrupt or cannot be read. Such
    /// errors are not tied to an entry and end the extraction.
    fn next_entry(&mut self) -> Result<Option<SourceEntry<'_>>>;

    /// Returns the archive format name.
    fn format_name(&self) -> &str;
}

impl<S: EntrySource + ?Sized> EntrySource for &mut S {
    fn next_entry(&mut self) -> Result<Option<SourceEntry<'_>>> {
        (**self).next_entry()
    }

    fn format_name(&self) -> &str {
        (**self).format_name()
    }
}
