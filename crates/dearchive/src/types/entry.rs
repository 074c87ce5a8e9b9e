//! Archive entry metadata.

/// Type of entry in an archive.
///
/// # Examples
///
/// ```
/// use dearchive::types::EntryType;
///
/// let file = EntryType::File;
/// let directory = EntryType::Directory;
/// let symlink = EntryType::Symlink {
///     target: "../target".to_string(),
/// };
/// assert!(symlink.is_symlink());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntryType {
    /// Regular file entry.
    File,

    /// Directory entry.
    Directory,

    /// Symbolic link entry.
    ///
    /// The target is exactly what the archive stored and has NOT been
    /// validated.
    Symlink {
        /// The symlink target (not yet validated).
        target: String,
    },
}

impl EntryType {
    /// Returns `true` if this is a regular file.
    #[must_use]
    pub const fn is_file(&self) -> bool {
        matches!(self, Self::File)
    }

    /// Returns `true` if this is a directory.
    #[must_use]
    pub const fn is_directory(&self) -> bool {
        matches!(self, Self::Directory)
    }

    /// Returns `true` if this is a symlink.
    #[must_use]
    pub const fn is_symlink(&self) -> bool {
        matches!(self, Self::Symlink { .. })
    }

    /// Returns the symlink target, if any.
    #[must_use]
    pub fn link_target(&self) -> Option<&str> {
        match self {
            Self::Symlink { target } => Some(target),
            _ => None,
        }
    }
}

/// One item read from an archive.
///
/// Entries are produced one at a time by an
/// [`EntrySource`](crate::formats::EntrySource) and never modified afterwards.
/// The name is untrusted: it is sanitized before anything touches the disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Slash-separated relative path as stored in the archive.
    pub name: String,

    /// Kind of entry.
    pub entry_type: EntryType,

    /// Unix permission bits, `0` when the archive does not carry them.
    pub mode: u32,

    /// Uncompressed size in bytes, `None` when unknown.
    pub size: Option<u64>,
}

impl Entry {
    /// Creates a regular file entry.
    #[must_use]
    pub fn file(name: impl Into<String>, size: Option<u64>) -> Self {
        Self {
            name: name.into(),
            entry_type: EntryType::File,
            mode: 0,
            size,
        }
    }

    /// Creates a directory entry.
    #[must_use]
    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entry_type: EntryType::Directory,
            mode: 0,
            size: Some(0),
        }
    }

    /// Creates a symlink entry.
    #[must_use]
    pub fn symlink(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entry_type: EntryType::Symlink {
                target: target.into(),
            },
            mode: 0,
            size: Some(0),
        }
    }

    /// Sets the permission bits.
    #[must_use]
    pub const fn with_mode(mut self, mode: u32) -> Self {
        self.mode = mode;
        self
    }

    /// Returns a copy of this entry carrying a different name.
    #[must_use]
    pub(crate) fn renamed(&self, name: &str) -> Self {
        Self {
            name: name.to_owned(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_type_predicates() {
        assert!(EntryType::File.is_file());
        assert!(!EntryType::File.is_directory());
        assert!(EntryType::Directory.is_directory());

        let symlink = EntryType::Symlink {
            target: "target".into(),
        };
        assert!(symlink.is_symlink());
        assert_eq!(symlink.link_target(), Some("target"));
        assert_eq!(EntryType::File.link_target(), None);
    }

    #[test]
    fn test_entry_constructors() {
        let file = Entry::file("a/b.txt", Some(4)).with_mode(0o644);
        assert_eq!(file.name, "a/b.txt");
        assert_eq!(file.mode, 0o644);
        assert_eq!(file.size, Some(4));

        let dir = Entry::directory("a");
        assert!(dir.entry_type.is_directory());
        assert_eq!(dir.mode, 0);

        let link = Entry::symlink("a/link", "b.txt");
        assert_eq!(link.entry_type.link_target(), Some("b.txt"));
    }

    #[test]
    fn test_renamed_keeps_metadata() {
        let entry = Entry::file("top/inner.txt", None).with_mode(0o755);
        let renamed = entry.renamed("inner.txt");
        assert_eq!(renamed.name, "inner.txt");
        assert_eq!(renamed.mode, 0o755);
        assert_eq!(renamed.entry_type, EntryType::File);
    }
}
