//! Error types for archive extraction operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `ExtractionError`.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Errors that can occur during archive extraction.
///
/// Every failure raised while an entry is being sanitized or materialized is
/// handed to the caller's error handler before it can surface from
/// [`Extractor::extract`](crate::Extractor::extract).
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Entry name is empty, contains a NUL byte or a `..` segment.
    #[error("invalid entry name '{name}': {reason}")]
    InvalidEntryName {
        /// The raw name as supplied by the archive.
        name: String,
        /// Why the name was rejected.
        reason: &'static str,
    },

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Symlink points outside the extraction directory.
    #[error("symlink target outside extraction directory: {link} -> {target}")]
    SymlinkEscape {
        /// The symlink path relative to the destination.
        link: PathBuf,
        /// The rejected target.
        target: PathBuf,
    },

    /// A resolved destination path left the extraction directory.
    #[error("resolved path escapes extraction directory: {path}")]
    PathEscape {
        /// The offending path.
        path: PathBuf,
    },

    /// Archive format is unsupported or unrecognized.
    #[error("unsupported archive format")]
    UnsupportedFormat,

    /// Archive is corrupted or invalid.
    #[error("invalid archive: {0}")]
    InvalidArchive(String),
}

impl ExtractionError {
    pub(crate) fn invalid_name(name: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidEntryName {
            name: name.into(),
            reason,
        }
    }

    /// Returns `true` if this error represents a security violation.
    ///
    /// # Examples
    ///
    /// ```
    /// use dearchive::ExtractionError;
    ///
    /// let err = ExtractionError::InvalidEntryName {
    ///     name: "../etc/passwd".into(),
    ///     reason: "path traversal",
    /// };
    /// assert!(err.is_security_violation());
    ///
    /// let err = ExtractionError::UnsupportedFormat;
    /// assert!(!err.is_security_violation());
    /// ```
    #[must_use]
    pub const fn is_security_violation(&self) -> bool {
        matches!(
            self,
            Self::InvalidEntryName { .. } | Self::SymlinkEscape { .. } | Self::PathEscape { .. }
        )
    }

    /// Returns `true` if extraction can reasonably continue past this error.
    ///
    /// Entry-level failures are recoverable through the error handler. A
    /// broken or unrecognized archive is not.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::UnsupportedFormat | Self::InvalidArchive(_))
    }

    /// Returns the rejected entry name for `InvalidEntryName`.
    #[must_use]
    pub fn entry_name(&self) -> Option<&str> {
        match self {
            Self::InvalidEntryName { name, .. } => Some(name),
            _ => None,
        }
    }
}

impl From<zip::result::ZipError> for ExtractionError {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Self::Io(e),
            zip::result::ZipError::UnsupportedArchive(_) => Self::UnsupportedFormat,
            other => Self::InvalidArchive(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ExtractionError::UnsupportedFormat;
        assert_eq!(err.to_string(), "unsupported archive format");
    }

    #[test]
    fn test_invalid_entry_name_display() {
        let err = ExtractionError::invalid_name("subdir/../test1", "path traversal");
        let display = err.to_string();
        assert!(display.contains("subdir/../test1"));
        assert!(display.contains("path traversal"));
        assert_eq!(err.entry_name(), Some("subdir/../test1"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ExtractionError = io_err.into();
        assert!(matches!(err, ExtractionError::Io(_)));
        assert!(err.is_recoverable());
        assert!(!err.is_security_violation());
    }

    #[test]
    fn test_zip_error_conversion() {
        let io_err = std::io::Error::other("broken pipe");
        let err: ExtractionError = zip::result::ZipError::Io(io_err).into();
        assert!(matches!(err, ExtractionError::Io(_)));

        let err: ExtractionError = zip::result::ZipError::FileNotFound.into();
        assert!(matches!(err, ExtractionError::InvalidArchive(_)));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_security_violations() {
        let err = ExtractionError::SymlinkEscape {
            link: PathBuf::from("link"),
            target: PathBuf::from("../../etc"),
        };
        assert!(err.is_security_violation());
        assert!(err.to_string().contains("symlink target outside"));

        let err = ExtractionError::PathEscape {
            path: PathBuf::from("escape/file"),
        };
        assert!(err.is_security_violation());
        assert_eq!(err.entry_name(), None);

        let err = ExtractionError::InvalidArchive("bad header".into());
        assert!(!err.is_security_violation());
    }
}
