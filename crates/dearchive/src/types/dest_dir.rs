//! Validated destination directory type.

use crate::ExtractionError;
use crate::Result;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use super::SafePath;

/// A validated destination directory for archive extraction.
///
/// This type represents a directory that has been validated to:
/// - Exist on the filesystem
/// - Be a directory (not a file)
/// - Be writable by the current process (Unix)
/// - Be represented as an absolute canonical path
///
/// The directory is resolved once when an extraction call starts and
/// re-checked with [`DestDir::revalidate`] before every write, since the
/// tree is mutated in place without locking.
///
/// # Examples
///
/// ```no_run
/// use dearchive::types::DestDir;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dest = DestDir::new("/tmp/extraction")?;
/// println!("Extracting to: {}", dest.as_path().display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestDir(PathBuf);

impl DestDir {
    /// Creates a new `DestDir` after validating the path.
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError::Io` if the path does not exist, is not a
    /// directory, cannot be canonicalized or is not writable (Unix).
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            return Err(ExtractionError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("destination directory does not exist: {}", path.display()),
            )));
        }

        if !path.is_dir() {
            return Err(ExtractionError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("path is not a directory: {}", path.display()),
            )));
        }

        let canonical = path.canonicalize().map_err(|e| {
            ExtractionError::Io(io::Error::new(
                e.kind(),
                format!("failed to canonicalize path {}: {}", path.display(), e),
            ))
        })?;

        #[cfg(unix)]
        {
            use std::ffi::CString;
            use std::os::unix::ffi::OsStrExt;

            let path_cstring = CString::new(canonical.as_os_str().as_bytes()).map_err(|_| {
                ExtractionError::Io(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "path contains null byte",
                ))
            })?;

            // SAFETY: access() only reads the NUL-terminated string, which
            // outlives the call.
            #[allow(unsafe_code)]
            let result = unsafe { libc::access(path_cstring.as_ptr(), libc::W_OK) };

            if result != 0 {
                return Err(ExtractionError::Io(io::Error::new(
                    io::ErrorKind::PermissionDenied,
                    format!("directory is not writable: {}", canonical.display()),
                )));
            }
        }

        Ok(Self(canonical))
    }

    /// Checks that the destination is still a directory.
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError::Io` if the directory disappeared or was
    /// replaced by something else.
    pub fn revalidate(&self) -> Result<()> {
        let metadata = std::fs::metadata(&self.0).map_err(|e| {
            ExtractionError::Io(io::Error::new(
                e.kind(),
                format!("destination directory is gone: {}: {}", self.0.display(), e),
            ))
        })?;
        if metadata.is_dir() {
            Ok(())
        } else {
            Err(ExtractionError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("destination is no longer a directory: {}", self.0.display()),
            )))
        }
    }

    /// Verifies that an existing path resolves inside this directory.
    ///
    /// Symlinks along the way are followed, so a previously extracted or
    /// pre-existing link cannot redirect writes elsewhere.
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError::PathEscape` when the resolved path lies
    /// outside the destination, `ExtractionError::Io` if it cannot be
    /// resolved.
    pub fn ensure_contains(&self, path: &Path) -> Result<()> {
        let canonical = path.canonicalize()?;
        if canonical.starts_with(&self.0) {
            Ok(())
        } else {
            Err(ExtractionError::PathEscape {
                path: path.to_path_buf(),
            })
        }
    }

    /// Returns the path as a `&Path`.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Joins a `SafePath` to this destination directory.
    #[inline]
    #[must_use]
    pub fn join(&self, safe_path: &SafePath) -> PathBuf {
        self.0.join(safe_path.as_path())
    }

    /// Converts into the inner `PathBuf`.
    #[inline]
    #[must_use]
    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}
