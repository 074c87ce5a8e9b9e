//! Sanitized entry path type.

use crate::ExtractionError;
use crate::Result;
use std::fmt;
use std::path::Component;
use std::path::Path;

/// A sanitized, slash-separated relative entry path.
///
/// `SafePath` is guaranteed to:
/// - be non-empty
/// - contain only forward slashes, with no leading, trailing or repeated ones
/// - contain no `.` or `..` segments
/// - contain no NUL byte
/// - be relative on the current platform
///
/// # Security Properties
///
/// - Can ONLY be constructed through [`SafePath::sanitize`] (or by stripping
///   an existing `SafePath`)
/// - NO `From<String>` implementation
/// - Joining it onto a destination directory can never climb above that
///   directory lexically
///
/// # Examples
///
/// ```
/// use dearchive::types::SafePath;
///
/// let safe = SafePath::sanitize("\\top\\dir//file.txt/")?;
/// assert_eq!(safe.as_str(), "top/dir/file.txt");
///
/// assert!(SafePath::sanitize("subdir/../test1").is_err());
/// # Ok::<(), dearchive::ExtractionError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SafePath(String);

impl SafePath {
    /// Sanitizes a raw, untrusted entry name.
    ///
    /// # Steps
    ///
    /// 1. Reject NUL bytes
    /// 2. Replace backslashes with forward slashes
    /// 3. Drop empty and `.` segments (this trims leading and trailing slashes)
    /// 4. Reject any `..` segment
    /// 5. Reject a blank result
    /// 6. Reject anything the platform would not treat as a plain relative
    ///    path (drive prefixes on Windows)
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError::InvalidEntryName` when any check fails.
    pub fn sanitize(raw: &str) -> Result<Self> {
        if raw.contains('\0') {
            return Err(ExtractionError::invalid_name(raw, "contains NUL byte"));
        }

        let normalized = raw.replace('\\', "/");
        let mut segments = Vec::new();
        for segment in normalized.split('/') {
            match segment {
                "" | "." => {}
                ".." => return Err(ExtractionError::invalid_name(raw, "path traversal")),
                _ => segments.push(segment),
            }
        }

        let joined = segments.join("/");
        if joined.trim().is_empty() {
            return Err(ExtractionError::invalid_name(raw, "empty name"));
        }

        let plain = Path::new(&joined)
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !plain {
            return Err(ExtractionError::invalid_name(raw, "not a relative path"));
        }

        Ok(Self(joined))
    }

    /// Drops the first `count` segments.
    ///
    /// Returns `None` when the path has `count` segments or fewer: the entry
    /// is consumed entirely and must be skipped. `count == 0` returns the path
    /// unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use dearchive::types::SafePath;
    ///
    /// let path = SafePath::sanitize("subdir/test2")?;
    /// assert_eq!(path.strip_components(1).unwrap().as_str(), "test2");
    /// assert!(path.strip_components(2).is_none());
    /// # Ok::<(), dearchive::ExtractionError>(())
    /// ```
    #[must_use]
    pub fn strip_components(&self, count: usize) -> Option<Self> {
        if count == 0 {
            return Some(self.clone());
        }
        let mut segments = self.0.split('/');
        for _ in 0..count {
            segments.next();
        }
        let rest: Vec<&str> = segments.collect();
        if rest.is_empty() {
            None
        } else {
            Some(Self(rest.join("/")))
        }
    }

    /// Returns the number of segments.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.0.split('/').count()
    }

    /// Returns the segments in order.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }

    /// Returns the final segment.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Returns the path as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the path as a `&Path`.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        Path::new(&self.0)
    }
}

impl fmt::Display for SafePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
