//! Entry name sanitization.

use crate::Result;
use crate::types::SafePath;

/// Sanitizes an untrusted entry name into a [`SafePath`].
///
/// Delegates to [`SafePath::sanitize`]: backslashes become slashes, empty
/// and `.` segments are dropped, and any `..` segment, NUL byte or blank
/// result is rejected.
///
/// # Errors
///
/// Returns `ExtractionError::InvalidEntryName` if the name is rejected.
///
/// # Examples
///
/// ```
/// use dearchive::security::sanitize_name;
///
/// assert_eq!(sanitize_name("/subdir/test2")?.as_str(), "subdir/test2");
/// assert!(sanitize_name("subdir/some/../test1a").is_err());
/// # Ok::<(), dearchive::ExtractionError>(())
/// ```
pub fn sanitize_name(raw: &str) -> Result<SafePath> {
    SafePath::sanitize(raw)
}
