//! Symlink target validation.

use std::path::PathBuf;

use crate::ExtractionError;
use crate::Result;
use crate::SymlinkPolicy;
use crate::types::SafePath;

/// Resolves the target a symlink entry should be created with.
///
/// `link` is the sanitized (and stripped) location of the link inside the
/// destination. Relative targets are resolved lexically from the link's
/// parent directory; `..` segments are accepted as long as the walk never
/// climbs above the destination root. Accepted targets are rewritten to
/// their normalized form: leading `..` segments followed by plain names.
///
/// # Policies
///
/// - [`SymlinkPolicy::Disallow`]: absolute targets and escaping relative
///   targets fail with `SymlinkEscape`.
/// - [`SymlinkPolicy::Allow`]: the target is returned verbatim.
/// - [`SymlinkPolicy::RelativizeAbsolute`]: absolute targets are rewritten
///   relative to the link so that they point at the same path under the
///   destination root; relative targets are checked as for `Disallow`.
///
/// # Errors
///
/// Returns `ExtractionError::SymlinkEscape` when the target would resolve
/// outside the destination, `ExtractionError::InvalidEntryName` when the
/// target is empty or contains a NUL byte.
///
/// # Examples
///
/// ```
/// use dearchive::SymlinkPolicy;
/// use dearchive::security::resolve_symlink_target;
/// use dearchive::types::SafePath;
///
/// let link = SafePath::sanitize("foo/link")?;
/// let target = resolve_symlink_target(&link, "../bar/target.txt", SymlinkPolicy::Disallow)?;
/// assert_eq!(target.to_str(), Some("../bar/target.txt"));
///
/// assert!(resolve_symlink_target(&link, "../../etc/passwd", SymlinkPolicy::Disallow).is_err());
/// # Ok::<(), dearchive::ExtractionError>(())
/// ```
pub fn resolve_symlink_target(
    link: &SafePath,
    target: &str,
    policy: SymlinkPolicy,
) -> Result<PathBuf> {
    let parent: Vec<&str> = link.segments().take(link.depth().saturating_sub(1)).collect();
    resolve_symlink_target_from(&parent, link, target, policy)
}

/// Like [`resolve_symlink_target`], with the link's parent given as the
/// segments of its real location below the destination root.
///
/// The real parent differs from the entry name when an earlier entry made
/// one of the name's directories a symlink.
pub(crate) fn resolve_symlink_target_from(
    parent: &[&str],
    link: &SafePath,
    target: &str,
    policy: SymlinkPolicy,
) -> Result<PathBuf> {
    if target.is_empty() {
        return Err(ExtractionError::invalid_name(target, "empty symlink target"));
    }
    if target.contains('\0') {
        return Err(ExtractionError::invalid_name(target, "contains NUL byte"));
    }
    if policy == SymlinkPolicy::Allow {
        return Ok(PathBuf::from(target));
    }

    let normalized = target.replace('\\', "/");
    let escape = || ExtractionError::SymlinkEscape {
        link: link.as_path().to_path_buf(),
        target: PathBuf::from(target),
    };

    let resolved = if is_absolute(&normalized) {
        if policy != SymlinkPolicy::RelativizeAbsolute {
            return Err(escape());
        }
        walk(&[], strip_root(&normalized))
    } else {
        walk(parent, &normalized)
    }
    .ok_or_else(escape)?;

    Ok(relative_to(parent, &resolved))
}

fn is_absolute(target: &str) -> bool {
    target.starts_with('/') || has_drive_prefix(target)
}

fn has_drive_prefix(target: &str) -> bool {
    let bytes = target.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

fn strip_root(target: &str) -> &str {
    let without_drive = if has_drive_prefix(target) {
        &target[2..]
    } else {
        target
    };
    without_drive.trim_start_matches('/')
}

/// Walks `target` from `start`, both given as segments below the root.
///
/// Returns where the walk ends, or `None` if it climbs above the root.
fn walk<'s>(start: &[&'s str], target: &'s str) -> Option<Vec<&'s str>> {
    let mut position = start.to_vec();
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                position.pop()?;
            }
            other => position.push(other),
        }
    }
    Some(position)
}

/// Spells `resolved` as a path relative to `parent`.
fn relative_to(parent: &[&str], resolved: &[&str]) -> PathBuf {
    let common = parent
        .iter()
        .zip(resolved)
        .take_while(|(a, b)| a == b)
        .count();
    let mut parts: Vec<&str> = vec![".."; parent.len() - common];
    parts.extend_from_slice(&resolved[common..]);
    if parts.is_empty() {
        PathBuf::from(".")
    } else {
        PathBuf::from(parts.join("/"))
    }
}
