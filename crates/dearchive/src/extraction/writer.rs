//! Materializes sanitized entries under the destination directory.
//!
//! Every function here assumes its `SafePath` was produced by sanitization
//! and stripping. Parent directories are created one segment at a time so
//! that a symlink already on disk cannot carry a write outside the root.

use std::fs;
use std::fs::File;
use std::io;
use std::io::BufWriter;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use crate::ExtractOptions;
use crate::ExtractionError;
use crate::Result;
use crate::copy::CopyBuffer;
use crate::copy::copy_with_buffer;
use crate::security::apply_permissions;
use crate::security::resolve_symlink_target;
use crate::security::symlink::resolve_symlink_target_from;
use crate::types::DestDir;
use crate::types::Entry;
use crate::types::SafePath;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// What a successful write produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Written {
    File { path: PathBuf, bytes: u64 },
    Directory { path: PathBuf },
    Symlink { path: PathBuf },
    /// Something already existed and overwriting is disabled.
    Existing { path: PathBuf },
}

impl Written {
    pub(crate) fn path(&self) -> &Path {
        match self {
            Self::File { path, .. }
            | Self::Directory { path }
            | Self::Symlink { path }
            | Self::Existing { path } => path,
        }
    }
}

/// Removes the temporary file on drop unless persisted.
struct TempFileGuard {
    path: PathBuf,
    should_cleanup: bool,
}

impl TempFileGuard {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            should_cleanup: true,
        }
    }

    fn persist(mut self) {
        self.should_cleanup = false;
    }
}

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if self.should_cleanup {
            let _ = fs::remove_file(&self.path);
        }
    }
}

/// Creates `dest/segments...` one directory at a time.
///
/// Existing symlinks along the way must resolve inside the destination.
fn ensure_dirs<'s>(
    dest: &DestDir,
    segments: impl IntoIterator<Item = &'s str>,
) -> Result<PathBuf> {
    let mut current = dest.as_path().to_path_buf();
    for segment in segments {
        current.push(segment);
        match fs::symlink_metadata(&current) {
            Ok(metadata) if metadata.file_type().is_symlink() => dest.ensure_contains(&current)?,
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => match fs::create_dir(&current) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {}
                Err(e) => return Err(e.into()),
            },
            Err(e) => return Err(e.into()),
        }
    }
    Ok(current)
}

fn parent_dir(dest: &DestDir, path: &SafePath) -> Result<PathBuf> {
    ensure_dirs(dest, path.segments().take(path.depth().saturating_sub(1)))
}

/// Returns the segments of `dir`'s real location below the destination.
fn real_segments(dest: &DestDir, dir: &Path) -> Result<Vec<String>> {
    let canonical = dir.canonicalize()?;
    let relative = canonical
        .strip_prefix(dest.as_path())
        .map_err(|_| ExtractionError::PathEscape {
            path: dir.to_path_buf(),
        })?;
    Ok(relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect())
}

fn temp_path_for(parent: &Path, name: &str) -> PathBuf {
    let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    parent.join(format!(
        ".{name}.dearchive-tmp-{}-{counter}",
        std::process::id()
    ))
}

/// Creates a directory entry. Existing directories are not an error.
pub(crate) fn write_directory(dest: &DestDir, path: &SafePath) -> Result<Written> {
    let dir = ensure_dirs(dest, path.segments())?;
    if !dir.is_dir() {
        return Err(ExtractionError::Io(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("not a directory: {}", dir.display()),
        )));
    }
    Ok(Written::Directory { path: dir })
}

/// Streams a file entry into place.
///
/// Content goes to a hidden sibling first and is renamed over the target
/// once complete, so a failed attempt never leaves a partial file behind.
pub(crate) fn write_file(
    dest: &DestDir,
    path: &SafePath,
    entry: &Entry,
    reader: &mut dyn Read,
    options: &ExtractOptions,
    buffer: &mut CopyBuffer,
) -> Result<Written> {
    let parent = parent_dir(dest, path)?;
    let target = parent.join(path.file_name());

    if fs::symlink_metadata(&target).is_ok() && !options.overwrite {
        return Ok(Written::Existing { path: target });
    }

    let temp_path = temp_path_for(&parent, path.file_name());
    let guard = TempFileGuard::new(temp_path.clone());
    let bytes = {
        let file = File::create_new(&temp_path)?;
        let mut writer = BufWriter::with_capacity(64 * 1024, file);
        let bytes = copy_with_buffer(reader, &mut writer, buffer)?;
        writer.flush()?;
        bytes
    };

    if options.preserve_permissions && entry.mode != 0 {
        apply_permissions(&temp_path, entry.mode)?;
    }

    fs::rename(&temp_path, &target)?;
    guard.persist();

    Ok(Written::File {
        path: target,
        bytes,
    })
}

/// Creates a symlink entry after checking its target against the policy.
///
/// The target is checked twice: against the entry name before any
/// directory is created, then against the parent's real location, which
/// differs when a segment of the name is an earlier extracted symlink.
pub(crate) fn write_symlink(
    dest: &DestDir,
    path: &SafePath,
    target: &str,
    options: &ExtractOptions,
) -> Result<Written> {
    resolve_symlink_target(path, target, options.symlink_policy)?;
    let parent = parent_dir(dest, path)?;
    let real_parent = real_segments(dest, &parent)?;
    let real_parent: Vec<&str> = real_parent.iter().map(String::as_str).collect();
    let link_target =
        resolve_symlink_target_from(&real_parent, path, target, options.symlink_policy)?;
    let link = parent.join(path.file_name());

    if let Ok(metadata) = fs::symlink_metadata(&link) {
        if !options.overwrite {
            return Ok(Written::Existing { path: link });
        }
        if metadata.is_dir() {
            return Err(ExtractionError::Io(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("directory in the way of symlink: {}", link.display()),
            )));
        }
        fs::remove_file(&link)?;
    }

    create_symlink(&link_target, &link)?;
    Ok(Written::Symlink { path: link })
}

#[cfg(unix)]
fn create_symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(not(unix))]
fn create_symlink(_target: &Path, link: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        format!("symlinks are not supported on this platform: {}", link.display()),
    ))
}
