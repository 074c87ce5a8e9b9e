//! Archive format detection.

use std::path::Path;

use crate::ExtractionError;
use crate::Result;
use crate::formats::compression::CompressionCodec;

/// Supported archive formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveType {
    /// Tar archive (uncompressed).
    Tar,
    /// Gzip-compressed tar archive.
    TarGz,
    /// Bzip2-compressed tar archive.
    TarBz2,
    /// XZ-compressed tar archive.
    TarXz,
    /// Zstd-compressed tar archive.
    TarZst,
    /// ZIP archive.
    Zip,
}

impl ArchiveType {
    /// Returns the codec wrapping the TAR stream, if any.
    #[must_use]
    pub const fn compression(self) -> Option<CompressionCodec> {
        match self {
            Self::TarGz => Some(CompressionCodec::Gzip),
            Self::TarBz2 => Some(CompressionCodec::Bzip2),
            Self::TarXz => Some(CompressionCodec::Xz),
            Self::TarZst => Some(CompressionCodec::Zstd),
            Self::Tar | Self::Zip => None,
        }
    }

    /// Returns the format name used in logs and by entry sources.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Tar => "tar",
            Self::TarGz => "tar.gz",
            Self::TarBz2 => "tar.bz2",
            Self::TarXz => "tar.xz",
            Self::TarZst => "tar.zst",
            Self::Zip => "zip",
        }
    }
}

/// Detects the archive type from a file path's extension.
///
/// Bare `.gz`, `.bz2`, `.xz` and `.zst` files are assumed to hold a TAR
/// stream.
///
/// # Errors
///
/// Returns `ExtractionError::UnsupportedFormat` if the extension is missing
/// or unknown.
///
/// # Examples
///
/// ```
/// use dearchive::formats::ArchiveType;
/// use dearchive::formats::detect_format;
/// use std::path::Path;
///
/// assert_eq!(detect_format(Path::new("a.tar.gz"))?, ArchiveType::TarGz);
/// assert!(detect_format(Path::new("a.rar")).is_err());
/// # Ok::<(), dearchive::ExtractionError>(())
/// ```
pub fn detect_format(path: &Path) -> Result<ArchiveType> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .ok_or(ExtractionError::UnsupportedFormat)?;

    match extension.to_ascii_lowercase().as_str() {
        "tar" => Ok(ArchiveType::Tar),
        "gz" | "tgz" => Ok(ArchiveType::TarGz),
        "bz2" | "tbz" | "tbz2" => Ok(ArchiveType::TarBz2),
        "xz" | "txz" => Ok(ArchiveType::TarXz),
        "zst" | "tzst" => Ok(ArchiveType::TarZst),
        "zip" | "jar" => Ok(ArchiveType::Zip),
        _ => Err(ExtractionError::UnsupportedFormat),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_detect_tar() {
        assert_eq!(detect_format(&PathBuf::from("archive.tar")).unwrap(), ArchiveType::Tar);
    }

    #[test]
    fn test_detect_compressed_tar() {
        for (name, expected) in [
            ("archive.tar.gz", ArchiveType::TarGz),
            ("archive.tgz", ArchiveType::TarGz),
            ("archive.tar.bz2", ArchiveType::TarBz2),
            ("archive.tbz2", ArchiveType::TarBz2),
            ("archive.tar.xz", ArchiveType::TarXz),
            ("archive.txz", ArchiveType::TarXz),
            ("archive.tar.zst", ArchiveType::TarZst),
            ("archive.tzst", ArchiveType::TarZst),
        ] {
            assert_eq!(detect_format(&PathBuf::from(name)).unwrap(), expected, "{name}");
        }
    }

    #[test]
    fn test_detect_zip_case_insensitive() {
        assert_eq!(detect_format(&PathBuf::from("ARCHIVE.ZIP")).unwrap(), ArchiveType::Zip);
        assert_eq!(detect_format(&PathBuf::from("lib.jar")).unwrap(), ArchiveType::Zip);
    }

    #[test]
    fn test_detect_unsupported() {
        for name in ["archive.rar", "archive.7z", "no_extension"] {
            assert!(matches!(
                detect_format(&PathBuf::from(name)),
                Err(ExtractionError::UnsupportedFormat)
            ));
        }
    }

    #[test]
    fn test_compression_mapping() {
        assert_eq!(ArchiveType::Tar.compression(), None);
        assert_eq!(ArchiveType::Zip.compression(), None);
        assert_eq!(ArchiveType::TarXz.compression(), Some(CompressionCodec::Xz));
        assert_eq!(ArchiveType::TarZst.name(), "tar.zst");
    }
}
