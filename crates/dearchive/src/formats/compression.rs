//! Compression codecs wrapping TAR streams.
//!
//! # Supported Codecs
//!
//! - **Gzip** (.tar.gz, .tgz)
//! - **Bzip2** (.tar.bz2, .tbz2)
//! - **Xz** (.tar.xz, .txz)
//! - **Zstd** (.tar.zst, .tzst)

use std::io::Read;

use crate::Result;

/// Compression codec of a compressed TAR archive.
///
/// # Examples
///
/// ```
/// use dearchive::formats::CompressionCodec;
///
/// let codec = CompressionCodec::Zstd;
/// assert_eq!(codec.extension(), "tar.zst");
/// assert_eq!(codec.name(), "zstd");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompressionCodec {
    /// Gzip (deflate). Concatenated members are decoded as one stream.
    Gzip,

    /// Bzip2 (Burrows-Wheeler).
    Bzip2,

    /// Xz (LZMA2).
    Xz,

    /// Zstandard.
    Zstd,
}

impl CompressionCodec {
    /// Returns the typical file extension for this codec when used with TAR.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Gzip => "tar.gz",
            Self::Bzip2 => "tar.bz2",
            Self::Xz => "tar.xz",
            Self::Zstd => "tar.zst",
        }
    }

    /// Returns a human-readable name for this codec.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Gzip => "gzip",
            Self::Bzip2 => "bzip2",
            Self::Xz => "xz",
            Self::Zstd => "zstd",
        }
    }

    /// Wraps `reader` with the matching decoder.
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError::Io` if the decoder cannot be initialized
    /// (zstd only).
    pub fn decoder<'r, R: Read + 'r>(self, reader: R) -> Result<Box<dyn Read + 'r>> {
        let decoder: Box<dyn Read + 'r> = match self {
            Self::Gzip => Box::new(flate2::read::MultiGzDecoder::new(reader)),
            Self::Bzip2 => Box::new(bzip2::read::MultiBzDecoder::new(reader)),
            Self::Xz => Box::new(xz2::read::XzDecoder::new_multi_decoder(reader)),
            Self::Zstd => Box::new(zstd::stream::read::Decoder::new(reader)?),
        };
        Ok(decoder)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;

    const PAYLOAD: &[u8] = b"the same bytes through every codec";

    fn compress(codec: CompressionCodec, data: &[u8]) -> Vec<u8> {
        match codec {
            CompressionCodec::Gzip => {
                let mut encoder =
                    flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
                encoder.write_all(data).unwrap();
                encoder.finish().unwrap()
            }
            CompressionCodec::Bzip2 => {
                let mut encoder =
                    bzip2::write::BzEncoder::new(Vec::new(), bzip2::Compression::default());
                encoder.write_all(data).unwrap();
                encoder.finish().unwrap()
            }
            CompressionCodec::Xz => {
                let mut encoder = xz2::write::XzEncoder::new(Vec::new(), 6);
                encoder.write_all(data).unwrap();
                encoder.finish().unwrap()
            }
            CompressionCodec::Zstd => zstd::stream::encode_all(data, 0).unwrap(),
        }
    }

    #[test]
    fn test_codec_extension_and_name() {
        assert_eq!(CompressionCodec::Gzip.extension(), "tar.gz");
        assert_eq!(CompressionCodec::Bzip2.extension(), "tar.bz2");
        assert_eq!(CompressionCodec::Xz.name(), "xz");
        assert_eq!(CompressionCodec::Zstd.name(), "zstd");
    }

    #[test]
    fn test_decoders() {
        for codec in [
            CompressionCodec::Gzip,
            CompressionCodec::Bzip2,
            CompressionCodec::Xz,
            CompressionCodec::Zstd,
        ] {
            let compressed = compress(codec, PAYLOAD);
            let mut decoded = Vec::new();
            codec
                .decoder(compressed.as_slice())
                .unwrap()
                .read_to_end(&mut decoded)
                .unwrap();
            assert_eq!(decoded, PAYLOAD, "{} mismatch", codec.name());
        }
    }

    #[test]
    fn test_gzip_concatenated_members() {
        let mut data = compress(CompressionCodec::Gzip, b"first ");
        data.extend(compress(CompressionCodec::Gzip, b"second"));
        let mut decoded = String::new();
        CompressionCodec::Gzip
            .decoder(data.as_slice())
            .unwrap()
            .read_to_string(&mut decoded)
            .unwrap();
        assert_eq!(decoded, "first second");
    }

    #[test]
    fn test_corrupt_stream_fails_on_read() {
        let mut decoded = Vec::new();
        let result = CompressionCodec::Gzip
            .decoder(&b"not gzip at all"[..])
            .unwrap()
            .read_to_end(&mut decoded);
        assert!(result.is_err());
    }
}
