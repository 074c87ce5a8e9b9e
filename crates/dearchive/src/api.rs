//! High-level public API for extracting archive files.

use std::fs::File;
use std::io::BufReader;
use std::io::Read;
use std::path::Path;

use crate::ExtractOptions;
use crate::ExtractionReport;
use crate::Extractor;
use crate::Result;
use crate::formats::TarSource;
use crate::formats::ZipSource;
use crate::formats::detect::ArchiveType;
use crate::formats::detect::detect_format;

/// Extracts an archive file to the specified output directory.
///
/// The format is detected from the file extension. No filter or error
/// handler is installed, so the first failing entry ends the call.
///
/// # Errors
///
/// Returns an error if:
/// - Archive format is unsupported
/// - Archive file cannot be opened or is corrupt
/// - The output directory is invalid
/// - Any entry fails to extract
///
/// # Examples
///
/// ```no_run
/// use dearchive::ExtractOptions;
/// use dearchive::extract_archive;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let options = ExtractOptions::default().with_strip_components(1);
/// let report = extract_archive("archive.tar.gz", "/tmp/output", &options)?;
/// println!("Extracted {} files", report.files_extracted);
/// # Ok(())
/// # }
/// ```
pub fn extract_archive<P: AsRef<Path>, Q: AsRef<Path>>(
    archive_path: P,
    output_dir: Q,
    options: &ExtractOptions,
) -> Result<ExtractionReport> {
    Extractor::new(options.clone()).extract_file(archive_path, output_dir)
}

impl Extractor<'_> {
    /// Opens an archive file, picks the entry source matching its
    /// extension and extracts it into `output_dir`.
    ///
    /// The archive file is closed on every exit path.
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError::UnsupportedFormat` for unknown extensions,
    /// plus every error [`Extractor::extract`] can return.
    pub fn extract_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &mut self,
        archive_path: P,
        output_dir: Q,
    ) -> Result<ExtractionReport> {
        let archive_path = archive_path.as_ref();
        let format = detect_format(archive_path)?;
        log::debug!("opening {} as {}", archive_path.display(), format.name());
        let reader = BufReader::new(File::open(archive_path)?);

        if format == ArchiveType::Zip {
            let mut source = ZipSource::new(reader)?;
            return self.extract(&mut source, output_dir);
        }

        let stream: Box<dyn Read> = match format.compression() {
            Some(codec) => codec.decoder(reader)?,
            None => Box::new(reader),
        };
        let mut archive = tar::Archive::new(stream);
        let mut source = TarSource::new(&mut archive)?.with_format_name(format.name());
        self.extract(&mut source, output_dir)
    }
}
