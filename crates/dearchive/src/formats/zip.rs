//! ZIP entry source.

use std::io;
use std::io::Read;
use std::io::Seek;

use zip::result::ZipError;

use crate::ExtractionError;
use crate::Result;
use crate::formats::traits::EntrySource;
use crate::formats::traits::SourceEntry;
use crate::types::Entry;

const S_IFMT: u32 = 0o170_000;
const S_IFLNK: u32 = 0o120_000;

/// Entry source over a [`zip::ZipArchive`].
///
/// Entries are produced in central directory order. Symlinks are
/// recognized from the Unix mode stored by Unix archivers; their target is
/// the entry content.
///
/// # Examples
///
/// ```no_run
/// use dearchive::Extractor;
/// use dearchive::formats::ZipSource;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let file = std::fs::File::open("archive.zip")?;
/// let mut source = ZipSource::new(file)?;
/// let report = Extractor::default().extract(&mut source, "/tmp/out")?;
/// # Ok(())
/// # }
/// ```
pub struct ZipSource<R: Read + Seek> {
    archive: zip::ZipArchive<R>,
    index: usize,
}

impl<R: Read + Seek> ZipSource<R> {
    /// Opens a ZIP archive.
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError::InvalidArchive` if the central directory
    /// cannot be read.
    pub fn new(reader: R) -> Result<Self> {
        let archive = zip::ZipArchive::new(reader)?;
        Ok(Self { archive, index: 0 })
    }

    /// Returns the number of entries in the archive.
    #[must_use]
    pub fn len(&self) -> usize {
        self.archive.len()
    }

    /// Returns `true` if the archive has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.archive.len() == 0
    }
}

/// Content of an entry the central directory lists but this build cannot
/// decode (unknown compression method, encryption). Reading it fails, so the
/// failure reaches the error handler like any other entry failure.
struct Undecodable(String);

impl Read for Undecodable {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::Unsupported, self.0.clone()))
    }
}

impl<R: Read + Seek> EntrySource for ZipSource<R> {
    fn next_entry(&mut self) -> Result<Option<SourceEntry<'_>>> {
        if self.index >= self.archive.len() {
            return Ok(None);
        }

        let index = self.index;
        self.index += 1;

        let listed_name = self.archive.name_for_index(index).map(str::to_owned);
        let mut file = match self.archive.by_index(index) {
            Ok(file) => file,
            Err(ZipError::UnsupportedArchive(reason)) => {
                let name = listed_name.unwrap_or_else(|| format!("#{index}"));
                log::debug!("zip entry '{name}' cannot be decoded: {reason}");
                let content = Undecodable(format!("cannot decode zip entry '{name}': {reason}"));
                return Ok(Some(SourceEntry::new(Entry::file(name, None), content)));
            }
            Err(e) => return Err(e.into()),
        };

        let name = file.name().to_string();
        let mode = file.unix_mode().unwrap_or(0);

        if file.is_dir() {
            return Ok(Some(SourceEntry::empty(
                Entry::directory(name).with_mode(mode),
            )));
        }

        if mode & S_IFMT == S_IFLNK {
            let mut target = String::new();
            file.read_to_string(&mut target).map_err(|e| {
                ExtractionError::InvalidArchive(format!("unreadable symlink target for '{name}': {e}"))
            })?;
            return Ok(Some(SourceEntry::empty(
                Entry::symlink(name, target).with_mode(mode),
            )));
        }

        let entry = Entry::file(name, Some(file.size())).with_mode(mode);
        Ok(Some(SourceEntry::new(entry, file)))
    }

    fn format_name(&self) -> &str {
        "zip"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::test_utils::ZipTestBuilder;
    use crate::test_utils::create_test_zip;
    use crate::test_utils::set_zip_compression_method;
    use crate::types::EntryType;
    use std::io::Cursor;

    #[test]
    fn test_zip_files_and_dirs() {
        let data = ZipTestBuilder::new()
            .add_directory("subdir/")
            .add_file_with_mode("subdir/test2", b"zip content", 0o600)
            .build();
        let mut source = ZipSource::new(Cursor::new(data)).unwrap();
        assert_eq!(source.len(), 2);
        assert_eq!(source.format_name(), "zip");

        let dir = source.next_entry().unwrap().unwrap();
        assert!(dir.entry.entry_type.is_directory());
        drop(dir);

        let mut file = source.next_entry().unwrap().unwrap();
        assert_eq!(file.entry.name, "subdir/test2");
        assert_eq!(file.entry.mode & 0o777, 0o600);
        assert_eq!(file.entry.size, Some(11));
        let mut content = String::new();
        file.content.read_to_string(&mut content).unwrap();
        assert_eq!(content, "zip content");
        drop(file);

        assert!(source.next_entry().unwrap().is_none());
    }

    #[test]
    fn test_zip_symlink() {
        let data = ZipTestBuilder::new().add_symlink("link", "target.txt").build();
        let mut source = ZipSource::new(Cursor::new(data)).unwrap();
        let item = source.next_entry().unwrap().unwrap();
        assert_eq!(
            item.entry.entry_type,
            EntryType::Symlink {
                target: "target.txt".into()
            }
        );
    }

    #[test]
    fn test_zip_raw_names_untouched() {
        let data = create_test_zip(vec![("../escape.txt", &b"evil"[..])]);
        let mut source = ZipSource::new(Cursor::new(data)).unwrap();
        let item = source.next_entry().unwrap().unwrap();
        assert_eq!(item.entry.name, "../escape.txt");
    }

    #[test]
    fn test_zip_undecodable_entry_fails_on_read() {
        let mut data = create_test_zip(vec![("a.txt", &b"aaa"[..]), ("b.txt", &b"bbb"[..])]);
        set_zip_compression_method(&mut data, 0, 85);
        let mut source = ZipSource::new(Cursor::new(data)).unwrap();

        let mut bad = source.next_entry().unwrap().unwrap();
        assert_eq!(bad.entry.name, "a.txt");
        let err = bad.content.read_to_end(&mut Vec::new()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Unsupported);
        drop(bad);

        let mut good = source.next_entry().unwrap().unwrap();
        assert_eq!(good.entry.name, "b.txt");
        let mut content = String::new();
        good.content.read_to_string(&mut content).unwrap();
        assert_eq!(content, "bbb");
        drop(good);

        assert!(source.next_entry().unwrap().is_none());
    }

    #[test]
    fn test_zip_compressed_entries() {
        let data = ZipTestBuilder::new()
            .add_file_compressed("b.txt", b"bzip2 body", zip::CompressionMethod::Bzip2)
            .add_file_compressed("z.txt", b"zstd body", zip::CompressionMethod::Zstd)
            .build();
        let mut source = ZipSource::new(Cursor::new(data)).unwrap();

        for expected in ["bzip2 body", "zstd body"] {
            let mut item = source.next_entry().unwrap().unwrap();
            let mut content = String::new();
            item.content.read_to_string(&mut content).unwrap();
            assert_eq!(content, expected);
        }
    }

    #[test]
    fn test_zip_not_an_archive() {
        let result = ZipSource::new(Cursor::new(b"definitely not a zip".to_vec()));
        assert!(matches!(result, Err(ExtractionError::InvalidArchive(_))));
    }
}
