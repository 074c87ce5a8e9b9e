//! File copy with a reusable buffer.
//!
//! One buffer is allocated per extraction call and reused for every file,
//! instead of the per-call buffer `std::io::copy` would use.

use std::io::Read;
use std::io::Write;
use std::io::{self};

use crate::ExtractionError;

/// Buffer size for I/O operations (64KB).
const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Heap buffer reused across copy operations.
///
/// # Examples
///
/// ```no_run
/// # use dearchive::copy::{CopyBuffer, copy_with_buffer};
/// # use dearchive::ExtractionError;
/// # fn example() -> Result<(), ExtractionError> {
/// let mut buffer = CopyBuffer::new();
/// let mut input = std::fs::File::open("input.txt")?;
/// let mut output = std::fs::File::create("output.txt")?;
///
/// let bytes_copied = copy_with_buffer(&mut input, &mut output, &mut buffer)?;
/// println!("Copied {} bytes", bytes_copied);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct CopyBuffer {
    buf: Box<[u8]>,
}

impl CopyBuffer {
    /// Creates a new zeroed copy buffer.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: vec![0u8; COPY_BUFFER_SIZE].into_boxed_slice(),
        }
    }

    /// Returns the buffer size in bytes.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.buf.len()
    }
}

impl Default for CopyBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Copies data from reader to writer using the provided reusable buffer.
///
/// Interrupted reads are retried. Returns the total number of bytes copied.
///
/// # Errors
///
/// Returns `ExtractionError::Io` if reading or writing fails, or if the byte
/// count would overflow `u64`.
#[inline]
pub fn copy_with_buffer<R: Read + ?Sized, W: Write + ?Sized>(
    reader: &mut R,
    writer: &mut W,
    buffer: &mut CopyBuffer,
) -> Result<u64, ExtractionError> {
    let mut total: u64 = 0;

    loop {
        let bytes_read = match reader.read(&mut buffer.buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(ExtractionError::Io(e)),
        };

        writer.write_all(&buffer.buf[..bytes_read])?;

        total = total.checked_add(bytes_read as u64).ok_or_else(|| {
            ExtractionError::Io(io::Error::other("byte count overflowed while copying"))
        })?;
    }

    Ok(total)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Fails once with `Interrupted`, then delegates.
    struct InterruptOnce<R> {
        inner: R,
        interrupted: bool,
    }

    impl<R: Read> Read for InterruptOnce<R> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(io::Error::from(io::ErrorKind::Interrupted));
            }
            self.inner.read(buf)
        }
    }

    #[test]
    fn test_copy_buffer_new() {
        let buffer = CopyBuffer::default();
        assert_eq!(buffer.size(), 64 * 1024);
    }

    #[test]
    fn test_copy_empty_source() {
        let mut buffer = CopyBuffer::new();
        let mut input = Cursor::new(Vec::<u8>::new());
        let mut output = Vec::new();

        assert_eq!(copy_with_buffer(&mut input, &mut output, &mut buffer).unwrap(), 0);
        assert!(output.is_empty());
    }

    #[test]
    fn test_copy_multiple_chunks() {
        let mut buffer = CopyBuffer::new();
        let input_data: Vec<u8> = (0..COPY_BUFFER_SIZE * 3 + 1000)
            .map(|i| (i % 251) as u8)
            .collect();
        let mut input = Cursor::new(&input_data);
        let mut output = Vec::new();

        let copied = copy_with_buffer(&mut input, &mut output, &mut buffer).unwrap();
        assert_eq!(copied, input_data.len() as u64);
        assert_eq!(output, input_data);
    }

    #[test]
    fn test_copy_retries_interrupted() {
        let mut buffer = CopyBuffer::new();
        let mut input = InterruptOnce {
            inner: Cursor::new(b"payload".to_vec()),
            interrupted: false,
        };
        let mut output = Vec::new();

        assert_eq!(copy_with_buffer(&mut input, &mut output, &mut buffer).unwrap(), 7);
        assert_eq!(output, b"payload");
    }

    #[test]
    fn test_copy_propagates_read_error() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::other("truncated stream"))
            }
        }

        let mut buffer = CopyBuffer::new();
        let mut output = Vec::new();
        let result = copy_with_buffer(&mut Broken, &mut output, &mut buffer);
        assert!(matches!(result, Err(ExtractionError::Io(_))));
    }
}
