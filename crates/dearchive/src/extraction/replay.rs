//! Replayable entry content.
//!
//! Archive streams are read once. To retry an entry whose content was
//! partially consumed, every byte read is recorded in a spool that spills
//! to a temporary file past the configured memory limit. Readers created
//! with [`ReplayReader::passthrough`] record nothing and cannot rewind.

use std::cmp::min;
use std::io;
use std::io::Read;
use std::io::Seek;
use std::io::SeekFrom;
use std::io::Write;

use tempfile::SpooledTempFile;

/// Reader that records what it reads and can start over.
pub(crate) struct ReplayReader<'a> {
    inner: Box<dyn Read + 'a>,
    spool: Option<SpooledTempFile>,
    recorded: u64,
    replay_pos: Option<u64>,
}

impl<'a> ReplayReader<'a> {
    pub(crate) fn new(inner: Box<dyn Read + 'a>, memory_limit: usize) -> Self {
        Self {
            inner,
            spool: Some(SpooledTempFile::new(memory_limit)),
            recorded: 0,
            replay_pos: None,
        }
    }

    /// Wraps `inner` without recording; [`rewind`](Self::rewind) fails once
    /// anything was read.
    pub(crate) fn passthrough(inner: Box<dyn Read + 'a>) -> Self {
        Self {
            inner,
            spool: None,
            recorded: 0,
            replay_pos: None,
        }
    }

    pub(crate) const fn is_spooling(&self) -> bool {
        self.spool.is_some()
    }

    /// Starts reading again from the first byte.
    ///
    /// # Errors
    ///
    /// Fails if the reader does not record, or an earlier spool write
    /// failed, and content was already consumed.
    pub(crate) fn rewind(&mut self) -> io::Result<()> {
        if self.spool.is_none() {
            return Err(io::Error::other("entry content cannot be replayed"));
        }
        if self.recorded > 0 {
            self.replay_pos = Some(0);
        }
        Ok(())
    }

    fn read_recorded(&mut self, pos: u64, buf: &mut [u8]) -> io::Result<usize> {
        let spool = self
            .spool
            .as_mut()
            .ok_or_else(|| io::Error::other("entry content cannot be replayed"))?;
        spool.seek(SeekFrom::Start(pos))?;
        let remaining = self.recorded - pos;
        let max = usize::try_from(remaining).map_or(buf.len(), |r| min(r, buf.len()));
        let n = spool.read(&mut buf[..max])?;
        if n == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "replay spool shorter than recorded",
            ));
        }
        let next = pos + n as u64;
        self.replay_pos = (next < self.recorded).then_some(next);
        Ok(n)
    }
}

impl Read for ReplayReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        if let Some(pos) = self.replay_pos {
            return self.read_recorded(pos, buf);
        }

        let n = self.inner.read(buf)?;
        if n == 0 {
            return Ok(0);
        }
        if let Some(spool) = self.spool.as_mut() {
            let spooled = spool
                .seek(SeekFrom::End(0))
                .and_then(|_| spool.write_all(&buf[..n]));
            match spooled {
                Ok(()) => self.recorded += n as u64,
                Err(e) => {
                    self.spool = None;
                    log::warn!("disabling entry replay: {e}");
                }
            }
        }
        Ok(n)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn reader(data: &[u8], limit: usize) -> ReplayReader<'static> {
        ReplayReader::new(Box::new(Cursor::new(data.to_vec())), limit)
    }

    #[test]
    fn test_passthrough() {
        let mut r = reader(b"hello world", 1024);
        let mut out = String::new();
        r.read_to_string(&mut out).unwrap();
        assert_eq!(out, "hello world");
    }

    #[test]
    fn test_rewind_after_partial_read() {
        let mut r = reader(b"0123456789", 1024);
        let mut head = [0u8; 4];
        r.read_exact(&mut head).unwrap();
        assert_eq!(&head, b"0123");

        r.rewind().unwrap();
        let mut all = Vec::new();
        r.read_to_end(&mut all).unwrap();
        assert_eq!(all, b"0123456789");
    }

    #[test]
    fn test_rewind_twice_and_after_full_read() {
        let mut r = reader(b"abcdef", 1024);
        let mut all = Vec::new();
        r.read_to_end(&mut all).unwrap();

        for _ in 0..2 {
            r.rewind().unwrap();
            let mut again = Vec::new();
            r.read_to_end(&mut again).unwrap();
            assert_eq!(again, b"abcdef");
        }
    }

    #[test]
    fn test_rewind_spills_to_disk() {
        let data: Vec<u8> = (0..200_000u32).map(|i| (i % 253) as u8).collect();
        let mut r = ReplayReader::new(Box::new(Cursor::new(data.clone())), 16);
        let mut head = vec![0u8; 150_000];
        r.read_exact(&mut head).unwrap();

        r.rewind().unwrap();
        let mut all = Vec::new();
        r.read_to_end(&mut all).unwrap();
        assert_eq!(all, data);
    }

    #[test]
    fn test_rewind_before_any_read() {
        let mut r = reader(b"xyz", 0);
        r.rewind().unwrap();
        let mut out = Vec::new();
        r.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"xyz");
    }

    #[test]
    fn test_passthrough_records_nothing() {
        let mut r = ReplayReader::passthrough(Box::new(Cursor::new(b"stream".to_vec())));
        assert!(!r.is_spooling());

        let mut out = Vec::new();
        r.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"stream");
        assert_eq!(r.recorded, 0);
        assert!(r.rewind().is_err());
    }
}
