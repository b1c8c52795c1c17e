use bytes::{Bytes, BytesMut};
use std::io;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::Stream;

/// In memory [`Stream`].
///
/// Readable, writable and seekable until closed.
#[derive(Debug, Default)]
pub struct MemoryStream {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    buf: BytesMut,
    pos: usize,
    closed: bool,
}

impl MemoryStream {
    /// Create new empty [`MemoryStream`].
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create [`MemoryStream`] containing `bytes`, with the cursor at the beginning.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            inner: Mutex::new(Inner {
                buf: BytesMut::from(bytes),
                pos: 0,
                closed: false,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn detached() -> io::Error {
    io::Error::other("stream is detached")
}

impl Inner {
    fn open(&mut self) -> io::Result<&mut Self> {
        if self.closed {
            Err(detached())
        } else {
            Ok(self)
        }
    }

    fn remaining(&self) -> &[u8] {
        self.buf.get(self.pos..).unwrap_or_default()
    }
}

impl Stream for MemoryStream {
    fn read(&self, len: usize) -> io::Result<Bytes> {
        let mut lock = self.lock();
        let inner = lock.open()?;
        let remaining = inner.remaining();
        let chunk = Bytes::copy_from_slice(&remaining[..len.min(remaining.len())]);
        inner.pos += chunk.len();
        Ok(chunk)
    }

    fn contents(&self) -> io::Result<String> {
        let mut lock = self.lock();
        let inner = lock.open()?;
        let contents = String::from_utf8_lossy(inner.remaining()).into_owned();
        inner.pos = inner.buf.len().max(inner.pos);
        Ok(contents)
    }

    fn write(&self, buf: &[u8]) -> io::Result<usize> {
        let mut lock = self.lock();
        let inner = lock.open()?;
        if inner.buf.len() < inner.pos {
            inner.buf.resize(inner.pos, 0);
        }
        let overlap = buf.len().min(inner.buf.len() - inner.pos);
        let (head, tail) = buf.split_at(overlap);
        inner.buf[inner.pos..inner.pos + overlap].copy_from_slice(head);
        inner.buf.extend_from_slice(tail);
        inner.pos += buf.len();
        Ok(buf.len())
    }

    fn seek(&self, pos: io::SeekFrom) -> io::Result<u64> {
        let mut lock = self.lock();
        let inner = lock.open()?;
        let target = match pos {
            io::SeekFrom::Start(offset) => Some(offset),
            io::SeekFrom::End(offset) => (inner.buf.len() as u64).checked_add_signed(offset),
            io::SeekFrom::Current(offset) => (inner.pos as u64).checked_add_signed(offset),
        };
        let Some(target) = target.and_then(|t| usize::try_from(t).ok()) else {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("unable to seek to stream position {pos:?}"),
            ));
        };
        inner.pos = target;
        Ok(target as u64)
    }

    fn tell(&self) -> io::Result<u64> {
        let mut lock = self.lock();
        Ok(lock.open()?.pos as u64)
    }

    fn eof(&self) -> bool {
        let inner = self.lock();
        inner.closed || inner.pos >= inner.buf.len()
    }

    fn size(&self) -> Option<u64> {
        let inner = self.lock();
        (!inner.closed).then_some(inner.buf.len() as u64)
    }

    fn is_readable(&self) -> bool {
        !self.lock().closed
    }

    fn is_writable(&self) -> bool {
        !self.lock().closed
    }

    fn is_seekable(&self) -> bool {
        !self.lock().closed
    }

    fn close(&self) {
        let mut inner = self.lock();
        inner.closed = true;
        inner.buf = BytesMut::new();
        inner.pos = 0;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_read_write() {
        let stream = MemoryStream::new();
        assert_eq!(stream.write(b"hello world").unwrap(), 11);
        assert!(stream.eof());
        assert_eq!(stream.tell().unwrap(), 11);

        stream.rewind().unwrap();
        assert_eq!(stream.read(5).unwrap(), "hello");
        assert_eq!(stream.contents().unwrap(), " world");
        assert_eq!(stream.read(5).unwrap(), "");
        assert_eq!(stream.size(), Some(11));
    }

    #[test]
    fn test_overwrite() {
        let stream = MemoryStream::from_bytes(b"abcdef");
        stream.seek(io::SeekFrom::Start(4)).unwrap();
        stream.write(b"XYZ").unwrap();
        assert_eq!(stream.to_string_lossy(), "abcdXYZ");

        stream.seek(io::SeekFrom::End(-1)).unwrap();
        assert_eq!(stream.contents().unwrap(), "Z");
        assert!(stream.seek(io::SeekFrom::Current(-100)).is_err());
    }

    #[test]
    fn test_closed() {
        let stream = MemoryStream::from_bytes(b"abc");
        stream.close();
        assert!(!stream.is_readable());
        assert!(stream.read(1).is_err());
        assert!(stream.write(b"a").is_err());
        assert_eq!(stream.size(), None);
        assert_eq!(stream.to_string_lossy(), "");
    }
}
