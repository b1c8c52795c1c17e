use bytes::Bytes;
use std::io;

/// A readable, writable and seekable sequence of bytes.
///
/// All methods take `&self`, a stream is shared between messages and synchronize its own cursor.
pub trait Stream: Send + Sync {
    /// Read at most `len` bytes from the current position.
    ///
    /// Returns empty bytes at end of stream.
    fn read(&self, len: usize) -> io::Result<Bytes>;

    /// Read the rest of the stream as string.
    fn contents(&self) -> io::Result<String>;

    /// Write bytes at the current position, returns the number of bytes written.
    fn write(&self, buf: &[u8]) -> io::Result<usize>;

    /// Move the cursor, returns the new position.
    fn seek(&self, pos: io::SeekFrom) -> io::Result<u64>;

    /// Returns the current position.
    fn tell(&self) -> io::Result<u64>;

    /// Returns `true` if the cursor is at the end of the stream.
    fn eof(&self) -> bool;

    /// Returns total size of the stream if known.
    fn size(&self) -> Option<u64>;

    fn is_readable(&self) -> bool;

    fn is_writable(&self) -> bool;

    fn is_seekable(&self) -> bool;

    /// Close the stream, subsequent operations will fail.
    fn close(&self);

    /// Seek to the beginning of the stream.
    fn rewind(&self) -> io::Result<()> {
        self.seek(io::SeekFrom::Start(0)).map(|_| ())
    }

    /// Read the whole stream from the beginning.
    ///
    /// Returns empty string if the stream cannot be read.
    fn to_string_lossy(&self) -> String {
        if self.is_seekable() && self.rewind().is_err() {
            return String::new();
        }
        self.contents().unwrap_or_default()
    }
}
