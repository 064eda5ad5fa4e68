//! The byte-stream capability consumed by [`BitCursor`](crate::BitCursor).
//!
//! A bit cursor never touches its medium directly; it goes through the
//! [`ByteStream`] trait, which exposes exactly the single-byte get/put,
//! seek/tell and flush primitives the cursor needs. Anything that is
//! `Read + Write + Seek` (an open [`std::fs::File`], an in-memory
//! `std::io::Cursor<Vec<u8>>`, ...) implements it for free.

use std::io::{self, Read, Seek, SeekFrom, Write};

/// Single-byte access to a seekable byte-addressable medium.
pub trait ByteStream {
    /// Reads the byte at the stream cursor, advancing it.
    ///
    /// Returns `Ok(None)` at end-of-data. This is the only EOF signal a
    /// bit cursor ever sees; it is never an `Err`.
    fn read_byte(&mut self) -> io::Result<Option<u8>>;

    /// Writes one byte at the stream cursor, advancing it.
    fn write_byte(&mut self, byte: u8) -> io::Result<()>;

    /// Moves the stream cursor, returning the new offset from the start.
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64>;

    /// Reports the stream cursor's offset from the start.
    fn stream_position(&mut self) -> io::Result<u64>;

    /// Pushes any pending output to the medium.
    fn flush(&mut self) -> io::Result<()>;
}

impl<T: Read + Write + Seek> ByteStream for T {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut buf = [0u8; 1];
        loop {
            match self.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(buf[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        self.write_all(&[byte])
    }

    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        Seek::seek(self, pos)
    }

    fn stream_position(&mut self) -> io::Result<u64> {
        Seek::stream_position(self)
    }

    fn flush(&mut self) -> io::Result<()> {
        Write::flush(self)
    }
}
