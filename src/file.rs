//! File-backed bit cursors.

use std::fs::{File, OpenOptions};
use std::path::Path;

use crate::cursor::{AccessMode, BitCursor, BitOrder};
use crate::error::Result;

/// A bit cursor over an open [`std::fs::File`].
pub type BitFile = BitCursor<File>;

impl BitCursor<File> {
    /// Opens `path` with the semantics of the given mode and attaches a
    /// cursor to it.
    ///
    /// Mode mapping: `Read` opens an existing file read-only; `Write`
    /// creates or truncates; `ReadWrite` creates without truncating;
    /// `Append` creates and positions every write at the end (the
    /// descriptor is readable so partially covered bytes can be fetched,
    /// but the cursor itself stays write-only).
    ///
    /// # Errors
    ///
    /// [`BitError::Io`](crate::BitError::Io) if the file cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P, mode: AccessMode, order: BitOrder) -> Result<Self> {
        let mut options = OpenOptions::new();
        match mode {
            AccessMode::Read => options.read(true),
            AccessMode::Write => options.write(true).create(true).truncate(true),
            AccessMode::ReadWrite => options.read(true).write(true).create(true),
            AccessMode::Append => options.read(true).append(true).create(true),
        };
        let file = options.open(path)?;
        Ok(BitCursor::attach(file, mode, order))
    }
}
