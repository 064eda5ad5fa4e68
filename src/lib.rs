#![doc(html_root_url = "https://docs.rs/bitfile/0.1.0")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

//! # bitfile - bit-granularity I/O over byte streams
//!
//! `bitfile` layers a bit-level read/write cursor on top of any seekable
//! byte-addressable medium: request arbitrary bit counts (not necessarily
//! multiples of 8) and seek to arbitrary bit positions, and the crate
//! translates them into correct byte-level I/O. Partial-byte writes go
//! through a read-modify-write cycle so untouched bits survive, and each
//! cursor interprets bytes most-significant-bit-first or
//! least-significant-bit-first, chosen at attach time.
//!
//! ## Features
//!
//! - [`BitCursor`] over anything implementing the [`ByteStream`] capability
//!   (`Read + Write + Seek` types get it for free)
//! - [`BitFile`] convenience for on-disk media
//! - Short reads and writes reported through counts, never through
//!   exceptions; reads past end-of-data come back zero-padded
//! - Bit-level seeking with offset normalization, position snapshots and
//!   a sticky fault state for seeks before the start of the medium
//!
//! ## Reading bits
//!
//! ```
//! use std::io::Cursor;
//! use bitfile::{AccessMode, BitCursor, BitOrder};
//!
//! # fn main() -> bitfile::Result<()> {
//! let medium = Cursor::new(vec![0x74u8, 0x75]);
//! let mut cur = BitCursor::attach(medium, AccessMode::Read, BitOrder::MsbFirst);
//!
//! let (value, bits_read) = cur.read_u64(6)?;
//! assert_eq!((value, bits_read), (0b011101, 6));
//!
//! // A full byte is the same number under either bit order.
//! cur.rewind()?;
//! assert_eq!(cur.read_u64(8)?, (116, 8));
//! # Ok(())
//! # }
//! ```
//!
//! ## Writing bits
//!
//! ```
//! use std::io::Cursor;
//! use bitfile::{AccessMode, BitCursor, BitOrder, Whence};
//!
//! # fn main() -> bitfile::Result<()> {
//! let medium = Cursor::new(vec![0xFFu8]);
//! let mut cur = BitCursor::attach(medium, AccessMode::ReadWrite, BitOrder::LsbFirst);
//!
//! // Clear the low nibble; the high nibble of the existing byte survives.
//! cur.write_u64(0, 4)?;
//! cur.seek(0, 0, Whence::Start)?;
//! assert_eq!(cur.read_u64(8)?, (0xF0, 8));
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - `cursor`: the bit cursor engine and its supporting types
//! - `stream`: the byte-stream capability the cursor consumes
//! - `file`: file-backed cursors
//! - `error`: error types and the crate [`Result`] alias
//! - `utils`: buffer sizing and byte-order helpers

/// The bit cursor engine and its supporting types
pub mod cursor;

/// Error types and utilities
pub mod error;

/// File-backed bit cursors
pub mod file;

/// The byte-stream capability consumed by cursors
pub mod stream;

/// Buffer sizing and byte-order helpers
pub mod utils;

pub use cursor::{AccessMode, BitCursor, BitOrder, BitPosition, Whence};
pub use error::{BitError, Result};
pub use file::BitFile;
pub use stream::ByteStream;
pub use utils::{byte_len, swap_byte_order};
