//! The bit cursor engine.
//!
//! [`BitCursor`] layers a bit-granular read/write position on top of any
//! [`ByteStream`]. It buffers exactly one byte of the medium at a time and
//! tracks a sub-byte bit offset, refilling (reads) or flushing (writes) the
//! buffered byte whenever an operation crosses a byte boundary. Within each
//! byte, bits are consumed most-significant-first or least-significant-first
//! depending on the configured [`BitOrder`].
//!
//! Example:
//! ```
//! use std::io::Cursor;
//! use bitfile::{AccessMode, BitCursor, BitOrder};
//!
//! # fn main() -> bitfile::Result<()> {
//! let medium = Cursor::new(vec![0b0111_0100u8]);
//! let mut cur = BitCursor::attach(medium, AccessMode::Read, BitOrder::LsbFirst);
//!
//! let (value, n) = cur.read_u64(6)?;
//! assert_eq!((value, n), (0b11_0100, 6));
//! # Ok(())
//! # }
//! ```

use std::io::SeekFrom;
use std::str::FromStr;

use bytes::{Bytes, BytesMut};

use crate::error::{BitError, Result};
use crate::stream::ByteStream;
use crate::utils::byte_len;

/// Bits per byte of the underlying medium.
const BYTE_BITS: u8 = 8;

/// Which physical bit of a byte corresponds to logical bit offset 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitOrder {
    /// Bit offset 0 is the most significant bit (left-to-right).
    MsbFirst,
    /// Bit offset 0 is the least significant bit (right-to-left).
    LsbFirst,
}

/// The capability set a cursor is attached with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    /// Read-only (`"r"`).
    Read,
    /// Write-only, truncating on open (`"w"`).
    Write,
    /// Read and write (`"r+"`, `"w+"`, `"a+"`).
    ReadWrite,
    /// Write-only, appending on open (`"a"`).
    Append,
}

impl AccessMode {
    /// True if the mode grants the read capability.
    pub fn readable(self) -> bool {
        matches!(self, AccessMode::Read | AccessMode::ReadWrite)
    }

    /// True if the mode grants the write capability.
    pub fn writable(self) -> bool {
        !matches!(self, AccessMode::Read)
    }
}

impl FromStr for AccessMode {
    type Err = BitError;

    /// Parses a C-style access mode string: `r`, `w`, `a`, optionally
    /// followed by `+` and/or `b` in either order. The `b` suffix is
    /// accepted and ignored; all media are binary here.
    fn from_str(s: &str) -> Result<Self> {
        let mut base = None;
        let mut plus = false;
        for (i, c) in s.chars().enumerate() {
            match c {
                'r' | 'w' | 'a' if i == 0 => base = Some(c),
                '+' if i > 0 && !plus => plus = true,
                'b' if i > 0 => {}
                _ => return Err(BitError::InvalidMode(s.to_string())),
            }
        }
        match (base, plus) {
            (Some('r'), false) => Ok(AccessMode::Read),
            (Some('w'), false) => Ok(AccessMode::Write),
            (Some('a'), false) => Ok(AccessMode::Append),
            (Some(_), true) => Ok(AccessMode::ReadWrite),
            _ => Err(BitError::InvalidMode(s.to_string())),
        }
    }
}

/// Reference point for [`BitCursor::seek`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Whence {
    /// Offsets are relative to the start of the medium.
    Start,
    /// Offsets are relative to the cursor's logical bit position.
    Current,
    /// Offsets are relative to the end of the medium.
    End,
}

/// A saved logical position, restorable with [`BitCursor::set_position`].
///
/// `bit_offset` must be in `[0, 8)`; out-of-range snapshots are rejected by
/// `set_position`, never normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitPosition {
    /// Whole bytes from the start of the medium.
    pub byte_offset: i64,
    /// Bits into the byte at `byte_offset`, `0..8`.
    pub bit_offset: u8,
}

/// Tagged cursor health, instead of overloading the bit offset's sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CursorState {
    Normal,
    Faulted,
}

/// A bit-granular cursor over a byte-addressable medium.
///
/// The cursor owns its stream for its whole lifetime; dropping the cursor
/// (or calling [`into_inner`](BitCursor::into_inner)) releases it. Cached
/// state is mutated in place on every call, so a cursor must not be shared
/// between threads without external serialization.
///
/// Buffering invariant: whenever `primed` is true, `current` holds the byte
/// the bit offset points into and the stream's own cursor sits exactly one
/// byte past it. `bit_offset == 8` means the buffered byte is fully consumed
/// and a refill happens before the next bit; this is also the freshly
/// attached state, forcing a refill on first use.
#[derive(Debug)]
pub struct BitCursor<S: ByteStream> {
    stream: S,
    /// The buffered byte, or `None` when nothing valid is cached
    /// (not yet primed, or the refill hit end-of-data).
    current: Option<u8>,
    /// True iff the stream cursor is one byte past `current`. False while
    /// unprimed and while `current` caches a zero byte past end-of-data.
    primed: bool,
    /// Logical bit offset into `current`, `0..=8`.
    bit_offset: u8,
    order: BitOrder,
    mode: AccessMode,
    state: CursorState,
    eof: bool,
    io_error: bool,
}

impl<S: ByteStream> BitCursor<S> {
    /// Attaches a cursor to a stream with the given capabilities and bit
    /// order. Performs no I/O; the first bit operation primes the buffer.
    pub fn attach(stream: S, mode: AccessMode, order: BitOrder) -> Self {
        BitCursor {
            stream,
            current: None,
            primed: false,
            bit_offset: BYTE_BITS,
            order,
            mode,
            state: CursorState::Normal,
            eof: false,
            io_error: false,
        }
    }

    /// The bit order the cursor was attached with.
    pub fn order(&self) -> BitOrder {
        self.order
    }

    /// The access mode the cursor was attached with.
    pub fn mode(&self) -> AccessMode {
        self.mode
    }

    /// Reads up to `bit_count` bits into `dest`, returning the number of
    /// bits actually read.
    ///
    /// Hitting end-of-data mid-read is a *short read*, not an error: the
    /// bits gathered so far are returned and every destination bit past the
    /// returned count is zero, so `dest[..byte_len(bit_count)]` is always
    /// fully defined. A partial final byte is right-aligned: its valid bits
    /// occupy the low positions regardless of bit order.
    ///
    /// An underlying I/O failure mid-read also stops with a short count and
    /// is recorded for [`is_error`](Self::is_error).
    ///
    /// # Errors
    ///
    /// [`BitError::NotReadable`] without the read capability,
    /// [`BitError::CursorFault`] while faulted. Neither touches `dest`.
    ///
    /// # Panics
    ///
    /// If `dest` is shorter than `byte_len(bit_count)` bytes.
    pub fn read_bits(&mut self, dest: &mut [u8], bit_count: u64) -> Result<u64> {
        self.check_normal()?;
        if !self.mode.readable() {
            return Err(BitError::NotReadable);
        }
        let byte_count = byte_len(bit_count);
        assert!(
            dest.len() >= byte_count,
            "destination holds {} bytes but {} bits require {}",
            dest.len(),
            bit_count,
            byte_count
        );

        let mut read = 0u64;
        while read < bit_count {
            if self.bit_offset >= BYTE_BITS && !self.refill() {
                break;
            }
            let Some(byte) = self.current else { break };

            let idx = (read / 8) as usize;
            if read % 8 == 0 {
                dest[idx] = 0;
            }
            let src_mask = 1u8 << self.physical(self.bit_offset);
            let dst_mask = 1u8 << self.physical((read % 8) as u8);
            if byte & src_mask != 0 {
                dest[idx] |= dst_mask;
            }
            self.bit_offset += 1;
            read += 1;
        }

        // Right-align the valid bits of a partial final byte. LsbFirst
        // already packed them in the low positions.
        let rem = (read % 8) as u8;
        if rem != 0 && self.order == BitOrder::MsbFirst {
            dest[(read / 8) as usize] >>= BYTE_BITS - rem;
        }
        for byte in &mut dest[byte_len(read)..byte_count] {
            *byte = 0;
        }
        Ok(read)
    }

    /// Reads up to `bit_count` (max 64) bits as a fixed-width integer.
    ///
    /// Returns `(value, bits_read)`. The value is assembled from the bit
    /// buffer little-endian, i.e. the first byte read is the least
    /// significant; unread bits are zero.
    ///
    /// # Panics
    ///
    /// If `bit_count > 64`.
    pub fn read_u64(&mut self, bit_count: u32) -> Result<(u64, u64)> {
        assert!(bit_count <= 64, "read_u64 is limited to 64 bits");
        let mut buf = [0u8; 8];
        let n = self.read_bits(&mut buf, u64::from(bit_count))?;
        Ok((u64::from_le_bytes(buf), n))
    }

    /// Reads up to `bit_count` bits into an owned, zero-padded buffer of
    /// exactly `byte_len(bit_count)` bytes. Returns `(bytes, bits_read)`.
    pub fn read_bytes(&mut self, bit_count: u64) -> Result<(Bytes, u64)> {
        let mut buf = BytesMut::zeroed(byte_len(bit_count));
        let n = self.read_bits(&mut buf, bit_count)?;
        Ok((buf.freeze(), n))
    }

    /// Writes `bit_count` bits from `src`, returning the number of bits
    /// committed to the medium.
    ///
    /// The medium is byte-addressable, so partially covered bytes go
    /// through a read-modify-write cycle: the existing byte is fetched
    /// first (or taken as zero past end-of-data) and only the addressed
    /// bits change. A partial final source byte holds its valid bits in
    /// the LOW positions; with `MsbFirst` ordering they are shifted to the
    /// head of the output byte so the stream stays contiguous.
    ///
    /// An underlying write failure stops early; the returned count then
    /// excludes bits left in the unflushed buffer and the failure is
    /// recorded for [`is_error`](Self::is_error).
    ///
    /// # Errors
    ///
    /// [`BitError::NotWritable`] without the write capability,
    /// [`BitError::CursorFault`] while faulted.
    ///
    /// # Panics
    ///
    /// If `src` is shorter than `byte_len(bit_count)` bytes.
    pub fn write_bits(&mut self, src: &[u8], bit_count: u64) -> Result<u64> {
        self.check_normal()?;
        if !self.mode.writable() {
            return Err(BitError::NotWritable);
        }
        let byte_count = byte_len(bit_count);
        assert!(
            src.len() >= byte_count,
            "source holds {} bytes but {} bits require {}",
            src.len(),
            bit_count,
            byte_count
        );
        if bit_count == 0 {
            return Ok(0);
        }

        // Arm the buffer with the byte about to be partially overwritten.
        if self.bit_offset >= BYTE_BITS {
            if self.load_target_byte().is_err() {
                return Ok(0);
            }
            self.bit_offset = 0;
        } else if self.current.is_none() && self.load_target_byte().is_err() {
            return Ok(0);
        }

        let last = byte_count - 1;
        let mut written = 0u64;
        let mut shift = 0u8;
        while written < bit_count {
            if self.bit_offset >= BYTE_BITS {
                if self.flush_current().is_err() {
                    // Bits still sitting in the buffer never reached the
                    // medium.
                    return Ok(written.saturating_sub(u64::from(self.bit_offset)));
                }
                if self.load_target_byte().is_err() {
                    return Ok(written);
                }
                self.bit_offset = 0;
            }

            let idx = (written / 8) as usize;
            if written % 8 == 0 && self.order == BitOrder::MsbFirst && idx == last {
                // Valid bits of the final byte sit in its low positions.
                shift = ((BYTE_BITS as u64 - (bit_count - written)) % 8) as u8;
            }
            let src_mask = 1u8 << self.physical(shift + (written % 8) as u8);
            let dst_mask = 1u8 << self.physical(self.bit_offset);
            let cur = self.current.unwrap_or(0);
            self.current = Some(if src[idx] & src_mask != 0 {
                cur | dst_mask
            } else {
                cur & !dst_mask
            });
            self.bit_offset += 1;
            written += 1;
        }

        if self.flush_current().is_err() {
            written = written.saturating_sub(u64::from(self.bit_offset));
        }
        Ok(written)
    }

    /// Writes the low `bit_count` (max 64) bits of `value`, first byte out
    /// being the least significant. Returns the number of bits committed.
    ///
    /// # Panics
    ///
    /// If `bit_count > 64`.
    pub fn write_u64(&mut self, value: u64, bit_count: u32) -> Result<u64> {
        assert!(bit_count <= 64, "write_u64 is limited to 64 bits");
        self.write_bits(&value.to_le_bytes(), u64::from(bit_count))
    }

    /// Moves the cursor to `byte_offset` bytes plus `bit_offset` bits from
    /// `whence`, then re-primes the buffered byte at the new position.
    ///
    /// Bit offsets outside `[0, 8)` are normalized by folding whole bytes
    /// into the byte offset, so `seek(0, 17, Start)` and `seek(2, 1, Start)`
    /// land identically. `Whence::Current` is relative to the logical bit
    /// position ([`tell`](Self::tell)), lookahead included.
    ///
    /// Landing at or past end-of-data is not an error; subsequent reads
    /// simply short-circuit to a zero count. A position before the start of
    /// the medium puts the cursor in the sticky fault state and every bit
    /// operation fails with [`BitError::CursorFault`] until
    /// [`clear_error`](Self::clear_error) or [`rewind`](Self::rewind).
    pub fn seek(&mut self, byte_offset: i64, bit_offset: i64, whence: Whence) -> Result<()> {
        self.check_normal()?;
        let base: i128 = match whence {
            Whence::Start => 0,
            Whence::Current => self.tell()? as i128,
            Whence::End => {
                let end = self
                    .stream
                    .seek(SeekFrom::End(0))
                    .map_err(|e| self.record_io(e))?;
                i128::from(end) * 8
            }
        };
        let target = base + i128::from(byte_offset) * 8 + i128::from(bit_offset);
        if target < 0 {
            log::debug!("seek to negative bit position {target}, cursor faulted");
            self.state = CursorState::Faulted;
            return Err(BitError::CursorFault);
        }
        self.stream
            .seek(SeekFrom::Start((target / 8) as u64))
            .map_err(|e| self.record_io(e))?;
        self.bit_offset = (target % 8) as u8;
        self.reprime();
        Ok(())
    }

    /// The absolute bit position, i.e. `byte * 8 + bit` of the next bit to
    /// be transferred. Purely derived; corrects for the one-byte lookahead
    /// (the stream's raw position is one byte past the buffered byte).
    pub fn tell(&mut self) -> Result<u64> {
        let pos = self
            .stream
            .stream_position()
            .map_err(|e| self.record_io(e))?;
        let bits = pos * 8 + u64::from(self.bit_offset);
        if self.primed {
            Ok(bits - u64::from(BYTE_BITS))
        } else {
            Ok(pos * 8 + u64::from(self.bit_offset % BYTE_BITS))
        }
    }

    /// Snapshots the logical position for a later
    /// [`set_position`](Self::set_position).
    pub fn position(&mut self) -> Result<BitPosition> {
        let bits = self.tell()?;
        Ok(BitPosition {
            byte_offset: (bits / 8) as i64,
            bit_offset: (bits % 8) as u8,
        })
    }

    /// Restores a snapshot taken by [`position`](Self::position) and
    /// re-primes the buffered byte there.
    ///
    /// # Errors
    ///
    /// [`BitError::InvalidPosition`] if the snapshot's bit offset is not in
    /// `[0, 8)` or its byte offset is negative; the cursor is untouched.
    pub fn set_position(&mut self, pos: &BitPosition) -> Result<()> {
        self.check_normal()?;
        if pos.bit_offset >= BYTE_BITS {
            return Err(BitError::InvalidPosition(format!(
                "bit offset {} out of range",
                pos.bit_offset
            )));
        }
        let byte = u64::try_from(pos.byte_offset).map_err(|_| {
            BitError::InvalidPosition(format!("negative byte offset {}", pos.byte_offset))
        })?;
        self.stream
            .seek(SeekFrom::Start(byte))
            .map_err(|e| self.record_io(e))?;
        self.bit_offset = pos.bit_offset;
        self.reprime();
        Ok(())
    }

    /// Returns the stream to its start and resets the cursor as freshly
    /// attached, keeping the bit order. Clears a fault, the end-of-data
    /// sentinel and any recorded I/O error.
    pub fn rewind(&mut self) -> Result<()> {
        self.stream
            .seek(SeekFrom::Start(0))
            .map_err(|e| self.record_io(e))?;
        self.current = None;
        self.primed = false;
        self.bit_offset = BYTE_BITS;
        self.state = CursorState::Normal;
        self.eof = false;
        self.io_error = false;
        Ok(())
    }

    /// True if the cursor is faulted or an underlying I/O failure was
    /// recorded during a transfer.
    pub fn is_error(&self) -> bool {
        self.state == CursorState::Faulted || self.io_error
    }

    /// True once a refill has observed end-of-data and the condition is
    /// still pending (a successful seek or rewind clears it).
    pub fn is_end_of_data(&self) -> bool {
        self.eof
    }

    /// Clears the fault state, the end-of-data sentinel and any recorded
    /// I/O error. This is the only way out of the fault state besides
    /// [`rewind`](Self::rewind).
    pub fn clear_error(&mut self) {
        self.state = CursorState::Normal;
        self.eof = false;
        self.io_error = false;
    }

    /// Pass-through to the stream's flush; buffering policy belongs to the
    /// stream collaborator.
    pub fn flush(&mut self) -> Result<()> {
        self.stream.flush().map_err(|e| self.record_io(e))?;
        Ok(())
    }

    /// A shared reference to the underlying stream.
    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    /// Releases and returns the underlying stream, discarding cursor state.
    pub fn into_inner(self) -> S {
        self.stream
    }

    /// Maps a logical bit offset to the physical bit index for the
    /// configured order.
    fn physical(&self, logical: u8) -> u8 {
        match self.order {
            BitOrder::MsbFirst => BYTE_BITS - 1 - logical,
            BitOrder::LsbFirst => logical,
        }
    }

    fn check_normal(&self) -> Result<()> {
        match self.state {
            CursorState::Normal => Ok(()),
            CursorState::Faulted => Err(BitError::CursorFault),
        }
    }

    fn record_io(&mut self, err: std::io::Error) -> BitError {
        log::warn!("underlying stream error: {err}");
        self.io_error = true;
        BitError::Io(err)
    }

    /// Fetches the next byte for reading. Returns false at end-of-data or
    /// on a recorded I/O failure, leaving the cursor position untouched.
    fn refill(&mut self) -> bool {
        match self.stream.read_byte() {
            Ok(Some(byte)) => {
                self.current = Some(byte);
                self.primed = true;
                self.bit_offset = 0;
                true
            }
            Ok(None) => {
                log::debug!("refill reached end of data");
                self.current = None;
                self.primed = false;
                self.eof = true;
                false
            }
            Err(err) => {
                log::warn!("refill failed: {err}");
                self.io_error = true;
                false
            }
        }
    }

    /// Loads the byte at the stream cursor as the read-modify-write target,
    /// substituting zero past end-of-data (or on a non-readable stream).
    fn load_target_byte(&mut self) -> std::io::Result<()> {
        match self.stream.read_byte() {
            Ok(Some(byte)) => {
                self.current = Some(byte);
                self.primed = true;
                self.eof = false;
                Ok(())
            }
            Ok(None) => {
                // Writing past the end extends the medium with a fresh byte.
                self.current = Some(0);
                self.primed = false;
                self.eof = false;
                Ok(())
            }
            Err(_) if !self.mode.readable() => {
                // Write-only media reject the fetch; nothing to preserve.
                self.current = Some(0);
                self.primed = false;
                Ok(())
            }
            Err(err) => {
                log::warn!("read-modify-write fetch failed: {err}");
                self.io_error = true;
                Err(err)
            }
        }
    }

    /// Commits the buffered byte to its own position, stepping the stream
    /// back over the lookahead first when one is armed. Leaves the stream
    /// cursor one byte past the committed byte.
    fn flush_current(&mut self) -> std::io::Result<()> {
        let Some(byte) = self.current else {
            return Ok(());
        };
        let result = (|| {
            if self.primed {
                self.stream.seek(SeekFrom::Current(-1))?;
            }
            self.stream.write_byte(byte)
        })();
        match result {
            Ok(()) => {
                self.primed = true;
                Ok(())
            }
            Err(err) => {
                log::warn!("flush failed: {err}");
                self.io_error = true;
                Err(err)
            }
        }
    }

    /// Re-primes the buffered byte after a reposition. End-of-data is not
    /// an error here; it just arms the short-read path.
    fn reprime(&mut self) {
        match self.stream.read_byte() {
            Ok(Some(byte)) => {
                self.current = Some(byte);
                self.primed = true;
                self.eof = false;
            }
            Ok(None) => {
                self.current = None;
                self.primed = false;
                self.eof = true;
            }
            Err(err) => {
                if self.mode.readable() {
                    log::warn!("reprime failed: {err}");
                    self.io_error = true;
                }
                self.current = None;
                self.primed = false;
            }
        }
    }
}
