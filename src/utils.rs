//! Buffer helpers shared by the cursor and its callers.

/// Number of bytes needed to hold `bit_count` bits.
pub fn byte_len(bit_count: u64) -> usize {
    ((bit_count + 7) / 8) as usize
}

/// Reverses the byte order of the first `byte_len(bit_count)` bytes of
/// `buf`, mirror-swapping byte `i` with byte `n - 1 - i`.
///
/// The cursor's intra-byte ordering is fixed at attach time; callers
/// assembling multi-byte values combine it with an inter-byte (endian)
/// ordering of their own choosing via this swap. A single byte is a no-op.
///
/// # Panics
///
/// If `buf` is shorter than `byte_len(bit_count)` bytes.
pub fn swap_byte_order(buf: &mut [u8], bit_count: u64) {
    buf[..byte_len(bit_count)].reverse();
}
