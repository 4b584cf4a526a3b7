use crate::consts::MAX_NIBBLE;

/// Maps an 8-bit sample onto the 0..=15 intensity range, rounding to the nearest level.
#[inline]
pub const fn downscale(sample: u8) -> u8 {
    // 15 / 255 == 1 / 17, and 17 is odd, so there are no ties to break.
    ((sample as u16 + 8) / 17) as u8
}

/// Maps a 4-bit intensity back onto the full 8-bit range. Does not mask off higher bits.
#[inline]
pub const fn upscale(nibble: u8) -> u8 {
    nibble.wrapping_mul(17)
}

/// Combines two intensities into one packed byte, the first one in the high nibble.
#[inline]
pub(crate) const fn join_nibbles(high: u8, low: u8) -> u8 {
    (high << 4) | (low & MAX_NIBBLE)
}

/// Splits a packed byte into its two intensities, high nibble first.
#[inline]
pub const fn split_byte(byte: u8) -> [u8; 2] {
    [byte >> 4, byte & MAX_NIBBLE]
}

/// Composes a run record. Does not check that `length` is in range.
#[inline]
pub(crate) const fn run_record(value: u8, length: u8) -> u8 {
    (value << 4) | length
}

/// Splits a run record into `(value, length)`.
#[inline]
pub const fn split_run(record: u8) -> (u8, u8) {
    (record >> 4, record & MAX_NIBBLE)
}
