use crate::{
    consts::{MAX_NIBBLE, PIXELS_PER_BYTE},
    utils::{join_nibbles, split_run},
};
use snafu::{ensure, Snafu};

#[cfg(feature = "alloc")]
mod alloc_api;
#[cfg(feature = "alloc")]
pub use alloc_api::*;

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(module)]
pub enum DecodeError {
    #[snafu(display("run record {record:#04X} at offset {offset} has a length of 0"))]
    MalformedStream { offset: usize, record: u8 },
    #[snafu(display("output holds {available} pixels, but the stream expands to {needed}"))]
    OutputTooSmall { needed: usize, available: usize },
}

/// Number of pixels `runs` expands to.
///
/// Fails on the first run record with a length of 0.
pub fn decoded_len(runs: &[u8]) -> Result<usize, DecodeError> {
    let mut len = 0;
    for (offset, &record) in runs.iter().enumerate() {
        let (_, length) = split_run(record);
        ensure!(
            length != 0,
            decode_error::MalformedStreamSnafu { offset, record }
        );
        len += usize::from(length);
    }

    Ok(len)
}

/// Expands run records into `output`.
///
/// The whole stream is validated, and the output checked for room, before the first pixel is
/// written. Returns the number of pixels written.
pub fn decode_with(runs: &[u8], mut output: impl DecodeOutput) -> Result<usize, DecodeError> {
    let needed = decoded_len(runs)?;
    if let Some(available) = output.max_len() {
        ensure!(
            available >= needed,
            decode_error::OutputTooSmallSnafu { needed, available }
        );
    }

    for &record in runs {
        let (value, length) = split_run(record);
        output.write_run(value, usize::from(length));
    }

    Ok(output.current_output_position())
}

pub trait DecodeOutput {
    /// Appends `count` pixels of intensity `value`. The caller has checked that they fit.
    fn write_run(&mut self, value: u8, count: usize);

    /// Returns the maximum number of pixels that can be written to the output buffer.
    ///
    /// `None` if the output buffer is unbounded.
    fn max_len(&self) -> Option<usize>;
    fn current_output_position(&self) -> usize;
}

/// Writes one intensity per byte.
pub struct NibbleSliceOutput<'a> {
    output: &'a mut [u8],
    output_idx: usize,
}

impl<'a> NibbleSliceOutput<'a> {
    #[inline]
    pub fn new(slice: &'a mut [u8]) -> Self {
        Self {
            output: slice,
            output_idx: 0,
        }
    }
}

impl DecodeOutput for NibbleSliceOutput<'_> {
    #[inline]
    fn write_run(&mut self, value: u8, count: usize) {
        self.output[self.output_idx..][..count].fill(value);
        self.output_idx += count;
    }

    #[inline]
    fn max_len(&self) -> Option<usize> {
        Some(self.output.len())
    }

    #[inline]
    fn current_output_position(&self) -> usize {
        self.output_idx
    }
}

/// Writes two pixels per byte, the first one in the high nibble, matching the memory layout
/// of a 4bpp framebuffer.
///
/// If the stream ends on an odd pixel, the low nibble of the last byte is left untouched.
pub struct PackedSliceOutput<'a> {
    output: &'a mut [u8],
    pixel_idx: usize,
}

impl<'a> PackedSliceOutput<'a> {
    #[inline]
    pub fn new(slice: &'a mut [u8]) -> Self {
        Self {
            output: slice,
            pixel_idx: 0,
        }
    }
}

impl DecodeOutput for PackedSliceOutput<'_> {
    fn write_run(&mut self, value: u8, mut count: usize) {
        if count == 0 {
            return;
        }

        // finish the byte a previous run left half-filled
        if self.pixel_idx % PIXELS_PER_BYTE == 1 {
            let byte = &mut self.output[self.pixel_idx / PIXELS_PER_BYTE];
            *byte = (*byte & !MAX_NIBBLE) | value;
            self.pixel_idx += 1;
            count -= 1;
        }

        let start = self.pixel_idx / PIXELS_PER_BYTE;
        let pairs = count / PIXELS_PER_BYTE;
        self.output[start..start + pairs].fill(join_nibbles(value, value));
        self.pixel_idx += pairs * PIXELS_PER_BYTE;

        if count % PIXELS_PER_BYTE == 1 {
            let byte = &mut self.output[self.pixel_idx / PIXELS_PER_BYTE];
            *byte = (*byte & MAX_NIBBLE) | (value << 4);
            self.pixel_idx += 1;
        }
    }

    #[inline]
    fn max_len(&self) -> Option<usize> {
        Some(self.output.len() * PIXELS_PER_BYTE)
    }

    #[inline]
    fn current_output_position(&self) -> usize {
        self.pixel_idx
    }
}
