//! Downscaling, row padding and two-pixels-per-byte packing.

use crate::{
    config::Nibble,
    consts::PIXELS_PER_BYTE,
    utils::{downscale, join_nibbles, split_byte},
};
use itertools::Itertools;
use snafu::{ensure, Snafu};

#[cfg(feature = "alloc")]
use crate::consts::MAX_NIBBLE;
#[cfg(feature = "alloc")]
use alloc::vec::Vec;

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum PackError {
    #[snafu(display(
        "Invalid image dimensions: {width} * {height} == {} samples expected, but {sample_count} samples were given",
        width * height
    ))]
    InvalidDimensions {
        width: usize,
        height: usize,
        sample_count: usize,
    },
    #[snafu(display("{len} pixels cannot be split into whole packed bytes or padded rows"))]
    InvalidLength { len: usize },
    #[snafu(display("value {value:#04X} at index {index} does not fit in 4 bits"))]
    ValueOutOfRange { index: usize, value: u8 },
    #[snafu(display("output holds {available} elements, but {needed} are needed"))]
    OutputTooSmall { needed: usize, available: usize },
}

/// Number of pixels after padding odd-width rows, i.e. `height * (width + width % 2)`.
///
/// Returns 0 if either dimension is 0. [`pack`] rejects such images instead.
#[inline]
pub const fn pixel_count(width: u16, height: u16) -> usize {
    let width = width as usize;
    (width + width % 2) * height as usize
}

/// Number of bytes [`pack`] produces for an image of the given size.
#[inline]
pub const fn packed_len(width: u16, height: u16) -> usize {
    pixel_count(width, height) / PIXELS_PER_BYTE
}

pub(crate) fn check_dimensions(samples: &[u8], width: u16, height: u16) -> Result<(), PackError> {
    let (width, height) = (usize::from(width), usize::from(height));
    ensure!(
        width != 0 && height != 0 && width * height == samples.len(),
        InvalidDimensionsSnafu {
            width,
            height,
            sample_count: samples.len(),
        }
    );

    Ok(())
}

/// Downscaled intensities of `samples`, row by row, with `designator` appended to every row
/// when `width` is odd. Dimensions must already be checked.
pub(crate) fn padded_nibbles(
    samples: &[u8],
    width: u16,
    designator: Nibble,
) -> impl Iterator<Item = u8> + '_ {
    let width = usize::from(width).max(1);
    let padding = (width % 2 == 1).then_some(designator.get());

    samples
        .chunks(width)
        .flat_map(move |row| row.iter().map(|&sample| downscale(sample)).chain(padding))
}

/// Packs an 8-bit grayscale image into `output`, two pixels per byte.
///
/// Returns the number of bytes written, which is always [`packed_len`].
pub fn pack_into(
    samples: &[u8],
    width: u16,
    height: u16,
    designator: Nibble,
    output: &mut [u8],
) -> Result<usize, PackError> {
    check_dimensions(samples, width, height)?;

    let needed = packed_len(width, height);
    ensure!(
        output.len() >= needed,
        OutputTooSmallSnafu {
            needed,
            available: output.len(),
        }
    );

    let mut written = 0;
    for (byte, (high, low)) in output
        .iter_mut()
        .zip(padded_nibbles(samples, width, designator).tuples())
    {
        *byte = join_nibbles(high, low);
        written += 1;
    }
    debug_assert_eq!(written, needed, "padding produced an odd pixel count");

    Ok(written)
}

/// Splits packed bytes into `output`, one intensity per byte. Padding is kept.
///
/// Returns the number of pixels written.
pub fn unpack_into(packed: &[u8], output: &mut [u8]) -> Result<usize, PackError> {
    let needed = packed.len() * PIXELS_PER_BYTE;
    ensure!(
        output.len() >= needed,
        OutputTooSmallSnafu {
            needed,
            available: output.len(),
        }
    );

    for (&byte, pair) in packed.iter().zip(output.chunks_exact_mut(PIXELS_PER_BYTE)) {
        pair.copy_from_slice(&split_byte(byte));
    }

    Ok(needed)
}

/// The downscaled and padded intensity stream of an image, before packing.
///
/// This is the stream [`encode`](crate::encode) compresses.
#[cfg(feature = "alloc")]
pub fn to_nibbles(
    samples: &[u8],
    width: u16,
    height: u16,
    designator: Nibble,
) -> Result<Vec<u8>, PackError> {
    check_dimensions(samples, width, height)?;

    let mut nibbles = Vec::with_capacity(pixel_count(width, height));
    nibbles.extend(padded_nibbles(samples, width, designator));
    Ok(nibbles)
}

/// Packs an 8-bit grayscale image, two pixels per byte.
#[cfg(feature = "alloc")]
pub fn pack(
    samples: &[u8],
    width: u16,
    height: u16,
    designator: Nibble,
) -> Result<Vec<u8>, PackError> {
    let mut packed = alloc::vec![0; packed_len(width, height)];
    pack_into(samples, width, height, designator, &mut packed)?;
    Ok(packed)
}

/// Packs an already padded intensity stream, two pixels per byte.
#[cfg(feature = "alloc")]
pub fn pack_nibbles(nibbles: &[u8]) -> Result<Vec<u8>, PackError> {
    ensure!(
        nibbles.len() % PIXELS_PER_BYTE == 0,
        InvalidLengthSnafu { len: nibbles.len() }
    );
    if let Some((index, &value)) = nibbles.iter().find_position(|&&n| n > MAX_NIBBLE) {
        return ValueOutOfRangeSnafu { index, value }.fail();
    }

    Ok(join_pairs(nibbles))
}

/// Pairs up intensities that are known to be in range. A trailing odd pixel is dropped.
#[cfg(feature = "alloc")]
pub(crate) fn join_pairs(nibbles: &[u8]) -> Vec<u8> {
    nibbles
        .iter()
        .tuples()
        .map(|(&high, &low)| join_nibbles(high, low))
        .collect()
}

/// Splits packed bytes into one intensity per byte. Padding is kept.
#[cfg(feature = "alloc")]
pub fn unpack(packed: &[u8]) -> Vec<u8> {
    packed.iter().flat_map(|&byte| split_byte(byte)).collect()
}

/// Drops the padding pixel from the end of every row of an odd-`width` image.
#[cfg(feature = "alloc")]
pub fn strip_padding(nibbles: &[u8], width: u16) -> Result<Vec<u8>, PackError> {
    let width = usize::from(width);
    ensure!(
        width != 0,
        InvalidDimensionsSnafu {
            width,
            height: 0usize,
            sample_count: nibbles.len(),
        }
    );

    let padded_width = width + width % 2;
    ensure!(
        nibbles.len() % padded_width == 0,
        InvalidLengthSnafu { len: nibbles.len() }
    );

    if padded_width == width {
        return Ok(nibbles.to_vec());
    }

    Ok(nibbles
        .chunks_exact(padded_width)
        .flat_map(|row| &row[..width])
        .copied()
        .collect())
}
