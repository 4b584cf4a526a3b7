//! The converted bitmap, as handed to serialization sinks.

use crate::{
    config::{Compression, ConvertOptions, Nibble, NibbleError},
    consts::{PIXELS_PER_BYTE, RECORD_HEADER_LEN},
    decode::{self, DecodeError},
    encode,
    pack::{self, PackError},
};
use alloc::vec::Vec;
use byteorder::{ByteOrder, LittleEndian};
use snafu::{ensure, ResultExt, Snafu};

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum BitmapError {
    #[snafu(display("record is truncated: expected {expected} bytes, got {actual}"))]
    UnexpectedEof { expected: usize, actual: usize },
    #[snafu(display("`{field}` must be 0 or 1, but is {value}"))]
    InvalidBool { field: &'static str, value: u8 },
    #[snafu(display("invalid transparent pixel designator: {source}"))]
    Designator { source: NibbleError },
    #[snafu(display("bitmap dimensions {width}x{height} are empty"))]
    ZeroDimensions { width: u16, height: u16 },
    #[snafu(display("record is followed by {extra} unexpected bytes"))]
    TrailingData { extra: usize },
    #[snafu(display("pixel data of {size} bytes does not fit the 32-bit size field"))]
    PayloadTooLarge { size: usize },
    #[snafu(display("could not decode pixel data: {source}"))]
    Decode { source: DecodeError },
    #[snafu(display("could not remove row padding: {source}"))]
    Unpad { source: PackError },
    #[snafu(display("pixel data holds {actual} pixels, but the bitmap needs {expected}"))]
    PixelCountMismatch { expected: usize, actual: usize },
}

/// A converted bitmap: its dimensions, its transparency settings and its pixel data, either
/// packed or run-length encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    pub width: u16,
    pub height: u16,
    pub transparency: bool,
    pub transparent_designator: Nibble,
    pub compressed: bool,
    pub pixel_data: Vec<u8>,
}

/// Sizes of both encodings of an image, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeReport {
    pub packed: usize,
    pub compressed: usize,
}

impl SizeReport {
    /// Measures both encodings without producing either of them.
    pub fn measure(
        samples: &[u8],
        width: u16,
        height: u16,
        designator: Nibble,
    ) -> Result<Self, PackError> {
        pack::check_dimensions(samples, width, height)?;

        Ok(Self {
            packed: pack::packed_len(width, height),
            compressed: encode::count_runs(pack::padded_nibbles(samples, width, designator)),
        })
    }

    /// Whether [`Compression::Auto`] would pick run-length encoding.
    #[inline]
    pub fn prefers_compression(&self) -> bool {
        self.compressed < self.packed
    }
}

impl Bitmap {
    /// Converts an 8-bit grayscale image.
    ///
    /// Odd-width rows are padded with the designator from `options` before encoding, so the
    /// stored pixel data always covers `pixel_count(width, height)` pixels.
    pub fn convert(
        samples: &[u8],
        width: u16,
        height: u16,
        options: &ConvertOptions,
    ) -> Result<Self, PackError> {
        let nibbles = pack::to_nibbles(samples, width, height, options.transparent_designator)?;
        let packed_size = nibbles.len() / PIXELS_PER_BYTE;

        let compressed = match options.compression {
            Compression::Never => false,
            Compression::Always => true,
            Compression::Auto => encode::encoded_len(&nibbles) < packed_size,
        };

        let pixel_data: Vec<u8> = if compressed {
            encode::runs(&nibbles).collect()
        } else {
            pack::join_pairs(&nibbles)
        };

        log::debug!(
            "converted {width}x{height} bitmap into {} bytes ({}, {:?})",
            pixel_data.len(),
            if compressed { "run-length encoded" } else { "packed" },
            options.compression,
        );

        Ok(Self {
            width,
            height,
            transparency: options.transparency,
            transparent_designator: options.transparent_designator,
            compressed,
            pixel_data,
        })
    }

    /// Number of bytes of pixel data.
    #[inline]
    pub fn size(&self) -> usize {
        self.pixel_data.len()
    }

    /// Number of real pixels, without padding.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    /// Whether a renderer should skip a pixel of this intensity.
    #[inline]
    pub fn is_transparent(&self, nibble: u8) -> bool {
        self.transparency && nibble == self.transparent_designator.get()
    }

    /// Decodes the pixel data into one intensity per pixel, row-major, padding removed.
    pub fn to_nibbles(&self) -> Result<Vec<u8>, BitmapError> {
        let stream = if self.compressed {
            decode::decode(&self.pixel_data).context(DecodeSnafu)?
        } else {
            pack::unpack(&self.pixel_data)
        };

        let expected = pack::pixel_count(self.width, self.height);
        ensure!(
            stream.len() == expected,
            PixelCountMismatchSnafu {
                expected,
                actual: stream.len(),
            }
        );

        pack::strip_padding(&stream, self.width).context(UnpadSnafu)
    }

    fn header(&self) -> Result<[u8; RECORD_HEADER_LEN], BitmapError> {
        let size = self.size();
        ensure!(size <= u32::MAX as usize, PayloadTooLargeSnafu { size });

        let mut header = [0u8; RECORD_HEADER_LEN];
        LittleEndian::write_u16(&mut header[0..2], self.width);
        LittleEndian::write_u16(&mut header[2..4], self.height);
        LittleEndian::write_u32(&mut header[4..8], size as u32);
        header[8] = u8::from(self.transparency);
        header[9] = self.transparent_designator.get();
        header[10] = u8::from(self.compressed);

        Ok(header)
    }

    /// Serializes the bitmap as a little-endian binary record.
    pub fn to_bytes(&self) -> Result<Vec<u8>, BitmapError> {
        let header = self.header()?;

        let mut bytes = Vec::with_capacity(RECORD_HEADER_LEN + self.size());
        bytes.extend_from_slice(&header);
        bytes.extend_from_slice(&self.pixel_data);
        Ok(bytes)
    }

    /// Parses a binary record written by [`Bitmap::to_bytes`].
    pub fn from_bytes(data: &[u8]) -> Result<Self, BitmapError> {
        ensure!(
            data.len() >= RECORD_HEADER_LEN,
            UnexpectedEofSnafu {
                expected: RECORD_HEADER_LEN,
                actual: data.len(),
            }
        );

        let (header, payload) = data.split_at(RECORD_HEADER_LEN);
        let width = LittleEndian::read_u16(&header[0..2]);
        let height = LittleEndian::read_u16(&header[2..4]);
        ensure!(width != 0 && height != 0, ZeroDimensionsSnafu { width, height });

        let size = LittleEndian::read_u32(&header[4..8]) as usize;
        let transparency = read_bool("transparency", header[8])?;
        let transparent_designator = Nibble::new(header[9]).context(DesignatorSnafu)?;
        let compressed = read_bool("compressed", header[10])?;

        ensure!(
            payload.len() >= size,
            UnexpectedEofSnafu {
                expected: RECORD_HEADER_LEN + size,
                actual: data.len(),
            }
        );
        ensure!(
            payload.len() == size,
            TrailingDataSnafu {
                extra: payload.len() - size,
            }
        );

        Ok(Self {
            width,
            height,
            transparency,
            transparent_designator,
            compressed,
            pixel_data: payload.to_vec(),
        })
    }
}

fn read_bool(field: &'static str, value: u8) -> Result<bool, BitmapError> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        _ => InvalidBoolSnafu { field, value }.fail(),
    }
}

#[cfg(feature = "std")]
mod std_api {
    use super::{Bitmap, BitmapError};
    use snafu::{ResultExt, Snafu};
    use std::io::Write;

    #[derive(Debug, Snafu)]
    pub enum WriteRecordError {
        #[snafu(context(false), display("{source}"))]
        Record { source: BitmapError },
        WriteIo { source: std::io::Error },
    }

    impl Bitmap {
        /// Writes the binary record produced by [`Bitmap::to_bytes`] to a writer.
        pub fn write_to<W: Write>(&self, mut w: W) -> Result<(), WriteRecordError> {
            let header = self.header()?;

            w.write_all(&header).context(WriteIoSnafu)?;
            w.write_all(&self.pixel_data).context(WriteIoSnafu)
        }
    }
}

#[cfg(feature = "std")]
pub use std_api::WriteRecordError;
