//! Packer and run-length codec for 4-bit grayscale bitmaps.
//!
//! RLE4 turns an 8-bit grayscale image into a stream of 4-bit intensities ("nibbles") that a
//! microcontroller can blit straight into a 4bpp display framebuffer. The stream is stored in
//! one of two forms:
//!
//! - **packed**: two pixels per byte, the first pixel in the high nibble.
//! - **compressed**: a sequence of run records, one byte per run.
//!
//! # Padding
//!
//! Packed pixels have to come in pairs, so rows of odd width get one synthetic pixel appended
//! at their end. The padding pixel carries the *transparent-pixel designator*, the intensity
//! that a renderer treats as "do not draw". Padding is applied before either encoding, so both
//! forms describe the same `height * (width + width % 2)` pixels.
//!
//! # Stream format
//!
//! See [consts] for the layout of packed bytes and run records.
//!
//! # Features
//!
//! - `alloc`: vector-returning encoders and decoders, [`bitmap::Bitmap`].
//! - `std` (default): `std::io::Write` encoders and `std::error::Error` impls.
//!
//! Without either, the crate is `no_std` and only decodes into caller-provided slices.
#![cfg_attr(not(any(test, feature = "std")), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(feature = "alloc")]
pub mod bitmap;
pub mod config;
pub mod decode;
pub mod encode;
pub mod pack;
pub mod utils;

#[cfg(feature = "alloc")]
pub use bitmap::{Bitmap, SizeReport};
pub use config::{Compression, ConvertOptions, Nibble};
#[cfg(feature = "alloc")]
pub use decode::decode;
pub use decode::{decode_with, DecodeOutput};
#[cfg(feature = "alloc")]
pub use encode::encode_to_vec;
pub use encode::encoded_len;
pub use pack::{pixel_count, packed_len};

pub mod consts {
    /// A pair of pixels in the packed form.
    ///
    /// ```plain
    /// .- packed byte -----------.
    /// |         Byte[0]         |
    /// |  7  6  5  4  3  2  1  0 |
    /// |-----------+-------------|
    /// |  pixel 2i | pixel 2i+1  |
    /// `-------------------------`
    /// ```
    ///
    /// - 4-bit intensity of the even pixel in the high nibble
    /// - 4-bit intensity of the odd pixel in the low nibble
    pub const PIXELS_PER_BYTE: usize = 2;

    /// A run of identical pixels in the compressed form.
    ///
    /// ```plain
    /// .- run record ------------.
    /// |         Byte[0]         |
    /// |  7  6  5  4  3  2  1  0 |
    /// |-----------+-------------|
    /// |   value   |   length    |
    /// `-------------------------`
    /// ```
    ///
    /// - 4-bit intensity repeated by the run
    /// - 4-bit run-length: 1..15. A length of 0 is illegal. Longer runs are split into
    ///   consecutive records with the same value.
    pub const MAX_RUN: u8 = 15;

    /// Largest intensity a pixel can have.
    pub const MAX_NIBBLE: u8 = 0xF;

    /// Designator used when none is configured.
    pub const DEFAULT_TRANSPARENT_DESIGNATOR: u8 = 0x1;

    /// Size of the fixed part of a serialized [`Bitmap`](crate::bitmap::Bitmap) record.
    ///
    /// ```plain
    /// | width u16le | height u16le | size u32le | transparency u8 | designator u8 | compressed u8 |
    /// ```
    pub const RECORD_HEADER_LEN: usize = 11;
}
