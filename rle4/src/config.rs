//! Per-conversion settings.

use crate::consts::{DEFAULT_TRANSPARENT_DESIGNATOR, MAX_NIBBLE};
use core::{fmt, str::FromStr};
use snafu::{ensure, Snafu};

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum NibbleError {
    #[snafu(display("{value:#X} is outside the 4-bit range 0x0..=0xF"))]
    ConfigurationOutOfRange { value: u32 },
    #[snafu(display("expected a hexadecimal (`0xA`) or decimal intensity"))]
    InvalidSyntax,
}

/// A 4-bit intensity, 0..=15.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Nibble(u8);

impl Nibble {
    pub const MIN: Nibble = Nibble(0);
    pub const MAX: Nibble = Nibble(MAX_NIBBLE);

    pub const fn new(value: u8) -> Result<Self, NibbleError> {
        if value > MAX_NIBBLE {
            return Err(NibbleError::ConfigurationOutOfRange {
                value: value as u32,
            });
        }
        Ok(Self(value))
    }

    #[inline]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl Default for Nibble {
    fn default() -> Self {
        Self(DEFAULT_TRANSPARENT_DESIGNATOR)
    }
}

impl TryFrom<u8> for Nibble {
    type Error = NibbleError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Nibble> for u8 {
    fn from(nibble: Nibble) -> Self {
        nibble.0
    }
}

impl fmt::Display for Nibble {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:X}", self.0)
    }
}

/// Accepts `0xA`/`0XA` style hex as well as plain decimal.
impl FromStr for Nibble {
    type Err = NibbleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let parsed = match trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
        {
            Some(hex) => u32::from_str_radix(hex, 16),
            None => trimmed.parse::<u32>(),
        };
        let Ok(value) = parsed else {
            return InvalidSyntaxSnafu.fail();
        };

        ensure!(
            value <= u32::from(MAX_NIBBLE),
            ConfigurationOutOfRangeSnafu { value }
        );

        Ok(Self(value as u8))
    }
}

/// Which form the pixel data of a converted bitmap takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    /// Always store packed pixel pairs.
    Never,
    /// Always store run records.
    Always,
    /// Store run records only if they are strictly smaller than the packed pixels.
    #[default]
    Auto,
}

impl FromStr for Compression {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        #[rustfmt::skip]
        let Some(compression) = s.eq_ignore_ascii_case("auto").then_some(Compression::Auto)
               .or_else(|| s.eq_ignore_ascii_case("always").then_some(Compression::Always))
               .or_else(|| s.eq_ignore_ascii_case("never").then_some(Compression::Never))
        else { return Err("expected one of `auto`, `always`, `never`"); };

        Ok(compression)
    }
}

/// Settings threaded through a single conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConvertOptions {
    /// Whether the consumer should skip pixels equal to `transparent_designator`.
    pub transparency: bool,
    /// Intensity that marks a pixel as transparent. Also used for row padding.
    pub transparent_designator: Nibble,
    pub compression: Compression,
}
