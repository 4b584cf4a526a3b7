//! C++ header output, compatible with the `Bitmap<N>` struct template used by the firmware:
//!
//! ```c++
//! template <uint16_t pixel_data_size>
//! struct Bitmap {
//!   uint8_t width;
//!   uint8_t height;
//!   uint16_t size;
//!   bool transparency;
//!   uint8_t transparent_pixel_designator;
//!   bool compressed;
//!   std::array<uint8_t, pixel_data_size> pixel_data;
//! };
//! ```

use rle4::Bitmap;
use std::{io::Write, path::Path};

const BYTES_PER_LINE: usize = 10;

/// Whether the fields fit the `uint8_t` dimensions and `uint16_t` size of the C++ struct.
fn fits_struct(bitmap: &Bitmap) -> bool {
    bitmap.width <= u16::from(u8::MAX)
        && bitmap.height <= u16::from(u8::MAX)
        && bitmap.size() <= usize::from(u16::MAX)
}

/// Name of the generated bitmap: the file name of `path` up to its first `.`.
pub fn bitmap_name(path: &Path) -> Option<&str> {
    let file_name = path.file_name()?.to_str()?;
    let name = file_name.split('.').next().unwrap_or(file_name);

    (!name.is_empty()).then_some(name)
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Writes `bitmap` as a static `Bitmap<N>` declaration named `name`, wrapped in an include
/// guard derived from the upper-cased name.
pub fn write_header<W: Write>(mut w: W, name: &str, bitmap: &Bitmap) -> std::io::Result<()> {
    if !is_identifier(name) {
        log::warn!("`{name}` is not a valid C++ identifier, the header will not compile as is");
    }
    if !fits_struct(bitmap) {
        log::warn!(
            "{}x{} bitmap with {} bytes of pixel data overflows the `Bitmap` struct fields",
            bitmap.width,
            bitmap.height,
            bitmap.size()
        );
    }

    let guard = format!("{}_HPP", name.to_uppercase());
    let size = bitmap.size();

    write!(w, "#ifndef {guard}\n#define {guard}\n")?;
    write!(w, "#include \"Bitmap/Bitmap.hpp\"\n\n")?;
    writeln!(w, "static const Bitmap<{size}> {name}{{")?;
    writeln!(w, ".width = {},", bitmap.width)?;
    writeln!(w, ".height = {},", bitmap.height)?;
    writeln!(w, ".size = {size},")?;
    writeln!(w, ".transparency = {},", bitmap.transparency)?;
    writeln!(
        w,
        ".transparent_pixel_designator = {},",
        bitmap.transparent_designator
    )?;
    writeln!(w, ".compressed = {},", bitmap.compressed)?;
    writeln!(w, ".pixel_data = {{")?;

    for (i, byte) in bitmap.pixel_data.iter().enumerate() {
        write!(w, "0x{byte:02X}")?;

        if i + 1 != size {
            write!(w, ", ")?;

            if (i + 1) % BYTES_PER_LINE == 0 {
                writeln!(w)?;
            }
        }
    }

    write!(w, "}},\n}};\n#endif // {guard}")?;

    // the last line break lands after the guard when the data fills its final line
    if size != 0 && size % BYTES_PER_LINE == 0 {
        writeln!(w)?;
    }

    Ok(())
}
