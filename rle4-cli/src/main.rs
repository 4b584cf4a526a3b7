use argh::FromArgs;
use image::{DynamicImage, GrayImage, ImageFormat, Rgb, RgbImage};
use rle4::{utils::upscale, Bitmap, Compression, ConvertOptions, Nibble, SizeReport};
use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
    str::FromStr,
};

mod header;
mod logger;

/// RLE4 converter for 4-bit grayscale bitmaps.
#[derive(FromArgs)]
struct Cli {
    /// log conversion details to stderr
    #[argh(switch, short = 'v')]
    verbose: bool,

    #[argh(subcommand)]
    command: Command,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum Command {
    Convert(Convert),
    Info(Info),
    Preview(Preview),
}

/// Converts an image into a 4-bit bitmap.
#[derive(FromArgs)]
#[argh(subcommand, name = "convert")]
struct Convert {
    /// input format, optional (png, jpg, bmp, tiff)
    #[argh(option)]
    format: Option<Format>,

    /// mark pixels of the designator intensity as transparent
    #[argh(switch)]
    transparency: bool,

    /// transparent pixel designator, also used to pad odd-width rows (default: 0x1)
    #[argh(option)]
    designator: Option<Nibble>,

    /// auto, always or never (default: auto, which compresses only if that is smaller)
    #[argh(option)]
    compression: Option<Compression>,

    /// output kind: header or binary (default: header for .h/.hpp outputs, binary otherwise)
    #[argh(option)]
    emit: Option<Emit>,

    /// the input image
    #[argh(positional)]
    input: String,
    /// the output file
    #[argh(positional)]
    output: String,
}

/// Prints the packed and compressed sizes of an image.
#[derive(FromArgs)]
#[argh(subcommand, name = "info")]
struct Info {
    /// input format, optional (png, jpg, bmp, tiff)
    #[argh(option)]
    format: Option<Format>,

    /// transparent pixel designator used for padding (default: 0x1)
    #[argh(option)]
    designator: Option<Nibble>,

    /// the input image
    #[argh(positional)]
    input: String,
}

/// Renders a binary bitmap record back into a PNG.
#[derive(FromArgs)]
#[argh(subcommand, name = "preview")]
struct Preview {
    /// paint transparent pixels red
    #[argh(switch)]
    highlight_transparent: bool,

    /// the binary bitmap record
    #[argh(positional)]
    input: String,
    /// the output PNG
    #[argh(positional)]
    output: String,
}

#[derive(Debug, Clone, Copy)]
enum Format {
    Png,
    Jpg,
    Bmp,
    Tiff,
}

impl FromStr for Format {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        #[rustfmt::skip]
        let Some(format) = s.eq_ignore_ascii_case("png").then_some(Format::Png)
               .or_else(|| s.eq_ignore_ascii_case("jpg").then_some(Format::Jpg))
               .or_else(|| s.eq_ignore_ascii_case("bmp").then_some(Format::Bmp))
               .or_else(|| s.eq_ignore_ascii_case("tiff").then_some(Format::Tiff))
        else { return Err("invalid string"); };

        Ok(format)
    }
}

#[derive(Debug, Clone, Copy)]
enum Emit {
    Header,
    Binary,
}

impl Emit {
    fn for_path(path: &Path) -> Self {
        let is_header = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                ext.eq_ignore_ascii_case("h") || ext.eq_ignore_ascii_case("hpp")
            });

        if is_header {
            Emit::Header
        } else {
            Emit::Binary
        }
    }
}

impl FromStr for Emit {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        #[rustfmt::skip]
        let Some(emit) = s.eq_ignore_ascii_case("header").then_some(Emit::Header)
               .or_else(|| s.eq_ignore_ascii_case("binary").then_some(Emit::Binary))
        else { return Err("expected `header` or `binary`"); };

        Ok(emit)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let Cli { verbose, command } = argh::from_env();
    logger::init(verbose);

    match command {
        Command::Convert(options) => convert(options),
        Command::Info(options) => info(options),
        Command::Preview(options) => preview(options),
    }
}

fn load_image(
    input: &str,
    format: Option<Format>,
) -> Result<DynamicImage, Box<dyn std::error::Error>> {
    let format = match format {
        Some(Format::Png) => ImageFormat::Png,
        Some(Format::Jpg) => ImageFormat::Jpeg,
        Some(Format::Bmp) => ImageFormat::Bmp,
        Some(Format::Tiff) => ImageFormat::Tiff,
        None => {
            return Ok(image::io::Reader::open(input)?
                .with_guessed_format()?
                .decode()?)
        }
    };

    Ok(image::io::Reader::with_format(BufReader::new(File::open(input)?), format).decode()?)
}

/// Decodes an image into 8-bit grayscale samples.
fn load_samples(
    input: &str,
    format: Option<Format>,
) -> Result<(u16, u16, Vec<u8>), Box<dyn std::error::Error>> {
    let image = load_image(input, format)?;

    let width = image.width();
    let height = image.height();

    if width > u16::MAX as u32 || height > u16::MAX as u32 {
        return Err("image dimensions are too large".into());
    }
    if !matches!(image, DynamicImage::ImageLuma8(_) | DynamicImage::ImageLuma16(_)) {
        log::warn!("`{input}` is not a grayscale image, converting it to luma");
    }

    Ok((width as u16, height as u16, image.into_luma8().into_raw()))
}

fn convert(options: Convert) -> Result<(), Box<dyn std::error::Error>> {
    let Convert {
        format,
        transparency,
        designator,
        compression,
        emit,
        input,
        output,
    } = options;

    let (width, height, samples) = load_samples(&input, format)?;

    println!("Converting {width}x{height} image");

    let options = ConvertOptions {
        transparency,
        transparent_designator: designator.unwrap_or_default(),
        compression: compression.unwrap_or_default(),
    };
    let bitmap = Bitmap::convert(&samples, width, height, &options)?;

    let output_path = Path::new(&output);
    let header_name = match emit.unwrap_or_else(|| Emit::for_path(output_path)) {
        Emit::Header => Some(
            header::bitmap_name(output_path)
                .ok_or("cannot derive a bitmap name from the output file name")?,
        ),
        Emit::Binary => None,
    };

    let mut w = BufWriter::new(File::create(output_path)?);
    match header_name {
        Some(name) => header::write_header(&mut w, name, &bitmap)?,
        None => bitmap.write_to(&mut w)?,
    }
    w.flush()?;

    println!(
        "Written {} bytes of {} pixel data to `{output}`",
        bitmap.size(),
        if bitmap.compressed { "compressed" } else { "packed" }
    );

    Ok(())
}

fn info(options: Info) -> Result<(), Box<dyn std::error::Error>> {
    let Info {
        format,
        designator,
        input,
    } = options;

    let (width, height, samples) = load_samples(&input, format)?;
    let report = SizeReport::measure(&samples, width, height, designator.unwrap_or_default())?;

    println!("{width}x{height} image");
    println!("Uncompressed size: {} bytes", report.packed);
    println!("Compressed size: {} bytes", report.compressed);
    println!(
        "`--compression auto` stores it {}",
        if report.prefers_compression() {
            "compressed"
        } else {
            "uncompressed"
        }
    );

    Ok(())
}

fn preview(options: Preview) -> Result<(), Box<dyn std::error::Error>> {
    let Preview {
        highlight_transparent,
        input,
        output,
    } = options;

    let record = std::fs::read(&input)?;

    println!("Decoding `{input}`");

    let bitmap = Bitmap::from_bytes(&record)?;
    let nibbles = bitmap.to_nibbles()?;
    let (width, height) = (u32::from(bitmap.width), u32::from(bitmap.height));

    if highlight_transparent && bitmap.transparency {
        RgbImage::from_fn(width, height, |x, y| {
            let nibble = nibbles[(y * width + x) as usize];
            if bitmap.is_transparent(nibble) {
                Rgb([0xFF, 0x00, 0x00])
            } else {
                let level = upscale(nibble);
                Rgb([level, level, level])
            }
        })
        .save_with_format(&output, ImageFormat::Png)?;
    } else {
        let levels = nibbles.into_iter().map(upscale).collect();
        GrayImage::from_vec(width, height, levels)
            .ok_or("failed to create image")?
            .save_with_format(&output, ImageFormat::Png)?;
    }

    println!("Written {width}x{height} image to `{output}`");

    Ok(())
}
