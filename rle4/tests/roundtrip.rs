use image::{GrayImage, Luma};
use rle4::{
    bitmap::{Bitmap, BitmapError, SizeReport},
    decode::{decode, decode_with, DecodeError, NibbleSliceOutput, PackedSliceOutput},
    encode::{encode, encode_to_vec, encoded_len, EncodeError, WriteError},
    pack::{pack, pack_nibbles, pixel_count, strip_padding, to_nibbles, unpack, PackError},
    utils::downscale,
    Compression, ConvertOptions, Nibble,
};

fn test_images() -> Vec<GrayImage> {
    vec![
        // horizontal gradient, long runs along columns
        GrayImage::from_fn(64, 48, |x, _| Luma([(x * 4) as u8])),
        // odd width with a diagonal pattern
        GrayImage::from_fn(37, 21, |x, y| Luma([((x + y) * 7 % 256) as u8])),
        // flat background with a filled rectangle, typical UI icon
        GrayImage::from_fn(33, 33, |x, y| {
            if (8..24).contains(&x) && (8..24).contains(&y) {
                Luma([255])
            } else {
                Luma([0])
            }
        }),
        // checkerboard, worst case for run-length encoding
        GrayImage::from_fn(16, 9, |x, y| Luma([if (x + y) % 2 == 0 { 0 } else { 255 }])),
        GrayImage::from_fn(1, 1, |_, _| Luma([128])),
    ]
}

#[test]
fn roundtrip() {
    for image in test_images() {
        let width = image.width() as u16;
        let height = image.height() as u16;
        let samples = image.as_raw();
        let designator = Nibble::new(0xE).unwrap();

        let nibbles = to_nibbles(samples, width, height, designator).unwrap();
        assert_eq!(nibbles.len(), pixel_count(width, height));

        let packed = pack(samples, width, height, designator).unwrap();
        assert_eq!(packed, pack_nibbles(&nibbles).unwrap(), "packing mismatch");
        assert_eq!(unpack(&packed), nibbles, "unpacking failed");

        let mut compressed = Vec::new();
        encode_to_vec(&nibbles, &mut compressed).unwrap();
        assert_eq!(compressed.len(), encoded_len(&nibbles));

        let mut compressed2 = Vec::new();
        encode(&nibbles, &mut compressed2).unwrap();
        assert_eq!(compressed, compressed2, "encoding mismatch");

        assert_eq!(decode(&compressed).unwrap(), nibbles, "decoding failed");

        let mut slice_decoded = vec![0; nibbles.len()];
        decode_with(&compressed, NibbleSliceOutput::new(&mut slice_decoded)).unwrap();
        assert_eq!(slice_decoded, nibbles, "slice decoding failed");

        let mut framebuffer = vec![0; packed.len()];
        let written =
            decode_with(&compressed, PackedSliceOutput::new(&mut framebuffer)).unwrap();
        assert_eq!(written, nibbles.len());
        assert_eq!(framebuffer, packed, "framebuffer decoding failed");

        let expected: Vec<u8> = samples.iter().map(|&s| downscale(s)).collect();
        assert_eq!(
            strip_padding(&nibbles, width).unwrap(),
            expected,
            "padding removal failed"
        );
    }
}

#[test]
fn odd_width_pads_each_row_with_designator() {
    let (a, b, c, d) = (0x3, 0x9, 0xC, 0x7);
    // samples already on the 4-bit levels
    let samples = [a * 17, b * 17, c * 17];
    let designator = Nibble::new(d).unwrap();

    assert_eq!(
        to_nibbles(&samples, 3, 1, designator).unwrap(),
        [a, b, c, d]
    );
    assert_eq!(
        pack(&samples, 3, 1, designator).unwrap(),
        [(a << 4) | b, (c << 4) | d]
    );

    let two_rows = [0, 0, 0, 255, 255, 255];
    assert_eq!(
        pack(&two_rows, 3, 2, designator).unwrap(),
        [0x00, 0x07, 0xFF, 0xF7]
    );
}

#[test]
fn run_cap_splits_long_runs() {
    let values = [0x9; 17];
    let mut compressed = Vec::new();
    encode_to_vec(&values, &mut compressed).unwrap();
    assert_eq!(compressed, [0x9F, 0x92]);
    assert_eq!(encoded_len(&values), 2);
}

#[test]
fn trivial_inputs() {
    let mut compressed = Vec::new();
    encode_to_vec(&[], &mut compressed).unwrap();
    assert!(compressed.is_empty());
    assert_eq!(encoded_len(&[]), 0);
    assert_eq!(decode(&[]).unwrap(), Vec::<u8>::new());

    encode_to_vec(&[0xB], &mut compressed).unwrap();
    assert_eq!(compressed, [0xB1]);
}

#[test]
fn compression_only_pays_off_for_runs() {
    let uniform = [0x5; 100];
    assert!(encoded_len(&uniform) < uniform.len().div_ceil(2));

    let alternating: Vec<u8> = [0x1, 0x2].repeat(50);
    assert!(encoded_len(&alternating) > alternating.len().div_ceil(2));
}

#[test]
fn malformed_stream_is_rejected() {
    assert_eq!(
        decode(&[0x12, 0x40]),
        Err(DecodeError::MalformedStream {
            offset: 1,
            record: 0x40
        })
    );
    assert!(matches!(
        decode(&[0x00]),
        Err(DecodeError::MalformedStream { offset: 0, .. })
    ));
}

#[test]
fn invalid_input_is_rejected() {
    let designator = Nibble::default();

    assert_eq!(pixel_count(0, 10), 0);
    assert_eq!(pixel_count(10, 0), 0);
    assert!(matches!(
        pack(&[], 0, 1, designator),
        Err(PackError::InvalidDimensions { .. })
    ));
    assert!(matches!(
        pack(&[0; 5], 2, 2, designator),
        Err(PackError::InvalidDimensions {
            width: 2,
            height: 2,
            sample_count: 5
        })
    ));

    assert_eq!(
        pack_nibbles(&[1, 2, 3]),
        Err(PackError::InvalidLength { len: 3 })
    );
    assert_eq!(
        pack_nibbles(&[1, 0x10]),
        Err(PackError::ValueOutOfRange {
            index: 1,
            value: 0x10
        })
    );

    let mut compressed = Vec::new();
    assert_eq!(
        encode_to_vec(&[1, 1, 0xFF], &mut compressed),
        Err(EncodeError::ValueOutOfRange {
            index: 2,
            value: 0xFF
        })
    );
    assert!(compressed.is_empty(), "partial output on failure");

    let mut written = Vec::new();
    assert!(matches!(
        encode(&[0x20], &mut written),
        Err(WriteError::Encode { .. })
    ));
    assert!(written.is_empty());

    assert_eq!(
        strip_padding(&[1, 2, 3, 4, 5], 3),
        Err(PackError::InvalidLength { len: 5 })
    );
}

#[test]
fn auto_compression_picks_the_smaller_encoding() {
    for image in test_images() {
        let width = image.width() as u16;
        let height = image.height() as u16;
        let samples = image.as_raw();
        let options = ConvertOptions::default();

        let report = SizeReport::measure(samples, width, height, options.transparent_designator)
            .unwrap();
        let auto = Bitmap::convert(samples, width, height, &options).unwrap();

        assert_eq!(auto.compressed, report.compressed < report.packed);
        assert_eq!(auto.compressed, report.prefers_compression());
        assert_eq!(
            auto.size(),
            report.packed.min(report.compressed),
            "auto did not pick the smaller encoding"
        );

        for compression in [Compression::Never, Compression::Always] {
            let forced = Bitmap::convert(
                samples,
                width,
                height,
                &ConvertOptions {
                    compression,
                    ..options
                },
            )
            .unwrap();
            assert_eq!(forced.compressed, compression == Compression::Always);
            let expected_size = if forced.compressed {
                report.compressed
            } else {
                report.packed
            };
            assert_eq!(forced.size(), expected_size);
        }
    }
}

#[test]
fn converted_bitmaps_survive_serialization() {
    for image in test_images() {
        let width = image.width() as u16;
        let height = image.height() as u16;
        let samples = image.as_raw();

        for compression in [Compression::Never, Compression::Always] {
            let options = ConvertOptions {
                transparency: true,
                transparent_designator: Nibble::new(0x0).unwrap(),
                compression,
            };
            let bitmap = Bitmap::convert(samples, width, height, &options).unwrap();

            let bytes = bitmap.to_bytes().unwrap();
            let parsed = Bitmap::from_bytes(&bytes).unwrap();
            assert_eq!(parsed, bitmap);

            let expected: Vec<u8> = samples.iter().map(|&s| downscale(s)).collect();
            assert_eq!(parsed.to_nibbles().unwrap(), expected);
        }
    }
}

#[test]
fn truncated_and_padded_records_are_rejected() {
    let bitmap = Bitmap::convert(&[0, 255, 0], 3, 1, &ConvertOptions::default()).unwrap();
    let bytes = bitmap.to_bytes().unwrap();

    assert!(matches!(
        Bitmap::from_bytes(&bytes[..5]),
        Err(BitmapError::UnexpectedEof { .. })
    ));
    assert!(matches!(
        Bitmap::from_bytes(&bytes[..bytes.len() - 1]),
        Err(BitmapError::UnexpectedEof { .. })
    ));

    let mut padded = bytes.clone();
    padded.push(0);
    assert_eq!(
        Bitmap::from_bytes(&padded),
        Err(BitmapError::TrailingData { extra: 1 })
    );

    let mut zero_width = bytes;
    zero_width[0] = 0;
    assert_eq!(
        Bitmap::from_bytes(&zero_width),
        Err(BitmapError::ZeroDimensions {
            width: 0,
            height: 1
        })
    );
}

#[test]
fn auto_compression_keeps_packed_on_a_tie() {
    let samples = [0, 0, 255, 255];
    let report = SizeReport::measure(&samples, 4, 1, Nibble::default()).unwrap();
    assert_eq!(report, SizeReport { packed: 2, compressed: 2 });
    assert!(!report.prefers_compression());

    let bitmap = Bitmap::convert(&samples, 4, 1, &ConvertOptions::default()).unwrap();
    assert!(!bitmap.compressed, "auto compressed an equally sized stream");
    assert_eq!(bitmap.pixel_data, [0x00, 0xFF]);
}

#[test]
fn encode_reports_writer_failures() {
    let mut sink = [0u8; 0];
    assert!(matches!(
        encode(&[0x3; 40], &mut sink[..]),
        Err(WriteError::WriteIo { .. })
    ));
}
