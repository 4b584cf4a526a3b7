#![cfg_attr(not(test), no_std)]

use rle4::decode::{decode_with, NibbleSliceOutput, PackedSliceOutput};

#[cfg(not(test))]
#[panic_handler]
fn panic_handler(_info: &core::panic::PanicInfo) -> ! {
    loop {}
}

/// Expands an RLE4 run stream into one intensity (0-15) per output byte.
///
/// - `input`: Pointer to the run records
/// - `input_len`: Length of the input buffer, in bytes
/// - `output`: Pointer to the output buffer
/// - `output_len`: Length of the output buffer, in pixels
///
/// Returns the number of pixels written to the output buffer, if successful, or -1 otherwise.
/// Nothing is written if the stream contains a zero-length run or does not fit the output.
///
/// # Safety
///
/// `input` must be valid for reads of `input_len` bytes and `output` for writes of `output_len`
/// bytes.
#[no_mangle]
pub unsafe extern "C" fn rle4_decode(
    input: *const u8,
    input_len: usize,
    output: *mut u8,
    output_len: usize,
) -> isize {
    let input = unsafe { core::slice::from_raw_parts(input, input_len) };
    let output = unsafe { core::slice::from_raw_parts_mut(output, output_len) };

    match decode_with(input, NibbleSliceOutput::new(output)) {
        Ok(len) => len as isize,
        Err(_) => -1,
    }
}

/// Expands an RLE4 run stream straight into a packed 4bpp framebuffer, high nibble first.
///
/// - `input`: Pointer to the run records
/// - `input_len`: Length of the input buffer, in bytes
/// - `output`: Pointer to the framebuffer
/// - `output_len`: Length of the framebuffer, in bytes
///
/// Returns the number of *pixels* written to the framebuffer, if successful, or -1 otherwise.
///
/// # Safety
///
/// `input` must be valid for reads of `input_len` bytes and `output` for writes of `output_len`
/// bytes.
#[no_mangle]
pub unsafe extern "C" fn rle4_decode_packed(
    input: *const u8,
    input_len: usize,
    output: *mut u8,
    output_len: usize,
) -> isize {
    let input = unsafe { core::slice::from_raw_parts(input, input_len) };
    let output = unsafe { core::slice::from_raw_parts_mut(output, output_len) };

    match decode_with(input, PackedSliceOutput::new(output)) {
        Ok(len) => len as isize,
        Err(_) => -1,
    }
}

/// Splits uncompressed (packed) pixel data into one intensity per output byte.
///
/// - `input`: Pointer to the packed pixel data
/// - `input_len`: Length of the input buffer, in bytes
/// - `output`: Pointer to the output buffer
/// - `output_len`: Length of the output buffer, in pixels
///
/// Returns the number of pixels written, `input_len * 2`, or -1 if the output is too small.
///
/// # Safety
///
/// `input` must be valid for reads of `input_len` bytes and `output` for writes of `output_len`
/// bytes.
#[no_mangle]
pub unsafe extern "C" fn rle4_unpack(
    input: *const u8,
    input_len: usize,
    output: *mut u8,
    output_len: usize,
) -> isize {
    let input = unsafe { core::slice::from_raw_parts(input, input_len) };
    let output = unsafe { core::slice::from_raw_parts_mut(output, output_len) };

    match rle4::pack::unpack_into(input, output) {
        Ok(len) => len as isize,
        Err(_) => -1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_into_caller_buffers() {
        let runs = [0xA3, 0x51];
        let mut nibbles = [0u8; 4];
        let mut framebuffer = [0u8; 2];

        unsafe {
            assert_eq!(rle4_decode(runs.as_ptr(), runs.len(), nibbles.as_mut_ptr(), 4), 4);
            assert_eq!(
                rle4_decode_packed(runs.as_ptr(), runs.len(), framebuffer.as_mut_ptr(), 2),
                4
            );
        }
        assert_eq!(nibbles, [0xA, 0xA, 0xA, 0x5]);
        assert_eq!(framebuffer, [0xAA, 0xA5]);
    }

    #[test]
    fn reports_failure_as_minus_one() {
        let mut output = [0u8; 2];
        unsafe {
            assert_eq!(rle4_decode([0x30].as_ptr(), 1, output.as_mut_ptr(), 2), -1);
            assert_eq!(rle4_decode([0x33].as_ptr(), 1, output.as_mut_ptr(), 2), -1);
            assert_eq!(rle4_unpack([0xA3, 0x01].as_ptr(), 2, output.as_mut_ptr(), 2), -1);
            assert_eq!(rle4_unpack([0xA3].as_ptr(), 1, output.as_mut_ptr(), 2), 2);
        }
        assert_eq!(output, [0xA, 0x3]);
    }
}
