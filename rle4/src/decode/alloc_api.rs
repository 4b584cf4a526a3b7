use crate::decode::{decode_with, decoded_len, DecodeError, DecodeOutput};
use alloc::vec::Vec;

/// Appends one intensity per element to a vector.
pub struct VecDecodeOutput<'a> {
    output: &'a mut Vec<u8>,
    start: usize,
}

impl<'a> VecDecodeOutput<'a> {
    #[inline]
    pub fn new(vec: &'a mut Vec<u8>) -> Self {
        let start = vec.len();
        Self { output: vec, start }
    }
}

impl DecodeOutput for VecDecodeOutput<'_> {
    #[inline]
    fn write_run(&mut self, value: u8, count: usize) {
        self.output.resize(self.output.len() + count, value);
    }

    #[inline]
    fn max_len(&self) -> Option<usize> {
        None
    }

    #[inline]
    fn current_output_position(&self) -> usize {
        self.output.len() - self.start
    }
}

/// Expands run records into the intensity stream they encode.
pub fn decode(runs: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let mut values = Vec::with_capacity(decoded_len(runs)?);
    decode_with(runs, VecDecodeOutput::new(&mut values))?;
    Ok(values)
}
