use crate::{
    consts::{MAX_NIBBLE, MAX_RUN},
    utils::run_record,
};
use itertools::Itertools;
use snafu::{ensure, Snafu};

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

#[cfg(feature = "std")]
mod std_api;
#[cfg(feature = "std")]
pub use std_api::*;

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum EncodeError {
    #[snafu(display("value {value:#04X} at index {index} does not fit in 4 bits"))]
    ValueOutOfRange { index: usize, value: u8 },
    #[snafu(display("output holds {available} run records, but {needed} are needed"))]
    OutputTooSmall { needed: usize, available: usize },
}

/// Greedy run scanner over an intensity stream, yielding one run record per item.
///
/// Values are assumed to be in range. Use [`encode_to_vec`] or [`encode_to_slice`] for
/// checked input.
#[derive(Debug, Clone)]
pub(crate) struct Runs<'a> {
    values: &'a [u8],
}

pub(crate) fn runs(values: &[u8]) -> Runs<'_> {
    Runs { values }
}

impl Iterator for Runs<'_> {
    type Item = u8;

    #[inline]
    fn next(&mut self) -> Option<u8> {
        let (&value, rest) = self.values.split_first()?;
        debug_assert!(value <= MAX_NIBBLE, "unchecked value {value:#04X}");

        let repeats = rest
            .iter()
            .take(usize::from(MAX_RUN) - 1)
            .take_while(|&&v| v == value)
            .count();
        self.values = &rest[repeats..];

        // account for `value` itself
        Some(run_record(value, repeats as u8 + 1))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.values.len();
        (len.div_ceil(usize::from(MAX_RUN)), Some(len))
    }
}

/// Number of run records needed for `values`, without producing them.
pub fn encoded_len(values: &[u8]) -> usize {
    count_runs(values.iter().copied())
}

/// Like [`encoded_len`], but over any intensity stream.
pub fn count_runs(values: impl IntoIterator<Item = u8>) -> usize {
    values
        .into_iter()
        .dedup_with_count()
        .map(|(count, _)| count.div_ceil(usize::from(MAX_RUN)))
        .sum()
}

fn check_values(values: &[u8]) -> Result<(), EncodeError> {
    match values.iter().find_position(|&&v| v > MAX_NIBBLE) {
        Some((index, &value)) => ValueOutOfRangeSnafu { index, value }.fail(),
        None => Ok(()),
    }
}

/// Run-length encodes `values` into `output`.
///
/// Returns the number of run records written. Nothing is written on failure.
pub fn encode_to_slice(values: &[u8], output: &mut [u8]) -> Result<usize, EncodeError> {
    check_values(values)?;

    let needed = encoded_len(values);
    ensure!(
        output.len() >= needed,
        OutputTooSmallSnafu {
            needed,
            available: output.len(),
        }
    );

    for (slot, record) in output.iter_mut().zip(runs(values)) {
        *slot = record;
    }

    Ok(needed)
}

/// Run-length encodes `values`, appending the run records to `w`.
#[cfg(feature = "alloc")]
pub fn encode_to_vec(values: &[u8], w: &mut Vec<u8>) -> Result<(), EncodeError> {
    check_values(values)?;

    w.reserve(encoded_len(values));
    w.extend(runs(values));

    Ok(())
}
