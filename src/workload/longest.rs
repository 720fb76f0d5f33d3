//! Finds the longest record for every leading character.
//!
//! The final reduce runs a knockout round per call: values are paired off
//! and the longer of each pair advances, so a group of `n` values converges
//! after about `log2(n)` calls.

use bytes::Bytes;
use itertools::Itertools;

use crate::Pipeline;

pub fn pipeline() -> Pipeline {
    crate::build(|record: &[u8]| {
        let first = *record.first()?;
        Some(Bytes::copy_from_slice(&[first.to_ascii_lowercase()]))
    })
    .final_reduce(knockout)
}

/// Ties go to the earlier value.
fn knockout(values: Vec<Bytes>) -> Vec<Bytes> {
    values
        .into_iter()
        .chunks(2)
        .into_iter()
        .filter_map(|pair| pair.reduce(|a, b| if b.len() > a.len() { b } else { a }))
        .collect()
}
