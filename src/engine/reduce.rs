//! Reduces one group's values down to its single terminal value.

use bytes::Bytes;

use crate::error::Stage;
use crate::{CalculateError, Pipeline};

/// Runs `values` through every reduce stage in chain order, then applies the
/// final reduce function to its own output until exactly one value is left.
///
/// The final reduce function always runs at least once, even for a group
/// that starts with a single value. There is no iteration cap: a final
/// reduce function that never shrinks its input to one value never returns.
/// Any stage returning an empty list fails the group.
pub fn reduce_group(
    pipeline: &Pipeline,
    key: &Bytes,
    values: Vec<Bytes>,
) -> Result<Bytes, CalculateError> {
    let degenerate = |stage: Stage| CalculateError::Degenerate {
        key: key.clone(),
        stage,
    };

    let mut values = values;
    for (index, reduce) in pipeline.reducers().iter().enumerate() {
        values = reduce(values);
        if values.is_empty() {
            return Err(degenerate(Stage::Reduce(index)));
        }
    }

    let final_reduce = pipeline.final_reduce();
    loop {
        values = final_reduce(values);
        match values.len() {
            0 => return Err(degenerate(Stage::FinalReduce)),
            1 => return values.pop().ok_or_else(|| degenerate(Stage::FinalReduce)),
            _ => {}
        }
    }
}
