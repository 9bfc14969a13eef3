//! Conversion of numeric sequences into the canonical `f64` array
//! representation used throughout the crate.

use num_traits::ToPrimitive;
use thiserror::Error;

/// The error produced when a value cannot be represented as a 64-bit float.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("value at position {index} cannot be converted to a 64-bit float")]
pub struct CoercionError {
    /// Position of the offending value in the input sequence.
    pub index: usize,
}

/// Convert a sequence of numeric values into a `Vec<f64>` of the same
/// length and order.
///
/// Anything implementing [`ToPrimitive`] is accepted, so integer and float
/// sequences coerce through the same path. A value whose conversion fails
/// rejects the whole array.
pub fn as_numeric_array<T: ToPrimitive>(values: &[T]) -> Result<Vec<f64>, CoercionError> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| value.to_f64().ok_or(CoercionError { index }))
        .collect()
}
