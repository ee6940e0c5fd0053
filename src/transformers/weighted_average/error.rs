//! Failures raised by the weighted average transformer itself.
//!
//! These end up as the `source` of a [`StreamError`](crate::error::StreamError)
//! so downstream code can tell them apart from upstream errors with
//! `error.downcast_source::<AverageError>()`.

use thiserror::Error;

/// Boxed error returned by projection functions.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Error raised while folding an item into the running average.
#[derive(Debug, Error)]
pub enum AverageError {
  /// The value projection failed.
  #[error("value projection failed for item {index}: {source}")]
  ValueProjection {
    /// 0-based index of the failing item.
    index: usize,
    /// The projection's error.
    source: BoxError,
  },
  /// The weight projection failed.
  #[error("weight projection failed for item {index}: {source}")]
  WeightProjection {
    /// 0-based index of the failing item.
    index: usize,
    /// The projection's error.
    source: BoxError,
  },
  /// The weight was negative or not finite and the policy rejects it.
  #[error("invalid weight {weight} for item {index}: weights must be finite and non-negative")]
  InvalidWeight {
    /// 0-based index of the failing item.
    index: usize,
    /// The rejected weight.
    weight: f64,
  },
  /// The value was `NaN` or infinite and the policy rejects it.
  #[error("invalid value {value} for item {index}: values must be finite")]
  InvalidValue {
    /// 0-based index of the failing item.
    index: usize,
    /// The rejected value.
    value: f64,
  },
  /// Adding the weight would overflow the total weight.
  #[error("weight {weight} for item {index} overflows the total weight {sum_of_weights}")]
  WeightOverflow {
    /// 0-based index of the failing item.
    index: usize,
    /// The rejected weight.
    weight: f64,
    /// Total weight before the item.
    sum_of_weights: f64,
  },
}

impl AverageError {
  /// Index of the item that caused the error.
  pub fn index(&self) -> usize {
    match self {
      AverageError::ValueProjection { index, .. }
      | AverageError::WeightProjection { index, .. }
      | AverageError::InvalidWeight { index, .. }
      | AverageError::InvalidValue { index, .. }
      | AverageError::WeightOverflow { index, .. } => *index,
    }
  }
}
