//! Incremental weighted mean.

use super::error::AverageError;
use super::options::WeightPolicy;

/// State for the weighted average calculation.
///
/// The mean is folded in one pair at a time with
/// `avg += (w / Σw) * (v - avg)`, so memory stays constant no matter how long
/// the stream runs and every intermediate value is reproducible item by item.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WeightedAverageState {
  count: usize,
  running_average: f64,
  sum_of_weights: f64,
}

impl WeightedAverageState {
  /// Creates an empty state.
  pub fn new() -> Self {
    Self::default()
  }

  /// Number of values folded in so far.
  pub fn count(&self) -> usize {
    self.count
  }

  /// Current average; `0.0` before the first value.
  pub fn running_average(&self) -> f64 {
    self.running_average
  }

  /// Sum of all weights folded in so far.
  pub fn sum_of_weights(&self) -> f64 {
    self.sum_of_weights
  }

  /// Current average, or `None` if nothing has been folded in.
  pub fn average(&self) -> Option<f64> {
    (self.count > 0).then_some(self.running_average)
  }

  /// Folds one `(value, weight)` pair in and returns the new average.
  ///
  /// Under [`WeightPolicy::Reject`] the value must be finite, the weight
  /// finite and non-negative, and the new total weight finite. On error the
  /// state is left exactly as it was.
  pub fn push(&mut self, value: f64, weight: f64, policy: WeightPolicy) -> Result<f64, AverageError> {
    let index = self.count;
    match policy {
      WeightPolicy::Reject => {
        if !value.is_finite() {
          return Err(AverageError::InvalidValue { index, value });
        }
        if !weight.is_finite() || weight < 0.0 {
          return Err(AverageError::InvalidWeight { index, weight });
        }
        let total = self.sum_of_weights + weight;
        if !total.is_finite() {
          return Err(AverageError::WeightOverflow {
            index,
            weight,
            sum_of_weights: self.sum_of_weights,
          });
        }
        self.sum_of_weights = total;
        // All weights so far were zero: nothing to move the average towards.
        if total > 0.0 {
          self.running_average += (weight / total) * (value - self.running_average);
        }
      }
      WeightPolicy::Propagate => {
        self.sum_of_weights += weight;
        self.running_average += (weight / self.sum_of_weights) * (value - self.running_average);
      }
    }
    self.count += 1;
    Ok(self.running_average)
  }
}
