//! Value and weight projections.
//!
//! A projection maps an upstream item and its 0-based index to a number. The
//! transformer holds exactly one value projection and one weight projection,
//! chosen once when it is built.

use super::error::BoxError;
use num_traits::ToPrimitive;
use std::fmt;
use std::sync::Arc;

/// A value or weight projection.
pub type ProjectionFn<T> = Arc<dyn Fn(&T, usize) -> Result<f64, BoxError> + Send + Sync>;

/// Items that may carry a number of their own.
///
/// The default value projection uses the item's number when it has one and
/// `0.0` otherwise.
pub trait NumericValue {
  /// The item's numeric value, if it is numeric.
  fn numeric_value(&self) -> Option<f64>;
}

macro_rules! impl_numeric_value {
  ($($t:ty),* $(,)?) => {
    $(
      impl NumericValue for $t {
        fn numeric_value(&self) -> Option<f64> {
          self.to_f64()
        }
      }
    )*
  };
}

impl_numeric_value!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

impl<N: NumericValue> NumericValue for Option<N> {
  fn numeric_value(&self) -> Option<f64> {
    self.as_ref().and_then(NumericValue::numeric_value)
  }
}

impl NumericValue for serde_json::Value {
  fn numeric_value(&self) -> Option<f64> {
    self.as_f64()
  }
}

impl NumericValue for String {
  fn numeric_value(&self) -> Option<f64> {
    None
  }
}

impl NumericValue for &'static str {
  fn numeric_value(&self) -> Option<f64> {
    None
  }
}

impl NumericValue for bool {
  fn numeric_value(&self) -> Option<f64> {
    None
  }
}

/// The resolved pair of projections.
pub struct Projections<T> {
  value: ProjectionFn<T>,
  weight: ProjectionFn<T>,
}

impl<T> Clone for Projections<T> {
  fn clone(&self) -> Self {
    Self {
      value: Arc::clone(&self.value),
      weight: Arc::clone(&self.weight),
    }
  }
}

impl<T> fmt::Debug for Projections<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Projections").finish_non_exhaustive()
  }
}

fn unit_weight<T: 'static>() -> ProjectionFn<T> {
  Arc::new(|_: &T, _: usize| Ok(1.0))
}

fn numeric<T: NumericValue + 'static>() -> ProjectionFn<T> {
  Arc::new(|item: &T, _: usize| Ok(item.numeric_value().unwrap_or(0.0)))
}

impl<T: 'static> Projections<T> {
  /// Value projection with a constant weight of `1`.
  pub fn unweighted(value: ProjectionFn<T>) -> Self {
    Self {
      value,
      weight: unit_weight(),
    }
  }

  /// Both projections as given.
  pub fn weighted(value: ProjectionFn<T>, weight: ProjectionFn<T>) -> Self {
    Self { value, weight }
  }

  /// Fills in whichever projections were not supplied.
  ///
  /// | value | weight | result |
  /// |---|---|---|
  /// | - | - | numeric value, weight `1` |
  /// | given | - | given value, weight `1` |
  /// | - | given | numeric value, given weight |
  /// | given | given | both as given |
  pub fn resolve(value: Option<ProjectionFn<T>>, weight: Option<ProjectionFn<T>>) -> Self
  where
    T: NumericValue,
  {
    match (value, weight) {
      (None, None) => Self::weighted(numeric(), unit_weight()),
      (Some(value), None) => Self::unweighted(value),
      (None, Some(weight)) => Self::weighted(numeric(), weight),
      (Some(value), Some(weight)) => Self::weighted(value, weight),
    }
  }
}

impl<T> Projections<T> {
  /// Applies the value projection.
  pub fn value_of(&self, item: &T, index: usize) -> Result<f64, BoxError> {
    (self.value)(item, index)
  }

  /// Applies the weight projection.
  pub fn weight_of(&self, item: &T, index: usize) -> Result<f64, BoxError> {
    (self.weight)(item, index)
  }
}
