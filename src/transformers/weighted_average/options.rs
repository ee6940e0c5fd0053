//! Options for the weighted average transformer.
//!
//! All options deserialize from configuration with missing fields defaulted:
//!
//! ```rust
//! use weighted_average_stream::transformers::weighted_average::{
//!   EmitMode, WeightPolicy, WeightedAverageOptions,
//! };
//!
//! let options: WeightedAverageOptions =
//!   serde_json::from_str(r#"{ "emit_mode": "final_only" }"#).unwrap();
//! assert_eq!(options.emit_mode, EmitMode::FinalOnly);
//! assert_eq!(options.weight_policy, WeightPolicy::Reject);
//! ```

use serde::{Deserialize, Serialize};

/// Which averages are forwarded downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmitMode {
  /// Emit the updated average after every item.
  #[default]
  Running,
  /// Emit only the final average, right before completion.
  FinalOnly,
}

/// How weights that break the update rule are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightPolicy {
  /// Non-finite values, negative or non-finite weights, and weights that
  /// would overflow the total weight fail the item. A zero weight is accepted
  /// and leaves the average untouched while the total weight is still zero.
  #[default]
  Reject,
  /// Apply the update as-is and let IEEE-754 `NaN`/`inf` propagate.
  Propagate,
}

/// Options for a [`WeightedAverageTransformer`](super::WeightedAverageTransformer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightedAverageOptions {
  /// Which averages are forwarded downstream.
  pub emit_mode: EmitMode,
  /// How invalid weights are treated.
  pub weight_policy: WeightPolicy,
}

impl WeightedAverageOptions {
  /// Sets the emit mode.
  pub fn with_emit_mode(mut self, emit_mode: EmitMode) -> Self {
    self.emit_mode = emit_mode;
    self
  }

  /// Sets the weight policy.
  pub fn with_weight_policy(mut self, weight_policy: WeightPolicy) -> Self {
    self.weight_policy = weight_policy;
    self
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_defaults() {
    let options = WeightedAverageOptions::default();
    assert_eq!(options.emit_mode, EmitMode::Running);
    assert_eq!(options.weight_policy, WeightPolicy::Reject);
  }

  #[test]
  fn test_deserialize_empty_object() {
    let options: WeightedAverageOptions = serde_json::from_str("{}").unwrap();
    assert_eq!(options, WeightedAverageOptions::default());
  }

  #[test]
  fn test_deserialize_all_fields() {
    let options: WeightedAverageOptions =
      serde_json::from_str(r#"{ "emit_mode": "final_only", "weight_policy": "propagate" }"#)
        .unwrap();
    assert_eq!(
      options,
      WeightedAverageOptions::default()
        .with_emit_mode(EmitMode::FinalOnly)
        .with_weight_policy(WeightPolicy::Propagate)
    );
  }

  #[test]
  fn test_serialize_uses_snake_case() {
    let json = serde_json::to_value(
      WeightedAverageOptions::default().with_emit_mode(EmitMode::FinalOnly),
    )
    .unwrap();
    assert_eq!(json["emit_mode"], "final_only");
    assert_eq!(json["weight_policy"], "reject");
  }

  #[test]
  fn test_unknown_mode_is_rejected() {
    let result = serde_json::from_str::<WeightedAverageOptions>(r#"{ "emit_mode": "sometimes" }"#);
    assert!(result.is_err());
  }
}
