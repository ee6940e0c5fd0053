//! # Transformers
//!
//! Stream transformers shipped with the crate.
//!
//! - **Weighted average**: running or final weighted mean of a stream, with
//!   pluggable value/weight projections and cancellable subscriptions
//!
//! ## Error Handling
//!
//! Item-level failures (a projection that errors, a rejected weight) are
//! resolved through the transformer's [`ErrorStrategy`](crate::error::ErrorStrategy):
//! `Stop` (the default) surfaces them as a stream error and ends the
//! subscription, `Skip` drops the item. Upstream errors always pass through
//! unchanged and end the subscription.
//!
//! ## Example Usage
//!
//! ```rust
//! use weighted_average_stream::transformers::{EmitMode, WeightedAverageTransformer};
//!
//! let transformer = WeightedAverageTransformer::<i64>::new()
//!   .with_emit_mode(EmitMode::FinalOnly)
//!   .with_name("latency_mean".to_string());
//! # let _ = transformer;
//! ```

pub mod weighted_average;

pub use weighted_average::{
  AverageError, EmitMode, Subscription, SubscriptionState, WeightPolicy, WeightedAverageOptions,
  WeightedAverageStream, WeightedAverageTransformer,
};
