//! Running weighted average transformer.
//!
//! Folds each upstream item into a weighted mean with the incremental update
//! `avg += (w / Σw) * (v - avg)` and emits either every intermediate average or
//! only the final one. Upstream errors pass through unchanged, projection
//! failures become stream errors, and a subscription can be cancelled at any
//! time through its [`Subscription`] handle.

mod accumulator;
mod error;
mod options;
mod projection;
mod stream;
mod transformer;
mod weighted_average_transformer;


pub use accumulator::WeightedAverageState;
pub use error::{AverageError, BoxError};
pub use options::{EmitMode, WeightPolicy, WeightedAverageOptions};
pub use projection::{NumericValue, ProjectionFn, Projections};
pub use stream::{Subscription, SubscriptionState, UpstreamStream, WeightedAverageStream};
pub use weighted_average_transformer::WeightedAverageTransformer;
