//! # weighted-average-stream
//!
//! A running weighted average as a composable async stream transformer.
//!
//! Upstream values arrive as a [`futures::Stream`] of `Result<T, StreamError<T>>`.
//! For every item a value and a weight are projected out of it and folded into
//! a weighted mean using a constant-memory incremental update. The transformer
//! forwards every intermediate average or only the final one, passes upstream
//! errors through, turns projection failures into stream errors, and can be
//! cancelled from the downstream side at any time.
//!
//! ## Quick Start
//!
//! ```rust
//! use weighted_average_stream::transformer::Transformer;
//! use weighted_average_stream::transformers::{EmitMode, WeightedAverageTransformer};
//! use futures::{stream, StreamExt};
//!
//! # async fn example() {
//! let mut mean = WeightedAverageTransformer::<i32>::new().with_emit_mode(EmitMode::FinalOnly);
//! let out: Vec<_> = mean
//!   .transform(Box::pin(stream::iter(vec![1, 2, 3, 4]).map(Ok)))
//!   .await
//!   .collect()
//!   .await;
//! assert_eq!(out.len(), 1);
//! assert_eq!(*out[0].as_ref().unwrap(), 2.5);
//! # }
//! ```

#![deny(missing_docs)]

/// Error types, strategies and context.
pub mod error;
/// Input trait for stream consumers.
pub mod input;
/// Output trait for stream producers.
pub mod output;
/// Transformer trait and configuration.
pub mod transformer;
/// Built-in transformers.
pub mod transformers;

pub use error::{ComponentInfo, ErrorAction, ErrorContext, ErrorStrategy, StreamError, StringError};
pub use input::Input;
pub use output::Output;
pub use transformer::{Transformer, TransformerConfig};
pub use transformers::{
  EmitMode, Subscription, SubscriptionState, WeightPolicy, WeightedAverageOptions,
  WeightedAverageStream, WeightedAverageTransformer,
};

#[cfg(test)]
mod error_test;
#[cfg(test)]
mod transformer_test;
