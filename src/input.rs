//! Input trait for components that consume streams.
//!
//! An input stream carries `Result<T, StreamError<T>>` items. `Ok` items are
//! upstream values, `Err` items are upstream error signals, and the end of the
//! stream is the completion signal.
//!
//! ```rust
//! use weighted_average_stream::error::StreamError;
//! use weighted_average_stream::input::Input;
//! use futures::Stream;
//! use std::pin::Pin;
//!
//! struct PriceSink;
//!
//! impl Input for PriceSink {
//!     type Input = f64;
//!     type InputStream = Pin<Box<dyn Stream<Item = Result<f64, StreamError<f64>>> + Send>>;
//! }
//! ```

use crate::error::StreamError;
use futures::Stream;

/// Trait for components that receive an upstream stream.
pub trait Input
where
  Self::Input: Send + 'static,
{
  /// The upstream value type.
  type Input;
  /// The upstream stream type. Errors travel in-band as `Err` items.
  type InputStream: Stream<Item = Result<Self::Input, StreamError<Self::Input>>> + Send + 'static;
}
