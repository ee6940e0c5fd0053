//! Output trait for components that produce streams.
//!
//! Like inputs, outputs carry errors in-band: a component's output stream
//! yields `Result<Self::Output, Self::Error>` and ends when the component
//! completes.

use futures::Stream;

/// Trait for components that produce a downstream stream.
pub trait Output
where
  Self::Output: Send + 'static,
{
  /// The downstream value type.
  type Output;
  /// The error type carried by `Err` items of the output stream.
  type Error: Send + 'static;
  /// The downstream stream type.
  type OutputStream: Stream<Item = Result<Self::Output, Self::Error>> + Send + 'static;
}
