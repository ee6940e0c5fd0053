//! # Error Handling
//!
//! Error types shared by every component in the crate. A stream in this crate
//! carries `Result<T, StreamError<T>>` items: an `Err` is an out-of-band error
//! signal that travels downstream in order with the values around it.
//!
//! ## Core Types
//!
//! - **ErrorAction**: What a component does after an error (Stop, Skip, Retry)
//! - **ErrorStrategy**: Configured policy that resolves to an `ErrorAction`
//! - **StreamError**: Boxed source error plus context and component identity
//! - **ErrorContext**: When the error happened and which item caused it
//! - **ComponentInfo**: Name and type of the component that raised the error
//!
//! ## Example
//!
//! ```rust
//! use weighted_average_stream::error::{ComponentInfo, ErrorContext, StreamError};
//!
//! let error = StreamError::new(
//!     Box::new(std::io::Error::other("sensor offline")),
//!     ErrorContext {
//!         timestamp: chrono::Utc::now(),
//!         item: Some(3.5_f64),
//!         component_name: "sensor_feed".to_string(),
//!         component_type: "Upstream".to_string(),
//!     },
//!     ComponentInfo::new("sensor_feed".to_string(), "Upstream".to_string()),
//! );
//! assert_eq!(error.to_string(), "Error in sensor_feed (Upstream): sensor offline");
//! ```

use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// Action to take when an error occurs in a component.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorAction {
  /// Stop processing and surface the error downstream.
  Stop,
  /// Drop the item that caused the error and keep going.
  Skip,
  /// Retry the operation that caused the error.
  Retry,
}

type CustomErrorHandler<T> = Arc<dyn Fn(&StreamError<T>) -> ErrorAction + Send + Sync>;

/// Strategy for handling errors in a component.
///
/// # Example
///
/// ```rust
/// use weighted_average_stream::error::{ErrorAction, ErrorStrategy};
///
/// // Skip items whose projection failed on the first attempt, stop otherwise.
/// let strategy = ErrorStrategy::<i32>::new_custom(|error| {
///   if error.retries == 0 {
///     ErrorAction::Skip
///   } else {
///     ErrorAction::Stop
///   }
/// });
/// # let _ = strategy;
/// ```
pub enum ErrorStrategy<T> {
  /// Stop processing on the first error. This is the default.
  Stop,
  /// Skip items that cause errors.
  Skip,
  /// Retry up to the given number of times.
  Retry(usize),
  /// User-defined handler.
  Custom(CustomErrorHandler<T>),
}

impl<T> Clone for ErrorStrategy<T> {
  fn clone(&self) -> Self {
    match self {
      ErrorStrategy::Stop => ErrorStrategy::Stop,
      ErrorStrategy::Skip => ErrorStrategy::Skip,
      ErrorStrategy::Retry(n) => ErrorStrategy::Retry(*n),
      ErrorStrategy::Custom(handler) => ErrorStrategy::Custom(Arc::clone(handler)),
    }
  }
}

impl<T> fmt::Debug for ErrorStrategy<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ErrorStrategy::Stop => write!(f, "ErrorStrategy::Stop"),
      ErrorStrategy::Skip => write!(f, "ErrorStrategy::Skip"),
      ErrorStrategy::Retry(n) => write!(f, "ErrorStrategy::Retry({})", n),
      ErrorStrategy::Custom(_) => write!(f, "ErrorStrategy::Custom"),
    }
  }
}

impl<T> PartialEq for ErrorStrategy<T> {
  fn eq(&self, other: &Self) -> bool {
    match (self, other) {
      (ErrorStrategy::Stop, ErrorStrategy::Stop) => true,
      (ErrorStrategy::Skip, ErrorStrategy::Skip) => true,
      (ErrorStrategy::Retry(n1), ErrorStrategy::Retry(n2)) => n1 == n2,
      (ErrorStrategy::Custom(_), ErrorStrategy::Custom(_)) => true,
      _ => false,
    }
  }
}

impl<T> ErrorStrategy<T> {
  /// Creates a custom strategy from a handler function.
  pub fn new_custom<F>(f: F) -> Self
  where
    F: Fn(&StreamError<T>) -> ErrorAction + Send + Sync + 'static,
  {
    Self::Custom(Arc::new(f))
  }

  /// Resolves this strategy to an action for the given error.
  pub fn action_for(&self, error: &StreamError<T>) -> ErrorAction {
    match self {
      ErrorStrategy::Stop => ErrorAction::Stop,
      ErrorStrategy::Skip => ErrorAction::Skip,
      ErrorStrategy::Retry(n) if error.retries < *n => ErrorAction::Retry,
      ErrorStrategy::Custom(handler) => handler(error),
      _ => ErrorAction::Stop,
    }
  }
}

/// Error that occurred while processing a stream.
///
/// # Fields
///
/// * `source` - The underlying error
/// * `context` - When it happened and which item was being processed
/// * `component` - The component that raised it
/// * `retries` - How many times the failing operation was retried
#[derive(Debug)]
pub struct StreamError<T> {
  /// The original error that occurred.
  pub source: Box<dyn Error + Send + Sync>,
  /// Context about when and where the error occurred.
  pub context: ErrorContext<T>,
  /// Information about the component that encountered the error.
  pub component: ComponentInfo,
  /// Number of times this error has been retried.
  pub retries: usize,
}

impl<T: Clone> Clone for StreamError<T> {
  fn clone(&self) -> Self {
    Self {
      source: Box::new(StringError(self.source.to_string())),
      context: self.context.clone(),
      component: self.component.clone(),
      retries: self.retries,
    }
  }
}

/// An error that only carries a message.
#[derive(Debug, Clone, PartialEq)]
pub struct StringError(pub String);

impl fmt::Display for StringError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl Error for StringError {}

impl<T> StreamError<T> {
  /// Creates a new `StreamError` with `retries` set to 0.
  pub fn new(
    source: Box<dyn Error + Send + Sync>,
    context: ErrorContext<T>,
    component: ComponentInfo,
  ) -> Self {
    Self {
      source,
      context,
      component,
      retries: 0,
    }
  }

  /// Returns the source error downcast to `E`, if it is one.
  pub fn downcast_source<E: Error + 'static>(&self) -> Option<&E> {
    self.source.downcast_ref::<E>()
  }
}

impl<T> fmt::Display for StreamError<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "Error in {} ({}): {}",
      self.component.name, self.component.type_name, self.source
    )
  }
}

impl<T: fmt::Debug> Error for StreamError<T> {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    Some(self.source.as_ref())
  }
}

/// Context information about when and where an error occurred.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorContext<T> {
  /// The timestamp when the error occurred.
  pub timestamp: chrono::DateTime<chrono::Utc>,
  /// The item being processed when the error occurred, if available.
  pub item: Option<T>,
  /// The name of the component that encountered the error.
  pub component_name: String,
  /// The type of the component that encountered the error.
  pub component_type: String,
}

impl<T> Default for ErrorContext<T> {
  fn default() -> Self {
    Self {
      timestamp: chrono::Utc::now(),
      item: None,
      component_name: "default".to_string(),
      component_type: "default".to_string(),
    }
  }
}

/// Name and type of a component, used in logs and error reports.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentInfo {
  /// The name of the component.
  pub name: String,
  /// The type name of the component.
  pub type_name: String,
}

impl Default for ComponentInfo {
  fn default() -> Self {
    Self {
      name: "default".to_string(),
      type_name: "default".to_string(),
    }
  }
}

impl ComponentInfo {
  /// Creates a new `ComponentInfo`.
  pub fn new(name: String, type_name: String) -> Self {
    Self { name, type_name }
  }
}
