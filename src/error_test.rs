//! # Error Handling Test Suite
//!
//! Covers strategy resolution, `StreamError` formatting, cloning and source
//! access, and the default values of the context types.

use crate::error::{
  ComponentInfo, ErrorAction, ErrorContext, ErrorStrategy, StreamError, StringError,
};
use std::error::Error;

fn make_error(retries: usize) -> StreamError<i32> {
  let mut error = StreamError::new(
    Box::new(StringError("projection failed".to_string())),
    ErrorContext {
      timestamp: chrono::Utc::now(),
      item: Some(7),
      component_name: "avg".to_string(),
      component_type: "WeightedAverageTransformer".to_string(),
    },
    ComponentInfo::new("avg".to_string(), "WeightedAverageTransformer".to_string()),
  );
  error.retries = retries;
  error
}

#[test]
fn test_error_action_partial_eq() {
  assert_eq!(ErrorAction::Stop, ErrorAction::Stop);
  assert_ne!(ErrorAction::Stop, ErrorAction::Skip);
}

#[test]
fn test_strategy_stop_resolves_to_stop() {
  let strategy = ErrorStrategy::<i32>::Stop;
  assert_eq!(strategy.action_for(&make_error(0)), ErrorAction::Stop);
}

#[test]
fn test_strategy_skip_resolves_to_skip() {
  let strategy = ErrorStrategy::<i32>::Skip;
  assert_eq!(strategy.action_for(&make_error(0)), ErrorAction::Skip);
}

#[test]
fn test_strategy_retry_exhausts_to_stop() {
  let strategy = ErrorStrategy::<i32>::Retry(2);
  assert_eq!(strategy.action_for(&make_error(0)), ErrorAction::Retry);
  assert_eq!(strategy.action_for(&make_error(1)), ErrorAction::Retry);
  assert_eq!(strategy.action_for(&make_error(2)), ErrorAction::Stop);
}

#[test]
fn test_strategy_custom_handler_is_called() {
  let strategy = ErrorStrategy::<i32>::new_custom(|error| {
    if error.context.item == Some(7) {
      ErrorAction::Skip
    } else {
      ErrorAction::Stop
    }
  });
  assert_eq!(strategy.action_for(&make_error(0)), ErrorAction::Skip);
}

#[test]
fn test_strategy_equality_and_debug() {
  assert_eq!(ErrorStrategy::<i32>::Retry(3), ErrorStrategy::<i32>::Retry(3));
  assert_ne!(ErrorStrategy::<i32>::Retry(3), ErrorStrategy::<i32>::Retry(4));
  assert_eq!(
    ErrorStrategy::<i32>::new_custom(|_| ErrorAction::Stop),
    ErrorStrategy::<i32>::new_custom(|_| ErrorAction::Skip)
  );
  assert_eq!(
    format!("{:?}", ErrorStrategy::<i32>::Retry(3)),
    "ErrorStrategy::Retry(3)"
  );
  assert_eq!(
    format!("{:?}", ErrorStrategy::<i32>::new_custom(|_| ErrorAction::Stop)),
    "ErrorStrategy::Custom"
  );
}

#[test]
fn test_stream_error_display() {
  let error = make_error(0);
  assert_eq!(
    error.to_string(),
    "Error in avg (WeightedAverageTransformer): projection failed"
  );
}

#[test]
fn test_stream_error_source_and_downcast() {
  let error = make_error(0);
  assert_eq!(error.source().unwrap().to_string(), "projection failed");
  assert_eq!(
    error.downcast_source::<StringError>(),
    Some(&StringError("projection failed".to_string()))
  );
  assert!(error.downcast_source::<std::io::Error>().is_none());
}

#[test]
fn test_stream_error_clone_keeps_message_and_context() {
  let error = make_error(1);
  let cloned = error.clone();
  assert_eq!(cloned.to_string(), error.to_string());
  assert_eq!(cloned.context, error.context);
  assert_eq!(cloned.component, error.component);
  assert_eq!(cloned.retries, 1);
}

#[test]
fn test_defaults() {
  let context = ErrorContext::<i32>::default();
  assert_eq!(context.item, None);
  assert_eq!(context.component_name, "default");
  assert_eq!(ComponentInfo::default().type_name, "default");
}
