//! # Transformer Trait Test Suite
//!
//! Covers `TransformerConfig` and the default methods of the `Transformer`
//! trait, exercised through `WeightedAverageTransformer`.

use crate::error::{ComponentInfo, ErrorAction, ErrorContext, ErrorStrategy, StreamError, StringError};
use crate::transformers::WeightedAverageTransformer;
use crate::{Transformer, TransformerConfig};
use futures::{StreamExt, stream};

fn error_for(item: i32, retries: usize) -> StreamError<i32> {
  let mut error = StreamError::new(
    Box::new(StringError("boom".to_string())),
    ErrorContext {
      item: Some(item),
      ..ErrorContext::default()
    },
    ComponentInfo::default(),
  );
  error.retries = retries;
  error
}

#[test]
fn test_transformer_config_default() {
  let config = TransformerConfig::<i32>::default();
  assert_eq!(config.name(), None);
  assert_eq!(config.error_strategy(), ErrorStrategy::Stop);
}

#[test]
fn test_transformer_config_builder_chain() {
  let config = TransformerConfig::<i32>::default()
    .with_error_strategy(ErrorStrategy::Retry(3))
    .with_name("test_transformer".to_string());

  assert_eq!(config.name(), Some("test_transformer".to_string()));
  assert_eq!(config.error_strategy(), ErrorStrategy::Retry(3));
}

#[test]
fn test_set_config_and_config_mut() {
  let mut transformer = WeightedAverageTransformer::<i32>::new();
  transformer.set_config(TransformerConfig::default().with_name("first".to_string()));
  assert_eq!(transformer.config().name(), Some("first".to_string()));

  transformer.config_mut().name = Some("second".to_string());
  assert_eq!(transformer.config().name(), Some("second".to_string()));
}

#[test]
fn test_with_config_leaves_original_untouched() {
  let transformer = WeightedAverageTransformer::<i32>::new();
  let configured = transformer.with_config(
    TransformerConfig::default()
      .with_name("configured".to_string())
      .with_error_strategy(ErrorStrategy::Skip),
  );

  assert_eq!(transformer.config().name(), None);
  assert_eq!(configured.config().name(), Some("configured".to_string()));
  assert_eq!(configured.config().error_strategy(), ErrorStrategy::Skip);
}

#[test]
fn test_trait_with_name_keeps_error_strategy() {
  let transformer =
    WeightedAverageTransformer::<i32>::new().with_error_strategy(ErrorStrategy::Skip);
  let named = Transformer::with_name(transformer, "named".to_string());
  assert_eq!(named.config().name(), Some("named".to_string()));
  assert_eq!(named.config().error_strategy(), ErrorStrategy::Skip);
}

#[test]
fn test_handle_error_follows_strategy() {
  let stop = WeightedAverageTransformer::<i32>::new();
  assert_eq!(stop.handle_error(&error_for(1, 0)), ErrorAction::Stop);

  let skip = WeightedAverageTransformer::<i32>::new().with_error_strategy(ErrorStrategy::Skip);
  assert_eq!(skip.handle_error(&error_for(1, 0)), ErrorAction::Skip);

  let retry =
    WeightedAverageTransformer::<i32>::new().with_error_strategy(ErrorStrategy::Retry(1));
  assert_eq!(retry.handle_error(&error_for(1, 0)), ErrorAction::Retry);
  assert_eq!(retry.handle_error(&error_for(1, 1)), ErrorAction::Stop);

  let custom = WeightedAverageTransformer::<i32>::new().with_error_strategy(
    ErrorStrategy::new_custom(|error| {
      if error.context.item == Some(0) {
        ErrorAction::Skip
      } else {
        ErrorAction::Stop
      }
    }),
  );
  assert_eq!(custom.handle_error(&error_for(0, 0)), ErrorAction::Skip);
  assert_eq!(custom.handle_error(&error_for(5, 0)), ErrorAction::Stop);
}

#[test]
fn test_component_info_default_and_named() {
  let transformer = WeightedAverageTransformer::<i32>::new();
  let info = transformer.component_info();
  assert_eq!(info.name, "weighted_average_transformer");
  assert!(info.type_name.contains("WeightedAverageTransformer"));

  let named = WeightedAverageTransformer::<i32>::new().with_name("vwap".to_string());
  assert_eq!(named.component_info().name, "vwap");
}

#[test]
fn test_create_error_context() {
  let transformer = WeightedAverageTransformer::<i32>::new().with_name("ctx".to_string());
  let context = transformer.create_error_context(Some(9));
  assert_eq!(context.item, Some(9));
  assert_eq!(context.component_name, "ctx");
  assert!(context.component_type.contains("WeightedAverageTransformer"));
}

#[tokio::test]
async fn test_transform_creates_independent_subscriptions() {
  let mut transformer = WeightedAverageTransformer::<i32>::new();

  let first: Vec<f64> = transformer
    .transform(Box::pin(stream::iter(vec![10, 20]).map(Ok)))
    .await
    .map(|r| r.unwrap())
    .collect()
    .await;
  let second: Vec<f64> = transformer
    .transform(Box::pin(stream::iter(vec![1, 3]).map(Ok)))
    .await
    .map(|r| r.unwrap())
    .collect()
    .await;

  assert_eq!(first, vec![10.0, 15.0]);
  assert_eq!(second, vec![1.0, 2.0]);
}
