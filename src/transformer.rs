//! # Transformer Trait
//!
//! A transformer turns an upstream stream into a downstream stream. Each call
//! to [`Transformer::transform`] is one subscription: the transformer hands back
//! a fresh output stream with its own state, so the same transformer value can
//! be subscribed any number of times without the subscriptions seeing each
//! other.
//!
//! ## Key Concepts
//!
//! - **Transformer**: Component that transforms `Result<T, StreamError<T>>` streams
//! - **TransformerConfig**: Component name and error strategy
//! - **Error Strategy**: How item-level failures are handled (Stop, Skip, Retry, Custom)
//!
//! ## Example
//!
//! ```rust
//! use weighted_average_stream::transformer::Transformer;
//! use weighted_average_stream::transformers::WeightedAverageTransformer;
//! use futures::{stream, StreamExt};
//!
//! # async fn example() {
//! let mut transformer = WeightedAverageTransformer::<f64>::new();
//! let averages: Vec<f64> = transformer
//!     .transform(Box::pin(stream::iter(vec![1.0, 2.0, 3.0]).map(Ok)))
//!     .await
//!     .map(|r| r.unwrap())
//!     .collect()
//!     .await;
//! assert_eq!(averages, vec![1.0, 1.5, 2.0]);
//! # }
//! ```

use crate::error::{ComponentInfo, ErrorAction, ErrorContext, ErrorStrategy, StreamError};
use crate::{input::Input, output::Output};
use async_trait::async_trait;

/// Configuration shared by all transformers: error strategy and name.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformerConfig<M: std::fmt::Debug + Clone + Send + Sync> {
  /// The error handling strategy to use when item-level errors occur.
  pub error_strategy: ErrorStrategy<M>,
  /// Optional name for identifying this transformer in logs and errors.
  pub name: Option<String>,
}

impl<M: std::fmt::Debug + Clone + Send + Sync> Default for TransformerConfig<M> {
  fn default() -> Self {
    Self {
      error_strategy: ErrorStrategy::Stop,
      name: None,
    }
  }
}

impl<M: std::fmt::Debug + Clone + Send + Sync> TransformerConfig<M> {
  /// Sets the error handling strategy.
  pub fn with_error_strategy(mut self, strategy: ErrorStrategy<M>) -> Self {
    self.error_strategy = strategy;
    self
  }

  /// Sets the name.
  pub fn with_name(mut self, name: String) -> Self {
    self.name = Some(name);
    self
  }

  /// Returns the current error handling strategy.
  pub fn error_strategy(&self) -> ErrorStrategy<M> {
    self.error_strategy.clone()
  }

  /// Returns the current name, if set.
  pub fn name(&self) -> Option<String> {
    self.name.clone()
  }
}

/// Trait for components that transform data streams.
///
/// Implementors provide `transform` and the three `*_config_impl` accessors;
/// everything else has a default built on top of them.
#[async_trait]
pub trait Transformer: Input + Output
where
  Self::Input: std::fmt::Debug + Clone + Send + Sync,
{
  /// Subscribes to `input` and returns the transformed stream.
  ///
  /// Every call produces an independent subscription with fresh state.
  async fn transform(&mut self, input: Self::InputStream) -> Self::OutputStream;

  /// Returns a clone of this transformer with `config` applied.
  #[must_use]
  fn with_config(&self, config: TransformerConfig<Self::Input>) -> Self
  where
    Self: Sized + Clone,
  {
    let mut this = self.clone();
    this.set_config(config);
    this
  }

  /// Replaces the configuration.
  fn set_config(&mut self, config: TransformerConfig<Self::Input>) {
    self.set_config_impl(config);
  }

  /// Returns the configuration.
  fn config(&self) -> &TransformerConfig<Self::Input> {
    self.get_config_impl()
  }

  /// Returns the configuration mutably.
  fn config_mut(&mut self) -> &mut TransformerConfig<Self::Input> {
    self.get_config_mut_impl()
  }

  /// Sets the name for this transformer.
  #[must_use]
  fn with_name(mut self, name: String) -> Self
  where
    Self: Sized,
  {
    let config = self.get_config_impl().clone();
    self.set_config(TransformerConfig {
      error_strategy: config.error_strategy,
      name: Some(name),
    });
    self
  }

  /// Resolves the configured strategy for `error`.
  fn handle_error(&self, error: &StreamError<Self::Input>) -> ErrorAction {
    self.config().error_strategy.action_for(error)
  }

  /// Builds an error context for `item`, stamped with the current time.
  fn create_error_context(&self, item: Option<Self::Input>) -> ErrorContext<Self::Input> {
    let info = self.component_info();
    ErrorContext {
      timestamp: chrono::Utc::now(),
      item,
      component_name: info.name,
      component_type: info.type_name,
    }
  }

  /// Returns the component's name and type.
  fn component_info(&self) -> ComponentInfo {
    ComponentInfo {
      name: self
        .config()
        .name()
        .unwrap_or_else(|| "transformer".to_string()),
      type_name: std::any::type_name::<Self>().to_string(),
    }
  }

  /// Stores the configuration.
  fn set_config_impl(&mut self, config: TransformerConfig<Self::Input>);

  /// Returns the stored configuration.
  fn get_config_impl(&self) -> &TransformerConfig<Self::Input>;

  /// Returns the stored configuration mutably.
  fn get_config_mut_impl(&mut self) -> &mut TransformerConfig<Self::Input>;
}
