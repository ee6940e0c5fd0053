//! Builder and configuration for the WeightedAverageTransformer.

use super::error::BoxError;
use super::options::{EmitMode, WeightPolicy, WeightedAverageOptions};
use super::projection::{NumericValue, ProjectionFn, Projections};
use super::stream::{UpstreamStream, WeightedAverageStream};
use crate::error::{ComponentInfo, ErrorStrategy};
use crate::transformer::TransformerConfig;
use std::fmt::Debug;
use std::sync::Arc;

/// A stateful transformer that computes a running weighted average.
///
/// Each upstream item is mapped to a `(value, weight)` pair by the value and
/// weight projections and folded into the average. In
/// [`EmitMode::Running`] every updated average is emitted; in
/// [`EmitMode::FinalOnly`] only the last one is, right before completion.
///
/// The transformer itself holds configuration only. Each subscription gets its
/// own state, so one transformer can be subscribed many times.
///
/// # Example
///
/// ```rust
/// use weighted_average_stream::transformer::Transformer;
/// use weighted_average_stream::transformers::WeightedAverageTransformer;
/// use futures::{stream, StreamExt};
///
/// # async fn example() {
/// // Volume-weighted average price over (price, volume) trades.
/// let mut vwap = WeightedAverageTransformer::with_projections(
///   |trade: &(f64, f64), _| Ok(trade.0),
///   |trade: &(f64, f64), _| Ok(trade.1),
/// );
/// let trades = vec![(10.0, 1.0), (20.0, 3.0)];
/// let averages: Vec<f64> = vwap
///   .transform(Box::pin(stream::iter(trades).map(Ok)))
///   .await
///   .map(|r| r.unwrap())
///   .collect()
///   .await;
/// assert_eq!(averages, vec![10.0, 17.5]);
/// # }
/// ```
pub struct WeightedAverageTransformer<T>
where
  T: Debug + Clone + Send + Sync + 'static,
{
  /// Configuration for the transformer.
  pub(crate) config: TransformerConfig<T>,
  /// Resolved value and weight projections.
  pub(crate) projections: Projections<T>,
  /// Emit mode and weight policy.
  pub(crate) options: WeightedAverageOptions,
}

impl<T> Clone for WeightedAverageTransformer<T>
where
  T: Debug + Clone + Send + Sync + 'static,
{
  fn clone(&self) -> Self {
    Self {
      config: self.config.clone(),
      projections: self.projections.clone(),
      options: self.options,
    }
  }
}

impl<T> Debug for WeightedAverageTransformer<T>
where
  T: Debug + Clone + Send + Sync + 'static,
{
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("WeightedAverageTransformer")
      .field("config", &self.config)
      .field("options", &self.options)
      .finish_non_exhaustive()
  }
}

impl<T> WeightedAverageTransformer<T>
where
  T: NumericValue + Debug + Clone + Send + Sync + 'static,
{
  /// Plain arithmetic mean of numeric items; non-numeric items count as `0`.
  pub fn new() -> Self {
    Self::from_projections(None, None)
  }

  /// Builds a transformer from optional projections, filling in defaults
  /// for the ones left out (see [`Projections::resolve`]).
  pub fn from_projections(value: Option<ProjectionFn<T>>, weight: Option<ProjectionFn<T>>) -> Self {
    Self::from_resolved(Projections::resolve(value, weight))
  }
}

impl<T> Default for WeightedAverageTransformer<T>
where
  T: NumericValue + Debug + Clone + Send + Sync + 'static,
{
  fn default() -> Self {
    Self::new()
  }
}

impl<T> WeightedAverageTransformer<T>
where
  T: Debug + Clone + Send + Sync + 'static,
{
  fn from_resolved(projections: Projections<T>) -> Self {
    Self {
      config: TransformerConfig::default(),
      projections,
      options: WeightedAverageOptions::default(),
    }
  }

  /// Arithmetic mean of `value(item, index)`; every item weighs `1`.
  pub fn with_value<F>(value: F) -> Self
  where
    F: Fn(&T, usize) -> Result<f64, BoxError> + Send + Sync + 'static,
  {
    Self::from_resolved(Projections::unweighted(Arc::new(value)))
  }

  /// Weighted mean of `value(item, index)` by `weight(item, index)`.
  pub fn with_projections<F, G>(value: F, weight: G) -> Self
  where
    F: Fn(&T, usize) -> Result<f64, BoxError> + Send + Sync + 'static,
    G: Fn(&T, usize) -> Result<f64, BoxError> + Send + Sync + 'static,
  {
    Self::from_resolved(Projections::weighted(Arc::new(value), Arc::new(weight)))
  }

  /// Sets the emit mode.
  pub fn with_emit_mode(mut self, emit_mode: EmitMode) -> Self {
    self.options.emit_mode = emit_mode;
    self
  }

  /// Sets the weight policy.
  pub fn with_weight_policy(mut self, weight_policy: WeightPolicy) -> Self {
    self.options.weight_policy = weight_policy;
    self
  }

  /// Replaces all options at once.
  pub fn with_options(mut self, options: WeightedAverageOptions) -> Self {
    self.options = options;
    self
  }

  /// Sets the name for this transformer.
  pub fn with_name(mut self, name: String) -> Self {
    self.config.name = Some(name);
    self
  }

  /// Sets the error strategy applied to projection and weight failures.
  pub fn with_error_strategy(mut self, strategy: ErrorStrategy<T>) -> Self {
    self.config.error_strategy = strategy;
    self
  }

  /// Returns the emit mode.
  pub fn emit_mode(&self) -> EmitMode {
    self.options.emit_mode
  }

  /// Returns the current options.
  pub fn options(&self) -> WeightedAverageOptions {
    self.options
  }

  /// Subscribes to `upstream` with fresh state.
  ///
  /// This is what [`Transformer::transform`](crate::transformer::Transformer::transform)
  /// does; it is exposed so callers without an async context can subscribe
  /// and keep the transformer borrowed immutably.
  pub fn subscribe(&self, upstream: UpstreamStream<T>) -> WeightedAverageStream<T> {
    WeightedAverageStream::new(
      upstream,
      self.projections.clone(),
      self.options,
      self.config.error_strategy(),
      self.info(),
    )
  }

  pub(crate) fn info(&self) -> ComponentInfo {
    ComponentInfo {
      name: self
        .config
        .name
        .clone()
        .unwrap_or_else(|| "weighted_average_transformer".to_string()),
      type_name: std::any::type_name::<Self>().to_string(),
    }
  }
}
