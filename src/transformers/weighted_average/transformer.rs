//! Transformer trait implementation for WeightedAverageTransformer.

use super::stream::{UpstreamStream, WeightedAverageStream};
use super::weighted_average_transformer::WeightedAverageTransformer;
use crate::error::{ComponentInfo, StreamError};
use crate::input::Input;
use crate::output::Output;
use crate::transformer::{Transformer, TransformerConfig};
use async_trait::async_trait;
use std::fmt::Debug;

impl<T> Input for WeightedAverageTransformer<T>
where
  T: Debug + Clone + Send + Sync + 'static,
{
  type Input = T;
  type InputStream = UpstreamStream<T>;
}

impl<T> Output for WeightedAverageTransformer<T>
where
  T: Debug + Clone + Send + Sync + 'static,
{
  type Output = f64;
  type Error = StreamError<T>;
  type OutputStream = WeightedAverageStream<T>;
}

#[async_trait]
impl<T> Transformer for WeightedAverageTransformer<T>
where
  T: Debug + Clone + Send + Sync + 'static,
{
  async fn transform(&mut self, input: Self::InputStream) -> Self::OutputStream {
    self.subscribe(input)
  }

  fn set_config_impl(&mut self, config: TransformerConfig<T>) {
    self.config = config;
  }

  fn get_config_impl(&self) -> &TransformerConfig<T> {
    &self.config
  }

  fn get_config_mut_impl(&mut self) -> &mut TransformerConfig<T> {
    &mut self.config
  }

  fn component_info(&self) -> ComponentInfo {
    self.info()
  }
}
