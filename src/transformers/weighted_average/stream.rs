//! Per-subscription output stream and its cancellation handle.
//!
//! Every subscription owns one [`WeightedAverageStream`]. The stream drives
//! the whole protocol from `poll_next`: it pulls one upstream signal, folds it
//! into its [`WeightedAverageState`], and decides what, if anything, to
//! forward. Nothing runs between polls.
//!
//! Cancellation goes through a [`Subscription`] handle (or simply dropping the
//! stream). It is synchronous: once `unsubscribe` returns no further item is
//! projected or forwarded, and a consumer parked in `poll_next` is woken so it
//! observes the end of the stream. The upstream is polled outside of any lock,
//! so `unsubscribe` may be called from inside the upstream itself. An idle
//! upstream is dropped before `unsubscribe` returns; one that is being polled
//! at that moment is dropped as soon as its poll returns.

use super::accumulator::WeightedAverageState;
use super::error::AverageError;
use super::options::{EmitMode, WeightedAverageOptions};
use super::projection::Projections;
use crate::error::{ComponentInfo, ErrorAction, ErrorContext, ErrorStrategy, StreamError};
use futures::stream::FusedStream;
use futures::task::AtomicWaker;
use futures::Stream;
use std::fmt;
use std::pin::Pin;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};
use tracing::{debug, trace, warn};

/// Items absorbed without yielding before `poll_next` hands control back to
/// the executor.
const ABSORB_BUDGET: usize = 128;

/// Upstream stream type accepted by the transformer.
pub type UpstreamStream<T> = Pin<Box<dyn Stream<Item = Result<T, StreamError<T>>> + Send>>;

/// Lifecycle of a subscription.
///
/// `Active` is the only non-terminal state; once a subscription leaves it, it
/// never changes again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SubscriptionState {
  /// Receiving items.
  Active = 0,
  /// Upstream completed and completion was forwarded.
  Completed = 1,
  /// An upstream error or an item failure was forwarded.
  Errored = 2,
  /// The downstream side unsubscribed.
  Cancelled = 3,
}

impl SubscriptionState {
  fn from_u8(raw: u8) -> Self {
    match raw {
      0 => SubscriptionState::Active,
      1 => SubscriptionState::Completed,
      2 => SubscriptionState::Errored,
      _ => SubscriptionState::Cancelled,
    }
  }

  /// Whether this is a terminal state.
  pub fn is_terminal(self) -> bool {
    self != SubscriptionState::Active
  }
}

struct Shared<T> {
  state: AtomicU8,
  waker: AtomicWaker,
  upstream: Mutex<Option<UpstreamStream<T>>>,
  component: ComponentInfo,
}

impl<T> Shared<T> {
  fn state(&self) -> SubscriptionState {
    SubscriptionState::from_u8(self.state.load(Ordering::Acquire))
  }

  fn upstream(&self) -> MutexGuard<'_, Option<UpstreamStream<T>>> {
    self.upstream.lock().unwrap_or_else(PoisonError::into_inner)
  }

  /// Moves `Active -> to` and releases the upstream. Returns `false` if the
  /// subscription had already terminated.
  fn finish(&self, to: SubscriptionState) -> bool {
    let won = self
      .state
      .compare_exchange(
        SubscriptionState::Active as u8,
        to as u8,
        Ordering::AcqRel,
        Ordering::Acquire,
      )
      .is_ok();
    if won {
      let released = self.upstream().take();
      drop(released);
    }
    won
  }

  /// Puts a polled upstream back into its slot. If the subscription
  /// terminated while the upstream was out, it is dropped instead and
  /// `false` is returned.
  fn restore(&self, upstream: UpstreamStream<T>) -> bool {
    let mut slot = self.upstream();
    if self.state().is_terminal() {
      drop(slot);
      drop(upstream);
      return false;
    }
    *slot = Some(upstream);
    true
  }
}

/// Handle used to cancel a subscription from the downstream side.
///
/// Cloning the handle is cheap; all clones refer to the same subscription.
pub struct Subscription<T> {
  shared: Arc<Shared<T>>,
}

impl<T> Clone for Subscription<T> {
  fn clone(&self) -> Self {
    Self {
      shared: Arc::clone(&self.shared),
    }
  }
}

impl<T> fmt::Debug for Subscription<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Subscription")
      .field("component", &self.shared.component.name)
      .field("state", &self.shared.state())
      .finish()
  }
}

impl<T> Subscription<T> {
  /// Cancels the subscription and drops the upstream stream.
  ///
  /// Idempotent; has no effect once the subscription has terminated.
  pub fn unsubscribe(&self) {
    if self.shared.finish(SubscriptionState::Cancelled) {
      debug!(component = %self.shared.component.name, "subscription cancelled");
      self.shared.waker.wake();
    }
  }

  /// Current state of the subscription.
  pub fn state(&self) -> SubscriptionState {
    self.shared.state()
  }

  /// Whether the subscription has terminated for any reason.
  pub fn is_closed(&self) -> bool {
    self.shared.state().is_terminal()
  }
}

enum Step<T> {
  Emit(f64),
  Absorbed,
  Skipped,
  Failed(StreamError<T>),
}

/// Stream of running (or final) weighted averages for one subscription.
///
/// Yields `Ok(average)` values, at most one `Err` (an upstream error passed
/// through unchanged, or an item failure), and ends on completion, error, or
/// cancellation.
pub struct WeightedAverageStream<T> {
  shared: Arc<Shared<T>>,
  projections: Projections<T>,
  options: WeightedAverageOptions,
  error_strategy: ErrorStrategy<T>,
  average: WeightedAverageState,
}

impl<T> fmt::Debug for WeightedAverageStream<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("WeightedAverageStream")
      .field("component", &self.shared.component.name)
      .field("state", &self.shared.state())
      .field("options", &self.options)
      .field("average", &self.average)
      .finish()
  }
}

impl<T> WeightedAverageStream<T> {
  pub(crate) fn new(
    upstream: UpstreamStream<T>,
    projections: Projections<T>,
    options: WeightedAverageOptions,
    error_strategy: ErrorStrategy<T>,
    component: ComponentInfo,
  ) -> Self {
    debug!(
      component = %component.name,
      emit_mode = ?options.emit_mode,
      weight_policy = ?options.weight_policy,
      "subscribed to upstream"
    );
    Self {
      shared: Arc::new(Shared {
        state: AtomicU8::new(SubscriptionState::Active as u8),
        waker: AtomicWaker::new(),
        upstream: Mutex::new(Some(upstream)),
        component,
      }),
      projections,
      options,
      error_strategy,
      average: WeightedAverageState::new(),
    }
  }

  /// Returns a handle that can cancel this subscription.
  pub fn subscription(&self) -> Subscription<T> {
    Subscription {
      shared: Arc::clone(&self.shared),
    }
  }

  /// Cancels this subscription. Same as [`Subscription::unsubscribe`].
  pub fn unsubscribe(&self) {
    self.subscription().unsubscribe();
  }

  /// Current state of the subscription.
  pub fn state(&self) -> SubscriptionState {
    self.shared.state()
  }

  /// Snapshot of the accumulated average.
  pub fn average_state(&self) -> WeightedAverageState {
    self.average
  }

  fn fold(&mut self, item: T) -> Step<T> {
    let index = self.average.count();
    let value = match self.projections.value_of(&item, index) {
      Ok(value) => value,
      Err(source) => return self.reject(item, AverageError::ValueProjection { index, source }),
    };
    let weight = match self.projections.weight_of(&item, index) {
      Ok(weight) => weight,
      Err(source) => return self.reject(item, AverageError::WeightProjection { index, source }),
    };

    match self.average.push(value, weight, self.options.weight_policy) {
      Ok(average) => {
        trace!(
          component = %self.shared.component.name,
          index,
          value,
          weight,
          average,
          "average updated"
        );
        match self.options.emit_mode {
          EmitMode::Running => Step::Emit(average),
          EmitMode::FinalOnly => Step::Absorbed,
        }
      }
      Err(error) => self.reject(item, error),
    }
  }

  fn reject(&self, item: T, error: AverageError) -> Step<T> {
    let component = &self.shared.component;
    let index = error.index();
    let error = StreamError::new(
      Box::new(error),
      ErrorContext {
        timestamp: chrono::Utc::now(),
        item: Some(item),
        component_name: component.name.clone(),
        component_type: component.type_name.clone(),
      },
      component.clone(),
    );

    match self.error_strategy.action_for(&error) {
      ErrorAction::Skip => {
        warn!(component = %component.name, index, error = %error.source, "skipping item");
        Step::Skipped
      }
      // Projections are not re-run; a retry request stops like `Stop`.
      ErrorAction::Stop | ErrorAction::Retry => {
        warn!(component = %component.name, index, error = %error.source, "item failed");
        Step::Failed(error)
      }
    }
  }

  fn complete(&mut self) -> Option<Result<f64, StreamError<T>>> {
    if !self.shared.finish(SubscriptionState::Completed) {
      return None;
    }
    debug!(
      component = %self.shared.component.name,
      count = self.average.count(),
      "upstream completed"
    );
    match self.options.emit_mode {
      EmitMode::FinalOnly => self.average.average().map(Ok),
      EmitMode::Running => None,
    }
  }
}

impl<T> Stream for WeightedAverageStream<T> {
  type Item = Result<f64, StreamError<T>>;

  fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
    let this = self.get_mut();
    this.shared.waker.register(cx.waker());

    let mut absorbed = 0;
    loop {
      if this.shared.state().is_terminal() {
        return Poll::Ready(None);
      }

      let taken = this.shared.upstream().take();
      let Some(mut upstream) = taken else {
        return Poll::Ready(None);
      };
      let polled = upstream.as_mut().poll_next(cx);
      if !this.shared.restore(upstream) {
        return Poll::Ready(None);
      }

      match polled {
        Poll::Pending => return Poll::Pending,
        Poll::Ready(None) => return Poll::Ready(this.complete()),
        Poll::Ready(Some(Err(error))) => {
          if !this.shared.finish(SubscriptionState::Errored) {
            return Poll::Ready(None);
          }
          debug!(
            component = %this.shared.component.name,
            error = %error,
            "forwarding upstream error"
          );
          return Poll::Ready(Some(Err(error)));
        }
        Poll::Ready(Some(Ok(item))) => {
          if this.shared.state().is_terminal() {
            return Poll::Ready(None);
          }
          match this.fold(item) {
            Step::Emit(average) => {
              // A projection may have cancelled the subscription.
              if this.shared.state().is_terminal() {
                return Poll::Ready(None);
              }
              return Poll::Ready(Some(Ok(average)));
            }
            Step::Absorbed | Step::Skipped => {
              absorbed += 1;
              if absorbed == ABSORB_BUDGET {
                cx.waker().wake_by_ref();
                return Poll::Pending;
              }
            }
            Step::Failed(error) => {
              if !this.shared.finish(SubscriptionState::Errored) {
                return Poll::Ready(None);
              }
              return Poll::Ready(Some(Err(error)));
            }
          }
        }
      }
    }
  }
}

impl<T> FusedStream for WeightedAverageStream<T> {
  fn is_terminated(&self) -> bool {
    self.shared.state().is_terminal()
  }
}

impl<T> Drop for WeightedAverageStream<T> {
  fn drop(&mut self) {
    if self.shared.finish(SubscriptionState::Cancelled) {
      debug!(component = %self.shared.component.name, "stream dropped before completion");
    }
  }
}
