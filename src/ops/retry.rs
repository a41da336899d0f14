//! Resubscribing to a source when it errors.
//!
//! How often to try again is decided by a [`RetryPolicy`]. A plain `usize`
//! is the total number of attempts, so `retry(3)` runs the production at
//! most three times and then delivers the last error. [`RetryConfig`]
//! builds the common policies:
//!
//! ```rust
//! use rxstream::{ops::retry::RetryConfig, prelude::*};
//! use std::sync::{Arc, Mutex};
//!
//! let attempts = Arc::new(Mutex::new(0));
//! let c_attempts = attempts.clone();
//! let source = observable::defer(move || {
//!   let mut n = c_attempts.lock().unwrap();
//!   *n += 1;
//!   if *n < 3 {
//!     observable::throw_err(RxError::msg("flaky")).box_it()
//!   } else {
//!     observable::of(*n).box_it()
//!   }
//! });
//!
//! let out = Arc::new(Mutex::new(vec![]));
//! let c_out = out.clone();
//! source
//!   .retry(RetryConfig::new().max_attempts(5))
//!   .subscribe(move |v| c_out.lock().unwrap().push(v));
//! assert_eq!(*out.lock().unwrap(), vec![3]);
//! ```
//!
//! A policy can also look at the error:
//!
//! ```rust
//! use rxstream::{ops::retry::RetryPolicy, prelude::*};
//!
//! #[derive(Clone)]
//! struct OnlyUpstream;
//!
//! impl RetryPolicy for OnlyUpstream {
//!   fn should_retry(&self, err: &RxError, attempt: usize) -> bool {
//!     err.is_upstream() && attempt < 2
//!   }
//! }
//!
//! observable::throw_err::<i32>(RxError::EmptySequence)
//!   .retry(OnlyUpstream)
//!   .subscribe(|_| {});
//! ```
use crate::{
  error::RxError,
  observable::Observable,
  observer::Observer,
  rc::MutArc,
  subscriber::Subscriber,
  subscription::{Subscription, SubscriptionLike},
};

/// Decides whether a failed attempt is followed by another one.
pub trait RetryPolicy: Clone + Send + 'static {
  /// `attempt` counts the retries already made: `0` on the first error.
  fn should_retry(&self, err: &RxError, attempt: usize) -> bool;

  /// Whether a successfully emitted value resets the retry counter.
  fn reset_on_success(&self) -> bool { false }
}

impl RetryPolicy for usize {
  fn should_retry(&self, _: &RxError, attempt: usize) -> bool { attempt + 1 < *self }
}

/// Builder for the usual retry policies. `RetryConfig::new()` retries
/// forever.
#[derive(Debug, Clone, Default)]
pub struct RetryConfig {
  max_attempts: Option<usize>,
  reset_on_success: bool,
}

impl RetryConfig {
  pub fn new() -> Self { Self::default() }

  /// Limit the total number of attempts, the first one included.
  pub fn max_attempts(mut self, attempts: usize) -> Self {
    self.max_attempts = Some(attempts);
    self
  }

  /// Start counting from zero again whenever the source emits a value.
  pub fn reset_on_success(mut self) -> Self {
    self.reset_on_success = true;
    self
  }
}

impl RetryPolicy for RetryConfig {
  fn should_retry(&self, err: &RxError, attempt: usize) -> bool {
    self.max_attempts.map_or(true, |max| max.should_retry(err, attempt))
  }

  fn reset_on_success(&self) -> bool { self.reset_on_success }
}

#[derive(Clone)]
pub struct RetryOp<S, P> {
  pub(crate) source: S,
  pub(crate) policy: P,
}

impl<S: Observable, P: RetryPolicy> Observable for RetryOp<S, P> {
  type Item = S::Item;

  fn actual_subscribe<O>(self, observer: O) -> Subscription
  where
    O: Observer<S::Item> + 'static,
  {
    let subscription = Subscription::new();
    let ctx = RetryCtx {
      source: self.source,
      policy: self.policy,
      downstream: Subscriber::new(observer, subscription.clone()),
      state: MutArc::own(RetryState { attempts: 0, subscribing: false, again: false }),
      subscription: subscription.clone(),
    };
    ctx.run();
    subscription
  }
}

struct RetryState {
  attempts: usize,
  subscribing: bool,
  again: bool,
}

struct RetryCtx<S: Observable, P> {
  source: S,
  policy: P,
  downstream: Subscriber<S::Item>,
  state: MutArc<RetryState>,
  subscription: Subscription,
}

impl<S: Observable, P: Clone> Clone for RetryCtx<S, P> {
  fn clone(&self) -> Self {
    RetryCtx {
      source: self.source.clone(),
      policy: self.policy.clone(),
      downstream: self.downstream.clone(),
      state: self.state.clone(),
      subscription: self.subscription.clone(),
    }
  }
}

impl<S: Observable, P: RetryPolicy> RetryCtx<S, P> {
  /// Subscribe to the source, looping instead of recursing when an attempt
  /// fails while it is still being subscribed.
  fn run(&self) {
    loop {
      {
        let mut state = self.state.rc_deref_mut();
        state.subscribing = true;
        state.again = false;
      }
      if self.subscription.is_closed() || Observer::is_closed(&self.downstream) {
        return;
      }
      let own = Subscription::new();
      self.subscription.add(own.clone());
      let observer = RetryObserver { ctx: self.clone(), own: own.clone() };
      own.add(self.source.clone().actual_subscribe(observer));

      let mut state = self.state.rc_deref_mut();
      state.subscribing = false;
      if !state.again {
        return;
      }
    }
  }
}

pub struct RetryObserver<S: Observable, P> {
  ctx: RetryCtx<S, P>,
  own: Subscription,
}

impl<S: Observable, P: RetryPolicy> Observer<S::Item> for RetryObserver<S, P> {
  fn next(&mut self, value: S::Item) {
    if self.ctx.policy.reset_on_success() {
      self.ctx.state.rc_deref_mut().attempts = 0;
    }
    self.ctx.downstream.next(value)
  }

  fn error(&mut self, err: RxError) {
    let resubscribe_now = {
      let mut state = self.ctx.state.rc_deref_mut();
      if !self.ctx.policy.should_retry(&err, state.attempts) {
        None
      } else {
        state.attempts += 1;
        tracing::debug!(attempt = state.attempts, error = %err, "retrying source");
        if state.subscribing {
          state.again = true;
          Some(false)
        } else {
          Some(true)
        }
      }
    };
    match resubscribe_now {
      None => self.ctx.downstream.error(err),
      Some(now) => {
        self.own.unsubscribe();
        if now {
          self.ctx.run();
        }
      }
    }
  }

  fn complete(&mut self) { self.ctx.downstream.complete() }

  fn is_closed(&self) -> bool { self.own.is_closed() || Observer::is_closed(&self.ctx.downstream) }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::prelude::*;
  use std::sync::{Arc, Mutex};

  fn failing(runs: Arc<Mutex<usize>>) -> impl Observable<Item = i32> {
    observable::create(move |mut subscriber: Subscriber<i32>| {
      *runs.lock().unwrap() += 1;
      subscriber.next(1);
      subscriber.error(RxError::msg("always"));
      Subscription::empty()
    })
  }

  #[test]
  fn retry_n_is_total_attempts() {
    let runs = Arc::new(Mutex::new(0));
    let events = Arc::new(Mutex::new(vec![]));
    let c_events = events.clone();
    failing(runs.clone()).retry(3).subscribe_event(move |e| c_events.lock().unwrap().push(e));
    assert_eq!(*runs.lock().unwrap(), 3);
    assert_eq!(
      *events.lock().unwrap(),
      vec![
        Event::Next(1),
        Event::Next(1),
        Event::Next(1),
        Event::Error(RxError::msg("always"))
      ]
    );
  }

  #[test]
  fn succeeds_eventually() {
    let runs = Arc::new(Mutex::new(0));
    let c_runs = runs.clone();
    let source = observable::create(move |mut subscriber: Subscriber<i32>| {
      let run = {
        let mut runs = c_runs.lock().unwrap();
        *runs += 1;
        *runs
      };
      if run < 4 {
        subscriber.error(RxError::msg("not yet"));
      } else {
        subscriber.next(run);
        subscriber.complete();
      }
      Subscription::empty()
    });
    let events = Arc::new(Mutex::new(vec![]));
    let c_events = events.clone();
    source.retry_forever().subscribe_event(move |e| c_events.lock().unwrap().push(e));
    assert_eq!(*events.lock().unwrap(), vec![Event::Next(4), Event::Completed]);
  }

  #[test]
  fn reset_on_success_restarts_the_count() {
    let runs = Arc::new(Mutex::new(0));
    failing(runs.clone())
      .retry(RetryConfig::new().max_attempts(2).reset_on_success())
      .take(5)
      .subscribe(|_| {});
    assert_eq!(*runs.lock().unwrap(), 5);

    let runs = Arc::new(Mutex::new(0));
    failing(runs.clone()).retry(RetryConfig::new().max_attempts(2)).subscribe_all(
      |_| {},
      |_| {},
      || {},
    );
    assert_eq!(*runs.lock().unwrap(), 2);
  }

  #[test]
  fn unsubscribe_stops_retrying() {
    TestScheduler::init();
    let runs = Arc::new(Mutex::new(0));
    let c_runs = runs.clone();
    let source = observable::defer(move || {
      *c_runs.lock().unwrap() += 1;
      observable::timer(Duration::from_millis(10), TestScheduler)
        .try_map(|_| Err::<i32, _>(anyhow::anyhow!("late failure")))
    });
    let subscription = source.retry_forever().subscribe(|_| {});
    TestScheduler::advance_by(Duration::from_millis(25));
    assert_eq!(*runs.lock().unwrap(), 3);
    subscription.unsubscribe();
    TestScheduler::flush();
    assert_eq!(*runs.lock().unwrap(), 3);
  }
}
