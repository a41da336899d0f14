//! Awaiting a stream's outcome.
//!
//! [`ObservableExt::value`](crate::observable::ObservableExt::value) awaits
//! exactly one element, [`ObservableExt::first_value`](crate::observable::ObservableExt::first_value)
//! at most one element, and
//! [`ObservableExt::completion`](crate::observable::ObservableExt::completion)
//! just the termination.
//!
//! ```rust
//! use futures::executor::block_on;
//! use rxstream::prelude::*;
//!
//! assert_eq!(block_on(observable::of(5).value()), Ok(5));
//! assert_eq!(block_on(observable::empty::<i32>().value()), Err(RxError::EmptySequence));
//! assert_eq!(block_on(observable::of(3).first_value()), Ok(Some(3)));
//! assert_eq!(block_on(observable::from_iter(3..9).first_value()), Err(RxError::TooManyElements));
//! ```
use std::{
  future::Future,
  pin::Pin,
  task::{Context, Poll, Waker},
};

use crate::{
  error::RxError,
  observable::{Observable, ObservableExt},
  observer::Observer,
  rc::MutArc,
  subscription::{Subscription, SubscriptionLike},
};

struct Slot<T> {
  outcome: Option<Result<T, RxError>>,
  waker: Option<Waker>,
  resolved: bool,
}

impl<T> Slot<T> {
  fn resolve(&mut self, outcome: Result<T, RxError>) {
    if self.resolved {
      return;
    }
    self.resolved = true;
    self.outcome = Some(outcome);
    if let Some(waker) = self.waker.take() {
      waker.wake();
    }
  }
}

fn poll_slot<T>(slot: &MutArc<Slot<T>>, cx: &mut Context<'_>) -> Poll<Result<T, RxError>> {
  let mut slot = slot.rc_deref_mut();
  if let Some(outcome) = slot.outcome.take() {
    return Poll::Ready(outcome);
  }
  if slot.resolved {
    return Poll::Ready(Err(RxError::invalid_operation("future polled after completion")));
  }
  slot.waker = Some(cx.waker().clone());
  Poll::Pending
}

fn new_slot<T>() -> MutArc<Slot<T>> { MutArc::own(Slot { outcome: None, waker: None, resolved: false }) }

/// Resolves to the last element of a stream once it completes, or to its
/// error. A stream completing without elements resolves to
/// [`RxError::EmptySequence`].
pub struct ObservableFuture<T> {
  slot: MutArc<Slot<T>>,
  subscription: Subscription,
}

impl<T: Send + 'static> ObservableFuture<T> {
  pub fn new<S: Observable<Item = T>>(source: S) -> Self {
    let slot = new_slot();
    let observer = LastValueObserver { slot: slot.clone(), last: None };
    let subscription = source.subscribe_with(observer);
    ObservableFuture { slot, subscription }
  }
}

impl<T> Future for ObservableFuture<T> {
  type Output = Result<T, RxError>;

  fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> { poll_slot(&self.slot, cx) }
}

impl<T> Drop for ObservableFuture<T> {
  fn drop(&mut self) { self.subscription.unsubscribe() }
}

struct LastValueObserver<T> {
  slot: MutArc<Slot<T>>,
  last: Option<T>,
}

impl<T: Send> Observer<T> for LastValueObserver<T> {
  fn next(&mut self, value: T) { self.last = Some(value); }

  fn error(&mut self, err: RxError) { self.slot.rc_deref_mut().resolve(Err(err)) }

  fn complete(&mut self) {
    let outcome = self.last.take().ok_or(RxError::EmptySequence);
    self.slot.rc_deref_mut().resolve(outcome)
  }

  fn is_closed(&self) -> bool { self.slot.rc_deref_mut().resolved }
}

/// Resolves to the only element of a stream once it completes, `None` if
/// it completes empty, or its error. A second element resolves to
/// [`RxError::TooManyElements`] as soon as it arrives and cancels the source.
pub struct FirstValueFuture<T> {
  slot: MutArc<Slot<Option<T>>>,
  subscription: Subscription,
}

impl<T: Send + 'static> FirstValueFuture<T> {
  pub fn new<S: Observable<Item = T>>(source: S) -> Self {
    let slot = new_slot();
    let subscription = source.subscribe_with(FirstValueObserver { slot: slot.clone(), first: None });
    FirstValueFuture { slot, subscription }
  }
}

impl<T> Future for FirstValueFuture<T> {
  type Output = Result<Option<T>, RxError>;

  fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
    let poll = poll_slot(&self.slot, cx);
    if poll.is_ready() {
      self.subscription.unsubscribe();
    }
    poll
  }
}

impl<T> Drop for FirstValueFuture<T> {
  fn drop(&mut self) { self.subscription.unsubscribe() }
}

struct FirstValueObserver<T> {
  slot: MutArc<Slot<Option<T>>>,
  first: Option<T>,
}

impl<T: Send> Observer<T> for FirstValueObserver<T> {
  fn next(&mut self, value: T) {
    if self.first.is_some() {
      self.first = None;
      self.slot.rc_deref_mut().resolve(Err(RxError::TooManyElements));
    } else {
      self.first = Some(value);
    }
  }

  fn error(&mut self, err: RxError) { self.slot.rc_deref_mut().resolve(Err(err)) }

  fn complete(&mut self) {
    let first = self.first.take();
    self.slot.rc_deref_mut().resolve(Ok(first))
  }

  fn is_closed(&self) -> bool { self.slot.rc_deref_mut().resolved }
}
