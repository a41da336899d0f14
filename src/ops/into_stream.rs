//! Pulling a stream from async code.
//!
//! ```rust
//! use futures::{executor::block_on, StreamExt};
//! use rxstream::prelude::*;
//!
//! let values: Vec<_> = block_on(observable::from_iter(1..4).values().collect());
//! assert_eq!(values, vec![Ok(1), Ok(2), Ok(3)]);
//! ```
use std::{
  collections::VecDeque,
  pin::Pin,
  task::{Context, Poll, Waker},
};

use futures::Stream;

use crate::{
  error::RxError,
  observable::{Observable, ObservableExt},
  observer::Observer,
  rc::MutArc,
  subscription::{Subscription, SubscriptionLike},
};

struct StreamState<T> {
  queue: VecDeque<Result<T, RxError>>,
  waker: Option<Waker>,
  closed: bool,
}

impl<T> StreamState<T> {
  fn wake(&mut self) {
    if let Some(waker) = self.waker.take() {
      waker.wake();
    }
  }
}

/// A `futures::Stream` of the elements of an observable.
///
/// Yields `Ok` for every element, then ends on completion. An error is
/// yielded once as `Err` and ends the stream. The source is subscribed when
/// the stream is created; dropping the stream cancels that subscription.
pub struct ObservableStream<T> {
  state: MutArc<StreamState<T>>,
  subscription: Subscription,
}

impl<T: Send + 'static> ObservableStream<T> {
  pub fn new<S: Observable<Item = T>>(source: S) -> Self {
    let state = MutArc::own(StreamState { queue: VecDeque::new(), waker: None, closed: false });
    let subscription = source.subscribe_with(StreamObserver { state: state.clone() });
    ObservableStream { state, subscription }
  }
}

impl<T> Stream for ObservableStream<T> {
  type Item = Result<T, RxError>;

  fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
    let mut state = self.state.rc_deref_mut();
    if let Some(item) = state.queue.pop_front() {
      return Poll::Ready(Some(item));
    }
    if state.closed {
      return Poll::Ready(None);
    }
    state.waker = Some(cx.waker().clone());
    Poll::Pending
  }
}

impl<T> Drop for ObservableStream<T> {
  fn drop(&mut self) { self.subscription.unsubscribe() }
}

struct StreamObserver<T> {
  state: MutArc<StreamState<T>>,
}

impl<T: Send> Observer<T> for StreamObserver<T> {
  fn next(&mut self, value: T) {
    let mut state = self.state.rc_deref_mut();
    state.queue.push_back(Ok(value));
    state.wake();
  }

  fn error(&mut self, err: RxError) {
    let mut state = self.state.rc_deref_mut();
    state.queue.push_back(Err(err));
    state.closed = true;
    state.wake();
  }

  fn complete(&mut self) {
    let mut state = self.state.rc_deref_mut();
    state.closed = true;
    state.wake();
  }

  fn is_closed(&self) -> bool { self.state.rc_deref_mut().closed }
}

#[cfg(test)]
mod tests {
  use crate::prelude::*;
  use futures::{executor::block_on, StreamExt};

  #[test]
  fn yields_error_then_ends() {
    block_on(async {
      let mut stream = observable::of(1).concat(observable::throw_err(RxError::EmptySequence)).values();
      assert_eq!(stream.next().await, Some(Ok(1)));
      assert_eq!(stream.next().await, Some(Err(RxError::EmptySequence)));
      assert_eq!(stream.next().await, None);
    });
  }

  #[tokio::test]
  async fn awaits_values_across_threads() {
    let mut subject = PublishSubject::<i32>::new();
    let mut stream = subject.clone().values();
    let producer = std::thread::spawn(move || {
      for v in 0..3 {
        subject.next(v);
      }
      subject.complete();
    });
    let mut received = vec![];
    while let Some(v) = stream.next().await {
      received.push(v.unwrap());
    }
    producer.join().unwrap();
    assert_eq!(received, vec![0, 1, 2]);
  }

  #[test]
  fn drop_cancels() {
    let subject = PublishSubject::<i32>::new();
    let stream = subject.clone().values();
    assert_eq!(subject.observer_count(), 1);
    drop(stream);
    assert_eq!(subject.observer_count(), 0);
  }
}
