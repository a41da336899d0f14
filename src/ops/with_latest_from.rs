use crate::{
  error::RxError,
  observable::Observable,
  observer::Observer,
  rc::MutArc,
  subscriber::Subscriber,
  subscription::{Subscription, SubscriptionLike},
};

/// Samples the latest element of `other` each time the source emits.
///
/// Only the source drives emission and completion; `other` completing is
/// ignored, but its errors end the stream.
#[derive(Clone)]
pub struct WithLatestFromOp<S, L> {
  pub(crate) source: S,
  pub(crate) other: L,
}

impl<S, L> Observable for WithLatestFromOp<S, L>
where
  S: Observable,
  L: Observable,
  L::Item: Clone,
{
  type Item = (S::Item, L::Item);

  fn actual_subscribe<O>(self, observer: O) -> Subscription
  where
    O: Observer<Self::Item> + 'static,
  {
    let subscription = Subscription::new();
    let downstream = Subscriber::new(observer, subscription.clone());
    let latest = MutArc::own(None);
    let secondary = WithLatestFromOtherObserver { downstream: downstream.clone(), latest: latest.clone() };
    subscription.add(self.other.actual_subscribe(secondary));
    if !subscription.is_closed() {
      subscription.add(self.source.actual_subscribe(WithLatestFromObserver { downstream, latest }));
    }
    subscription
  }
}

pub struct WithLatestFromObserver<A, B> {
  downstream: Subscriber<(A, B)>,
  latest: MutArc<Option<B>>,
}

impl<A, B> Observer<A> for WithLatestFromObserver<A, B>
where
  A: Send + 'static,
  B: Clone + Send + 'static,
{
  fn next(&mut self, value: A) {
    let latest = self.latest.rc_deref_mut().clone();
    if let Some(b) = latest {
      self.downstream.next((value, b));
    }
  }

  fn error(&mut self, err: RxError) { self.downstream.error(err) }

  fn complete(&mut self) { self.downstream.complete() }

  fn is_closed(&self) -> bool { Observer::is_closed(&self.downstream) }
}

pub struct WithLatestFromOtherObserver<A, B> {
  downstream: Subscriber<(A, B)>,
  latest: MutArc<Option<B>>,
}

impl<A, B> Observer<B> for WithLatestFromOtherObserver<A, B>
where
  A: Send + 'static,
  B: Send + 'static,
{
  fn next(&mut self, value: B) { *self.latest.rc_deref_mut() = Some(value); }

  fn error(&mut self, err: RxError) { self.downstream.error(err) }

  fn complete(&mut self) {}

  fn is_closed(&self) -> bool { Observer::is_closed(&self.downstream) }
}

#[cfg(test)]
mod tests {
  use crate::prelude::*;
  use std::sync::{Arc, Mutex};

  #[test]
  fn drops_until_other_emits() {
    let out = Arc::new(Mutex::new(vec![]));
    let c_out = out.clone();
    let mut primary = PublishSubject::<i32>::new();
    let mut secondary = PublishSubject::<&str>::new();
    primary.clone().with_latest_from(secondary.clone()).subscribe(move |v| c_out.lock().unwrap().push(v));
    primary.next(1);
    secondary.next("a");
    primary.next(2);
    secondary.next("b");
    secondary.next("c");
    primary.next(3);
    secondary.complete();
    primary.next(4);
    assert_eq!(*out.lock().unwrap(), vec![(2, "a"), (3, "c"), (4, "c")]);
  }

  #[test]
  fn other_error_ends_stream() {
    let events = Arc::new(Mutex::new(vec![]));
    let c_events = events.clone();
    let mut primary = PublishSubject::<i32>::new();
    let mut secondary = PublishSubject::<i32>::new();
    primary.clone().with_latest_from(secondary.clone()).subscribe_event(move |e| c_events.lock().unwrap().push(e));
    secondary.error(RxError::EmptySequence);
    primary.next(1);
    assert_eq!(*events.lock().unwrap(), vec![Event::Error(RxError::EmptySequence)]);
    assert_eq!(primary.observer_count(), 0);
  }
}
