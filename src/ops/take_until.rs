use crate::{
  error::RxError,
  observable::Observable,
  observer::Observer,
  subscriber::Subscriber,
  subscription::{Subscription, SubscriptionLike},
};

/// Mirrors the source until `notifier` emits its first value, then
/// completes. An error from the notifier ends the stream with that error;
/// a notifier that completes silently has no effect.
#[derive(Clone)]
pub struct TakeUntilOp<S, N> {
  pub(crate) source: S,
  pub(crate) notifier: N,
}

impl<S: Observable, N: Observable> Observable for TakeUntilOp<S, N> {
  type Item = S::Item;

  fn actual_subscribe<O>(self, observer: O) -> Subscription
  where
    O: Observer<S::Item> + 'static,
  {
    let subscription = Subscription::new();
    let downstream = Subscriber::new(observer, subscription.clone());
    let notifier = self.notifier.actual_subscribe(TakeUntilNotifierObserver(downstream.clone()));
    subscription.add(notifier);
    if !subscription.is_closed() {
      subscription.add(self.source.actual_subscribe(downstream));
    }
    subscription
  }
}

pub struct TakeUntilNotifierObserver<Item>(Subscriber<Item>);

impl<Item: Send + 'static, N> Observer<N> for TakeUntilNotifierObserver<Item> {
  fn next(&mut self, _: N) { self.0.complete() }

  fn error(&mut self, err: RxError) { self.0.error(err) }

  fn complete(&mut self) {}

  fn is_closed(&self) -> bool { Observer::is_closed(&self.0) }
}

#[cfg(test)]
mod tests {
  use crate::prelude::*;
  use std::sync::{Arc, Mutex};

  #[test]
  fn completes_on_notify() {
    let events = Arc::new(Mutex::new(vec![]));
    let c_events = events.clone();
    let mut source = PublishSubject::<i32>::new();
    let mut notifier = PublishSubject::<()>::new();
    source.clone().take_until(notifier.clone()).subscribe_event(move |e| {
      c_events.lock().unwrap().push(e);
    });
    source.next(1);
    source.next(2);
    notifier.next(());
    source.next(3);
    assert_eq!(*events.lock().unwrap(), vec![Event::Next(1), Event::Next(2), Event::Completed]);
    assert_eq!(source.observer_count(), 0);
    assert_eq!(notifier.observer_count(), 0);
  }

  #[test]
  fn notifier_completion_is_ignored() {
    let out = Arc::new(Mutex::new(vec![]));
    let c_out = out.clone();
    observable::from_iter(0..3)
      .take_until(observable::empty::<()>())
      .subscribe(move |v| c_out.lock().unwrap().push(v));
    assert_eq!(*out.lock().unwrap(), vec![0, 1, 2]);
  }
}
