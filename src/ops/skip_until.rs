use std::sync::{
  atomic::{AtomicBool, Ordering},
  Arc,
};

use crate::{
  error::RxError,
  observable::Observable,
  observer::Observer,
  subscriber::Subscriber,
  subscription::{Subscription, SubscriptionLike},
};

/// Drops source values until `notifier` emits, then mirrors the source.
/// The notifier is released after its first value.
#[derive(Clone)]
pub struct SkipUntilOp<S, N> {
  pub(crate) source: S,
  pub(crate) notifier: N,
}

impl<S: Observable, N: Observable> Observable for SkipUntilOp<S, N> {
  type Item = S::Item;

  fn actual_subscribe<O>(self, observer: O) -> Subscription
  where
    O: Observer<S::Item> + 'static,
  {
    let subscription = Subscription::new();
    let downstream = Subscriber::new(observer, subscription.clone());
    let open = Arc::new(AtomicBool::new(false));

    let notifier_subscription = Subscription::new();
    let notifier = SkipUntilNotifierObserver {
      downstream: downstream.clone(),
      open: open.clone(),
      own: notifier_subscription.clone(),
    };
    notifier_subscription.add(self.notifier.actual_subscribe(notifier));
    subscription.add(notifier_subscription);

    if !subscription.is_closed() {
      subscription.add(self.source.actual_subscribe(SkipUntilObserver { downstream, open }));
    }
    subscription
  }
}

pub struct SkipUntilObserver<Item> {
  downstream: Subscriber<Item>,
  open: Arc<AtomicBool>,
}

impl<Item: Send + 'static> Observer<Item> for SkipUntilObserver<Item> {
  fn next(&mut self, value: Item) {
    if self.open.load(Ordering::Acquire) {
      self.downstream.next(value)
    }
  }

  fn error(&mut self, err: RxError) { self.downstream.error(err) }

  fn complete(&mut self) { self.downstream.complete() }

  fn is_closed(&self) -> bool { Observer::is_closed(&self.downstream) }
}

pub struct SkipUntilNotifierObserver<Item> {
  downstream: Subscriber<Item>,
  open: Arc<AtomicBool>,
  own: Subscription,
}

impl<Item: Send + 'static, N> Observer<N> for SkipUntilNotifierObserver<Item> {
  fn next(&mut self, _: N) {
    self.open.store(true, Ordering::Release);
    self.own.unsubscribe();
  }

  fn error(&mut self, err: RxError) { self.downstream.error(err) }

  fn complete(&mut self) {}

  fn is_closed(&self) -> bool { self.own.is_closed() }
}

#[cfg(test)]
mod tests {
  use crate::prelude::*;
  use std::sync::{Arc, Mutex};

  #[test]
  fn opens_on_notify() {
    let out = Arc::new(Mutex::new(vec![]));
    let c_out = out.clone();
    let mut source = PublishSubject::<i32>::new();
    let mut notifier = PublishSubject::<()>::new();
    source.clone().skip_until(notifier.clone()).subscribe(move |v| c_out.lock().unwrap().push(v));
    source.next(1);
    notifier.next(());
    assert_eq!(notifier.observer_count(), 0);
    source.next(2);
    source.next(3);
    assert_eq!(*out.lock().unwrap(), vec![2, 3]);
  }
}
