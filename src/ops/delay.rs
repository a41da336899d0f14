use std::time::Duration;

use crate::{
  error::RxError,
  observable::Observable,
  observer::Observer,
  scheduler::Scheduler,
  subscriber::Subscriber,
  subscription::Subscription,
};

/// Shifts every value, and the completion, by `delay` on `scheduler`.
/// Errors are forwarded immediately and drop values still in flight.
#[derive(Clone)]
pub struct DelayOp<S, Sch> {
  pub(crate) source: S,
  pub(crate) delay: Duration,
  pub(crate) scheduler: Sch,
}

impl<S: Observable, Sch: Scheduler> Observable for DelayOp<S, Sch> {
  type Item = S::Item;

  fn actual_subscribe<O>(self, observer: O) -> Subscription
  where
    O: Observer<S::Item> + 'static,
  {
    let subscription = Subscription::new();
    let observer = DelayObserver {
      downstream: Subscriber::new(observer, subscription.clone()),
      delay: self.delay,
      scheduler: self.scheduler,
      subscription: subscription.clone(),
    };
    subscription.add(self.source.actual_subscribe(observer));
    subscription
  }
}

pub struct DelayObserver<Item, Sch> {
  downstream: Subscriber<Item>,
  delay: Duration,
  scheduler: Sch,
  subscription: Subscription,
}

impl<Item: Send + 'static, Sch: Scheduler> Observer<Item> for DelayObserver<Item, Sch> {
  fn next(&mut self, value: Item) {
    let mut downstream = self.downstream.clone();
    let handle = self.scheduler.schedule(self.delay, move || downstream.next(value));
    self.subscription.add(handle);
  }

  fn error(&mut self, err: RxError) { self.downstream.error(err) }

  fn complete(&mut self) {
    let mut downstream = self.downstream.clone();
    let handle = self.scheduler.schedule(self.delay, move || downstream.complete());
    self.subscription.add(handle);
  }

  fn is_closed(&self) -> bool { Observer::is_closed(&self.downstream) }
}

#[cfg(test)]
mod tests {
  use crate::prelude::*;
  use std::sync::{Arc, Mutex};

  #[test]
  fn shifts_values_and_completion() {
    TestScheduler::init();
    let events = Arc::new(Mutex::new(vec![]));
    let c_events = events.clone();
    observable::from_iter(vec![1, 2])
      .delay(Duration::from_millis(50), TestScheduler)
      .subscribe_event(move |e| c_events.lock().unwrap().push(e));
    TestScheduler::advance_by(Duration::from_millis(49));
    assert!(events.lock().unwrap().is_empty());
    TestScheduler::advance_by(Duration::from_millis(1));
    assert_eq!(*events.lock().unwrap(), vec![Event::Next(1), Event::Next(2), Event::Completed]);
  }

  #[test]
  fn errors_are_not_delayed() {
    TestScheduler::init();
    let events = Arc::new(Mutex::new(vec![]));
    let c_events = events.clone();
    observable::of(1)
      .concat(observable::throw_err(RxError::EmptySequence))
      .delay(Duration::from_millis(50), TestScheduler)
      .subscribe_event(move |e| c_events.lock().unwrap().push(e));
    assert_eq!(*events.lock().unwrap(), vec![Event::Error(RxError::EmptySequence)]);
    TestScheduler::flush();
    assert_eq!(*events.lock().unwrap(), vec![Event::Error(RxError::EmptySequence)]);
  }

  #[test]
  fn cancel_drops_pending_values() {
    TestScheduler::init();
    let out = Arc::new(Mutex::new(vec![]));
    let c_out = out.clone();
    let subscription = observable::from_iter(0..3)
      .delay(Duration::from_millis(10), TestScheduler)
      .subscribe(move |v| c_out.lock().unwrap().push(v));
    subscription.unsubscribe();
    TestScheduler::flush();
    assert!(out.lock().unwrap().is_empty());
  }
}
