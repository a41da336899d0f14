use crate::{
  error::RxError,
  observable::Observable,
  observer::Observer,
  subscription::Subscription,
};

/// Emits only the first `count` values emitted by the source, then
/// completes whether or not the source has.
///
/// # Example
///
/// ```
/// use rxstream::prelude::*;
///
/// observable::from_iter(0..10).take(5).subscribe(|v| println!("{}", v));
///
/// // print logs:
/// // 0
/// // 1
/// // 2
/// // 3
/// // 4
/// ```
#[derive(Clone)]
pub struct TakeOp<S> {
  pub(crate) source: S,
  pub(crate) count: usize,
}

impl<S: Observable> Observable for TakeOp<S> {
  type Item = S::Item;

  fn actual_subscribe<O>(self, mut observer: O) -> Subscription
  where
    O: Observer<S::Item> + 'static,
  {
    if self.count == 0 {
      observer.complete();
      return Subscription::empty();
    }
    self.source.actual_subscribe(TakeObserver { observer, remaining: self.count })
  }
}

pub struct TakeObserver<O> {
  observer: O,
  remaining: usize,
}

impl<Item, O: Observer<Item>> Observer<Item> for TakeObserver<O> {
  fn next(&mut self, value: Item) {
    if self.remaining > 0 {
      self.remaining -= 1;
      self.observer.next(value);
      if self.remaining == 0 {
        self.observer.complete();
      }
    }
  }

  fn error(&mut self, err: RxError) {
    if self.remaining > 0 {
      self.observer.error(err)
    }
  }

  fn complete(&mut self) {
    if self.remaining > 0 {
      self.remaining = 0;
      self.observer.complete()
    }
  }

  fn is_closed(&self) -> bool { self.remaining == 0 || self.observer.is_closed() }
}

#[cfg(test)]
mod tests {
  use crate::prelude::*;
  use std::sync::{Arc, Mutex};

  #[test]
  fn base_function() {
    let events = Arc::new(Mutex::new(vec![]));
    let c_events = events.clone();
    observable::from_iter(0..100).take(5).subscribe_event(move |e| c_events.lock().unwrap().push(e));
    let events = events.lock().unwrap();
    assert_eq!(events.len(), 6);
    assert_eq!(events.last(), Some(&Event::Completed));
  }

  #[test]
  fn stops_infinite_interval() {
    TestScheduler::init();
    let out = Arc::new(Mutex::new(vec![]));
    let c_out = out.clone();
    let subscription = observable::interval(Duration::from_millis(1), TestScheduler)
      .take(3)
      .subscribe(move |v| c_out.lock().unwrap().push(v));
    TestScheduler::advance_by(Duration::from_millis(10));
    assert_eq!(*out.lock().unwrap(), vec![0, 1, 2]);
    assert!(subscription.is_closed());
    assert_eq!(TestScheduler::pending_count(), 0);
  }

  #[test]
  fn take_zero_completes_immediately() {
    let completed = Arc::new(Mutex::new(false));
    let c_completed = completed.clone();
    observable::never::<i32>().take(0).subscribe_all(
      |_| {},
      |_| {},
      move || *c_completed.lock().unwrap() = true,
    );
    assert!(*completed.lock().unwrap());
  }
}
