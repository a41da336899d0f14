use crate::{
  observable::Observable,
  observer::Observer,
  subscription::Subscription,
};

/// Emits a single value, then completes.
#[derive(Clone)]
pub struct Of<Item>(Item);

/// Creates an observable producing a single value.
///
/// # Example
///
/// ```rust
/// use rxstream::prelude::*;
///
/// observable::of(123).subscribe(|v| assert_eq!(v, 123));
/// ```
pub fn of<Item>(v: Item) -> Of<Item>
where
  Item: Clone + Send + 'static,
{
  Of(v)
}

/// Alias of [`of`].
#[inline]
pub fn just<Item>(v: Item) -> Of<Item>
where
  Item: Clone + Send + 'static,
{
  of(v)
}

impl<Item> Observable for Of<Item>
where
  Item: Clone + Send + 'static,
{
  type Item = Item;

  fn actual_subscribe<O>(self, mut observer: O) -> Subscription
  where
    O: Observer<Item> + 'static,
  {
    if !observer.is_closed() {
      observer.next(self.0);
    }
    if !observer.is_closed() {
      observer.complete();
    }
    Subscription::empty()
  }
}

#[cfg(test)]
mod tests {
  use crate::prelude::*;
  use std::sync::{Arc, Mutex};

  #[test]
  fn emits_then_completes() {
    let events = Arc::new(Mutex::new(vec![]));
    let c_events = events.clone();
    observable::of(100).subscribe_event(move |e| c_events.lock().unwrap().push(e));
    assert_eq!(*events.lock().unwrap(), vec![Event::Next(100), Event::Completed]);
  }

  #[test]
  fn every_subscription_runs_again() {
    let hits = Arc::new(Mutex::new(0));
    let source = observable::just("🔴");
    for _ in 0..3 {
      let hits = hits.clone();
      source.clone().subscribe(move |_| *hits.lock().unwrap() += 1);
    }
    assert_eq!(*hits.lock().unwrap(), 3);
  }
}
