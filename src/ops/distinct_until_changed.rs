use crate::{
  error::RxError,
  observable::Observable,
  observer::Observer,
  subscription::Subscription,
};

/// Drops an element if it equals the one emitted right before it.
#[derive(Clone)]
pub struct DistinctUntilChangedOp<S> {
  pub(crate) source: S,
}

impl<S> Observable for DistinctUntilChangedOp<S>
where
  S: Observable,
  S::Item: PartialEq + Clone,
{
  type Item = S::Item;

  fn actual_subscribe<O>(self, observer: O) -> Subscription
  where
    O: Observer<S::Item> + 'static,
  {
    self.source.actual_subscribe(DistinctUntilChangedObserver { observer, last: None })
  }
}

pub struct DistinctUntilChangedObserver<O, Item> {
  observer: O,
  last: Option<Item>,
}

impl<O, Item> Observer<Item> for DistinctUntilChangedObserver<O, Item>
where
  O: Observer<Item>,
  Item: PartialEq + Clone + Send,
{
  fn next(&mut self, value: Item) {
    if self.last.as_ref() != Some(&value) {
      self.last = Some(value.clone());
      self.observer.next(value);
    }
  }

  fn error(&mut self, err: RxError) { self.observer.error(err) }

  fn complete(&mut self) { self.observer.complete() }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

#[cfg(test)]
mod tests {
  use crate::prelude::*;
  use std::sync::{Arc, Mutex};

  #[test]
  fn drops_consecutive_duplicates() {
    let out = Arc::new(Mutex::new(vec![]));
    let c_out = out.clone();
    observable::from_iter(vec!["🐱", "🐷", "🐱", "🐱", "🐱", "🐵", "🐱"])
      .distinct_until_changed()
      .subscribe(move |v| c_out.lock().unwrap().push(v));
    assert_eq!(*out.lock().unwrap(), vec!["🐱", "🐷", "🐱", "🐵", "🐱"]);
  }
}
