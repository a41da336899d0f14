use crate::{
  error::RxError,
  observable::Observable,
  observer::Observer,
  subscription::Subscription,
};

/// Emits the element at `index` and completes, or fails with
/// [`RxError::ElementOutOfRange`] if the source completes first.
#[derive(Clone)]
pub struct ElementAtOp<S> {
  pub(crate) source: S,
  pub(crate) index: usize,
}

impl<S: Observable> Observable for ElementAtOp<S> {
  type Item = S::Item;

  fn actual_subscribe<O>(self, observer: O) -> Subscription
  where
    O: Observer<S::Item> + 'static,
  {
    let observer = ElementAtObserver { observer, index: self.index, seen: 0, done: false };
    self.source.actual_subscribe(observer)
  }
}

pub struct ElementAtObserver<O> {
  observer: O,
  index: usize,
  seen: usize,
  done: bool,
}

impl<Item, O: Observer<Item>> Observer<Item> for ElementAtObserver<O> {
  fn next(&mut self, value: Item) {
    if self.done {
      return;
    }
    if self.seen == self.index {
      self.done = true;
      self.observer.next(value);
      self.observer.complete();
    }
    self.seen += 1;
  }

  fn error(&mut self, err: RxError) {
    if !self.done {
      self.observer.error(err)
    }
  }

  fn complete(&mut self) {
    if !self.done {
      self.done = true;
      self.observer.error(RxError::ElementOutOfRange(self.index));
    }
  }

  fn is_closed(&self) -> bool { self.done || self.observer.is_closed() }
}

#[cfg(test)]
mod tests {
  use crate::prelude::*;
  use std::sync::{Arc, Mutex};

  fn events(source: impl Observable<Item = &'static str>) -> Vec<Event<&'static str>> {
    let events = Arc::new(Mutex::new(vec![]));
    let c_events = events.clone();
    source.subscribe_event(move |e| c_events.lock().unwrap().push(e));
    let out = events.lock().unwrap().clone();
    out
  }

  #[test]
  fn picks_index() {
    let source = observable::from_iter(vec!["🐱", "🐰", "🐶", "🐸", "🐷", "🐵"]);
    assert_eq!(events(source.element_at(3)), vec![Event::Next("🐸"), Event::Completed]);
  }

  #[test]
  fn out_of_range() {
    let source = observable::from_iter(vec!["🐱"]);
    assert_eq!(events(source.element_at(3)), vec![Event::Error(RxError::ElementOutOfRange(3))]);
  }
}
