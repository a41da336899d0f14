use std::collections::VecDeque;

use crate::{
  error::RxError,
  observable::Observable,
  observer::Observer,
  subscription::Subscription,
};

/// Emits the last `count` elements once the source completes.
#[derive(Clone)]
pub struct TakeLastOp<S> {
  pub(crate) source: S,
  pub(crate) count: usize,
}

impl<S: Observable> Observable for TakeLastOp<S> {
  type Item = S::Item;

  fn actual_subscribe<O>(self, observer: O) -> Subscription
  where
    O: Observer<S::Item> + 'static,
  {
    let observer = TakeLastObserver { observer, count: self.count, queue: VecDeque::new() };
    self.source.actual_subscribe(observer)
  }
}

pub struct TakeLastObserver<O, Item> {
  observer: O,
  count: usize,
  queue: VecDeque<Item>,
}

impl<Item: Send, O: Observer<Item>> Observer<Item> for TakeLastObserver<O, Item> {
  fn next(&mut self, value: Item) {
    if self.count == 0 {
      return;
    }
    if self.queue.len() == self.count {
      self.queue.pop_front();
    }
    self.queue.push_back(value);
  }

  fn error(&mut self, err: RxError) { self.observer.error(err) }

  fn complete(&mut self) {
    for v in self.queue.drain(..) {
      self.observer.next(v);
    }
    self.observer.complete();
  }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}
