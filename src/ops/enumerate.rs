use crate::{
  error::RxError,
  observable::Observable,
  observer::Observer,
  subscription::Subscription,
};

/// Pairs every element with its zero-based index.
#[derive(Clone)]
pub struct EnumerateOp<S> {
  pub(crate) source: S,
}

impl<S: Observable> Observable for EnumerateOp<S> {
  type Item = (usize, S::Item);

  fn actual_subscribe<O>(self, observer: O) -> Subscription
  where
    O: Observer<Self::Item> + 'static,
  {
    self.source.actual_subscribe(EnumerateObserver { observer, index: 0 })
  }
}

pub struct EnumerateObserver<O> {
  observer: O,
  index: usize,
}

impl<Item, O: Observer<(usize, Item)>> Observer<Item> for EnumerateObserver<O> {
  fn next(&mut self, value: Item) {
    let index = self.index;
    self.index += 1;
    self.observer.next((index, value));
  }

  fn error(&mut self, err: RxError) { self.observer.error(err) }

  fn complete(&mut self) { self.observer.complete() }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}
