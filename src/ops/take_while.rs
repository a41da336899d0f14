use crate::{
  error::RxError,
  observable::Observable,
  observer::Observer,
  subscription::Subscription,
};

/// Emits values while `predicate` holds. The first value failing it
/// completes the stream; it is never tested again.
#[derive(Clone)]
pub struct TakeWhileOp<S, F> {
  pub(crate) source: S,
  pub(crate) predicate: F,
}

impl<S, F> Observable for TakeWhileOp<S, F>
where
  S: Observable,
  F: FnMut(&S::Item) -> bool + Clone + Send + 'static,
{
  type Item = S::Item;

  fn actual_subscribe<O>(self, observer: O) -> Subscription
  where
    O: Observer<S::Item> + 'static,
  {
    let observer = TakeWhileObserver { observer, predicate: self.predicate, done: false };
    self.source.actual_subscribe(observer)
  }
}

pub struct TakeWhileObserver<O, F> {
  observer: O,
  predicate: F,
  done: bool,
}

impl<Item, O, F> Observer<Item> for TakeWhileObserver<O, F>
where
  O: Observer<Item>,
  F: FnMut(&Item) -> bool + Send,
{
  fn next(&mut self, value: Item) {
    if self.done {
      return;
    }
    if (self.predicate)(&value) {
      self.observer.next(value);
    } else {
      self.done = true;
      self.observer.complete();
    }
  }

  fn error(&mut self, err: RxError) {
    if !self.done {
      self.observer.error(err)
    }
  }

  fn complete(&mut self) {
    if !self.done {
      self.done = true;
      self.observer.complete()
    }
  }

  fn is_closed(&self) -> bool { self.done || self.observer.is_closed() }
}
