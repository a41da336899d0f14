use crate::{
  error::RxError,
  observable::Observable,
  observer::Observer,
  subscription::Subscription,
};

/// Expects exactly one element matching `predicate`.
///
/// The match is held back until the source completes. A second match fails
/// the stream with [`RxError::TooManyElements`] right away; completing with
/// no match fails it with [`RxError::EmptySequence`].
#[derive(Clone)]
pub struct SingleOp<S, F> {
  pub(crate) source: S,
  pub(crate) predicate: F,
}

impl<S, F> Observable for SingleOp<S, F>
where
  S: Observable,
  F: FnMut(&S::Item) -> bool + Clone + Send + 'static,
{
  type Item = S::Item;

  fn actual_subscribe<O>(self, observer: O) -> Subscription
  where
    O: Observer<S::Item> + 'static,
  {
    let observer = SingleObserver { observer, predicate: self.predicate, found: None, done: false };
    self.source.actual_subscribe(observer)
  }
}

pub struct SingleObserver<O, F, Item> {
  observer: O,
  predicate: F,
  found: Option<Item>,
  done: bool,
}

impl<Item, O, F> Observer<Item> for SingleObserver<O, F, Item>
where
  Item: Send,
  O: Observer<Item>,
  F: FnMut(&Item) -> bool + Send,
{
  fn next(&mut self, value: Item) {
    if self.done || !(self.predicate)(&value) {
      return;
    }
    if self.found.is_some() {
      self.done = true;
      self.found = None;
      self.observer.error(RxError::TooManyElements);
    } else {
      self.found = Some(value);
    }
  }

  fn error(&mut self, err: RxError) {
    if !self.done {
      self.done = true;
      self.observer.error(err)
    }
  }

  fn complete(&mut self) {
    if self.done {
      return;
    }
    self.done = true;
    match self.found.take() {
      Some(v) => {
        self.observer.next(v);
        self.observer.complete();
      }
      None => self.observer.error(RxError::EmptySequence),
    }
  }

  fn is_closed(&self) -> bool { self.done || self.observer.is_closed() }
}
