use crate::{
  error::RxError,
  observable::Observable,
  observer::Observer,
  subscription::Subscription,
};

#[derive(Clone)]
pub struct FilterOp<S, F> {
  pub(crate) source: S,
  pub(crate) predicate: F,
}

impl<S, F> Observable for FilterOp<S, F>
where
  S: Observable,
  F: FnMut(&S::Item) -> bool + Clone + Send + 'static,
{
  type Item = S::Item;

  fn actual_subscribe<O>(self, observer: O) -> Subscription
  where
    O: Observer<S::Item> + 'static,
  {
    self.source.actual_subscribe(FilterObserver { observer, predicate: self.predicate })
  }
}

pub struct FilterObserver<O, F> {
  observer: O,
  predicate: F,
}

impl<Item, O, F> Observer<Item> for FilterObserver<O, F>
where
  O: Observer<Item>,
  F: FnMut(&Item) -> bool + Send,
{
  fn next(&mut self, value: Item) {
    if (self.predicate)(&value) {
      self.observer.next(value)
    }
  }

  fn error(&mut self, err: RxError) { self.observer.error(err) }

  fn complete(&mut self) { self.observer.complete() }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

#[derive(Clone)]
pub struct TryFilterOp<S, F> {
  pub(crate) source: S,
  pub(crate) predicate: F,
}

impl<S, F, E> Observable for TryFilterOp<S, F>
where
  S: Observable,
  F: FnMut(&S::Item) -> Result<bool, E> + Clone + Send + 'static,
  E: Into<anyhow::Error>,
{
  type Item = S::Item;

  fn actual_subscribe<O>(self, observer: O) -> Subscription
  where
    O: Observer<S::Item> + 'static,
  {
    let observer = TryFilterObserver { observer, predicate: self.predicate, failed: false };
    self.source.actual_subscribe(observer)
  }
}

pub struct TryFilterObserver<O, F> {
  observer: O,
  predicate: F,
  failed: bool,
}

impl<Item, O, F, E> Observer<Item> for TryFilterObserver<O, F>
where
  O: Observer<Item>,
  F: FnMut(&Item) -> Result<bool, E> + Send,
  E: Into<anyhow::Error>,
{
  fn next(&mut self, value: Item) {
    if self.failed {
      return;
    }
    match (self.predicate)(&value) {
      Ok(true) => self.observer.next(value),
      Ok(false) => {}
      Err(e) => {
        self.failed = true;
        self.observer.error(RxError::upstream(e));
      }
    }
  }

  fn error(&mut self, err: RxError) {
    if !self.failed {
      self.observer.error(err)
    }
  }

  fn complete(&mut self) {
    if !self.failed {
      self.observer.complete()
    }
  }

  fn is_closed(&self) -> bool { self.failed || self.observer.is_closed() }
}
