use crate::{
  error::RxError,
  observable::Observable,
  observer::Observer,
  subscription::Subscription,
};

#[derive(Clone)]
pub struct MapOp<S, F> {
  pub(crate) source: S,
  pub(crate) func: F,
}

impl<S, F, B> Observable for MapOp<S, F>
where
  S: Observable,
  F: FnMut(S::Item) -> B + Clone + Send + 'static,
  B: Send + 'static,
{
  type Item = B;

  fn actual_subscribe<O>(self, observer: O) -> Subscription
  where
    O: Observer<B> + 'static,
  {
    self.source.actual_subscribe(MapObserver { observer, func: self.func })
  }
}

pub struct MapObserver<O, F> {
  observer: O,
  func: F,
}

impl<Item, B, O, F> Observer<Item> for MapObserver<O, F>
where
  O: Observer<B>,
  F: FnMut(Item) -> B + Send,
{
  fn next(&mut self, value: Item) { self.observer.next((self.func)(value)) }

  fn error(&mut self, err: RxError) { self.observer.error(err) }

  fn complete(&mut self) { self.observer.complete() }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

#[derive(Clone)]
pub struct TryMapOp<S, F> {
  pub(crate) source: S,
  pub(crate) func: F,
}

impl<S, F, B, E> Observable for TryMapOp<S, F>
where
  S: Observable,
  F: FnMut(S::Item) -> Result<B, E> + Clone + Send + 'static,
  E: Into<anyhow::Error>,
  B: Send + 'static,
{
  type Item = B;

  fn actual_subscribe<O>(self, observer: O) -> Subscription
  where
    O: Observer<B> + 'static,
  {
    self.source.actual_subscribe(TryMapObserver { observer, func: self.func, failed: false })
  }
}

pub struct TryMapObserver<O, F> {
  observer: O,
  func: F,
  failed: bool,
}

impl<Item, B, E, O, F> Observer<Item> for TryMapObserver<O, F>
where
  O: Observer<B>,
  F: FnMut(Item) -> Result<B, E> + Send,
  E: Into<anyhow::Error>,
{
  fn next(&mut self, value: Item) {
    if self.failed {
      return;
    }
    match (self.func)(value) {
      Ok(v) => self.observer.next(v),
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
