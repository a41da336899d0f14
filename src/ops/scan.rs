use crate::{
  error::RxError,
  observable::Observable,
  observer::Observer,
  subscription::Subscription,
};

/// Emits every intermediate accumulator of a fold over the source.
#[derive(Clone)]
pub struct ScanOp<S, F, B> {
  pub(crate) source: S,
  pub(crate) func: F,
  pub(crate) seed: B,
}

impl<S, F, B> Observable for ScanOp<S, F, B>
where
  S: Observable,
  F: FnMut(B, S::Item) -> B + Clone + Send + 'static,
  B: Clone + Send + 'static,
{
  type Item = B;

  fn actual_subscribe<O>(self, observer: O) -> Subscription
  where
    O: Observer<B> + 'static,
  {
    self.source.actual_subscribe(ScanObserver { observer, func: self.func, acc: Some(self.seed) })
  }
}

pub struct ScanObserver<O, F, B> {
  observer: O,
  func: F,
  acc: Option<B>,
}

impl<Item, O, F, B> Observer<Item> for ScanObserver<O, F, B>
where
  O: Observer<B>,
  F: FnMut(B, Item) -> B + Send,
  B: Clone + Send,
{
  fn next(&mut self, value: Item) {
    if let Some(acc) = self.acc.take() {
      let acc = (self.func)(acc, value);
      self.acc = Some(acc.clone());
      self.observer.next(acc);
    }
  }

  fn error(&mut self, err: RxError) { self.observer.error(err) }

  fn complete(&mut self) { self.observer.complete() }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

#[derive(Clone)]
pub struct TryScanOp<S, F, B> {
  pub(crate) source: S,
  pub(crate) func: F,
  pub(crate) seed: B,
}

impl<S, F, B, E> Observable for TryScanOp<S, F, B>
where
  S: Observable,
  F: FnMut(B, S::Item) -> Result<B, E> + Clone + Send + 'static,
  E: Into<anyhow::Error>,
  B: Clone + Send + 'static,
{
  type Item = B;

  fn actual_subscribe<O>(self, observer: O) -> Subscription
  where
    O: Observer<B> + 'static,
  {
    let observer = TryScanObserver { observer, func: self.func, acc: Some(self.seed) };
    self.source.actual_subscribe(observer)
  }
}

/// Like [`ScanObserver`], but a failed step leaves no accumulator behind and
/// ends the stream.
pub struct TryScanObserver<O, F, B> {
  observer: O,
  func: F,
  acc: Option<B>,
}

impl<Item, O, F, B, E> Observer<Item> for TryScanObserver<O, F, B>
where
  O: Observer<B>,
  F: FnMut(B, Item) -> Result<B, E> + Send,
  E: Into<anyhow::Error>,
  B: Clone + Send,
{
  fn next(&mut self, value: Item) {
    let Some(acc) = self.acc.take() else { return };
    match (self.func)(acc, value) {
      Ok(acc) => {
        self.acc = Some(acc.clone());
        self.observer.next(acc);
      }
      Err(e) => self.observer.error(RxError::upstream(e)),
    }
  }

  fn error(&mut self, err: RxError) {
    if self.acc.is_some() {
      self.observer.error(err)
    }
  }

  fn complete(&mut self) {
    if self.acc.is_some() {
      self.observer.complete()
    }
  }

  fn is_closed(&self) -> bool { self.acc.is_none() || self.observer.is_closed() }
}
