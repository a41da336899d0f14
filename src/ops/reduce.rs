use crate::{
  error::RxError,
  observable::Observable,
  observer::Observer,
  subscription::Subscription,
};

/// Folds the source and emits the final accumulator when it completes. An
/// empty source yields the seed.
#[derive(Clone)]
pub struct ReduceOp<S, F, B> {
  pub(crate) source: S,
  pub(crate) func: F,
  pub(crate) seed: B,
}

impl<S, F, B> Observable for ReduceOp<S, F, B>
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
    self.source.actual_subscribe(ReduceObserver { observer, func: self.func, acc: Some(self.seed) })
  }
}

pub struct ReduceObserver<O, F, B> {
  observer: O,
  func: F,
  acc: Option<B>,
}

impl<Item, O, F, B> Observer<Item> for ReduceObserver<O, F, B>
where
  O: Observer<B>,
  F: FnMut(B, Item) -> B + Send,
  B: Send,
{
  fn next(&mut self, value: Item) {
    if let Some(acc) = self.acc.take() {
      self.acc = Some((self.func)(acc, value));
    }
  }

  fn error(&mut self, err: RxError) { self.observer.error(err) }

  fn complete(&mut self) {
    if let Some(acc) = self.acc.take() {
      self.observer.next(acc);
    }
    self.observer.complete();
  }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

/// Collects the whole source into one `Vec`.
#[derive(Clone)]
pub struct ToVecOp<S> {
  pub(crate) source: S,
}

impl<S: Observable> Observable for ToVecOp<S> {
  type Item = Vec<S::Item>;

  fn actual_subscribe<O>(self, observer: O) -> Subscription
  where
    O: Observer<Vec<S::Item>> + 'static,
  {
    self.source.actual_subscribe(ToVecObserver { observer, buffer: vec![] })
  }
}

pub struct ToVecObserver<O, Item> {
  observer: O,
  buffer: Vec<Item>,
}

impl<Item: Send, O: Observer<Vec<Item>>> Observer<Item> for ToVecObserver<O, Item> {
  fn next(&mut self, value: Item) { self.buffer.push(value) }

  fn error(&mut self, err: RxError) { self.observer.error(err) }

  fn complete(&mut self) {
    self.observer.next(std::mem::take(&mut self.buffer));
    self.observer.complete();
  }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}
