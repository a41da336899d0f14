use crate::{
  error::RxError,
  observable::Observable,
  observer::Observer,
  subscription::Subscription,
};

/// Runs side effects for each notification and forwards it unchanged.
#[derive(Clone)]
pub struct TapOp<S, N, E, C> {
  pub(crate) source: S,
  pub(crate) on_next: N,
  pub(crate) on_error: E,
  pub(crate) on_complete: C,
}

impl<S, N, E, C> Observable for TapOp<S, N, E, C>
where
  S: Observable,
  N: FnMut(&S::Item) + Clone + Send + 'static,
  E: FnMut(&RxError) + Clone + Send + 'static,
  C: FnMut() + Clone + Send + 'static,
{
  type Item = S::Item;

  fn actual_subscribe<O>(self, observer: O) -> Subscription
  where
    O: Observer<S::Item> + 'static,
  {
    self.source.actual_subscribe(TapObserver {
      observer,
      on_next: self.on_next,
      on_error: self.on_error,
      on_complete: self.on_complete,
    })
  }
}

pub struct TapObserver<O, N, E, C> {
  observer: O,
  on_next: N,
  on_error: E,
  on_complete: C,
}

impl<Item, O, N, E, C> Observer<Item> for TapObserver<O, N, E, C>
where
  O: Observer<Item>,
  N: FnMut(&Item) + Send,
  E: FnMut(&RxError) + Send,
  C: FnMut() + Send,
{
  fn next(&mut self, value: Item) {
    (self.on_next)(&value);
    self.observer.next(value);
  }

  fn error(&mut self, err: RxError) {
    (self.on_error)(&err);
    self.observer.error(err);
  }

  fn complete(&mut self) {
    (self.on_complete)();
    self.observer.complete();
  }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}
