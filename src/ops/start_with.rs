use crate::{observable::Observable, observer::Observer, subscription::Subscription};

/// Emits `values` synchronously on subscribe, then mirrors the source.
pub struct StartWithOp<S: Observable> {
  pub(crate) source: S,
  pub(crate) values: Vec<S::Item>,
}

impl<S> Clone for StartWithOp<S>
where
  S: Observable,
  S::Item: Clone,
{
  fn clone(&self) -> Self { StartWithOp { source: self.source.clone(), values: self.values.clone() } }
}

impl<S> Observable for StartWithOp<S>
where
  S: Observable,
  S::Item: Clone,
{
  type Item = S::Item;

  fn actual_subscribe<O>(self, mut observer: O) -> Subscription
  where
    O: Observer<S::Item> + 'static,
  {
    for v in self.values {
      if observer.is_closed() {
        return Subscription::empty();
      }
      observer.next(v);
    }
    self.source.actual_subscribe(observer)
  }
}
