use crate::{
  error::RxError,
  observable::Observable,
  observer::Observer,
  subscription::Subscription,
};

/// Drops values while `predicate` holds; from the first failure on every
/// value passes and the predicate is not called again.
#[derive(Clone)]
pub struct SkipWhileOp<S, F> {
  pub(crate) source: S,
  pub(crate) predicate: F,
}

impl<S, F> Observable for SkipWhileOp<S, F>
where
  S: Observable,
  F: FnMut(&S::Item) -> bool + Clone + Send + 'static,
{
  type Item = S::Item;

  fn actual_subscribe<O>(self, observer: O) -> Subscription
  where
    O: Observer<S::Item> + 'static,
  {
    let observer = SkipWhileObserver { observer, predicate: self.predicate, passing: false };
    self.source.actual_subscribe(observer)
  }
}

pub struct SkipWhileObserver<O, F> {
  observer: O,
  predicate: F,
  passing: bool,
}

impl<Item, O, F> Observer<Item> for SkipWhileObserver<O, F>
where
  O: Observer<Item>,
  F: FnMut(&Item) -> bool + Send,
{
  fn next(&mut self, value: Item) {
    if !self.passing && !(self.predicate)(&value) {
      self.passing = true;
    }
    if self.passing {
      self.observer.next(value);
    }
  }

  fn error(&mut self, err: RxError) { self.observer.error(err) }

  fn complete(&mut self) { self.observer.complete() }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

#[cfg(test)]
mod tests {
  use crate::prelude::*;
  use std::sync::{Arc, Mutex};

  #[test]
  fn boundary_is_permanent() {
    let out = Arc::new(Mutex::new(vec![]));
    let c_out = out.clone();
    observable::from_iter(vec![1, 2, 3, 4, 5, 6])
      .skip_while(|v| *v < 4)
      .subscribe(move |v| c_out.lock().unwrap().push(v));
    assert_eq!(*out.lock().unwrap(), vec![4, 5, 6]);

    let out = Arc::new(Mutex::new(vec![]));
    let c_out = out.clone();
    observable::from_iter(vec![1, 5, 2])
      .skip_while(|v| *v < 4)
      .subscribe(move |v| c_out.lock().unwrap().push(v));
    assert_eq!(*out.lock().unwrap(), vec![5, 2]);
  }
}
