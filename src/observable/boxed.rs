use crate::{observable::Observable, observer::Observer, subscription::Subscription};

trait DynObservable<Item>: Send {
  fn box_subscribe(self: Box<Self>, observer: Box<dyn Observer<Item>>) -> Subscription;

  fn box_clone(&self) -> Box<dyn DynObservable<Item>>;
}

impl<S: Observable> DynObservable<S::Item> for S {
  fn box_subscribe(self: Box<Self>, observer: Box<dyn Observer<S::Item>>) -> Subscription {
    (*self).actual_subscribe(observer)
  }

  fn box_clone(&self) -> Box<dyn DynObservable<S::Item>> { Box::new(self.clone()) }
}

/// A type-erased stream, for storing differently built streams of the same
/// item type side by side.
pub struct BoxedObservable<Item>(Box<dyn DynObservable<Item>>);

impl<Item: Send + 'static> BoxedObservable<Item> {
  pub fn new(source: impl Observable<Item = Item>) -> Self { BoxedObservable(Box::new(source)) }
}

impl<Item> Clone for BoxedObservable<Item> {
  fn clone(&self) -> Self { BoxedObservable(self.0.box_clone()) }
}

impl<Item: Send + 'static> Observable for BoxedObservable<Item> {
  type Item = Item;

  fn actual_subscribe<O>(self, observer: O) -> Subscription
  where
    O: Observer<Item> + 'static,
  {
    self.0.box_subscribe(Box::new(observer))
  }
}

#[cfg(test)]
mod tests {
  use crate::prelude::*;
  use std::sync::{Arc, Mutex};

  #[test]
  fn mixed_sources_in_one_vec() {
    let sources: Vec<BoxedObservable<i32>> = vec![
      observable::of(1).box_it(),
      observable::from_iter(vec![2, 3]).box_it(),
      observable::range(4, 2).map(|v| v as i32).box_it(),
    ];
    let out = Arc::new(Mutex::new(vec![]));
    for source in sources {
      let out = out.clone();
      source.subscribe(move |v| out.lock().unwrap().push(v));
    }
    assert_eq!(*out.lock().unwrap(), vec![1, 2, 3, 4, 5]);
  }
}
