use std::marker::PhantomData;

use crate::{
  observable::Observable,
  observer::Observer,
  subscriber::Subscriber,
  subscription::Subscription,
};

/// A stream produced by a user function.
pub struct Create<F, Item> {
  func: F,
  _p: PhantomData<fn() -> Item>,
}

/// Creates a stream from a production function.
///
/// `f` runs once per subscription with a [`Subscriber`] to emit into, which
/// may be cloned and moved to other threads. The returned subscription is
/// the teardown: it runs when the observer cancels or the stream
/// terminates.
///
/// ```rust
/// use rxstream::prelude::*;
///
/// let source = observable::create(|mut subscriber: Subscriber<&str>| {
///   subscriber.next("🔴");
///   subscriber.complete();
///   Subscription::from_fn(|| println!("disposed"))
/// });
/// source.subscribe(|v| println!("{v}"));
/// ```
pub fn create<Item, F>(f: F) -> Create<F, Item>
where
  F: FnMut(Subscriber<Item>) -> Subscription + Clone + Send + 'static,
  Item: Send + 'static,
{
  Create { func: f, _p: PhantomData }
}

impl<F: Clone, Item> Clone for Create<F, Item> {
  fn clone(&self) -> Self { Create { func: self.func.clone(), _p: PhantomData } }
}

impl<F, Item> Observable for Create<F, Item>
where
  F: FnMut(Subscriber<Item>) -> Subscription + Clone + Send + 'static,
  Item: Send + 'static,
{
  type Item = Item;

  fn actual_subscribe<O>(mut self, observer: O) -> Subscription
  where
    O: Observer<Item> + 'static,
  {
    let subscriber = Subscriber::new(observer, Subscription::new());
    let subscription = subscriber.subscription().clone();
    let teardown = (self.func)(subscriber);
    subscription.add(teardown);
    subscription
  }
}

#[cfg(test)]
mod tests {
  use crate::prelude::*;
  use std::{
    sync::{Arc, Mutex},
    thread,
  };

  #[test]
  fn emits_and_tears_down() {
    let log = Arc::new(Mutex::new(vec![]));
    let c_log = log.clone();
    let source = observable::create({
      let log = log.clone();
      move |mut subscriber: Subscriber<i32>| {
        subscriber.next(1);
        subscriber.next(2);
        subscriber.complete();
        subscriber.next(3);
        let log = log.clone();
        Subscription::from_fn(move || log.lock().unwrap().push("disposed".to_string()))
      }
    });
    source.subscribe_event(move |e| c_log.lock().unwrap().push(e.to_string()));
    assert_eq!(*log.lock().unwrap(), vec!["next(1)", "next(2)", "completed", "disposed"]);
  }

  #[test]
  fn emit_from_another_thread() {
    let values = Arc::new(Mutex::new(vec![]));
    let c_values = values.clone();
    let worker = Arc::new(Mutex::new(None));
    let c_worker = worker.clone();
    let subscription = observable::create(move |subscriber: Subscriber<i32>| {
      let handle = thread::spawn(move || {
        let mut subscriber = subscriber;
        (0..5).for_each(|v| subscriber.next(v));
        subscriber.complete();
      });
      *c_worker.lock().unwrap() = Some(handle);
      Subscription::new()
    })
    .subscribe(move |v| c_values.lock().unwrap().push(v));
    let handle = worker.lock().unwrap().take().unwrap();
    handle.join().unwrap();
    assert_eq!(*values.lock().unwrap(), vec![0, 1, 2, 3, 4]);
    assert!(subscription.is_closed());
  }
}
