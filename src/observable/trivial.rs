use std::marker::PhantomData;

use crate::{
  error::RxError,
  observable::Observable,
  observer::Observer,
  subscription::Subscription,
};

/// Completes immediately without emitting.
pub struct Empty<Item>(PhantomData<fn() -> Item>);

/// Never emits and never terminates.
pub struct Never<Item>(PhantomData<fn() -> Item>);

/// Fails immediately with a fixed error.
pub struct ThrowErr<Item> {
  err: RxError,
  _p: PhantomData<fn() -> Item>,
}

pub fn empty<Item>() -> Empty<Item> { Empty(PhantomData) }

pub fn never<Item>() -> Never<Item> { Never(PhantomData) }

pub fn throw_err<Item>(err: RxError) -> ThrowErr<Item> { ThrowErr { err, _p: PhantomData } }

impl<Item> Clone for Empty<Item> {
  fn clone(&self) -> Self { Empty(PhantomData) }
}

impl<Item> Clone for Never<Item> {
  fn clone(&self) -> Self { Never(PhantomData) }
}

impl<Item> Clone for ThrowErr<Item> {
  fn clone(&self) -> Self { ThrowErr { err: self.err.clone(), _p: PhantomData } }
}

impl<Item: Send + 'static> Observable for Empty<Item> {
  type Item = Item;

  fn actual_subscribe<O>(self, mut observer: O) -> Subscription
  where
    O: Observer<Item> + 'static,
  {
    if !observer.is_closed() {
      observer.complete();
    }
    Subscription::empty()
  }
}

impl<Item: Send + 'static> Observable for Never<Item> {
  type Item = Item;

  fn actual_subscribe<O>(self, _observer: O) -> Subscription
  where
    O: Observer<Item> + 'static,
  {
    Subscription::new()
  }
}

impl<Item: Send + 'static> Observable for ThrowErr<Item> {
  type Item = Item;

  fn actual_subscribe<O>(self, mut observer: O) -> Subscription
  where
    O: Observer<Item> + 'static,
  {
    if !observer.is_closed() {
      observer.error(self.err);
    }
    Subscription::empty()
  }
}
