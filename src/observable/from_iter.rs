use crate::{observable::Observable, observer::Observer, subscription::Subscription};

/// Emits every element of an iterable, then completes.
#[derive(Clone)]
pub struct FromIter<I>(I);

/// Creates an observable that produces values from an iterator.
///
/// Completes when all elements have been emitted. Never emits an error.
///
/// # Examples
///
/// ```rust
/// use rxstream::prelude::*;
///
/// observable::from_iter(vec![0, 1, 2, 3]).subscribe(|v| println!("{},", v));
///
/// // print log:
/// // 0
/// // 1
/// // 2
/// // 3
/// ```
pub fn from_iter<I>(iter: I) -> FromIter<I>
where
  I: IntoIterator + Clone + Send + 'static,
  I::Item: Send + 'static,
{
  FromIter(iter)
}

/// `count` consecutive integers starting at `start`.
pub fn range(start: i64, count: usize) -> FromIter<std::ops::Range<i64>> {
  let end = start.saturating_add(i64::try_from(count).unwrap_or(i64::MAX));
  FromIter(start..end)
}

/// Emits `v` forever, until the observer goes away.
pub fn repeat_element<Item>(v: Item) -> FromIter<std::iter::Repeat<Item>>
where
  Item: Clone + Send + 'static,
{
  FromIter(std::iter::repeat(v))
}

impl<I> Observable for FromIter<I>
where
  I: IntoIterator + Clone + Send + 'static,
  I::Item: Send + 'static,
{
  type Item = I::Item;

  fn actual_subscribe<O>(self, mut observer: O) -> Subscription
  where
    O: Observer<Self::Item> + 'static,
  {
    for v in self.0 {
      if observer.is_closed() {
        return Subscription::empty();
      }
      observer.next(v);
    }
    if !observer.is_closed() {
      observer.complete();
    }
    Subscription::empty()
  }
}

/// Emits `initial`, then every value `iterate` derives from the previous
/// one, for as long as `condition` holds.
#[derive(Clone)]
pub struct Generate<T, C, F> {
  initial: T,
  condition: C,
  iterate: F,
}

/// ```rust
/// use rxstream::prelude::*;
/// use std::sync::{Arc, Mutex};
///
/// let out = Arc::new(Mutex::new(vec![]));
/// let c_out = out.clone();
/// observable::generate(0, |v| *v < 3, |v| v + 1)
///   .subscribe(move |v| c_out.lock().unwrap().push(v));
/// assert_eq!(*out.lock().unwrap(), vec![0, 1, 2]);
/// ```
pub fn generate<T, C, F>(initial: T, condition: C, iterate: F) -> Generate<T, C, F>
where
  T: Clone + Send + 'static,
  C: FnMut(&T) -> bool + Clone + Send + 'static,
  F: FnMut(&T) -> T + Clone + Send + 'static,
{
  Generate { initial, condition, iterate }
}

impl<T, C, F> Observable for Generate<T, C, F>
where
  T: Clone + Send + 'static,
  C: FnMut(&T) -> bool + Clone + Send + 'static,
  F: FnMut(&T) -> T + Clone + Send + 'static,
{
  type Item = T;

  fn actual_subscribe<O>(self, mut observer: O) -> Subscription
  where
    O: Observer<T> + 'static,
  {
    let Generate { initial, mut condition, mut iterate } = self;
    let mut current = initial;
    while condition(&current) {
      if observer.is_closed() {
        return Subscription::empty();
      }
      let next = iterate(&current);
      observer.next(std::mem::replace(&mut current, next));
    }
    if !observer.is_closed() {
      observer.complete();
    }
    Subscription::empty()
  }
}
