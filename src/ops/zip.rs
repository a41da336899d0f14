use std::collections::VecDeque;

use crate::{
  error::RxError,
  observable::Observable,
  observer::{Event, Observer},
  rc::MutArc,
  subscriber::Subscriber,
  subscription::{Subscription, SubscriptionLike},
};

/// Pairs the n-th element of `a` with the n-th element of `b`.
///
/// Unmatched elements wait in a per-side buffer. The result completes as
/// soon as one side completed with nothing left in its buffer, because no
/// further pair can be formed.
#[derive(Clone)]
pub struct ZipOp<A, B> {
  pub(crate) a: A,
  pub(crate) b: B,
}

impl<A: Observable, B: Observable> Observable for ZipOp<A, B> {
  type Item = (A::Item, B::Item);

  fn actual_subscribe<O>(self, observer: O) -> Subscription
  where
    O: Observer<Self::Item> + 'static,
  {
    let subscription = Subscription::new();
    let ctx = ZipCtx {
      downstream: Subscriber::new(observer, subscription.clone()),
      state: MutArc::own(ZipState {
        a: VecDeque::new(),
        b: VecDeque::new(),
        a_done: false,
        b_done: false,
      }),
    };
    subscription.add(self.a.actual_subscribe(ZipAObserver(ctx.clone())));
    if !subscription.is_closed() {
      subscription.add(self.b.actual_subscribe(ZipBObserver(ctx)));
    }
    subscription
  }
}

struct ZipState<A, B> {
  a: VecDeque<A>,
  b: VecDeque<B>,
  a_done: bool,
  b_done: bool,
}

struct ZipCtx<A, B> {
  downstream: Subscriber<(A, B)>,
  state: MutArc<ZipState<A, B>>,
}

impl<A, B> Clone for ZipCtx<A, B> {
  fn clone(&self) -> Self { ZipCtx { downstream: self.downstream.clone(), state: self.state.clone() } }
}

impl<A: Send + 'static, B: Send + 'static> ZipCtx<A, B> {
  fn emit(&self, f: impl FnOnce(&mut ZipState<A, B>) -> Option<Event<(A, B)>>) {
    let queued = {
      let mut state = self.state.rc_deref_mut();
      f(&mut state).is_some_and(|event| self.downstream.enqueue(event))
    };
    if queued {
      self.downstream.drain();
    }
  }

  fn error(&self, err: RxError) { self.downstream.emit(Event::Error(err)) }

  fn is_closed(&self) -> bool { Observer::is_closed(&self.downstream) }
}

pub struct ZipAObserver<A, B>(ZipCtx<A, B>);

impl<A: Send + 'static, B: Send + 'static> Observer<A> for ZipAObserver<A, B> {
  fn next(&mut self, value: A) {
    self.0.emit(|state| match state.b.pop_front() {
      Some(b) => Some(Event::Next((value, b))),
      None => {
        state.a.push_back(value);
        None
      }
    });
    self.0.emit(|state| (state.b_done && state.b.is_empty()).then_some(Event::Completed));
  }

  fn error(&mut self, err: RxError) { self.0.error(err) }

  fn complete(&mut self) {
    self.0.emit(|state| {
      state.a_done = true;
      state.a.is_empty().then_some(Event::Completed)
    });
  }

  fn is_closed(&self) -> bool { self.0.is_closed() }
}

pub struct ZipBObserver<A, B>(ZipCtx<A, B>);

impl<A: Send + 'static, B: Send + 'static> Observer<B> for ZipBObserver<A, B> {
  fn next(&mut self, value: B) {
    self.0.emit(|state| match state.a.pop_front() {
      Some(a) => Some(Event::Next((a, value))),
      None => {
        state.b.push_back(value);
        None
      }
    });
    self.0.emit(|state| (state.a_done && state.a.is_empty()).then_some(Event::Completed));
  }

  fn error(&mut self, err: RxError) { self.0.error(err) }

  fn complete(&mut self) {
    self.0.emit(|state| {
      state.b_done = true;
      state.b.is_empty().then_some(Event::Completed)
    });
  }

  fn is_closed(&self) -> bool { self.0.is_closed() }
}

/// Zips any number of same-typed streams into a `Vec` holding the n-th
/// element of every source, in source order.
#[derive(Clone)]
pub struct ZipAllOp<S> {
  sources: Vec<S>,
}

/// Emits a `Vec` with one element from every source each time all of them
/// have an unmatched element buffered. Completes once any source completed
/// with nothing left in its buffer. An empty list completes immediately.
///
/// ```rust
/// use rxstream::prelude::*;
/// use std::sync::{Arc, Mutex};
///
/// let out = Arc::new(Mutex::new(vec![]));
/// let c_out = out.clone();
/// observable::zip_all(vec![
///   observable::from_iter(vec![1, 2, 3]).box_it(),
///   observable::from_iter(vec![10, 20]).box_it(),
///   observable::from_iter(vec![100, 200, 300]).box_it(),
/// ])
/// .subscribe(move |v| c_out.lock().unwrap().push(v));
/// assert_eq!(*out.lock().unwrap(), vec![vec![1, 10, 100], vec![2, 20, 200]]);
/// ```
pub fn zip_all<S: Observable>(sources: Vec<S>) -> ZipAllOp<S> { ZipAllOp { sources } }

impl<S: Observable> Observable for ZipAllOp<S> {
  type Item = Vec<S::Item>;

  fn actual_subscribe<O>(self, mut observer: O) -> Subscription
  where
    O: Observer<Self::Item> + 'static,
  {
    if self.sources.is_empty() {
      observer.complete();
      return Subscription::empty();
    }
    let subscription = Subscription::new();
    let state = MutArc::own(ZipAllState {
      buffers: self.sources.iter().map(|_| VecDeque::new()).collect(),
      done: vec![false; self.sources.len()],
    });
    let downstream = Subscriber::new(observer, subscription.clone());
    for (index, source) in self.sources.into_iter().enumerate() {
      if subscription.is_closed() {
        break;
      }
      let observer = ZipAllObserver { downstream: downstream.clone(), state: state.clone(), index };
      subscription.add(source.actual_subscribe(observer));
    }
    subscription
  }
}

struct ZipAllState<Item> {
  buffers: Vec<VecDeque<Item>>,
  done: Vec<bool>,
}

impl<Item> ZipAllState<Item> {
  fn exhausted(&self) -> bool {
    self.done.iter().zip(&self.buffers).any(|(done, buffer)| *done && buffer.is_empty())
  }
}

pub struct ZipAllObserver<Item> {
  downstream: Subscriber<Vec<Item>>,
  state: MutArc<ZipAllState<Item>>,
  index: usize,
}

impl<Item: Send + 'static> Observer<Item> for ZipAllObserver<Item> {
  fn next(&mut self, value: Item) {
    let queued = {
      let mut state = self.state.rc_deref_mut();
      state.buffers[self.index].push_back(value);
      let mut queued = false;
      if state.buffers.iter().all(|buffer| !buffer.is_empty()) {
        let row = state.buffers.iter_mut().filter_map(VecDeque::pop_front).collect();
        queued |= self.downstream.enqueue(Event::Next(row));
      }
      if state.exhausted() {
        queued |= self.downstream.enqueue(Event::Completed);
      }
      queued
    };
    if queued {
      self.downstream.drain();
    }
  }

  fn error(&mut self, err: RxError) { self.downstream.emit(Event::Error(err)) }

  fn complete(&mut self) {
    let queued = {
      let mut state = self.state.rc_deref_mut();
      state.done[self.index] = true;
      state.exhausted() && self.downstream.enqueue(Event::Completed)
    };
    if queued {
      self.downstream.drain();
    }
  }

  fn is_closed(&self) -> bool { Observer::is_closed(&self.downstream) }
}

#[cfg(test)]
mod tests {
  use crate::prelude::*;
  use std::sync::{Arc, Mutex};

  #[test]
  fn shorter_side_ends_it() {
    let events = Arc::new(Mutex::new(vec![]));
    let c_events = events.clone();
    observable::from_iter(0..2)
      .zip(observable::from_iter(vec!["a", "b", "c"]))
      .subscribe_event(move |e| c_events.lock().unwrap().push(e));
    assert_eq!(
      *events.lock().unwrap(),
      vec![Event::Next((0, "a")), Event::Next((1, "b")), Event::Completed]
    );
  }

  #[test]
  fn buffers_the_faster_side() {
    let out = Arc::new(Mutex::new(vec![]));
    let c_out = out.clone();
    let mut a = PublishSubject::<i32>::new();
    let mut b = PublishSubject::<char>::new();
    a.clone().zip(b.clone()).subscribe(move |v| c_out.lock().unwrap().push(v));
    a.next(1);
    a.next(2);
    a.next(3);
    b.next('x');
    assert_eq!(*out.lock().unwrap(), vec![(1, 'x')]);
    b.next('y');
    assert_eq!(*out.lock().unwrap(), vec![(1, 'x'), (2, 'y')]);
  }

  #[test]
  fn completes_when_finished_side_drained() {
    let completed = Arc::new(Mutex::new(false));
    let c_completed = completed.clone();
    let mut a = PublishSubject::<i32>::new();
    let mut b = PublishSubject::<i32>::new();
    a.clone().zip(b.clone()).subscribe_all(
      |_| {},
      |_| {},
      move || *c_completed.lock().unwrap() = true,
    );
    a.next(1);
    a.complete();
    assert!(!*completed.lock().unwrap());
    b.next(1);
    assert!(*completed.lock().unwrap());
    assert_eq!(b.observer_count(), 0);
  }
  #[test]
  fn zip_all_rows_follow_the_slowest_source() {
    let events = Arc::new(Mutex::new(vec![]));
    let c_events = events.clone();
    let mut sources: Vec<_> = (0..3).map(|_| PublishSubject::<i32>::new()).collect();
    observable::zip_all(sources.clone())
      .subscribe_event(move |e| c_events.lock().unwrap().push(e));
    sources[0].next(1);
    sources[0].next(2);
    sources[1].next(10);
    assert!(events.lock().unwrap().is_empty());
    sources[2].next(100);
    sources[1].next(20);
    sources[1].complete();
    sources[2].next(200);
    assert_eq!(
      *events.lock().unwrap(),
      vec![Event::Next(vec![1, 10, 100]), Event::Next(vec![2, 20, 200]), Event::Completed]
    );
    assert!(sources.iter().all(|s| s.observer_count() == 0));
  }

  #[test]
  fn zip_all_of_nothing_completes() {
    let events = Arc::new(Mutex::new(vec![]));
    let c_events = events.clone();
    observable::zip_all(Vec::<observable::Of<i32>>::new())
      .subscribe_event(move |e| c_events.lock().unwrap().push(e));
    assert_eq!(*events.lock().unwrap(), vec![Event::Completed]);
  }
}
