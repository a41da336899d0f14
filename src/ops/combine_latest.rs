use crate::{
  error::RxError,
  observable::Observable,
  observer::{Event, Observer},
  rc::MutArc,
  subscriber::Subscriber,
  subscription::{Subscription, SubscriptionLike},
};

/// Emits the latest element of each side whenever either side emits, once
/// both have emitted at least once.
///
/// Completes when both sides completed, or as soon as one side completes
/// without ever emitting, since no combination can be formed anymore.
#[derive(Clone)]
pub struct CombineLatestOp<A, B> {
  pub(crate) a: A,
  pub(crate) b: B,
}

impl<A, B> Observable for CombineLatestOp<A, B>
where
  A: Observable,
  B: Observable,
  A::Item: Clone,
  B::Item: Clone,
{
  type Item = (A::Item, B::Item);

  fn actual_subscribe<O>(self, observer: O) -> Subscription
  where
    O: Observer<Self::Item> + 'static,
  {
    let subscription = Subscription::new();
    let ctx = CombineCtx {
      downstream: Subscriber::new(observer, subscription.clone()),
      state: MutArc::own(CombineState { a: None, b: None, a_done: false, b_done: false }),
    };
    subscription.add(self.a.actual_subscribe(CombineLatestAObserver(ctx.clone())));
    if !subscription.is_closed() {
      subscription.add(self.b.actual_subscribe(CombineLatestBObserver(ctx)));
    }
    subscription
  }
}

struct CombineState<A, B> {
  a: Option<A>,
  b: Option<B>,
  a_done: bool,
  b_done: bool,
}

impl<A: Clone, B: Clone> CombineState<A, B> {
  fn combined(&self) -> Option<Event<(A, B)>> {
    match (&self.a, &self.b) {
      (Some(a), Some(b)) => Some(Event::Next((a.clone(), b.clone()))),
      _ => None,
    }
  }
}

struct CombineCtx<A, B> {
  downstream: Subscriber<(A, B)>,
  state: MutArc<CombineState<A, B>>,
}

impl<A, B> Clone for CombineCtx<A, B> {
  fn clone(&self) -> Self {
    CombineCtx { downstream: self.downstream.clone(), state: self.state.clone() }
  }
}

impl<A, B> CombineCtx<A, B>
where
  A: Clone + Send + 'static,
  B: Clone + Send + 'static,
{
  fn update(&self, f: impl FnOnce(&mut CombineState<A, B>) -> Option<Event<(A, B)>>) {
    let queued = {
      let mut state = self.state.rc_deref_mut();
      f(&mut state).is_some_and(|event| self.downstream.enqueue(event))
    };
    if queued {
      self.downstream.drain();
    }
  }
}

pub struct CombineLatestAObserver<A, B>(CombineCtx<A, B>);

impl<A, B> Observer<A> for CombineLatestAObserver<A, B>
where
  A: Clone + Send + 'static,
  B: Clone + Send + 'static,
{
  fn next(&mut self, value: A) {
    self.0.update(|state| {
      state.a = Some(value);
      state.combined()
    })
  }

  fn error(&mut self, err: RxError) { self.0.downstream.emit(Event::Error(err)) }

  fn complete(&mut self) {
    self.0.update(|state| {
      state.a_done = true;
      (state.b_done || state.a.is_none()).then_some(Event::Completed)
    })
  }

  fn is_closed(&self) -> bool { Observer::is_closed(&self.0.downstream) }
}

pub struct CombineLatestBObserver<A, B>(CombineCtx<A, B>);

impl<A, B> Observer<B> for CombineLatestBObserver<A, B>
where
  A: Clone + Send + 'static,
  B: Clone + Send + 'static,
{
  fn next(&mut self, value: B) {
    self.0.update(|state| {
      state.b = Some(value);
      state.combined()
    })
  }

  fn error(&mut self, err: RxError) { self.0.downstream.emit(Event::Error(err)) }

  fn complete(&mut self) {
    self.0.update(|state| {
      state.b_done = true;
      (state.a_done || state.b.is_none()).then_some(Event::Completed)
    })
  }

  fn is_closed(&self) -> bool { Observer::is_closed(&self.0.downstream) }
}

/// Combines any number of same-typed streams into a `Vec` of their latest
/// elements, in source order.
#[derive(Clone)]
pub struct CombineLatestAllOp<S> {
  sources: Vec<S>,
}

/// Emits a `Vec` holding the latest element of every source whenever one of
/// them emits, once all have emitted. An empty list completes immediately.
///
/// ```rust
/// use rxstream::prelude::*;
/// use std::sync::{Arc, Mutex};
///
/// let out = Arc::new(Mutex::new(vec![]));
/// let c_out = out.clone();
/// let (mut a, mut b) = (PublishSubject::new(), PublishSubject::new());
/// observable::combine_latest_all(vec![a.clone(), b.clone()])
///   .subscribe(move |v| c_out.lock().unwrap().push(v));
/// a.next(1);
/// b.next(10);
/// a.next(2);
/// assert_eq!(*out.lock().unwrap(), vec![vec![1, 10], vec![2, 10]]);
/// ```
pub fn combine_latest_all<S>(sources: Vec<S>) -> CombineLatestAllOp<S>
where
  S: Observable,
  S::Item: Clone,
{
  CombineLatestAllOp { sources }
}

impl<S> Observable for CombineLatestAllOp<S>
where
  S: Observable,
  S::Item: Clone,
{
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
    let state = MutArc::own(CombineAllState {
      latest: self.sources.iter().map(|_| None).collect(),
      done: 0,
    });
    let downstream = Subscriber::new(observer, subscription.clone());
    for (index, source) in self.sources.into_iter().enumerate() {
      if subscription.is_closed() {
        break;
      }
      let observer =
        CombineLatestAllObserver { downstream: downstream.clone(), state: state.clone(), index };
      subscription.add(source.actual_subscribe(observer));
    }
    subscription
  }
}

struct CombineAllState<Item> {
  latest: Vec<Option<Item>>,
  done: usize,
}

pub struct CombineLatestAllObserver<Item> {
  downstream: Subscriber<Vec<Item>>,
  state: MutArc<CombineAllState<Item>>,
  index: usize,
}

impl<Item> CombineLatestAllObserver<Item>
where
  Item: Clone + Send + 'static,
{
  fn update(&self, f: impl FnOnce(&mut CombineAllState<Item>) -> Option<Event<Vec<Item>>>) {
    let queued = {
      let mut state = self.state.rc_deref_mut();
      f(&mut state).is_some_and(|event| self.downstream.enqueue(event))
    };
    if queued {
      self.downstream.drain();
    }
  }
}

impl<Item> Observer<Item> for CombineLatestAllObserver<Item>
where
  Item: Clone + Send + 'static,
{
  fn next(&mut self, value: Item) {
    let index = self.index;
    self.update(|state| {
      state.latest[index] = Some(value);
      state.latest.iter().cloned().collect::<Option<Vec<_>>>().map(Event::Next)
    })
  }

  fn error(&mut self, err: RxError) { self.downstream.emit(Event::Error(err)) }

  fn complete(&mut self) {
    let index = self.index;
    self.update(|state| {
      state.done += 1;
      (state.latest[index].is_none() || state.done == state.latest.len())
        .then_some(Event::Completed)
    })
  }

  fn is_closed(&self) -> bool { Observer::is_closed(&self.downstream) }
}

#[cfg(test)]
mod tests {
  use crate::prelude::*;
  use std::sync::{Arc, Mutex};

  #[test]
  fn emits_after_both_started() {
    let out = Arc::new(Mutex::new(vec![]));
    let c_out = out.clone();
    let mut a = PublishSubject::<i32>::new();
    let mut b = PublishSubject::<&str>::new();
    a.clone().combine_latest(b.clone()).subscribe(move |v| c_out.lock().unwrap().push(v));
    a.next(1);
    a.next(2);
    b.next("x");
    a.next(3);
    b.next("y");
    assert_eq!(*out.lock().unwrap(), vec![(2, "x"), (3, "x"), (3, "y")]);
  }

  #[test]
  fn completes_when_both_complete() {
    let events = Arc::new(Mutex::new(vec![]));
    let c_events = events.clone();
    let mut a = PublishSubject::<i32>::new();
    let mut b = PublishSubject::<i32>::new();
    a.clone().combine_latest(b.clone()).subscribe_event(move |e| c_events.lock().unwrap().push(e));
    a.next(1);
    b.next(2);
    a.complete();
    b.next(3);
    b.complete();
    assert_eq!(
      *events.lock().unwrap(),
      vec![Event::Next((1, 2)), Event::Next((1, 3)), Event::Completed]
    );
  }

  #[test]
  fn silent_side_completing_ends_it() {
    let events = Arc::new(Mutex::new(vec![]));
    let c_events = events.clone();
    observable::never::<i32>()
      .combine_latest(observable::empty::<i32>())
      .subscribe_event(move |e| c_events.lock().unwrap().push(e));
    assert_eq!(*events.lock().unwrap(), vec![Event::Completed]);
  }

  #[test]
  fn all_of_empty_list() {
    let events = Arc::new(Mutex::new(vec![]));
    let c_events = events.clone();
    observable::combine_latest_all(Vec::<observable::Of<i32>>::new())
      .subscribe_event(move |e| c_events.lock().unwrap().push(e));
    assert_eq!(*events.lock().unwrap(), vec![Event::Completed]);
  }
}
