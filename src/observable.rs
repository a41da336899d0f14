//! Streams and the operators that compose them.
//!
//! An [`Observable`] is a cold description of how to produce events: every
//! subscription runs its own production. All operators live on the
//! [`ObservableExt`] extension trait, which every observable gets for free.
//!
//! ```rust
//! use rxstream::prelude::*;
//! use std::sync::{Arc, Mutex};
//!
//! let sum = Arc::new(Mutex::new(0));
//! let c_sum = sum.clone();
//! observable::from_iter(1..=10)
//!   .filter(|v| v % 2 == 0)
//!   .map(|v| v * 10)
//!   .subscribe(move |v| *c_sum.lock().unwrap() += v);
//! assert_eq!(*sum.lock().unwrap(), 300);
//! ```
use std::time::Duration;

use crate::{
  error::RxError,
  observer::{Event, EventObserver, FnMutObserver, Observer, ObserverAll},
  ops::{
    catch::{CatchAndReturnOp, CatchOp},
    combine_latest::CombineLatestOp,
    debug::{DebugOp, DebugSink, TracingSink},
    delay::DelayOp,
    distinct_until_changed::DistinctUntilChangedOp,
    element_at::ElementAtOp,
    enumerate::EnumerateOp,
    filter::{FilterOp, TryFilterOp},
    into_future::{FirstValueFuture, ObservableFuture},
    into_stream::ObservableStream,
    map::{MapOp, TryMapOp},
    merge_all::MergeAllOp,
    observe_on::ObserveOnOp,
    reduce::{ReduceOp, ToVecOp},
    retry::{RetryConfig, RetryOp, RetryPolicy},
    scan::{ScanOp, TryScanOp},
    single::SingleOp,
    skip::SkipOp,
    skip_until::SkipUntilOp,
    skip_while::SkipWhileOp,
    start_with::StartWithOp,
    subscribe_on::SubscribeOnOp,
    switch_on_next::SwitchOnNextOp,
    take::TakeOp,
    take_last::TakeLastOp,
    take_until::TakeUntilOp,
    take_while::TakeWhileOp,
    tap::TapOp,
    with_latest_from::WithLatestFromOp,
    zip::ZipOp,
  },
  scheduler::Scheduler,
  subject::{Hub, PublishSubject, ReplaySubject},
  subscriber::Subscriber,
  subscription::Subscription,
};

mod boxed;
pub use boxed::BoxedObservable;
mod connectable;
pub use connectable::{ConnectableObservable, RefCountOp};
mod create;
pub use create::*;
mod defer;
pub use defer::*;
mod from_iter;
pub use from_iter::*;
mod interval;
pub use interval::*;
mod of;
pub use of::*;
mod timer;
pub use timer::*;
mod trivial;
pub use trivial::*;

pub use crate::ops::combine_latest::{combine_latest_all, CombineLatestAllOp};
pub use crate::ops::zip::{zip_all, ZipAllOp};

/// A stream of `Item`s.
///
/// Implementors only describe how to start production for one observer;
/// [`ObservableExt::subscribe_with`] is the entry point for consumers and
/// provides the serialized, cancellable boundary around the observer.
pub trait Observable: Clone + Send + 'static {
  type Item: Send + 'static;

  /// Start producing into `observer`. The returned subscription cancels the
  /// production.
  fn actual_subscribe<O>(self, observer: O) -> Subscription
  where
    O: Observer<Self::Item> + 'static;
}

/// Two streams of the same item type joined by `merge` or `concat`.
pub type MergeOp<Item> = MergeAllOp<FromIter<[BoxedObservable<Item>; 2]>>;

pub trait ObservableExt: Observable {
  /// Subscribe with a value-only callback. An error that reaches it is logged.
  fn subscribe<F>(self, next: F) -> Subscription
  where
    F: FnMut(Self::Item) + Send + 'static,
  {
    self.subscribe_with(FnMutObserver(next))
  }

  fn subscribe_all<N, E, C>(self, next: N, error: E, complete: C) -> Subscription
  where
    N: FnMut(Self::Item) + Send + 'static,
    E: FnMut(RxError) + Send + 'static,
    C: FnMut() + Send + 'static,
  {
    self.subscribe_with(ObserverAll { next, error, complete })
  }

  /// Subscribe with a callback receiving every notification as an [`Event`].
  fn subscribe_event<F>(self, f: F) -> Subscription
  where
    F: FnMut(Event<Self::Item>) + Send + 'static,
  {
    self.subscribe_with(EventObserver(f))
  }

  fn subscribe_with<O>(self, observer: O) -> Subscription
  where
    O: Observer<Self::Item> + 'static,
  {
    let subscription = Subscription::new();
    let subscriber = Subscriber::new(observer, subscription.clone());
    let upstream = self.actual_subscribe(subscriber);
    subscription.add(upstream);
    subscription
  }

  fn map<B, F>(self, f: F) -> MapOp<Self, F>
  where
    F: FnMut(Self::Item) -> B + Clone + Send + 'static,
    B: Send + 'static,
  {
    MapOp { source: self, func: f }
  }

  /// Like `map`, but a failing `f` ends the stream with an upstream error.
  fn try_map<B, E, F>(self, f: F) -> TryMapOp<Self, F>
  where
    F: FnMut(Self::Item) -> Result<B, E> + Clone + Send + 'static,
    E: Into<anyhow::Error>,
    B: Send + 'static,
  {
    TryMapOp { source: self, func: f }
  }

  /// Emit every intermediate accumulator.
  fn scan<B, F>(self, seed: B, f: F) -> ScanOp<Self, F, B>
  where
    F: FnMut(B, Self::Item) -> B + Clone + Send + 'static,
    B: Clone + Send + 'static,
  {
    ScanOp { source: self, func: f, seed }
  }

  fn try_scan<B, E, F>(self, seed: B, f: F) -> TryScanOp<Self, F, B>
  where
    F: FnMut(B, Self::Item) -> Result<B, E> + Clone + Send + 'static,
    E: Into<anyhow::Error>,
    B: Clone + Send + 'static,
  {
    TryScanOp { source: self, func: f, seed }
  }

  /// Emit only the final accumulator, once the source completes.
  fn reduce<B, F>(self, seed: B, f: F) -> ReduceOp<Self, F, B>
  where
    F: FnMut(B, Self::Item) -> B + Clone + Send + 'static,
    B: Clone + Send + 'static,
  {
    ReduceOp { source: self, func: f, seed }
  }

  /// Collect every element into one `Vec` emitted on completion.
  fn to_vec(self) -> ToVecOp<Self> { ToVecOp { source: self } }

  fn filter<F>(self, predicate: F) -> FilterOp<Self, F>
  where
    F: FnMut(&Self::Item) -> bool + Clone + Send + 'static,
  {
    FilterOp { source: self, predicate }
  }

  fn try_filter<E, F>(self, predicate: F) -> TryFilterOp<Self, F>
  where
    F: FnMut(&Self::Item) -> Result<bool, E> + Clone + Send + 'static,
    E: Into<anyhow::Error>,
  {
    TryFilterOp { source: self, predicate }
  }

  /// Drop elements equal to the one emitted right before them.
  fn distinct_until_changed(self) -> DistinctUntilChangedOp<Self>
  where
    Self::Item: PartialEq + Clone,
  {
    DistinctUntilChangedOp { source: self }
  }

  /// Emit only the element at `index`, then complete.
  fn element_at(self, index: usize) -> ElementAtOp<Self> { ElementAtOp { source: self, index } }

  fn take(self, count: usize) -> TakeOp<Self> { TakeOp { source: self, count } }

  /// Emit the last `count` elements once the source completes.
  fn take_last(self, count: usize) -> TakeLastOp<Self> { TakeLastOp { source: self, count } }

  /// Emit while `predicate` holds; the first failure completes the stream.
  fn take_while<F>(self, predicate: F) -> TakeWhileOp<Self, F>
  where
    F: FnMut(&Self::Item) -> bool + Clone + Send + 'static,
  {
    TakeWhileOp { source: self, predicate }
  }

  /// Complete as soon as `notifier` emits.
  fn take_until<N: Observable>(self, notifier: N) -> TakeUntilOp<Self, N> {
    TakeUntilOp { source: self, notifier }
  }

  fn skip(self, count: usize) -> SkipOp<Self> { SkipOp { source: self, count } }

  /// Drop elements while `predicate` holds; everything after the first
  /// failure passes.
  fn skip_while<F>(self, predicate: F) -> SkipWhileOp<Self, F>
  where
    F: FnMut(&Self::Item) -> bool + Clone + Send + 'static,
  {
    SkipWhileOp { source: self, predicate }
  }

  /// Drop elements until `notifier` emits.
  fn skip_until<N: Observable>(self, notifier: N) -> SkipUntilOp<Self, N> {
    SkipUntilOp { source: self, notifier }
  }

  /// Expect exactly one element.
  fn single(self) -> SingleOp<Self, fn(&Self::Item) -> bool> {
    SingleOp { source: self, predicate: |_| true }
  }

  /// Expect exactly one element satisfying `predicate`.
  fn single_where<F>(self, predicate: F) -> SingleOp<Self, F>
  where
    F: FnMut(&Self::Item) -> bool + Clone + Send + 'static,
  {
    SingleOp { source: self, predicate }
  }

  /// Pair every element with its index.
  fn enumerate(self) -> EnumerateOp<Self> { EnumerateOp { source: self } }

  /// Emit `values` before the source. Chained calls prepend, so the last
  /// call's values come first.
  fn start_with(self, values: Vec<Self::Item>) -> StartWithOp<Self>
  where
    Self::Item: Clone,
  {
    StartWithOp { source: self, values }
  }

  /// Interleave the elements of both streams as they arrive.
  fn merge<S>(self, other: S) -> MergeOp<Self::Item>
  where
    S: Observable<Item = Self::Item>,
  {
    crate::observable::from_iter([self.box_it(), other.box_it()]).merge_all(usize::MAX)
  }

  /// Emit `other`'s elements after this stream completes.
  fn concat<S>(self, other: S) -> MergeOp<Self::Item>
  where
    S: Observable<Item = Self::Item>,
  {
    crate::observable::from_iter([self.box_it(), other.box_it()]).concat_all()
  }

  /// Flatten a stream of streams, running at most `concurrent` inner streams
  /// at once. Further inner streams wait in arrival order.
  fn merge_all(self, concurrent: usize) -> MergeAllOp<Self>
  where
    Self::Item: Observable,
  {
    MergeAllOp { source: self, concurrent: concurrent.max(1) }
  }

  /// Flatten a stream of streams one after another.
  fn concat_all(self) -> MergeAllOp<Self>
  where
    Self::Item: Observable,
  {
    self.merge_all(1)
  }

  fn flat_map<Inner, F>(self, f: F) -> MergeAllOp<MapOp<Self, F>>
  where
    F: FnMut(Self::Item) -> Inner + Clone + Send + 'static,
    Inner: Observable,
  {
    self.map(f).merge_all(usize::MAX)
  }

  /// Mirror only the most recent inner stream.
  fn switch_on_next(self) -> SwitchOnNextOp<Self>
  where
    Self::Item: Observable,
  {
    SwitchOnNextOp { source: self }
  }

  fn flat_map_latest<Inner, F>(self, f: F) -> SwitchOnNextOp<MapOp<Self, F>>
  where
    F: FnMut(Self::Item) -> Inner + Clone + Send + 'static,
    Inner: Observable,
  {
    self.map(f).switch_on_next()
  }

  fn zip<S: Observable>(self, other: S) -> ZipOp<Self, S> { ZipOp { a: self, b: other } }

  fn combine_latest<S>(self, other: S) -> CombineLatestOp<Self, S>
  where
    S: Observable,
    Self::Item: Clone,
    S::Item: Clone,
  {
    CombineLatestOp { a: self, b: other }
  }

  /// Pair every element with the latest element of `other`. Elements that
  /// arrive before `other` emitted anything are dropped.
  fn with_latest_from<S>(self, other: S) -> WithLatestFromOp<Self, S>
  where
    S: Observable,
    S::Item: Clone,
  {
    WithLatestFromOp { source: self, other }
  }

  /// On the first error, continue with the stream `handler` returns for it.
  fn catch_error<S, F>(self, handler: F) -> CatchOp<Self, F>
  where
    S: Observable<Item = Self::Item>,
    F: FnMut(RxError) -> S + Clone + Send + 'static,
  {
    CatchOp { source: self, handler }
  }

  /// On error, emit `value` and complete.
  fn catch_and_return(self, value: Self::Item) -> CatchAndReturnOp<Self>
  where
    Self::Item: Clone,
  {
    CatchAndReturnOp { source: self, value }
  }

  /// Resubscribe on error as `policy` allows. A plain `usize` is the total
  /// number of attempts.
  fn retry<P: RetryPolicy>(self, policy: P) -> RetryOp<Self, P> { RetryOp { source: self, policy } }

  fn retry_forever(self) -> RetryOp<Self, RetryConfig> { self.retry(RetryConfig::new()) }

  /// Observe every value without changing the stream.
  fn tap<F>(self, f: F) -> TapOp<Self, F, fn(&RxError), fn()>
  where
    F: FnMut(&Self::Item) + Clone + Send + 'static,
  {
    TapOp { source: self, on_next: f, on_error: |_| {}, on_complete: || {} }
  }

  fn tap_all<N, E, C>(self, on_next: N, on_error: E, on_complete: C) -> TapOp<Self, N, E, C>
  where
    N: FnMut(&Self::Item) + Clone + Send + 'static,
    E: FnMut(&RxError) + Clone + Send + 'static,
    C: FnMut() + Clone + Send + 'static,
  {
    TapOp { source: self, on_next, on_error, on_complete }
  }

  /// Log subscribe, every event and dispose at debug level under `id`.
  fn debug(self, id: impl Into<String>) -> DebugOp<Self, TracingSink>
  where
    Self::Item: std::fmt::Debug,
  {
    self.debug_with(id, TracingSink)
  }

  /// Like `debug`, but hand every line to `sink`.
  fn debug_with<K>(self, id: impl Into<String>, sink: K) -> DebugOp<Self, K>
  where
    K: DebugSink,
    Self::Item: std::fmt::Debug,
  {
    DebugOp { source: self, id: id.into(), sink }
  }

  /// Shift values and completion by `delay` on `scheduler`. Errors are not
  /// delayed.
  fn delay<Sch: Scheduler>(self, delay: Duration, scheduler: Sch) -> DelayOp<Self, Sch> {
    DelayOp { source: self, delay, scheduler }
  }

  /// Deliver events to the observer on `scheduler`.
  fn observe_on<Sch: Scheduler>(self, scheduler: Sch) -> ObserveOnOp<Self, Sch> {
    ObserveOnOp { source: self, scheduler }
  }

  /// Start the production on `scheduler`.
  fn subscribe_on<Sch: Scheduler>(self, scheduler: Sch) -> SubscribeOnOp<Self, Sch> {
    SubscribeOnOp { source: self, scheduler }
  }

  /// Pull the stream as an async sequence of results.
  fn values(self) -> ObservableStream<Self::Item> { ObservableStream::new(self) }

  /// Await the only element of the stream.
  fn value(self) -> ObservableFuture<Self::Item> { ObservableFuture::new(self.single()) }

  /// Await at most one element: `None` for an empty stream, an error for a
  /// second element.
  fn first_value(self) -> FirstValueFuture<Self::Item> { FirstValueFuture::new(self) }

  /// Await termination, discarding values.
  fn completion(self) -> ObservableFuture<()> { ObservableFuture::new(self.reduce((), |_, _| ())) }

  fn box_it(self) -> BoxedObservable<Self::Item> { BoxedObservable::new(self) }

  /// Share one production among many observers through `hub`, once
  /// connected.
  fn multicast<H: Hub<Self::Item>>(self, hub: H) -> ConnectableObservable<Self, H> {
    ConnectableObservable::new(self, hub)
  }

  fn publish(self) -> ConnectableObservable<Self, PublishSubject<Self::Item>>
  where
    Self::Item: Clone,
  {
    self.multicast(PublishSubject::new())
  }

  /// Like `publish`, but late observers receive the last `capacity` values.
  fn replay(self, capacity: usize) -> ConnectableObservable<Self, ReplaySubject<Self::Item>>
  where
    Self::Item: Clone,
  {
    self.multicast(ReplaySubject::new(capacity))
  }

  /// `publish().ref_count()`.
  fn share(self) -> RefCountOp<Self, PublishSubject<Self::Item>>
  where
    Self::Item: Clone,
  {
    self.publish().ref_count()
  }

  fn share_replay(self, capacity: usize) -> RefCountOp<Self, ReplaySubject<Self::Item>>
  where
    Self::Item: Clone,
  {
    self.replay(capacity).ref_count()
  }
}

impl<T: Observable> ObservableExt for T {}
