use crate::{observable::Observable, observer::Observer, subscription::Subscription};

/// Builds a fresh stream for every subscription.
#[derive(Clone)]
pub struct Defer<F>(F);

/// Creates an observable that calls `f` to build the actual source each time
/// it is subscribed.
///
/// ```rust
/// use rxstream::prelude::*;
/// use std::sync::{atomic::{AtomicUsize, Ordering}, Arc};
///
/// let builds = Arc::new(AtomicUsize::new(0));
/// let c_builds = builds.clone();
/// let deferred = observable::defer(move || {
///   observable::of(c_builds.fetch_add(1, Ordering::SeqCst))
/// });
/// deferred.clone().subscribe(|v| assert_eq!(v, 0));
/// deferred.subscribe(|v| assert_eq!(v, 1));
/// assert_eq!(builds.load(Ordering::SeqCst), 2);
/// ```
pub fn defer<F, S>(f: F) -> Defer<F>
where
  F: FnMut() -> S + Clone + Send + 'static,
  S: Observable,
{
  Defer(f)
}

impl<F, S> Observable for Defer<F>
where
  F: FnMut() -> S + Clone + Send + 'static,
  S: Observable,
{
  type Item = S::Item;

  fn actual_subscribe<O>(mut self, observer: O) -> Subscription
  where
    O: Observer<Self::Item> + 'static,
  {
    (self.0)().actual_subscribe(observer)
  }
}
