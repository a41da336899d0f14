//! Broadcast hubs: streams that are also sinks.
//!
//! Every hub fans pushed events out, in attachment order, to the observers
//! attached at that moment. Variants differ in what an observer receives
//! when it attaches:
//!
//! - [`PublishSubject`]: nothing retroactive.
//! - [`BehaviorSubject`]: the latest value, or the seed.
//! - [`ReplaySubject`]: the last `n` values.
//! - [`PublishRelay`] / [`BehaviorRelay`]: like the subjects above, but they
//!   never terminate; their sink side only accepts values.
//!
//! Once a subject terminates it stays terminated, and later observers only
//! receive the terminal event.
use crate::{
  error::RxError,
  observable::Observable,
  observer::{Event, Observer},
  subscription::Subscription,
};

mod subject_core;
use subject_core::{Latest, Nothing, ReplayBuffer, SubjectCore};
mod relay;
pub use relay::{BehaviorRelay, PublishRelay};

/// Anything usable as the hub of a connectable broadcast.
pub trait Hub<Item>: Observer<Item> + Observable<Item = Item> {}

impl<Item, T> Hub<Item> for T where T: Observer<Item> + Observable<Item = Item> {}

macro_rules! impl_subject {
  ($ty:ident) => {
    impl<Item: Clone + Send + 'static> $ty<Item> {
      /// Number of attached observers.
      pub fn observer_count(&self) -> usize { self.core.observer_count() }

      /// Detach all observers and ignore any later push.
      pub fn dispose(&self) { self.core.dispose() }

      pub fn is_disposed(&self) -> bool { self.core.is_disposed() }
    }

    impl<Item> Clone for $ty<Item> {
      fn clone(&self) -> Self { $ty { core: self.core.clone() } }
    }

    impl<Item: Clone + Send + 'static> Observer<Item> for $ty<Item> {
      #[inline]
      fn next(&mut self, value: Item) { self.core.push(Event::Next(value)); }

      #[inline]
      fn error(&mut self, err: RxError) { self.core.push(Event::Error(err)); }

      #[inline]
      fn complete(&mut self) { self.core.push(Event::Completed); }

      fn is_closed(&self) -> bool { self.core.is_terminated() }
    }

    impl<Item: Clone + Send + 'static> Observable for $ty<Item> {
      type Item = Item;

      fn actual_subscribe<O>(self, observer: O) -> Subscription
      where
        O: Observer<Item> + 'static,
      {
        self.core.attach(observer)
      }
    }
  };
}

/// Relays events to the observers attached when they are pushed.
///
/// ```rust
/// use rxstream::prelude::*;
///
/// let mut subject = PublishSubject::new();
/// subject.clone().subscribe(|v| println!("Subscription: 1 Event: {v}"));
/// subject.next("🐶");
/// subject.next("🐱");
///
/// subject.clone().subscribe(|v| println!("Subscription: 2 Event: {v}"));
/// subject.next("🅰️");
/// subject.next("🅱️");
/// ```
pub struct PublishSubject<Item> {
  core: SubjectCore<Item, Nothing>,
}

impl<Item: Clone + Send + 'static> PublishSubject<Item> {
  pub fn new() -> Self { PublishSubject { core: SubjectCore::new(Nothing) } }
}

impl<Item: Clone + Send + 'static> Default for PublishSubject<Item> {
  fn default() -> Self { Self::new() }
}

impl_subject!(PublishSubject);

/// Starts with a seed and hands its latest value to each new observer.
pub struct BehaviorSubject<Item> {
  core: SubjectCore<Item, Latest<Item>>,
}

impl<Item: Clone + Send + 'static> BehaviorSubject<Item> {
  pub fn new(seed: Item) -> Self {
    BehaviorSubject { core: SubjectCore::new(Latest(seed)) }
  }

  /// The latest value, or the error the subject terminated with.
  pub fn current_value(&self) -> Result<Item, RxError> {
    match self.core.error() {
      Some(err) => Err(err),
      None if self.core.is_disposed() => Err(RxError::invalid_operation("subject is disposed")),
      None => Ok(self.core.latest()),
    }
  }
}

impl_subject!(BehaviorSubject);

/// Buffers the last `capacity` values and replays them to new observers.
pub struct ReplaySubject<Item> {
  core: SubjectCore<Item, ReplayBuffer<Item>>,
}

impl<Item: Clone + Send + 'static> ReplaySubject<Item> {
  pub fn new(capacity: usize) -> Self {
    ReplaySubject { core: SubjectCore::new(ReplayBuffer::new(capacity)) }
  }

  /// Replays every value ever pushed.
  pub fn unbounded() -> Self { Self::new(usize::MAX) }
}

impl_subject!(ReplaySubject);

#[cfg(test)]
mod tests {
  use crate::prelude::*;
  use std::{
    sync::{Arc, Mutex},
    thread,
  };

  type Log = Arc<Mutex<Vec<String>>>;

  fn attach<S: Observable<Item = &'static str>>(subject: &S, name: &'static str, log: &Log) -> Subscription {
    let log = log.clone();
    subject
      .clone()
      .subscribe_event(move |e| log.lock().unwrap().push(format!("{name}: {e}")))
  }

  #[test]
  fn publish_only_forwards_live_events() {
    let log = Log::default();
    let mut subject = PublishSubject::new();
    attach(&subject, "1", &log);
    subject.next("🐶");
    subject.next("🐱");
    attach(&subject, "2", &log);
    subject.next("🐭");
    assert_eq!(
      *log.lock().unwrap(),
      vec![
        "1: next(\"🐶\")",
        "1: next(\"🐱\")",
        "1: next(\"🐭\")",
        "2: next(\"🐭\")",
      ]
    );
  }

  #[test]
  fn behavior_seed_without_push() {
    let log = Log::default();
    let subject = BehaviorSubject::new("🔴");
    attach(&subject, "1", &log);
    assert_eq!(*log.lock().unwrap(), vec!["1: next(\"🔴\")"]);
    assert_eq!(subject.current_value(), Ok("🔴"));
  }

  #[test]
  fn behavior_latest_value() {
    let log = Log::default();
    let mut subject = BehaviorSubject::new("🔴");
    subject.next("🐶");
    subject.next("🐱");
    attach(&subject, "1", &log);
    assert_eq!(*log.lock().unwrap(), vec!["1: next(\"🐱\")"]);
    subject.error(RxError::msg("boom"));
    assert_eq!(subject.current_value(), Err(RxError::msg("boom")));
  }

  #[test]
  fn replay_one() {
    let log = Log::default();
    let mut subject = ReplaySubject::new(1);
    attach(&subject, "1", &log);
    subject.next("🐶");
    subject.next("🐱");
    attach(&subject, "2", &log);
    subject.next("🐭");
    assert_eq!(
      *log.lock().unwrap(),
      vec![
        "1: next(\"🐶\")",
        "1: next(\"🐱\")",
        "2: next(\"🐱\")",
        "1: next(\"🐭\")",
        "2: next(\"🐭\")",
      ]
    );
  }

  #[test]
  fn terminal_is_sticky_and_retained() {
    let log = Log::default();
    let mut subject = ReplaySubject::unbounded();
    subject.next("🐶");
    subject.complete();
    subject.next("🐱");
    subject.error(RxError::EmptySequence);
    attach(&subject, "late", &log);
    assert_eq!(*log.lock().unwrap(), vec!["late: completed"]);
    assert!(subject.is_closed());
  }

  #[test]
  fn unsubscribe_detaches_only_that_observer() {
    let log = Log::default();
    let mut subject = PublishSubject::new();
    let first = attach(&subject, "1", &log);
    attach(&subject, "2", &log);
    first.unsubscribe();
    subject.next("🐶");
    assert_eq!(*log.lock().unwrap(), vec!["2: next(\"🐶\")"]);
    assert_eq!(subject.observer_count(), 1);
  }

  #[test]
  fn dispose_detaches_everyone() {
    let log = Log::default();
    let mut subject = PublishSubject::new();
    let a = attach(&subject, "1", &log);
    let c_log = log.clone();
    a.add_teardown(move || c_log.lock().unwrap().push("1 released".to_string()));
    let b = subject.clone().map(|v| v.len()).take(5).subscribe(|_| {});
    subject.dispose();
    assert!(a.is_closed());
    assert!(b.is_closed());
    subject.next("🐶");
    assert_eq!(*log.lock().unwrap(), vec!["1 released"]);
    assert_eq!(subject.observer_count(), 0);
  }

  fn attach_while_pushing<H>(hub: H, attachers: usize, count: usize) -> Vec<Vec<usize>>
  where
    H: Observer<usize> + Observable<Item = usize>,
  {
    let mut producer = hub.clone();
    let pusher = thread::spawn(move || {
      (0..count).for_each(|v| producer.next(v));
      producer.complete();
    });
    let logs: Vec<_> = (0..attachers)
      .map(|_| {
        let hub = hub.clone();
        let log = Arc::new(Mutex::new(vec![]));
        let c_log = log.clone();
        let attacher = thread::spawn(move || {
          hub.subscribe(move |v| c_log.lock().unwrap().push(v));
        });
        (attacher, log)
      })
      .collect();
    pusher.join().unwrap();
    logs
      .into_iter()
      .map(|(attacher, log)| {
        attacher.join().unwrap();
        let log = log.lock().unwrap().clone();
        log
      })
      .collect()
  }

  #[test]
  fn replay_attach_during_push_sees_every_value_once() {
    let count = 2_000;
    for log in attach_while_pushing(ReplaySubject::unbounded(), 8, count) {
      assert_eq!(log, (0..count).collect::<Vec<_>>());
    }
  }

  #[test]
  fn publish_attach_during_push_sees_a_gapless_suffix() {
    let count = 2_000;
    for log in attach_while_pushing(PublishSubject::new(), 8, count) {
      assert!(log.windows(2).all(|w| w[1] == w[0] + 1), "gap or duplicate in {log:?}");
      assert!(log.last().map_or(true, |v| *v == count - 1));
    }
  }

  #[test]
  fn attach_after_dispose_is_closed() {
    let log = Log::default();
    let subject = BehaviorSubject::new("🔴");
    subject.dispose();
    let late = attach(&subject, "late", &log);
    assert!(late.is_closed());
    assert!(log.lock().unwrap().is_empty());
    assert!(matches!(subject.current_value(), Err(RxError::InvalidOperation(_))));
  }

  #[test]
  fn observer_pushing_into_its_own_subject() {
    let log = Log::default();
    let subject = PublishSubject::new();
    let c_log = log.clone();
    let mut c_subject = subject.clone();
    subject.clone().subscribe(move |v: i32| {
      c_log.lock().unwrap().push(v.to_string());
      if v < 3 {
        c_subject.next(v + 1);
      }
    });
    subject.clone().next(1);
    assert_eq!(*log.lock().unwrap(), vec!["1", "2", "3"]);
  }
}
