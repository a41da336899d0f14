use super::{Latest, Nothing, SubjectCore};
use crate::{
  error::RxError,
  observable::Observable,
  observer::{Event, Observer},
  subscription::Subscription,
};

fn reject<Item>(event: &Event<Item>) -> RxError {
  let kind = if matches!(event, Event::Completed) { "completed" } else { "error" };
  tracing::warn!(event = kind, "relay rejected a terminal event");
  RxError::invalid_operation(format!("a relay cannot accept a {kind} event"))
}

macro_rules! impl_relay {
  ($ty:ident) => {
    impl<Item: Clone + Send + 'static> $ty<Item> {
      /// Broadcast a value.
      pub fn accept(&self, value: Item) { self.core.push(Event::Next(value)); }

      /// Push an event. Terminal events are refused with
      /// [`RxError::InvalidOperation`].
      pub fn push(&self, event: Event<Item>) -> Result<(), RxError> {
        match event {
          Event::Next(value) => {
            self.accept(value);
            Ok(())
          }
          terminal => Err(reject(&terminal)),
        }
      }

      pub fn observer_count(&self) -> usize { self.core.observer_count() }
    }

    impl<Item> Clone for $ty<Item> {
      fn clone(&self) -> Self { $ty { core: self.core.clone() } }
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

    /// Binding a stream to a relay forwards its values; its terminal event
    /// is dropped with a warning.
    impl<Item: Clone + Send + 'static> Observer<Item> for $ty<Item> {
      fn next(&mut self, value: Item) { self.accept(value) }

      fn error(&mut self, err: RxError) { let _ = reject::<Item>(&Event::Error(err)); }

      fn complete(&mut self) { let _ = reject::<Item>(&Event::Completed); }

      fn is_closed(&self) -> bool { false }
    }
  };
}

/// A [`PublishSubject`](crate::subject::PublishSubject) that can never
/// terminate.
pub struct PublishRelay<Item> {
  core: SubjectCore<Item, Nothing>,
}

impl<Item: Clone + Send + 'static> PublishRelay<Item> {
  pub fn new() -> Self { PublishRelay { core: SubjectCore::new(Nothing) } }
}

impl<Item: Clone + Send + 'static> Default for PublishRelay<Item> {
  fn default() -> Self { Self::new() }
}

impl_relay!(PublishRelay);

/// A [`BehaviorSubject`](crate::subject::BehaviorSubject) that can never
/// terminate, so its current value is always available.
pub struct BehaviorRelay<Item> {
  core: SubjectCore<Item, Latest<Item>>,
}

impl<Item: Clone + Send + 'static> BehaviorRelay<Item> {
  pub fn new(seed: Item) -> Self { BehaviorRelay { core: SubjectCore::new(Latest(seed)) } }

  /// The latest accepted value, or the seed.
  pub fn current_value(&self) -> Item { self.core.latest() }
}

impl_relay!(BehaviorRelay);

#[cfg(test)]
mod tests {
  use crate::prelude::*;
  use std::sync::{Arc, Mutex};

  #[test]
  fn relay_rejects_terminal_events() {
    let relay = PublishRelay::new();
    let out = Arc::new(Mutex::new(vec![]));
    let c_out = out.clone();
    relay.clone().subscribe_event(move |e| c_out.lock().unwrap().push(e));

    relay.accept("🐶");
    assert!(matches!(relay.push(Event::Completed), Err(RxError::InvalidOperation(_))));
    assert!(matches!(relay.push(Event::Error(RxError::msg("x"))), Err(RxError::InvalidOperation(_))));
    assert_eq!(relay.push(Event::Next("🐱")), Ok(()));
    assert_eq!(*out.lock().unwrap(), vec![Event::Next("🐶"), Event::Next("🐱")]);
  }

  #[test]
  fn behavior_relay_value() {
    let relay = BehaviorRelay::new(1);
    assert_eq!(relay.current_value(), 1);
    relay.accept(2);
    assert_eq!(relay.current_value(), 2);

    let out = Arc::new(Mutex::new(vec![]));
    let c_out = out.clone();
    relay.clone().subscribe(move |v| c_out.lock().unwrap().push(v));
    assert_eq!(*out.lock().unwrap(), vec![2]);
  }

  #[test]
  fn bound_stream_does_not_end_relay() {
    let relay = PublishRelay::new();
    let out = Arc::new(Mutex::new(vec![]));
    let c_out = out.clone();
    relay.clone().subscribe(move |v| c_out.lock().unwrap().push(v));
    observable::from_iter(vec![1, 2]).subscribe_with(relay.clone());
    relay.accept(3);
    assert_eq!(*out.lock().unwrap(), vec![1, 2, 3]);
  }
}
