use std::fmt::Debug;

use crate::{
  error::RxError,
  observable::Observable,
  observer::{Event, Observer},
  subscription::Subscription,
};

/// Where [`DebugOp`] writes its lines.
pub trait DebugSink: Clone + Send + 'static {
  fn write(&mut self, line: String);
}

/// Writes every line as a `tracing` debug record.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DebugSink for TracingSink {
  fn write(&mut self, line: String) { tracing::debug!(target: "rxstream::debug", "{line}") }
}

impl<F> DebugSink for F
where
  F: FnMut(String) + Clone + Send + 'static,
{
  fn write(&mut self, line: String) { self(line) }
}

/// Describes subscribe, every event and dispose of the wrapped stream,
/// prefixed with `id`:
///
/// ```text
/// ticks -> subscribed
/// ticks -> Event next(0)
/// ticks -> Event completed
/// ticks -> isDisposed
/// ```
#[derive(Clone)]
pub struct DebugOp<S, K> {
  pub(crate) source: S,
  pub(crate) id: String,
  pub(crate) sink: K,
}

impl<S, K> Observable for DebugOp<S, K>
where
  S: Observable,
  S::Item: Debug,
  K: DebugSink,
{
  type Item = S::Item;

  fn actual_subscribe<O>(mut self, observer: O) -> Subscription
  where
    O: Observer<S::Item> + 'static,
  {
    self.sink.write(format!("{} -> subscribed", self.id));
    let observer = DebugObserver { observer, id: self.id.clone(), sink: self.sink.clone() };
    let subscription = Subscription::new();
    subscription.add(self.source.actual_subscribe(observer));
    let (id, mut sink) = (self.id, self.sink);
    subscription.add_teardown(move || sink.write(format!("{id} -> isDisposed")));
    subscription
  }
}

pub struct DebugObserver<O, K> {
  observer: O,
  id: String,
  sink: K,
}

impl<O, K> DebugObserver<O, K>
where
  K: DebugSink,
{
  fn log<Item: Debug>(&mut self, event: &Event<Item>) {
    self.sink.write(format!("{} -> Event {event}", self.id));
  }
}

impl<Item, O, K> Observer<Item> for DebugObserver<O, K>
where
  Item: Debug,
  O: Observer<Item>,
  K: DebugSink,
{
  fn next(&mut self, value: Item) {
    let event = Event::Next(value);
    self.log(&event);
    event.dispatch(&mut self.observer);
  }

  fn error(&mut self, err: RxError) {
    let event = Event::<Item>::Error(err);
    self.log(&event);
    event.dispatch(&mut self.observer);
  }

  fn complete(&mut self) {
    self.log(&Event::<Item>::Completed);
    self.observer.complete();
  }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

#[cfg(test)]
mod tests {
  use crate::prelude::*;
  use std::sync::{Arc, Mutex};

  #[test]
  fn describes_lifecycle() {
    let lines = Arc::new(Mutex::new(vec![]));
    let c_lines = lines.clone();
    observable::from_iter(vec![1, 2])
      .debug_with("nums", move |line: String| c_lines.lock().unwrap().push(line))
      .subscribe(|_| {});
    assert_eq!(
      *lines.lock().unwrap(),
      vec![
        "nums -> subscribed",
        "nums -> Event next(1)",
        "nums -> Event next(2)",
        "nums -> Event completed",
        "nums -> isDisposed",
      ]
    );
  }

  #[test]
  fn dispose_is_reported_on_cancel() {
    let lines = Arc::new(Mutex::new(vec![]));
    let c_lines = lines.clone();
    let subscription = observable::never::<i32>()
      .debug_with("idle", move |line: String| c_lines.lock().unwrap().push(line))
      .subscribe(|_| {});
    assert_eq!(*lines.lock().unwrap(), vec!["idle -> subscribed"]);
    subscription.unsubscribe();
    assert_eq!(*lines.lock().unwrap(), vec!["idle -> subscribed", "idle -> isDisposed"]);
  }

  #[test]
  fn tracing_sink_accepts_lines() {
    observable::of("🐶").debug("pets").subscribe(|_| {});
  }
}
