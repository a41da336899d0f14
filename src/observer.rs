//! Events and the consumers that receive them.
//!
//! A stream emits `Next*` followed by at most one terminal event. An
//! [`Observer`] is the consumer side of that grammar; this module also
//! provides closure adapters so most callers never implement it by hand.
use std::fmt::{Debug, Display, Formatter};

use crate::error::RxError;

/// One notification of a stream.
#[derive(Debug, Clone, PartialEq)]
pub enum Event<Item> {
  Next(Item),
  Error(RxError),
  Completed,
}

impl<Item> Event<Item> {
  /// `Error` and `Completed` end a stream.
  #[inline]
  pub fn is_terminal(&self) -> bool { !matches!(self, Event::Next(_)) }

  pub fn value(&self) -> Option<&Item> {
    match self {
      Event::Next(v) => Some(v),
      _ => None,
    }
  }

  /// Deliver this event to `observer`.
  pub fn dispatch<O: Observer<Item> + ?Sized>(self, observer: &mut O) {
    match self {
      Event::Next(v) => observer.next(v),
      Event::Error(e) => observer.error(e),
      Event::Completed => observer.complete(),
    }
  }

  pub fn map<B>(self, f: impl FnOnce(Item) -> B) -> Event<B> {
    match self {
      Event::Next(v) => Event::Next(f(v)),
      Event::Error(e) => Event::Error(e),
      Event::Completed => Event::Completed,
    }
  }
}

impl<Item: Debug> Display for Event<Item> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      Event::Next(v) => write!(f, "next({v:?})"),
      Event::Error(e) => write!(f, "error({e})"),
      Event::Completed => write!(f, "completed"),
    }
  }
}

/// The consumer of a stream.
///
/// Callers of an observer uphold the event grammar: nothing follows `error`
/// or `complete`. Sources poll [`Observer::is_closed`] to stop producing once
/// the consumer has gone away.
pub trait Observer<Item>: Send {
  fn next(&mut self, value: Item);

  fn error(&mut self, err: RxError);

  fn complete(&mut self);

  fn is_closed(&self) -> bool;
}

impl<Item, O: Observer<Item> + ?Sized> Observer<Item> for Box<O> {
  #[inline]
  fn next(&mut self, value: Item) { (**self).next(value) }

  #[inline]
  fn error(&mut self, err: RxError) { (**self).error(err) }

  #[inline]
  fn complete(&mut self) { (**self).complete() }

  #[inline]
  fn is_closed(&self) -> bool { (**self).is_closed() }
}

/// Value-only observer. An error reaching it is unhandled and gets logged.
#[derive(Clone)]
pub struct FnMutObserver<F>(pub F);

impl<Item, F> Observer<Item> for FnMutObserver<F>
where
  F: FnMut(Item) + Send,
{
  #[inline]
  fn next(&mut self, value: Item) { (self.0)(value) }

  fn error(&mut self, err: RxError) { tracing::error!(error = %err, "unhandled stream error"); }

  fn complete(&mut self) {}

  fn is_closed(&self) -> bool { false }
}

/// Observer built from one closure per event kind.
#[derive(Clone)]
pub struct ObserverAll<N, E, C> {
  pub next: N,
  pub error: E,
  pub complete: C,
}

impl<Item, N, E, C> Observer<Item> for ObserverAll<N, E, C>
where
  N: FnMut(Item) + Send,
  E: FnMut(RxError) + Send,
  C: FnMut() + Send,
{
  #[inline]
  fn next(&mut self, value: Item) { (self.next)(value) }

  #[inline]
  fn error(&mut self, err: RxError) { (self.error)(err) }

  #[inline]
  fn complete(&mut self) { (self.complete)() }

  fn is_closed(&self) -> bool { false }
}

/// Observer that receives every notification as an [`Event`].
#[derive(Clone)]
pub struct EventObserver<F>(pub F);

impl<Item, F> Observer<Item> for EventObserver<F>
where
  F: FnMut(Event<Item>) + Send,
{
  fn next(&mut self, value: Item) { (self.0)(Event::Next(value)) }

  fn error(&mut self, err: RxError) { (self.0)(Event::Error(err)) }

  fn complete(&mut self) { (self.0)(Event::Completed) }

  fn is_closed(&self) -> bool { false }
}
