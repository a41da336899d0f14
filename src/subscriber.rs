use std::{
  collections::VecDeque,
  sync::{Arc, Mutex},
};

use crate::{
  error::RxError,
  observer::{Event, Observer},
  rc::lock,
  subscription::{Subscription, SubscriptionLike},
};

/// The serialized boundary between a producer and one observer.
///
/// Every subscribe call wraps its observer in a `Subscriber`. Producers may
/// push from several threads, or re-entrantly from inside the observer's own
/// callback; events are queued and a single drain loop delivers them one at a
/// time, so the observer is never invoked concurrently. Once a terminal event
/// is delivered, or the subscription is cancelled, nothing else gets through.
pub struct Subscriber<Item> {
  shared: Arc<Shared<Item>>,
  subscription: Subscription,
}

struct Shared<Item> {
  queue: Mutex<Queue<Item>>,
  observer: Mutex<Box<dyn Observer<Item>>>,
}

struct Queue<Item> {
  pending: VecDeque<Event<Item>>,
  draining: bool,
  stopped: bool,
}

impl<Item: Send + 'static> Subscriber<Item> {
  pub fn new(observer: impl Observer<Item> + 'static, subscription: Subscription) -> Self {
    let queue = Queue { pending: VecDeque::new(), draining: false, stopped: false };
    Subscriber {
      shared: Arc::new(Shared { queue: Mutex::new(queue), observer: Mutex::new(Box::new(observer)) }),
      subscription,
    }
  }

  /// The handle that cancels this subscriber.
  #[inline]
  pub fn subscription(&self) -> &Subscription { &self.subscription }

  /// Queue an event without delivering it. Returns `false` if the subscriber
  /// already saw a terminal event or was cancelled.
  pub fn enqueue(&self, event: Event<Item>) -> bool {
    let mut queue = lock(&self.shared.queue);
    if queue.stopped || self.subscription.is_closed() {
      return false;
    }
    if event.is_terminal() {
      queue.stopped = true;
    }
    queue.pending.push_back(event);
    true
  }

  /// Deliver queued events. If another call is already draining, it will
  /// pick up the events queued here and this call returns immediately.
  pub fn drain(&self) {
    {
      let mut queue = lock(&self.shared.queue);
      if queue.draining {
        return;
      }
      queue.draining = true;
    }
    loop {
      let event = {
        let mut queue = lock(&self.shared.queue);
        let next = if self.subscription.is_closed() { None } else { queue.pending.pop_front() };
        match next {
          Some(event) => event,
          None => {
            queue.pending.clear();
            queue.draining = false;
            return;
          }
        }
      };
      let terminal = event.is_terminal();
      let observer_closed = {
        let mut observer = lock(&self.shared.observer);
        event.dispatch(&mut **observer);
        observer.is_closed()
      };
      // an observer that closed itself, like a finished `take`, wants nothing more
      if terminal || observer_closed {
        lock(&self.shared.queue).stopped = true;
        self.subscription.unsubscribe();
      }
    }
  }

  /// Queue and deliver one event.
  pub fn emit(&self, event: Event<Item>) {
    if self.enqueue(event) {
      self.drain();
    }
  }
}

impl<Item> Clone for Subscriber<Item> {
  fn clone(&self) -> Self {
    Subscriber { shared: self.shared.clone(), subscription: self.subscription.clone() }
  }
}

impl<Item: Send + 'static> Observer<Item> for Subscriber<Item> {
  #[inline]
  fn next(&mut self, value: Item) { self.emit(Event::Next(value)) }

  #[inline]
  fn error(&mut self, err: RxError) { self.emit(Event::Error(err)) }

  #[inline]
  fn complete(&mut self) { self.emit(Event::Completed) }

  fn is_closed(&self) -> bool { lock(&self.shared.queue).stopped || self.subscription.is_closed() }
}

impl<Item> SubscriptionLike for Subscriber<Item> {
  #[inline]
  fn unsubscribe(&self) { self.subscription.unsubscribe() }

  #[inline]
  fn is_closed(&self) -> bool { self.subscription.is_closed() }
}
