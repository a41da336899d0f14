use std::collections::VecDeque;

use crate::{
  error::RxError,
  observer::{Event, Observer},
  rc::MutArc,
  subscriber::Subscriber,
  subscription::{DynamicSubscriptions, Subscription},
};

/// What a hub keeps for observers that attach later.
pub(crate) trait Retention<Item>: Send + 'static {
  fn record(&mut self, value: &Item);

  fn snapshot(&self) -> Vec<Item>;
}

/// Publish hubs keep nothing.
pub(crate) struct Nothing;

impl<Item> Retention<Item> for Nothing {
  fn record(&mut self, _: &Item) {}

  fn snapshot(&self) -> Vec<Item> { vec![] }
}

/// Behavior hubs keep the latest value, starting from a seed.
pub(crate) struct Latest<Item>(pub(crate) Item);

impl<Item: Clone + Send + 'static> Retention<Item> for Latest<Item> {
  fn record(&mut self, value: &Item) { self.0 = value.clone(); }

  fn snapshot(&self) -> Vec<Item> { vec![self.0.clone()] }
}

/// Replay hubs keep the last `capacity` values.
pub(crate) struct ReplayBuffer<Item> {
  capacity: usize,
  buffer: VecDeque<Item>,
}

impl<Item> ReplayBuffer<Item> {
  pub(crate) fn new(capacity: usize) -> Self { ReplayBuffer { capacity, buffer: VecDeque::new() } }
}

impl<Item: Clone + Send + 'static> Retention<Item> for ReplayBuffer<Item> {
  fn record(&mut self, value: &Item) {
    if self.capacity == 0 {
      return;
    }
    if self.buffer.len() == self.capacity {
      self.buffer.pop_front();
    }
    self.buffer.push_back(value.clone());
  }

  fn snapshot(&self) -> Vec<Item> { self.buffer.iter().cloned().collect() }
}

enum Status {
  Active,
  Errored(RxError),
  Completed,
}

struct HubState<Item, R> {
  observers: DynamicSubscriptions<Subscriber<Item>>,
  retained: R,
  status: Status,
  disposed: bool,
}

/// Shared state of every hub variant.
///
/// All attach, detach, push and status changes happen under the one lock of
/// the hub. Events are only queued on the attached subscribers while the
/// lock is held; delivery to observer code happens after it is released.
pub(crate) struct SubjectCore<Item, R>(MutArc<HubState<Item, R>>);

impl<Item, R> Clone for SubjectCore<Item, R> {
  fn clone(&self) -> Self { SubjectCore(self.0.clone()) }
}

impl<Item, R> SubjectCore<Item, R>
where
  Item: Clone + Send + 'static,
  R: Retention<Item>,
{
  pub(crate) fn new(retained: R) -> Self {
    SubjectCore(MutArc::own(HubState {
      observers: DynamicSubscriptions::new(),
      retained,
      status: Status::Active,
      disposed: false,
    }))
  }

  /// Broadcast `event` in attachment order. Returns `false` if the hub is
  /// already terminated or disposed.
  pub(crate) fn push(&self, event: Event<Item>) -> bool {
    let targets = {
      let mut state = self.0.rc_deref_mut();
      if state.disposed || !matches!(state.status, Status::Active) {
        return false;
      }
      let targets: Vec<_> = match &event {
        Event::Next(v) => {
          state.retained.record(v);
          state.observers.iter().cloned().collect()
        }
        Event::Error(e) => {
          state.status = Status::Errored(e.clone());
          state.observers.drain().collect()
        }
        Event::Completed => {
          state.status = Status::Completed;
          state.observers.drain().collect()
        }
      };
      for target in &targets {
        target.enqueue(event.clone());
      }
      targets
    };
    for target in targets {
      target.drain();
    }
    true
  }

  /// Attach `observer`: it first receives the retained content, or only the
  /// terminal event if the hub already ended.
  pub(crate) fn attach(&self, observer: impl Observer<Item> + 'static) -> Subscription {
    let subscriber = Subscriber::new(observer, Subscription::linked());
    let subscription = subscriber.subscription().clone();
    {
      let mut state = self.0.rc_deref_mut();
      let terminal = match &state.status {
        Status::Errored(e) => Some(Event::Error(e.clone())),
        Status::Completed => Some(Event::Completed),
        Status::Active => None,
      };
      if let Some(terminal) = terminal {
        subscriber.enqueue(terminal);
      } else if state.disposed {
        subscription.detach();
      } else {
        for v in state.retained.snapshot() {
          subscriber.enqueue(Event::Next(v));
        }
        let id = state.observers.add(subscriber.clone());
        let hub = self.0.downgrade();
        subscription.add_teardown(move || {
          if let Some(hub) = hub.upgrade() {
            let removed = hub.rc_deref_mut().observers.remove(id);
            drop(removed);
          }
        });
      }
    }
    subscriber.drain();
    subscription
  }

  /// Detach every observer and refuse further pushes. The handles the
  /// observers' owners hold are closed as well; no event is delivered.
  pub(crate) fn dispose(&self) {
    let detached = {
      let mut state = self.0.rc_deref_mut();
      state.disposed = true;
      state.observers.take_all()
    };
    for subscriber in detached {
      subscriber.subscription().detach();
    }
  }

  pub(crate) fn is_disposed(&self) -> bool { self.0.rc_deref_mut().disposed }

  pub(crate) fn is_terminated(&self) -> bool {
    let state = self.0.rc_deref_mut();
    state.disposed || !matches!(state.status, Status::Active)
  }

  pub(crate) fn observer_count(&self) -> usize { self.0.rc_deref_mut().observers.len() }

  /// The error the hub ended with, if any.
  pub(crate) fn error(&self) -> Option<RxError> {
    match &self.0.rc_deref_mut().status {
      Status::Errored(e) => Some(e.clone()),
      _ => None,
    }
  }
}

impl<Item: Clone + Send + 'static> SubjectCore<Item, Latest<Item>> {
  pub(crate) fn latest(&self) -> Item { self.0.rc_deref_mut().retained.0.clone() }
}
