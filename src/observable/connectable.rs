//! Broadcasting one upstream subscription to many observers.
//!
//! A [`ConnectableObservable`] pairs a source with a hub. Observers attach
//! to the hub and see nothing until [`ConnectableObservable::connect`]
//! subscribes the hub to the source. What a late observer receives depends
//! on the hub: nothing retroactive for a publish hub, buffered values for a
//! replay hub.
//!
//! ```rust
//! use rxstream::prelude::*;
//! use std::sync::{Arc, Mutex};
//!
//! let log = Arc::new(Mutex::new(vec![]));
//! let shared = observable::from_iter(vec![1, 2, 3]).publish();
//! for name in ["a", "b"] {
//!   let log = log.clone();
//!   shared.clone().subscribe(move |v| log.lock().unwrap().push(format!("{name}{v}")));
//! }
//! assert!(log.lock().unwrap().is_empty());
//! shared.connect();
//! assert_eq!(*log.lock().unwrap(), vec!["a1", "b1", "a2", "b2", "a3", "b3"]);
//! ```
use crate::{
  observable::Observable,
  observer::Observer,
  rc::MutArc,
  subject::Hub,
  subscription::{Subscription, SubscriptionLike},
};

/// A source that only starts producing, into its hub, once connected.
pub struct ConnectableObservable<S, H> {
  source: S,
  hub: H,
  connection: MutArc<Option<Subscription>>,
}

impl<S: Clone, H: Clone> Clone for ConnectableObservable<S, H> {
  fn clone(&self) -> Self {
    ConnectableObservable {
      source: self.source.clone(),
      hub: self.hub.clone(),
      connection: self.connection.clone(),
    }
  }
}

impl<S, H> ConnectableObservable<S, H>
where
  S: Observable,
  H: Hub<S::Item>,
{
  pub fn new(source: S, hub: H) -> Self {
    ConnectableObservable { source, hub, connection: MutArc::default() }
  }

  pub fn hub(&self) -> &H { &self.hub }

  /// Subscribe the hub to the source. While that connection is open, later
  /// calls return the same handle without subscribing again; once it is
  /// cancelled, the next call starts a fresh upstream subscription.
  pub fn connect(&self) -> Subscription {
    let connection = {
      let mut slot = self.connection.rc_deref_mut();
      if let Some(open) = slot.as_ref().filter(|c| !c.is_closed()) {
        return open.clone();
      }
      let connection = Subscription::new();
      *slot = Some(connection.clone());
      connection
    };
    tracing::trace!("connectable observable connecting");
    let upstream = self.source.clone().actual_subscribe(self.hub.clone());
    connection.add(upstream);
    connection
  }

  pub fn is_connected(&self) -> bool {
    self.connection.rc_deref_mut().as_ref().is_some_and(|c| !c.is_closed())
  }

  /// Connect when the first observer attaches and cancel the connection when
  /// the last one leaves.
  pub fn ref_count(self) -> RefCountOp<S, H> {
    RefCountOp { connectable: self, state: MutArc::own(RefCountState { count: 0, connection: None }) }
  }
}

impl<S, H> Observable for ConnectableObservable<S, H>
where
  S: Observable,
  H: Hub<S::Item>,
{
  type Item = S::Item;

  fn actual_subscribe<O>(self, observer: O) -> Subscription
  where
    O: Observer<Self::Item> + 'static,
  {
    self.hub.actual_subscribe(observer)
  }
}

struct RefCountState {
  count: usize,
  connection: Option<Subscription>,
}

/// A connectable observable that manages its own connection by counting
/// attached observers.
pub struct RefCountOp<S, H> {
  connectable: ConnectableObservable<S, H>,
  state: MutArc<RefCountState>,
}

impl<S: Clone, H: Clone> Clone for RefCountOp<S, H> {
  fn clone(&self) -> Self {
    RefCountOp { connectable: self.connectable.clone(), state: self.state.clone() }
  }
}

impl<S, H> Observable for RefCountOp<S, H>
where
  S: Observable,
  H: Hub<S::Item>,
{
  type Item = S::Item;

  fn actual_subscribe<O>(self, observer: O) -> Subscription
  where
    O: Observer<Self::Item> + 'static,
  {
    let attached = self.connectable.hub.clone().actual_subscribe(observer);
    let first = {
      let mut state = self.state.rc_deref_mut();
      state.count += 1;
      state.count == 1
    };
    if first {
      let connection = self.connectable.connect();
      let mut state = self.state.rc_deref_mut();
      if state.count == 0 {
        drop(state);
        connection.unsubscribe();
      } else {
        state.connection = Some(connection);
      }
    }
    let state = self.state.clone();
    attached.add_teardown(move || {
      let last = {
        let mut state = state.rc_deref_mut();
        state.count = state.count.saturating_sub(1);
        if state.count == 0 { state.connection.take() } else { None }
      };
      if let Some(connection) = last {
        connection.unsubscribe();
      }
    });
    attached
  }
}
