use std::{
  any::Any,
  fmt::{Debug, Formatter},
};

use smallvec::SmallVec;

use crate::{
  rc::{MutArc, WeakArc},
  resources::Tracked,
};

mod dynamic;
pub use dynamic::DynamicSubscriptions;

/// A handle that can stop an event flow and release what it acquired.
///
/// Cancelling is idempotent: calling `unsubscribe` again, or after the stream
/// terminated on its own, does nothing.
pub trait SubscriptionLike {
  fn unsubscribe(&self);

  fn is_closed(&self) -> bool;
}

enum Teardown {
  Handle(Box<dyn SubscriptionLike + Send>),
  Callback(Box<dyn FnOnce() + Send>),
}

impl Teardown {
  fn run(self) {
    match self {
      Teardown::Handle(handle) => handle.unsubscribe(),
      Teardown::Callback(f) => f(),
    }
  }

  fn is_closed(&self) -> bool {
    match self {
      Teardown::Handle(handle) => handle.is_closed(),
      Teardown::Callback(_) => false,
    }
  }
}

struct Inner {
  closed: bool,
  teardown: SmallVec<[Teardown; 1]>,
  link: Option<Link>,
  _tracked: Tracked,
}

/// Handles a linked subscription was added to, and whether it was already
/// detached from its source.
#[derive(Default)]
struct Link {
  parents: SmallVec<[WeakArc<Inner>; 1]>,
  detached: bool,
}

/// The cancellation handle returned by every subscribe call.
///
/// A `Subscription` is a composite: other handles and teardown callbacks can
/// be attached with [`Subscription::add`], and all of them run, once and in
/// the order they were added, when the subscription is cancelled. Clones
/// share the same state.
#[derive(Clone)]
pub struct Subscription(MutArc<Inner>);

impl Subscription {
  pub fn new() -> Self {
    Subscription(MutArc::own(Inner {
      closed: false,
      teardown: SmallVec::new(),
      link: None,
      _tracked: Tracked::new(),
    }))
  }

  /// A subscription that remembers the handles it is added to, so that its
  /// source can close them with [`Subscription::detach`].
  pub(crate) fn linked() -> Self {
    let subscription = Self::new();
    subscription.0.rc_deref_mut().link = Some(Link::default());
    subscription
  }

  /// Close this subscription and every handle it was added to, without a
  /// terminal event. Adding it somewhere afterwards closes the new parent
  /// right away.
  pub(crate) fn detach(&self) {
    let parents = {
      let mut inner = self.0.rc_deref_mut();
      match inner.link.as_mut() {
        Some(link) => {
          link.detached = true;
          std::mem::take(&mut link.parents)
        }
        None => SmallVec::new(),
      }
    };
    self.unsubscribe();
    for parent in parents.iter().filter_map(WeakArc::upgrade) {
      Subscription(parent).unsubscribe();
    }
  }

  /// A subscription that is already closed, for sources that finish during
  /// `subscribe` and hold nothing.
  pub fn empty() -> Self {
    let subscription = Self::new();
    subscription.0.rc_deref_mut().closed = true;
    subscription
  }

  /// A subscription whose cancellation runs `f`.
  pub fn from_fn(f: impl FnOnce() + Send + 'static) -> Self {
    let subscription = Self::new();
    subscription.add_teardown(f);
    subscription
  }

  /// Attach a child handle. If this subscription is already closed the child
  /// is cancelled right away.
  pub fn add<S: SubscriptionLike + Send + 'static>(&self, subscription: S) {
    if self.is_same(&subscription) {
      return;
    }
    let detached = (&subscription as &dyn Any)
      .downcast_ref::<Self>()
      .is_some_and(|child| child.link_parent(self));
    self.push(Teardown::Handle(Box::new(subscription)));
    if detached {
      self.unsubscribe();
    }
  }

  /// Record `parent` on a linked subscription. Returns `true` if this
  /// subscription was already detached.
  fn link_parent(&self, parent: &Self) -> bool {
    let mut inner = self.0.rc_deref_mut();
    match inner.link.as_mut() {
      Some(link) if link.detached => true,
      Some(link) => {
        link.parents.push(parent.0.downgrade());
        false
      }
      None => false,
    }
  }

  pub fn add_teardown(&self, f: impl FnOnce() + Send + 'static) {
    self.push(Teardown::Callback(Box::new(f)));
  }

  fn push(&self, teardown: Teardown) {
    let mut inner = self.0.rc_deref_mut();
    if inner.closed {
      drop(inner);
      teardown.run();
    } else {
      inner.teardown.retain(|t| !t.is_closed());
      inner.teardown.push(teardown);
    }
  }

  fn is_same(&self, other: &dyn Any) -> bool {
    other.downcast_ref::<Self>().is_some_and(|other| self.0.ptr_eq(&other.0))
  }

  pub fn teardown_size(&self) -> usize { self.0.rc_deref_mut().teardown.len() }

  /// Cancel the subscription when the returned guard goes out of scope.
  pub fn unsubscribe_when_dropped(self) -> SubscriptionGuard { SubscriptionGuard(self) }

  /// Hand the subscription to `bag`, which cancels it when the bag is dropped.
  pub fn disposed_by(self, bag: &DisposeBag) { bag.insert(self) }
}

impl Default for Subscription {
  fn default() -> Self { Self::new() }
}

impl SubscriptionLike for Subscription {
  fn unsubscribe(&self) {
    let teardown = {
      let mut inner = self.0.rc_deref_mut();
      if inner.closed {
        return;
      }
      inner.closed = true;
      std::mem::take(&mut inner.teardown)
    };
    for t in teardown {
      t.run();
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.0.rc_deref_mut().closed }
}

impl Debug for Subscription {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let inner = self.0.rc_deref_mut();
    f.debug_struct("Subscription")
      .field("closed", &inner.closed)
      .field("teardown_count", &inner.teardown.len())
      .finish()
  }
}

impl<T: SubscriptionLike + ?Sized> SubscriptionLike for Box<T> {
  #[inline]
  fn unsubscribe(&self) { (**self).unsubscribe() }

  #[inline]
  fn is_closed(&self) -> bool { (**self).is_closed() }
}

/// An RAII implementation of a "scoped subscribed" of a subscription.
/// When this structure is dropped (falls out of scope), the subscription will
/// be unsubscribed.
///
/// Implements `must_use` to prevent immediately dropping the guard.
#[derive(Debug)]
#[must_use]
pub struct SubscriptionGuard(Subscription);

impl SubscriptionGuard {
  pub fn new(subscription: Subscription) -> Self { SubscriptionGuard(subscription) }

  pub fn subscription(&self) -> &Subscription { &self.0 }
}

impl Drop for SubscriptionGuard {
  #[inline]
  fn drop(&mut self) { self.0.unsubscribe() }
}

/// A scoped collection of subscriptions.
///
/// Every member is cancelled, in insertion order and exactly once, when the
/// bag is disposed or dropped. Members inserted after disposal are cancelled
/// immediately.
#[derive(Debug, Default)]
pub struct DisposeBag(Subscription);

impl DisposeBag {
  pub fn new() -> Self { Self::default() }

  pub fn insert<S: SubscriptionLike + Send + 'static>(&self, subscription: S) {
    self.0.add(subscription)
  }

  pub fn dispose(&self) { self.0.unsubscribe() }

  pub fn is_disposed(&self) -> bool { self.0.is_closed() }
}

impl Drop for DisposeBag {
  fn drop(&mut self) { self.0.unsubscribe() }
}
