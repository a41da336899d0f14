use smallvec::SmallVec;

use super::SubscriptionLike;

/// A container of items keyed by a unique, never reused id.
///
/// Hubs keep their attached observers here so that a detaching observer can
/// remove exactly itself, and multi-source operators keep their inner
/// subscriptions here so a finished inner can be dropped by id.
///
/// ```rust
/// use rxstream::subscription::DynamicSubscriptions;
///
/// let mut subs: DynamicSubscriptions<&str> = DynamicSubscriptions::default();
/// let first = subs.add("first");
/// let second = subs.reserve_id();
/// subs.insert(second, "second");
/// assert_eq!(subs.len(), 2);
/// assert_eq!(subs.remove(first), Some("first"));
/// assert!(subs.contains(second));
/// ```
pub struct DynamicSubscriptions<U> {
  next_id: usize,
  items: SmallVec<[(usize, U); 2]>,
}

impl<U> Default for DynamicSubscriptions<U> {
  fn default() -> Self { Self { next_id: 0, items: SmallVec::new() } }
}

impl<U> DynamicSubscriptions<U> {
  #[inline]
  pub fn new() -> Self { Self::default() }

  /// Add an item and return its id.
  #[inline]
  pub fn add(&mut self, item: U) -> usize {
    let id = self.reserve_id();
    self.items.push((id, item));
    id
  }

  /// Reserve an id for an item that does not exist yet, e.g. an inner
  /// observer that must know its own id before it is subscribed.
  #[inline]
  pub fn reserve_id(&mut self) -> usize {
    let id = self.next_id;
    self.next_id += 1;
    id
  }

  #[inline]
  pub fn insert(&mut self, id: usize, item: U) { self.items.push((id, item)); }

  pub fn remove(&mut self, id: usize) -> Option<U> {
    self.items.iter().position(|(i, _)| *i == id).map(|pos| self.items.remove(pos).1)
  }

  #[inline]
  pub fn contains(&self, id: usize) -> bool { self.items.iter().any(|(i, _)| *i == id) }

  #[inline]
  pub fn len(&self) -> usize { self.items.len() }

  #[inline]
  pub fn is_empty(&self) -> bool { self.items.is_empty() }

  /// Remove every item, in insertion order.
  #[inline]
  pub fn drain(&mut self) -> impl Iterator<Item = U> + '_ {
    self.items.drain(..).map(|(_, item)| item)
  }

  #[inline]
  pub fn iter(&self) -> impl Iterator<Item = &U> { self.items.iter().map(|(_, item)| item) }
}

impl<U: SubscriptionLike> DynamicSubscriptions<U> {
  /// Take every item out of the container for cancellation. The caller
  /// unsubscribes them after releasing whatever lock guards the container.
  #[inline]
  pub fn take_all(&mut self) -> Vec<U> { self.drain().collect() }

  #[inline]
  pub fn all_closed(&self) -> bool { self.items.iter().all(|(_, item)| item.is_closed()) }
}
