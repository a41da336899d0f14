//! Shared mutable cells used by hubs and multi-source operators.
//!
//! Every piece of state that is touched from more than one observer lives
//! behind a [`MutArc`]. Locking never panics: a poisoned mutex only means a
//! user callback panicked while the guard was alive, and the data it protects
//! is still structurally valid, so the guard is recovered.
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

pub struct MutArc<T>(Arc<Mutex<T>>);

pub struct WeakArc<T>(Weak<Mutex<T>>);

impl<T> MutArc<T> {
  pub fn own(t: T) -> Self { Self(Arc::new(Mutex::new(t))) }

  #[inline]
  pub fn rc_deref_mut(&self) -> MutexGuard<'_, T> { lock(&self.0) }

  pub fn downgrade(&self) -> WeakArc<T> { WeakArc(Arc::downgrade(&self.0)) }

  pub fn ptr_eq(&self, other: &Self) -> bool { Arc::ptr_eq(&self.0, &other.0) }
}

impl<T> WeakArc<T> {
  pub fn upgrade(&self) -> Option<MutArc<T>> { self.0.upgrade().map(MutArc) }
}

impl<T> Clone for MutArc<T> {
  #[inline]
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<T> Clone for WeakArc<T> {
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<T: Default> Default for MutArc<T> {
  fn default() -> Self { Self::own(T::default()) }
}

impl<T> From<T> for MutArc<T> {
  fn from(t: T) -> Self { Self::own(t) }
}

/// Lock a mutex, recovering the guard if a previous holder panicked.
#[inline]
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
  mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn shared_mutation() {
    let a = MutArc::own(1);
    let b = a.clone();
    *b.rc_deref_mut() += 1;
    assert_eq!(*a.rc_deref_mut(), 2);
    assert!(a.ptr_eq(&b));
  }

  #[test]
  fn weak_does_not_keep_alive() {
    let a = MutArc::own(vec![1]);
    let weak = a.downgrade();
    assert!(weak.upgrade().is_some());
    drop(a);
    assert!(weak.upgrade().is_none());
  }

  #[test]
  fn poisoned_lock_is_recovered() {
    let a = MutArc::own(0);
    let b = a.clone();
    let _ = std::thread::spawn(move || {
      let _guard = b.rc_deref_mut();
      panic!("poison");
    })
    .join();
    *a.rc_deref_mut() += 5;
    assert_eq!(*a.rc_deref_mut(), 5);
  }
}
