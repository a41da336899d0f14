//! Process-wide accounting of live subscription handles.
//!
//! Tracking is off by default. Once [`enable`]d, every subscription handle
//! created afterwards increments [`total`] and decrements it again when its
//! last clone is released, which makes leaked subscriptions visible in tests:
//!
//! ```rust
//! use rxstream::{prelude::*, resources};
//!
//! resources::enable();
//! let before = resources::total();
//! let subject = BehaviorSubject::new("🍎");
//! let subscription = subject.clone().subscribe(|_| {});
//! assert!(resources::total() > before);
//! subscription.unsubscribe();
//! drop(subscription);
//! assert_eq!(resources::total(), before);
//! resources::disable();
//! ```
use std::sync::atomic::{AtomicBool, AtomicIsize, Ordering};

static ENABLED: AtomicBool = AtomicBool::new(false);
static TOTAL: AtomicIsize = AtomicIsize::new(0);

pub fn enable() { ENABLED.store(true, Ordering::SeqCst); }

/// Stop counting new handles. Handles already counted still decrement the
/// total when released.
pub fn disable() { ENABLED.store(false, Ordering::SeqCst); }

pub fn is_enabled() -> bool { ENABLED.load(Ordering::SeqCst) }

/// Number of tracked handles currently alive.
pub fn total() -> isize { TOTAL.load(Ordering::SeqCst) }

pub fn reset() { TOTAL.store(0, Ordering::SeqCst); }

/// Allocation token embedded in every subscription handle.
#[derive(Debug)]
pub(crate) struct Tracked(bool);

impl Tracked {
  pub(crate) fn new() -> Self {
    let counted = is_enabled();
    if counted {
      TOTAL.fetch_add(1, Ordering::SeqCst);
    }
    Tracked(counted)
  }
}

impl Drop for Tracked {
  fn drop(&mut self) {
    if self.0 {
      TOTAL.fetch_sub(1, Ordering::SeqCst);
    }
  }
}
