//! Execution contexts: where and when scheduled work runs.
//!
//! A [`Scheduler`] runs units of work, optionally after a delay or
//! repeatedly at a fixed period, and hands back a [`TaskHandle`] that cancels
//! the work. Each scheduled unit moves `Pending -> Running -> Done`, or
//! `Pending -> Cancelled`. A unit cancelled before it starts never runs; a
//! unit cancelled while running finishes, but a periodic registration fires
//! no more after that.
use std::sync::{
  atomic::{AtomicU8, Ordering},
  Arc,
};

pub use std::time::Duration;

use crate::subscription::SubscriptionLike;

mod current_thread;
pub use current_thread::CurrentThreadScheduler;
mod test_scheduler;
pub use test_scheduler::TestScheduler;
#[cfg(all(feature = "futures-scheduler", feature = "timer"))]
mod thread_pool_scheduler;
#[cfg(all(feature = "futures-scheduler", feature = "timer"))]
pub use thread_pool_scheduler::ThreadPoolScheduler;
#[cfg(feature = "tokio-scheduler")]
mod tokio_scheduler;
#[cfg(feature = "tokio-scheduler")]
pub use tokio_scheduler::TokioScheduler;

/// A unit of work handed to a scheduler backend.
pub type ScheduledUnit = Box<dyn FnOnce() + Send>;

pub trait Scheduler: Clone + Send + Sync + 'static {
  /// Run `unit` once `delay` has elapsed. Backends implement only this.
  fn spawn(&self, delay: Duration, unit: ScheduledUnit);

  /// Run `task` once after `delay`.
  fn schedule<F>(&self, delay: Duration, task: F) -> TaskHandle
  where
    F: FnOnce() + Send + 'static,
  {
    let handle = TaskHandle::new();
    let c_handle = handle.clone();
    self.spawn(
      delay,
      Box::new(move || {
        if c_handle.start() {
          task();
          c_handle.finish();
        } else {
          tracing::trace!("scheduled unit cancelled before it ran");
        }
      }),
    );
    handle
  }

  /// Run `task` after `delay` and then every `period`, passing the tick
  /// index. The next firing is only scheduled once the current one returned
  /// `true`; returning `false` ends the registration.
  fn schedule_periodic<F>(&self, delay: Duration, period: Duration, task: F) -> TaskHandle
  where
    F: FnMut(usize) -> bool + Send + 'static,
  {
    let handle = TaskHandle::new();
    let unit = periodic_unit(self.clone(), handle.clone(), period, task, 0);
    self.spawn(delay, unit);
    handle
  }
}

fn periodic_unit<S, F>(
  scheduler: S, handle: TaskHandle, period: Duration, mut task: F, tick: usize,
) -> ScheduledUnit
where
  S: Scheduler,
  F: FnMut(usize) -> bool + Send + 'static,
{
  Box::new(move || {
    if !handle.start() {
      tracing::trace!(tick, "periodic unit cancelled before it ran");
      return;
    }
    if !task(tick) {
      handle.finish();
      return;
    }
    if handle.rearm() {
      let next = periodic_unit(scheduler.clone(), handle.clone(), period, task, tick + 1);
      scheduler.spawn(period, next);
    }
  })
}

const PENDING: u8 = 0;
const RUNNING: u8 = 1;
const DONE: u8 = 2;
const CANCELLED: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
  Pending,
  Running,
  Done,
  Cancelled,
}

/// Cancellation handle of scheduled work.
#[derive(Debug, Clone)]
pub struct TaskHandle(Arc<AtomicU8>);

impl TaskHandle {
  pub fn new() -> Self { TaskHandle(Arc::new(AtomicU8::new(PENDING))) }

  pub fn state(&self) -> TaskState {
    match self.0.load(Ordering::Acquire) {
      PENDING => TaskState::Pending,
      RUNNING => TaskState::Running,
      DONE => TaskState::Done,
      _ => TaskState::Cancelled,
    }
  }

  fn transit(&self, from: u8, to: u8) -> bool {
    self.0.compare_exchange(from, to, Ordering::AcqRel, Ordering::Acquire).is_ok()
  }

  pub(crate) fn start(&self) -> bool { self.transit(PENDING, RUNNING) }

  pub(crate) fn finish(&self) { self.transit(RUNNING, DONE); }

  /// Back to pending for the next periodic firing; fails if the handle was
  /// cancelled while the unit ran.
  pub(crate) fn rearm(&self) -> bool { self.transit(RUNNING, PENDING) }
}

impl Default for TaskHandle {
  fn default() -> Self { Self::new() }
}

impl SubscriptionLike for TaskHandle {
  fn unsubscribe(&self) {
    let _ = self.0.fetch_update(Ordering::AcqRel, Ordering::Acquire, |state| match state {
      PENDING | RUNNING => Some(CANCELLED),
      _ => None,
    });
  }

  fn is_closed(&self) -> bool { matches!(self.state(), TaskState::Done | TaskState::Cancelled) }
}
