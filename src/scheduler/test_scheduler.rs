//! Virtual-time scheduler for deterministic tests of time-based operators.
//!
//! Time only moves when the test says so:
//!
//! ```rust
//! use rxstream::prelude::*;
//! use std::sync::{Arc, Mutex};
//!
//! TestScheduler::init();
//! let ticks = Arc::new(Mutex::new(vec![]));
//! let c_ticks = ticks.clone();
//! observable::interval(Duration::from_millis(10), TestScheduler)
//!   .take(3)
//!   .subscribe(move |v| c_ticks.lock().unwrap().push(v));
//!
//! TestScheduler::advance_by(Duration::from_millis(25));
//! assert_eq!(*ticks.lock().unwrap(), vec![0, 1]);
//! TestScheduler::flush();
//! assert_eq!(*ticks.lock().unwrap(), vec![0, 1, 2]);
//! ```
//!
//! State is thread-local: every test thread owns an independent clock and
//! queue, so tests running in parallel do not interfere.
use std::{cell::RefCell, cmp::Ordering, collections::BinaryHeap};

use super::{Duration, ScheduledUnit, Scheduler};

struct TestSchedulerState {
  virtual_time: Duration,
  task_queue: BinaryHeap<QueuedUnit>,
  next_task_id: usize,
  initialized: bool,
}

struct QueuedUnit {
  scheduled_time: Duration,
  task_id: usize,
  unit: ScheduledUnit,
}

impl PartialEq for QueuedUnit {
  fn eq(&self, other: &Self) -> bool {
    self.scheduled_time == other.scheduled_time && self.task_id == other.task_id
  }
}

impl Eq for QueuedUnit {}

impl PartialOrd for QueuedUnit {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl Ord for QueuedUnit {
  fn cmp(&self, other: &Self) -> Ordering {
    // min-heap on time, FIFO among equal times
    other
      .scheduled_time
      .cmp(&self.scheduled_time)
      .then_with(|| other.task_id.cmp(&self.task_id))
  }
}

thread_local! {
  static STATE: RefCell<TestSchedulerState> = RefCell::new(TestSchedulerState {
    virtual_time: Duration::ZERO,
    task_queue: BinaryHeap::new(),
    next_task_id: 0,
    initialized: false,
  });
}

/// A zero-sized handle to the current thread's virtual clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct TestScheduler;

impl TestScheduler {
  /// Reset the clock to zero and drop every queued unit. Call at the start of
  /// each test.
  pub fn init() {
    STATE.with(|state| {
      let mut state = state.borrow_mut();
      state.virtual_time = Duration::ZERO;
      state.task_queue.clear();
      state.next_task_id = 0;
      state.initialized = true;
    });
  }

  fn ensure_initialized() {
    STATE.with(|state| {
      assert!(
        state.borrow().initialized,
        "TestScheduler::init() must be called before using the scheduler"
      );
    });
  }

  pub fn now() -> Duration {
    Self::ensure_initialized();
    STATE.with(|state| state.borrow().virtual_time)
  }

  pub fn pending_count() -> usize {
    Self::ensure_initialized();
    STATE.with(|state| state.borrow().task_queue.len())
  }

  fn run_until(target_time: Option<Duration>) {
    loop {
      let next = STATE.with(|state| {
        let mut state = state.borrow_mut();
        let due = state
          .task_queue
          .peek()
          .is_some_and(|peek| target_time.is_none_or(|limit| peek.scheduled_time <= limit));
        if !due {
          return None;
        }
        let queued = state.task_queue.pop()?;
        state.virtual_time = queued.scheduled_time;
        Some(queued.unit)
      });
      match next {
        Some(unit) => unit(),
        None => break,
      }
    }
  }

  /// Move the clock forward by `duration`, running every unit that falls due
  /// on the way, in time order.
  pub fn advance_by(duration: Duration) {
    Self::ensure_initialized();
    let target = STATE.with(|state| state.borrow().virtual_time + duration);
    Self::run_until(Some(target));
    STATE.with(|state| state.borrow_mut().virtual_time = target);
  }

  /// Run queued units until none is left, jumping the clock to each one.
  pub fn flush() {
    Self::ensure_initialized();
    Self::run_until(None);
  }
}

impl Scheduler for TestScheduler {
  fn spawn(&self, delay: Duration, unit: ScheduledUnit) {
    Self::ensure_initialized();
    STATE.with(|state| {
      let mut state = state.borrow_mut();
      let scheduled_time = state.virtual_time + delay;
      let task_id = state.next_task_id;
      state.next_task_id += 1;
      state.task_queue.push(QueuedUnit { scheduled_time, task_id, unit });
    });
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::{Arc, Mutex};

  #[test]
  fn advance_by_cumulative() {
    TestScheduler::init();
    TestScheduler::advance_by(Duration::from_millis(100));
    TestScheduler::advance_by(Duration::from_millis(50));
    assert_eq!(TestScheduler::now(), Duration::from_millis(150));
  }

  #[test]
  #[should_panic(expected = "TestScheduler::init() must be called")]
  fn panics_without_init() {
    STATE.with(|s| s.borrow_mut().initialized = false);
    TestScheduler::now();
  }

  #[test]
  fn runs_in_time_then_fifo_order() {
    TestScheduler::init();
    let log = Arc::new(Mutex::new(vec![]));
    for (delay, name) in [(20, "c"), (10, "a"), (10, "b")] {
      let log = log.clone();
      TestScheduler.schedule(Duration::from_millis(delay), move || log.lock().unwrap().push(name));
    }
    TestScheduler::advance_by(Duration::from_millis(10));
    assert_eq!(*log.lock().unwrap(), vec!["a", "b"]);
    assert_eq!(TestScheduler::pending_count(), 1);
    TestScheduler::flush();
    assert_eq!(*log.lock().unwrap(), vec!["a", "b", "c"]);
    assert_eq!(TestScheduler::now(), Duration::from_millis(20));
  }

  #[test]
  fn units_spawned_while_running_are_honored() {
    TestScheduler::init();
    let log = Arc::new(Mutex::new(vec![]));
    let c_log = log.clone();
    TestScheduler.schedule(Duration::from_millis(5), move || {
      c_log.lock().unwrap().push(TestScheduler::now());
      let c_log = c_log.clone();
      TestScheduler.schedule(Duration::from_millis(5), move || {
        c_log.lock().unwrap().push(TestScheduler::now())
      });
    });
    TestScheduler::advance_by(Duration::from_millis(10));
    assert_eq!(*log.lock().unwrap(), vec![Duration::from_millis(5), Duration::from_millis(10)]);
  }
}
