use std::{
  cell::RefCell,
  cmp::Ordering,
  collections::BinaryHeap,
  time::Instant,
};

use super::{Duration, ScheduledUnit, Scheduler};

/// Runs work on the thread that schedules it.
///
/// The first unit scheduled on an idle thread starts a trampoline that runs
/// it and every unit scheduled meanwhile, in due order, before returning;
/// units scheduled from inside a running unit are queued instead of being
/// run recursively. Delays block the thread until the unit is due.
#[derive(Clone, Copy, Debug, Default)]
pub struct CurrentThreadScheduler;

struct Trampoline {
  running: bool,
  queue: BinaryHeap<Queued>,
  seq: usize,
}

struct Queued {
  due: Instant,
  seq: usize,
  unit: ScheduledUnit,
}

impl PartialEq for Queued {
  fn eq(&self, other: &Self) -> bool { self.due == other.due && self.seq == other.seq }
}

impl Eq for Queued {}

impl PartialOrd for Queued {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl Ord for Queued {
  fn cmp(&self, other: &Self) -> Ordering {
    other.due.cmp(&self.due).then_with(|| other.seq.cmp(&self.seq))
  }
}

thread_local! {
  static TRAMPOLINE: RefCell<Trampoline> =
    RefCell::new(Trampoline { running: false, queue: BinaryHeap::new(), seq: 0 });
}

impl CurrentThreadScheduler {
  /// Whether a trampoline is active on this thread.
  pub fn is_running() -> bool { TRAMPOLINE.with(|t| t.borrow().running) }

  fn run_queue() {
    loop {
      let next = TRAMPOLINE.with(|t| {
        let mut t = t.borrow_mut();
        let next = t.queue.pop();
        if next.is_none() {
          t.running = false;
        }
        next
      });
      let Some(Queued { due, unit, .. }) = next else { break };
      let now = Instant::now();
      if due > now {
        std::thread::sleep(due - now);
      }
      unit();
    }
  }
}

impl Scheduler for CurrentThreadScheduler {
  fn spawn(&self, delay: Duration, unit: ScheduledUnit) {
    let start = TRAMPOLINE.with(|t| {
      let mut t = t.borrow_mut();
      let seq = t.seq;
      t.seq += 1;
      t.queue.push(Queued { due: Instant::now() + delay, seq, unit });
      !std::mem::replace(&mut t.running, true)
    });
    if start {
      Self::run_queue();
    }
  }
}
