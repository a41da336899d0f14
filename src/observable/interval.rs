use std::time::Duration;

use crate::{
  observable::Observable,
  observer::Observer,
  scheduler::Scheduler,
  subscription::Subscription,
};

/// Emits `0, 1, 2, ...` every `period`.
#[derive(Clone)]
pub struct Interval<Sch> {
  period: Duration,
  scheduler: Sch,
}

/// Creates an observable which emits sequential numbers every `period` on
/// `scheduler`. The first value arrives after one period; the stream never
/// completes on its own.
pub fn interval<Sch: Scheduler>(period: Duration, scheduler: Sch) -> Interval<Sch> {
  Interval { period, scheduler }
}

impl<Sch: Scheduler> Observable for Interval<Sch> {
  type Item = usize;

  fn actual_subscribe<O>(self, mut observer: O) -> Subscription
  where
    O: Observer<usize> + 'static,
  {
    let handle = self.scheduler.schedule_periodic(self.period, self.period, move |tick| {
      observer.next(tick);
      !observer.is_closed()
    });
    let subscription = Subscription::new();
    subscription.add(handle);
    subscription
  }
}
