use std::time::Duration;

use crate::{
  observable::Observable,
  observer::Observer,
  scheduler::Scheduler,
  subscription::Subscription,
};

/// Emits `0` once after a delay, then completes.
#[derive(Clone)]
pub struct Timer<Sch> {
  delay: Duration,
  scheduler: Sch,
}

pub fn timer<Sch: Scheduler>(delay: Duration, scheduler: Sch) -> Timer<Sch> {
  Timer { delay, scheduler }
}

impl<Sch: Scheduler> Observable for Timer<Sch> {
  type Item = usize;

  fn actual_subscribe<O>(self, mut observer: O) -> Subscription
  where
    O: Observer<usize> + 'static,
  {
    let handle = self.scheduler.schedule(self.delay, move || {
      if !observer.is_closed() {
        observer.next(0);
        observer.complete();
      }
    });
    let subscription = Subscription::new();
    subscription.add(handle);
    subscription
  }
}

#[cfg(test)]
mod tests {
  use crate::prelude::*;
  use std::sync::{Arc, Mutex};

  #[test]
  fn fires_once_after_delay() {
    TestScheduler::init();
    let events = Arc::new(Mutex::new(vec![]));
    let c_events = events.clone();
    observable::timer(Duration::from_secs(1), TestScheduler)
      .subscribe_event(move |e| c_events.lock().unwrap().push(e));
    TestScheduler::advance_by(Duration::from_millis(999));
    assert!(events.lock().unwrap().is_empty());
    TestScheduler::advance_by(Duration::from_millis(1));
    assert_eq!(*events.lock().unwrap(), vec![Event::Next(0), Event::Completed]);
  }

  #[test]
  fn cancelled_timer_never_fires() {
    TestScheduler::init();
    let fired = Arc::new(Mutex::new(false));
    let c_fired = fired.clone();
    let subscription = observable::timer(Duration::from_secs(1), TestScheduler)
      .subscribe(move |_| *c_fired.lock().unwrap() = true);
    subscription.unsubscribe();
    TestScheduler::flush();
    assert!(!*fired.lock().unwrap());
  }
}
