use std::{collections::VecDeque, time::Duration};

use crate::{
  error::RxError,
  observable::Observable,
  observer::{Event, Observer},
  rc::MutArc,
  scheduler::Scheduler,
  subscriber::Subscriber,
  subscription::Subscription,
};

/// Re-delivers every event on `scheduler`, in order. Events are queued and
/// one scheduled unit drains the queue at a time.
#[derive(Clone)]
pub struct ObserveOnOp<S, Sch> {
  pub(crate) source: S,
  pub(crate) scheduler: Sch,
}

impl<S: Observable, Sch: Scheduler> Observable for ObserveOnOp<S, Sch> {
  type Item = S::Item;

  fn actual_subscribe<O>(self, observer: O) -> Subscription
  where
    O: Observer<S::Item> + 'static,
  {
    let subscription = Subscription::new();
    let observer = ObserveOnObserver {
      downstream: Subscriber::new(observer, subscription.clone()),
      queue: MutArc::own(Mailbox { events: VecDeque::new(), scheduled: false }),
      scheduler: self.scheduler,
      subscription: subscription.clone(),
    };
    subscription.add(self.source.actual_subscribe(observer));
    subscription
  }
}

struct Mailbox<Item> {
  events: VecDeque<Event<Item>>,
  scheduled: bool,
}

pub struct ObserveOnObserver<Item, Sch> {
  downstream: Subscriber<Item>,
  queue: MutArc<Mailbox<Item>>,
  scheduler: Sch,
  subscription: Subscription,
}

impl<Item: Send + 'static, Sch: Scheduler> ObserveOnObserver<Item, Sch> {
  fn post(&self, event: Event<Item>) {
    let schedule = {
      let mut mailbox = self.queue.rc_deref_mut();
      mailbox.events.push_back(event);
      !std::mem::replace(&mut mailbox.scheduled, true)
    };
    if !schedule {
      return;
    }
    let queue = self.queue.clone();
    let mut downstream = self.downstream.clone();
    let handle = self.scheduler.schedule(Duration::ZERO, move || loop {
      let event = {
        let mut mailbox = queue.rc_deref_mut();
        match mailbox.events.pop_front() {
          Some(event) => event,
          None => {
            mailbox.scheduled = false;
            return;
          }
        }
      };
      event.dispatch(&mut downstream);
    });
    self.subscription.add(handle);
  }
}

impl<Item: Send + 'static, Sch: Scheduler> Observer<Item> for ObserveOnObserver<Item, Sch> {
  fn next(&mut self, value: Item) { self.post(Event::Next(value)) }

  fn error(&mut self, err: RxError) { self.post(Event::Error(err)) }

  fn complete(&mut self) { self.post(Event::Completed) }

  fn is_closed(&self) -> bool { Observer::is_closed(&self.downstream) }
}
