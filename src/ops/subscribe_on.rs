use std::time::Duration;

use crate::{
  observable::Observable,
  observer::Observer,
  scheduler::Scheduler,
  subscriber::Subscriber,
  subscription::Subscription,
};

/// Performs the subscription to the source as a unit on `scheduler`.
#[derive(Clone)]
pub struct SubscribeOnOp<S, Sch> {
  pub(crate) source: S,
  pub(crate) scheduler: Sch,
}

impl<S: Observable, Sch: Scheduler> Observable for SubscribeOnOp<S, Sch> {
  type Item = S::Item;

  fn actual_subscribe<O>(self, observer: O) -> Subscription
  where
    O: Observer<S::Item> + 'static,
  {
    let subscription = Subscription::new();
    let downstream = Subscriber::new(observer, subscription.clone());
    let source = self.source;
    let c_subscription = subscription.clone();
    let handle = self.scheduler.schedule(Duration::ZERO, move || {
      c_subscription.add(source.actual_subscribe(downstream));
    });
    subscription.add(handle);
    subscription
  }
}
