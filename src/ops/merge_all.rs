use std::collections::VecDeque;

use crate::{
  error::RxError,
  observable::Observable,
  observer::Observer,
  rc::MutArc,
  subscriber::Subscriber,
  subscription::{Subscription, SubscriptionLike},
};

/// Flattens a stream of streams.
///
/// At most `concurrent` inner streams are subscribed at once; later ones
/// wait in arrival order and start as running ones complete. With
/// `concurrent == 1` this is `concat_all`. The result completes once the
/// outer stream and every inner stream completed; the first error from any
/// of them ends it and cancels the rest, so queued inner streams never start.
#[derive(Clone)]
pub struct MergeAllOp<S> {
  pub(crate) source: S,
  pub(crate) concurrent: usize,
}

impl<S> Observable for MergeAllOp<S>
where
  S: Observable,
  S::Item: Observable,
{
  type Item = <S::Item as Observable>::Item;

  fn actual_subscribe<O>(self, observer: O) -> Subscription
  where
    O: Observer<Self::Item> + 'static,
  {
    let subscription = Subscription::new();
    let ctx = MergeCtx {
      downstream: Subscriber::new(observer, subscription.clone()),
      state: MutArc::own(MergeState { active: 0, outer_done: false, pending: VecDeque::new() }),
      concurrent: self.concurrent,
      subscription: subscription.clone(),
    };
    let outer = self.source.actual_subscribe(MergeAllOuterObserver(ctx));
    subscription.add(outer);
    subscription
  }
}

struct MergeState<Inner> {
  active: usize,
  outer_done: bool,
  pending: VecDeque<Inner>,
}

struct MergeCtx<Inner: Observable> {
  downstream: Subscriber<Inner::Item>,
  state: MutArc<MergeState<Inner>>,
  concurrent: usize,
  subscription: Subscription,
}

impl<Inner: Observable> Clone for MergeCtx<Inner> {
  fn clone(&self) -> Self {
    MergeCtx {
      downstream: self.downstream.clone(),
      state: self.state.clone(),
      concurrent: self.concurrent,
      subscription: self.subscription.clone(),
    }
  }
}

impl<Inner: Observable> MergeCtx<Inner> {
  fn subscribe_inner(&self, inner: Inner) {
    let own = Subscription::new();
    self.subscription.add(own.clone());
    let observer = MergeAllInnerObserver { ctx: self.clone(), own: own.clone() };
    own.add(inner.actual_subscribe(observer));
  }

  fn is_closed(&self) -> bool { Observer::is_closed(&self.downstream) }
}

pub struct MergeAllOuterObserver<Inner: Observable>(MergeCtx<Inner>);

impl<Inner: Observable> Observer<Inner> for MergeAllOuterObserver<Inner> {
  fn next(&mut self, inner: Inner) {
    let start = {
      let mut state = self.0.state.rc_deref_mut();
      if state.active < self.0.concurrent {
        state.active += 1;
        Some(inner)
      } else {
        state.pending.push_back(inner);
        None
      }
    };
    if let Some(inner) = start {
      self.0.subscribe_inner(inner);
    }
  }

  fn error(&mut self, err: RxError) { self.0.downstream.error(err) }

  fn complete(&mut self) {
    let done = {
      let mut state = self.0.state.rc_deref_mut();
      state.outer_done = true;
      state.active == 0
    };
    if done {
      self.0.downstream.complete();
    }
  }

  fn is_closed(&self) -> bool { self.0.is_closed() }
}

pub struct MergeAllInnerObserver<Inner: Observable> {
  ctx: MergeCtx<Inner>,
  own: Subscription,
}

impl<Inner: Observable> Observer<Inner::Item> for MergeAllInnerObserver<Inner> {
  fn next(&mut self, value: Inner::Item) { self.ctx.downstream.next(value) }

  fn error(&mut self, err: RxError) { self.ctx.downstream.error(err) }

  fn complete(&mut self) {
    self.own.unsubscribe();
    let (next, done) = {
      let mut state = self.ctx.state.rc_deref_mut();
      match state.pending.pop_front() {
        Some(next) => (Some(next), false),
        None => {
          state.active -= 1;
          (None, state.outer_done && state.active == 0)
        }
      }
    };
    if let Some(next) = next {
      self.ctx.subscribe_inner(next);
    } else if done {
      self.ctx.downstream.complete();
    }
  }

  fn is_closed(&self) -> bool { self.own.is_closed() || self.ctx.is_closed() }
}
