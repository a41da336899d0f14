use crate::{
  error::RxError,
  observable::Observable,
  observer::{Event, Observer},
  rc::MutArc,
  subscriber::Subscriber,
  subscription::{Subscription, SubscriptionLike},
};

/// Mirrors the most recent inner stream of a stream of streams.
///
/// A new inner stream cancels the previous one; anything the previous one
/// still manages to push is dropped. Completes once the outer stream and the
/// current inner stream both completed.
#[derive(Clone)]
pub struct SwitchOnNextOp<S> {
  pub(crate) source: S,
}

impl<S> Observable for SwitchOnNextOp<S>
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
    let ctx = SwitchCtx {
      downstream: Subscriber::new(observer, subscription.clone()),
      state: MutArc::own(SwitchState {
        generation: 0,
        current: None,
        outer_done: false,
      }),
      subscription: subscription.clone(),
    };
    subscription.add(self.source.actual_subscribe(SwitchOuterObserver(ctx)));
    subscription
  }
}

struct SwitchState {
  generation: u64,
  current: Option<Subscription>,
  outer_done: bool,
}

struct SwitchCtx<Item> {
  downstream: Subscriber<Item>,
  state: MutArc<SwitchState>,
  subscription: Subscription,
}

impl<Item> Clone for SwitchCtx<Item> {
  fn clone(&self) -> Self {
    SwitchCtx {
      downstream: self.downstream.clone(),
      state: self.state.clone(),
      subscription: self.subscription.clone(),
    }
  }
}

impl<Item: Send + 'static> SwitchCtx<Item> {
  /// Queue `event` only if `generation` is still the live inner stream.
  fn emit_from(&self, generation: u64, event: Event<Item>) {
    let queued = {
      let mut state = self.state.rc_deref_mut();
      if state.generation != generation {
        return;
      }
      if event.is_terminal() {
        state.current = None;
      }
      let forward = match event {
        Event::Completed => state.outer_done,
        _ => true,
      };
      forward && self.downstream.enqueue(event)
    };
    if queued {
      self.downstream.drain();
    }
  }
}

pub struct SwitchOuterObserver<Item>(SwitchCtx<Item>);

impl<Item, Inner> Observer<Inner> for SwitchOuterObserver<Item>
where
  Item: Send + 'static,
  Inner: Observable<Item = Item>,
{
  fn next(&mut self, inner: Inner) {
    let own = Subscription::new();
    let (generation, previous) = {
      let mut state = self.0.state.rc_deref_mut();
      state.generation += 1;
      (state.generation, state.current.replace(own.clone()))
    };
    if let Some(previous) = previous {
      previous.unsubscribe();
    }
    self.0.subscription.add(own.clone());
    let observer = SwitchInnerObserver { ctx: self.0.clone(), generation, own: own.clone() };
    own.add(inner.actual_subscribe(observer));
  }

  fn error(&mut self, err: RxError) { self.0.downstream.emit(Event::Error(err)) }

  fn complete(&mut self) {
    let queued = {
      let mut state = self.0.state.rc_deref_mut();
      state.outer_done = true;
      state.current.is_none() && self.0.downstream.enqueue(Event::Completed)
    };
    if queued {
      self.0.downstream.drain();
    }
  }

  fn is_closed(&self) -> bool { Observer::is_closed(&self.0.downstream) }
}

pub struct SwitchInnerObserver<Item> {
  ctx: SwitchCtx<Item>,
  generation: u64,
  own: Subscription,
}

impl<Item: Send + 'static> Observer<Item> for SwitchInnerObserver<Item> {
  fn next(&mut self, value: Item) { self.ctx.emit_from(self.generation, Event::Next(value)) }

  fn error(&mut self, err: RxError) { self.ctx.emit_from(self.generation, Event::Error(err)) }

  fn complete(&mut self) {
    self.own.unsubscribe();
    self.ctx.emit_from(self.generation, Event::Completed)
  }

  fn is_closed(&self) -> bool { self.own.is_closed() || Observer::is_closed(&self.ctx.downstream) }
}
