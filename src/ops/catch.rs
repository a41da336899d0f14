use crate::{
  error::RxError,
  observable::Observable,
  observer::Observer,
  subscription::Subscription,
};

/// Recovers from the first upstream error by switching to the stream the
/// handler builds from it. Errors of that fallback stream propagate.
#[derive(Clone)]
pub struct CatchOp<S, F> {
  pub(crate) source: S,
  pub(crate) handler: F,
}

impl<S, F, R> Observable for CatchOp<S, F>
where
  S: Observable,
  R: Observable<Item = S::Item>,
  F: FnMut(RxError) -> R + Clone + Send + 'static,
{
  type Item = S::Item;

  fn actual_subscribe<O>(self, observer: O) -> Subscription
  where
    O: Observer<S::Item> + 'static,
  {
    let subscription = Subscription::new();
    let observer = CatchObserver {
      observer: Some(observer),
      handler: Some(self.handler),
      subscription: subscription.clone(),
    };
    subscription.add(self.source.actual_subscribe(observer));
    subscription
  }
}

pub struct CatchObserver<O, F> {
  observer: Option<O>,
  handler: Option<F>,
  subscription: Subscription,
}

impl<Item, O, F, R> Observer<Item> for CatchObserver<O, F>
where
  O: Observer<Item> + 'static,
  R: Observable<Item = Item>,
  F: FnMut(RxError) -> R + Send,
{
  fn next(&mut self, value: Item) {
    if let Some(observer) = self.observer.as_mut() {
      observer.next(value);
    }
  }

  fn error(&mut self, err: RxError) {
    if let (Some(observer), Some(mut handler)) = (self.observer.take(), self.handler.take()) {
      tracing::debug!(error = %err, "recovering with fallback stream");
      let fallback = handler(err);
      self.subscription.add(fallback.actual_subscribe(observer));
    }
  }

  fn complete(&mut self) {
    if let Some(mut observer) = self.observer.take() {
      observer.complete();
    }
  }

  fn is_closed(&self) -> bool { self.observer.as_ref().map_or(true, |o| o.is_closed()) }
}

/// Replaces an upstream error with one final value, then completes.
pub struct CatchAndReturnOp<S: Observable> {
  pub(crate) source: S,
  pub(crate) value: S::Item,
}

impl<S> Clone for CatchAndReturnOp<S>
where
  S: Observable,
  S::Item: Clone,
{
  fn clone(&self) -> Self {
    CatchAndReturnOp { source: self.source.clone(), value: self.value.clone() }
  }
}

impl<S> Observable for CatchAndReturnOp<S>
where
  S: Observable,
  S::Item: Clone,
{
  type Item = S::Item;

  fn actual_subscribe<O>(self, observer: O) -> Subscription
  where
    O: Observer<S::Item> + 'static,
  {
    self.source.actual_subscribe(CatchAndReturnObserver { observer, value: Some(self.value) })
  }
}

pub struct CatchAndReturnObserver<O, Item> {
  observer: O,
  value: Option<Item>,
}

impl<Item: Send, O: Observer<Item>> Observer<Item> for CatchAndReturnObserver<O, Item> {
  fn next(&mut self, value: Item) { self.observer.next(value) }

  fn error(&mut self, _: RxError) {
    if let Some(value) = self.value.take() {
      self.observer.next(value);
      self.observer.complete();
    }
  }

  fn complete(&mut self) { self.observer.complete() }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}
