use tokio::runtime::Handle;

use super::{Duration, ScheduledUnit, Scheduler};

/// Runs work as tasks on a tokio runtime.
#[derive(Clone, Debug)]
pub struct TokioScheduler(Handle);

impl TokioScheduler {
  pub fn new(handle: Handle) -> Self { TokioScheduler(handle) }

  /// The scheduler of the runtime the caller is running in, if any.
  pub fn try_current() -> Option<Self> { Handle::try_current().ok().map(TokioScheduler) }
}

impl Scheduler for TokioScheduler {
  fn spawn(&self, delay: Duration, unit: ScheduledUnit) {
    self.0.spawn(async move {
      if !delay.is_zero() {
        tokio::time::sleep(delay).await;
      }
      unit();
    });
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tokio::sync::oneshot;

  #[tokio::test(flavor = "multi_thread")]
  async fn runs_after_delay() {
    let scheduler = TokioScheduler::try_current().unwrap();
    let (tx, rx) = oneshot::channel();
    scheduler.schedule(Duration::from_millis(5), move || {
      let _ = tx.send(42);
    });
    assert_eq!(rx.await.unwrap(), 42);
  }
}
