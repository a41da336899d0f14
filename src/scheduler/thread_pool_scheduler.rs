use futures::executor::ThreadPool;
use once_cell::sync::Lazy;

use super::{Duration, ScheduledUnit, Scheduler};

static DEFAULT_POOL: Lazy<Option<ThreadPool>> = Lazy::new(|| match ThreadPool::new() {
  Ok(pool) => Some(pool),
  Err(err) => {
    tracing::error!(error = %err, "failed to start the default thread pool");
    None
  }
});

/// Runs work on a `futures` thread pool, sleeping with `futures-time` timers.
///
/// `ThreadPoolScheduler::default()` shares one lazily created process-wide
/// pool.
#[derive(Clone, Default)]
pub struct ThreadPoolScheduler {
  pool: Option<ThreadPool>,
}

impl ThreadPoolScheduler {
  pub fn new(pool: ThreadPool) -> Self { ThreadPoolScheduler { pool: Some(pool) } }

  fn pool(&self) -> Option<&ThreadPool> { self.pool.as_ref().or(DEFAULT_POOL.as_ref()) }
}

impl Scheduler for ThreadPoolScheduler {
  fn spawn(&self, delay: Duration, unit: ScheduledUnit) {
    let Some(pool) = self.pool() else {
      tracing::warn!("no thread pool available, running the scheduled unit on its own thread");
      spawn_thread(delay, unit);
      return;
    };
    pool.spawn_ok(async move {
      if !delay.is_zero() {
        futures_time::task::sleep(delay.into()).await;
      }
      unit();
    });
  }
}

/// Last resort when no pool could be started: a dedicated thread per unit.
fn spawn_thread(delay: Duration, unit: ScheduledUnit) {
  let spawned = std::thread::Builder::new().name("rxstream-unit".into()).spawn(move || {
    if !delay.is_zero() {
      std::thread::sleep(delay);
    }
    unit();
  });
  if let Err(err) = spawned {
    tracing::error!(error = %err, "failed to spawn a thread, scheduled unit dropped");
  }
}
