//! Prelude module for convenient imports
//!
//! This module re-exports commonly used types and traits for easy access.

// Errors
pub use crate::error::RxError;
// Creation functions live under `observable::`, the stream types next to them
pub use crate::observable;
pub use crate::observable::{
  BoxedObservable, ConnectableObservable, Observable, ObservableExt, RefCountOp,
};
// Observer trait and events
pub use crate::observer::{Event, Observer};
// Operator types users name directly
pub use crate::ops::{
  debug::{DebugSink, TracingSink},
  into_future::{FirstValueFuture, ObservableFuture},
  into_stream::ObservableStream,
  retry::{RetryConfig, RetryPolicy},
};
// Schedulers
pub use crate::scheduler::{
  CurrentThreadScheduler, Duration, Scheduler, TaskHandle, TaskState, TestScheduler,
};
#[cfg(all(feature = "futures-scheduler", feature = "timer"))]
pub use crate::scheduler::ThreadPoolScheduler;
#[cfg(feature = "tokio-scheduler")]
pub use crate::scheduler::TokioScheduler;
// Subject
pub use crate::subject::*;
// Subscriber and subscription
pub use crate::subscriber::Subscriber;
pub use crate::subscription::*;
