//! # rxstream: push-based reactive event streams
//!
//! Compose streams of values from iterators, timers, callbacks and broadcast
//! hubs, transform them with operators, and consume them with observers.
//!
//! ## Quick Start
//!
//! ```rust
//! use rxstream::prelude::*;
//!
//! observable::from_iter(0..10)
//!   .filter(|v| v % 2 == 0)
//!   .map(|v| v * 2)
//!   .subscribe(|v| println!("Value: {}", v));
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Observable`] | A cold stream; every subscription runs its own production |
//! | [`Observer`] | Consumes `next`, `error`, and `complete` events |
//! | [`Subscription`] | Handle to cancel an active subscription |
//! | [`PublishSubject`] and friends | Hot broadcast hubs, both observer and observable |
//! | [`Scheduler`] | Where and when delayed or periodic work runs |
//!
//! Delivery to one observer is always serialized, even when the producer
//! pushes from several threads, and nothing is delivered after a terminal
//! event or after cancellation.
//!
//! ## Feature Flags
//!
//! - **`futures-scheduler`** (default): `ThreadPoolScheduler` on a `futures` thread pool
//! - **`timer`** (default): `futures-time` timers used by the thread pool scheduler
//! - **`tokio-scheduler`**: `TokioScheduler` on a tokio runtime handle
//!
//! [`Observable`]: observable::Observable
//! [`Observer`]: observer::Observer
//! [`Subscription`]: subscription::Subscription
//! [`PublishSubject`]: subject::PublishSubject
//! [`Scheduler`]: scheduler::Scheduler
pub mod error;
pub mod observable;
pub mod observer;
pub mod ops;
pub mod prelude;
pub mod rc;
pub mod resources;
pub mod scheduler;
pub mod subject;
pub mod subscriber;
pub mod subscription;

// Re-export the prelude module
pub use prelude::*;
