//! # rill: composable push-based value streams
//!
//! A small reactive-stream engine: streams push values to observers
//! through operator chains assembled at subscribe time, every
//! subscription hands back an explicit cancellation token, and anything
//! time-based runs on an injected, cancellable scheduler.
//!
//! ## Quick start
//!
//! ```rust
//! use rill::prelude::*;
//!
//! let mut evens = Vec::new();
//! observable::from_iter(0..10)
//!   .filter(|v| v % 2 == 0)
//!   .map(|v| v * v)
//!   .take(3)
//!   .subscribe(|v| evens.push(v));
//! assert_eq!(evens, vec![0, 4, 16]);
//! ```
//!
//! ## Key concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Observable`](observable::Observable) | Operator and subscribe surface of every stream |
//! | [`Observer`](observer::Observer) | Consumes `next`, `error` and `complete` notifications |
//! | [`Subscription`](subscription::Subscription) | Idempotent cancellation/release token |
//! | [`Scheduler`](scheduler::Scheduler) / [`Worker`](scheduler::Worker) | Ordered, cancellable deferred execution |
//! | [`Subject`](subject::Subject) | Multicast hub: observer and observable at once |
//!
//! Errors travel the typed `Err` channel; `subscribe(next)` only compiles
//! once a chain's error type is `Infallible`, so unhandled failures are a
//! compile error rather than a runtime surprise.

pub mod observable;
pub mod observer;
pub mod ops;
pub mod prelude;
pub mod rc;
pub mod scheduler;
pub mod subject;
pub mod subscriber;
pub mod subscription;
pub mod type_hint;

pub use prelude::*;
