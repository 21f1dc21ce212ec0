//! Runtime orchestration and lifecycle management.
//!
//! - [`DeliveryTracker`] - starts, awaits, and shuts down the poller for one order
//! - [`setup_tracing`] - initializes the tracing/logging infrastructure

pub mod tracing;
pub mod tracker;

pub use self::tracing::*;
pub use tracker::*;
