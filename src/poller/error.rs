//! Error types for talking to a running poller.

use thiserror::Error;

/// Errors returned by [`PollerHandle`](crate::poller::PollerHandle) queries and
/// by [`DeliveryTracker`](crate::lifecycle::DeliveryTracker) shutdown.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PollerError {
    /// The poller already exited (stopped, or the order completed).
    #[error("Poller stopped")]
    Stopped,

    /// The poller exited while the request was pending.
    #[error("Poller dropped response channel")]
    Dropped,

    /// The poller task panicked or was aborted.
    #[error("Poller task failed: {0}")]
    TaskFailed(String),
}
