//! Error types for order fetching.

use thiserror::Error;

/// Reasons a single fetch of an order can fail.
///
/// The poller treats every variant the same way: the message is reported to
/// the listener and the next poll is scheduled as usual.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FetchError {
    /// The request never produced a response (connection, DNS, timeout).
    #[error("Network error: {0}")]
    Network(String),

    /// The service answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The response body could not be decoded.
    #[error("Malformed response: {0}")]
    Decode(String),

    /// The request could not be built (bad base URL, bad client settings).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}
