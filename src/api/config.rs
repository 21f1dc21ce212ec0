use std::time::Duration;

/// Default per-request timeout for [`HttpOrderFetcher`](crate::api::HttpOrderFetcher).
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for the delivery service.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    /// Service root, e.g. `https://delivery.example.com/api`.
    pub base_url: String,
    /// Session token sent as the `sid` query parameter.
    pub session_id: String,
    /// Applied to every request; the poller itself never times a fetch out.
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            session_id: session_id.into(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
