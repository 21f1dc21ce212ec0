//! # Mock Fetcher
//!
//! A scripted [`OrderFetcher`] for testing the poller without a server.
//!
//! Each call to `fetch_order` consumes the next expectation in order. An
//! expectation can resolve immediately, after a delay, or only once the test
//! releases it, which is how tests hold a fetch "in flight".
//!
//! Once the script runs out, further fetches never resolve. A poller under
//! test therefore parks on its last fetch instead of spinning.
//!
//! # Example
//! ```ignore
//! let mock = MockFetcher::new();
//! mock.expect_fetch().return_ok(order.clone());
//! mock.expect_fetch().delayed(Duration::from_secs(8)).return_err(FetchError::Network("reset".into()));
//!
//! let (handle, task) = DeliveryPoller::start(order.id, mock.clone(), listener, PollerConfig::default());
//! // ...
//! mock.verify();
//! ```

use crate::fetch::{FetchError, OrderFetcher};
use crate::model::{Order, OrderId};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::Instant;

struct Expectation {
    response: Result<Order, FetchError>,
    delay: Option<Duration>,
    release: Option<oneshot::Receiver<()>>,
}

#[derive(Default)]
struct MockState {
    expectations: VecDeque<Expectation>,
    calls: Vec<(OrderId, Instant)>,
    in_flight: usize,
    max_in_flight: usize,
}

/// A scripted fetcher with call tracking.
///
/// Clones share the same script and counters, so a test keeps one clone and
/// hands the other to the poller.
#[derive(Clone, Default)]
pub struct MockFetcher {
    state: Arc<Mutex<MockState>>,
}

impl MockFetcher {
    /// Creates a mock with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the response for the next unanswered fetch.
    pub fn expect_fetch(&self) -> FetchExpectationBuilder {
        FetchExpectationBuilder {
            state: self.state.clone(),
            delay: None,
            release: None,
        }
    }

    /// Number of fetches started so far.
    pub fn calls(&self) -> usize {
        self.state.lock().unwrap().calls.len()
    }

    /// The instants at which each fetch started, in call order.
    pub fn call_instants(&self) -> Vec<Instant> {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .map(|(_, at)| *at)
            .collect()
    }

    /// Order ids requested so far, in call order.
    pub fn requested_ids(&self) -> Vec<OrderId> {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .map(|(id, _)| *id)
            .collect()
    }

    /// Fetches currently awaiting their response.
    pub fn in_flight(&self) -> usize {
        self.state.lock().unwrap().in_flight
    }

    /// Highest number of fetches ever in flight at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.state.lock().unwrap().max_in_flight
    }

    /// Verifies that every scripted response was consumed.
    pub fn verify(&self) {
        let state = self.state.lock().unwrap();
        if !state.expectations.is_empty() {
            panic!(
                "Not all expectations were met. {} remaining",
                state.expectations.len()
            );
        }
    }
}

/// Decrements the in-flight counter even when the fetch future is dropped.
struct InFlightGuard {
    state: Arc<Mutex<MockState>>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if let Ok(mut state) = self.state.lock() {
            state.in_flight -= 1;
        }
    }
}

#[async_trait]
impl OrderFetcher for MockFetcher {
    async fn fetch_order(&self, order_id: OrderId) -> Result<Order, FetchError> {
        let expectation = {
            let mut state = self.state.lock().unwrap();
            state.calls.push((order_id, Instant::now()));
            state.in_flight += 1;
            state.max_in_flight = state.max_in_flight.max(state.in_flight);
            state.expectations.pop_front()
        };
        let _guard = InFlightGuard {
            state: self.state.clone(),
        };

        let Some(expectation) = expectation else {
            return std::future::pending().await;
        };
        if let Some(delay) = expectation.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(release) = expectation.release {
            // A dropped sender releases the fetch too.
            let _ = release.await;
        }
        expectation.response
    }
}

/// Builder for a single scripted fetch.
pub struct FetchExpectationBuilder {
    state: Arc<Mutex<MockState>>,
    delay: Option<Duration>,
    release: Option<oneshot::Receiver<()>>,
}

impl FetchExpectationBuilder {
    /// Resolves the fetch only after `delay` has elapsed.
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Resolves the fetch only once `release` fires (or its sender is dropped).
    pub fn held_until(mut self, release: oneshot::Receiver<()>) -> Self {
        self.release = Some(release);
        self
    }

    /// Sets the expectation to return an order snapshot.
    pub fn return_ok(self, order: Order) {
        self.push(Ok(order));
    }

    /// Sets the expectation to fail.
    pub fn return_err(self, error: FetchError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<Order, FetchError>) {
        let mut state = self.state.lock().unwrap();
        state.expectations.push_back(Expectation {
            response,
            delay: self.delay,
            release: self.release,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OrderStatus;

    fn order(status: OrderStatus) -> Order {
        Order::new(OrderId(5), status, "2025-01-01T12:00:00.000Z", 10)
    }

    #[tokio::test]
    async fn test_mock_replays_script_in_order() {
        let mock = MockFetcher::new();
        mock.expect_fetch().return_ok(order(OrderStatus::Pending));
        mock.expect_fetch().return_err(FetchError::Network("connection reset".into()));

        let first = mock.fetch_order(OrderId(5)).await.unwrap();
        assert_eq!(first.status, OrderStatus::Pending);

        let second = mock.fetch_order(OrderId(5)).await.unwrap_err();
        assert_eq!(second, FetchError::Network("connection reset".into()));

        assert_eq!(mock.calls(), 2);
        assert_eq!(mock.requested_ids(), vec![OrderId(5), OrderId(5)]);
        assert_eq!(mock.in_flight(), 0);
        mock.verify();
    }

    #[tokio::test(start_paused = true)]
    async fn test_delayed_expectation_waits() {
        let mock = MockFetcher::new();
        mock.expect_fetch()
            .delayed(Duration::from_secs(3))
            .return_ok(order(OrderStatus::Confirmed));

        let started = Instant::now();
        mock.fetch_order(OrderId(5)).await.unwrap();
        assert!(started.elapsed() >= Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_held_fetch_counts_as_in_flight_until_released() {
        let mock = MockFetcher::new();
        let (release, held) = oneshot::channel();
        mock.expect_fetch()
            .held_until(held)
            .return_ok(order(OrderStatus::OnDelivery));

        let fetcher = mock.clone();
        let task = tokio::spawn(async move { fetcher.fetch_order(OrderId(5)).await });

        while mock.calls() == 0 {
            tokio::task::yield_now().await;
        }
        assert_eq!(mock.in_flight(), 1);

        release.send(()).unwrap();
        let fetched = task.await.unwrap().unwrap();
        assert_eq!(fetched.status, OrderStatus::OnDelivery);
        assert_eq!(mock.in_flight(), 0);
        assert_eq!(mock.max_in_flight(), 1);
    }

    #[tokio::test]
    #[should_panic(expected = "Not all expectations were met")]
    async fn test_verify_reports_unused_expectations() {
        let mock = MockFetcher::new();
        mock.expect_fetch().return_ok(order(OrderStatus::Pending));
        mock.verify();
    }
}
