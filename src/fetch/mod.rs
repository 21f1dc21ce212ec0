//! The order accessor injected into the poller.
//!
//! The poller never talks HTTP itself; it only calls [`OrderFetcher::fetch_order`].
//! Anything that can produce an [`Order`] asynchronously qualifies:
//!
//! - [`HttpOrderFetcher`](crate::api::HttpOrderFetcher) for the real service,
//! - [`mock::MockFetcher`] in tests,
//! - any `Fn(OrderId) -> impl Future<Output = Result<Order, FetchError>>` closure.

pub mod error;
pub mod mock;

pub use error::*;

use crate::model::{Order, OrderId};
use async_trait::async_trait;
use std::future::Future;

/// Asynchronous source of order snapshots.
///
/// Implementations own their timeout policy; the poller waits for as long as
/// a fetch takes.
#[async_trait]
pub trait OrderFetcher: Send + Sync + 'static {
    async fn fetch_order(&self, order_id: OrderId) -> Result<Order, FetchError>;
}

#[async_trait]
impl<F, Fut> OrderFetcher for F
where
    F: Fn(OrderId) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Order, FetchError>> + Send + 'static,
{
    async fn fetch_order(&self, order_id: OrderId) -> Result<Order, FetchError> {
        (self)(order_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OrderStatus;

    async fn fetch_with(fetcher: &dyn OrderFetcher, id: OrderId) -> Result<Order, FetchError> {
        fetcher.fetch_order(id).await
    }

    #[tokio::test]
    async fn test_closure_is_a_fetcher() {
        let fetcher = |id: OrderId| async move {
            Ok::<_, FetchError>(Order::new(
                id,
                OrderStatus::Preparing,
                "2025-01-01T12:00:00.000Z",
                15,
            ))
        };

        let order = fetch_with(&fetcher, OrderId(9)).await.unwrap();
        assert_eq!(order.id, OrderId(9));
        assert_eq!(order.status, OrderStatus::Preparing);
    }

    #[tokio::test]
    async fn test_closure_errors_pass_through() {
        let fetcher = |_id: OrderId| async move {
            Err::<Order, _>(FetchError::Http { status: 503, message: "Service Unavailable".into() })
        };

        let err = fetch_with(&fetcher, OrderId(1)).await.unwrap_err();
        assert_eq!(err.to_string(), "HTTP 503: Service Unavailable");
    }
}
