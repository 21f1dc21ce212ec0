use crate::fetch::OrderFetcher;
use crate::model::OrderId;
use crate::poller::{DeliveryListener, DeliveryPoller, PollerConfig, PollerError, PollerHandle};
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Owns one running poller for the lifetime of a tracked delivery.
///
/// `DeliveryTracker` is responsible for:
/// - **Startup**: spawning the poller task with its fetcher and listener
/// - **Completion**: waiting for the poller to finish on its own
/// - **Shutdown**: stopping the poller and joining its task
///
/// # Example
///
/// ```ignore
/// let fetcher = HttpOrderFetcher::new(ApiConfig::new(base_url, sid))?;
/// let (listener, mut events) = ChannelListener::new();
/// let tracker = DeliveryTracker::start(OrderId(42), fetcher, listener, PollerConfig::default());
///
/// while let Some(event) = events.recv().await {
///     // render the event
/// }
/// tracker.wait().await?;
/// ```
pub struct DeliveryTracker {
    handle: PollerHandle,
    task: JoinHandle<()>,
}

impl DeliveryTracker {
    /// Spawns a poller for `order_id`. The first fetch happens immediately.
    pub fn start<L: DeliveryListener>(
        order_id: OrderId,
        fetcher: impl OrderFetcher,
        listener: L,
        config: PollerConfig,
    ) -> Self {
        info!(%order_id, "Tracking delivery");
        let (handle, task) = DeliveryPoller::start(order_id, fetcher, listener, config);
        Self { handle, task }
    }

    /// A handle to the running poller, e.g. for snapshots from another task.
    pub fn handle(&self) -> &PollerHandle {
        &self.handle
    }

    pub fn order_id(&self) -> OrderId {
        self.handle.order_id()
    }

    /// Waits until the poller exits on its own, i.e. the order completed.
    ///
    /// Keeps the handle alive while waiting, so the poller is not stopped by
    /// this call.
    pub async fn wait(self) -> Result<(), PollerError> {
        let Self { handle, task } = self;
        let joined = task.await;
        drop(handle);
        Self::joined(joined)
    }

    /// Stops the poller and waits for its task to finish.
    ///
    /// Returns an error only if the poller task panicked.
    pub async fn shutdown(self) -> Result<(), PollerError> {
        info!(order_id = %self.handle.order_id(), "Shutting down tracker...");
        self.handle.stop().await;
        let joined = self.task.await;
        let result = Self::joined(joined);
        if result.is_ok() {
            info!("Tracker shutdown complete.");
        }
        result
    }

    fn joined(joined: Result<(), tokio::task::JoinError>) -> Result<(), PollerError> {
        joined.map_err(|e| {
            error!("Poller task failed: {:?}", e);
            PollerError::TaskFailed(e.to_string())
        })
    }
}
