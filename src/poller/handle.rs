use crate::model::{Order, OrderId};
use crate::poller::PollerError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};

/// Requests a [`PollerHandle`] sends to its poller.
#[derive(Debug)]
pub(crate) enum PollerCommand {
    Stop {
        respond_to: oneshot::Sender<()>,
    },
    Snapshot {
        respond_to: oneshot::Sender<Option<Order>>,
    },
}

/// Controls a running [`DeliveryPoller`](crate::poller::DeliveryPoller).
///
/// Handles are cheap to clone. The poller keeps running until one of them
/// calls [`stop`](PollerHandle::stop), the order completes, or every handle
/// is dropped.
#[derive(Clone)]
pub struct PollerHandle {
    order_id: OrderId,
    sender: mpsc::Sender<PollerCommand>,
    /// Set once the poller's `run` has begun; until then nobody can
    /// acknowledge a stop.
    started: Arc<AtomicBool>,
}

impl PollerHandle {
    pub(crate) fn new(
        order_id: OrderId,
        sender: mpsc::Sender<PollerCommand>,
        started: Arc<AtomicBool>,
    ) -> Self {
        Self {
            order_id,
            sender,
            started,
        }
    }

    pub fn order_id(&self) -> OrderId {
        self.order_id
    }

    /// False once the poller has exited for any reason.
    pub fn is_running(&self) -> bool {
        !self.sender.is_closed()
    }

    /// Stops polling.
    ///
    /// Cancels the pending timer and drops any fetch still in flight, so its
    /// result is never reported. Once this returns the listener will not be
    /// called again. Calling it on a poller that already exited is a no-op.
    ///
    /// On a poller that has not started running yet the request is queued
    /// and this returns at once. The queued stop is the first thing `run`
    /// reads, so such a poller never fetches.
    #[instrument(skip_all, fields(order_id = %self.order_id))]
    pub async fn stop(&self) {
        let (respond_to, stopped) = oneshot::channel();
        if self
            .sender
            .send(PollerCommand::Stop { respond_to })
            .await
            .is_err()
        {
            debug!("Poller already stopped");
            return;
        }
        // Checked after queueing: a poller that starts from here on reads
        // the stop before its first fetch.
        if !self.started.load(Ordering::Acquire) {
            debug!("Poller not running yet, stop queued");
            return;
        }
        // An error here means the poller exited on its own before reading
        // the request, which is just as final.
        let _ = stopped.await;
    }

    /// The latest non-terminal snapshot, `None` before the first successful
    /// fetch.
    #[instrument(skip_all, fields(order_id = %self.order_id))]
    pub async fn snapshot(&self) -> Result<Option<Order>, PollerError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(PollerCommand::Snapshot { respond_to })
            .await
            .map_err(|_| PollerError::Stopped)?;
        response.await.map_err(|_| PollerError::Dropped)
    }
}
