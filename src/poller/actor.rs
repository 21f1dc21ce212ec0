//! # Delivery Status Poller
//!
//! The poller is a small actor: it owns the listener and the current order
//! snapshot, runs in its own Tokio task, and is controlled through a
//! [`PollerHandle`] over a command channel.
//!
//! ## Scheduling
//!
//! One loop drives everything:
//!
//! ```text
//! fetch ──► dispatch ──► sleep(interval) ──► fetch ──► ...
//!              │
//!              └── COMPLETED ──► on_terminal, exit
//! ```
//!
//! The interval is measured from the end of a fetch, so a slow fetch pushes
//! the next one back and two fetches are never in flight together.
//!
//! ## Cancellation
//!
//! Both the fetch and the sleep are raced against the command channel with a
//! `biased` select. A stop request therefore wins over a fetch that completes
//! in the same instant, and the in-flight fetch future is dropped unread.
//! The stop is acknowledged only after the loop has exited, which is what
//! lets [`PollerHandle::stop`] promise that no callback follows it.

use crate::eta::RemainingTime;
use crate::fetch::{FetchError, OrderFetcher};
use crate::model::{Order, OrderId};
use crate::poller::handle::PollerCommand;
use crate::poller::{DeliveryListener, PollerHandle};
use chrono::Utc;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Pause between the end of one fetch and the start of the next.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollerConfig {
    pub interval: Duration,
    /// Capacity of the handle → poller command channel.
    pub command_buffer: usize,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            command_buffer: 8,
        }
    }
}

impl PollerConfig {
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

/// Why the poll loop ended.
enum Exit {
    Completed,
    /// Carries the acknowledgement for an explicit stop; `None` when every
    /// handle was dropped.
    Stopped(Option<oneshot::Sender<()>>),
}

/// Polls one order until it completes or is stopped.
///
/// **Concurrency Model**: the poller owns its listener and snapshot and
/// touches them only from its own task, so neither needs a lock. Callbacks
/// run sequentially, in poll order.
pub struct DeliveryPoller<L: DeliveryListener> {
    order_id: OrderId,
    fetcher: Arc<dyn OrderFetcher>,
    listener: L,
    config: PollerConfig,
    receiver: mpsc::Receiver<PollerCommand>,
    started: Arc<AtomicBool>,
    current: Option<Order>,
}

impl<L: DeliveryListener> DeliveryPoller<L> {
    /// Creates a poller and the handle that controls it.
    ///
    /// Nothing is fetched until [`run`](DeliveryPoller::run) is awaited or
    /// spawned.
    pub fn new(
        order_id: OrderId,
        fetcher: impl OrderFetcher,
        listener: L,
        config: PollerConfig,
    ) -> (Self, PollerHandle) {
        let (sender, receiver) = mpsc::channel(config.command_buffer.max(1));
        let started = Arc::new(AtomicBool::new(false));
        let poller = Self {
            order_id,
            fetcher: Arc::new(fetcher),
            listener,
            config,
            receiver,
            started: Arc::clone(&started),
            current: None,
        };
        (poller, PollerHandle::new(order_id, sender, started))
    }

    /// Creates a poller and spawns it on the current Tokio runtime.
    ///
    /// The first fetch is issued immediately.
    pub fn start(
        order_id: OrderId,
        fetcher: impl OrderFetcher,
        listener: L,
        config: PollerConfig,
    ) -> (PollerHandle, JoinHandle<()>) {
        let (poller, handle) = Self::new(order_id, fetcher, listener, config);
        (handle, tokio::spawn(poller.run()))
    }

    /// Runs the poll loop until the order completes or the poller is stopped.
    pub async fn run(mut self) {
        self.started.store(true, Ordering::Release);
        let order_id = self.order_id;
        let interval_ms = u64::try_from(self.config.interval.as_millis()).unwrap_or(u64::MAX);
        info!(%order_id, interval_ms, "Poller started");

        let exit = self.poll_loop().await;
        self.current = None;

        match exit {
            Exit::Completed => info!(%order_id, "Poller finished"),
            Exit::Stopped(acknowledge) => {
                info!(%order_id, "Poller stopped");
                if let Some(acknowledge) = acknowledge {
                    let _ = acknowledge.send(());
                }
            }
        }
    }

    async fn poll_loop(&mut self) -> Exit {
        let fetcher = Arc::clone(&self.fetcher);
        let order_id = self.order_id;
        let interval = self.config.interval;

        loop {
            let fetched = match self.serve_until(fetcher.fetch_order(order_id)).await {
                Ok(fetched) => fetched,
                Err(exit) => return exit,
            };
            if let Some(exit) = self.dispatch(fetched) {
                return exit;
            }
            if let Err(exit) = self.serve_until(tokio::time::sleep(interval)).await {
                return exit;
            }
        }
    }

    /// Drives `work` to completion while answering commands.
    ///
    /// Returns `Err` as soon as a stop is requested or every handle is gone;
    /// `work` is dropped unfinished in that case.
    async fn serve_until<F: Future>(&mut self, work: F) -> Result<F::Output, Exit> {
        tokio::pin!(work);
        loop {
            tokio::select! {
                biased;
                command = self.receiver.recv() => match command {
                    Some(PollerCommand::Snapshot { respond_to }) => {
                        let _ = respond_to.send(self.current.clone());
                    }
                    Some(PollerCommand::Stop { respond_to }) => {
                        return Err(Exit::Stopped(Some(respond_to)));
                    }
                    None => return Err(Exit::Stopped(None)),
                },
                output = &mut work => return Ok(output),
            }
        }
    }

    /// Hands one fetch result to the listener. Returns `Some` when polling
    /// must end.
    fn dispatch(&mut self, fetched: Result<Order, FetchError>) -> Option<Exit> {
        let order_id = self.order_id;
        let order = match fetched {
            Ok(order) => order,
            Err(e) => {
                warn!(%order_id, error = %e, "Fetch failed, retrying next tick");
                self.listener.on_error(&e.to_string());
                return None;
            }
        };

        if let Some(previous) = &self.current {
            if order.status.regresses_from(&previous.status) {
                // The server is authoritative; report and move on.
                warn!(%order_id, from = %previous.status, to = %order.status, "Status moved backwards");
            }
        }

        if order.status.is_terminal() {
            info!(%order_id, "Order completed");
            self.listener.on_terminal(&order);
            return Some(Exit::Completed);
        }

        let remaining = RemainingTime::compute(&order, Utc::now());
        debug!(%order_id, status = %order.status, %remaining, "Order updated");
        self.listener.on_update(&order, &remaining);
        self.current = Some(order);
        None
    }
}
