//! Command-line delivery tracker.
//!
//! Follows one order until it is delivered, printing every status change.
//! Every flag can also be set from the environment.

use clap::Parser;
use delivery_tracker::api::{ApiConfig, HttpOrderFetcher};
use delivery_tracker::eta::{format_clock_time, format_delivery_timestamp};
use delivery_tracker::lifecycle::{setup_tracing, DeliveryTracker};
use delivery_tracker::model::{Order, OrderId};
use delivery_tracker::poller::{ChannelListener, DeliveryEvent, PollerConfig};
use std::time::Duration;
use tracing::{error, info, warn};

#[derive(Debug, Parser)]
#[command(name = "delivery-tracker", about = "Follow a drone delivery until it lands")]
struct Args {
    /// Order to track.
    #[arg(long, env = "DELIVERY_ORDER_ID")]
    order_id: u32,

    /// Session token issued by the service.
    #[arg(long, env = "DELIVERY_SESSION_ID")]
    session_id: String,

    /// Service root URL.
    #[arg(long, env = "DELIVERY_BASE_URL")]
    base_url: String,

    /// Pause between polls, in milliseconds.
    #[arg(long, env = "DELIVERY_POLL_INTERVAL_MS", default_value_t = 5000)]
    interval_ms: u64,

    /// Per-request timeout, in milliseconds.
    #[arg(long, env = "DELIVERY_TIMEOUT_MS", default_value_t = 10_000)]
    timeout_ms: u64,
}

fn describe_position(order: &Order) -> String {
    order
        .current_position
        .map(|position| position.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();
    let args = Args::parse();

    let api = ApiConfig::new(args.base_url, args.session_id)
        .with_timeout(Duration::from_millis(args.timeout_ms));
    let fetcher = HttpOrderFetcher::new(api).map_err(|e| e.to_string())?;
    let config = PollerConfig::default().with_interval(Duration::from_millis(args.interval_ms));

    let (listener, mut events) = ChannelListener::new();
    let tracker = DeliveryTracker::start(OrderId(args.order_id), fetcher, listener, config);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(DeliveryEvent::Updated { order, remaining }) => info!(
                    status = order.status.label(),
                    remaining = %remaining,
                    expected_at = %format_clock_time(remaining.expected_at),
                    position = %describe_position(&order),
                    "Delivery update"
                ),
                Some(DeliveryEvent::Failed(message)) => warn!(%message, "Refresh failed"),
                Some(DeliveryEvent::Completed(order)) => {
                    let delivered_at = order
                        .delivery_timestamp
                        .as_deref()
                        .map(format_delivery_timestamp)
                        .unwrap_or_else(|| "-".to_string());
                    info!(order_id = %order.id, %delivered_at, "Order delivered");
                    break;
                }
                None => break,
            },
            _ = &mut ctrl_c => {
                info!("Interrupted");
                return tracker.shutdown().await.map_err(|e| e.to_string());
            }
        }
    }

    tracker.wait().await.map_err(|e| {
        error!(error = %e, "Tracker failed");
        e.to_string()
    })
}
