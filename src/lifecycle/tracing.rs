//! # Observability & Tracing
//!
//! [`setup_tracing`] initializes structured logging for the binary and for
//! anyone embedding the library who wants the same output.
//!
//! ## What Gets Traced
//!
//! - **Poller lifecycle**: start, stop, completion (`info`)
//! - **Each update**: status and formatted remaining time (`debug`)
//! - **Fetch failures and status regressions** (`warn`)
//! - **HTTP requests**: path only, never the session token (`debug`)
//!
//! ## Usage Examples
//!
//! ```bash
//! # Lifecycle only
//! RUST_LOG=info delivery-tracker --order-id 42
//!
//! # Every poll
//! RUST_LOG=debug delivery-tracker --order-id 42
//!
//! # Only the HTTP layer
//! RUST_LOG=delivery_tracker::api=debug delivery-tracker --order-id 42
//! ```
//!
//! With `RUST_LOG=debug` a delivery reads like:
//!
//! ```text
//! INFO Tracking delivery order_id=42
//! INFO Poller started order_id=42 interval_ms=5000
//! DEBUG order{order_id=42}: GET path="/order/42"
//! DEBUG order{order_id=42}: Order received status=ON_DELIVERY menu_id=7
//! DEBUG Order updated order_id=42 status=ON_DELIVERY remaining=3 min
//! INFO Order completed order_id=42
//! INFO Poller finished order_id=42
//! ```

/// Installs a compact `fmt` subscriber filtered by `RUST_LOG`.
///
/// Falls back to `info` when `RUST_LOG` is unset or invalid.
pub fn setup_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
