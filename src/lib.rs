//! # Delivery Tracker
//!
//! > **Live status for a drone-delivered food order.**
//!
//! This crate follows one order from checkout to the doorstep: it polls the
//! delivery service, turns each snapshot into a coarse countdown
//! ("1:30 min", "7 min"), and tells a listener when the drone has landed.
//!
//! ## 🏗️ Design
//!
//! ### One actor per tracked order
//! [`DeliveryPoller`](poller::DeliveryPoller) runs in its own Tokio task and
//! owns everything it mutates: the listener and the current snapshot. It is
//! driven by a single loop (fetch, report, sleep) and controlled through a
//! cloneable [`PollerHandle`](poller::PollerHandle). No locks are involved.
//!
//! ### The network is injected
//! The poller only knows the [`OrderFetcher`](fetch::OrderFetcher) trait.
//! [`HttpOrderFetcher`](api::HttpOrderFetcher) talks to the real service;
//! tests script a [`MockFetcher`](fetch::mock::MockFetcher) instead.
//!
//! ### Failures are transient
//! A failed fetch is reported through
//! [`DeliveryListener::on_error`](poller::DeliveryListener::on_error) and the
//! next tick is scheduled as usual. Only `COMPLETED` or an explicit stop end
//! the loop.
//!
//! ## 🗺️ Module Tour
//!
//! - [`model`] - orders, statuses, menus, and their wire shapes
//! - [`eta`] - remaining-time computation and display formatting
//! - [`fetch`] - the injected accessor and its test double
//! - [`api`] - the HTTP implementation
//! - [`poller`] - the polling actor, its handle and listeners
//! - [`lifecycle`] - [`DeliveryTracker`](lifecycle::DeliveryTracker) and tracing setup
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! RUST_LOG=info cargo run -- --order-id 42 --session-id "$SID" --base-url https://delivery.example.com
//! ```
//!
//! ```bash
//! cargo test
//! ```

pub mod api;
pub mod eta;
pub mod fetch;
pub mod lifecycle;
pub mod model;
pub mod poller;
