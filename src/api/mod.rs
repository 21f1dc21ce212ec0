//! HTTP access to the delivery service.
//!
//! [`HttpOrderFetcher`] is the production [`OrderFetcher`](crate::fetch::OrderFetcher):
//! it reads `GET /order/{oid}` and completes the snapshot with the delivery
//! duration of the ordered menu (`GET /menu/{mid}`).

pub mod client;
pub mod config;

pub use client::*;
pub use config::*;
