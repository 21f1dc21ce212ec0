//! Polling of a single order's delivery status.
//!
//! - [`DeliveryPoller`] - the actor that fetches, estimates, and reports
//! - [`PollerHandle`] - stop it, or ask for the current snapshot
//! - [`DeliveryListener`] - where results go ([`Callbacks`], [`ChannelListener`])

pub mod actor;
pub mod error;
pub mod handle;
pub mod listener;

pub use actor::*;
pub use error::*;
pub use handle::PollerHandle;
pub use listener::*;
