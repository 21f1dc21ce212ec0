//! Pure data structures decoded from the delivery service.

pub mod location;
pub mod menu;
pub mod order;

pub use location::*;
pub use menu::*;
pub use order::*;
