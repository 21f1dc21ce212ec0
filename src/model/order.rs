/// A snapshot of a delivery order as reported by the service.
///
/// Snapshots are immutable values: the poller replaces its current snapshot
/// wholesale on every successful fetch and never patches one in place.
use crate::model::{Location, MenuId};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for Orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub u32);

impl From<u32> for OrderId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the customer who placed an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u32);

/// Delivery status of an order.
///
/// The service moves an order along
/// `PENDING → CONFIRMED → PREPARING → ON_DELIVERY → COMPLETED`.
/// Values outside that set are kept verbatim in [`OrderStatus::Other`] so they
/// can still be shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    OnDelivery,
    Completed,
    Other(String),
}

impl OrderStatus {
    /// Wire representation, e.g. `ON_DELIVERY`.
    pub fn as_str(&self) -> &str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Confirmed => "CONFIRMED",
            OrderStatus::Preparing => "PREPARING",
            OrderStatus::OnDelivery => "ON_DELIVERY",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Other(raw) => raw,
        }
    }

    /// Only `COMPLETED` ends a delivery.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed)
    }

    /// Position in the delivery sequence, `None` for unrecognised statuses.
    pub fn stage(&self) -> Option<u8> {
        match self {
            OrderStatus::Pending => Some(0),
            OrderStatus::Confirmed => Some(1),
            OrderStatus::Preparing => Some(2),
            OrderStatus::OnDelivery => Some(3),
            OrderStatus::Completed => Some(4),
            OrderStatus::Other(_) => None,
        }
    }

    /// Human-readable label for display.
    pub fn label(&self) -> &str {
        match self {
            OrderStatus::Pending => "Awaiting confirmation",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::Preparing => "Preparing",
            OrderStatus::OnDelivery => "On delivery",
            OrderStatus::Completed => "Completed",
            OrderStatus::Other(raw) => raw,
        }
    }

    /// True when `self` sits earlier in the sequence than `previous`.
    ///
    /// Unrecognised statuses never count as a regression.
    pub fn regresses_from(&self, previous: &OrderStatus) -> bool {
        match (self.stage(), previous.stage()) {
            (Some(now), Some(before)) => now < before,
            _ => false,
        }
    }
}

impl From<String> for OrderStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "PENDING" => OrderStatus::Pending,
            "CONFIRMED" => OrderStatus::Confirmed,
            "PREPARING" => OrderStatus::Preparing,
            "ON_DELIVERY" => OrderStatus::OnDelivery,
            "COMPLETED" => OrderStatus::Completed,
            _ => OrderStatus::Other(raw),
        }
    }
}

impl From<&str> for OrderStatus {
    fn from(raw: &str) -> Self {
        OrderStatus::from(raw.to_string())
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        match status {
            OrderStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub menu_id: MenuId,
    pub user_id: UserId,
    pub status: OrderStatus,
    /// Raw ISO-8601 creation instant, kept as sent so a malformed value can
    /// still be displayed.
    pub creation_timestamp: String,
    pub delivery_duration_minutes: u32,
    pub delivery_location: Option<Location>,
    /// Courier (drone) position, `None` when absent or `null`.
    pub current_position: Option<Location>,
    pub delivery_timestamp: Option<String>,
}

impl Order {
    /// Creates an order snapshot with no location data.
    ///
    /// # Arguments
    /// * `id` - Order identifier assigned by the service
    /// * `status` - Current delivery status
    /// * `creation_timestamp` - ISO-8601 creation instant
    /// * `delivery_duration_minutes` - Delivery time promised by the menu
    pub fn new(
        id: OrderId,
        status: impl Into<OrderStatus>,
        creation_timestamp: impl Into<String>,
        delivery_duration_minutes: u32,
    ) -> Self {
        Self {
            id,
            menu_id: MenuId(0),
            user_id: UserId(0),
            status: status.into(),
            creation_timestamp: creation_timestamp.into(),
            delivery_duration_minutes,
            delivery_location: None,
            current_position: None,
            delivery_timestamp: None,
        }
    }

    pub fn with_menu(mut self, menu_id: MenuId) -> Self {
        self.menu_id = menu_id;
        self
    }

    pub fn with_delivery_location(mut self, location: Location) -> Self {
        self.delivery_location = Some(location);
        self
    }

    pub fn with_current_position(mut self, position: Location) -> Self {
        self.current_position = Some(position);
        self
    }

    pub fn is_completed(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Wire shape of `GET /order/{oid}`.
///
/// The service does not include the delivery duration; it lives on the
/// menu, see [`OrderRecord::into_order`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub oid: OrderId,
    pub mid: MenuId,
    pub uid: UserId,
    pub status: OrderStatus,
    pub creation_timestamp: String,
    #[serde(default)]
    pub delivery_location: Option<Location>,
    #[serde(default)]
    pub current_position: Option<Location>,
    #[serde(default)]
    pub delivery_timestamp: Option<String>,
}

impl OrderRecord {
    /// Combines the record with the delivery duration of its menu.
    pub fn into_order(self, delivery_duration_minutes: u32) -> Order {
        Order {
            id: self.oid,
            menu_id: self.mid,
            user_id: self.uid,
            status: self.status,
            creation_timestamp: self.creation_timestamp,
            delivery_duration_minutes,
            delivery_location: self.delivery_location,
            current_position: self.current_position,
            delivery_timestamp: self.delivery_timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_known_and_unknown_values() {
        assert_eq!(OrderStatus::from("ON_DELIVERY"), OrderStatus::OnDelivery);
        assert_eq!(
            OrderStatus::from("LOST_AT_SEA"),
            OrderStatus::Other("LOST_AT_SEA".to_string())
        );
        assert_eq!(String::from(OrderStatus::OnDelivery), "ON_DELIVERY");
        assert_eq!(OrderStatus::from("LOST_AT_SEA").label(), "LOST_AT_SEA");
    }

    #[test]
    fn test_only_completed_is_terminal() {
        assert!(OrderStatus::Completed.is_terminal());
        for status in [
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Preparing,
            OrderStatus::OnDelivery,
            OrderStatus::Other("COMPLETE".to_string()),
        ] {
            assert!(!status.is_terminal(), "{status} must not be terminal");
        }
    }

    #[test]
    fn test_regression_detection() {
        assert!(OrderStatus::Preparing.regresses_from(&OrderStatus::OnDelivery));
        assert!(!OrderStatus::OnDelivery.regresses_from(&OrderStatus::Preparing));
        assert!(!OrderStatus::Pending.regresses_from(&OrderStatus::Pending));
        assert!(!OrderStatus::Other("X".into()).regresses_from(&OrderStatus::Completed));
    }

    #[test]
    fn test_builder_fills_optional_fields() {
        let order = Order::new(OrderId(4), "PREPARING", "2025-01-01T12:00:00.000Z", 20)
            .with_menu(MenuId(9))
            .with_delivery_location(Location::new(45.0, 9.0))
            .with_current_position(Location::new(45.1, 9.1));

        assert_eq!(order.status, OrderStatus::Preparing);
        assert_eq!(order.menu_id, MenuId(9));
        assert_eq!(order.current_position, Some(Location::new(45.1, 9.1)));
        assert!(!order.is_completed());
    }

    #[test]
    fn test_decode_order_record_with_null_position() {
        let json = r#"{
            "oid": 42,
            "mid": 7,
            "uid": 3,
            "status": "ON_DELIVERY",
            "creationTimestamp": "2025-01-01T12:00:00.000Z",
            "deliveryLocation": { "lat": 45.4642, "lng": 9.19 },
            "currentPosition": null
        }"#;

        let record: OrderRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.oid, OrderId(42));
        assert_eq!(record.status, OrderStatus::OnDelivery);
        assert!(record.current_position.is_none());
        assert!(record.delivery_timestamp.is_none());

        let order = record.into_order(10);
        assert_eq!(order.delivery_duration_minutes, 10);
        assert_eq!(order.menu_id, MenuId(7));
        assert_eq!(order.delivery_location, Some(Location::new(45.4642, 9.19)));
    }

    #[test]
    fn test_decode_keeps_unknown_status() {
        let json = r#"{
            "oid": 1, "mid": 1, "uid": 1,
            "status": "REFUNDED",
            "creationTimestamp": "2025-01-01T12:00:00.000Z"
        }"#;
        let record: OrderRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.status, OrderStatus::Other("REFUNDED".to_string()));
    }
}
