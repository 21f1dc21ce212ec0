//! # Remaining-time estimation
//!
//! Turns an order's creation instant and delivery duration into the coarse
//! countdown shown to the customer.
//!
//! The countdown deliberately avoids precision: below two minutes it moves in
//! fixed 30-second checkpoints, above that it rounds up to whole minutes.
//!
//! ```
//! use delivery_tracker::eta::format_delivery_time;
//!
//! assert_eq!(format_delivery_time(0), "30 sec");
//! assert_eq!(format_delivery_time(1), "1 min");
//! assert_eq!(format_delivery_time(7), "7 min");
//! ```

use crate::model::Order;
use chrono::{DateTime, Duration, Utc};
use std::fmt::Display;

const MILLIS_PER_MINUTE: i64 = 60_000;

/// Parses a UTC instant such as `2025-01-01T12:00:00.000Z`.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|instant| instant.with_timezone(&Utc))
}

/// Instant at which the order is expected to arrive.
///
/// An unparsable creation timestamp counts as "created just now", so the
/// full delivery duration is still ahead.
pub fn expected_delivery(
    creation_timestamp: &str,
    delivery_duration_minutes: u32,
    now: DateTime<Utc>,
) -> DateTime<Utc> {
    let created = parse_timestamp(creation_timestamp).unwrap_or(now);
    created + Duration::minutes(i64::from(delivery_duration_minutes))
}

/// Whole minutes left until delivery, rounded up and never negative.
pub fn remaining_minutes(
    creation_timestamp: &str,
    delivery_duration_minutes: u32,
    now: DateTime<Utc>,
) -> i64 {
    let expected = expected_delivery(creation_timestamp, delivery_duration_minutes, now);
    minutes_until(expected, now)
}

fn minutes_until(expected: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let diff_millis = (expected - now).num_milliseconds();
    // Integer division truncates toward zero, which is already the ceiling
    // for negative values.
    let mut minutes = diff_millis / MILLIS_PER_MINUTE;
    if diff_millis % MILLIS_PER_MINUTE > 0 {
        minutes += 1;
    }
    minutes.max(0)
}

/// Classifies a number of seconds into a display checkpoint.
pub fn format_remaining_seconds(seconds: i64) -> String {
    match seconds {
        s if s <= 30 => "30 sec".to_string(),
        31..=60 => "1 min".to_string(),
        61..=90 => "1:30 min".to_string(),
        91..=120 => "2 min".to_string(),
        s => format!("{} min", s / 60 + i64::from(s % 60 != 0)),
    }
}

/// Formats a remaining delivery time given in whole minutes.
pub fn format_delivery_time(minutes: i64) -> String {
    if minutes <= 0 {
        return "30 sec".to_string();
    }
    format_remaining_seconds(minutes.saturating_mul(60))
}

/// `HH:MM` (UTC) for the expected-delivery line.
pub fn format_clock_time(instant: DateTime<Utc>) -> String {
    instant.format("%H:%M").to_string()
}

/// `dd/mm/YYYY HH:MM` for a completed order, or the raw value if it does
/// not parse.
pub fn format_delivery_timestamp(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(instant) => instant.format("%d/%m/%Y %H:%M").to_string(),
        None => raw.to_string(),
    }
}

/// The estimate attached to every non-terminal update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemainingTime {
    pub minutes: i64,
    pub expected_at: DateTime<Utc>,
    pub display: String,
}

impl RemainingTime {
    pub fn compute(order: &Order, now: DateTime<Utc>) -> Self {
        let expected_at = expected_delivery(
            &order.creation_timestamp,
            order.delivery_duration_minutes,
            now,
        );
        let minutes = minutes_until(expected_at, now);
        Self {
            minutes,
            expected_at,
            display: format_delivery_time(minutes),
        }
    }
}

impl Display for RemainingTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Order, OrderId, OrderStatus};

    fn at(raw: &str) -> DateTime<Utc> {
        parse_timestamp(raw).unwrap()
    }

    #[test]
    fn test_non_positive_minutes_show_thirty_seconds() {
        for minutes in [i64::MIN, -10, -1, 0] {
            assert_eq!(format_delivery_time(minutes), "30 sec");
        }
    }

    #[test]
    fn test_second_checkpoints() {
        let table = [
            (0, "30 sec"),
            (30, "30 sec"),
            (31, "1 min"),
            (60, "1 min"),
            (61, "1:30 min"),
            (90, "1:30 min"),
            (91, "2 min"),
            (120, "2 min"),
            (121, "3 min"),
            (180, "3 min"),
            (181, "4 min"),
        ];
        for (seconds, expected) in table {
            assert_eq!(format_remaining_seconds(seconds), expected, "seconds = {seconds}");
        }
    }

    #[test]
    fn test_whole_minutes() {
        assert_eq!(format_delivery_time(1), "1 min");
        assert_eq!(format_delivery_time(2), "2 min");
        assert_eq!(format_delivery_time(3), "3 min");
        assert_eq!(format_delivery_time(45), "45 min");
    }

    #[test]
    fn test_scenario_two_and_a_half_minutes_left() {
        let now = at("2025-01-01T12:07:31Z");
        let minutes = remaining_minutes("2025-01-01T12:00:00.000Z", 10, now);
        assert_eq!(minutes, 3);
        assert_eq!(format_delivery_time(minutes), "3 min");
    }

    #[test]
    fn test_overdue_order_floors_at_zero() {
        let now = at("2025-01-01T13:00:00Z");
        assert_eq!(remaining_minutes("2025-01-01T12:00:00.000Z", 10, now), 0);

        // Less than a minute late still rounds up to zero, not -1.
        let now = at("2025-01-01T12:10:30Z");
        assert_eq!(remaining_minutes("2025-01-01T12:00:00.000Z", 10, now), 0);
    }

    #[test]
    fn test_exact_minute_boundary_does_not_round_up() {
        let now = at("2025-01-01T12:08:00Z");
        assert_eq!(remaining_minutes("2025-01-01T12:00:00.000Z", 10, now), 2);
    }

    #[test]
    fn test_unparsable_creation_falls_back_to_full_duration() {
        let now = at("2025-01-01T12:07:31Z");
        assert_eq!(remaining_minutes("yesterday-ish", 10, now), 10);
        assert_eq!(remaining_minutes("", 0, now), 0);
    }

    #[test]
    fn test_remaining_time_for_order() {
        let order = Order::new(OrderId(42), OrderStatus::OnDelivery, "2025-01-01T12:00:00.000Z", 10);
        let remaining = RemainingTime::compute(&order, at("2025-01-01T12:07:31Z"));

        assert_eq!(remaining.minutes, 3);
        assert_eq!(remaining.to_string(), "3 min");
        assert_eq!(remaining.expected_at, at("2025-01-01T12:10:00Z"));
        assert_eq!(format_clock_time(remaining.expected_at), "12:10");
    }

    #[test]
    fn test_delivery_timestamp_formatting() {
        assert_eq!(
            format_delivery_timestamp("2025-03-09T18:45:12.250Z"),
            "09/03/2025 18:45"
        );
        assert_eq!(format_delivery_timestamp("not a date"), "not a date");
    }
}
