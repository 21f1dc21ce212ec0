/// Menu details as returned by `GET /menu/{mid}`.
///
/// Only [`MenuDetails::delivery_time`] matters to delivery tracking; the rest
/// is decoded so callers can show what was ordered.
use crate::model::Location;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for Menus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MenuId(pub u32);

impl From<u32> for MenuId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for MenuId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuDetails {
    pub mid: MenuId,
    pub name: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub location: Option<Location>,
    /// Delivery duration in minutes.
    #[serde(default)]
    pub delivery_time: u32,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub long_description: Option<String>,
    #[serde(default)]
    pub image_version: Option<u32>,
}
