//! Event model

use super::guest::Role;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One dining occasion tied to a restaurant and an organiser.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub restaurant_id: i64,
    /// User id of the organiser
    pub created_by: i64,
    /// ISO-8601 date/time of the occasion
    pub event_date: String,
    /// Short numeric join code, unique among currently-unlocked events
    pub public_event_code: Option<String>,
    /// Event-level freeze flag, toggled by the organiser only
    pub locked: bool,
    /// Cached derived total for the whole event
    pub total_amount: Decimal,
    pub created_at: i64,
}

/// Restaurant reference data (read-only from the core's perspective).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub city: String,
    pub postcode: String,
}

/// Event detail view with its restaurant embedded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDetails {
    pub id: i64,
    pub public_event_code: Option<String>,
    pub event_date: String,
    pub locked: bool,
    pub created_by: i64,
    pub restaurant: Restaurant,
}

/// Row of the per-user event listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventSummary {
    pub id: i64,
    pub restaurant_name: String,
    pub event_date: String,
    pub total_amount: Decimal,
    pub user_role: Role,
    pub locked: bool,
}
