//! Guest membership model and role capabilities

use serde::{Deserialize, Serialize};

/// Role a user holds within one event.
///
/// Exactly one organiser exists per event (the creator); everyone who joins
/// by code is a plain guest. Co-host is a delegated role granted out-of-band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Organiser,
    CoHost,
    Guest,
}

impl Role {
    /// Whether this role may act on other guests' data (add/update/remove/
    /// reset/lock their selections).
    pub const fn can_manage(&self) -> bool {
        matches!(self, Role::Organiser | Role::CoHost)
    }

    /// Whether this role may lock or unlock the whole event.
    pub const fn can_lock_event(&self) -> bool {
        matches!(self, Role::Organiser)
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Organiser => "organiser",
            Role::CoHost => "co-host",
            Role::Guest => "guest",
        }
    }

    /// Parse the stored role string. Unknown strings map to `None` rather
    /// than panicking; callers treat that as no privileges.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "organiser" => Some(Role::Organiser),
            "co-host" => Some(Role::CoHost),
            "guest" => Some(Role::Guest),
            _ => None,
        }
    }
}

/// A user's membership record within an event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Guest {
    pub id: i64,
    pub event_id: i64,
    pub user_id: i64,
    pub role: Role,
    /// Guest-level edit freeze
    pub locked: bool,
}

/// Guest listing row: membership plus display fields and the aggregate
/// order total.
///
/// `total_amount` is the raw `SUM(quantity * price)` over the guest's items,
/// with no per-line rounding. It can differ from the bill view's total by
/// sub-cent artifacts; the two computations are deliberately separate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestWithTotal {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub locked: bool,
    pub total_amount: f64,
}
