//! Return codes shared by every Divvy endpoint.
//!
//! Codes travel on the wire as SCREAMING_SNAKE_CASE strings in the
//! `return_code` field. Each code maps to exactly one HTTP status and one
//! [`ErrorCategory`].

use super::category::ErrorCategory;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Machine-readable result code for an API operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReturnCode {
    /// Operation completed successfully
    Success,

    // ==================== Validation ====================
    /// A required field is missing or unparseable
    MissingFields,
    /// Quantity must be a positive integer
    InvalidQuantity,
    /// Price must be non-negative
    InvalidPrice,
    /// Menu item does not belong to the event's restaurant
    InvalidMenuItem,
    /// An entry in a submitted item list is malformed
    InvalidItem,

    // ==================== Authorization ====================
    /// No bearer token presented
    Unauthorized,
    /// Token failed verification or has expired
    TokenExpired,
    /// Acting user's role does not permit this action
    UnauthorisedAction,

    // ==================== Not found ====================
    /// Order item not found
    ItemNotFound,
    /// Event not found (or not open for the requested operation)
    EventNotFound,
    /// Restaurant not found
    RestaurantNotFound,
    /// Guest not found in this event
    GuestNotFound,

    // ==================== Conflict ====================
    /// Order item is locked against edits
    ItemLocked,
    /// Creator already has an unlocked event at this restaurant
    EventAlreadyExists,
    /// User is already a guest of this event
    AlreadyJoined,

    // ==================== System ====================
    /// Unexpected store or server failure
    ServerError,
}

impl ReturnCode {
    /// Wire representation of the code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ReturnCode::Success => "SUCCESS",
            ReturnCode::MissingFields => "MISSING_FIELDS",
            ReturnCode::InvalidQuantity => "INVALID_QUANTITY",
            ReturnCode::InvalidPrice => "INVALID_PRICE",
            ReturnCode::InvalidMenuItem => "INVALID_MENU_ITEM",
            ReturnCode::InvalidItem => "INVALID_ITEM",
            ReturnCode::Unauthorized => "UNAUTHORIZED",
            ReturnCode::TokenExpired => "TOKEN_EXPIRED",
            ReturnCode::UnauthorisedAction => "UNAUTHORISED_ACTION",
            ReturnCode::ItemNotFound => "ITEM_NOT_FOUND",
            ReturnCode::EventNotFound => "EVENT_NOT_FOUND",
            ReturnCode::RestaurantNotFound => "RESTAURANT_NOT_FOUND",
            ReturnCode::GuestNotFound => "GUEST_NOT_FOUND",
            ReturnCode::ItemLocked => "ITEM_LOCKED",
            ReturnCode::EventAlreadyExists => "EVENT_ALREADY_EXISTS",
            ReturnCode::AlreadyJoined => "ALREADY_JOINED",
            ReturnCode::ServerError => "SERVER_ERROR",
        }
    }

    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ReturnCode::Success)
    }

    /// Default developer-facing message for this code.
    pub const fn message(&self) -> &'static str {
        match self {
            ReturnCode::Success => "Operation completed successfully",
            ReturnCode::MissingFields => "Required fields missing",
            ReturnCode::InvalidQuantity => "Quantity must be greater than zero",
            ReturnCode::InvalidPrice => "Price cannot be negative",
            ReturnCode::InvalidMenuItem => {
                "Menu item does not belong to this event's restaurant"
            }
            ReturnCode::InvalidItem => "Submitted item is malformed",
            ReturnCode::Unauthorized => "Authentication required",
            ReturnCode::TokenExpired => "Token is invalid or has expired",
            ReturnCode::UnauthorisedAction => "You are not allowed to perform this action",
            ReturnCode::ItemNotFound => "Order item not found",
            ReturnCode::EventNotFound => "Event not found",
            ReturnCode::RestaurantNotFound => "Restaurant not found",
            ReturnCode::GuestNotFound => "Guest not found in this event",
            ReturnCode::ItemLocked => "Order item is locked",
            ReturnCode::EventAlreadyExists => {
                "An unlocked event already exists at this restaurant"
            }
            ReturnCode::AlreadyJoined => "User has already joined this event",
            ReturnCode::ServerError => "Server error",
        }
    }

    /// HTTP status paired with this code.
    pub const fn http_status(&self) -> StatusCode {
        match self {
            ReturnCode::Success => StatusCode::OK,
            ReturnCode::MissingFields
            | ReturnCode::InvalidQuantity
            | ReturnCode::InvalidPrice
            | ReturnCode::InvalidMenuItem
            | ReturnCode::InvalidItem => StatusCode::BAD_REQUEST,
            ReturnCode::Unauthorized => StatusCode::UNAUTHORIZED,
            // A presented-but-invalid token answers 403, not 401.
            ReturnCode::TokenExpired => StatusCode::FORBIDDEN,
            ReturnCode::UnauthorisedAction | ReturnCode::ItemLocked => StatusCode::FORBIDDEN,
            ReturnCode::ItemNotFound
            | ReturnCode::EventNotFound
            | ReturnCode::RestaurantNotFound
            | ReturnCode::GuestNotFound => StatusCode::NOT_FOUND,
            ReturnCode::EventAlreadyExists | ReturnCode::AlreadyJoined => StatusCode::CONFLICT,
            ReturnCode::ServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Failure-domain classification of this code.
    pub const fn category(&self) -> ErrorCategory {
        match self {
            ReturnCode::Success => ErrorCategory::Success,
            ReturnCode::MissingFields
            | ReturnCode::InvalidQuantity
            | ReturnCode::InvalidPrice
            | ReturnCode::InvalidMenuItem
            | ReturnCode::InvalidItem => ErrorCategory::Validation,
            ReturnCode::Unauthorized
            | ReturnCode::TokenExpired
            | ReturnCode::UnauthorisedAction => ErrorCategory::Authorization,
            ReturnCode::ItemNotFound
            | ReturnCode::EventNotFound
            | ReturnCode::RestaurantNotFound
            | ReturnCode::GuestNotFound => ErrorCategory::NotFound,
            ReturnCode::ItemLocked
            | ReturnCode::EventAlreadyExists
            | ReturnCode::AlreadyJoined => ErrorCategory::Conflict,
            ReturnCode::ServerError => ErrorCategory::System,
        }
    }
}

impl fmt::Display for ReturnCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
