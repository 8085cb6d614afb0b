//! Database access layer
//!
//! Free functions over the SQLite pool, grouped by table. Monetary values
//! are stored as TEXT and parsed into `Decimal` at the boundary; the one
//! deliberate exception is the guest-listing total, which aggregates in SQL
//! as REAL.

pub mod events;
pub mod guests;
pub mod menus;
pub mod order_items;
pub mod restaurants;

use rust_decimal::Decimal;
use shared::{AppError, AppResult, ReturnCode};

/// Embedded migrations, applied at startup and by the test harness.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

/// Parse a stored price column. Stored values are always written from a
/// validated `Decimal`, so a parse failure means data corruption.
pub(crate) fn parse_price(raw: &str) -> AppResult<Decimal> {
    raw.parse::<Decimal>().map_err(|e| {
        tracing::error!("invalid stored price '{raw}': {e}");
        AppError::new(ReturnCode::ServerError)
    })
}

/// Whether a sqlx error is a UNIQUE constraint violation.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}
