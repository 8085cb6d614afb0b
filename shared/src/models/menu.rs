//! Menu model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One dish on a restaurant's menu. Read-only reference data; order items
/// snapshot its price at selection time instead of referencing it live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: i64,
    pub restaurant_id: i64,
    pub item_name: String,
    pub price: Decimal,
}
