//! Order item model and bill arithmetic

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// One line selection in a guest's order, menu-based or custom, with the
/// price snapshotted at selection time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: i64,
    pub event_id: i64,
    /// User id of the owning guest within the event
    pub guest_id: i64,
    pub menu_id: Option<i64>,
    /// Free-text name; set only when `menu_id` is absent
    pub custom_item_name: Option<String>,
    pub quantity: i64,
    pub price_at_time: Decimal,
    pub locked: bool,
}

/// Line of a guest-order read, with the display name already resolved
/// (menu item name, else the custom name).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestOrderLine {
    pub menu_id: Option<i64>,
    pub item_name: String,
    pub quantity: i64,
    pub price_at_time: Decimal,
    pub locked: bool,
}

/// Line of the final bill view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillLine {
    pub item_name: String,
    pub quantity: i64,
    pub price_at_time: Decimal,
    pub subtotal: Decimal,
}

/// One guest's section of the event bill.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestBill {
    pub user_id: i64,
    pub name: String,
    pub role: super::Role,
    pub items: Vec<BillLine>,
    pub total: Decimal,
}

/// Subtotal of one bill line: `round(quantity * price, 2)`, midpoint away
/// from zero. Rounding happens per line, before summation; the guest-listing
/// aggregate deliberately skips this step.
pub fn line_subtotal(quantity: i64, price_at_time: Decimal) -> Decimal {
    (Decimal::from(quantity) * price_at_time)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Bill total for a guest: sum of already-rounded line subtotals, rounded
/// again to 2 decimal places.
pub fn bill_total<I: IntoIterator<Item = Decimal>>(subtotals: I) -> Decimal {
    subtotals
        .into_iter()
        .sum::<Decimal>()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
