//! Order-item ledger queries
//!
//! The write path is an insert-or-merge upsert keyed by the partial unique
//! indexes (menu id, or normalized custom name). Lock checks ride inside
//! the mutating statements (`WHERE locked = 0`) so a concurrent lock cannot
//! slip between check and write.

use rust_decimal::Decimal;
use shared::AppResult;
use shared::models::{GuestOrderLine, OrderItem};
use sqlx::{Sqlite, SqlitePool};

use super::parse_price;

#[derive(sqlx::FromRow)]
struct OrderItemRow {
    id: i64,
    event_id: i64,
    guest_id: i64,
    menu_id: Option<i64>,
    custom_item_name: Option<String>,
    quantity: i64,
    price_at_time: String,
    locked: bool,
}

/// Fetch one item. Mutating handlers call this first to tell not-found,
/// locked and permission failures apart.
pub async fn find_by_id(pool: &SqlitePool, item_id: i64) -> AppResult<Option<OrderItem>> {
    let row: Option<OrderItemRow> = sqlx::query_as(
        "SELECT id, event_id, guest_id, menu_id, custom_item_name, quantity, \
                price_at_time, locked \
         FROM order_item WHERE id = ?",
    )
    .bind(item_id)
    .fetch_optional(pool)
    .await?;

    row.map(|r| {
        Ok(OrderItem {
            id: r.id,
            event_id: r.event_id,
            guest_id: r.guest_id,
            menu_id: r.menu_id,
            custom_item_name: r.custom_item_name,
            quantity: r.quantity,
            price_at_time: parse_price(&r.price_at_time)?,
            locked: r.locked,
        })
    })
    .transpose()
}

/// Insert or merge a menu-based selection. On conflict the quantity
/// accumulates and the stored price snapshot is overwritten with the
/// incoming one. Returns the row id.
pub async fn upsert_menu_selection<'e, E>(
    executor: E,
    event_id: i64,
    guest_id: i64,
    menu_id: i64,
    quantity: i64,
    price_at_time: &str,
) -> AppResult<i64>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO order_item (event_id, guest_id, menu_id, quantity, price_at_time, locked) \
         VALUES (?, ?, ?, ?, ?, 0) \
         ON CONFLICT (event_id, guest_id, menu_id) WHERE menu_id IS NOT NULL \
         DO UPDATE SET quantity = quantity + excluded.quantity, \
                       price_at_time = excluded.price_at_time \
         RETURNING id",
    )
    .bind(event_id)
    .bind(guest_id)
    .bind(menu_id)
    .bind(quantity)
    .bind(price_at_time)
    .fetch_one(executor)
    .await?;
    Ok(id)
}

/// Insert or merge a custom (off-menu) selection, keyed by the normalized
/// name. Same merge semantics as the menu variant.
pub async fn upsert_custom_selection<'e, E>(
    executor: E,
    event_id: i64,
    guest_id: i64,
    custom_item_name: &str,
    normalized_name: &str,
    quantity: i64,
    price_at_time: &str,
) -> AppResult<i64>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO order_item (event_id, guest_id, custom_item_name, normalized_name, quantity, price_at_time, locked) \
         VALUES (?, ?, ?, ?, ?, ?, 0) \
         ON CONFLICT (event_id, guest_id, normalized_name) WHERE menu_id IS NULL \
         DO UPDATE SET quantity = quantity + excluded.quantity, \
                       price_at_time = excluded.price_at_time \
         RETURNING id",
    )
    .bind(event_id)
    .bind(guest_id)
    .bind(custom_item_name)
    .bind(normalized_name)
    .bind(quantity)
    .bind(price_at_time)
    .fetch_one(executor)
    .await?;
    Ok(id)
}

/// Update quantity and/or price of an item, but only while unlocked.
/// Returns rows affected: 0 means the row was locked out from under us.
pub async fn update_unlocked(
    pool: &SqlitePool,
    item_id: i64,
    quantity: Option<i64>,
    price_at_time: Option<String>,
) -> AppResult<u64> {
    let result = sqlx::query(
        "UPDATE order_item \
         SET quantity = COALESCE(?, quantity), \
             price_at_time = COALESCE(?, price_at_time) \
         WHERE id = ? AND locked = 0",
    )
    .bind(quantity)
    .bind(price_at_time)
    .bind(item_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

/// Delete an item, but only while unlocked.
pub async fn delete_unlocked(pool: &SqlitePool, item_id: i64) -> AppResult<u64> {
    let result = sqlx::query("DELETE FROM order_item WHERE id = ? AND locked = 0")
        .bind(item_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// Delete a guest's whole order, locked rows included.
pub async fn delete_all_for_guest<'e, E>(executor: E, event_id: i64, guest_id: i64) -> AppResult<u64>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("DELETE FROM order_item WHERE event_id = ? AND guest_id = ?")
        .bind(event_id)
        .bind(guest_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

/// Set the lock flag on every item of one guest.
pub async fn set_locked_for_guest<'e, E>(
    executor: E,
    event_id: i64,
    guest_id: i64,
    locked: bool,
) -> AppResult<u64>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("UPDATE order_item SET locked = ? WHERE event_id = ? AND guest_id = ?")
        .bind(locked)
        .bind(event_id)
        .bind(guest_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

/// Set the lock flag on a single item, scoped to its event. Returns rows
/// affected (0 = no such item in this event).
pub async fn set_locked_in_event(
    pool: &SqlitePool,
    item_id: i64,
    event_id: i64,
    locked: bool,
) -> AppResult<u64> {
    let result = sqlx::query("UPDATE order_item SET locked = ? WHERE id = ? AND event_id = ?")
        .bind(locked)
        .bind(item_id)
        .bind(event_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

/// One guest's selection of a menu dish, for the menu-with-selections view.
pub struct MenuSelectionRow {
    pub menu_id: i64,
    pub user_id: i64,
    pub quantity: i64,
    pub price_at_time: Decimal,
    pub locked: bool,
}

/// All menu-based selections in an event.
pub async fn list_menu_selections(
    pool: &SqlitePool,
    event_id: i64,
) -> AppResult<Vec<MenuSelectionRow>> {
    let rows: Vec<(i64, i64, i64, String, bool)> = sqlx::query_as(
        "SELECT menu_id, guest_id, quantity, price_at_time, locked \
         FROM order_item \
         WHERE event_id = ? AND menu_id IS NOT NULL \
         ORDER BY id",
    )
    .bind(event_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|(menu_id, user_id, quantity, price, locked)| {
            Ok(MenuSelectionRow {
                menu_id,
                user_id,
                quantity,
                price_at_time: parse_price(&price)?,
                locked,
            })
        })
        .collect()
}

#[derive(sqlx::FromRow)]
struct GuestOrderRow {
    menu_id: Option<i64>,
    item_name: String,
    quantity: i64,
    price_at_time: String,
    locked: bool,
}

/// One guest's current order, display names resolved against the menu.
pub async fn list_for_guest(
    pool: &SqlitePool,
    event_id: i64,
    guest_id: i64,
) -> AppResult<Vec<GuestOrderLine>> {
    let rows: Vec<GuestOrderRow> = sqlx::query_as(
        "SELECT oi.menu_id, COALESCE(m.item_name, oi.custom_item_name) AS item_name, \
                oi.quantity, oi.price_at_time, oi.locked \
         FROM order_item oi \
         LEFT JOIN menu m ON m.id = oi.menu_id \
         WHERE oi.event_id = ? AND oi.guest_id = ? \
         ORDER BY oi.id",
    )
    .bind(event_id)
    .bind(guest_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|r| {
            Ok(GuestOrderLine {
                menu_id: r.menu_id,
                item_name: r.item_name,
                quantity: r.quantity,
                price_at_time: parse_price(&r.price_at_time)?,
                locked: r.locked,
            })
        })
        .collect()
}

/// Flat bill line with its owning guest, used by the bill aggregation.
pub struct BillRow {
    pub guest_id: i64,
    pub item_name: String,
    pub quantity: i64,
    pub price_at_time: Decimal,
}

/// Every item in the event in insertion order, names resolved.
pub async fn list_for_bill(pool: &SqlitePool, event_id: i64) -> AppResult<Vec<BillRow>> {
    let rows: Vec<(i64, String, i64, String)> = sqlx::query_as(
        "SELECT oi.guest_id, COALESCE(m.item_name, oi.custom_item_name) AS item_name, \
                oi.quantity, oi.price_at_time \
         FROM order_item oi \
         LEFT JOIN menu m ON m.id = oi.menu_id \
         WHERE oi.event_id = ? \
         ORDER BY oi.id",
    )
    .bind(event_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|(guest_id, item_name, quantity, price)| {
            Ok(BillRow {
                guest_id,
                item_name,
                quantity,
                price_at_time: parse_price(&price)?,
            })
        })
        .collect()
}
