//! Menu queries

use shared::AppResult;
use shared::models::MenuItem;
use sqlx::{Sqlite, SqlitePool};

use super::parse_price;

/// Full menu of one restaurant.
pub async fn list_for_restaurant(
    pool: &SqlitePool,
    restaurant_id: i64,
) -> AppResult<Vec<MenuItem>> {
    let rows: Vec<(i64, i64, String, String)> = sqlx::query_as(
        "SELECT id, restaurant_id, item_name, price FROM menu WHERE restaurant_id = ? ORDER BY id",
    )
    .bind(restaurant_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|(id, restaurant_id, item_name, price)| {
            Ok(MenuItem {
                id,
                restaurant_id,
                item_name,
                price: parse_price(&price)?,
            })
        })
        .collect()
}

/// Menu item belongs to the restaurant of the given event.
pub async fn belongs_to_event(pool: &SqlitePool, menu_id: i64, event_id: i64) -> AppResult<bool> {
    let row: Option<(i64,)> = sqlx::query_as(
        "SELECT m.id FROM menu m \
         JOIN event e ON e.restaurant_id = m.restaurant_id \
         WHERE m.id = ? AND e.id = ?",
    )
    .bind(menu_id)
    .bind(event_id)
    .fetch_optional(pool)
    .await?;
    Ok(row.is_some())
}

pub async fn belongs_to_restaurant<'e, E>(
    executor: E,
    menu_id: i64,
    restaurant_id: i64,
) -> AppResult<bool>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let row: Option<(i64,)> =
        sqlx::query_as("SELECT id FROM menu WHERE id = ? AND restaurant_id = ?")
            .bind(menu_id)
            .bind(restaurant_id)
            .fetch_optional(executor)
            .await?;
    Ok(row.is_some())
}
