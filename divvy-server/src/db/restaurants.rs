//! Restaurant queries

use shared::AppResult;
use sqlx::SqlitePool;

pub async fn exists(pool: &SqlitePool, restaurant_id: i64) -> AppResult<bool> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM restaurant WHERE id = ?")
        .bind(restaurant_id)
        .fetch_optional(pool)
        .await?;
    Ok(row.is_some())
}
