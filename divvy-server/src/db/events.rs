//! Event queries

use shared::models::{Event, EventDetails, EventSummary, Restaurant, Role};
use shared::{AppError, AppResult, ReturnCode};
use sqlx::{Sqlite, SqlitePool};

use super::{is_unique_violation, parse_price};

/// Resolve an unlocked event by its public join code.
pub async fn find_unlocked_by_code(pool: &SqlitePool, code: &str) -> AppResult<Option<i64>> {
    let row: Option<(i64,)> =
        sqlx::query_as("SELECT id FROM event WHERE public_event_code = ? AND locked = 0")
            .bind(code)
            .fetch_optional(pool)
            .await?;
    Ok(row.map(|(id,)| id))
}

/// Whether the user already created an unlocked event at this restaurant.
pub async fn has_unlocked_at_restaurant(
    pool: &SqlitePool,
    restaurant_id: i64,
    user_id: i64,
) -> AppResult<bool> {
    let row: Option<(i64,)> = sqlx::query_as(
        "SELECT id FROM event WHERE restaurant_id = ? AND created_by = ? AND locked = 0",
    )
    .bind(restaurant_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(row.is_some())
}

/// Pre-check that a join code is free among unlocked events. Advisory only;
/// `try_insert` and the partial unique index are the real gate.
pub async fn code_in_use<'e, E>(executor: E, code: &str) -> AppResult<bool>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let row: Option<(i64,)> =
        sqlx::query_as("SELECT id FROM event WHERE public_event_code = ? AND locked = 0")
            .bind(code)
            .fetch_optional(executor)
            .await?;
    Ok(row.is_some())
}

/// Insert a new event. Returns `false` if the join code collided with a
/// concurrently created unlocked event, so the caller can retry with a
/// fresh code.
pub async fn try_insert<'e, E>(
    executor: E,
    event_id: i64,
    restaurant_id: i64,
    created_by: i64,
    event_date: &str,
    public_event_code: &str,
    created_at: i64,
) -> AppResult<bool>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        "INSERT INTO event (id, restaurant_id, created_by, event_date, public_event_code, locked, total_amount, created_at) \
         VALUES (?, ?, ?, ?, ?, 0, '0', ?)",
    )
    .bind(event_id)
    .bind(restaurant_id)
    .bind(created_by)
    .bind(event_date)
    .bind(public_event_code)
    .bind(created_at)
    .execute(executor)
    .await;

    match result {
        Ok(_) => Ok(true),
        Err(e) if is_unique_violation(&e) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

pub async fn set_locked(pool: &SqlitePool, event_id: i64, locked: bool) -> AppResult<u64> {
    let result = sqlx::query("UPDATE event SET locked = ? WHERE id = ?")
        .bind(locked)
        .bind(event_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn restaurant_id_of<'e, E>(executor: E, event_id: i64) -> AppResult<Option<i64>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let row: Option<(i64,)> = sqlx::query_as("SELECT restaurant_id FROM event WHERE id = ?")
        .bind(event_id)
        .fetch_optional(executor)
        .await?;
    Ok(row.map(|(id,)| id))
}

#[derive(sqlx::FromRow)]
struct EventRow {
    id: i64,
    restaurant_id: i64,
    created_by: i64,
    event_date: String,
    public_event_code: Option<String>,
    locked: bool,
    total_amount: String,
    created_at: i64,
}

pub async fn find_by_id(pool: &SqlitePool, event_id: i64) -> AppResult<Option<Event>> {
    let row: Option<EventRow> = sqlx::query_as(
        "SELECT id, restaurant_id, created_by, event_date, public_event_code, \
                locked, total_amount, created_at \
         FROM event WHERE id = ?",
    )
    .bind(event_id)
    .fetch_optional(pool)
    .await?;

    row.map(|r| {
        Ok(Event {
            id: r.id,
            restaurant_id: r.restaurant_id,
            created_by: r.created_by,
            event_date: r.event_date,
            public_event_code: r.public_event_code,
            locked: r.locked,
            total_amount: parse_price(&r.total_amount)?,
            created_at: r.created_at,
        })
    })
    .transpose()
}

#[derive(sqlx::FromRow)]
struct EventDetailsRow {
    id: i64,
    public_event_code: Option<String>,
    event_date: String,
    locked: bool,
    created_by: i64,
    restaurant_id: i64,
    restaurant_name: String,
    address: String,
    city: String,
    postcode: String,
}

/// Event detail view with the restaurant embedded.
pub async fn details_by_id(pool: &SqlitePool, event_id: i64) -> AppResult<Option<EventDetails>> {
    let row: Option<EventDetailsRow> = sqlx::query_as(
        "SELECT e.id, e.public_event_code, e.event_date, e.locked, e.created_by, \
                r.id AS restaurant_id, r.name AS restaurant_name, r.address, r.city, r.postcode \
         FROM event e \
         JOIN restaurant r ON r.id = e.restaurant_id \
         WHERE e.id = ?",
    )
    .bind(event_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| EventDetails {
        id: r.id,
        public_event_code: r.public_event_code,
        event_date: r.event_date,
        locked: r.locked,
        created_by: r.created_by,
        restaurant: Restaurant {
            id: r.restaurant_id,
            name: r.restaurant_name,
            address: r.address,
            city: r.city,
            postcode: r.postcode,
        },
    }))
}

#[derive(sqlx::FromRow)]
struct EventSummaryRow {
    id: i64,
    restaurant_name: String,
    event_date: String,
    total_amount: String,
    role: String,
    locked: bool,
}

/// Events the user participates in, newest first.
pub async fn list_for_user(pool: &SqlitePool, user_id: i64) -> AppResult<Vec<EventSummary>> {
    let rows: Vec<EventSummaryRow> = sqlx::query_as(
        "SELECT e.id, r.name AS restaurant_name, e.event_date, e.total_amount, \
                g.role, e.locked \
         FROM guest g \
         JOIN event e ON e.id = g.event_id \
         JOIN restaurant r ON r.id = e.restaurant_id \
         WHERE g.user_id = ? \
         ORDER BY e.created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|r| {
            let user_role = Role::parse(&r.role).ok_or_else(|| {
                tracing::error!("invalid stored role '{}' for event {}", r.role, r.id);
                AppError::new(ReturnCode::ServerError)
            })?;
            Ok(EventSummary {
                id: r.id,
                restaurant_name: r.restaurant_name,
                event_date: r.event_date,
                total_amount: parse_price(&r.total_amount)?,
                user_role,
                locked: r.locked,
            })
        })
        .collect()
}
