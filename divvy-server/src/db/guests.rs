//! Guest membership queries

use shared::models::{Guest, GuestWithTotal, Role};
use shared::{AppError, AppResult, ReturnCode};
use sqlx::{Sqlite, SqlitePool};

use super::is_unique_violation;

/// Membership record of `user_id` within the event, `None` when not a member.
pub async fn membership(
    pool: &SqlitePool,
    event_id: i64,
    user_id: i64,
) -> AppResult<Option<Guest>> {
    let row: Option<(i64, String, bool)> = sqlx::query_as(
        "SELECT id, role, locked FROM guest WHERE event_id = ? AND user_id = ?",
    )
    .bind(event_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    row.map(|(id, role, locked)| {
        let role = Role::parse(&role).ok_or_else(|| {
            tracing::error!("invalid stored role '{role}' for user {user_id}");
            AppError::new(ReturnCode::ServerError)
        })?;
        Ok(Guest {
            id,
            event_id,
            user_id,
            role,
            locked,
        })
    })
    .transpose()
}

/// Role of `user_id` within the event, `None` when not a member.
pub async fn role_of(pool: &SqlitePool, event_id: i64, user_id: i64) -> AppResult<Option<Role>> {
    Ok(membership(pool, event_id, user_id).await?.map(|g| g.role))
}

/// Insert a membership row; used for the organiser at event creation.
/// Membership ids are rowids, so guests list in join order.
pub async fn insert<'e, E>(executor: E, event_id: i64, user_id: i64, role: Role) -> AppResult<i64>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO guest (event_id, user_id, role, locked) VALUES (?, ?, ?, 0) RETURNING id",
    )
    .bind(event_id)
    .bind(user_id)
    .bind(role.as_str())
    .fetch_one(executor)
    .await?;
    Ok(id)
}

/// Join an event as a plain guest. Returns `None` when the user is already
/// a member (UNIQUE on event_id, user_id).
pub async fn try_insert(pool: &SqlitePool, event_id: i64, user_id: i64) -> AppResult<Option<i64>> {
    let result: Result<(i64,), _> = sqlx::query_as(
        "INSERT INTO guest (event_id, user_id, role, locked) VALUES (?, ?, 'guest', 0) RETURNING id",
    )
    .bind(event_id)
    .bind(user_id)
    .fetch_one(pool)
    .await;

    match result {
        Ok((id,)) => Ok(Some(id)),
        Err(e) if is_unique_violation(&e) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Set the guest-level lock flag. Returns rows affected (0 = not a member).
pub async fn set_locked<'e, E>(
    executor: E,
    event_id: i64,
    user_id: i64,
    locked: bool,
) -> AppResult<u64>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("UPDATE guest SET locked = ? WHERE event_id = ? AND user_id = ?")
        .bind(locked)
        .bind(event_id)
        .bind(user_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

#[derive(sqlx::FromRow)]
struct GuestTotalRow {
    user_id: i64,
    name: String,
    email: String,
    role: String,
    locked: bool,
    total_amount: f64,
}

/// Guest listing with the raw aggregate total per guest.
///
/// The total is `SUM(quantity * price)` computed in SQL as REAL with no
/// per-line rounding; the bill view rounds per line instead, and the two
/// may differ by sub-cent artifacts.
pub async fn list_with_totals(pool: &SqlitePool, event_id: i64) -> AppResult<Vec<GuestWithTotal>> {
    let rows: Vec<GuestTotalRow> = sqlx::query_as(
        "SELECT g.user_id, u.name, u.email, g.role, g.locked, \
                COALESCE(SUM(oi.quantity * CAST(oi.price_at_time AS REAL)), 0.0) AS total_amount \
         FROM guest g \
         JOIN app_user u ON u.id = g.user_id \
         LEFT JOIN order_item oi ON oi.event_id = g.event_id AND oi.guest_id = g.user_id \
         WHERE g.event_id = ? \
         GROUP BY g.id \
         ORDER BY g.id",
    )
    .bind(event_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|r| {
            let role = Role::parse(&r.role).ok_or_else(|| {
                tracing::error!("invalid stored role '{}' for user {}", r.role, r.user_id);
                AppError::new(ReturnCode::ServerError)
            })?;
            Ok(GuestWithTotal {
                user_id: r.user_id,
                name: r.name,
                email: r.email,
                role,
                locked: r.locked,
                total_amount: r.total_amount,
            })
        })
        .collect()
}

/// Guests of an event in join order, for the bill view.
pub async fn list_for_bill(pool: &SqlitePool, event_id: i64) -> AppResult<Vec<(i64, String, Role)>> {
    let rows: Vec<(i64, String, String)> = sqlx::query_as(
        "SELECT g.user_id, u.name, g.role \
         FROM guest g \
         JOIN app_user u ON u.id = g.user_id \
         WHERE g.event_id = ? \
         ORDER BY g.id",
    )
    .bind(event_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter()
        .map(|(user_id, name, role)| {
            let role = Role::parse(&role).ok_or_else(|| {
                tracing::error!("invalid stored role '{role}' for user {user_id}");
                AppError::new(ReturnCode::ServerError)
            })?;
            Ok((user_id, name, role))
        })
        .collect()
}
