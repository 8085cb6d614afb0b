//! Locking endpoints for the three freeze granularities: whole event,
//! one guest's order, one item.

use axum::Json;
use axum::extract::{Extension, State};
use serde::Deserialize;
use shared::{ApiResponse, AppError, ReturnCode};

use super::ApiResult;
use crate::auth::Diner;
use crate::db;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LockEventRequest {
    pub event_id: Option<i64>,
    pub locked: Option<bool>,
}

/// Lock or unlock the whole event. Organiser only; locking frees the
/// event's join code for reuse.
pub async fn lock_event(
    State(state): State<AppState>,
    Extension(diner): Extension<Diner>,
    Json(req): Json<LockEventRequest>,
) -> ApiResult<()> {
    let event_id = req
        .event_id
        .ok_or_else(|| AppError::missing_fields("event_id is required."))?;
    let locked = req
        .locked
        .ok_or_else(|| AppError::missing_fields("locked is required."))?;

    let role = db::guests::role_of(&state.pool, event_id, diner.user_id).await?;
    if !role.is_some_and(|r| r.can_lock_event()) {
        return Err(AppError::unauthorised(
            "Only the organiser can lock or unlock the event.",
        ));
    }

    let affected = db::events::set_locked(&state.pool, event_id, locked).await?;
    if affected == 0 {
        return Err(AppError::new(ReturnCode::EventNotFound));
    }

    let message = if locked {
        "Event locked successfully."
    } else {
        "Event unlocked successfully."
    };
    Ok(ApiResponse::ok_with_message(message))
}

#[derive(Debug, Deserialize)]
pub struct LockGuestRequest {
    pub event_id: Option<i64>,
    /// User id of the guest whose order is being frozen.
    pub guest_id: Option<i64>,
    pub locked: Option<bool>,
}

/// Lock or unlock one guest's order: flips the guest-level flag and
/// cascades to every item the guest currently holds, in one transaction.
pub async fn lock_guest(
    State(state): State<AppState>,
    Extension(diner): Extension<Diner>,
    Json(req): Json<LockGuestRequest>,
) -> ApiResult<()> {
    let event_id = req
        .event_id
        .ok_or_else(|| AppError::missing_fields("event_id is required."))?;
    let guest_id = req
        .guest_id
        .ok_or_else(|| AppError::missing_fields("guest_id is required."))?;
    let locked = req
        .locked
        .ok_or_else(|| AppError::missing_fields("locked is required."))?;

    let role = db::guests::role_of(&state.pool, event_id, diner.user_id).await?;
    if !role.is_some_and(|r| r.can_manage()) {
        return Err(AppError::unauthorised(
            "Only the organiser or a co-host can lock a guest's order.",
        ));
    }

    let mut tx = state.pool.begin().await?;
    let affected = db::guests::set_locked(&mut *tx, event_id, guest_id, locked).await?;
    if affected == 0 {
        return Err(AppError::new(ReturnCode::GuestNotFound));
    }
    db::order_items::set_locked_for_guest(&mut *tx, event_id, guest_id, locked).await?;
    tx.commit().await?;

    let message = if locked {
        "Guest order locked successfully."
    } else {
        "Guest order unlocked successfully."
    };
    Ok(ApiResponse::ok_with_message(message))
}

#[derive(Debug, Deserialize)]
pub struct LockOrderItemRequest {
    pub event_id: Option<i64>,
    pub order_item_id: Option<i64>,
    pub locked: Option<bool>,
}

/// Lock or unlock a single order item within an event.
pub async fn lock_order_item(
    State(state): State<AppState>,
    Extension(diner): Extension<Diner>,
    Json(req): Json<LockOrderItemRequest>,
) -> ApiResult<()> {
    let event_id = req
        .event_id
        .ok_or_else(|| AppError::missing_fields("event_id is required."))?;
    let item_id = req
        .order_item_id
        .ok_or_else(|| AppError::missing_fields("order_item_id is required."))?;
    let locked = req
        .locked
        .ok_or_else(|| AppError::missing_fields("locked is required."))?;

    let role = db::guests::role_of(&state.pool, event_id, diner.user_id).await?;
    if !role.is_some_and(|r| r.can_manage()) {
        return Err(AppError::unauthorised(
            "Only the organiser or a co-host can lock an item.",
        ));
    }

    let affected = db::order_items::set_locked_in_event(&state.pool, item_id, event_id, locked).await?;
    if affected == 0 {
        return Err(AppError::new(ReturnCode::ItemNotFound));
    }

    let message = if locked {
        "Item locked successfully."
    } else {
        "Item unlocked successfully."
    };
    Ok(ApiResponse::ok_with_message(message))
}
