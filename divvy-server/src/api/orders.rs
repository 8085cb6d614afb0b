//! Order ledger endpoints: add / update / remove single items, reset and
//! bulk-submit a guest's order, and read one guest's order back.

use axum::Json;
use axum::extract::{Extension, State};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use shared::models::GuestOrderLine;
use shared::util::normalize_item_name;
use shared::{ApiResponse, AppError, ReturnCode};

use super::{ApiResult, ensure_can_act};
use crate::auth::Diner;
use crate::auth::permissions::can_act_on_behalf_of;
use crate::db;
use crate::state::AppState;

fn check_quantity(quantity: i64) -> Result<(), AppError> {
    if quantity <= 0 {
        return Err(AppError::new(ReturnCode::InvalidQuantity));
    }
    Ok(())
}

fn check_price(price: Decimal) -> Result<(), AppError> {
    if price < Decimal::ZERO {
        return Err(AppError::new(ReturnCode::InvalidPrice));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct AddOrderItemRequest {
    pub event_id: Option<i64>,
    /// Target guest; defaults to the caller.
    pub user_id: Option<i64>,
    pub menu_id: Option<i64>,
    pub custom_item_name: Option<String>,
    pub quantity: Option<i64>,
    pub price_at_time: Option<Decimal>,
}

#[derive(Debug, Serialize)]
pub struct AddOrderItemResponse {
    pub item_id: i64,
}

/// Add one selection to a guest's order. A repeated selection of the same
/// dish merges into the existing row: quantity accumulates, price snapshot
/// is overwritten.
pub async fn add_order_item(
    State(state): State<AppState>,
    Extension(diner): Extension<Diner>,
    Json(req): Json<AddOrderItemRequest>,
) -> ApiResult<AddOrderItemResponse> {
    let event_id = req
        .event_id
        .ok_or_else(|| AppError::missing_fields("event_id is required."))?;
    let quantity = req
        .quantity
        .ok_or_else(|| AppError::missing_fields("quantity is required."))?;
    let price = req
        .price_at_time
        .ok_or_else(|| AppError::missing_fields("price_at_time is required."))?;
    check_quantity(quantity)?;
    check_price(price)?;

    let target_user_id = req.user_id.unwrap_or(diner.user_id);
    ensure_can_act(&state, event_id, &diner, target_user_id).await?;

    let price_text = price.to_string();
    let item_id = match (req.menu_id, req.custom_item_name) {
        (Some(menu_id), _) => {
            if !db::menus::belongs_to_event(&state.pool, menu_id, event_id).await? {
                return Err(AppError::new(ReturnCode::InvalidMenuItem));
            }
            db::order_items::upsert_menu_selection(
                &state.pool,
                event_id,
                target_user_id,
                menu_id,
                quantity,
                &price_text,
            )
            .await?
        }
        (None, Some(name)) => {
            let normalized = normalize_item_name(&name);
            if normalized.is_empty() {
                return Err(AppError::missing_fields(
                    "Either menu_id or custom_item_name must be provided.",
                ));
            }
            db::order_items::upsert_custom_selection(
                &state.pool,
                event_id,
                target_user_id,
                name.trim(),
                &normalized,
                quantity,
                &price_text,
            )
            .await?
        }
        (None, None) => {
            return Err(AppError::missing_fields(
                "Either menu_id or custom_item_name must be provided.",
            ));
        }
    };

    Ok(ApiResponse::success_with_message(
        "Item added successfully.",
        AddOrderItemResponse { item_id },
    ))
}

#[derive(Debug, Deserialize)]
pub struct UpdateOrderItemRequest {
    pub order_item_id: Option<i64>,
    pub quantity: Option<i64>,
    pub price_at_time: Option<Decimal>,
}

/// Update quantity and/or price of one item. Locked items are immutable;
/// the lock check deliberately precedes the permission check.
pub async fn update_order_item(
    State(state): State<AppState>,
    Extension(diner): Extension<Diner>,
    Json(req): Json<UpdateOrderItemRequest>,
) -> ApiResult<()> {
    let item_id = req
        .order_item_id
        .ok_or_else(|| AppError::missing_fields("order_item_id is required."))?;
    if req.quantity.is_none() && req.price_at_time.is_none() {
        return Err(AppError::missing_fields(
            "order_item_id and at least one field (quantity or price_at_time) are required.",
        ));
    }
    if let Some(quantity) = req.quantity {
        check_quantity(quantity)?;
    }
    if let Some(price) = req.price_at_time {
        check_price(price)?;
    }

    let item = db::order_items::find_by_id(&state.pool, item_id)
        .await?
        .ok_or_else(|| AppError::new(ReturnCode::ItemNotFound))?;
    if item.locked {
        return Err(AppError::new(ReturnCode::ItemLocked));
    }

    let role = db::guests::role_of(&state.pool, item.event_id, diner.user_id).await?;
    if !can_act_on_behalf_of(role, diner.user_id, item.guest_id) {
        return Err(AppError::unauthorised(
            "You are not allowed to modify another guest's order.",
        ));
    }

    // Re-checks the lock inside the statement; 0 rows means a concurrent
    // lock won the race.
    let affected = db::order_items::update_unlocked(
        &state.pool,
        item_id,
        req.quantity,
        req.price_at_time.map(|p| p.to_string()),
    )
    .await?;
    if affected == 0 {
        return Err(AppError::new(ReturnCode::ItemLocked));
    }

    Ok(ApiResponse::ok_with_message("Item updated successfully."))
}

#[derive(Debug, Deserialize)]
pub struct RemoveOrderItemRequest {
    pub order_item_id: Option<i64>,
}

/// Remove one unlocked item from an order.
pub async fn remove_order_item(
    State(state): State<AppState>,
    Extension(diner): Extension<Diner>,
    Json(req): Json<RemoveOrderItemRequest>,
) -> ApiResult<()> {
    let item_id = req
        .order_item_id
        .ok_or_else(|| AppError::missing_fields("order_item_id is required."))?;

    let item = db::order_items::find_by_id(&state.pool, item_id)
        .await?
        .ok_or_else(|| AppError::new(ReturnCode::ItemNotFound))?;
    if item.locked {
        return Err(AppError::new(ReturnCode::ItemLocked));
    }

    let role = db::guests::role_of(&state.pool, item.event_id, diner.user_id).await?;
    if !can_act_on_behalf_of(role, diner.user_id, item.guest_id) {
        return Err(AppError::unauthorised(
            "You are not allowed to modify another guest's order.",
        ));
    }

    let affected = db::order_items::delete_unlocked(&state.pool, item_id).await?;
    if affected == 0 {
        return Err(AppError::new(ReturnCode::ItemLocked));
    }

    Ok(ApiResponse::ok_with_message("Item removed successfully."))
}

#[derive(Debug, Deserialize)]
pub struct ResetOrderRequest {
    pub event_id: Option<i64>,
    pub user_id: Option<i64>,
}

/// Clear a guest's whole order. Unlike single-item removal this also
/// deletes locked rows; it is the escape hatch for starting over.
pub async fn reset_order(
    State(state): State<AppState>,
    Extension(diner): Extension<Diner>,
    Json(req): Json<ResetOrderRequest>,
) -> ApiResult<()> {
    let event_id = req
        .event_id
        .ok_or_else(|| AppError::missing_fields("event_id is required."))?;
    let target_user_id = req.user_id.unwrap_or(diner.user_id);
    ensure_can_act(&state, event_id, &diner, target_user_id).await?;

    db::order_items::delete_all_for_guest(&state.pool, event_id, target_user_id).await?;

    Ok(ApiResponse::ok_with_message("Order reset successfully."))
}

#[derive(Debug, Deserialize)]
pub struct SubmitOrderItem {
    pub menu_id: Option<i64>,
    pub custom_item_name: Option<String>,
    pub quantity: Option<i64>,
    pub price_at_time: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
pub struct SubmitOrderRequest {
    pub event_id: Option<i64>,
    pub user_id: Option<i64>,
    pub items: Option<Vec<SubmitOrderItem>>,
}

#[derive(Debug, Serialize)]
pub struct SubmitOrderResponse {
    pub total_amount: Decimal,
}

/// Replace a guest's order wholesale with the submitted list. Runs in one
/// transaction: either the full replacement lands or nothing changes.
pub async fn submit_order(
    State(state): State<AppState>,
    Extension(diner): Extension<Diner>,
    Json(req): Json<SubmitOrderRequest>,
) -> ApiResult<SubmitOrderResponse> {
    let event_id = req
        .event_id
        .ok_or_else(|| AppError::missing_fields("event_id is required."))?;
    let items = match req.items {
        Some(items) if !items.is_empty() => items,
        _ => return Err(AppError::missing_fields("items must be a non-empty list.")),
    };

    let target_user_id = req.user_id.unwrap_or(diner.user_id);
    ensure_can_act(&state, event_id, &diner, target_user_id).await?;

    let mut tx = state.pool.begin().await?;

    let restaurant_id = db::events::restaurant_id_of(&mut *tx, event_id)
        .await?
        .ok_or_else(|| AppError::new(ReturnCode::EventNotFound))?;

    db::order_items::delete_all_for_guest(&mut *tx, event_id, target_user_id).await?;

    let mut total = Decimal::ZERO;
    for item in items {
        let (quantity, price) = match (item.quantity, item.price_at_time) {
            (Some(q), Some(p)) => (q, p),
            _ => return Err(AppError::new(ReturnCode::InvalidItem)),
        };
        check_quantity(quantity)?;
        check_price(price)?;
        let price_text = price.to_string();

        match (item.menu_id, item.custom_item_name) {
            (Some(menu_id), _) => {
                if !db::menus::belongs_to_restaurant(&mut *tx, menu_id, restaurant_id).await? {
                    return Err(AppError::new(ReturnCode::InvalidMenuItem));
                }
                db::order_items::upsert_menu_selection(
                    &mut *tx,
                    event_id,
                    target_user_id,
                    menu_id,
                    quantity,
                    &price_text,
                )
                .await?;
            }
            (None, Some(name)) => {
                let normalized = normalize_item_name(&name);
                if normalized.is_empty() {
                    return Err(AppError::new(ReturnCode::InvalidItem));
                }
                db::order_items::upsert_custom_selection(
                    &mut *tx,
                    event_id,
                    target_user_id,
                    name.trim(),
                    &normalized,
                    quantity,
                    &price_text,
                )
                .await?;
            }
            (None, None) => return Err(AppError::new(ReturnCode::InvalidItem)),
        }

        total += Decimal::from(quantity) * price;
    }

    tx.commit().await?;

    let total_amount = total.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    Ok(ApiResponse::success_with_message(
        "Order submitted successfully.",
        SubmitOrderResponse { total_amount },
    ))
}

#[derive(Debug, Deserialize)]
pub struct GetGuestOrderRequest {
    pub event_id: Option<i64>,
    pub user_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct GuestOrderResponse {
    pub items: Vec<GuestOrderLine>,
}

/// Read one guest's current order. Reading another guest's order requires
/// the same management rights as editing it.
pub async fn get_guest_order(
    State(state): State<AppState>,
    Extension(diner): Extension<Diner>,
    Json(req): Json<GetGuestOrderRequest>,
) -> ApiResult<GuestOrderResponse> {
    let event_id = req
        .event_id
        .ok_or_else(|| AppError::missing_fields("event_id is required."))?;
    let target_user_id = req.user_id.unwrap_or(diner.user_id);
    ensure_can_act(&state, event_id, &diner, target_user_id).await?;

    let items = db::order_items::list_for_guest(&state.pool, event_id, target_user_id).await?;
    Ok(ApiResponse::success(GuestOrderResponse { items }))
}
