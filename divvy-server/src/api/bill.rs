//! Bill view: every guest's lines with per-line rounded subtotals.

use axum::extract::{Path, State};
use serde::Serialize;
use shared::models::{BillLine, GuestBill, bill_total, line_subtotal};
use shared::{ApiResponse, AppError, ReturnCode};

use super::ApiResult;
use crate::db;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct EventBillResponse {
    pub bill: Vec<GuestBill>,
}

/// Aggregate the event's ledger into per-guest bills. Subtotals round per
/// line before summing, so this is the authoritative "what do I owe" view;
/// guests with no items still appear with an empty section.
pub async fn get_event_bill(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> ApiResult<EventBillResponse> {
    let guests = db::guests::list_for_bill(&state.pool, event_id).await?;
    if guests.is_empty() {
        return Err(AppError::new(ReturnCode::EventNotFound));
    }
    let rows = db::order_items::list_for_bill(&state.pool, event_id).await?;

    let bill = guests
        .into_iter()
        .map(|(user_id, name, role)| {
            let items: Vec<BillLine> = rows
                .iter()
                .filter(|r| r.guest_id == user_id)
                .map(|r| BillLine {
                    item_name: r.item_name.clone(),
                    quantity: r.quantity,
                    price_at_time: r.price_at_time,
                    subtotal: line_subtotal(r.quantity, r.price_at_time),
                })
                .collect();
            let total = bill_total(items.iter().map(|l| l.subtotal));
            GuestBill {
                user_id,
                name,
                role,
                items,
                total,
            }
        })
        .collect();

    Ok(ApiResponse::success(EventBillResponse { bill }))
}
