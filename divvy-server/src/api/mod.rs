//! HTTP API
//!
//! All endpoints sit behind the diner JWT middleware except `/health`.
//! Responses use the flat envelope from [`shared::ApiResponse`].

pub mod bill;
pub mod events;
pub mod health;
pub mod locks;
pub mod orders;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use shared::{ApiResponse, AppError};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{self, Diner, permissions::can_act_on_behalf_of};
use crate::db;
use crate::state::AppState;

/// Result alias for API handlers.
pub type ApiResult<T> = Result<ApiResponse<T>, AppError>;

/// Verify the acting diner may touch `target_user_id`'s data in this event.
/// Self-service is always allowed; otherwise the caller's own role in the
/// event must grant management rights.
pub(crate) async fn ensure_can_act(
    state: &AppState,
    event_id: i64,
    diner: &Diner,
    target_user_id: i64,
) -> Result<(), AppError> {
    if diner.user_id == target_user_id {
        return Ok(());
    }
    let role = db::guests::role_of(&state.pool, event_id, diner.user_id).await?;
    if can_act_on_behalf_of(role, diner.user_id, target_user_id) {
        Ok(())
    } else {
        Err(AppError::unauthorised(
            "You are not allowed to modify another guest's order.",
        ))
    }
}

/// Build the application router.
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/create_event", post(events::create_event))
        .route("/join_event", post(events::join_event))
        .route("/get_event_details/{event_id}", get(events::get_event_details))
        .route("/get_event_guests/{event_id}", get(events::get_event_guests))
        .route("/get_event_menu/{event_id}", get(events::get_event_menu))
        .route("/get_user_events", get(events::get_user_events))
        .route("/add_order_item", post(orders::add_order_item))
        .route("/update_order_item", post(orders::update_order_item))
        .route("/remove_order_item", post(orders::remove_order_item))
        .route("/reset_order", post(orders::reset_order))
        .route("/submit_order", post(orders::submit_order))
        .route("/get_guest_order", post(orders::get_guest_order))
        .route("/lock_event", post(locks::lock_event))
        .route("/lock_guest", post(locks::lock_guest))
        .route("/lock_order_item", post(locks::lock_order_item))
        .route("/get_event_bill/{event_id}", get(bill::get_event_bill))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
