//! Event lifecycle endpoints: create, join, detail and listing views.

use axum::extract::{Extension, Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use shared::models::{EventDetails, EventSummary, GuestWithTotal, Role};
use shared::util::{now_millis, snowflake_id};
use shared::{ApiResponse, AppError, ReturnCode};

use super::ApiResult;
use crate::auth::Diner;
use crate::db;
use crate::state::AppState;

/// Attempts at generating a free join code before giving up. Collisions
/// are rare (four digits, few concurrent unlocked events), so exhausting
/// this means something is wrong.
const CODE_ATTEMPTS: u32 = 16;

fn generate_code() -> String {
    use rand::Rng;
    rand::thread_rng().gen_range(1000..10000).to_string()
}

#[derive(Debug, Deserialize)]
pub struct CreateEventRequest {
    pub restaurant_id: Option<i64>,
    pub event_date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateEventResponse {
    pub event_id: i64,
    pub public_event_code: String,
}

/// Create an event at a restaurant. The caller becomes its organiser, and
/// a 4-digit join code unique among unlocked events is assigned.
pub async fn create_event(
    State(state): State<AppState>,
    Extension(diner): Extension<Diner>,
    Json(req): Json<CreateEventRequest>,
) -> ApiResult<CreateEventResponse> {
    let restaurant_id = req
        .restaurant_id
        .ok_or_else(|| AppError::missing_fields("restaurant_id is required."))?;
    let event_date = req
        .event_date
        .ok_or_else(|| AppError::missing_fields("event_date is required."))?;

    if chrono::NaiveDateTime::parse_from_str(&event_date, "%Y-%m-%d %H:%M:%S").is_err()
        && chrono::NaiveDate::parse_from_str(&event_date, "%Y-%m-%d").is_err()
    {
        return Err(AppError::missing_fields(
            "event_date must be an ISO date or date-time.",
        ));
    }

    if !db::restaurants::exists(&state.pool, restaurant_id).await? {
        return Err(AppError::new(ReturnCode::RestaurantNotFound));
    }

    // One open event per organiser per restaurant.
    if db::events::has_unlocked_at_restaurant(&state.pool, restaurant_id, diner.user_id).await? {
        return Err(AppError::new(ReturnCode::EventAlreadyExists));
    }

    for _ in 0..CODE_ATTEMPTS {
        let code = generate_code();
        let mut tx = state.pool.begin().await?;

        // Advisory pre-check; the partial unique index on unlocked codes is
        // the real arbiter, surfacing as an insert conflict below.
        if db::events::code_in_use(&mut *tx, &code).await? {
            continue;
        }

        let event_id = snowflake_id();
        let inserted = db::events::try_insert(
            &mut *tx,
            event_id,
            restaurant_id,
            diner.user_id,
            &event_date,
            &code,
            now_millis(),
        )
        .await?;
        if !inserted {
            continue;
        }

        db::guests::insert(&mut *tx, event_id, diner.user_id, Role::Organiser).await?;
        tx.commit().await?;

        tracing::info!(event_id, %code, "event created");
        return Ok(ApiResponse::success(CreateEventResponse {
            event_id,
            public_event_code: code,
        }));
    }

    tracing::error!("exhausted join-code attempts for restaurant {restaurant_id}");
    Err(AppError::new(ReturnCode::ServerError))
}

#[derive(Debug, Deserialize)]
pub struct JoinEventRequest {
    pub public_event_code: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct JoinEventResponse {
    pub guest_id: i64,
}

/// Join an unlocked event by its public code, as a plain guest.
pub async fn join_event(
    State(state): State<AppState>,
    Extension(diner): Extension<Diner>,
    Json(req): Json<JoinEventRequest>,
) -> ApiResult<JoinEventResponse> {
    let code = req
        .public_event_code
        .ok_or_else(|| AppError::missing_fields("public_event_code is required."))?;

    let event_id = db::events::find_unlocked_by_code(&state.pool, &code)
        .await?
        .ok_or_else(|| AppError::new(ReturnCode::EventNotFound))?;

    let guest_id = db::guests::try_insert(&state.pool, event_id, diner.user_id)
        .await?
        .ok_or_else(|| AppError::new(ReturnCode::AlreadyJoined))?;

    Ok(ApiResponse::success_with_message(
        "Joined event successfully.",
        JoinEventResponse { guest_id },
    ))
}

#[derive(Debug, Serialize)]
pub struct EventDetailsResponse {
    pub event: EventDetails,
}

pub async fn get_event_details(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> ApiResult<EventDetailsResponse> {
    let event = db::events::details_by_id(&state.pool, event_id)
        .await?
        .ok_or_else(|| AppError::new(ReturnCode::EventNotFound))?;
    Ok(ApiResponse::success(EventDetailsResponse { event }))
}

#[derive(Debug, Serialize)]
pub struct EventGuestsResponse {
    pub guests: Vec<GuestWithTotal>,
}

/// Guest listing with each guest's raw aggregate total.
pub async fn get_event_guests(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> ApiResult<EventGuestsResponse> {
    if db::events::find_by_id(&state.pool, event_id).await?.is_none() {
        return Err(AppError::new(ReturnCode::EventNotFound));
    }
    let guests = db::guests::list_with_totals(&state.pool, event_id).await?;
    Ok(ApiResponse::success(EventGuestsResponse { guests }))
}

#[derive(Debug, Serialize)]
pub struct MenuSelection {
    pub user_id: i64,
    pub quantity: i64,
    pub price_at_time: rust_decimal::Decimal,
    pub locked: bool,
}

#[derive(Debug, Serialize)]
pub struct MenuWithSelections {
    pub menu_id: i64,
    pub item_name: String,
    pub price: rust_decimal::Decimal,
    pub selections: Vec<MenuSelection>,
}

#[derive(Debug, Serialize)]
pub struct EventMenuResponse {
    pub menu: Vec<MenuWithSelections>,
}

/// The event's restaurant menu, each dish annotated with the selections
/// guests have already made against it.
pub async fn get_event_menu(
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> ApiResult<EventMenuResponse> {
    let restaurant_id = db::events::restaurant_id_of(&state.pool, event_id)
        .await?
        .ok_or_else(|| AppError::new(ReturnCode::EventNotFound))?;

    let menu = db::menus::list_for_restaurant(&state.pool, restaurant_id).await?;
    let selections = db::order_items::list_menu_selections(&state.pool, event_id).await?;

    let menu = menu
        .into_iter()
        .map(|m| MenuWithSelections {
            selections: selections
                .iter()
                .filter(|s| s.menu_id == m.id)
                .map(|s| MenuSelection {
                    user_id: s.user_id,
                    quantity: s.quantity,
                    price_at_time: s.price_at_time,
                    locked: s.locked,
                })
                .collect(),
            menu_id: m.id,
            item_name: m.item_name,
            price: m.price,
        })
        .collect();

    Ok(ApiResponse::success(EventMenuResponse { menu }))
}

#[derive(Debug, Serialize)]
pub struct UserEventsResponse {
    pub events: Vec<EventSummary>,
}

pub async fn get_user_events(
    State(state): State<AppState>,
    Extension(diner): Extension<Diner>,
) -> ApiResult<UserEventsResponse> {
    let events = db::events::list_for_user(&state.pool, diner.user_id).await?;
    Ok(ApiResponse::success(UserEventsResponse { events }))
}
