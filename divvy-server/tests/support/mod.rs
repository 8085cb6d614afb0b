//! Shared harness for the integration tests: an in-memory SQLite database
//! with seeded reference data and a real router driven through tower.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::str::FromStr;

use axum::Router;
use axum::body::Body;
use divvy_server::{api, auth, state::AppState};
use http::{Request, StatusCode, header};
use serde_json::Value;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tower::ServiceExt;

pub const SECRET: &str = "integration-test-secret";

pub const ALICE: i64 = 1;
pub const BEN: i64 = 2;
pub const CARA: i64 = 3;

pub const TRATTORIA: i64 = 1;
pub const NOODLE_BAR: i64 = 2;

pub const MENU_PIZZA: i64 = 10; // Margherita Pizza, 10.95, Trattoria
pub const MENU_BREAD: i64 = 11; // Garlic Bread, 4.50, Trattoria
pub const MENU_RAMEN: i64 = 20; // Shoyu Ramen, 12.00, Noodle Bar

pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
}

pub async fn spawn_app() -> TestApp {
    // A single connection: every in-memory SQLite connection is its own
    // database, so the pool must not open a second one. Foreign keys are
    // enforced exactly as in the production pool.
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap();
    divvy_server::db::MIGRATOR.run(&pool).await.unwrap();
    seed(&pool).await;

    let state = AppState {
        pool: pool.clone(),
        jwt_secret: SECRET.to_string(),
    };
    TestApp {
        router: api::create_router(state),
        pool,
    }
}

async fn seed(pool: &SqlitePool) {
    sqlx::query(
        "INSERT INTO restaurant (id, name, address, city, postcode) VALUES \
         (1, 'Trattoria Bella', '12 Via Roma', 'London', 'N1 2AB'), \
         (2, 'Noodle Bar', '3 Market St', 'London', 'E2 7CD')",
    )
    .execute(pool)
    .await
    .unwrap();

    sqlx::query(
        "INSERT INTO app_user (id, name, email) VALUES \
         (1, 'Alice', 'alice@example.com'), \
         (2, 'Ben', 'ben@example.com'), \
         (3, 'Cara', 'cara@example.com')",
    )
    .execute(pool)
    .await
    .unwrap();

    sqlx::query(
        "INSERT INTO menu (id, restaurant_id, item_name, price) VALUES \
         (10, 1, 'Margherita Pizza', '10.95'), \
         (11, 1, 'Garlic Bread', '4.50'), \
         (20, 2, 'Shoyu Ramen', '12.00')",
    )
    .execute(pool)
    .await
    .unwrap();
}

impl TestApp {
    pub fn token_for(&self, user_id: i64) -> String {
        let email = format!("user{user_id}@example.com");
        auth::create_token(user_id, &email, SECRET).unwrap()
    }

    pub async fn post(&self, path: &str, user_id: i64, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", self.token_for(user_id)),
            )
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn get(&self, path: &str, user_id: i64) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", self.token_for(user_id)),
            )
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    /// Create an event for `user_id` at a restaurant, returning
    /// (event_id, public_event_code).
    pub async fn create_event(&self, user_id: i64, restaurant_id: i64) -> (i64, String) {
        let (status, body) = self
            .post(
                "/create_event",
                user_id,
                serde_json::json!({
                    "restaurant_id": restaurant_id,
                    "event_date": "2026-09-12 19:30:00",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create_event failed: {body}");
        (
            body["event_id"].as_i64().unwrap(),
            body["public_event_code"].as_str().unwrap().to_string(),
        )
    }

    /// Join `user_id` into the event with the given code.
    pub async fn join_event(&self, user_id: i64, code: &str) {
        let (status, body) = self
            .post(
                "/join_event",
                user_id,
                serde_json::json!({ "public_event_code": code }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "join_event failed: {body}");
    }

    /// Add an item and return its id.
    pub async fn add_item(&self, user_id: i64, body: Value) -> i64 {
        let (status, body) = self.post("/add_order_item", user_id, body).await;
        assert_eq!(status, StatusCode::OK, "add_order_item failed: {body}");
        body["item_id"].as_i64().unwrap()
    }

    /// Promote a member to co-host. Role grants are out-of-band, so tests
    /// write the membership row directly.
    pub async fn make_co_host(&self, event_id: i64, user_id: i64) {
        sqlx::query("UPDATE guest SET role = 'co-host' WHERE event_id = ? AND user_id = ?")
            .bind(event_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .unwrap();
    }
}
