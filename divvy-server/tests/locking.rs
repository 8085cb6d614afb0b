//! Locking at the three granularities: event, guest, item.

mod support;

use http::StatusCode;
use serde_json::json;
use support::*;

#[tokio::test]
async fn only_the_organiser_locks_the_event() {
    let app = spawn_app().await;
    let (event_id, code) = app.create_event(ALICE, TRATTORIA).await;
    app.join_event(BEN, &code).await;
    app.join_event(CARA, &code).await;
    app.make_co_host(event_id, CARA).await;

    for user in [BEN, CARA] {
        let (status, body) = app
            .post(
                "/lock_event",
                user,
                json!({ "event_id": event_id, "locked": true }),
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["return_code"], "UNAUTHORISED_ACTION");
    }

    let (status, _) = app
        .post(
            "/lock_event",
            ALICE,
            json!({ "event_id": event_id, "locked": true }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app
        .get(&format!("/get_event_details/{event_id}"), ALICE)
        .await;
    assert_eq!(body["event"]["locked"], true);

    // And back again.
    let (status, _) = app
        .post(
            "/lock_event",
            ALICE,
            json!({ "event_id": event_id, "locked": false }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn event_lock_does_not_freeze_the_ledger() {
    // The event lock gates joining and code reuse; item edits keep working.
    let app = spawn_app().await;
    let (event_id, _) = app.create_event(ALICE, TRATTORIA).await;
    app.post(
        "/lock_event",
        ALICE,
        json!({ "event_id": event_id, "locked": true }),
    )
    .await;

    app.add_item(
        ALICE,
        json!({ "event_id": event_id, "menu_id": MENU_PIZZA, "quantity": 1, "price_at_time": 10.95 }),
    )
    .await;
}

#[tokio::test]
async fn lock_guest_cascades_to_items() {
    let app = spawn_app().await;
    let (event_id, code) = app.create_event(ALICE, TRATTORIA).await;
    app.join_event(BEN, &code).await;
    let item_id = app
        .add_item(
            BEN,
            json!({ "event_id": event_id, "menu_id": MENU_PIZZA, "quantity": 1, "price_at_time": 10.95 }),
        )
        .await;

    let (status, _) = app
        .post(
            "/lock_guest",
            ALICE,
            json!({ "event_id": event_id, "guest_id": BEN, "locked": true }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app
        .post("/get_guest_order", BEN, json!({ "event_id": event_id }))
        .await;
    assert_eq!(body["items"][0]["locked"], true);

    // The cascade only touches items that existed at lock time.
    app.add_item(
        BEN,
        json!({ "event_id": event_id, "menu_id": MENU_BREAD, "quantity": 1, "price_at_time": 4.50 }),
    )
    .await;
    let (_, body) = app
        .post("/get_guest_order", BEN, json!({ "event_id": event_id }))
        .await;
    let bread = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .find(|i| i["item_name"] == "Garlic Bread")
        .unwrap();
    assert_eq!(bread["locked"], false);

    let (status, body) = app
        .post(
            "/update_order_item",
            BEN,
            json!({ "order_item_id": item_id, "quantity": 2 }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["return_code"], "ITEM_LOCKED");

    // Unlock releases the items too.
    app.post(
        "/lock_guest",
        ALICE,
        json!({ "event_id": event_id, "guest_id": BEN, "locked": false }),
    )
    .await;
    let (status, _) = app
        .post(
            "/update_order_item",
            BEN,
            json!({ "order_item_id": item_id, "quantity": 2 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn lock_guest_requires_management_rights() {
    let app = spawn_app().await;
    let (event_id, code) = app.create_event(ALICE, TRATTORIA).await;
    app.join_event(BEN, &code).await;
    app.join_event(CARA, &code).await;

    let (status, body) = app
        .post(
            "/lock_guest",
            BEN,
            json!({ "event_id": event_id, "guest_id": CARA, "locked": true }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["return_code"], "UNAUTHORISED_ACTION");

    app.make_co_host(event_id, BEN).await;
    let (status, _) = app
        .post(
            "/lock_guest",
            BEN,
            json!({ "event_id": event_id, "guest_id": CARA, "locked": true }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn lock_guest_unknown_member() {
    let app = spawn_app().await;
    let (event_id, _) = app.create_event(ALICE, TRATTORIA).await;

    let (status, body) = app
        .post(
            "/lock_guest",
            ALICE,
            json!({ "event_id": event_id, "guest_id": CARA, "locked": true }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["return_code"], "GUEST_NOT_FOUND");
}

#[tokio::test]
async fn locked_item_blocks_update_and_remove() {
    let app = spawn_app().await;
    let (event_id, _) = app.create_event(ALICE, TRATTORIA).await;
    let item_id = app
        .add_item(
            ALICE,
            json!({ "event_id": event_id, "menu_id": MENU_PIZZA, "quantity": 1, "price_at_time": 10.95 }),
        )
        .await;

    app.post(
        "/lock_order_item",
        ALICE,
        json!({ "event_id": event_id, "order_item_id": item_id, "locked": true }),
    )
    .await;

    let (status, body) = app
        .post(
            "/update_order_item",
            ALICE,
            json!({ "order_item_id": item_id, "quantity": 2 }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["return_code"], "ITEM_LOCKED");

    let (status, body) = app
        .post("/remove_order_item", ALICE, json!({ "order_item_id": item_id }))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["return_code"], "ITEM_LOCKED");
}

#[tokio::test]
async fn lock_answers_before_permission() {
    // A locked item reports ITEM_LOCKED even to callers who would also
    // fail the permission check; the lock test runs first.
    let app = spawn_app().await;
    let (event_id, code) = app.create_event(ALICE, TRATTORIA).await;
    app.join_event(BEN, &code).await;
    let item_id = app
        .add_item(
            ALICE,
            json!({ "event_id": event_id, "menu_id": MENU_PIZZA, "quantity": 1, "price_at_time": 10.95 }),
        )
        .await;
    app.post(
        "/lock_order_item",
        ALICE,
        json!({ "event_id": event_id, "order_item_id": item_id, "locked": true }),
    )
    .await;

    let (status, body) = app
        .post(
            "/update_order_item",
            BEN,
            json!({ "order_item_id": item_id, "quantity": 2 }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["return_code"], "ITEM_LOCKED");
}

#[tokio::test]
async fn lock_order_item_requires_management_rights() {
    let app = spawn_app().await;
    let (event_id, code) = app.create_event(ALICE, TRATTORIA).await;
    app.join_event(BEN, &code).await;
    let item_id = app
        .add_item(
            BEN,
            json!({ "event_id": event_id, "menu_id": MENU_PIZZA, "quantity": 1, "price_at_time": 10.95 }),
        )
        .await;

    // Even on their own item, a plain guest cannot toggle locks.
    let (status, body) = app
        .post(
            "/lock_order_item",
            BEN,
            json!({ "event_id": event_id, "order_item_id": item_id, "locked": true }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["return_code"], "UNAUTHORISED_ACTION");
}

#[tokio::test]
async fn lock_order_item_scoped_to_event() {
    let app = spawn_app().await;
    let (event_a, _) = app.create_event(ALICE, TRATTORIA).await;
    let (event_b, _) = app.create_event(ALICE, NOODLE_BAR).await;
    let item_id = app
        .add_item(
            ALICE,
            json!({ "event_id": event_a, "menu_id": MENU_PIZZA, "quantity": 1, "price_at_time": 10.95 }),
        )
        .await;

    // Right item, wrong event.
    let (status, body) = app
        .post(
            "/lock_order_item",
            ALICE,
            json!({ "event_id": event_b, "order_item_id": item_id, "locked": true }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["return_code"], "ITEM_NOT_FOUND");
}
