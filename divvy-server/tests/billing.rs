//! Bill aggregation and the guest-listing totals.

mod support;

use http::StatusCode;
use serde_json::json;
use support::*;

#[tokio::test]
async fn bill_groups_lines_per_guest() {
    let app = spawn_app().await;
    let (event_id, code) = app.create_event(ALICE, TRATTORIA).await;
    app.join_event(BEN, &code).await;

    app.add_item(
        ALICE,
        json!({ "event_id": event_id, "menu_id": MENU_BREAD, "quantity": 1, "price_at_time": 4.50 }),
    )
    .await;
    app.add_item(
        ALICE,
        json!({ "event_id": event_id, "menu_id": MENU_PIZZA, "quantity": 1, "price_at_time": 10.95 }),
    )
    .await;
    app.add_item(
        BEN,
        json!({ "event_id": event_id, "custom_item_name": "Tiramisu", "quantity": 2, "price_at_time": 6.00 }),
    )
    .await;

    let (status, body) = app.get(&format!("/get_event_bill/{event_id}"), ALICE).await;
    assert_eq!(status, StatusCode::OK);
    let bill = body["bill"].as_array().unwrap();
    assert_eq!(bill.len(), 2);

    let alice = &bill[0];
    assert_eq!(alice["name"], "Alice");
    assert_eq!(alice["role"], "organiser");
    let items = alice["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    let bread = items
        .iter()
        .find(|i| i["item_name"] == "Garlic Bread")
        .unwrap();
    assert_eq!(bread["subtotal"].as_f64(), Some(4.50));
    let pizza = items
        .iter()
        .find(|i| i["item_name"] == "Margherita Pizza")
        .unwrap();
    assert_eq!(pizza["subtotal"].as_f64(), Some(10.95));
    assert_eq!(alice["total"].as_f64(), Some(15.45));

    let ben = &bill[1];
    assert_eq!(ben["name"], "Ben");
    assert_eq!(ben["items"][0]["item_name"], "Tiramisu");
    assert_eq!(ben["items"][0]["quantity"], 2);
    assert_eq!(ben["items"][0]["subtotal"].as_f64(), Some(12.00));
    assert_eq!(ben["total"].as_f64(), Some(12.00));
}

#[tokio::test]
async fn guests_without_items_still_appear() {
    let app = spawn_app().await;
    let (event_id, code) = app.create_event(ALICE, TRATTORIA).await;
    app.join_event(BEN, &code).await;

    let (status, body) = app.get(&format!("/get_event_bill/{event_id}"), ALICE).await;
    assert_eq!(status, StatusCode::OK);
    let bill = body["bill"].as_array().unwrap();
    assert_eq!(bill.len(), 2);
    assert!(bill[1]["items"].as_array().unwrap().is_empty());
    assert_eq!(bill[1]["total"].as_f64(), Some(0.0));
}

#[tokio::test]
async fn subtotals_round_per_line() {
    let app = spawn_app().await;
    let (event_id, _) = app.create_event(ALICE, TRATTORIA).await;

    // 3 * 3.333 = 9.999, rounded to 10.00 on the line.
    app.add_item(
        ALICE,
        json!({ "event_id": event_id, "custom_item_name": "Mystery stew", "quantity": 3, "price_at_time": 3.333 }),
    )
    .await;

    let (_, body) = app.get(&format!("/get_event_bill/{event_id}"), ALICE).await;
    let line = &body["bill"][0]["items"][0];
    assert_eq!(line["subtotal"].as_f64(), Some(10.0));
    assert_eq!(body["bill"][0]["total"].as_f64(), Some(10.0));
}

#[tokio::test]
async fn guest_listing_total_is_the_raw_sum() {
    // The listing aggregates in SQL without per-line rounding, so the same
    // order shows 9.999 here and 10.00 on the bill.
    let app = spawn_app().await;
    let (event_id, _) = app.create_event(ALICE, TRATTORIA).await;
    app.add_item(
        ALICE,
        json!({ "event_id": event_id, "custom_item_name": "Mystery stew", "quantity": 3, "price_at_time": 3.333 }),
    )
    .await;

    let (_, body) = app.get(&format!("/get_event_guests/{event_id}"), ALICE).await;
    let total = body["guests"][0]["total_amount"].as_f64().unwrap();
    assert!((total - 9.999).abs() < 1e-9, "got {total}");
}

#[tokio::test]
async fn bill_for_unknown_event() {
    let app = spawn_app().await;
    let (status, body) = app.get("/get_event_bill/999", ALICE).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["return_code"], "EVENT_NOT_FOUND");
}
