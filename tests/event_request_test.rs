//! Tests for the event request approval workflow and public visibility

mod common;

use common::{create_test_server, event_body};
use serde_json::{json, Value};
use topcity_server::models::Role;

#[tokio::test]
async fn plain_users_are_redirected_from_submission() {
    let ctx = create_test_server();
    ctx.sign_up_user("user@example.com", "correcthorse").await;

    let response = ctx.server.post("/api/events").json(&event_body()).await;
    assert_eq!(response.status_code(), 303);
    assert_eq!(response.header("location"), "/dashboard");
}

#[tokio::test]
async fn submission_round_trips_price_and_capacity() {
    let ctx = create_test_server();
    ctx.sign_up_with_role("seller@example.com", "correcthorse", Role::Seller)
        .await;

    let response = ctx.server.post("/api/events").json(&event_body()).await;
    assert_eq!(response.status_code(), 201);
    let body: Value = response.json();
    let event_id = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["status"], "pending");
    assert_eq!(body["data"]["price"], "49.99");
    assert_eq!(body["data"]["capacity"], 200);
    assert!(body["data"]["reviewed_by"].is_null());
    assert!(body["data"]["reviewed_at"].is_null());

    // The organizer sees it among their own events regardless of status.
    let response = ctx.server.get("/api/seller/events").await;
    let body: Value = response.json();
    assert_eq!(body["data"][0]["id"], event_id.as_str());
}

#[tokio::test]
async fn malformed_numbers_are_validation_errors() {
    let ctx = create_test_server();
    ctx.sign_up_with_role("seller@example.com", "correcthorse", Role::Seller)
        .await;

    for (price, capacity) in [("abc", "200"), ("-1", "200"), ("49.99", "zero"), ("49.99", "0")] {
        let mut body = event_body();
        body["price"] = json!(price);
        body["capacity"] = json!(capacity);
        let response = ctx.server.post("/api/events").json(&body).await;
        assert_eq!(
            response.status_code(),
            400,
            "price={price} capacity={capacity}"
        );
        let body: Value = response.json();
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }
}

#[tokio::test]
async fn only_approved_events_are_public() {
    let ctx = create_test_server();
    ctx.sign_up_with_role("seller@example.com", "correcthorse", Role::Seller)
        .await;
    let response = ctx.server.post("/api/events").json(&event_body()).await;
    let body: Value = response.json();
    let event_id = body["data"]["id"].as_str().unwrap().to_string();

    // Pending events are invisible: absent from the listing, 404 on detail.
    let response = ctx.server.get("/api/events").await;
    let body: Value = response.json();
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
    let response = ctx.server.get(&format!("/api/events/{event_id}")).await;
    assert_eq!(response.status_code(), 404);

    let admin_id = ctx
        .sign_up_with_role("admin@example.com", "correcthorse", Role::Admin)
        .await;
    let response = ctx
        .server
        .post(&format!("/api/admin/events/{event_id}/decision"))
        .json(&json!({ "decision": "approved" }))
        .await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["data"]["status"], "approved");
    assert_eq!(body["data"]["reviewed_by"], admin_id.to_string().as_str());
    assert!(body["data"]["reviewed_at"].is_string());

    // Now it is listed and viewable.
    let response = ctx.server.get("/api/events").await;
    let body: Value = response.json();
    assert_eq!(body["data"][0]["id"], event_id.as_str());
    let response = ctx.server.get(&format!("/api/events/{event_id}")).await;
    assert_eq!(response.status_code(), 200);
}

#[tokio::test]
async fn decided_events_reject_further_decisions() {
    let ctx = create_test_server();
    ctx.sign_up_with_role("seller@example.com", "correcthorse", Role::Seller)
        .await;
    let response = ctx.server.post("/api/events").json(&event_body()).await;
    let body: Value = response.json();
    let event_id = body["data"]["id"].as_str().unwrap().to_string();

    ctx.sign_up_with_role("admin@example.com", "correcthorse", Role::Admin)
        .await;
    let url = format!("/api/admin/events/{event_id}/decision");
    let response = ctx
        .server
        .post(&url)
        .json(&json!({ "decision": "approved" }))
        .await;
    assert_eq!(response.status_code(), 200);

    let response = ctx
        .server
        .post(&url)
        .json(&json!({ "decision": "rejected" }))
        .await;
    assert_eq!(response.status_code(), 409);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "INVALID_TRANSITION");

    // Still approved, still public.
    let response = ctx.server.get("/api/events").await;
    let body: Value = response.json();
    assert_eq!(body["data"][0]["status"], "approved");
}

#[tokio::test]
async fn admin_queue_defaults_to_pending() {
    let ctx = create_test_server();
    ctx.sign_up_with_role("seller@example.com", "correcthorse", Role::Seller)
        .await;
    ctx.server.post("/api/events").json(&event_body()).await;
    let mut second = event_body();
    second["title"] = json!("Winter Gala");
    ctx.server.post("/api/events").json(&second).await;

    ctx.sign_up_with_role("admin@example.com", "correcthorse", Role::Admin)
        .await;
    let response = ctx.server.get("/api/admin/events").await;
    let body: Value = response.json();
    let queue = body["data"].as_array().unwrap();
    assert_eq!(queue.len(), 2);
    assert!(queue.iter().all(|e| e["status"] == "pending"));

    let response = ctx.server.get("/api/admin/events?status=approved").await;
    let body: Value = response.json();
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn admins_can_submit_events_too() {
    let ctx = create_test_server();
    ctx.sign_up_with_role("admin@example.com", "correcthorse", Role::Admin)
        .await;

    let response = ctx.server.post("/api/events").json(&event_body()).await;
    assert_eq!(response.status_code(), 201);
}
