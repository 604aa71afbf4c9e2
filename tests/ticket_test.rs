//! Tests for ticket purchase and the dashboard stats

mod common;

use common::{create_test_server, event_body};
use serde_json::{json, Value};
use topcity_server::models::Role;

/// Submit an event as the signed-in seller and have a fresh admin
/// approve it; returns the event id. Leaves the admin signed in.
async fn approved_event(ctx: &common::TestContext) -> String {
    let response = ctx.server.post("/api/events").json(&event_body()).await;
    let body: Value = response.json();
    let event_id = body["data"]["id"].as_str().unwrap().to_string();

    ctx.sign_up_with_role("approver@example.com", "correcthorse", Role::Admin)
        .await;
    let response = ctx
        .server
        .post(&format!("/api/admin/events/{event_id}/decision"))
        .json(&json!({ "decision": "approved" }))
        .await;
    assert_eq!(response.status_code(), 200);
    event_id
}

#[tokio::test]
async fn purchase_totals_come_from_the_event_price() {
    let ctx = create_test_server();
    ctx.sign_up_with_role("seller@example.com", "correcthorse", Role::Seller)
        .await;
    let event_id = approved_event(&ctx).await;

    ctx.sign_up_user("buyer@example.com", "correcthorse").await;
    let response = ctx
        .server
        .post("/api/tickets")
        .json(&json!({ "event_id": event_id, "quantity": 3 }))
        .await;
    assert_eq!(response.status_code(), 201);
    let body: Value = response.json();
    assert_eq!(body["data"]["quantity"], 3);
    assert_eq!(body["data"]["total_price"], "149.97");

    let response = ctx.server.get("/api/tickets").await;
    let body: Value = response.json();
    assert_eq!(body["data"][0]["ticket"]["total_price"], "149.97");
    assert_eq!(body["data"][0]["event"]["id"], event_id.as_str());
}

#[tokio::test]
async fn pending_events_cannot_be_purchased() {
    let ctx = create_test_server();
    ctx.sign_up_with_role("seller@example.com", "correcthorse", Role::Seller)
        .await;
    let response = ctx.server.post("/api/events").json(&event_body()).await;
    let body: Value = response.json();
    let event_id = body["data"]["id"].as_str().unwrap().to_string();

    ctx.sign_up_user("buyer@example.com", "correcthorse").await;
    let response = ctx
        .server
        .post("/api/tickets")
        .json(&json!({ "event_id": event_id, "quantity": 1 }))
        .await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn zero_quantity_is_a_validation_error() {
    let ctx = create_test_server();
    ctx.sign_up_with_role("seller@example.com", "correcthorse", Role::Seller)
        .await;
    let event_id = approved_event(&ctx).await;

    ctx.sign_up_user("buyer@example.com", "correcthorse").await;
    let response = ctx
        .server
        .post("/api/tickets")
        .json(&json!({ "event_id": event_id, "quantity": 0 }))
        .await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn purchases_require_a_session() {
    let ctx = create_test_server();

    let response = ctx
        .server
        .post("/api/tickets")
        .json(&json!({
            "event_id": "00000000-0000-0000-0000-000000000000",
            "quantity": 1
        }))
        .await;
    assert_eq!(response.status_code(), 303);
    assert_eq!(response.header("location"), "/sign-in");
}

#[tokio::test]
async fn dashboards_aggregate_per_role() {
    let ctx = create_test_server();
    ctx.sign_up_with_role("seller@example.com", "correcthorse", Role::Seller)
        .await;
    let event_id = approved_event(&ctx).await;

    ctx.sign_up_user("buyer@example.com", "correcthorse").await;
    ctx.server
        .post("/api/tickets")
        .json(&json!({ "event_id": event_id, "quantity": 2 }))
        .await;

    // Buyer dashboard: one purchase, upcoming, 99.98 spent.
    let response = ctx.server.get("/api/stats/user").await;
    let body: Value = response.json();
    assert_eq!(body["data"]["tickets_purchased"], 1);
    assert_eq!(body["data"]["upcoming_events"], 1);
    assert_eq!(body["data"]["total_spent"], "99.98");

    // Seller dashboard: the approved event and its sales.
    ctx.sign_in("seller@example.com", "correcthorse").await;
    let response = ctx.server.get("/api/stats/seller").await;
    let body: Value = response.json();
    assert_eq!(body["data"]["active_events"], 1);
    assert_eq!(body["data"]["pending_events"], 0);
    assert_eq!(body["data"]["total_tickets_sold"], 2);
    assert_eq!(body["data"]["total_revenue"], "99.98");

    // Admin dashboard: totals across the marketplace.
    ctx.sign_in("approver@example.com", "correcthorse").await;
    let response = ctx.server.get("/api/stats/admin").await;
    let body: Value = response.json();
    assert_eq!(body["data"]["total_users"], 3);
    assert_eq!(body["data"]["total_events"], 1);
    assert_eq!(body["data"]["pending_applications"], 0);
    assert_eq!(body["data"]["pending_events"], 0);

    // Stats pages are role-gated the same silent way.
    ctx.sign_in("buyer@example.com", "correcthorse").await;
    let response = ctx.server.get("/api/stats/admin").await;
    assert_eq!(response.status_code(), 303);
    assert_eq!(response.header("location"), "/dashboard");
}
