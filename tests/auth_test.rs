//! Tests for the sign-up, sign-in and password-reset flows

mod common;

use common::create_test_server;
use serde_json::{json, Value};

#[tokio::test]
async fn sign_up_confirm_sign_in_round_trip() {
    let ctx = create_test_server();

    let response = ctx
        .server
        .post("/api/auth/sign-up")
        .json(&json!({
            "email": "newcomer@example.com",
            "password": "correcthorse",
            "full_name": "New Comer",
        }))
        .await;
    assert_eq!(response.status_code(), 200);

    // Unconfirmed accounts cannot sign in yet.
    let response = ctx
        .server
        .post("/api/auth/sign-in")
        .json(&json!({ "email": "newcomer@example.com", "password": "correcthorse" }))
        .await;
    assert_eq!(response.status_code(), 401);

    let token = ctx.mailer.get_token("newcomer@example.com").unwrap();
    let response = ctx
        .server
        .post("/api/auth/confirm")
        .json(&json!({ "token": token }))
        .await;
    assert_eq!(response.status_code(), 200);

    let response = ctx
        .server
        .post("/api/auth/sign-in")
        .json(&json!({ "email": "newcomer@example.com", "password": "correcthorse" }))
        .await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["success"], true);

    // The profile is auto-provisioned with the default role and status.
    assert_eq!(body["data"]["role"], "user");
    assert_eq!(body["data"]["seller_status"], "none");
    assert!(response.maybe_cookie("topcity_session").is_some());
}

#[tokio::test]
async fn session_context_reflects_the_cookie() {
    let ctx = create_test_server();

    let response = ctx.server.get("/api/auth/session").await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["data"]["authenticated"], false);
    assert!(body["data"]["profile"].is_null());

    ctx.sign_up_user("member@example.com", "correcthorse").await;
    let response = ctx.server.get("/api/auth/session").await;
    let body: Value = response.json();
    assert_eq!(body["data"]["authenticated"], true);
    assert_eq!(body["data"]["profile"]["email"], "member@example.com");
}

#[tokio::test]
async fn wrong_password_and_unknown_user_fail_alike() {
    let ctx = create_test_server();
    ctx.sign_up_user("member@example.com", "correcthorse").await;

    let response = ctx
        .server
        .post("/api/auth/sign-in")
        .json(&json!({ "email": "member@example.com", "password": "wrongpassword" }))
        .await;
    assert_eq!(response.status_code(), 401);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "AUTH_ERROR");

    let response = ctx
        .server
        .post("/api/auth/sign-in")
        .json(&json!({ "email": "nobody@example.com", "password": "whatever123" }))
        .await;
    assert_eq!(response.status_code(), 401);
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let ctx = create_test_server();
    ctx.sign_up_user("member@example.com", "correcthorse").await;

    let response = ctx
        .server
        .post("/api/auth/sign-up")
        .json(&json!({ "email": "member@example.com", "password": "anotherpass1" }))
        .await;
    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn short_passwords_are_rejected() {
    let ctx = create_test_server();

    let response = ctx
        .server
        .post("/api/auth/sign-up")
        .json(&json!({ "email": "member@example.com", "password": "short" }))
        .await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn sign_out_clears_the_session() {
    let ctx = create_test_server();
    ctx.sign_up_user("member@example.com", "correcthorse").await;

    let response = ctx.server.post("/api/auth/sign-out").await;
    assert_eq!(response.status_code(), 200);

    let response = ctx.server.get("/api/auth/session").await;
    let body: Value = response.json();
    assert_eq!(body["data"]["authenticated"], false);
}

#[tokio::test]
async fn password_reset_round_trip() {
    let ctx = create_test_server();
    ctx.sign_up_user("member@example.com", "correcthorse").await;

    let response = ctx
        .server
        .post("/api/auth/reset")
        .json(&json!({ "email": "member@example.com" }))
        .await;
    assert_eq!(response.status_code(), 200);

    let token = ctx.mailer.get_token("member@example.com").unwrap();
    let response = ctx
        .server
        .post("/api/auth/complete-reset")
        .json(&json!({ "token": token, "password": "freshpassword" }))
        .await;
    assert_eq!(response.status_code(), 200);

    // Old password no longer works, the new one does.
    let response = ctx
        .server
        .post("/api/auth/sign-in")
        .json(&json!({ "email": "member@example.com", "password": "correcthorse" }))
        .await;
    assert_eq!(response.status_code(), 401);
    ctx.sign_in("member@example.com", "freshpassword").await;

    // The token was consumed and cannot be replayed.
    let response = ctx
        .server
        .post("/api/auth/complete-reset")
        .json(&json!({ "token": token, "password": "yetanotherpass" }))
        .await;
    assert_eq!(response.status_code(), 401);
}

#[tokio::test]
async fn reset_for_unknown_email_is_not_found() {
    let ctx = create_test_server();

    let response = ctx
        .server
        .post("/api/auth/reset")
        .json(&json!({ "email": "nobody@example.com" }))
        .await;
    assert_eq!(response.status_code(), 404);
}
