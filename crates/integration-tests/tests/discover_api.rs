//! Shopper app tests: swipe sessions, favorites and sign-out.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use reqwest::StatusCode;
use serde_json::{Value, json};

use style_mingle_integration_tests::{EMMA_EMAIL, TestContext, expect_json};

fn current_id(reply: &Value) -> Option<&str> {
    reply["session"]["current"]["id"].as_str()
}

fn ids(products: &Value) -> Vec<&str> {
    products
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect()
}

async fn command(ctx: &TestContext, command: &str) -> Value {
    let resp = ctx
        .post("/api/discover/command", &json!({ "command": command }))
        .await;
    expect_json(resp, StatusCode::OK).await
}

// =============================================================================
// Session basics
// =============================================================================

#[tokio::test]
async fn test_discover_requires_customer() {
    let ctx = TestContext::new().await;
    let resp = ctx.get("/api/discover").await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_own_profile() {
    let ctx = TestContext::new().await;
    ctx.login_customer(EMMA_EMAIL).await;
    let me: Value = expect_json(ctx.get("/api/me").await, StatusCode::OK).await;
    assert_eq!(me["id"], "cust-001");
    assert_eq!(me["initials"], "EW");
}

#[tokio::test]
async fn test_first_card_and_like() {
    let ctx = TestContext::new().await;
    ctx.login_customer(EMMA_EMAIL).await;

    let reply: Value = expect_json(ctx.get("/api/discover").await, StatusCode::OK).await;
    assert_eq!(reply["session"]["state"], "browsing");
    assert_eq!(reply["session"]["total"], 10);
    assert_eq!(current_id(&reply), Some("prod-001"));

    let reply = command(&ctx, "like").await;
    assert_eq!(reply["outcome"]["status"], "applied");
    assert_eq!(reply["session"]["liked"], 1);
    assert_eq!(current_id(&reply), Some("prod-002"));
    let events: Vec<&str> = reply["events"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["type"].as_str().unwrap())
        .collect();
    assert_eq!(events, ["liked", "added_to_favorites"]);
}

#[tokio::test]
async fn test_previous_at_start_is_ignored() {
    let ctx = TestContext::new().await;
    ctx.login_customer(EMMA_EMAIL).await;
    let reply = command(&ctx, "previous").await;
    assert_eq!(reply["outcome"]["status"], "ignored");
    assert_eq!(reply["outcome"]["reason"], "at_boundary");
    assert_eq!(reply["session"]["cursor"], 0);
}

#[tokio::test]
async fn test_unknown_command_is_rejected() {
    let ctx = TestContext::new().await;
    ctx.login_customer(EMMA_EMAIL).await;
    let resp = ctx
        .post("/api/discover/command", &json!({ "command": "superlike" }))
        .await;
    assert!(resp.status().is_client_error());
}

// =============================================================================
// Keys and gestures
// =============================================================================

#[tokio::test]
async fn test_keys_drive_the_session() {
    let ctx = TestContext::new().await;
    ctx.login_customer(EMMA_EMAIL).await;

    let reply: Value = expect_json(
        ctx.post("/api/discover/key", &json!({ "key": "ArrowLeft" })).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(reply["command"], "dislike");
    assert_eq!(reply["session"]["disliked"], 1);

    // Unmapped keys are accepted and ignored.
    let reply: Value = expect_json(
        ctx.post("/api/discover/key", &json!({ "key": "x" })).await,
        StatusCode::OK,
    )
    .await;
    assert!(reply.get("command").is_none());
    assert_eq!(reply["session"]["cursor"], 1);

    let resp = ctx
        .post("/api/discover/key", &json!({ "key": "Escape" }))
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_drag_past_threshold_likes() {
    let ctx = TestContext::new().await;
    ctx.login_customer(EMMA_EMAIL).await;

    for body in [
        json!({ "phase": "start", "x": 100.0 }),
        json!({ "phase": "move", "x": 180.0 }),
    ] {
        let resp = ctx.post("/api/discover/gesture", &body).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
    let reply: Value = expect_json(
        ctx.post("/api/discover/gesture", &json!({ "phase": "end" })).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(reply["command"], "like");
    assert_eq!(reply["session"]["liked"], 1);
}

#[tokio::test]
async fn test_short_drag_does_nothing() {
    let ctx = TestContext::new().await;
    ctx.login_customer(EMMA_EMAIL).await;

    ctx.post("/api/discover/gesture", &json!({ "phase": "start", "x": 100.0 }))
        .await;
    ctx.post("/api/discover/gesture", &json!({ "phase": "move", "x": 80.0 }))
        .await;
    let reply: Value = expect_json(
        ctx.post("/api/discover/gesture", &json!({ "phase": "end" })).await,
        StatusCode::OK,
    )
    .await;
    assert!(reply.get("command").is_none());
    assert_eq!(reply["session"]["cursor"], 0);

    let resp = ctx
        .post("/api/discover/gesture", &json!({ "phase": "move" }))
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Settling
// =============================================================================

#[tokio::test]
async fn test_decision_settles_after_delay() {
    let ctx = TestContext::with_settle_delay(Duration::from_millis(40)).await;
    ctx.login_customer(EMMA_EMAIL).await;

    let reply = command(&ctx, "like").await;
    assert_eq!(reply["session"]["settling"], true);
    assert_eq!(reply["session"]["pending_direction"], "right");
    assert_eq!(reply["session"]["liked"], 0);

    let reply = command(&ctx, "dislike").await;
    assert_eq!(reply["outcome"]["reason"], "settling");

    tokio::time::sleep(Duration::from_millis(200)).await;

    let reply: Value = expect_json(ctx.get("/api/discover").await, StatusCode::OK).await;
    assert_eq!(reply["session"]["settling"], false);
    assert_eq!(reply["session"]["liked"], 1);
    assert_eq!(current_id(&reply), Some("prod-002"));
}

#[tokio::test]
async fn test_logout_cancels_pending_decision() {
    let ctx = TestContext::with_settle_delay(Duration::from_millis(100)).await;
    ctx.login_customer(EMMA_EMAIL).await;
    command(&ctx, "like").await;

    let resp = ctx.post("/auth/logout", &json!({})).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    tokio::time::sleep(Duration::from_millis(250)).await;

    // A new sign-in starts from nothing.
    ctx.login_customer(EMMA_EMAIL).await;
    let favorites: Value = expect_json(ctx.get("/api/favorites").await, StatusCode::OK).await;
    assert!(ids(&favorites["liked"]).is_empty());
    let reply: Value = expect_json(ctx.get("/api/discover").await, StatusCode::OK).await;
    assert_eq!(reply["session"]["cursor"], 0);
}

// =============================================================================
// Closing and favorites
// =============================================================================

#[tokio::test]
async fn test_close_keeps_decisions_and_reopen_skips_them() {
    let ctx = TestContext::new().await;
    ctx.login_customer(EMMA_EMAIL).await;
    command(&ctx, "like").await;
    command(&ctx, "dislike").await;

    let closed: Value = expect_json(ctx.delete("/api/discover").await, StatusCode::OK).await;
    assert_eq!(closed["closed"], true);
    let closed: Value = expect_json(ctx.delete("/api/discover").await, StatusCode::OK).await;
    assert_eq!(closed["closed"], false);

    let favorites: Value = expect_json(ctx.get("/api/favorites").await, StatusCode::OK).await;
    assert_eq!(ids(&favorites["liked"]), ["prod-001"]);
    assert_eq!(ids(&favorites["disliked"]), ["prod-002"]);

    let reply: Value = expect_json(ctx.get("/api/discover").await, StatusCode::OK).await;
    assert_eq!(reply["session"]["total"], 8);
    assert_eq!(current_id(&reply), Some("prod-003"));
}

#[tokio::test]
async fn test_exhausting_and_restarting() {
    let ctx = TestContext::new().await;
    ctx.login_customer(EMMA_EMAIL).await;

    let mut reply = Value::Null;
    for _ in 0..10 {
        reply = command(&ctx, "dislike").await;
    }
    assert_eq!(reply["session"]["state"], "exhausted");
    assert!(reply["session"]["current"].is_null());
    assert_eq!(reply["events"].as_array().unwrap().last().unwrap()["type"], "exhausted");

    let reply = command(&ctx, "next").await;
    assert_eq!(reply["outcome"]["reason"], "empty_session");

    let reply = command(&ctx, "restart").await;
    assert_eq!(reply["session"]["state"], "browsing");
    assert_eq!(reply["session"]["cursor"], 0);
    assert_eq!(reply["session"]["disliked"], 10);
}

#[tokio::test]
async fn test_shoppers_do_not_share_sessions() {
    let ctx = TestContext::new().await;
    ctx.login_customer(EMMA_EMAIL).await;
    command(&ctx, "like").await;

    let other = TestContext::client();
    let resp = other
        .post(ctx.url("/auth/customer/login"))
        .json(&json!({ "identifier": "james.chen@example.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let reply: Value = other
        .get(ctx.url("/api/discover"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(reply["session"]["cursor"], 0);
    assert_eq!(reply["session"]["liked"], 0);
}
