//! Sign-in and associate dashboard tests.

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use serde_json::{Value, json};

use style_mingle_integration_tests::{EMMA_EMAIL, SOPHIA_EMAIL, TestContext, expect_json};

// =============================================================================
// Health and sign-in
// =============================================================================

#[tokio::test]
async fn test_health() {
    let ctx = TestContext::new().await;
    let resp = ctx.get("/health").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let ctx = TestContext::new().await;
    let resp = ctx
        .client
        .get(ctx.url("/health"))
        .header("x-request-id", "trace-me-123")
        .send()
        .await
        .unwrap();
    assert_eq!(
        resp.headers().get("x-request-id").unwrap().to_str().unwrap(),
        "trace-me-123"
    );
}

#[tokio::test]
async fn test_customer_login_by_phone() {
    let ctx = TestContext::new().await;
    let me = ctx.login_customer("555-123-4567").await;
    assert_eq!(me["role"], "customer");
    assert_eq!(me["id"], "cust-001");
    assert_eq!(me["name"], "Emma Wilson");
    assert_eq!(me["loyaltyPoints"], 2450);

    let resp = ctx.get("/auth/me").await;
    let me: Value = expect_json(resp, StatusCode::OK).await;
    assert_eq!(me["id"], "cust-001");
}

#[tokio::test]
async fn test_associate_login_is_case_insensitive() {
    let ctx = TestContext::new().await;
    let me = ctx.login_associate("Sophia.Lee@RetailCo.com").await;
    assert_eq!(me["role"], "sales_associate");
    assert_eq!(me["id"], "sa-001");
    assert!(me.get("loyaltyPoints").is_none());
}

#[tokio::test]
async fn test_unknown_login_is_unauthorized() {
    let ctx = TestContext::new().await;
    let resp = ctx
        .post("/auth/customer/login", &json!({ "identifier": "nobody@example.com" }))
        .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = ctx
        .post("/auth/associate/login", &json!({ "email": EMMA_EMAIL }))
        .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_blank_login_is_bad_request() {
    let ctx = TestContext::new().await;
    let resp = ctx
        .post("/auth/customer/login", &json!({ "identifier": "   " }))
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_logout_clears_principal() {
    let ctx = TestContext::new().await;
    ctx.login_associate(SOPHIA_EMAIL).await;

    let resp = ctx.post("/auth/logout", &json!({})).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = ctx.get("/auth/me").await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Access control
// =============================================================================

#[tokio::test]
async fn test_dashboard_requires_sign_in() {
    let ctx = TestContext::new().await;
    let resp = ctx.get("/api/customers/active").await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_dashboard_forbids_customers() {
    let ctx = TestContext::new().await;
    ctx.login_customer(EMMA_EMAIL).await;
    let resp = ctx.get("/api/customers/active").await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_shopper_app_forbids_associates() {
    let ctx = TestContext::new().await;
    ctx.login_associate(SOPHIA_EMAIL).await;
    let resp = ctx.get("/api/discover").await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

// =============================================================================
// Dashboard
// =============================================================================

#[tokio::test]
async fn test_active_customers_have_match_cards() {
    let ctx = TestContext::new().await;
    ctx.login_associate(SOPHIA_EMAIL).await;

    let cards: Vec<Value> = expect_json(ctx.get("/api/customers/active").await, StatusCode::OK).await;
    assert_eq!(cards.len(), 2);
    assert_eq!(cards[0]["id"], "cust-001");
    assert_eq!(cards[0]["initials"], "EW");
    assert!(!cards[0]["matches"].as_array().unwrap().is_empty());
    for card in &cards {
        assert!(card["matches"].as_array().unwrap().len() <= 4);
    }

    let cards: Vec<Value> =
        expect_json(ctx.get("/api/customers/active?limit=1").await, StatusCode::OK).await;
    assert_eq!(cards.len(), 1);
}

#[tokio::test]
async fn test_lookup_by_phone_and_email() {
    let ctx = TestContext::new().await;
    ctx.login_associate(SOPHIA_EMAIL).await;

    let by_phone: Value = expect_json(
        ctx.get("/api/customers/lookup?q=(555)%20987-6543").await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(by_phone["id"], "cust-002");
    assert_eq!(by_phone["name"], "James Chen");

    let by_email: Value = expect_json(
        ctx.get("/api/customers/lookup?q=EMMA.WILSON@example.com").await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(by_email["id"], "cust-001");
    assert_eq!(by_email["purchaseHistory"].as_array().unwrap().len(), 2);
    assert!(!by_email["totalSpend"].is_null());
}

#[tokio::test]
async fn test_lookup_misses() {
    let ctx = TestContext::new().await;
    ctx.login_associate(SOPHIA_EMAIL).await;

    let resp = ctx.get("/api/customers/lookup?q=nobody@example.com").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = ctx.get("/api/customers/lookup?q=").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = ctx.get("/api/customers/cust-999").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_recommendations_follow_query() {
    let ctx = TestContext::new().await;
    ctx.login_associate(SOPHIA_EMAIL).await;

    let list: Value = expect_json(
        ctx.get("/api/customers/cust-001/recommendations?ranking=catalog&cap=3").await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(list["ranking"], "catalog_order");
    assert_eq!(list["cap"], 3);
    let ids: Vec<&str> = list["products"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["prod-001", "prod-004", "prod-008"]);

    let list: Value = expect_json(
        ctx.get("/api/customers/cust-002/recommendations?cap=1").await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(list["ranking"], "scored");
    assert!(list["products"].as_array().unwrap().len() <= 1);
}

#[tokio::test]
async fn test_recommendations_reject_bad_input() {
    let ctx = TestContext::new().await;
    ctx.login_associate(SOPHIA_EMAIL).await;

    let resp = ctx
        .get("/api/customers/cust-001/recommendations?ranking=random")
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = ctx.get("/api/customers/cust-404/recommendations").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
