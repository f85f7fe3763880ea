//! End-to-end subscription lifecycle over the HTTP surface.
//!
//! Drives the full router with in-memory adapters and the mock billing
//! gateway: register -> create shelter -> subscribe -> webhook events ->
//! unsubscribe, plus the webhook boundary contract.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use hmac::{Hmac, Mac};
use serde_json::{json, Value};
use sha2::Sha256;
use tower::ServiceExt;

use fanimal::adapters::auth::{Argon2PasswordHasher, JwtTokenIssuer};
use fanimal::adapters::http::{api_router, AppState};
use fanimal::adapters::memory::{
    InMemoryShelterRepository, InMemorySubscriptionRepository, InMemoryUserRepository,
    InMemoryWebhookEventRepository,
};
use fanimal::adapters::stripe::MockBillingGateway;
use fanimal::ports::{RemoteSubscription, SubscriptionRepository};

const WEBHOOK_SECRET: &str = "whsec_lifecycle_test";

// 2024-01-01 and 2024-02-01, 00:00 UTC
const PERIOD_START: i64 = 1_704_067_200;
const PERIOD_END: i64 = 1_706_745_600;

struct TestApp {
    router: Router,
    subscriptions: Arc<InMemorySubscriptionRepository>,
    gateway: Arc<MockBillingGateway>,
}

fn test_app() -> TestApp {
    let subscriptions = Arc::new(InMemorySubscriptionRepository::new());
    let gateway = Arc::new(MockBillingGateway::new());

    let state = AppState {
        users: Arc::new(InMemoryUserRepository::new()),
        shelters: Arc::new(InMemoryShelterRepository::new()),
        subscriptions: subscriptions.clone(),
        webhook_events: Arc::new(InMemoryWebhookEventRepository::new()),
        gateway: gateway.clone(),
        hasher: Arc::new(Argon2PasswordHasher::new()),
        tokens: Arc::new(JwtTokenIssuer::new("integration-test-jwt-secret", 3600)),
        webhook_secret: WEBHOOK_SECRET.to_string(),
    };

    TestApp {
        router: api_router(state),
        subscriptions,
        gateway,
    }
}

fn sign(secret: &str, payload: &str) -> String {
    let timestamp = chrono::Utc::now().timestamp();
    let signed_payload = format!("{}.{}", timestamp, payload);
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(signed_payload.as_bytes());
    format!("t={},v1={}", timestamp, hex::encode(mac.finalize().into_bytes()))
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn webhook_request(payload: &str, signature: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/webhooks/stripe")
        .header("Stripe-Signature", signature)
        .body(Body::from(payload.to_string()))
        .unwrap()
}

async fn register(router: &Router, email: &str, username: &str) -> String {
    let (status, body) = send(
        router,
        json_request(
            "POST",
            "/api/auth/register",
            None,
            json!({
                "name": "Test User",
                "email": email,
                "username": username,
                "password": "hunter2!"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["token"].as_str().unwrap().to_string()
}

async fn create_shelter(router: &Router, token: &str) -> String {
    let (status, body) = send(
        router,
        json_request(
            "POST",
            "/api/shelters",
            Some(token),
            json!({
                "name": "Paws Haven",
                "description": "Small dog rescue",
                "address": "12 Bark St",
                "priceBasic": "pb1",
                "priceStandard": "ps1",
                "pricePremium": "pp1"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

async fn subscribe(router: &Router, token: &str, shelter_id: &str) -> Value {
    let (status, body) = send(
        router,
        json_request(
            "POST",
            "/api/subscriptions",
            Some(token),
            json!({
                "shelterId": shelter_id,
                "tier": "basic",
                "paymentMethodId": "pm_card_visa"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "subscribe failed: {}", body);
    body
}

#[tokio::test]
async fn full_lifecycle_subscribe_pay_unsubscribe() {
    let app = test_app();
    let token = register(&app.router, "dana@example.com", "dana").await;
    let shelter_id = create_shelter(&app.router, &token).await;

    // Subscribe: local record pending payment, client secret surfaced
    let created = subscribe(&app.router, &token, &shelter_id).await;
    assert_eq!(created["status"], "incomplete");
    assert_eq!(created["tier"], "basic");
    assert_eq!(created["amountCents"], 999);
    assert_eq!(created["clientSecret"], "pi_mock_secret");
    assert_eq!(created["shelter"]["name"], "Paws Haven");
    let subscription_id = created["id"].as_str().unwrap().to_string();

    // Payment confirms remotely; the provider now reports active
    assert_eq!(app.gateway.created_subscriptions()[0].price_id, "pb1");
    let stored = app
        .subscriptions
        .find_by_id(&subscription_id.parse().unwrap())
        .await
        .unwrap()
        .unwrap();
    let stripe_subscription_id = stored.stripe_subscription_id.clone().unwrap();
    app.gateway.set_remote_subscription(RemoteSubscription {
        id: stripe_subscription_id.clone(),
        customer_id: "cus_mock_1".to_string(),
        status: "active".to_string(),
        current_period_start: PERIOD_START,
        current_period_end: PERIOD_END,
        price_id: Some("pb1".to_string()),
        client_secret: None,
    });

    // invoice.paid refreshes status and period
    let payload = json!({
        "id": "evt_paid_1",
        "type": "invoice.paid",
        "created": PERIOD_START,
        "data": { "object": { "id": "in_1", "subscription": stripe_subscription_id } },
        "livemode": false
    })
    .to_string();
    let response = app
        .router
        .clone()
        .oneshot(webhook_request(&payload, &sign(WEBHOOK_SECRET, &payload)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (status, list) = send(
        &app.router,
        json_request("GET", "/api/subscriptions", Some(&token), Value::Null),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list[0]["status"], "active");
    assert_eq!(list[0]["startDate"], "2024-01-01");
    assert_eq!(list[0]["endDate"], "2024-02-01");

    // Unsubscribe: remote cancel first, then local Canceled
    let (status, _) = send(
        &app.router,
        json_request(
            "DELETE",
            &format!("/api/subscriptions/{}", subscription_id),
            Some(&token),
            Value::Null,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(
        app.gateway.canceled_subscriptions(),
        vec![stripe_subscription_id]
    );

    let (_, list) = send(
        &app.router,
        json_request("GET", "/api/subscriptions", Some(&token), Value::Null),
    )
    .await;
    assert_eq!(list[0]["status"], "canceled");
}

#[tokio::test]
async fn unsubscribe_by_non_owner_is_forbidden() {
    let app = test_app();
    let owner_token = register(&app.router, "owner@example.com", "owner").await;
    let shelter_id = create_shelter(&app.router, &owner_token).await;
    let created = subscribe(&app.router, &owner_token, &shelter_id).await;
    let subscription_id = created["id"].as_str().unwrap();

    let other_token = register(&app.router, "other@example.com", "other").await;
    let (status, _) = send(
        &app.router,
        json_request(
            "DELETE",
            &format!("/api/subscriptions/{}", subscription_id),
            Some(&other_token),
            Value::Null,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    // Record unchanged
    let (_, list) = send(
        &app.router,
        json_request("GET", "/api/subscriptions", Some(&owner_token), Value::Null),
    )
    .await;
    assert_eq!(list[0]["status"], "incomplete");
}

#[tokio::test]
async fn subscribe_without_price_mapping_is_rejected() {
    let app = test_app();
    let token = register(&app.router, "dana@example.com", "dana").await;

    // Shelter with no premium price configured
    let (_, shelter) = send(
        &app.router,
        json_request(
            "POST",
            "/api/shelters",
            Some(&token),
            json!({
                "name": "No Premium",
                "description": "d",
                "address": "a",
                "priceBasic": "pb1"
            }),
        ),
    )
    .await;

    let (status, body) = send(
        &app.router,
        json_request(
            "POST",
            "/api/subscriptions",
            Some(&token),
            json!({
                "shelterId": shelter["id"],
                "tier": "premium",
                "paymentMethodId": "pm_card"
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "CONFIGURATION_ERROR");
    assert!(app.gateway.created_subscriptions().is_empty());
}

#[tokio::test]
async fn webhook_with_invalid_signature_is_rejected() {
    let app = test_app();
    let payload = json!({
        "id": "evt_forged",
        "type": "invoice.paid",
        "created": PERIOD_START,
        "data": { "object": { "id": "in_1", "subscription": "sub_x" } },
        "livemode": false
    })
    .to_string();

    let response = app
        .router
        .clone()
        .oneshot(webhook_request(&payload, &sign("whsec_wrong", &payload)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn webhook_without_signature_header_is_rejected() {
    let app = test_app();
    let request = Request::builder()
        .method("POST")
        .uri("/api/webhooks/stripe")
        .body(Body::from("{}"))
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn webhook_for_unknown_subscription_still_acknowledges() {
    let app = test_app();
    let payload = json!({
        "id": "evt_unknown",
        "type": "invoice.paid",
        "created": PERIOD_START,
        "data": { "object": { "id": "in_1", "subscription": "sub_nobody" } },
        "livemode": false
    })
    .to_string();

    let response = app
        .router
        .clone()
        .oneshot(webhook_request(&payload, &sign(WEBHOOK_SECRET, &payload)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn unauthenticated_subscription_calls_are_rejected() {
    let app = test_app();
    let (status, _) = send(
        &app.router,
        json_request("GET", "/api/subscriptions", None, Value::Null),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
