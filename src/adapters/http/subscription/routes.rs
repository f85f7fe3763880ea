//! Routers for subscription and webhook endpoints.
//!
//! Webhook routes are separate from the subscription routes because they
//! carry no bearer token; deliveries are authenticated by signature.
//!
//! # Routes
//!
//! - `POST /api/subscriptions` - subscribe to a shelter
//! - `GET /api/subscriptions` - list the caller's subscriptions
//! - `DELETE /api/subscriptions/:id` - cancel a subscription
//! - `POST /api/webhooks/stripe` - billing event ingress

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::adapters::http::AppState;

use super::handlers::{handle_stripe_webhook, list_subscriptions, subscribe, unsubscribe};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_subscriptions).post(subscribe))
        .route("/:id", delete(unsubscribe))
}

pub fn webhook_routes() -> Router<AppState> {
    Router::new().route("/stripe", post(handle_stripe_webhook))
}
