//! HTTP handlers for subscription and webhook endpoints.

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::{AppState, ErrorResponse};
use crate::application::subscription::{
    HandleWebhookCommand, ListSubscriptionsQuery, SubscribeCommand, UnsubscribeCommand,
};
use crate::domain::foundation::SubscriptionId;
use crate::domain::subscription::{Subscription, SubscriptionError};
use crate::ports::{ShelterRepository as _, UserRepository as _};

use super::dto::{ShelterSummary, SubscribeRequest, SubscriptionResponse, UserSummary};

/// POST /api/subscriptions - subscribe the caller to a shelter.
pub async fn subscribe(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    headers: axum::http::HeaderMap,
    Json(request): Json<SubscribeRequest>,
) -> Result<impl IntoResponse, SubscriptionApiError> {
    let request_nonce = headers
        .get("Idempotency-Key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let result = state
        .subscribe_handler()
        .handle(SubscribeCommand {
            user_id: user.user_id,
            shelter_id: request.shelter_id,
            tier: request.tier,
            payment_method_id: request.payment_method_id,
            request_nonce,
        })
        .await?;

    let response = to_response(&state, &result.subscription, result.client_secret).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/subscriptions - list the caller's subscriptions.
pub async fn list_subscriptions(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, SubscriptionApiError> {
    let subscriptions = state
        .list_subscriptions_handler()
        .handle(ListSubscriptionsQuery {
            user_id: user.user_id,
        })
        .await?;

    let mut response = Vec::with_capacity(subscriptions.len());
    for subscription in &subscriptions {
        response.push(to_response(&state, subscription, None).await?);
    }
    Ok(Json(response))
}

/// DELETE /api/subscriptions/:id - cancel the caller's subscription.
pub async fn unsubscribe(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(subscription_id): Path<SubscriptionId>,
) -> Result<impl IntoResponse, SubscriptionApiError> {
    state
        .unsubscribe_handler()
        .handle(UnsubscribeCommand {
            user_id: user.user_id,
            subscription_id,
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/webhooks/stripe - billing event ingress.
///
/// Signature verification failures are client errors; everything after a
/// verified signature is acknowledged with 200 "Received" so the provider
/// does not redeliver.
pub async fn handle_stripe_webhook(
    State(state): State<AppState>,
    headers: axum::http::HeaderMap,
    body: axum::body::Bytes,
) -> impl IntoResponse {
    let Some(signature) = headers
        .get("Stripe-Signature")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
    else {
        return (StatusCode::BAD_REQUEST, "Missing Stripe-Signature header").into_response();
    };

    let result = state
        .webhook_handler()
        .handle(HandleWebhookCommand {
            payload: body.to_vec(),
            signature,
        })
        .await;

    match result {
        Ok(_) => (StatusCode::OK, "Received").into_response(),
        Err(SubscriptionError::InvalidSignature(_)) => (
            StatusCode::BAD_REQUEST,
            "Webhook signature verification failed",
        )
            .into_response(),
        Err(SubscriptionError::ValidationFailed { .. }) => {
            (StatusCode::BAD_REQUEST, "Malformed webhook payload").into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Webhook processing failed before dispatch");
            (StatusCode::OK, "Received").into_response()
        }
    }
}

/// Assemble the response DTO, embedding user and shelter summaries.
async fn to_response(
    state: &AppState,
    subscription: &Subscription,
    client_secret: Option<String>,
) -> Result<SubscriptionResponse, SubscriptionApiError> {
    let user = state
        .users
        .find_by_id(&subscription.user_id)
        .await
        .map_err(SubscriptionError::from)?
        .map(|u| UserSummary {
            id: u.id,
            name: u.name,
            username: u.username,
        })
        .ok_or_else(|| SubscriptionError::not_found("User"))?;

    let shelter = state
        .shelters
        .find_by_id(&subscription.shelter_id)
        .await
        .map_err(SubscriptionError::from)?
        .map(|s| ShelterSummary {
            id: s.id,
            name: s.name,
        })
        .ok_or_else(|| SubscriptionError::not_found("Shelter"))?;

    Ok(SubscriptionResponse::new(
        subscription,
        user,
        shelter,
        client_secret,
    ))
}

/// API error type mapping subscription errors to HTTP responses.
pub struct SubscriptionApiError(SubscriptionError);

impl From<SubscriptionError> for SubscriptionApiError {
    fn from(err: SubscriptionError) -> Self {
        Self(err)
    }
}

impl IntoResponse for SubscriptionApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self.0 {
            SubscriptionError::NotFound(_) => StatusCode::NOT_FOUND,
            SubscriptionError::Forbidden(_) => StatusCode::FORBIDDEN,
            SubscriptionError::Conflict(_) | SubscriptionError::TerminalState(_) => {
                StatusCode::CONFLICT
            }
            SubscriptionError::ConfigurationError { .. }
            | SubscriptionError::InvalidSignature(_)
            | SubscriptionError::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
            SubscriptionError::Billing { .. } => StatusCode::BAD_GATEWAY,
            SubscriptionError::Infrastructure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = ErrorResponse::new(self.0.code().to_string(), self.0.message());
        (status, Json(body)).into_response()
    }
}
