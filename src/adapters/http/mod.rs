//! HTTP adapter - axum routes, handlers, and DTOs.

pub mod auth;
pub mod middleware;
pub mod shelter;
pub mod subscription;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::application::auth::{
    CurrentUserHandler, LoginHandler, RegisterHandler, UpdateProfileHandler,
};
use crate::application::shelter::{
    CreateShelterHandler, DeleteShelterHandler, GetShelterHandler, ListSheltersHandler,
    UpdateShelterHandler,
};
use crate::application::subscription::{
    HandleWebhookHandler, ListSubscriptionsHandler, SubscribeHandler, UnsubscribeHandler,
};
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::subscription::StripeWebhookVerifier;
use crate::ports::{
    BillingGateway, PasswordHasher, ShelterRepository, SubscriptionRepository, TokenIssuer,
    UserRepository, WebhookEventRepository,
};

/// Shared application state, cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub shelters: Arc<dyn ShelterRepository>,
    pub subscriptions: Arc<dyn SubscriptionRepository>,
    pub webhook_events: Arc<dyn WebhookEventRepository>,
    pub gateway: Arc<dyn BillingGateway>,
    pub hasher: Arc<dyn PasswordHasher>,
    pub tokens: Arc<dyn TokenIssuer>,
    pub webhook_secret: String,
}

impl AppState {
    pub fn register_handler(&self) -> RegisterHandler {
        RegisterHandler::new(self.users.clone(), self.hasher.clone(), self.tokens.clone())
    }

    pub fn login_handler(&self) -> LoginHandler {
        LoginHandler::new(self.users.clone(), self.hasher.clone(), self.tokens.clone())
    }

    pub fn current_user_handler(&self) -> CurrentUserHandler {
        CurrentUserHandler::new(self.users.clone())
    }

    pub fn update_profile_handler(&self) -> UpdateProfileHandler {
        UpdateProfileHandler::new(self.users.clone())
    }

    pub fn create_shelter_handler(&self) -> CreateShelterHandler {
        CreateShelterHandler::new(self.shelters.clone())
    }

    pub fn update_shelter_handler(&self) -> UpdateShelterHandler {
        UpdateShelterHandler::new(self.shelters.clone())
    }

    pub fn delete_shelter_handler(&self) -> DeleteShelterHandler {
        DeleteShelterHandler::new(self.shelters.clone())
    }

    pub fn get_shelter_handler(&self) -> GetShelterHandler {
        GetShelterHandler::new(self.shelters.clone())
    }

    pub fn list_shelters_handler(&self) -> ListSheltersHandler {
        ListSheltersHandler::new(self.shelters.clone())
    }

    pub fn subscribe_handler(&self) -> SubscribeHandler {
        SubscribeHandler::new(
            self.users.clone(),
            self.shelters.clone(),
            self.subscriptions.clone(),
            self.gateway.clone(),
        )
    }

    pub fn list_subscriptions_handler(&self) -> ListSubscriptionsHandler {
        ListSubscriptionsHandler::new(self.subscriptions.clone())
    }

    pub fn unsubscribe_handler(&self) -> UnsubscribeHandler {
        UnsubscribeHandler::new(self.subscriptions.clone(), self.gateway.clone())
    }

    pub fn webhook_handler(&self) -> HandleWebhookHandler {
        HandleWebhookHandler::new(
            StripeWebhookVerifier::new(self.webhook_secret.clone()),
            self.subscriptions.clone(),
            self.shelters.clone(),
            self.gateway.clone(),
            self.webhook_events.clone(),
        )
    }
}

/// Build the complete API router.
///
/// The auth middleware runs on every route; individual handlers opt into
/// enforcement with the `RequireAuth` extractor. Webhook routes never
/// require a bearer token - they are verified by signature instead.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/auth", auth::routes())
        .nest("/api/shelters", shelter::routes())
        .nest("/api/subscriptions", subscription::routes())
        .nest("/api/webhooks", subscription::webhook_routes())
        .layer(axum::middleware::from_fn_with_state(
            state.tokens.clone(),
            middleware::auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// JSON error body shared by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}

/// API error wrapper converting domain errors to HTTP responses.
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.0.code {
            ErrorCode::UserNotFound
            | ErrorCode::ShelterNotFound
            | ErrorCode::SubscriptionNotFound => StatusCode::NOT_FOUND,
            ErrorCode::EmailTaken
            | ErrorCode::UsernameTaken
            | ErrorCode::SubscriptionExists
            | ErrorCode::StaleVersion
            | ErrorCode::InvalidStateTransition
            | ErrorCode::TerminalState => StatusCode::CONFLICT,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::ValidationFailed
            | ErrorCode::EmptyField
            | ErrorCode::InvalidFormat
            | ErrorCode::ConfigurationError
            | ErrorCode::InvalidWebhookSignature => StatusCode::BAD_REQUEST,
            ErrorCode::BillingError => StatusCode::BAD_GATEWAY,
            ErrorCode::DatabaseError | ErrorCode::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = ErrorResponse::new(self.0.code.to_string(), self.0.message.clone());
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_maps_not_found_to_404() {
        let err = ApiError(DomainError::new(ErrorCode::ShelterNotFound, "Shelter not found"));
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn api_error_maps_conflict_codes_to_409() {
        for code in [
            ErrorCode::EmailTaken,
            ErrorCode::UsernameTaken,
            ErrorCode::SubscriptionExists,
        ] {
            let err = ApiError(DomainError::new(code, "conflict"));
            assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
        }
    }

    #[test]
    fn api_error_maps_forbidden_to_403() {
        let err = ApiError(DomainError::new(ErrorCode::Forbidden, "no"));
        assert_eq!(err.into_response().status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn api_error_maps_billing_to_502() {
        let err = ApiError(DomainError::new(ErrorCode::BillingError, "remote down"));
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }
}
