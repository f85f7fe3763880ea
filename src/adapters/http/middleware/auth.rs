//! Authentication middleware and extractors for axum.
//!
//! The middleware validates Bearer tokens through the `TokenIssuer` port
//! and injects `AuthenticatedUser` into request extensions. Handlers that
//! require authentication use the `RequireAuth` extractor; routes without
//! it (webhooks, registration) pass through untouched.
//!
//! ```text
//! Request -> auth_middleware -> injects AuthenticatedUser into extensions
//!                                      |
//!                              Handler -> RequireAuth reads from extensions
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::ErrorResponse;
use crate::domain::foundation::{AuthError, AuthenticatedUser};
use crate::ports::TokenIssuer;

/// Auth middleware state - the token issuer used for validation.
pub type AuthState = Arc<dyn TokenIssuer>;

/// Validates Bearer tokens and injects the authenticated user.
///
/// 1. Extracts the Bearer token from the Authorization header
/// 2. Validates it through the `TokenIssuer` port
/// 3. On success, injects `AuthenticatedUser` into request extensions
/// 4. On missing token, continues without injecting
/// 5. On invalid token, returns 401 Unauthorized
pub async fn auth_middleware(
    State(tokens): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    match token {
        Some(token) => match tokens.validate(token) {
            Ok(user) => {
                request.extensions_mut().insert(user);
                next.run(request).await
            }
            Err(e) => {
                let message = match &e {
                    AuthError::TokenExpired => "Token expired",
                    _ => "Invalid token",
                };
                (
                    StatusCode::UNAUTHORIZED,
                    Json(ErrorResponse::new("AUTH_ERROR", message)),
                )
                    .into_response()
            }
        },
        None => {
            // No token provided - handlers enforce auth via RequireAuth.
            next.run(request).await
        }
    }
}

/// Extractor that requires authentication.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub AuthenticatedUser);

impl<S> axum::extract::FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            parts
                .extensions
                .get::<AuthenticatedUser>()
                .cloned()
                .map(RequireAuth)
                .ok_or(AuthRejection::Unauthenticated)
        })
    }
}

/// Rejection type for authentication failures.
#[derive(Debug, Clone)]
pub enum AuthRejection {
    Unauthenticated,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new("UNAUTHENTICATED", "Authentication required")),
        )
            .into_response()
    }
}
