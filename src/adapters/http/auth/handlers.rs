//! HTTP handlers for auth endpoints.

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::{ApiError, AppState};
use crate::application::auth::{
    CurrentUserQuery, LoginCommand, RegisterCommand, UpdateProfileCommand,
};

use super::dto::{LoginRequest, RegisterRequest, TokenResponse, UpdateProfileRequest, UserResponse};

/// POST /api/auth/register - create an account.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = state
        .register_handler()
        .handle(RegisterCommand {
            name: request.name,
            email: request.email,
            username: request.username,
            password: request.password,
        })
        .await?;

    let response = TokenResponse {
        token: payload.token,
        user: UserResponse::from(payload.user),
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/auth/login - exchange credentials for a token.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = state
        .login_handler()
        .handle(LoginCommand {
            username: request.username,
            password: request.password,
        })
        .await?;

    let response = TokenResponse {
        token: payload.token,
        user: UserResponse::from(payload.user),
    };
    Ok(Json(response))
}

/// GET /api/auth/verify - return the authenticated user's profile.
pub async fn verify(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let profile = state
        .current_user_handler()
        .handle(CurrentUserQuery {
            user_id: user.user_id,
        })
        .await?;

    Ok(Json(UserResponse::from(profile)))
}

/// PUT /api/auth/me - update the authenticated user's profile.
pub async fn update_profile(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let updated = state
        .update_profile_handler()
        .handle(UpdateProfileCommand {
            user_id: user.user_id,
            name: request.name,
        })
        .await?;

    Ok(Json(UserResponse::from(updated)))
}

/// POST /api/auth/logout - stateless tokens; nothing to invalidate.
pub async fn logout() -> impl IntoResponse {
    StatusCode::OK
}
