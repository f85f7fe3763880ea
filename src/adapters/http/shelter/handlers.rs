//! HTTP handlers for shelter endpoints.

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::{ApiError, AppState};
use crate::application::shelter::{
    CreateShelterCommand, DeleteShelterCommand, GetShelterQuery, UpdateShelterCommand,
};
use crate::domain::foundation::ShelterId;

use super::dto::{ShelterRequest, ShelterResponse};

/// GET /api/shelters - list all shelters. Public.
pub async fn list_shelters(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let shelters = state.list_shelters_handler().handle().await?;
    let response: Vec<ShelterResponse> = shelters.into_iter().map(ShelterResponse::from).collect();
    Ok(Json(response))
}

/// GET /api/shelters/:id - fetch one shelter. Public.
pub async fn get_shelter(
    State(state): State<AppState>,
    Path(shelter_id): Path<ShelterId>,
) -> Result<impl IntoResponse, ApiError> {
    let shelter = state
        .get_shelter_handler()
        .handle(GetShelterQuery { shelter_id })
        .await?;
    Ok(Json(ShelterResponse::from(shelter)))
}

/// POST /api/shelters - create a shelter owned by the caller.
pub async fn create_shelter(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<ShelterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let shelter = state
        .create_shelter_handler()
        .handle(CreateShelterCommand {
            owner_id: user.user_id,
            name: request.name,
            description: request.description,
            address: request.address,
            price_basic: request.price_basic,
            price_standard: request.price_standard,
            price_premium: request.price_premium,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ShelterResponse::from(shelter))))
}

/// PUT /api/shelters/:id - update a shelter. Owner or admin.
pub async fn update_shelter(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(shelter_id): Path<ShelterId>,
    Json(request): Json<ShelterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let shelter = state
        .update_shelter_handler()
        .handle(UpdateShelterCommand {
            actor: user,
            shelter_id,
            name: request.name,
            description: request.description,
            address: request.address,
            price_basic: request.price_basic,
            price_standard: request.price_standard,
            price_premium: request.price_premium,
        })
        .await?;

    Ok(Json(ShelterResponse::from(shelter)))
}

/// DELETE /api/shelters/:id - delete a shelter. Owner or admin.
pub async fn delete_shelter(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(shelter_id): Path<ShelterId>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .delete_shelter_handler()
        .handle(DeleteShelterCommand {
            actor: user,
            shelter_id,
        })
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
