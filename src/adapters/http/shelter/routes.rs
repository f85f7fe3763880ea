//! Router for shelter endpoints.
//!
//! # Routes
//!
//! - `GET /` - list shelters (public)
//! - `POST /` - create a shelter (authenticated)
//! - `GET /:id` - fetch a shelter (public)
//! - `PUT /:id` - update a shelter (owner or admin)
//! - `DELETE /:id` - delete a shelter (owner or admin)

use axum::{routing::get, Router};

use crate::adapters::http::AppState;

use super::handlers::{create_shelter, delete_shelter, get_shelter, list_shelters, update_shelter};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_shelters).post(create_shelter))
        .route(
            "/:id",
            get(get_shelter).put(update_shelter).delete(delete_shelter),
        )
}
