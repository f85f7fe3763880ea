//! Router for auth endpoints.
//!
//! # Routes
//!
//! - `POST /register` - create an account
//! - `POST /login` - exchange credentials for a token
//! - `GET /verify` - return the authenticated user
//! - `PUT /me` - update the authenticated user's profile
//! - `POST /logout` - acknowledged no-op (stateless tokens)

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::adapters::http::AppState;

use super::handlers::{login, logout, register, update_profile, verify};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/verify", get(verify))
        .route("/me", put(update_profile))
        .route("/logout", post(logout))
}
