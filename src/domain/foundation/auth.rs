//! Authenticated user context and authentication errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Role, UserId};

/// The identity carried by a validated bearer token.
///
/// Injected into request extensions by the auth middleware and read by
/// the `RequireAuth` extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// The user's id.
    pub user_id: UserId,

    /// The user's login name.
    pub username: String,

    /// Roles encoded in the token.
    pub roles: Vec<Role>,
}

impl AuthenticatedUser {
    pub fn new(user_id: UserId, username: impl Into<String>, roles: Vec<Role>) -> Self {
        Self {
            user_id,
            username: username.into(),
            roles,
        }
    }
}

/// Errors from token issuing and validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Token issuing failed: {0}")]
    IssueFailed(String),
}
