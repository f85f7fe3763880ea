//! LoginHandler - verifies credentials and issues a token.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::{PasswordHasher, TokenIssuer, UserRepository};

use super::AuthPayload;

/// Command to log in with username and password.
#[derive(Debug, Clone)]
pub struct LoginCommand {
    pub username: String,
    pub password: String,
}

/// Handler for login.
pub struct LoginHandler {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenIssuer>,
}

impl LoginHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    pub async fn handle(&self, cmd: LoginCommand) -> Result<AuthPayload, DomainError> {
        let user = self
            .users
            .find_by_username(&cmd.username)
            .await?
            .ok_or_else(|| DomainError::new(ErrorCode::UserNotFound, "User does not exist"))?;

        if !self.hasher.verify(&cmd.password, &user.password_hash)? {
            return Err(DomainError::new(ErrorCode::Unauthorized, "Invalid credentials"));
        }

        let token = self
            .tokens
            .issue(&user)
            .map_err(|e| DomainError::new(ErrorCode::InternalError, e.to_string()))?;

        Ok(AuthPayload { token, user })
    }
}
