//! RegisterHandler - creates an account and issues the first token.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::domain::user::User;
use crate::ports::{PasswordHasher, TokenIssuer, UserRepository};

use super::AuthPayload;

/// Command to register a new user.
#[derive(Debug, Clone)]
pub struct RegisterCommand {
    pub name: String,
    pub email: String,
    pub username: String,
    pub password: String,
}

/// Handler for registration.
pub struct RegisterHandler {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenIssuer>,
}

impl RegisterHandler {
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

    pub async fn handle(&self, cmd: RegisterCommand) -> Result<AuthPayload, DomainError> {
        if self.users.find_by_email(&cmd.email).await?.is_some() {
            return Err(DomainError::new(ErrorCode::EmailTaken, "Email is already in use"));
        }
        if self.users.find_by_username(&cmd.username).await?.is_some() {
            return Err(DomainError::new(
                ErrorCode::UsernameTaken,
                "Username is already in use",
            ));
        }

        let password_hash = self.hasher.hash(&cmd.password)?;
        let user = User::register(UserId::new(), cmd.name, cmd.email, cmd.username, password_hash)?;
        self.users.save(&user).await?;

        let token = self
            .tokens
            .issue(&user)
            .map_err(|e| DomainError::new(ErrorCode::InternalError, e.to_string()))?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(AuthPayload { token, user })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::{Argon2PasswordHasher, JwtTokenIssuer};
    use crate::adapters::memory::InMemoryUserRepository;

    fn handler(users: Arc<InMemoryUserRepository>) -> RegisterHandler {
        RegisterHandler::new(
            users,
            Arc::new(Argon2PasswordHasher::new()),
            Arc::new(JwtTokenIssuer::new("test-jwt-secret", 3600)),
        )
    }

    fn command(email: &str, username: &str) -> RegisterCommand {
        RegisterCommand {
            name: "Sam".to_string(),
            email: email.to_string(),
            username: username.to_string(),
            password: "hunter2!".to_string(),
        }
    }

    #[tokio::test]
    async fn register_stores_hash_and_issues_token() {
        let users = Arc::new(InMemoryUserRepository::new());
        let payload = handler(users.clone())
            .handle(command("sam@example.com", "sam"))
            .await
            .unwrap();

        assert!(!payload.token.is_empty());
        assert_ne!(payload.user.password_hash, "hunter2!");

        let stored = users.find_by_username("sam").await.unwrap().unwrap();
        assert_eq!(stored.email, "sam@example.com");
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let users = Arc::new(InMemoryUserRepository::new());
        let h = handler(users);

        h.handle(command("sam@example.com", "sam")).await.unwrap();
        let result = h.handle(command("sam@example.com", "sam2")).await;

        assert_eq!(result.unwrap_err().code, ErrorCode::EmailTaken);
    }

    #[tokio::test]
    async fn duplicate_username_conflicts() {
        let users = Arc::new(InMemoryUserRepository::new());
        let h = handler(users);

        h.handle(command("sam@example.com", "sam")).await.unwrap();
        let result = h.handle(command("other@example.com", "sam")).await;

        assert_eq!(result.unwrap_err().code, ErrorCode::UsernameTaken);
    }
}
