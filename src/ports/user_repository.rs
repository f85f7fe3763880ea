//! User repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::user::User;

/// Persistence port for the User aggregate.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user.
    ///
    /// Fails with `EmailTaken` / `UsernameTaken` on unique violations.
    async fn save(&self, user: &User) -> Result<(), DomainError>;

    /// Update an existing user.
    async fn update(&self, user: &User) -> Result<(), DomainError>;

    /// Find a user by id.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Find a user by login name.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;

    /// Find a user by email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;
}
