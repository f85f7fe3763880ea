//! Current-user profile query and update.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::domain::user::User;
use crate::ports::UserRepository;

/// Query for the authenticated user's profile.
#[derive(Debug, Clone)]
pub struct CurrentUserQuery {
    pub user_id: UserId,
}

/// Handler for the profile query.
pub struct CurrentUserHandler {
    users: Arc<dyn UserRepository>,
}

impl CurrentUserHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn handle(&self, query: CurrentUserQuery) -> Result<User, DomainError> {
        self.users
            .find_by_id(&query.user_id)
            .await?
            .ok_or_else(|| DomainError::new(ErrorCode::UserNotFound, "User not found"))
    }
}

/// Command to update the authenticated user's profile.
#[derive(Debug, Clone)]
pub struct UpdateProfileCommand {
    pub user_id: UserId,
    pub name: Option<String>,
}

/// Handler for profile updates.
pub struct UpdateProfileHandler {
    users: Arc<dyn UserRepository>,
}

impl UpdateProfileHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn handle(&self, cmd: UpdateProfileCommand) -> Result<User, DomainError> {
        let mut user = self
            .users
            .find_by_id(&cmd.user_id)
            .await?
            .ok_or_else(|| DomainError::new(ErrorCode::UserNotFound, "User not found"))?;

        if let Some(name) = cmd.name {
            user.rename(name)?;
        }
        self.users.update(&user).await?;
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryUserRepository;

    async fn seeded() -> (Arc<InMemoryUserRepository>, User) {
        let users = Arc::new(InMemoryUserRepository::new());
        let user = User::register(UserId::new(), "Dana", "dana@example.com", "dana", "hash")
            .unwrap();
        users.save(&user).await.unwrap();
        (users, user)
    }

    #[tokio::test]
    async fn current_user_returns_profile() {
        let (users, user) = seeded().await;
        let found = CurrentUserHandler::new(users)
            .handle(CurrentUserQuery { user_id: user.id })
            .await
            .unwrap();
        assert_eq!(found.username, "dana");
    }

    #[tokio::test]
    async fn update_renames_user() {
        let (users, user) = seeded().await;
        let updated = UpdateProfileHandler::new(users.clone())
            .handle(UpdateProfileCommand {
                user_id: user.id,
                name: Some("Dana K.".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(updated.name, "Dana K.");
        let stored = users.find_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Dana K.");
    }

    #[tokio::test]
    async fn update_without_name_is_a_noop() {
        let (users, user) = seeded().await;
        let updated = UpdateProfileHandler::new(users)
            .handle(UpdateProfileCommand {
                user_id: user.id,
                name: None,
            })
            .await
            .unwrap();
        assert_eq!(updated.name, "Dana");
    }
}
