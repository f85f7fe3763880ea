//! In-memory adapter implementations.
//!
//! Back the repository ports with `RwLock`-guarded maps. Used by tests and
//! local development without a database.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, ShelterId, SubscriptionId, UserId};
use crate::domain::shelter::Shelter;
use crate::domain::subscription::Subscription;
use crate::domain::user::User;
use crate::ports::{
    SaveResult, ShelterRepository, SubscriptionRepository, UserRepository, WebhookEventRecord,
    WebhookEventRepository,
};

/// In-memory implementation of [`UserRepository`].
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<UserId, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn save(&self, user: &User) -> Result<(), DomainError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(DomainError::new(ErrorCode::EmailTaken, "Email is already in use"));
        }
        if users.values().any(|u| u.username == user.username) {
            return Err(DomainError::new(
                ErrorCode::UsernameTaken,
                "Username is already in use",
            ));
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), DomainError> {
        let mut users = self.users.write().await;
        if !users.contains_key(&user.id) {
            return Err(DomainError::new(ErrorCode::UserNotFound, "User not found"));
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }
}

/// In-memory implementation of [`ShelterRepository`].
#[derive(Default)]
pub struct InMemoryShelterRepository {
    shelters: Arc<RwLock<HashMap<ShelterId, Shelter>>>,
}

impl InMemoryShelterRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ShelterRepository for InMemoryShelterRepository {
    async fn save(&self, shelter: &Shelter) -> Result<(), DomainError> {
        self.shelters.write().await.insert(shelter.id, shelter.clone());
        Ok(())
    }

    async fn update(&self, shelter: &Shelter) -> Result<(), DomainError> {
        let mut shelters = self.shelters.write().await;
        if !shelters.contains_key(&shelter.id) {
            return Err(DomainError::new(ErrorCode::ShelterNotFound, "Shelter not found"));
        }
        shelters.insert(shelter.id, shelter.clone());
        Ok(())
    }

    async fn delete(&self, id: &ShelterId) -> Result<(), DomainError> {
        let mut shelters = self.shelters.write().await;
        if shelters.remove(id).is_none() {
            return Err(DomainError::new(ErrorCode::ShelterNotFound, "Shelter not found"));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &ShelterId) -> Result<Option<Shelter>, DomainError> {
        Ok(self.shelters.read().await.get(id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Shelter>, DomainError> {
        Ok(self.shelters.read().await.values().cloned().collect())
    }
}

/// In-memory implementation of [`SubscriptionRepository`].
///
/// Mirrors the Postgres adapter's compare-and-swap semantics: `update`
/// fails with `StaleVersion` unless the caller's version matches, and
/// bumps the stored version on success.
#[derive(Default)]
pub struct InMemorySubscriptionRepository {
    subscriptions: Arc<RwLock<HashMap<SubscriptionId, Subscription>>>,
}

impl InMemorySubscriptionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubscriptionRepository for InMemorySubscriptionRepository {
    async fn save(&self, subscription: &Subscription) -> Result<(), DomainError> {
        self.subscriptions
            .write()
            .await
            .insert(subscription.id, subscription.clone());
        Ok(())
    }

    async fn update(&self, subscription: &Subscription) -> Result<(), DomainError> {
        let mut subscriptions = self.subscriptions.write().await;
        let stored = subscriptions.get_mut(&subscription.id).ok_or_else(|| {
            DomainError::new(ErrorCode::SubscriptionNotFound, "Subscription not found")
        })?;
        if stored.version != subscription.version {
            return Err(DomainError::new(
                ErrorCode::StaleVersion,
                "Subscription was modified concurrently",
            ));
        }
        let mut updated = subscription.clone();
        updated.version += 1;
        *stored = updated;
        Ok(())
    }

    async fn find_by_id(&self, id: &SubscriptionId) -> Result<Option<Subscription>, DomainError> {
        Ok(self.subscriptions.read().await.get(id).cloned())
    }

    async fn find_all_by_user(&self, user_id: &UserId) -> Result<Vec<Subscription>, DomainError> {
        Ok(self
            .subscriptions
            .read()
            .await
            .values()
            .filter(|s| &s.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_by_stripe_subscription_id(
        &self,
        stripe_subscription_id: &str,
    ) -> Result<Option<Subscription>, DomainError> {
        Ok(self
            .subscriptions
            .read()
            .await
            .values()
            .find(|s| s.stripe_subscription_id.as_deref() == Some(stripe_subscription_id))
            .cloned())
    }

    async fn find_open_by_user_and_shelter(
        &self,
        user_id: &UserId,
        shelter_id: &ShelterId,
    ) -> Result<Option<Subscription>, DomainError> {
        Ok(self
            .subscriptions
            .read()
            .await
            .values()
            .find(|s| &s.user_id == user_id && &s.shelter_id == shelter_id && !s.is_canceled())
            .cloned())
    }
}

/// In-memory implementation of [`WebhookEventRepository`].
///
/// First save of an event id wins; later saves observe `AlreadyExists`.
#[derive(Default)]
pub struct InMemoryWebhookEventRepository {
    records: Arc<RwLock<HashMap<String, WebhookEventRecord>>>,
}

impl InMemoryWebhookEventRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WebhookEventRepository for InMemoryWebhookEventRepository {
    async fn find_by_event_id(
        &self,
        event_id: &str,
    ) -> Result<Option<WebhookEventRecord>, DomainError> {
        Ok(self.records.read().await.get(event_id).cloned())
    }

    async fn save(&self, record: WebhookEventRecord) -> Result<SaveResult, DomainError> {
        let mut records = self.records.write().await;
        if records.contains_key(&record.event_id) {
            Ok(SaveResult::AlreadyExists)
        } else {
            records.insert(record.event_id.clone(), record);
            Ok(SaveResult::Inserted)
        }
    }
}
