//! Subscription repository port.
//!
//! Updates are guarded by optimistic concurrency: the aggregate carries a
//! version counter and `update` only succeeds when the stored version
//! matches. Webhook appliers and user-initiated cancellation race on the
//! same row; the loser of a race re-reads and retries.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ShelterId, SubscriptionId, UserId};
use crate::domain::subscription::Subscription;

/// Persistence port for the Subscription aggregate.
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Persist a new subscription at version 0.
    async fn save(&self, subscription: &Subscription) -> Result<(), DomainError>;

    /// Update an existing subscription, compare-and-swap on its version.
    ///
    /// Fails with `StaleVersion` if the stored version no longer matches
    /// `subscription.version`; the stored version is bumped on success.
    async fn update(&self, subscription: &Subscription) -> Result<(), DomainError>;

    /// Find a subscription by local id.
    async fn find_by_id(&self, id: &SubscriptionId) -> Result<Option<Subscription>, DomainError>;

    /// All subscriptions owned by a user, any status. Order is not defined.
    async fn find_all_by_user(&self, user_id: &UserId) -> Result<Vec<Subscription>, DomainError>;

    /// Find a subscription by its remote (Stripe) subscription id.
    async fn find_by_stripe_subscription_id(
        &self,
        stripe_subscription_id: &str,
    ) -> Result<Option<Subscription>, DomainError>;

    /// Find a user's non-terminal subscription to a shelter, if any.
    ///
    /// Backs the one-active-subscription-per-shelter invariant.
    async fn find_open_by_user_and_shelter(
        &self,
        user_id: &UserId,
        shelter_id: &ShelterId,
    ) -> Result<Option<Subscription>, DomainError>;
}
