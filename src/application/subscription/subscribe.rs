//! SubscribeHandler - creates a remote billing subscription and the local
//! ledger record for it.
//!
//! Order of effects matters: every remote call happens before the local
//! record is persisted, so a gateway failure leaves no partial local
//! state behind.

use std::sync::Arc;

use crate::domain::foundation::{ShelterId, SubscriptionId, UserId};
use crate::domain::subscription::{Subscription, SubscriptionError, SubscriptionStatus, Tier};
use crate::domain::user::User;
use crate::ports::{
    BillingGateway, CreateCustomerRequest, CreateSubscriptionRequest, ShelterRepository,
    SubscriptionRepository, UserRepository,
};

/// Command to subscribe the actor to a shelter.
#[derive(Debug, Clone)]
pub struct SubscribeCommand {
    /// Authenticated actor.
    pub user_id: UserId,
    /// Shelter to subscribe to.
    pub shelter_id: ShelterId,
    /// Requested donation tier.
    pub tier: Tier,
    /// Payment method collected client-side (pm_xxx).
    pub payment_method_id: String,
    /// Client-supplied nonce folded into the idempotency key so that
    /// retried requests do not create duplicate remote subscriptions.
    pub request_nonce: Option<String>,
}

/// Result of a successful subscribe.
#[derive(Debug, Clone)]
pub struct SubscribeResult {
    /// The persisted local record.
    pub subscription: Subscription,
    /// Client secret for frontend payment confirmation, when the remote
    /// subscription is awaiting its first payment.
    pub client_secret: Option<String>,
}

/// Handler for the subscribe command.
pub struct SubscribeHandler {
    users: Arc<dyn UserRepository>,
    shelters: Arc<dyn ShelterRepository>,
    subscriptions: Arc<dyn SubscriptionRepository>,
    gateway: Arc<dyn BillingGateway>,
}

impl SubscribeHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        shelters: Arc<dyn ShelterRepository>,
        subscriptions: Arc<dyn SubscriptionRepository>,
        gateway: Arc<dyn BillingGateway>,
    ) -> Self {
        Self {
            users,
            shelters,
            subscriptions,
            gateway,
        }
    }

    pub async fn handle(&self, cmd: SubscribeCommand) -> Result<SubscribeResult, SubscriptionError> {
        // 1. Resolve actor and shelter
        let mut user = self
            .users
            .find_by_id(&cmd.user_id)
            .await?
            .ok_or_else(|| SubscriptionError::not_found("User"))?;

        let shelter = self
            .shelters
            .find_by_id(&cmd.shelter_id)
            .await?
            .ok_or_else(|| SubscriptionError::not_found("Shelter"))?;

        // 2. Map the tier to the shelter's configured price
        let price_id = shelter
            .price_for_tier(cmd.tier)
            .ok_or_else(|| SubscriptionError::configuration(shelter.id, cmd.tier))?
            .to_string();

        // 3. One open subscription per (user, shelter)
        if self
            .subscriptions
            .find_open_by_user_and_shelter(&cmd.user_id, &cmd.shelter_id)
            .await?
            .is_some()
        {
            return Err(SubscriptionError::conflict(cmd.shelter_id));
        }

        // 4. Ensure a billing customer exists (create-if-absent, reused forever)
        let customer_id = self.ensure_billing_customer(&mut user).await?;

        // 5. Attach the payment method and make it the invoice default
        self.gateway
            .attach_payment_method(&customer_id, &cmd.payment_method_id)
            .await
            .map_err(|e| SubscriptionError::billing(e.to_string()))?;

        // 6. Create the remote subscription in payment-pending mode
        let idempotency_key = derive_idempotency_key(&cmd);
        let remote = self
            .gateway
            .create_subscription(CreateSubscriptionRequest {
                customer_id,
                price_id,
                idempotency_key: Some(idempotency_key),
            })
            .await
            .map_err(|e| SubscriptionError::billing(e.to_string()))?;

        // 7. Persist the local record, status from the remote report
        let initial_status = SubscriptionStatus::from_remote(&remote.status)
            .unwrap_or(SubscriptionStatus::Incomplete);
        let subscription = Subscription::open(
            SubscriptionId::new(),
            user.id,
            shelter.id,
            cmd.tier,
            remote.id,
            initial_status,
            chrono::Utc::now().date_naive(),
        );
        self.subscriptions.save(&subscription).await?;

        tracing::info!(
            subscription_id = %subscription.id,
            user_id = %user.id,
            shelter_id = %shelter.id,
            tier = %cmd.tier,
            "Subscription created"
        );

        Ok(SubscribeResult {
            subscription,
            client_secret: remote.client_secret,
        })
    }

    /// Returns the user's billing customer id, creating one on first use.
    async fn ensure_billing_customer(&self, user: &mut User) -> Result<String, SubscriptionError> {
        if let Some(id) = &user.stripe_customer_id {
            return Ok(id.clone());
        }

        let customer = self
            .gateway
            .create_customer(CreateCustomerRequest {
                email: user.email.clone(),
                name: user.name.clone(),
            })
            .await
            .map_err(|e| SubscriptionError::billing(e.to_string()))?;

        user.attach_billing_customer(customer.id.clone())?;
        self.users.update(user).await?;
        Ok(customer.id)
    }
}

/// Deterministic idempotency key from (actor, shelter, tier, nonce).
fn derive_idempotency_key(cmd: &SubscribeCommand) -> String {
    format!(
        "subscribe:{}:{}:{}:{}",
        cmd.user_id,
        cmd.shelter_id,
        cmd.tier.as_str(),
        cmd.request_nonce.as_deref().unwrap_or("-")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{
        InMemoryShelterRepository, InMemorySubscriptionRepository, InMemoryUserRepository,
    };
    use crate::adapters::stripe::MockBillingGateway;
    use crate::domain::shelter::Shelter;

    struct Fixture {
        users: Arc<InMemoryUserRepository>,
        shelters: Arc<InMemoryShelterRepository>,
        subscriptions: Arc<InMemorySubscriptionRepository>,
        gateway: Arc<MockBillingGateway>,
        user: User,
        shelter: Shelter,
    }

    async fn fixture() -> Fixture {
        fixture_with_gateway(MockBillingGateway::new()).await
    }

    async fn fixture_with_gateway(gateway: MockBillingGateway) -> Fixture {
        let users = Arc::new(InMemoryUserRepository::new());
        let shelters = Arc::new(InMemoryShelterRepository::new());
        let subscriptions = Arc::new(InMemorySubscriptionRepository::new());

        let user = User::register(UserId::new(), "Dana", "dana@example.com", "dana", "hash")
            .unwrap();
        users.save(&user).await.unwrap();

        let mut shelter = Shelter::create(
            ShelterId::new(),
            UserId::new(),
            "Paws Haven",
            "Small dog rescue",
            "12 Bark St",
        )
        .unwrap();
        shelter.set_price_reference(Tier::Basic, "pb1").unwrap();
        shelter.set_price_reference(Tier::Standard, "ps1").unwrap();
        crate::ports::ShelterRepository::save(shelters.as_ref(), &shelter)
            .await
            .unwrap();

        Fixture {
            users,
            shelters,
            subscriptions,
            gateway: Arc::new(gateway),
            user,
            shelter,
        }
    }

    fn handler(f: &Fixture) -> SubscribeHandler {
        SubscribeHandler::new(
            f.users.clone(),
            f.shelters.clone(),
            f.subscriptions.clone(),
            f.gateway.clone(),
        )
    }

    fn command(f: &Fixture, tier: Tier) -> SubscribeCommand {
        SubscribeCommand {
            user_id: f.user.id,
            shelter_id: f.shelter.id,
            tier,
            payment_method_id: "pm_card".to_string(),
            request_nonce: None,
        }
    }

    #[tokio::test]
    async fn subscribe_persists_local_record_linked_to_remote() {
        let f = fixture().await;
        let result = handler(&f).handle(command(&f, Tier::Basic)).await.unwrap();

        assert_eq!(result.subscription.tier, Tier::Basic);
        assert_eq!(result.subscription.status, SubscriptionStatus::Incomplete);
        assert_eq!(result.subscription.amount_cents, Tier::Basic.price_cents());
        assert!(result.subscription.stripe_subscription_id.is_some());
        assert_eq!(result.client_secret.as_deref(), Some("pi_mock_secret"));

        let stored = f
            .subscriptions
            .find_all_by_user(&f.user.id)
            .await
            .unwrap();
        assert_eq!(stored.len(), 1);

        // The configured price reached the provider
        let created = f.gateway.created_subscriptions();
        assert_eq!(created[0].price_id, "pb1");
        assert!(created[0].idempotency_key.is_some());
    }

    #[tokio::test]
    async fn subscribe_attaches_payment_method_before_creating() {
        let f = fixture().await;
        handler(&f).handle(command(&f, Tier::Basic)).await.unwrap();

        let attached = f.gateway.attached_payment_methods();
        assert_eq!(attached.len(), 1);
        assert_eq!(attached[0].1, "pm_card");
    }

    #[tokio::test]
    async fn unconfigured_tier_fails_with_configuration_error_and_no_side_effects() {
        let f = fixture().await;
        // Premium has no price reference on the fixture shelter
        let result = handler(&f).handle(command(&f, Tier::Premium)).await;

        assert!(matches!(
            result,
            Err(SubscriptionError::ConfigurationError { .. })
        ));
        assert!(f.gateway.created_subscriptions().is_empty());
        assert_eq!(f.gateway.created_customer_count(), 0);
        assert!(f
            .subscriptions
            .find_all_by_user(&f.user.id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn every_tier_without_a_price_fails_the_same_way() {
        let f = fixture().await;
        // A shelter with no price references at all
        let bare = Shelter::create(ShelterId::new(), UserId::new(), "Bare", "d", "a").unwrap();
        crate::ports::ShelterRepository::save(f.shelters.as_ref(), &bare)
            .await
            .unwrap();
        let h = handler(&f);

        for tier in Tier::all() {
            let mut cmd = command(&f, tier);
            cmd.shelter_id = bare.id;
            let result = h.handle(cmd).await;
            assert!(
                matches!(result, Err(SubscriptionError::ConfigurationError { .. })),
                "tier {} should fail with ConfigurationError",
                tier
            );
        }
        assert!(f.gateway.created_subscriptions().is_empty());
    }

    #[tokio::test]
    async fn resubscribing_after_cancellation_is_allowed() {
        let f = fixture().await;
        let h = handler(&f);

        let first = h.handle(command(&f, Tier::Basic)).await.unwrap();
        let mut sub = first.subscription;
        sub.cancel().unwrap();
        f.subscriptions.update(&sub).await.unwrap();

        let second = h.handle(command(&f, Tier::Standard)).await;
        assert!(second.is_ok());
        assert_eq!(f.gateway.created_subscriptions().len(), 2);
    }

    #[tokio::test]
    async fn missing_user_fails_with_not_found() {
        let f = fixture().await;
        let mut cmd = command(&f, Tier::Basic);
        cmd.user_id = UserId::new();

        let result = handler(&f).handle(cmd).await;
        assert!(matches!(result, Err(SubscriptionError::NotFound(_))));
    }

    #[tokio::test]
    async fn missing_shelter_fails_with_not_found() {
        let f = fixture().await;
        let mut cmd = command(&f, Tier::Basic);
        cmd.shelter_id = ShelterId::new();

        let result = handler(&f).handle(cmd).await;
        assert!(matches!(result, Err(SubscriptionError::NotFound(_))));
    }

    #[tokio::test]
    async fn billing_failure_leaves_no_local_record() {
        let f = fixture_with_gateway(MockBillingGateway::new().failing_create_subscription()).await;
        let result = handler(&f).handle(command(&f, Tier::Basic)).await;

        assert!(matches!(result, Err(SubscriptionError::Billing { .. })));
        assert!(f
            .subscriptions
            .find_all_by_user(&f.user.id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn billing_customer_is_created_once_and_reused() {
        let f = fixture().await;
        let h = handler(&f);

        h.handle(command(&f, Tier::Basic)).await.unwrap();
        assert_eq!(f.gateway.created_customer_count(), 1);

        // Second subscription to a different shelter reuses the customer
        let mut other = Shelter::create(
            ShelterId::new(),
            UserId::new(),
            "Cat Corner",
            "Cats",
            "9 Meow Ln",
        )
        .unwrap();
        other.set_price_reference(Tier::Basic, "pb2").unwrap();
        crate::ports::ShelterRepository::save(f.shelters.as_ref(), &other)
            .await
            .unwrap();

        let mut cmd = command(&f, Tier::Basic);
        cmd.shelter_id = other.id;
        h.handle(cmd).await.unwrap();

        assert_eq!(f.gateway.created_customer_count(), 1);
        let stored = f.users.find_by_id(&f.user.id).await.unwrap().unwrap();
        assert!(stored.stripe_customer_id.is_some());
    }

    #[tokio::test]
    async fn second_open_subscription_to_same_shelter_conflicts() {
        let f = fixture().await;
        let h = handler(&f);

        h.handle(command(&f, Tier::Basic)).await.unwrap();
        let result = h.handle(command(&f, Tier::Standard)).await;

        assert!(matches!(result, Err(SubscriptionError::Conflict(_))));
        // Only one remote subscription was ever created
        assert_eq!(f.gateway.created_subscriptions().len(), 1);
    }

    #[test]
    fn idempotency_key_is_deterministic_for_same_request() {
        let cmd = SubscribeCommand {
            user_id: UserId::new(),
            shelter_id: ShelterId::new(),
            tier: Tier::Basic,
            payment_method_id: "pm".to_string(),
            request_nonce: Some("nonce-1".to_string()),
        };
        assert_eq!(derive_idempotency_key(&cmd), derive_idempotency_key(&cmd));
        assert!(derive_idempotency_key(&cmd).ends_with(":nonce-1"));
    }
}
