//! UnsubscribeHandler - cancels a subscription remotely, then locally.
//!
//! The remote cancel is attempted first: if the provider call fails, the
//! local record stays untouched rather than silently desynchronizing
//! (fail-closed). The local record is marked Canceled, never deleted.

use std::sync::Arc;

use crate::domain::foundation::{ErrorCode, SubscriptionId, UserId};
use crate::domain::subscription::SubscriptionError;
use crate::ports::{BillingGateway, SubscriptionRepository};

/// Command to cancel the actor's subscription.
#[derive(Debug, Clone)]
pub struct UnsubscribeCommand {
    pub user_id: UserId,
    pub subscription_id: SubscriptionId,
}

/// Handler for the unsubscribe command.
pub struct UnsubscribeHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
    gateway: Arc<dyn BillingGateway>,
}

impl UnsubscribeHandler {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepository>,
        gateway: Arc<dyn BillingGateway>,
    ) -> Self {
        Self {
            subscriptions,
            gateway,
        }
    }

    pub async fn handle(&self, cmd: UnsubscribeCommand) -> Result<(), SubscriptionError> {
        let mut subscription = self
            .subscriptions
            .find_by_id(&cmd.subscription_id)
            .await?
            .ok_or_else(|| SubscriptionError::not_found("Subscription"))?;

        if !subscription.is_owned_by(&cmd.user_id) {
            return Err(SubscriptionError::forbidden(subscription.id));
        }

        // Already terminal: nothing to do remotely or locally.
        if subscription.is_canceled() {
            return Ok(());
        }

        // Remote cancel first, so a provider failure cannot leave the
        // local record canceled while billing continues.
        if let Some(remote_id) = subscription.stripe_subscription_id.clone() {
            self.gateway
                .cancel_subscription(&remote_id)
                .await
                .map_err(|e| SubscriptionError::billing(e.to_string()))?;
        }

        subscription.cancel()?;
        match self.subscriptions.update(&subscription).await {
            Ok(()) => {}
            Err(e) if e.code == ErrorCode::StaleVersion => {
                // A webhook applier won the race; re-read and re-cancel.
                let mut fresh = self
                    .subscriptions
                    .find_by_id(&cmd.subscription_id)
                    .await?
                    .ok_or_else(|| SubscriptionError::not_found("Subscription"))?;
                if !fresh.is_canceled() {
                    fresh.cancel()?;
                    self.subscriptions.update(&fresh).await?;
                }
            }
            Err(e) => return Err(e.into()),
        }

        tracing::info!(
            subscription_id = %subscription.id,
            user_id = %cmd.user_id,
            "Subscription canceled"
        );
        Ok(())
    }
}
