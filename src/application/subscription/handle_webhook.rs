//! HandleWebhookHandler - applies asynchronous billing events to the
//! subscription ledger.
//!
//! Events arrive at-least-once and possibly out of order. Three guards
//! keep the ledger convergent:
//!
//! 1. Signature verification happens before any parsing of event content;
//!    a failure aborts with no mutation.
//! 2. A processed-event store absorbs redelivery: the first delivery of
//!    an event id wins, later ones are acknowledged without effect.
//! 3. Handlers treat remote-reported fields as absolute overwrites, and
//!    `Canceled` records ignore everything.
//!
//! Updates run under optimistic concurrency: a webhook applier that loses
//! a version race re-reads the record and re-applies once.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::foundation::{ErrorCode, Timestamp};
use crate::domain::subscription::{
    StripeEvent, StripeEventType, StripeInvoiceObject, StripeSubscriptionObject, Subscription,
    SubscriptionError, SubscriptionStatus, StripeWebhookVerifier, Tier,
};
use crate::ports::{
    BillingGateway, SaveResult, ShelterRepository, SubscriptionRepository, WebhookEventRecord,
    WebhookEventRepository,
};

/// Command carrying a raw webhook delivery.
#[derive(Debug, Clone)]
pub struct HandleWebhookCommand {
    /// Raw request body, exactly as received.
    pub payload: Vec<u8>,
    /// Value of the Stripe-Signature header.
    pub signature: String,
}

/// Outcome of webhook processing.
///
/// Only verification failures surface as errors from the handler; every
/// post-verification failure becomes `Failed` so the ingress can still
/// acknowledge the delivery and avoid redelivery storms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// Local state was mutated.
    Applied,
    /// The event was acknowledged without effect.
    Ignored,
    /// The event id was seen before; nothing was reapplied.
    AlreadyProcessed,
    /// Handling failed after verification; logged and acknowledged.
    Failed,
}

/// How a single dispatch went, before recording.
enum Disposition {
    Applied,
    Ignored(String),
}

/// Handler for inbound billing webhooks.
pub struct HandleWebhookHandler {
    verifier: StripeWebhookVerifier,
    subscriptions: Arc<dyn SubscriptionRepository>,
    shelters: Arc<dyn ShelterRepository>,
    gateway: Arc<dyn BillingGateway>,
    events: Arc<dyn WebhookEventRepository>,
}

impl HandleWebhookHandler {
    pub fn new(
        verifier: StripeWebhookVerifier,
        subscriptions: Arc<dyn SubscriptionRepository>,
        shelters: Arc<dyn ShelterRepository>,
        gateway: Arc<dyn BillingGateway>,
        events: Arc<dyn WebhookEventRepository>,
    ) -> Self {
        Self {
            verifier,
            subscriptions,
            shelters,
            gateway,
            events,
        }
    }

    pub async fn handle(
        &self,
        cmd: HandleWebhookCommand,
    ) -> Result<WebhookOutcome, SubscriptionError> {
        // Verification strictly precedes any inspection of event content.
        let event = self.verifier.verify_and_parse(&cmd.payload, &cmd.signature)?;

        if self.events.find_by_event_id(&event.id).await?.is_some() {
            tracing::debug!(event_id = %event.id, "Webhook event already processed");
            return Ok(WebhookOutcome::AlreadyProcessed);
        }

        let result = self.dispatch(&event).await;

        let record = match &result {
            Ok(Disposition::Applied) => WebhookEventRecord::applied(&event.id, &event.event_type),
            Ok(Disposition::Ignored(reason)) => {
                WebhookEventRecord::ignored(&event.id, &event.event_type, reason.clone())
            }
            Err(e) => WebhookEventRecord::failed(&event.id, &event.event_type, e.message()),
        };

        if self.events.save(record).await? == SaveResult::AlreadyExists {
            // A concurrent delivery of the same event won the race.
            return Ok(WebhookOutcome::AlreadyProcessed);
        }

        match result {
            Ok(Disposition::Applied) => {
                tracing::info!(
                    event_id = %event.id,
                    event_type = %event.event_type,
                    "Webhook event applied"
                );
                Ok(WebhookOutcome::Applied)
            }
            Ok(Disposition::Ignored(reason)) => {
                tracing::debug!(
                    event_id = %event.id,
                    event_type = %event.event_type,
                    reason = %reason,
                    "Webhook event ignored"
                );
                Ok(WebhookOutcome::Ignored)
            }
            Err(e) => {
                // Swallowed by design so the provider is not driven into
                // redelivery storms; the failure is recorded and logged.
                tracing::error!(
                    event_id = %event.id,
                    event_type = %event.event_type,
                    error = %e,
                    "Webhook event handling failed; delivery acknowledged anyway"
                );
                Ok(WebhookOutcome::Failed)
            }
        }
    }

    async fn dispatch(&self, event: &StripeEvent) -> Result<Disposition, SubscriptionError> {
        match event.parsed_type() {
            StripeEventType::InvoicePaid => self.on_invoice_paid(event).await,
            StripeEventType::InvoicePaymentFailed => self.on_invoice_payment_failed(event).await,
            StripeEventType::SubscriptionDeleted => self.on_subscription_deleted(event).await,
            StripeEventType::SubscriptionUpdated => self.on_subscription_updated(event).await,
            StripeEventType::Unknown(kind) => {
                Ok(Disposition::Ignored(format!("unhandled event type {}", kind)))
            }
        }
    }

    /// `invoice.paid`: refresh status and billing period from the remote
    /// subscription snapshot.
    async fn on_invoice_paid(&self, event: &StripeEvent) -> Result<Disposition, SubscriptionError> {
        let invoice: StripeInvoiceObject = event
            .deserialize_object()
            .map_err(|e| SubscriptionError::validation("invoice", e.to_string()))?;

        let Some(remote_id) = invoice.subscription else {
            return Ok(Disposition::Ignored("invoice has no subscription".to_string()));
        };
        let Some(subscription) = self.find_open(&remote_id).await? else {
            return Ok(Disposition::Ignored(format!(
                "no open local record for {}",
                remote_id
            )));
        };

        // The invoice itself carries no period; the remote subscription
        // snapshot is the authority.
        let Some(remote) = self
            .gateway
            .get_subscription(&remote_id)
            .await
            .map_err(|e| SubscriptionError::billing(e.to_string()))?
        else {
            return Ok(Disposition::Ignored(format!(
                "remote subscription {} no longer exists",
                remote_id
            )));
        };

        let Some(status) = SubscriptionStatus::from_remote(&remote.status) else {
            tracing::warn!(
                remote_status = %remote.status,
                remote_id = %remote_id,
                "Unmodeled remote subscription status; leaving record unchanged"
            );
            return Ok(Disposition::Ignored(format!(
                "unmodeled remote status {}",
                remote.status
            )));
        };
        let (start, end) = period_dates(remote.current_period_start, remote.current_period_end)?;

        self.apply(subscription, move |s| s.reconcile_remote(status, start, end))
            .await
    }

    /// `invoice.payment_failed`: the subscription goes past due.
    async fn on_invoice_payment_failed(
        &self,
        event: &StripeEvent,
    ) -> Result<Disposition, SubscriptionError> {
        let invoice: StripeInvoiceObject = event
            .deserialize_object()
            .map_err(|e| SubscriptionError::validation("invoice", e.to_string()))?;

        let Some(remote_id) = invoice.subscription else {
            return Ok(Disposition::Ignored("invoice has no subscription".to_string()));
        };
        let Some(subscription) = self.find_open(&remote_id).await? else {
            return Ok(Disposition::Ignored(format!(
                "no open local record for {}",
                remote_id
            )));
        };

        self.apply(subscription, |s| s.mark_past_due()).await
    }

    /// `customer.subscription.deleted`: the remote subscription
    /// terminated; the local record becomes Canceled and stays.
    async fn on_subscription_deleted(
        &self,
        event: &StripeEvent,
    ) -> Result<Disposition, SubscriptionError> {
        let remote: StripeSubscriptionObject = event
            .deserialize_object()
            .map_err(|e| SubscriptionError::validation("subscription", e.to_string()))?;

        let Some(subscription) = self.find_open(&remote.id).await? else {
            return Ok(Disposition::Ignored(format!(
                "no open local record for {}",
                remote.id
            )));
        };

        self.apply(subscription, |s| s.cancel()).await
    }

    /// `customer.subscription.updated`: refresh status and period from the
    /// event payload and re-derive the tier by reverse-mapping the
    /// reported price against the shelter's configured references.
    async fn on_subscription_updated(
        &self,
        event: &StripeEvent,
    ) -> Result<Disposition, SubscriptionError> {
        let remote: StripeSubscriptionObject = event
            .deserialize_object()
            .map_err(|e| SubscriptionError::validation("subscription", e.to_string()))?;

        let Some(subscription) = self.find_open(&remote.id).await? else {
            return Ok(Disposition::Ignored(format!(
                "no open local record for {}",
                remote.id
            )));
        };

        let Some(status) = SubscriptionStatus::from_remote(&remote.status) else {
            tracing::warn!(
                remote_status = %remote.status,
                remote_id = %remote.id,
                "Unmodeled remote subscription status; leaving record unchanged"
            );
            return Ok(Disposition::Ignored(format!(
                "unmodeled remote status {}",
                remote.status
            )));
        };
        let (start, end) = period_dates(remote.current_period_start, remote.current_period_end)?;

        let new_tier = self
            .derive_tier(&subscription, remote.primary_price_id())
            .await?;

        self.apply(subscription, move |s| {
            s.reconcile_remote(status, start, end)?;
            if let Some(tier) = new_tier {
                s.change_tier(tier)?;
            }
            Ok(())
        })
        .await
    }

    /// Reverse-map a remote price id to a tier via the shelter's
    /// configured references. A price that matches none of them is
    /// configuration drift: the tier stays unchanged and a warning is
    /// emitted instead of failing the event.
    async fn derive_tier(
        &self,
        subscription: &Subscription,
        price_id: Option<&str>,
    ) -> Result<Option<Tier>, SubscriptionError> {
        let Some(price_id) = price_id else {
            return Ok(None);
        };
        let Some(shelter) = self.shelters.find_by_id(&subscription.shelter_id).await? else {
            tracing::warn!(
                shelter_id = %subscription.shelter_id,
                subscription_id = %subscription.id,
                "Shelter missing while remapping tier; leaving tier unchanged"
            );
            return Ok(None);
        };
        match shelter.tier_for_price(price_id) {
            Some(tier) => Ok(Some(tier)),
            None => {
                tracing::warn!(
                    price_id = %price_id,
                    shelter_id = %shelter.id,
                    subscription_id = %subscription.id,
                    "Remote price matches no configured tier; configuration drift"
                );
                Ok(None)
            }
        }
    }

    /// Find the local record for a remote subscription id, skipping
    /// terminal records (canceled subscriptions ignore all events).
    async fn find_open(
        &self,
        remote_id: &str,
    ) -> Result<Option<Subscription>, SubscriptionError> {
        let Some(subscription) = self
            .subscriptions
            .find_by_stripe_subscription_id(remote_id)
            .await?
        else {
            return Ok(None);
        };
        if subscription.is_canceled() {
            return Ok(None);
        }
        Ok(Some(subscription))
    }

    /// Apply a mutation and persist it, retrying once on a version race.
    async fn apply<F>(
        &self,
        mut subscription: Subscription,
        mutate: F,
    ) -> Result<Disposition, SubscriptionError>
    where
        F: Fn(&mut Subscription) -> Result<(), SubscriptionError>,
    {
        match mutate(&mut subscription) {
            Err(SubscriptionError::TerminalState(_)) => {
                return Ok(Disposition::Ignored("subscription is canceled".to_string()));
            }
            other => other?,
        }

        match self.subscriptions.update(&subscription).await {
            Ok(()) => Ok(Disposition::Applied),
            Err(e) if e.code == ErrorCode::StaleVersion => {
                let Some(mut fresh) = self.subscriptions.find_by_id(&subscription.id).await? else {
                    return Err(SubscriptionError::not_found("Subscription"));
                };
                match mutate(&mut fresh) {
                    Err(SubscriptionError::TerminalState(_)) => {
                        Ok(Disposition::Ignored("subscription is canceled".to_string()))
                    }
                    Err(e) => Err(e),
                    Ok(()) => {
                        self.subscriptions.update(&fresh).await?;
                        Ok(Disposition::Applied)
                    }
                }
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Convert remote Unix-second period bounds to calendar dates.
fn period_dates(start: i64, end: i64) -> Result<(NaiveDate, NaiveDate), SubscriptionError> {
    let start = Timestamp::from_unix_secs(start)
        .ok_or_else(|| SubscriptionError::validation("current_period_start", "out of range"))?
        .as_date();
    let end = Timestamp::from_unix_secs(end)
        .ok_or_else(|| SubscriptionError::validation("current_period_end", "out of range"))?
        .as_date();
    Ok((start, end))
}
