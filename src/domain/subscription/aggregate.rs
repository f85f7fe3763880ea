//! Subscription aggregate entity.
//!
//! The local, authoritative record of one user's paid relationship to one
//! shelter, linked to a remote Stripe subscription by its opaque id.
//!
//! # Design Decisions
//!
//! - **Money in cents**: amounts are i64 cents, never floats.
//! - **Remote state is authoritative**: webhook-driven refreshes overwrite
//!   status and billing period wholesale. Events arrive at-least-once and
//!   possibly out of order; absolute overwrites keep replays convergent.
//! - **Canceled is terminal**: once canceled, every further mutation is
//!   rejected. Rows are never hard-deleted.
//! - **Optimistic concurrency**: a version counter guards races between
//!   webhook appliers and user-initiated cancellation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ShelterId, StateMachine, SubscriptionId, Timestamp, UserId};

use super::{SubscriptionError, SubscriptionStatus, Tier};

/// Subscription aggregate.
///
/// # Invariants
///
/// - `stripe_subscription_id` is unique; it is `None` only in the window
///   between local construction and the remote create call completing.
/// - `period_start <= period_end`
/// - Status never leaves `Canceled`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    /// Unique identifier for this subscription.
    pub id: SubscriptionId,

    /// User who pays for this subscription.
    pub user_id: UserId,

    /// Shelter receiving the donation.
    pub shelter_id: ShelterId,

    /// Stripe's subscription id (sub_xxx).
    pub stripe_subscription_id: Option<String>,

    /// Donation tier.
    pub tier: Tier,

    /// Current lifecycle status.
    pub status: SubscriptionStatus,

    /// Start of the current billing period (inclusive).
    pub period_start: NaiveDate,

    /// End of the current billing period (exclusive, per Stripe semantics).
    pub period_end: NaiveDate,

    /// Monthly amount charged, in cents.
    pub amount_cents: i64,

    /// Optimistic concurrency token, bumped on every update.
    pub version: i32,

    /// When the subscription was created locally.
    pub created_at: Timestamp,

    /// When the subscription was last updated.
    pub updated_at: Timestamp,
}

impl Subscription {
    /// Creates a local record for a freshly created remote subscription.
    ///
    /// The billing period defaults to `[today, today + 1 month)` and is
    /// corrected by the first `invoice.paid` webhook event.
    pub fn open(
        id: SubscriptionId,
        user_id: UserId,
        shelter_id: ShelterId,
        tier: Tier,
        stripe_subscription_id: impl Into<String>,
        initial_status: SubscriptionStatus,
        today: NaiveDate,
    ) -> Self {
        let now = Timestamp::now();
        let period_end = today
            .checked_add_months(chrono::Months::new(1))
            .unwrap_or(today);
        Self {
            id,
            user_id,
            shelter_id,
            stripe_subscription_id: Some(stripe_subscription_id.into()),
            tier,
            status: initial_status,
            period_start: today,
            period_end,
            amount_cents: tier.price_cents(),
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns true if this subscription has reached its terminal state.
    pub fn is_canceled(&self) -> bool {
        self.status == SubscriptionStatus::Canceled
    }

    /// Returns true if the given user owns this subscription.
    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.user_id == user_id
    }

    /// Cancels this subscription.
    ///
    /// # Errors
    ///
    /// Returns `TerminalState` if the subscription is already canceled.
    pub fn cancel(&mut self) -> Result<(), SubscriptionError> {
        self.status = self
            .status
            .transition_to(SubscriptionStatus::Canceled)
            .map_err(|_| SubscriptionError::terminal(self.id))?;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Marks a failed payment.
    ///
    /// Driven by `invoice.payment_failed`; the remote report is applied as
    /// an absolute overwrite regardless of the local status, except from
    /// the terminal state.
    pub fn mark_past_due(&mut self) -> Result<(), SubscriptionError> {
        if self.is_canceled() {
            return Err(SubscriptionError::terminal(self.id));
        }
        self.status = SubscriptionStatus::PastDue;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Overwrites status and billing period with remote-reported values.
    ///
    /// Remote state is authoritative: no transition validation is applied
    /// beyond the terminal guard, so that out-of-order and redelivered
    /// events converge to the last-applied remote snapshot.
    ///
    /// # Errors
    ///
    /// Returns `TerminalState` if the subscription is already canceled.
    pub fn reconcile_remote(
        &mut self,
        status: SubscriptionStatus,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> Result<(), SubscriptionError> {
        if self.is_canceled() {
            return Err(SubscriptionError::terminal(self.id));
        }
        self.status = status;
        self.period_start = period_start;
        self.period_end = period_end;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Re-derives the tier from a remote plan change.
    ///
    /// The amount follows the tier.
    ///
    /// # Errors
    ///
    /// Returns `TerminalState` if the subscription is already canceled.
    pub fn change_tier(&mut self, tier: Tier) -> Result<(), SubscriptionError> {
        if self.is_canceled() {
            return Err(SubscriptionError::terminal(self.id));
        }
        self.tier = tier;
        self.amount_cents = tier.price_cents();
        self.updated_at = Timestamp::now();
        Ok(())
    }
}
