//! Subscription status state machine.
//!
//! The status set mirrors Stripe's subscription statuses so that
//! remote-reported state maps onto the local record without translation
//! loss. `Canceled` is the only terminal state: once a subscription is
//! canceled, no webhook event may resurrect it.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};

/// Status of a subscription in the billing lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// Created, awaiting first payment confirmation.
    Incomplete,

    /// First payment was never completed and the window expired.
    IncompleteExpired,

    /// In a trial period.
    Trialing,

    /// Paid and current.
    Active,

    /// A payment failed; retries are in progress.
    PastDue,

    /// Canceled. Terminal - no event may leave this state.
    Canceled,

    /// Payment retries exhausted without cancellation.
    Unpaid,
}

impl SubscriptionStatus {
    /// Stored string form, identical to Stripe's wire form.
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Incomplete => "incomplete",
            SubscriptionStatus::IncompleteExpired => "incomplete_expired",
            SubscriptionStatus::Trialing => "trialing",
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::PastDue => "past_due",
            SubscriptionStatus::Canceled => "canceled",
            SubscriptionStatus::Unpaid => "unpaid",
        }
    }

    /// Parse a status from Stripe's wire form.
    ///
    /// Returns `None` for statuses this platform does not model (e.g.
    /// `paused`); callers should leave local state unchanged in that case.
    pub fn from_remote(s: &str) -> Option<Self> {
        match s {
            "incomplete" => Some(SubscriptionStatus::Incomplete),
            "incomplete_expired" => Some(SubscriptionStatus::IncompleteExpired),
            "trialing" => Some(SubscriptionStatus::Trialing),
            "active" => Some(SubscriptionStatus::Active),
            "past_due" => Some(SubscriptionStatus::PastDue),
            "canceled" => Some(SubscriptionStatus::Canceled),
            "unpaid" => Some(SubscriptionStatus::Unpaid),
            _ => None,
        }
    }
}

impl StateMachine for SubscriptionStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SubscriptionStatus::*;
        // Self-transitions are valid on every non-terminal status: webhook
        // redelivery refreshes the same state without erroring.
        if self == target {
            return !matches!(self, Canceled);
        }
        matches!(
            (self, target),
            // From INCOMPLETE
            (Incomplete, Active)
                | (Incomplete, Trialing)
                | (Incomplete, IncompleteExpired)
                | (Incomplete, PastDue)
                | (Incomplete, Canceled)
            // From INCOMPLETE_EXPIRED
                | (IncompleteExpired, Canceled)
            // From TRIALING
                | (Trialing, Active)
                | (Trialing, PastDue)
                | (Trialing, Unpaid)
                | (Trialing, Canceled)
            // From ACTIVE
                | (Active, PastDue)
                | (Active, Unpaid)
                | (Active, Canceled)
            // From PAST_DUE (payment retry can recover)
                | (PastDue, Active)
                | (PastDue, Unpaid)
                | (PastDue, Canceled)
            // From UNPAID
                | (Unpaid, Active)
                | (Unpaid, Canceled)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SubscriptionStatus::*;
        match self {
            Incomplete => vec![Incomplete, Active, Trialing, IncompleteExpired, PastDue, Canceled],
            IncompleteExpired => vec![IncompleteExpired, Canceled],
            Trialing => vec![Trialing, Active, PastDue, Unpaid, Canceled],
            Active => vec![Active, PastDue, Unpaid, Canceled],
            PastDue => vec![PastDue, Active, Unpaid, Canceled],
            Unpaid => vec![Unpaid, Active, Canceled],
            Canceled => vec![],
        }
    }
}
