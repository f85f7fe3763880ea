//! Stripe webhook event types.
//!
//! Defines the structures for parsing Stripe webhook payloads.
//! Only fields relevant to subscription reconciliation are captured.

use serde::{Deserialize, Serialize};

/// Stripe webhook event (simplified).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeEvent {
    /// Unique identifier for the event (evt_xxx format).
    pub id: String,

    /// Type of event (e.g., "invoice.paid").
    #[serde(rename = "type")]
    pub event_type: String,

    /// Time at which the event was created (Unix timestamp).
    pub created: i64,

    /// Object containing event-specific data.
    pub data: StripeEventData,

    /// Whether this is a live mode event (vs test mode).
    pub livemode: bool,
}

/// Container for event-specific data.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeEventData {
    /// The object that triggered the event (polymorphic based on event type).
    pub object: serde_json::Value,
}

impl StripeEvent {
    /// Parse the event type into a known enum variant.
    pub fn parsed_type(&self) -> StripeEventType {
        StripeEventType::from_wire(&self.event_type)
    }

    /// Attempts to deserialize the data object as the specified type.
    pub fn deserialize_object<T: serde::de::DeserializeOwned>(
        &self,
    ) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.data.object.clone())
    }
}

/// The Stripe event kinds this platform reacts to.
///
/// Anything else is acknowledged and ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StripeEventType {
    /// Invoice paid successfully.
    InvoicePaid,
    /// Invoice payment failed.
    InvoicePaymentFailed,
    /// Remote subscription was updated (plan change, status change).
    SubscriptionUpdated,
    /// Remote subscription terminated.
    SubscriptionDeleted,
    /// Unknown or unhandled event type.
    Unknown(String),
}

impl StripeEventType {
    /// Parse event type from Stripe's wire string.
    pub fn from_wire(s: &str) -> Self {
        match s {
            "invoice.paid" => Self::InvoicePaid,
            "invoice.payment_failed" => Self::InvoicePaymentFailed,
            "customer.subscription.updated" => Self::SubscriptionUpdated,
            "customer.subscription.deleted" => Self::SubscriptionDeleted,
            other => Self::Unknown(other.to_string()),
        }
    }
}

/// Invoice object embedded in `invoice.*` events. Only the fields the
/// reconciliation logic reads are captured.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeInvoiceObject {
    /// Invoice id (in_xxx).
    pub id: String,

    /// Remote subscription the invoice belongs to, if any.
    pub subscription: Option<String>,
}

/// Subscription object embedded in `customer.subscription.*` events.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeSubscriptionObject {
    /// Remote subscription id (sub_xxx).
    pub id: String,

    /// Remote-reported status string.
    pub status: String,

    /// Current billing period start (Unix timestamp).
    pub current_period_start: i64,

    /// Current billing period end (Unix timestamp).
    pub current_period_end: i64,

    /// Subscription items; the first item's price identifies the plan.
    #[serde(default)]
    pub items: StripeSubscriptionItems,
}

impl StripeSubscriptionObject {
    /// Price id of the first subscription item, when present.
    pub fn primary_price_id(&self) -> Option<&str> {
        self.items.data.first().map(|item| item.price.id.as_str())
    }
}

/// List wrapper for subscription items.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StripeSubscriptionItems {
    #[serde(default)]
    pub data: Vec<StripeSubscriptionItem>,
}

/// A single subscription item.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeSubscriptionItem {
    pub price: StripePriceRef,
}

/// Price reference on a subscription item.
#[derive(Debug, Clone, Deserialize)]
pub struct StripePriceRef {
    pub id: String,
}

/// Builder for creating test StripeEvent instances.
#[cfg(test)]
pub struct StripeEventBuilder {
    id: String,
    event_type: String,
    created: i64,
    object: serde_json::Value,
    livemode: bool,
}

#[cfg(test)]
impl Default for StripeEventBuilder {
    fn default() -> Self {
        Self {
            id: "evt_test_123".to_string(),
            event_type: "invoice.paid".to_string(),
            created: 1_704_067_200,
            object: serde_json::json!({}),
            livemode: false,
        }
    }
}

#[cfg(test)]
impl StripeEventBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = event_type.into();
        self
    }

    pub fn object(mut self, object: serde_json::Value) -> Self {
        self.object = object;
        self
    }

    pub fn build(self) -> StripeEvent {
        StripeEvent {
            id: self.id,
            event_type: self.event_type,
            created: self.created,
            data: StripeEventData {
                object: self.object,
            },
            livemode: self.livemode,
        }
    }
}
