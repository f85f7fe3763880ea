//! Stripe API response types.
//!
//! Only the fields this platform reads are captured; everything else in
//! Stripe's responses is ignored.

use serde::Deserialize;

/// Customer response from `/v1/customers`.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeCustomer {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub deleted: bool,
}

/// Subscription response from `/v1/subscriptions`.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeSubscription {
    pub id: String,
    pub customer: String,
    pub status: String,
    pub current_period_start: i64,
    pub current_period_end: i64,
    #[serde(default)]
    pub items: StripeList<StripeSubscriptionItem>,
    #[serde(default)]
    pub latest_invoice: Option<StripeLatestInvoice>,
}

impl StripeSubscription {
    /// Price id of the first subscription item, when present.
    pub fn primary_price_id(&self) -> Option<&str> {
        self.items.data.first().map(|item| item.price.id.as_str())
    }

    /// Client secret of the expanded latest invoice's payment intent.
    pub fn client_secret(&self) -> Option<&str> {
        self.latest_invoice
            .as_ref()
            .and_then(|inv| inv.payment_intent.as_ref())
            .and_then(|pi| pi.client_secret.as_deref())
    }
}

/// Generic Stripe list envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeList<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

impl<T> Default for StripeList<T> {
    fn default() -> Self {
        Self { data: Vec::new() }
    }
}

/// A subscription item with its price.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeSubscriptionItem {
    pub price: StripePrice,
}

/// A Stripe price object (only the id is used).
#[derive(Debug, Clone, Deserialize)]
pub struct StripePrice {
    pub id: String,
}

/// Latest invoice expanded with its payment intent.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeLatestInvoice {
    #[serde(default)]
    pub payment_intent: Option<StripePaymentIntent>,
}

/// Payment intent carrying the client-side confirmation secret.
#[derive(Debug, Clone, Deserialize)]
pub struct StripePaymentIntent {
    #[serde(default)]
    pub client_secret: Option<String>,
}

/// Stripe error envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorResponse {
    pub error: StripeErrorBody,
}

/// Stripe error body.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscription_parses_expanded_payment_intent() {
        let json = r#"{
            "id": "sub_1",
            "customer": "cus_1",
            "status": "incomplete",
            "current_period_start": 1704067200,
            "current_period_end": 1706745600,
            "items": { "data": [ { "price": { "id": "price_basic" } } ] },
            "latest_invoice": {
                "payment_intent": { "client_secret": "pi_123_secret_456" }
            }
        }"#;

        let sub: StripeSubscription = serde_json::from_str(json).unwrap();
        assert_eq!(sub.primary_price_id(), Some("price_basic"));
        assert_eq!(sub.client_secret(), Some("pi_123_secret_456"));
    }

    #[test]
    fn subscription_tolerates_unexpanded_invoice() {
        let json = r#"{
            "id": "sub_1",
            "customer": "cus_1",
            "status": "active",
            "current_period_start": 1704067200,
            "current_period_end": 1706745600
        }"#;

        let sub: StripeSubscription = serde_json::from_str(json).unwrap();
        assert_eq!(sub.client_secret(), None);
        assert_eq!(sub.primary_price_id(), None);
    }

    #[test]
    fn error_envelope_parses() {
        let json = r#"{ "error": { "type": "invalid_request_error", "message": "No such customer" } }"#;
        let err: StripeErrorResponse = serde_json::from_str(json).unwrap();
        assert_eq!(err.error.message.as_deref(), Some("No such customer"));
    }
}
