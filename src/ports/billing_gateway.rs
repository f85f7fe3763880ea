//! Billing gateway port for the external payment processor.
//!
//! Thin synchronous wrapper over customer, payment-method, and
//! subscription operations. The adapter does not retry; retry policy is a
//! caller concern.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Port for the hosted billing provider (Stripe).
#[async_trait]
pub trait BillingGateway: Send + Sync {
    /// Create a customer in the billing system.
    async fn create_customer(
        &self,
        request: CreateCustomerRequest,
    ) -> Result<RemoteCustomer, BillingError>;

    /// Get a customer by provider id. `None` if absent or deleted.
    async fn get_customer(&self, customer_id: &str) -> Result<Option<RemoteCustomer>, BillingError>;

    /// Attach a payment method to a customer and make it the default for
    /// invoices.
    async fn attach_payment_method(
        &self,
        customer_id: &str,
        payment_method_id: &str,
    ) -> Result<(), BillingError>;

    /// Create a subscription in a payment-pending state.
    ///
    /// The returned subscription carries a client secret for frontend
    /// payment confirmation when the provider reports one.
    async fn create_subscription(
        &self,
        request: CreateSubscriptionRequest,
    ) -> Result<RemoteSubscription, BillingError>;

    /// Get a subscription by provider id. `None` if absent.
    async fn get_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<Option<RemoteSubscription>, BillingError>;

    /// Cancel a subscription immediately.
    async fn cancel_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<RemoteSubscription, BillingError>;
}

/// Request to create a billing customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCustomerRequest {
    /// Customer email address.
    pub email: String,

    /// Customer display name.
    pub name: String,
}

/// Customer in the billing system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteCustomer {
    /// Provider's customer id (cus_xxx).
    pub id: String,

    /// Customer email.
    pub email: Option<String>,
}

/// Request to create a remote subscription.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSubscriptionRequest {
    /// Provider's customer id.
    pub customer_id: String,

    /// Provider's price id for the selected tier.
    pub price_id: String,

    /// Idempotency key for safe retries of the create call.
    pub idempotency_key: Option<String>,
}

/// Subscription in the billing system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteSubscription {
    /// Provider's subscription id (sub_xxx).
    pub id: String,

    /// Provider's customer id.
    pub customer_id: String,

    /// Provider-reported status string ("incomplete", "active", ...).
    pub status: String,

    /// Current billing period start (Unix timestamp).
    pub current_period_start: i64,

    /// Current billing period end (Unix timestamp).
    pub current_period_end: i64,

    /// Price id of the first subscription item, when reported.
    pub price_id: Option<String>,

    /// Client secret of the pending payment intent, when expanded.
    pub client_secret: Option<String>,
}

/// Errors from billing gateway operations.
#[derive(Debug, Clone)]
pub struct BillingError {
    /// Error category.
    pub kind: BillingErrorKind,

    /// Human-readable message.
    pub message: String,
}

/// Billing error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillingErrorKind {
    /// Network connectivity issue; typically retryable.
    Network,

    /// The provider returned a non-success status.
    Api,

    /// The provider's response could not be parsed.
    Protocol,
}

impl BillingError {
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            kind: BillingErrorKind::Network,
            message: message.into(),
        }
    }

    pub fn api(message: impl Into<String>) -> Self {
        Self {
            kind: BillingErrorKind::Api,
            message: message.into(),
        }
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self {
            kind: BillingErrorKind::Protocol,
            message: message.into(),
        }
    }

    /// Returns true if the operation is typically worth retrying.
    pub fn is_retryable(&self) -> bool {
        self.kind == BillingErrorKind::Network
    }
}

impl std::fmt::Display for BillingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.kind {
            BillingErrorKind::Network => "network",
            BillingErrorKind::Api => "api",
            BillingErrorKind::Protocol => "protocol",
        };
        write!(f, "{}: {}", kind, self.message)
    }
}

impl std::error::Error for BillingError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn billing_gateway_is_object_safe() {
        fn _accepts_dyn(_gateway: &dyn BillingGateway) {}
    }

    #[test]
    fn network_errors_are_retryable() {
        assert!(BillingError::network("timeout").is_retryable());
        assert!(!BillingError::api("402 card declined").is_retryable());
    }

    #[test]
    fn display_includes_kind_and_message() {
        let err = BillingError::api("no such customer");
        assert_eq!(err.to_string(), "api: no such customer");
    }
}
