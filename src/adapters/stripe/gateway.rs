//! Stripe implementation of the billing gateway port.
//!
//! Form-encoded calls against the Stripe REST API with basic auth.
//! Create calls carry an `Idempotency-Key` header when the caller
//! supplies one. No retries here: retry policy belongs to callers.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::ports::{
    BillingError, BillingGateway, CreateCustomerRequest, CreateSubscriptionRequest,
    RemoteCustomer, RemoteSubscription,
};

use super::wire::{StripeCustomer, StripeErrorResponse, StripeSubscription};

/// Stripe API configuration.
#[derive(Clone)]
pub struct StripeConfig {
    /// Stripe secret API key (sk_live_... or sk_test_...).
    api_key: SecretString,

    /// Base URL for the Stripe API.
    api_base_url: String,
}

impl StripeConfig {
    /// Create a new Stripe configuration.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            api_base_url: "https://api.stripe.com".to_string(),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

/// Stripe billing gateway adapter.
pub struct StripeBillingGateway {
    config: StripeConfig,
    http_client: reqwest::Client,
}

impl StripeBillingGateway {
    /// Create a new gateway with the given configuration.
    pub fn new(config: StripeConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base_url, path)
    }

    /// Turn a non-success response into a BillingError with Stripe's own
    /// message when the error envelope parses.
    async fn api_error(response: reqwest::Response) -> BillingError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<StripeErrorResponse>(&body)
            .ok()
            .and_then(|e| e.error.message)
            .unwrap_or(body);
        tracing::error!(status = %status, error = %message, "Stripe API call failed");
        BillingError::api(format!("{}: {}", status, message))
    }

    async fn parse<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, BillingError> {
        response
            .json()
            .await
            .map_err(|e| BillingError::protocol(format!("Failed to parse Stripe response: {}", e)))
    }

    fn to_remote(sub: StripeSubscription) -> RemoteSubscription {
        RemoteSubscription {
            client_secret: sub.client_secret().map(str::to_string),
            price_id: sub.primary_price_id().map(str::to_string),
            id: sub.id,
            customer_id: sub.customer,
            status: sub.status,
            current_period_start: sub.current_period_start,
            current_period_end: sub.current_period_end,
        }
    }
}

#[async_trait]
impl BillingGateway for StripeBillingGateway {
    async fn create_customer(
        &self,
        request: CreateCustomerRequest,
    ) -> Result<RemoteCustomer, BillingError> {
        let response = self
            .http_client
            .post(self.url("/v1/customers"))
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .form(&[("email", request.email.as_str()), ("name", request.name.as_str())])
            .send()
            .await
            .map_err(|e| BillingError::network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let customer: StripeCustomer = Self::parse(response).await?;
        Ok(RemoteCustomer {
            id: customer.id,
            email: customer.email,
        })
    }

    async fn get_customer(
        &self,
        customer_id: &str,
    ) -> Result<Option<RemoteCustomer>, BillingError> {
        let response = self
            .http_client
            .get(self.url(&format!("/v1/customers/{}", customer_id)))
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .send()
            .await
            .map_err(|e| BillingError::network(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let customer: StripeCustomer = Self::parse(response).await?;
        if customer.deleted {
            return Ok(None);
        }
        Ok(Some(RemoteCustomer {
            id: customer.id,
            email: customer.email,
        }))
    }

    async fn attach_payment_method(
        &self,
        customer_id: &str,
        payment_method_id: &str,
    ) -> Result<(), BillingError> {
        // 1. Attach the payment method to the customer
        let response = self
            .http_client
            .post(self.url(&format!("/v1/payment_methods/{}/attach", payment_method_id)))
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .form(&[("customer", customer_id)])
            .send()
            .await
            .map_err(|e| BillingError::network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        // 2. Make it the default for invoices
        let response = self
            .http_client
            .post(self.url(&format!("/v1/customers/{}", customer_id)))
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .form(&[("invoice_settings[default_payment_method]", payment_method_id)])
            .send()
            .await
            .map_err(|e| BillingError::network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        Ok(())
    }

    async fn create_subscription(
        &self,
        request: CreateSubscriptionRequest,
    ) -> Result<RemoteSubscription, BillingError> {
        let params = [
            ("customer", request.customer_id.as_str()),
            ("items[0][price]", request.price_id.as_str()),
            ("payment_behavior", "default_incomplete"),
            ("payment_settings[save_default_payment_method]", "on_subscription"),
            ("expand[]", "latest_invoice.payment_intent"),
        ];

        let mut builder = self
            .http_client
            .post(self.url("/v1/subscriptions"))
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .form(&params);

        if let Some(key) = &request.idempotency_key {
            builder = builder.header("Idempotency-Key", key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| BillingError::network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let sub: StripeSubscription = Self::parse(response).await?;
        Ok(Self::to_remote(sub))
    }

    async fn get_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<Option<RemoteSubscription>, BillingError> {
        let response = self
            .http_client
            .get(self.url(&format!("/v1/subscriptions/{}", subscription_id)))
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .send()
            .await
            .map_err(|e| BillingError::network(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let sub: StripeSubscription = Self::parse(response).await?;
        Ok(Some(Self::to_remote(sub)))
    }

    async fn cancel_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<RemoteSubscription, BillingError> {
        let response = self
            .http_client
            .delete(self.url(&format!("/v1/subscriptions/{}", subscription_id)))
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .send()
            .await
            .map_err(|e| BillingError::network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let sub: StripeSubscription = Self::parse(response).await?;
        Ok(Self::to_remote(sub))
    }
}
