//! Mock billing gateway for tests and local development.
//!
//! Records every call and serves configurable remote subscription state,
//! so handler tests can assert on what reached the provider without any
//! network traffic.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::ports::{
    BillingError, BillingGateway, CreateCustomerRequest, CreateSubscriptionRequest,
    RemoteCustomer, RemoteSubscription,
};

#[derive(Default)]
struct MockState {
    next_id: u32,
    created_customers: Vec<CreateCustomerRequest>,
    attached_payment_methods: Vec<(String, String)>,
    created_subscriptions: Vec<CreateSubscriptionRequest>,
    canceled_subscriptions: Vec<String>,
    remote_subscriptions: HashMap<String, RemoteSubscription>,
    fail_create_subscription: bool,
    fail_cancel_subscription: bool,
}

/// In-memory stand-in for the Stripe gateway.
#[derive(Default)]
pub struct MockBillingGateway {
    state: Mutex<MockState>,
}

impl MockBillingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve the given remote subscription from `get_subscription`.
    pub fn with_remote_subscription(self, sub: RemoteSubscription) -> Self {
        self.set_remote_subscription(sub);
        self
    }

    /// Replace (or insert) the remote subscription served for its id.
    pub fn set_remote_subscription(&self, sub: RemoteSubscription) {
        self.state
            .lock()
            .unwrap()
            .remote_subscriptions
            .insert(sub.id.clone(), sub);
    }

    /// Make the next `create_subscription` call fail.
    pub fn failing_create_subscription(self) -> Self {
        self.state.lock().unwrap().fail_create_subscription = true;
        self
    }

    /// Make the next `cancel_subscription` call fail.
    pub fn failing_cancel_subscription(self) -> Self {
        self.state.lock().unwrap().fail_cancel_subscription = true;
        self
    }

    /// Number of customers created through this gateway.
    pub fn created_customer_count(&self) -> usize {
        self.state.lock().unwrap().created_customers.len()
    }

    /// Subscription create requests that reached the provider.
    pub fn created_subscriptions(&self) -> Vec<CreateSubscriptionRequest> {
        self.state.lock().unwrap().created_subscriptions.clone()
    }

    /// Remote subscription ids canceled through this gateway.
    pub fn canceled_subscriptions(&self) -> Vec<String> {
        self.state.lock().unwrap().canceled_subscriptions.clone()
    }

    /// Payment methods attached, as (customer_id, payment_method_id).
    pub fn attached_payment_methods(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().attached_payment_methods.clone()
    }
}

#[async_trait]
impl BillingGateway for MockBillingGateway {
    async fn create_customer(
        &self,
        request: CreateCustomerRequest,
    ) -> Result<RemoteCustomer, BillingError> {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = format!("cus_mock_{}", state.next_id);
        let email = request.email.clone();
        state.created_customers.push(request);
        Ok(RemoteCustomer {
            id,
            email: Some(email),
        })
    }

    async fn get_customer(
        &self,
        customer_id: &str,
    ) -> Result<Option<RemoteCustomer>, BillingError> {
        Ok(Some(RemoteCustomer {
            id: customer_id.to_string(),
            email: None,
        }))
    }

    async fn attach_payment_method(
        &self,
        customer_id: &str,
        payment_method_id: &str,
    ) -> Result<(), BillingError> {
        self.state
            .lock()
            .unwrap()
            .attached_payment_methods
            .push((customer_id.to_string(), payment_method_id.to_string()));
        Ok(())
    }

    async fn create_subscription(
        &self,
        request: CreateSubscriptionRequest,
    ) -> Result<RemoteSubscription, BillingError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_create_subscription {
            return Err(BillingError::api("402: card declined"));
        }
        state.next_id += 1;
        let sub = RemoteSubscription {
            id: format!("sub_mock_{}", state.next_id),
            customer_id: request.customer_id.clone(),
            status: "incomplete".to_string(),
            current_period_start: 1_704_067_200,
            current_period_end: 1_706_745_600,
            price_id: Some(request.price_id.clone()),
            client_secret: Some("pi_mock_secret".to_string()),
        };
        state.created_subscriptions.push(request);
        state
            .remote_subscriptions
            .insert(sub.id.clone(), sub.clone());
        Ok(sub)
    }

    async fn get_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<Option<RemoteSubscription>, BillingError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .remote_subscriptions
            .get(subscription_id)
            .cloned())
    }

    async fn cancel_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<RemoteSubscription, BillingError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_cancel_subscription {
            return Err(BillingError::network("connection reset by peer"));
        }
        state.canceled_subscriptions.push(subscription_id.to_string());
        let sub = state
            .remote_subscriptions
            .entry(subscription_id.to_string())
            .or_insert_with(|| RemoteSubscription {
                id: subscription_id.to_string(),
                customer_id: "cus_mock_unknown".to_string(),
                status: "canceled".to_string(),
                current_period_start: 1_704_067_200,
                current_period_end: 1_706_745_600,
                price_id: None,
                client_secret: None,
            });
        sub.status = "canceled".to_string();
        Ok(sub.clone())
    }
}
