//! Ports - async traits at the seams of the application.
//!
//! Adapters (Postgres, Stripe, JWT, argon2) implement these; application
//! handlers depend only on the traits.

mod billing_gateway;
mod password_hasher;
mod shelter_repository;
mod subscription_repository;
mod token_issuer;
mod user_repository;
mod webhook_event_repository;

pub use billing_gateway::{
    BillingError, BillingErrorKind, BillingGateway, CreateCustomerRequest,
    CreateSubscriptionRequest, RemoteCustomer, RemoteSubscription,
};
pub use password_hasher::PasswordHasher;
pub use shelter_repository::ShelterRepository;
pub use subscription_repository::SubscriptionRepository;
pub use token_issuer::TokenIssuer;
pub use user_repository::UserRepository;
pub use webhook_event_repository::{
    EventOutcome, SaveResult, WebhookEventRecord, WebhookEventRepository,
};
