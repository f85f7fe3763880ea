//! PostgreSQL adapter implementations.

mod shelter_repository;
mod subscription_repository;
mod user_repository;
mod webhook_event_repository;

pub use shelter_repository::PostgresShelterRepository;
pub use subscription_repository::PostgresSubscriptionRepository;
pub use user_repository::PostgresUserRepository;
pub use webhook_event_repository::PostgresWebhookEventRepository;
