//! Subscription commands and queries.

mod handle_webhook;
mod list_by_user;
mod subscribe;
mod unsubscribe;

pub use handle_webhook::{HandleWebhookCommand, HandleWebhookHandler, WebhookOutcome};
pub use list_by_user::{ListSubscriptionsHandler, ListSubscriptionsQuery};
pub use subscribe::{SubscribeCommand, SubscribeHandler, SubscribeResult};
pub use unsubscribe::{UnsubscribeCommand, UnsubscribeHandler};
