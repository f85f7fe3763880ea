//! Subscription domain - the local ledger of paid user-to-shelter
//! relationships and the machinery that keeps it consistent with Stripe.

mod aggregate;
mod errors;
mod status;
mod stripe_event;
mod tier;
mod webhook_verifier;

pub use aggregate::Subscription;
pub use errors::SubscriptionError;
pub use status::SubscriptionStatus;
pub use stripe_event::{
    StripeEvent, StripeEventData, StripeEventType, StripeInvoiceObject, StripeSubscriptionObject,
};
pub use tier::Tier;
pub use webhook_verifier::{SignatureHeader, StripeWebhookVerifier};

#[cfg(test)]
pub use stripe_event::StripeEventBuilder;
#[cfg(test)]
pub use webhook_verifier::sign_test_payload;
