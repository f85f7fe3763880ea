//! Stripe billing gateway adapter.

mod gateway;
mod mock;
mod wire;

pub use gateway::{StripeBillingGateway, StripeConfig};
pub use mock::MockBillingGateway;
