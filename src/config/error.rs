//! Configuration error types.

use thiserror::Error;

/// Errors while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

/// Errors while validating configuration values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid Stripe API key (expected sk_ prefix)")]
    InvalidStripeKey,

    #[error("Invalid Stripe webhook secret (expected whsec_ prefix)")]
    InvalidStripeWebhookSecret,

    #[error("JWT secret must be at least 32 bytes")]
    WeakJwtSecret,

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}
