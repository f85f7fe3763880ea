//! Subscription-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | NotFound | 404 |
//! | Forbidden | 403 |
//! | Conflict | 409 |
//! | ConfigurationError | 400 |
//! | Billing | 502 |
//! | InvalidSignature | 400 |
//! | TerminalState | 409 |
//! | ValidationFailed | 400 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{DomainError, ErrorCode, ShelterId, SubscriptionId};
use crate::domain::subscription::Tier;

/// Errors raised by subscription operations and webhook processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// The subscription (or a referenced user/shelter) was not found.
    NotFound(String),

    /// The actor does not own the subscription.
    Forbidden(SubscriptionId),

    /// The user already holds an active subscription to this shelter.
    Conflict(ShelterId),

    /// The shelter has no Stripe price configured for the requested tier.
    ConfigurationError { shelter_id: ShelterId, tier: Tier },

    /// A call to the billing gateway failed.
    Billing { reason: String },

    /// Webhook signature verification failed.
    InvalidSignature(String),

    /// The subscription is in a terminal state and cannot change.
    TerminalState(SubscriptionId),

    /// Request validation failed.
    ValidationFailed { field: String, message: String },

    /// Infrastructure error (database, serialization).
    Infrastructure(String),
}

impl SubscriptionError {
    pub fn not_found(what: impl Into<String>) -> Self {
        SubscriptionError::NotFound(what.into())
    }

    pub fn forbidden(id: SubscriptionId) -> Self {
        SubscriptionError::Forbidden(id)
    }

    pub fn conflict(shelter_id: ShelterId) -> Self {
        SubscriptionError::Conflict(shelter_id)
    }

    pub fn configuration(shelter_id: ShelterId, tier: Tier) -> Self {
        SubscriptionError::ConfigurationError { shelter_id, tier }
    }

    pub fn billing(reason: impl Into<String>) -> Self {
        SubscriptionError::Billing {
            reason: reason.into(),
        }
    }

    pub fn invalid_signature(reason: impl Into<String>) -> Self {
        SubscriptionError::InvalidSignature(reason.into())
    }

    pub fn terminal(id: SubscriptionId) -> Self {
        SubscriptionError::TerminalState(id)
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        SubscriptionError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        SubscriptionError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            SubscriptionError::NotFound(_) => ErrorCode::SubscriptionNotFound,
            SubscriptionError::Forbidden(_) => ErrorCode::Forbidden,
            SubscriptionError::Conflict(_) => ErrorCode::SubscriptionExists,
            SubscriptionError::ConfigurationError { .. } => ErrorCode::ConfigurationError,
            SubscriptionError::Billing { .. } => ErrorCode::BillingError,
            SubscriptionError::InvalidSignature(_) => ErrorCode::InvalidWebhookSignature,
            SubscriptionError::TerminalState(_) => ErrorCode::TerminalState,
            SubscriptionError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            SubscriptionError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-friendly error message.
    pub fn message(&self) -> String {
        match self {
            SubscriptionError::NotFound(what) => format!("{} not found", what),
            SubscriptionError::Forbidden(id) => {
                format!("Not authorized to manage subscription {}", id)
            }
            SubscriptionError::Conflict(shelter_id) => {
                format!("An active subscription to shelter {} already exists", shelter_id)
            }
            SubscriptionError::ConfigurationError { shelter_id, tier } => format!(
                "Shelter {} has no price configured for the {} tier",
                shelter_id, tier
            ),
            SubscriptionError::Billing { reason } => {
                format!("Billing provider call failed: {}", reason)
            }
            SubscriptionError::InvalidSignature(reason) => {
                format!("Webhook signature verification failed: {}", reason)
            }
            SubscriptionError::TerminalState(id) => {
                format!("Subscription {} is canceled and cannot change", id)
            }
            SubscriptionError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            SubscriptionError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for SubscriptionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for SubscriptionError {}

impl From<DomainError> for SubscriptionError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::UserNotFound => SubscriptionError::not_found("User"),
            ErrorCode::ShelterNotFound => SubscriptionError::not_found("Shelter"),
            ErrorCode::SubscriptionNotFound => SubscriptionError::not_found("Subscription"),
            _ => SubscriptionError::infrastructure(err.to_string()),
        }
    }
}
