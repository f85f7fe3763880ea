//! Processed webhook event store.
//!
//! Records every webhook event id that has been handled so that
//! at-least-once redelivery is absorbed without reapplying effects.
//!
//! # Race Condition Handling
//!
//! When the same event is delivered concurrently, the first `save` wins
//! (primary key on event id); the loser observes `AlreadyExists` and
//! treats the event as already processed.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::DomainError;

/// How a recorded event was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventOutcome {
    /// The event mutated local state.
    Applied,

    /// The event was acknowledged without effect (unknown type, unknown
    /// subscription id, terminal record).
    Ignored,

    /// Handling failed after signature verification.
    Failed,
}

/// A processed webhook event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEventRecord {
    /// Provider event id (evt_xxx). Primary key.
    pub event_id: String,

    /// Provider event type string.
    pub event_type: String,

    /// How the event was handled.
    pub outcome: EventOutcome,

    /// Failure or ignore reason, when there is one.
    pub detail: Option<String>,

    /// When the event was processed.
    pub processed_at: DateTime<Utc>,
}

impl WebhookEventRecord {
    /// Record a successfully applied event.
    pub fn applied(event_id: &str, event_type: &str) -> Self {
        Self {
            event_id: event_id.to_string(),
            event_type: event_type.to_string(),
            outcome: EventOutcome::Applied,
            detail: None,
            processed_at: Utc::now(),
        }
    }

    /// Record an acknowledged-but-ignored event.
    pub fn ignored(event_id: &str, event_type: &str, reason: impl Into<String>) -> Self {
        Self {
            event_id: event_id.to_string(),
            event_type: event_type.to_string(),
            outcome: EventOutcome::Ignored,
            detail: Some(reason.into()),
            processed_at: Utc::now(),
        }
    }

    /// Record a failed event.
    pub fn failed(event_id: &str, event_type: &str, error: impl Into<String>) -> Self {
        Self {
            event_id: event_id.to_string(),
            event_type: event_type.to_string(),
            outcome: EventOutcome::Failed,
            detail: Some(error.into()),
            processed_at: Utc::now(),
        }
    }
}

/// Result of saving a webhook event record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveResult {
    /// The record was inserted; this delivery won the race.
    Inserted,

    /// A record with this event id already exists.
    AlreadyExists,
}

/// Persistence port for processed webhook events.
#[async_trait]
pub trait WebhookEventRepository: Send + Sync {
    /// Look up a record by provider event id.
    async fn find_by_event_id(
        &self,
        event_id: &str,
    ) -> Result<Option<WebhookEventRecord>, DomainError>;

    /// Save a record, tolerating concurrent duplicates.
    async fn save(&self, record: WebhookEventRecord) -> Result<SaveResult, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applied_record_has_no_detail() {
        let record = WebhookEventRecord::applied("evt_1", "invoice.paid");
        assert_eq!(record.outcome, EventOutcome::Applied);
        assert!(record.detail.is_none());
    }

    #[test]
    fn ignored_record_keeps_reason() {
        let record = WebhookEventRecord::ignored("evt_1", "charge.refunded", "unhandled type");
        assert_eq!(record.outcome, EventOutcome::Ignored);
        assert_eq!(record.detail.as_deref(), Some("unhandled type"));
    }
}
