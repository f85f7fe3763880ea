//! Request and response bodies for subscription endpoints.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ShelterId, SubscriptionId, UserId};
use crate::domain::subscription::{Subscription, SubscriptionStatus, Tier};

/// POST /api/subscriptions body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeRequest {
    pub shelter_id: ShelterId,
    pub tier: Tier,
    pub payment_method_id: String,
}

/// Summary of the subscribing user embedded in responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: UserId,
    pub name: String,
    pub username: String,
}

/// Summary of the subscribed shelter embedded in responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShelterSummary {
    pub id: ShelterId,
    pub name: String,
}

/// Subscription details returned by subscription endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionResponse {
    pub id: SubscriptionId,
    pub user: UserSummary,
    pub shelter: ShelterSummary,
    pub amount_cents: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub tier: Tier,
    pub status: SubscriptionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
}

impl SubscriptionResponse {
    pub fn new(
        subscription: &Subscription,
        user: UserSummary,
        shelter: ShelterSummary,
        client_secret: Option<String>,
    ) -> Self {
        Self {
            id: subscription.id,
            user,
            shelter,
            amount_cents: subscription.amount_cents,
            start_date: subscription.period_start,
            end_date: subscription.period_end,
            tier: subscription.tier,
            status: subscription.status,
            client_secret,
        }
    }
}
