//! PostgreSQL implementation of SubscriptionRepository.
//!
//! Updates are compare-and-swap on the version column: the UPDATE is
//! predicated on the caller's version and bumps it, so concurrent writers
//! observe `StaleVersion` instead of overwriting each other.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{
    DomainError, ErrorCode, ShelterId, SubscriptionId, Timestamp, UserId,
};
use crate::domain::subscription::{Subscription, SubscriptionStatus, Tier};
use crate::ports::SubscriptionRepository;

/// PostgreSQL implementation of the SubscriptionRepository port.
pub struct PostgresSubscriptionRepository {
    pool: PgPool,
}

impl PostgresSubscriptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a subscription.
#[derive(Debug, sqlx::FromRow)]
struct SubscriptionRow {
    id: Uuid,
    user_id: Uuid,
    shelter_id: Uuid,
    stripe_subscription_id: Option<String>,
    tier: String,
    status: String,
    period_start: NaiveDate,
    period_end: NaiveDate,
    amount_cents: i64,
    version: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<SubscriptionRow> for Subscription {
    type Error = DomainError;

    fn try_from(row: SubscriptionRow) -> Result<Self, Self::Error> {
        let tier = Tier::parse(&row.tier)
            .map_err(|e| DomainError::new(ErrorCode::DatabaseError, e.to_string()))?;
        let status = SubscriptionStatus::from_remote(&row.status).ok_or_else(|| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid status value: {}", row.status),
            )
        })?;

        Ok(Subscription {
            id: SubscriptionId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            shelter_id: ShelterId::from_uuid(row.shelter_id),
            stripe_subscription_id: row.stripe_subscription_id,
            tier,
            status,
            period_start: row.period_start,
            period_end: row.period_end,
            amount_cents: row.amount_cents,
            version: row.version,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

const SELECT_SUBSCRIPTION: &str = r#"
    SELECT id, user_id, shelter_id, stripe_subscription_id, tier, status,
           period_start, period_end, amount_cents, version, created_at, updated_at
    FROM subscriptions
"#;

#[async_trait]
impl SubscriptionRepository for PostgresSubscriptionRepository {
    async fn save(&self, subscription: &Subscription) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO subscriptions (
                id, user_id, shelter_id, stripe_subscription_id, tier, status,
                period_start, period_end, amount_cents, version, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(subscription.id.as_uuid())
        .bind(subscription.user_id.as_uuid())
        .bind(subscription.shelter_id.as_uuid())
        .bind(&subscription.stripe_subscription_id)
        .bind(subscription.tier.as_str())
        .bind(subscription.status.as_str())
        .bind(subscription.period_start)
        .bind(subscription.period_end)
        .bind(subscription.amount_cents)
        .bind(subscription.version)
        .bind(subscription.created_at.as_datetime())
        .bind(subscription.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("subscriptions_open_per_shelter_idx") {
                    return DomainError::new(
                        ErrorCode::SubscriptionExists,
                        "An open subscription to this shelter already exists",
                    );
                }
            }
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to save subscription: {}", e),
            )
        })?;

        Ok(())
    }

    async fn update(&self, subscription: &Subscription) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE subscriptions SET
                stripe_subscription_id = $3,
                tier = $4,
                status = $5,
                period_start = $6,
                period_end = $7,
                amount_cents = $8,
                updated_at = $9,
                version = version + 1
            WHERE id = $1 AND version = $2
            "#,
        )
        .bind(subscription.id.as_uuid())
        .bind(subscription.version)
        .bind(&subscription.stripe_subscription_id)
        .bind(subscription.tier.as_str())
        .bind(subscription.status.as_str())
        .bind(subscription.period_start)
        .bind(subscription.period_end)
        .bind(subscription.amount_cents)
        .bind(subscription.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to update subscription: {}", e),
            )
        })?;

        if result.rows_affected() == 0 {
            // Distinguish a stale version from a missing row.
            let exists: Option<(Uuid,)> =
                sqlx::query_as("SELECT id FROM subscriptions WHERE id = $1")
                    .bind(subscription.id.as_uuid())
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(|e| {
                        DomainError::new(ErrorCode::DatabaseError, e.to_string())
                    })?;
            return Err(if exists.is_some() {
                DomainError::new(
                    ErrorCode::StaleVersion,
                    "Subscription was modified concurrently",
                )
            } else {
                DomainError::new(ErrorCode::SubscriptionNotFound, "Subscription not found")
            });
        }

        Ok(())
    }

    async fn find_by_id(&self, id: &SubscriptionId) -> Result<Option<Subscription>, DomainError> {
        let row: Option<SubscriptionRow> =
            sqlx::query_as(&format!("{} WHERE id = $1", SELECT_SUBSCRIPTION))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::new(
                        ErrorCode::DatabaseError,
                        format!("Failed to find subscription: {}", e),
                    )
                })?;

        row.map(Subscription::try_from).transpose()
    }

    async fn find_all_by_user(&self, user_id: &UserId) -> Result<Vec<Subscription>, DomainError> {
        let rows: Vec<SubscriptionRow> =
            sqlx::query_as(&format!("{} WHERE user_id = $1", SELECT_SUBSCRIPTION))
                .bind(user_id.as_uuid())
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::new(
                        ErrorCode::DatabaseError,
                        format!("Failed to list subscriptions: {}", e),
                    )
                })?;

        rows.into_iter().map(Subscription::try_from).collect()
    }

    async fn find_by_stripe_subscription_id(
        &self,
        stripe_subscription_id: &str,
    ) -> Result<Option<Subscription>, DomainError> {
        let row: Option<SubscriptionRow> = sqlx::query_as(&format!(
            "{} WHERE stripe_subscription_id = $1",
            SELECT_SUBSCRIPTION
        ))
        .bind(stripe_subscription_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to find subscription: {}", e),
            )
        })?;

        row.map(Subscription::try_from).transpose()
    }

    async fn find_open_by_user_and_shelter(
        &self,
        user_id: &UserId,
        shelter_id: &ShelterId,
    ) -> Result<Option<Subscription>, DomainError> {
        let row: Option<SubscriptionRow> = sqlx::query_as(&format!(
            "{} WHERE user_id = $1 AND shelter_id = $2 AND status <> 'canceled'",
            SELECT_SUBSCRIPTION
        ))
        .bind(user_id.as_uuid())
        .bind(shelter_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to find subscription: {}", e),
            )
        })?;

        row.map(Subscription::try_from).transpose()
    }
}
