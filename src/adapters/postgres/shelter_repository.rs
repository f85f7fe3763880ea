//! PostgreSQL implementation of ShelterRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, ShelterId, Timestamp, UserId};
use crate::domain::shelter::Shelter;
use crate::ports::ShelterRepository;

/// PostgreSQL implementation of the ShelterRepository port.
pub struct PostgresShelterRepository {
    pool: PgPool,
}

impl PostgresShelterRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a shelter.
#[derive(Debug, sqlx::FromRow)]
struct ShelterRow {
    id: Uuid,
    name: String,
    description: String,
    address: String,
    owner_id: Uuid,
    price_basic: Option<String>,
    price_standard: Option<String>,
    price_premium: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ShelterRow> for Shelter {
    fn from(row: ShelterRow) -> Self {
        Shelter {
            id: ShelterId::from_uuid(row.id),
            name: row.name,
            description: row.description,
            address: row.address,
            owner_id: UserId::from_uuid(row.owner_id),
            price_basic: row.price_basic,
            price_standard: row.price_standard,
            price_premium: row.price_premium,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        }
    }
}

const SELECT_SHELTER: &str = r#"
    SELECT id, name, description, address, owner_id,
           price_basic, price_standard, price_premium, created_at, updated_at
    FROM shelters
"#;

#[async_trait]
impl ShelterRepository for PostgresShelterRepository {
    async fn save(&self, shelter: &Shelter) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO shelters (
                id, name, description, address, owner_id,
                price_basic, price_standard, price_premium, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(shelter.id.as_uuid())
        .bind(&shelter.name)
        .bind(&shelter.description)
        .bind(&shelter.address)
        .bind(shelter.owner_id.as_uuid())
        .bind(&shelter.price_basic)
        .bind(&shelter.price_standard)
        .bind(&shelter.price_premium)
        .bind(shelter.created_at.as_datetime())
        .bind(shelter.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to save shelter: {}", e))
        })?;

        Ok(())
    }

    async fn update(&self, shelter: &Shelter) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE shelters SET
                name = $2,
                description = $3,
                address = $4,
                price_basic = $5,
                price_standard = $6,
                price_premium = $7,
                updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(shelter.id.as_uuid())
        .bind(&shelter.name)
        .bind(&shelter.description)
        .bind(&shelter.address)
        .bind(&shelter.price_basic)
        .bind(&shelter.price_standard)
        .bind(&shelter.price_premium)
        .bind(shelter.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to update shelter: {}", e))
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(ErrorCode::ShelterNotFound, "Shelter not found"));
        }

        Ok(())
    }

    async fn delete(&self, id: &ShelterId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM shelters WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Failed to delete shelter: {}", e))
            })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(ErrorCode::ShelterNotFound, "Shelter not found"));
        }

        Ok(())
    }

    async fn find_by_id(&self, id: &ShelterId) -> Result<Option<Shelter>, DomainError> {
        let row: Option<ShelterRow> = sqlx::query_as(&format!("{} WHERE id = $1", SELECT_SHELTER))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Failed to find shelter: {}", e))
            })?;

        Ok(row.map(Shelter::from))
    }

    async fn list_all(&self) -> Result<Vec<Shelter>, DomainError> {
        let rows: Vec<ShelterRow> = sqlx::query_as(&format!("{} ORDER BY created_at", SELECT_SHELTER))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Failed to list shelters: {}", e))
            })?;

        Ok(rows.into_iter().map(Shelter::from).collect())
    }
}
