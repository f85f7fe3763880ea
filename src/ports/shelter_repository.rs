//! Shelter repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ShelterId};
use crate::domain::shelter::Shelter;

/// Persistence port for the Shelter aggregate.
#[async_trait]
pub trait ShelterRepository: Send + Sync {
    /// Persist a new shelter.
    async fn save(&self, shelter: &Shelter) -> Result<(), DomainError>;

    /// Update an existing shelter.
    async fn update(&self, shelter: &Shelter) -> Result<(), DomainError>;

    /// Delete a shelter.
    async fn delete(&self, id: &ShelterId) -> Result<(), DomainError>;

    /// Find a shelter by id.
    async fn find_by_id(&self, id: &ShelterId) -> Result<Option<Shelter>, DomainError>;

    /// List all shelters.
    async fn list_all(&self) -> Result<Vec<Shelter>, DomainError>;
}
