//! Shelter read queries.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, ShelterId};
use crate::domain::shelter::Shelter;
use crate::ports::ShelterRepository;

/// Query for one shelter by id.
#[derive(Debug, Clone)]
pub struct GetShelterQuery {
    pub shelter_id: ShelterId,
}

/// Handler for the single-shelter query.
pub struct GetShelterHandler {
    shelters: Arc<dyn ShelterRepository>,
}

impl GetShelterHandler {
    pub fn new(shelters: Arc<dyn ShelterRepository>) -> Self {
        Self { shelters }
    }

    pub async fn handle(&self, query: GetShelterQuery) -> Result<Shelter, DomainError> {
        self.shelters
            .find_by_id(&query.shelter_id)
            .await?
            .ok_or_else(|| DomainError::new(ErrorCode::ShelterNotFound, "Shelter not found"))
    }
}

/// Handler for listing all shelters.
pub struct ListSheltersHandler {
    shelters: Arc<dyn ShelterRepository>,
}

impl ListSheltersHandler {
    pub fn new(shelters: Arc<dyn ShelterRepository>) -> Self {
        Self { shelters }
    }

    pub async fn handle(&self) -> Result<Vec<Shelter>, DomainError> {
        self.shelters.list_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryShelterRepository;
    use crate::domain::foundation::UserId;

    #[tokio::test]
    async fn get_returns_shelter_or_not_found() {
        let shelters = Arc::new(InMemoryShelterRepository::new());
        let shelter =
            Shelter::create(ShelterId::new(), UserId::new(), "S", "d", "a").unwrap();
        shelters.save(&shelter).await.unwrap();

        let handler = GetShelterHandler::new(shelters);
        let found = handler
            .handle(GetShelterQuery {
                shelter_id: shelter.id,
            })
            .await
            .unwrap();
        assert_eq!(found.id, shelter.id);

        let missing = handler
            .handle(GetShelterQuery {
                shelter_id: ShelterId::new(),
            })
            .await;
        assert_eq!(missing.unwrap_err().code, ErrorCode::ShelterNotFound);
    }

    #[tokio::test]
    async fn list_returns_all() {
        let shelters = Arc::new(InMemoryShelterRepository::new());
        for name in ["A", "B", "C"] {
            let shelter =
                Shelter::create(ShelterId::new(), UserId::new(), name, "d", "a").unwrap();
            shelters.save(&shelter).await.unwrap();
        }

        let all = ListSheltersHandler::new(shelters).handle().await.unwrap();
        assert_eq!(all.len(), 3);
    }
}
