//! DeleteShelterHandler - removes a shelter.

use std::sync::Arc;

use crate::domain::foundation::{AuthenticatedUser, DomainError, ErrorCode, ShelterId};
use crate::ports::ShelterRepository;

use super::may_manage;

/// Command to delete a shelter.
#[derive(Debug, Clone)]
pub struct DeleteShelterCommand {
    pub actor: AuthenticatedUser,
    pub shelter_id: ShelterId,
}

/// Handler for shelter deletion.
pub struct DeleteShelterHandler {
    shelters: Arc<dyn ShelterRepository>,
}

impl DeleteShelterHandler {
    pub fn new(shelters: Arc<dyn ShelterRepository>) -> Self {
        Self { shelters }
    }

    pub async fn handle(&self, cmd: DeleteShelterCommand) -> Result<(), DomainError> {
        let shelter = self
            .shelters
            .find_by_id(&cmd.shelter_id)
            .await?
            .ok_or_else(|| DomainError::new(ErrorCode::ShelterNotFound, "Shelter not found"))?;

        if !may_manage(&shelter, &cmd.actor) {
            return Err(DomainError::new(
                ErrorCode::Forbidden,
                "Not authorized to manage this shelter",
            ));
        }

        self.shelters.delete(&shelter.id).await?;
        tracing::info!(shelter_id = %shelter.id, "Shelter deleted");
        Ok(())
    }
}
