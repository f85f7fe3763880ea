//! UpdateShelterHandler - edits a shelter's details and price references.

use std::sync::Arc;

use crate::domain::foundation::{AuthenticatedUser, DomainError, ErrorCode, ShelterId};
use crate::domain::shelter::Shelter;
use crate::domain::subscription::Tier;
use crate::ports::ShelterRepository;

use super::may_manage;

/// Command to update a shelter.
#[derive(Debug, Clone)]
pub struct UpdateShelterCommand {
    pub actor: AuthenticatedUser,
    pub shelter_id: ShelterId,
    pub name: String,
    pub description: String,
    pub address: String,
    pub price_basic: Option<String>,
    pub price_standard: Option<String>,
    pub price_premium: Option<String>,
}

/// Handler for shelter updates.
pub struct UpdateShelterHandler {
    shelters: Arc<dyn ShelterRepository>,
}

impl UpdateShelterHandler {
    pub fn new(shelters: Arc<dyn ShelterRepository>) -> Self {
        Self { shelters }
    }

    pub async fn handle(&self, cmd: UpdateShelterCommand) -> Result<Shelter, DomainError> {
        let mut shelter = self
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

        shelter.update_details(cmd.name, cmd.description, cmd.address)?;
        if let Some(price) = cmd.price_basic {
            shelter.set_price_reference(Tier::Basic, price)?;
        }
        if let Some(price) = cmd.price_standard {
            shelter.set_price_reference(Tier::Standard, price)?;
        }
        if let Some(price) = cmd.price_premium {
            shelter.set_price_reference(Tier::Premium, price)?;
        }

        self.shelters.update(&shelter).await?;
        Ok(shelter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryShelterRepository;
    use crate::domain::foundation::{Role, UserId};

    async fn seeded() -> (Arc<InMemoryShelterRepository>, Shelter) {
        let shelters = Arc::new(InMemoryShelterRepository::new());
        let shelter = Shelter::create(
            ShelterId::new(),
            UserId::new(),
            "Paws Haven",
            "desc",
            "addr",
        )
        .unwrap();
        shelters.save(&shelter).await.unwrap();
        (shelters, shelter)
    }

    fn command(actor: AuthenticatedUser, shelter_id: ShelterId) -> UpdateShelterCommand {
        UpdateShelterCommand {
            actor,
            shelter_id,
            name: "Paws Haven II".to_string(),
            description: "bigger".to_string(),
            address: "14 Bark St".to_string(),
            price_basic: Some("pb_new".to_string()),
            price_standard: None,
            price_premium: None,
        }
    }

    #[tokio::test]
    async fn owner_can_update() {
        let (shelters, shelter) = seeded().await;
        let actor = AuthenticatedUser::new(shelter.owner_id, "owner", vec![Role::User]);

        let updated = UpdateShelterHandler::new(shelters)
            .handle(command(actor, shelter.id))
            .await
            .unwrap();

        assert_eq!(updated.name, "Paws Haven II");
        assert_eq!(updated.price_for_tier(Tier::Basic), Some("pb_new"));
    }

    #[tokio::test]
    async fn admin_can_update_any_shelter() {
        let (shelters, shelter) = seeded().await;
        let actor = AuthenticatedUser::new(UserId::new(), "root", vec![Role::Admin]);

        let result = UpdateShelterHandler::new(shelters)
            .handle(command(actor, shelter.id))
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn stranger_is_forbidden() {
        let (shelters, shelter) = seeded().await;
        let actor = AuthenticatedUser::new(UserId::new(), "stranger", vec![Role::User]);

        let result = UpdateShelterHandler::new(shelters.clone())
            .handle(command(actor, shelter.id))
            .await;

        assert_eq!(result.unwrap_err().code, ErrorCode::Forbidden);
        let stored = shelters.find_by_id(&shelter.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Paws Haven");
    }

    #[tokio::test]
    async fn missing_shelter_is_not_found() {
        let shelters = Arc::new(InMemoryShelterRepository::new());
        let actor = AuthenticatedUser::new(UserId::new(), "u", vec![Role::User]);

        let result = UpdateShelterHandler::new(shelters)
            .handle(command(actor, ShelterId::new()))
            .await;

        assert_eq!(result.unwrap_err().code, ErrorCode::ShelterNotFound);
    }
}
