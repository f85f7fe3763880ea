//! CreateShelterHandler - registers a shelter owned by the actor.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ShelterId, UserId};
use crate::domain::shelter::Shelter;
use crate::domain::subscription::Tier;
use crate::ports::ShelterRepository;

/// Command to create a shelter.
#[derive(Debug, Clone)]
pub struct CreateShelterCommand {
    pub owner_id: UserId,
    pub name: String,
    pub description: String,
    pub address: String,
    /// Optional per-tier Stripe price references.
    pub price_basic: Option<String>,
    pub price_standard: Option<String>,
    pub price_premium: Option<String>,
}

/// Handler for shelter creation.
pub struct CreateShelterHandler {
    shelters: Arc<dyn ShelterRepository>,
}

impl CreateShelterHandler {
    pub fn new(shelters: Arc<dyn ShelterRepository>) -> Self {
        Self { shelters }
    }

    pub async fn handle(&self, cmd: CreateShelterCommand) -> Result<Shelter, DomainError> {
        let mut shelter = Shelter::create(
            ShelterId::new(),
            cmd.owner_id,
            cmd.name,
            cmd.description,
            cmd.address,
        )?;

        if let Some(price) = cmd.price_basic {
            shelter.set_price_reference(Tier::Basic, price)?;
        }
        if let Some(price) = cmd.price_standard {
            shelter.set_price_reference(Tier::Standard, price)?;
        }
        if let Some(price) = cmd.price_premium {
            shelter.set_price_reference(Tier::Premium, price)?;
        }

        self.shelters.save(&shelter).await?;
        tracing::info!(shelter_id = %shelter.id, owner_id = %cmd.owner_id, "Shelter created");
        Ok(shelter)
    }
}
