//! Shelter aggregate entity.
//!
//! A shelter is the subject of subscriptions. Each shelter carries up to
//! three Stripe price references, one per subscription tier, used to map a
//! requested tier to a billable item and to map a remote price id back to
//! a tier when webhook events report plan changes.
//!
//! # Invariants
//!
//! - The tier -> price mapping is unambiguous: a price id may be configured
//!   for at most one tier.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, ErrorCode, ShelterId, Timestamp, UserId, ValidationError};
use crate::domain::subscription::Tier;

/// Shelter aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shelter {
    /// Unique identifier for this shelter.
    pub id: ShelterId,

    /// Shelter name.
    pub name: String,

    /// Short description shown to donors.
    pub description: String,

    /// Physical address.
    pub address: String,

    /// User who owns and manages this shelter.
    pub owner_id: UserId,

    /// Stripe price id for the basic tier.
    pub price_basic: Option<String>,

    /// Stripe price id for the standard tier.
    pub price_standard: Option<String>,

    /// Stripe price id for the premium tier.
    pub price_premium: Option<String>,

    /// When the shelter was created.
    pub created_at: Timestamp,

    /// When the shelter was last updated.
    pub updated_at: Timestamp,
}

impl Shelter {
    /// Creates a new shelter owned by the given user.
    pub fn create(
        id: ShelterId,
        owner_id: UserId,
        name: impl Into<String>,
        description: impl Into<String>,
        address: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::empty_field("name"));
        }

        let now = Timestamp::now();
        Ok(Self {
            id,
            name,
            description: description.into(),
            address: address.into(),
            owner_id,
            price_basic: None,
            price_standard: None,
            price_premium: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Updates the descriptive fields.
    pub fn update_details(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        address: impl Into<String>,
    ) -> Result<(), ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        self.name = name;
        self.description = description.into();
        self.address = address.into();
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Configures the Stripe price reference for a tier.
    ///
    /// # Errors
    ///
    /// Returns an error if the price id is already configured for a
    /// different tier; the reverse mapping must stay unambiguous.
    pub fn set_price_reference(
        &mut self,
        tier: Tier,
        price_id: impl Into<String>,
    ) -> Result<(), DomainError> {
        let price_id = price_id.into();
        if let Some(existing) = self.tier_for_price(&price_id) {
            if existing != tier {
                return Err(DomainError::new(
                    ErrorCode::ConfigurationError,
                    format!(
                        "Price {} is already configured for the {} tier",
                        price_id, existing
                    ),
                ));
            }
        }
        match tier {
            Tier::Basic => self.price_basic = Some(price_id),
            Tier::Standard => self.price_standard = Some(price_id),
            Tier::Premium => self.price_premium = Some(price_id),
        }
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Returns the Stripe price id configured for the tier, if any.
    pub fn price_for_tier(&self, tier: Tier) -> Option<&str> {
        match tier {
            Tier::Basic => self.price_basic.as_deref(),
            Tier::Standard => self.price_standard.as_deref(),
            Tier::Premium => self.price_premium.as_deref(),
        }
    }

    /// Maps a Stripe price id back to the tier it is configured for.
    ///
    /// Returns `None` if the price id matches none of the three configured
    /// references; callers must leave the tier unchanged in that case.
    pub fn tier_for_price(&self, price_id: &str) -> Option<Tier> {
        if self.price_basic.as_deref() == Some(price_id) {
            Some(Tier::Basic)
        } else if self.price_standard.as_deref() == Some(price_id) {
            Some(Tier::Standard)
        } else if self.price_premium.as_deref() == Some(price_id) {
            Some(Tier::Premium)
        } else {
            None
        }
    }

    /// Returns true if the given user owns this shelter.
    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.owner_id == user_id
    }
}
