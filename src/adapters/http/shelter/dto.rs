//! Request and response bodies for shelter endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ShelterId, UserId};
use crate::domain::shelter::Shelter;

/// POST/PUT shelter body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShelterRequest {
    pub name: String,
    pub description: String,
    pub address: String,
    #[serde(default)]
    pub price_basic: Option<String>,
    #[serde(default)]
    pub price_standard: Option<String>,
    #[serde(default)]
    pub price_premium: Option<String>,
}

/// Shelter details returned by shelter endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShelterResponse {
    pub id: ShelterId,
    pub name: String,
    pub description: String,
    pub address: String,
    pub owner_id: UserId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_basic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_standard: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_premium: Option<String>,
}

impl From<Shelter> for ShelterResponse {
    fn from(shelter: Shelter) -> Self {
        Self {
            id: shelter.id,
            name: shelter.name,
            description: shelter.description,
            address: shelter.address,
            owner_id: shelter.owner_id,
            price_basic: shelter.price_basic,
            price_standard: shelter.price_standard,
            price_premium: shelter.price_premium,
        }
    }
}
