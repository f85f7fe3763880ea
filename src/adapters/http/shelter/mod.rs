//! Shelter endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{ShelterRequest, ShelterResponse};
pub use routes::routes;
