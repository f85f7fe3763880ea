//! Auth endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{LoginRequest, RegisterRequest, TokenResponse, UpdateProfileRequest, UserResponse};
pub use routes::routes;
