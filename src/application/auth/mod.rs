//! Authentication commands and queries.

mod login;
mod profile;
mod register;

pub use login::{LoginCommand, LoginHandler};
pub use profile::{CurrentUserHandler, CurrentUserQuery, UpdateProfileCommand, UpdateProfileHandler};
pub use register::{RegisterCommand, RegisterHandler};

use crate::domain::user::User;

/// A freshly issued token plus the user it belongs to.
#[derive(Debug, Clone)]
pub struct AuthPayload {
    pub token: String,
    pub user: User,
}
