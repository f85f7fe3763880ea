//! Shelter commands and queries.

mod create_shelter;
mod delete_shelter;
mod queries;
mod update_shelter;

pub use create_shelter::{CreateShelterCommand, CreateShelterHandler};
pub use delete_shelter::{DeleteShelterCommand, DeleteShelterHandler};
pub use queries::{GetShelterHandler, GetShelterQuery, ListSheltersHandler};
pub use update_shelter::{UpdateShelterCommand, UpdateShelterHandler};

use crate::domain::foundation::{any_grants, AuthenticatedUser, Capability};
use crate::domain::shelter::Shelter;

/// Owner-or-admin check shared by update and delete.
fn may_manage(shelter: &Shelter, actor: &AuthenticatedUser) -> bool {
    shelter.is_owned_by(&actor.user_id) || any_grants(&actor.roles, Capability::ManageAnyShelter)
}
