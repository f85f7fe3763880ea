//! Role-based authority.
//!
//! Roles are a closed enumeration rather than free-form strings, and
//! authorization checks go through capabilities instead of comparing
//! role names at call sites.

use serde::{Deserialize, Serialize};

use super::ValidationError;

/// A role held by a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Regular platform user.
    User,

    /// Platform administrator.
    Admin,
}

/// An action a role may or may not grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Modify or delete any shelter, regardless of ownership.
    ManageAnyShelter,
}

impl Role {
    /// Returns true if this role grants the capability.
    pub fn grants(&self, capability: Capability) -> bool {
        match (self, capability) {
            (Role::Admin, Capability::ManageAnyShelter) => true,
            (Role::User, _) => false,
        }
    }

    /// Parse a role from its stored string form.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(ValidationError::invalid_format(
                "role",
                format!("unknown role '{}'", other),
            )),
        }
    }

    /// Stored string form of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

/// Returns true if any role in the set grants the capability.
pub fn any_grants(roles: &[Role], capability: Capability) -> bool {
    roles.iter().any(|r| r.grants(capability))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_can_manage_any_shelter() {
        assert!(Role::Admin.grants(Capability::ManageAnyShelter));
    }

    #[test]
    fn user_cannot_manage_any_shelter() {
        assert!(!Role::User.grants(Capability::ManageAnyShelter));
    }

    #[test]
    fn role_roundtrips_through_str() {
        for role in [Role::User, Role::Admin] {
            assert_eq!(Role::parse(role.as_str()).unwrap(), role);
        }
    }

    #[test]
    fn unknown_role_fails_to_parse() {
        assert!(Role::parse("superuser").is_err());
    }

    #[test]
    fn any_grants_checks_across_set() {
        assert!(any_grants(
            &[Role::User, Role::Admin],
            Capability::ManageAnyShelter
        ));
        assert!(!any_grants(&[Role::User], Capability::ManageAnyShelter));
    }
}
