//! User aggregate entity.
//!
//! A registered platform user who can own shelters and subscribe to them.
//!
//! # Design Decisions
//!
//! - **Lazy billing customer**: the Stripe customer id is created on first
//!   subscription attempt and reused thereafter. At most one per user.
//! - **Closed role set**: roles are the [`Role`] enum, never raw strings.
//! - **Password hash only**: the aggregate never holds a plaintext password.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, ErrorCode, Role, Timestamp, UserId, ValidationError};

/// User aggregate.
///
/// # Invariants
///
/// - `email` and `username` are unique (database constraint)
/// - `stripe_customer_id` is written at most once
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for this user.
    pub id: UserId,

    /// Display name.
    pub name: String,

    /// Email address, unique across the platform.
    pub email: String,

    /// Login name, unique across the platform.
    pub username: String,

    /// Argon2 password hash.
    pub password_hash: String,

    /// Roles held by this user.
    pub roles: Vec<Role>,

    /// Stripe customer id, created lazily on first subscription attempt.
    pub stripe_customer_id: Option<String>,

    /// When the user registered.
    pub created_at: Timestamp,

    /// When the user was last updated.
    pub updated_at: Timestamp,
}

impl User {
    /// Registers a new user with the default role.
    ///
    /// # Errors
    ///
    /// Returns a validation error if any required field is empty.
    pub fn register(
        id: UserId,
        name: impl Into<String>,
        email: impl Into<String>,
        username: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        let email = email.into();
        let username = username.into();

        if name.trim().is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        if username.trim().is_empty() {
            return Err(ValidationError::empty_field("username"));
        }
        if !email.contains('@') {
            return Err(ValidationError::invalid_format("email", "missing @ symbol"));
        }

        let now = Timestamp::now();
        Ok(Self {
            id,
            name,
            email,
            username,
            password_hash: password_hash.into(),
            roles: vec![Role::User],
            stripe_customer_id: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Records the billing customer id created for this user.
    ///
    /// # Errors
    ///
    /// Returns an error if a customer id is already attached; the id is
    /// created exactly once and never replaced.
    pub fn attach_billing_customer(&mut self, customer_id: impl Into<String>) -> Result<(), DomainError> {
        if let Some(existing) = &self.stripe_customer_id {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("User already has billing customer {}", existing),
            ));
        }
        self.stripe_customer_id = Some(customer_id.into());
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Updates the display name.
    pub fn rename(&mut self, name: impl Into<String>) -> Result<(), ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        self.name = name;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Returns true if this user holds the given role.
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> User {
        User::register(
            UserId::new(),
            "Jess Park",
            "jess@example.com",
            "jess",
            "$argon2id$stub",
        )
        .unwrap()
    }

    #[test]
    fn register_assigns_default_role() {
        let user = test_user();
        assert_eq!(user.roles, vec![Role::User]);
        assert!(user.stripe_customer_id.is_none());
    }

    #[test]
    fn register_rejects_empty_name() {
        let result = User::register(UserId::new(), "", "a@b.com", "ab", "hash");
        assert!(result.is_err());
    }

    #[test]
    fn register_rejects_malformed_email() {
        let result = User::register(UserId::new(), "Al", "not-an-email", "al", "hash");
        assert!(result.is_err());
    }

    #[test]
    fn attach_billing_customer_once() {
        let mut user = test_user();
        user.attach_billing_customer("cus_123").unwrap();
        assert_eq!(user.stripe_customer_id.as_deref(), Some("cus_123"));
    }

    #[test]
    fn attach_billing_customer_twice_fails() {
        let mut user = test_user();
        user.attach_billing_customer("cus_123").unwrap();
        let result = user.attach_billing_customer("cus_456");
        assert!(result.is_err());
        // First id is kept
        assert_eq!(user.stripe_customer_id.as_deref(), Some("cus_123"));
    }

    #[test]
    fn rename_updates_name() {
        let mut user = test_user();
        user.rename("Jess P.").unwrap();
        assert_eq!(user.name, "Jess P.");
    }

    #[test]
    fn rename_rejects_empty() {
        let mut user = test_user();
        assert!(user.rename("  ").is_err());
    }
}
