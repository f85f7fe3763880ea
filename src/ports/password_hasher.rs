//! Password hashing port.

use crate::domain::foundation::DomainError;

/// Hashes and verifies login passwords.
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password.
    fn hash(&self, password: &str) -> Result<String, DomainError>;

    /// Verify a plaintext password against a stored hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, DomainError>;
}
