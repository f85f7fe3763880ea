//! Token issuer port.

use crate::domain::foundation::{AuthError, AuthenticatedUser};
use crate::domain::user::User;

/// Issues and validates bearer credentials encoding identity and roles.
pub trait TokenIssuer: Send + Sync {
    /// Issue a signed token for the user.
    fn issue(&self, user: &User) -> Result<String, AuthError>;

    /// Validate a token and return the identity it encodes.
    fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}
