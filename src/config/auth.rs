//! Authentication configuration.

use serde::Deserialize;

use super::error::ValidationError;

/// JWT configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret.
    pub jwt_secret: String,

    /// Token lifetime in seconds.
    #[serde(default = "default_expiration")]
    pub jwt_expiration_secs: i64,
}

fn default_expiration() -> i64 {
    24 * 60 * 60
}

impl AuthConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.jwt_secret.is_empty() {
            return Err(ValidationError::MissingRequired("JWT_SECRET"));
        }
        if self.jwt_secret.len() < 32 {
            return Err(ValidationError::WeakJwtSecret);
        }
        if self.jwt_expiration_secs <= 0 {
            return Err(ValidationError::InvalidValue {
                field: "auth.jwt_expiration_secs",
                reason: "must be positive".to_string(),
            });
        }
        Ok(())
    }
}
