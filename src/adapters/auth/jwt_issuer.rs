//! JWT implementation of the token issuer port.
//!
//! HS256 tokens carrying the user id as subject plus username and roles
//! as custom claims. Expiry is validated on decode.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AuthError, AuthenticatedUser, Role, UserId};
use crate::domain::user::User;
use crate::ports::TokenIssuer;

/// Claims encoded into issued tokens.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Subject: the user id.
    sub: String,
    /// Login name.
    username: String,
    /// Roles held at issue time.
    roles: Vec<Role>,
    /// Expiry (Unix seconds).
    exp: i64,
    /// Issued-at (Unix seconds).
    iat: i64,
}

/// HS256 token issuer.
pub struct JwtTokenIssuer {
    secret: SecretString,
    expiration_secs: i64,
}

impl JwtTokenIssuer {
    /// Create an issuer with the signing secret and token lifetime.
    pub fn new(secret: impl Into<String>, expiration_secs: i64) -> Self {
        Self {
            secret: SecretString::new(secret.into()),
            expiration_secs,
        }
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue(&self, user: &User) -> Result<String, AuthError> {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            roles: user.roles.clone(),
            exp: now + self.expiration_secs,
            iat: now,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.expose_secret().as_bytes()),
        )
        .map_err(|e| AuthError::IssueFailed(e.to_string()))
    }

    fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.expose_secret().as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        })?;

        let user_id: UserId = data
            .claims
            .sub
            .parse()
            .map_err(|_| AuthError::InvalidToken)?;

        Ok(AuthenticatedUser::new(
            user_id,
            data.claims.username,
            data.claims.roles,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> User {
        User::register(
            UserId::new(),
            "Jess",
            "jess@example.com",
            "jess",
            "$argon2id$stub",
        )
        .unwrap()
    }

    #[test]
    fn issue_and_validate_roundtrip() {
        let issuer = JwtTokenIssuer::new("test-secret", 3600);
        let user = test_user();

        let token = issuer.issue(&user).unwrap();
        let identity = issuer.validate(&token).unwrap();

        assert_eq!(identity.user_id, user.id);
        assert_eq!(identity.username, "jess");
        assert_eq!(identity.roles, vec![Role::User]);
    }

    #[test]
    fn expired_token_is_rejected() {
        let issuer = JwtTokenIssuer::new("test-secret", -120);
        let token = issuer.issue(&test_user()).unwrap();

        assert_eq!(issuer.validate(&token), Err(AuthError::TokenExpired));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let issuer = JwtTokenIssuer::new("secret-a", 3600);
        let token = issuer.issue(&test_user()).unwrap();

        let other = JwtTokenIssuer::new("secret-b", 3600);
        assert_eq!(other.validate(&token), Err(AuthError::InvalidToken));
    }

    #[test]
    fn garbage_token_is_rejected() {
        let issuer = JwtTokenIssuer::new("test-secret", 3600);
        assert_eq!(
            issuer.validate("not.a.token"),
            Err(AuthError::InvalidToken)
        );
    }
}
