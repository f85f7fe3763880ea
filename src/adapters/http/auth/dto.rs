//! Request and response bodies for auth endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Role, UserId};
use crate::domain::user::User;

/// POST /api/auth/register body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub username: String,
    pub password: String,
}

/// POST /api/auth/login body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// PUT /api/auth/me body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub name: Option<String>,
}

/// User details returned by auth endpoints. Never includes the hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub username: String,
    pub roles: Vec<Role>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            username: user.username,
            roles: user.roles,
        }
    }
}

/// Token plus user, returned on register and login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token: String,
    pub user: UserResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_response_omits_password_hash() {
        let user = User::register(
            UserId::new(),
            "Jess",
            "jess@example.com",
            "jess",
            "$argon2id$secret-hash",
        )
        .unwrap();

        let json = serde_json::to_string(&UserResponse::from(user)).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(json.contains("\"username\":\"jess\""));
    }
}
