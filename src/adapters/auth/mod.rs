//! Authentication adapters: argon2 password hashing and JWT issuing.

mod jwt_issuer;
mod password;

pub use jwt_issuer::JwtTokenIssuer;
pub use password::Argon2PasswordHasher;
