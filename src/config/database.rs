//! Database configuration.

use serde::Deserialize;

use super::error::ValidationError;

/// PostgreSQL connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Connection URL (postgres://...).
    pub url: String,

    /// Connection pool size.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

impl DatabaseConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.url.is_empty() {
            return Err(ValidationError::MissingRequired("DATABASE_URL"));
        }
        if !self.url.starts_with("postgres://") && !self.url.starts_with("postgresql://") {
            return Err(ValidationError::InvalidValue {
                field: "database.url",
                reason: "expected a postgres:// URL".to_string(),
            });
        }
        if self.max_connections == 0 {
            return Err(ValidationError::InvalidValue {
                field: "database.max_connections",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn postgres_url_is_valid() {
        let config = DatabaseConfig {
            url: "postgres://localhost/fanimal".to_string(),
            max_connections: 5,
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn non_postgres_url_is_rejected() {
        let config = DatabaseConfig {
            url: "mysql://localhost/fanimal".to_string(),
            max_connections: 5,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_pool_size_is_rejected() {
        let config = DatabaseConfig {
            url: "postgres://localhost/fanimal".to_string(),
            max_connections: 0,
        };
        assert!(config.validate().is_err());
    }
}
