//! Subscription tier definitions.
//!
//! Three fixed tiers, each bound to a monthly price. Money is i64 cents.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

/// Subscription tier, ordered from lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Entry-level donation tier.
    Basic,

    /// Mid-level donation tier.
    Standard,

    /// Top donation tier.
    Premium,
}

impl Tier {
    /// Monthly price of this tier in cents.
    pub fn price_cents(&self) -> i64 {
        match self {
            Tier::Basic => 999,
            Tier::Standard => 1499,
            Tier::Premium => 1999,
        }
    }

    /// Returns the display name for this tier.
    pub fn display_name(&self) -> &'static str {
        match self {
            Tier::Basic => "Basic",
            Tier::Standard => "Standard",
            Tier::Premium => "Premium",
        }
    }

    /// Stored string form of the tier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Basic => "basic",
            Tier::Standard => "standard",
            Tier::Premium => "premium",
        }
    }

    /// Parse a tier from its stored string form.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s {
            "basic" => Ok(Tier::Basic),
            "standard" => Ok(Tier::Standard),
            "premium" => Ok(Tier::Premium),
            other => Err(ValidationError::invalid_format(
                "tier",
                format!("unknown tier '{}'", other),
            )),
        }
    }

    /// All tiers in ascending order.
    pub fn all() -> [Tier; 3] {
        [Tier::Basic, Tier::Standard, Tier::Premium]
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_are_ordered() {
        assert!(Tier::Basic < Tier::Standard);
        assert!(Tier::Standard < Tier::Premium);
    }

    #[test]
    fn prices_increase_with_tier() {
        assert!(Tier::Basic.price_cents() < Tier::Standard.price_cents());
        assert!(Tier::Standard.price_cents() < Tier::Premium.price_cents());
    }

    #[test]
    fn tier_roundtrips_through_str() {
        for tier in Tier::all() {
            assert_eq!(Tier::parse(tier.as_str()).unwrap(), tier);
        }
    }

    #[test]
    fn tier_serializes_lowercase() {
        let json = serde_json::to_string(&Tier::Standard).unwrap();
        assert_eq!(json, "\"standard\"");
    }

    #[test]
    fn unknown_tier_fails_to_parse() {
        assert!(Tier::parse("platinum").is_err());
    }
}
