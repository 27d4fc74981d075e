//! Data provider identifiers.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A supported open-data provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    /// U.S. Energy Information Administration Open Data API (v2).
    Eia,
    /// Federal Reserve Economic Data (St. Louis Fed).
    Fred,
    /// Yahoo Finance chart data.
    Yahoo,
}

impl ProviderId {
    /// Returns the lowercase identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Eia => "eia",
            Self::Fred => "fred",
            Self::Yahoo => "yahoo",
        }
    }

    /// Returns all providers.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Eia, Self::Fred, Self::Yahoo]
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = ProviderParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "eia" => Ok(Self::Eia),
            "fred" => Ok(Self::Fred),
            "yahoo" | "yfinance" => Ok(Self::Yahoo),
            _ => Err(ProviderParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an unknown provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderParseError(String);

impl std::fmt::Display for ProviderParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown provider '{}', expected one of: eia, fred, yahoo", self.0)
    }
}

impl std::error::Error for ProviderParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_parse() {
        assert_eq!("FRED".parse::<ProviderId>().unwrap(), ProviderId::Fred);
        assert_eq!("yfinance".parse::<ProviderId>().unwrap(), ProviderId::Yahoo);
        assert!("bls".parse::<ProviderId>().is_err());
    }

    #[test]
    fn test_provider_serde() {
        let json = serde_json::to_string(&ProviderId::Eia).unwrap();
        assert_eq!(json, "\"eia\"");
    }
}
