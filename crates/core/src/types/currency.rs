//! ISO-4217-like currency codes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a currency code fails shape validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid currency code: {0:?}")]
pub struct InvalidCurrency(pub String);

/// A 3-letter uppercase currency code (e.g. "USD", "EUR").
///
/// The engine never converts between currencies and treats the code as
/// opaque, so any well-formed code passes through untouched. Only the
/// shape is validated, which keeps wire garbage from masquerading as a
/// currency.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Validate and normalize a currency code.
    ///
    /// Accepts exactly three ASCII letters (any case, surrounding
    /// whitespace ignored) and stores them uppercased.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCurrency`] for anything else.
    pub fn new(code: &str) -> Result<Self, InvalidCurrency> {
        let trimmed = code.trim();
        if trimmed.len() == 3 && trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(Self(trimmed.to_ascii_uppercase()))
        } else {
            Err(InvalidCurrency(code.to_string()))
        }
    }

    /// The fallback currency assumed when a source omits one.
    #[must_use]
    pub fn usd() -> Self {
        Self("USD".to_string())
    }

    /// Get the underlying code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::usd()
    }
}

impl std::fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for CurrencyCode {
    type Err = InvalidCurrency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl<'de> Deserialize<'de> for CurrencyCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let code = String::deserialize(deserializer)?;
        Self::new(&code).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_codes_uppercase() {
        assert_eq!(CurrencyCode::new("usd").expect("valid").as_str(), "USD");
        assert_eq!(CurrencyCode::new(" EUR ").expect("valid").as_str(), "EUR");
        // Unknown but well-formed codes pass through
        assert_eq!(CurrencyCode::new("jpy").expect("valid").as_str(), "JPY");
    }

    #[test]
    fn test_invalid_codes_rejected() {
        assert!(CurrencyCode::new("").is_err());
        assert!(CurrencyCode::new("US").is_err());
        assert!(CurrencyCode::new("DOLLARS").is_err());
        assert!(CurrencyCode::new("U$D").is_err());
        assert!(CurrencyCode::new("123").is_err());
    }

    #[test]
    fn test_default_is_usd() {
        assert_eq!(CurrencyCode::default(), CurrencyCode::usd());
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Result<CurrencyCode, _> = serde_json::from_str("\"gbp\"");
        assert_eq!(ok.expect("valid").as_str(), "GBP");

        let bad: Result<CurrencyCode, _> = serde_json::from_str("\"not-a-code\"");
        assert!(bad.is_err());
    }
}
