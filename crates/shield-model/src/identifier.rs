//! # Identifiers
//!
//! Every record id (account, DDA, ticket, ticket item, ticket error,
//! provider) is a 32-character alphanumeric token. The format is enforced
//! here; uniqueness belongs to storage.

use std::fmt;

use serde::{Deserialize, Serialize};
use shield_core::{Input, ValidationVerdict};
use thiserror::Error;
use uuid::Uuid;

use crate::catalog;

/// A validated 32-character record identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Identifier(String);

/// A string that is not a valid identifier.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("identifier is not valid:\n{0}")]
pub struct IdentifierError(pub ValidationVerdict);

impl Identifier {
    /// Validate a raw token.
    pub fn new(raw: impl Into<String>) -> Result<Self, IdentifierError> {
        let raw = raw.into();
        let verdict = catalog::IDENTIFIER.check(Input::Text(&raw));
        if verdict.is_valid() {
            Ok(Self(raw))
        } else {
            Err(IdentifierError(verdict))
        }
    }

    /// Produce a fresh random identifier (UUID v4, hyphens removed).
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Wrap a token that already passed an identifier chain.
    pub(crate) fn from_validated(raw: &str) -> Self {
        Self(raw.to_string())
    }

    /// The token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for Identifier {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_identifiers_are_valid_and_distinct() {
        let a = Identifier::generate();
        let b = Identifier::generate();
        assert_eq!(a.as_str().len(), 32);
        assert!(Identifier::new(a.as_str()).is_ok());
        assert_ne!(a, b);
    }

    #[test]
    fn boundary_lengths() {
        assert!(Identifier::new("a".repeat(31)).is_err());
        assert!(Identifier::new("a".repeat(32)).is_ok());
        assert!(Identifier::new("a".repeat(33)).is_err());
    }

    #[test]
    fn uuid_with_hyphens_is_rejected() {
        let hyphenated = Uuid::new_v4().to_string();
        assert!(Identifier::new(hyphenated).is_err());
    }

    #[test]
    fn serde_is_a_plain_string() {
        let id = Identifier::new("0123456789abcdef0123456789abcdef").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"0123456789abcdef0123456789abcdef\"");
        let back: Identifier = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn deserialize_validates() {
        let result: Result<Identifier, _> = serde_json::from_str("\"short\"");
        assert!(result.is_err());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn only_32_alphanumerics_are_accepted(s in "[a-zA-Z0-9]{0,40}") {
                prop_assert_eq!(Identifier::new(s.clone()).is_ok(), s.len() == 32);
            }
        }
    }
}
