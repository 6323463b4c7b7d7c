//! # Error Types
//!
//! Every entity has its own error enum, defined next to the entity, whose
//! variants name the offending field and carry its
//! [`ValidationVerdict`](shield_core::ValidationVerdict). This module holds
//! the shared pieces: the closed-set parse error and the top-level
//! [`ModelError`] that wraps them all for callers that handle records
//! generically.

use thiserror::Error;

use crate::account::{AccountError, AccountFlagsError, AuthenticationError};
use crate::dda::DdaError;
use crate::forensic::{ForensicArchiveError, ForensicHashError};
use crate::identifier::IdentifierError;
use crate::log::LogError;
use crate::settings::ConfigError;
use crate::ticket::{TicketError, TicketErrorReportError};
use crate::ticket_item::{TicketItemError, TicketItemOutcomeError};
use crate::whitelist::WhitelistError;

/// A raw value that is not a member of a closed enumeration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind}: {value:?}")]
pub struct UnknownVariant {
    /// Name of the enumeration, e.g. `account role`.
    pub kind: &'static str,
    /// The rejected raw value, rendered as text.
    pub value: String,
}

impl UnknownVariant {
    /// Create an error for a rejected raw value.
    pub fn new(kind: &'static str, value: impl ToString) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Top-level error type for the data model.
#[derive(Error, Debug)]
pub enum ModelError {
    /// Account construction failed.
    #[error("account: {0}")]
    Account(#[from] AccountError),

    /// Credentials construction failed.
    #[error("authentication: {0}")]
    Authentication(#[from] AuthenticationError),

    /// Account flag bag rejected.
    #[error("account flags: {0}")]
    AccountFlags(#[from] AccountFlagsError),

    /// DDA construction failed.
    #[error("dda: {0}")]
    Dda(#[from] DdaError),

    /// Ticket construction failed.
    #[error("ticket: {0}")]
    Ticket(#[from] TicketError),

    /// Ticket error report construction failed.
    #[error("ticket error report: {0}")]
    TicketErrorReport(#[from] TicketErrorReportError),

    /// Ticket item construction failed.
    #[error("ticket item: {0}")]
    TicketItem(#[from] TicketItemError),

    /// Processed/unprocessed report construction failed.
    #[error("ticket item outcome: {0}")]
    TicketItemOutcome(#[from] TicketItemOutcomeError),

    /// Whitelist item construction failed.
    #[error("whitelist: {0}")]
    Whitelist(#[from] WhitelistError),

    /// Forensic archive construction failed.
    #[error("forensic archive: {0}")]
    ForensicArchive(#[from] ForensicArchiveError),

    /// Forensic hash construction failed.
    #[error("forensic hash: {0}")]
    ForensicHash(#[from] ForensicHashError),

    /// Log record construction failed.
    #[error("log: {0}")]
    Log(#[from] LogError),

    /// Identifier rejected.
    #[error("identifier: {0}")]
    Identifier(#[from] IdentifierError),

    /// Closed-set parse failed.
    #[error(transparent)]
    UnknownVariant(#[from] UnknownVariant),

    /// Settings could not be loaded or are inconsistent.
    #[error("settings: {0}")]
    Config(#[from] ConfigError),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_variant_display() {
        let err = UnknownVariant::new("account role", 999);
        assert_eq!(err.to_string(), "unknown account role: \"999\"");
    }

    #[test]
    fn model_error_wraps_unknown_variant_transparently() {
        let err: ModelError = UnknownVariant::new("ticket status", "gone").into();
        assert_eq!(err.to_string(), "unknown ticket status: \"gone\"");
    }
}
