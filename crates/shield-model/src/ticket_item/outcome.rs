//! Provider reports on a ticket item.
//!
//! Unlike [`TicketItem`](super::TicketItem), a report carries no genre, so
//! its value passes when it is any of an FQDN, an IPv4 or an IPv6 address.
//! An empty `timestamp` or `note` counts as omitted.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use shield_core::{Check, FieldError, FieldSpec, Input, Presence, RuleChain, Schema, ValidationVerdict};
use thiserror::Error;

use crate::catalog;
use crate::identifier::Identifier;
use crate::raw::{supplied, RawField, RawSlot, RawText};
use crate::status::TicketItemStatus;
use crate::Export;

closed_set! {
    /// Why a provider did not act on an item.
    pub enum UnprocessedReason("unprocessed reason") {
        /// The target was blocked before this ticket.
        AlreadyBlocked => "ALREADY_BLOCKED",
        /// The provider gave no reason.
        Undefined => "UNDEFINED",
        /// The provider does not know why.
        Unknown => "UNKNOWN",
    }
}

/// Error constructing a [`TicketItemProcessed`] or [`TicketItemUnprocessed`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TicketItemOutcomeError {
    /// `provider_id` failed its chain.
    #[error("provider identifier is not valid:\n{0}")]
    InvalidProviderId(ValidationVerdict),

    /// The value is none of FQDN, IPv4, IPv6.
    #[error("ticket item value is not valid:\n{0}")]
    InvalidValue(ValidationVerdict),

    /// `reason` was not supplied.
    #[error("unprocessed reason is not valid:\n{0}")]
    InvalidReason(ValidationVerdict),

    /// `reason` is not an [`UnprocessedReason`].
    #[error(transparent)]
    UnknownReason(#[from] crate::UnknownVariant),

    /// `timestamp` is not ISO 8601.
    #[error("timestamp is not valid:\n{0}")]
    InvalidTimestamp(ValidationVerdict),

    /// `note` failed its chain.
    #[error("note is not valid:\n{0}")]
    InvalidNote(ValidationVerdict),
}

impl FieldError for TicketItemOutcomeError {
    fn verdict(&self) -> Option<&ValidationVerdict> {
        match self {
            Self::InvalidProviderId(v)
            | Self::InvalidValue(v)
            | Self::InvalidReason(v)
            | Self::InvalidTimestamp(v)
            | Self::InvalidNote(v) => Some(v),
            Self::UnknownReason(_) => None,
        }
    }
}

const VALUE_CHAINS: &[&RuleChain] =
    &[&catalog::ticket::FQDN, &catalog::ticket::IPV4, &catalog::ticket::IPV6];

const PROVIDER: FieldSpec<TicketItemOutcomeError> = FieldSpec {
    name: "provider_id",
    check: Check::Chain(&catalog::account::ACCOUNT_ID),
    presence: Presence::Required,
    error: TicketItemOutcomeError::InvalidProviderId,
};

const VALUE: FieldSpec<TicketItemOutcomeError> = FieldSpec {
    name: "value",
    check: Check::AnyOf(VALUE_CHAINS),
    presence: Presence::Required,
    error: TicketItemOutcomeError::InvalidValue,
};

const TIMESTAMP: FieldSpec<TicketItemOutcomeError> = FieldSpec {
    name: "timestamp",
    check: Check::Chain(&catalog::ticket_item::TIMESTAMP),
    presence: Presence::Optional,
    error: TicketItemOutcomeError::InvalidTimestamp,
};

const NOTE: FieldSpec<TicketItemOutcomeError> = FieldSpec {
    name: "note",
    check: Check::Chain(&catalog::ticket_item::NOTE),
    presence: Presence::Optional,
    error: TicketItemOutcomeError::InvalidNote,
};

static PROCESSED: Schema<TicketItemOutcomeError> =
    Schema::new("ticket_item_processed", &[PROVIDER, VALUE, TIMESTAMP, NOTE]);

/// Fields up to the reason, which is parsed before the optional tail.
static UNPROCESSED_HEAD: Schema<TicketItemOutcomeError> = Schema::new(
    "ticket_item_unprocessed",
    &[
        PROVIDER,
        VALUE,
        FieldSpec {
            name: "reason",
            check: Check::Chain(&catalog::ticket_item::REASON),
            presence: Presence::Required,
            error: TicketItemOutcomeError::InvalidReason,
        },
    ],
);

static UNPROCESSED_TAIL: Schema<TicketItemOutcomeError> =
    Schema::new("ticket_item_unprocessed", &[TIMESTAMP, NOTE]);

/// Accepts RFC 3339 (normalised to UTC) or a naive ISO 8601 date-time.
fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.naive_utc())
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()
}

/// Unvalidated processed report fields.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawTicketItemProcessed {
    /// Reporting provider.
    pub provider_id: Option<RawField<String>>,
    /// FQDN, IPv4 or IPv6 target.
    pub value: Option<RawField<String>>,
    /// When the provider acted.
    pub timestamp: Option<RawField<String>>,
    /// Provider's free text.
    pub note: Option<RawField<String>>,
}

impl RawTicketItemProcessed {
    fn inputs(&self) -> [(&'static str, Input<'_>); 4] {
        [
            ("provider_id", self.provider_id.input()),
            ("value", self.value.input()),
            ("timestamp", self.timestamp.input()),
            ("note", self.note.input()),
        ]
    }
}

/// A provider's confirmation that an item was blocked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketItemProcessed {
    provider_id: Identifier,
    value: String,
    status: TicketItemStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<String>,
}

impl TicketItemProcessed {
    /// Validate and build a processed report.
    pub fn new(
        provider_id: &str,
        value: &str,
        timestamp: Option<&str>,
        note: Option<&str>,
    ) -> Result<Self, TicketItemOutcomeError> {
        Self::from_raw(&RawTicketItemProcessed {
            provider_id: supplied(provider_id),
            value: supplied(value),
            timestamp: timestamp.map(RawField::from),
            note: note.map(RawField::from),
        })
    }

    /// Validate raw fields, failing on the first offending one.
    pub fn from_raw(raw: &RawTicketItemProcessed) -> Result<Self, TicketItemOutcomeError> {
        PROCESSED.construct(&raw.inputs(), || {
            Ok(Self {
                provider_id: Identifier::from_validated(raw.provider_id.text()),
                value: raw.value.text().to_string(),
                status: TicketItemStatus::Processed,
                timestamp: raw.timestamp.non_empty(),
                note: raw.note.non_empty(),
            })
        })
    }

    /// Every field error, in declaration order.
    pub fn audit(raw: &RawTicketItemProcessed) -> Vec<TicketItemOutcomeError> {
        PROCESSED.validate_all(&raw.inputs())
    }

    /// Field declarations, in validation order.
    pub fn schema() -> &'static Schema<TicketItemOutcomeError> {
        &PROCESSED
    }

    /// Reporting provider.
    pub fn provider_id(&self) -> &Identifier {
        &self.provider_id
    }

    /// Target value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Item status the report moves to.
    pub fn status(&self) -> TicketItemStatus {
        self.status
    }

    /// When the provider acted, as supplied.
    pub fn timestamp(&self) -> Option<&str> {
        self.timestamp.as_deref()
    }

    /// The timestamp as a UTC date-time.
    pub fn parsed_timestamp(&self) -> Option<NaiveDateTime> {
        self.timestamp.as_deref().and_then(parse_timestamp)
    }

    /// Provider's free text.
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }
}

impl_validating_deserialize!(TicketItemProcessed, RawTicketItemProcessed, |raw| {
    TicketItemProcessed::from_raw(&raw)
});

impl Export for TicketItemProcessed {}

/// Unvalidated unprocessed report fields.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawTicketItemUnprocessed {
    /// Reporting provider.
    pub provider_id: Option<RawField<String>>,
    /// FQDN, IPv4 or IPv6 target.
    pub value: Option<RawField<String>>,
    /// Wire spelling of an [`UnprocessedReason`].
    pub reason: Option<RawField<String>>,
    /// When the provider looked at the item.
    pub timestamp: Option<RawField<String>>,
    /// Provider's free text.
    pub note: Option<RawField<String>>,
}

impl RawTicketItemUnprocessed {
    fn inputs(&self) -> [(&'static str, Input<'_>); 5] {
        [
            ("provider_id", self.provider_id.input()),
            ("value", self.value.input()),
            ("reason", self.reason.input()),
            ("timestamp", self.timestamp.input()),
            ("note", self.note.input()),
        ]
    }

    fn reason(&self) -> Result<UnprocessedReason, TicketItemOutcomeError> {
        Ok(self.reason.rendered().parse()?)
    }
}

/// A provider's statement that an item was not blocked, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketItemUnprocessed {
    provider_id: Identifier,
    value: String,
    status: TicketItemStatus,
    reason: UnprocessedReason,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<String>,
}

impl TicketItemUnprocessed {
    /// Validate and build an unprocessed report.
    pub fn new(
        provider_id: &str,
        value: &str,
        reason: &str,
        timestamp: Option<&str>,
        note: Option<&str>,
    ) -> Result<Self, TicketItemOutcomeError> {
        Self::from_raw(&RawTicketItemUnprocessed {
            provider_id: supplied(provider_id),
            value: supplied(value),
            reason: supplied(reason),
            timestamp: timestamp.map(RawField::from),
            note: note.map(RawField::from),
        })
    }

    /// Check fields up to `reason`, parse it, then check the tail.
    pub fn from_raw(raw: &RawTicketItemUnprocessed) -> Result<Self, TicketItemOutcomeError> {
        let inputs = raw.inputs();
        UNPROCESSED_HEAD.validate(&inputs)?;
        let reason = raw.reason()?;

        UNPROCESSED_TAIL.construct(&inputs, || {
            Ok(Self {
                provider_id: Identifier::from_validated(raw.provider_id.text()),
                value: raw.value.text().to_string(),
                status: TicketItemStatus::Unprocessed,
                reason,
                timestamp: raw.timestamp.non_empty(),
                note: raw.note.non_empty(),
            })
        })
    }

    /// Every error, in declaration order.
    pub fn audit(raw: &RawTicketItemUnprocessed) -> Vec<TicketItemOutcomeError> {
        let inputs = raw.inputs();
        let mut errors = UNPROCESSED_HEAD.validate_all(&inputs);
        if !raw.reason.input().is_empty() {
            if let Err(e) = raw.reason() {
                errors.push(e);
            }
        }
        errors.extend(UNPROCESSED_TAIL.validate_all(&inputs));
        errors
    }

    /// Fields up to `reason`, then the optional tail.
    pub fn schemas() -> [&'static Schema<TicketItemOutcomeError>; 2] {
        [&UNPROCESSED_HEAD, &UNPROCESSED_TAIL]
    }

    /// Reporting provider.
    pub fn provider_id(&self) -> &Identifier {
        &self.provider_id
    }

    /// Target value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Item status the report moves to.
    pub fn status(&self) -> TicketItemStatus {
        self.status
    }

    /// Why the item was not blocked.
    pub fn reason(&self) -> UnprocessedReason {
        self.reason
    }

    /// When the provider acted, as supplied.
    pub fn timestamp(&self) -> Option<&str> {
        self.timestamp.as_deref()
    }

    /// The timestamp as a UTC date-time.
    pub fn parsed_timestamp(&self) -> Option<NaiveDateTime> {
        self.timestamp.as_deref().and_then(parse_timestamp)
    }

    /// Provider's free text.
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }
}

impl_validating_deserialize!(TicketItemUnprocessed, RawTicketItemUnprocessed, |raw| {
    TicketItemUnprocessed::from_raw(&raw)
});

impl Export for TicketItemUnprocessed {}
