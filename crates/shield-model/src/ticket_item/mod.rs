//! # Ticket Items
//!
//! A ticket item is one target of a ticket (an FQDN, an IPv4 or an IPv6
//! address) dispatched to one provider.
//!
//! ## Validation Order
//!
//! `ticket_id`, `ticket_item_id`, `genre`, then `value`, `provider_id` and
//! the four flags. The genre selects the only chain the value is checked
//! against: the check is conjunctive and strict. Provider reports on an
//! item live in [`outcome`] and use a disjunctive value check instead.

mod outcome;

pub use outcome::{
    RawTicketItemProcessed, RawTicketItemUnprocessed, TicketItemOutcomeError, TicketItemProcessed,
    TicketItemUnprocessed, UnprocessedReason,
};

use serde::{Deserialize, Serialize};
use shield_core::{Check, FieldError, FieldSpec, Input, Presence, Schema, ValidationVerdict};
use thiserror::Error;

use crate::catalog;
use crate::genre::TicketItemGenre;
use crate::identifier::Identifier;
use crate::raw::{supplied, RawField, RawSlot, RawText};
use crate::settings::{ConfigError, TicketItemSettings};
use crate::status::TicketItemStatus;
use crate::{Export, UnknownVariant};

/// Error constructing a [`TicketItem`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TicketItemError {
    /// `ticket_id` failed its chain.
    #[error("ticket identifier is not valid:\n{0}")]
    InvalidTicketId(ValidationVerdict),

    /// `ticket_item_id` failed its chain.
    #[error("ticket item identifier is not valid:\n{0}")]
    InvalidTicketItemId(ValidationVerdict),

    /// `genre` was not supplied.
    #[error("ticket item genre is not valid:\n{0}")]
    InvalidGenre(ValidationVerdict),

    /// `genre` is not a [`TicketItemGenre`].
    #[error(transparent)]
    UnknownGenre(#[from] UnknownVariant),

    /// Value declared `fqdn` is not an FQDN.
    #[error("FQDN value is not valid:\n{0}")]
    InvalidFqdn(ValidationVerdict),

    /// Value declared `ipv4` is not an IPv4 address.
    #[error("IPv4 value is not valid:\n{0}")]
    InvalidIpv4(ValidationVerdict),

    /// Value declared `ipv6` is not an IPv6 address.
    #[error("IPv6 value is not valid:\n{0}")]
    InvalidIpv6(ValidationVerdict),

    /// `provider_id` failed its chain.
    #[error("provider identifier is not valid:\n{0}")]
    InvalidProviderId(ValidationVerdict),

    /// `is_active` is not a boolean.
    #[error("ticket item active flag is not valid:\n{0}")]
    InvalidIsActive(ValidationVerdict),

    /// `is_duplicate` is not a boolean.
    #[error("ticket item duplicate flag is not valid:\n{0}")]
    InvalidIsDuplicate(ValidationVerdict),

    /// `is_whitelisted` is not a boolean.
    #[error("ticket item whitelisted flag is not valid:\n{0}")]
    InvalidIsWhitelisted(ValidationVerdict),

    /// `is_error` is not a boolean.
    #[error("ticket item error flag is not valid:\n{0}")]
    InvalidIsError(ValidationVerdict),

    /// Settings passed to [`TicketItem::with_settings`] are inconsistent.
    #[error(transparent)]
    Settings(#[from] ConfigError),
}

impl FieldError for TicketItemError {
    fn verdict(&self) -> Option<&ValidationVerdict> {
        match self {
            Self::InvalidTicketId(v)
            | Self::InvalidTicketItemId(v)
            | Self::InvalidGenre(v)
            | Self::InvalidFqdn(v)
            | Self::InvalidIpv4(v)
            | Self::InvalidIpv6(v)
            | Self::InvalidProviderId(v)
            | Self::InvalidIsActive(v)
            | Self::InvalidIsDuplicate(v)
            | Self::InvalidIsWhitelisted(v)
            | Self::InvalidIsError(v) => Some(v),
            Self::UnknownGenre(_) | Self::Settings(_) => None,
        }
    }
}

/// Identifier and genre fields, checked before the genre is parsed.
static HEAD: Schema<TicketItemError> = Schema::new(
    "ticket_item",
    &[
        FieldSpec {
            name: "ticket_id",
            check: Check::Chain(&catalog::ticket::TICKET_ID),
            presence: Presence::Required,
            error: TicketItemError::InvalidTicketId,
        },
        FieldSpec {
            name: "ticket_item_id",
            check: Check::Chain(&catalog::ticket_item::TICKET_ITEM_ID),
            presence: Presence::Required,
            error: TicketItemError::InvalidTicketItemId,
        },
        FieldSpec {
            name: "genre",
            check: Check::Chain(&catalog::ticket_item::GENRE),
            presence: Presence::Required,
            error: TicketItemError::InvalidGenre,
        },
    ],
);

const PROVIDER: FieldSpec<TicketItemError> = FieldSpec {
    name: "provider_id",
    check: Check::Chain(&catalog::ticket_item::PROVIDER_ID),
    presence: Presence::Required,
    error: TicketItemError::InvalidProviderId,
};

const IS_ACTIVE: FieldSpec<TicketItemError> = FieldSpec {
    name: "is_active",
    check: Check::Chain(&catalog::ticket_item::IS_ACTIVE),
    presence: Presence::IfPresent,
    error: TicketItemError::InvalidIsActive,
};

const IS_DUPLICATE: FieldSpec<TicketItemError> = FieldSpec {
    name: "is_duplicate",
    check: Check::Chain(&catalog::ticket_item::IS_DUPLICATE),
    presence: Presence::IfPresent,
    error: TicketItemError::InvalidIsDuplicate,
};

const IS_WHITELISTED: FieldSpec<TicketItemError> = FieldSpec {
    name: "is_whitelisted",
    check: Check::Chain(&catalog::ticket_item::IS_WHITELISTED),
    presence: Presence::IfPresent,
    error: TicketItemError::InvalidIsWhitelisted,
};

const IS_ERROR: FieldSpec<TicketItemError> = FieldSpec {
    name: "is_error",
    check: Check::Chain(&catalog::ticket_item::IS_ERROR),
    presence: Presence::IfPresent,
    error: TicketItemError::InvalidIsError,
};

/// Fields that follow the value whatever the genre.
static TAIL: Schema<TicketItemError> = Schema::new(
    "ticket_item",
    &[PROVIDER, IS_ACTIVE, IS_DUPLICATE, IS_WHITELISTED, IS_ERROR],
);

static FQDN_BODY: Schema<TicketItemError> = Schema::new(
    "ticket_item.fqdn",
    &[
        FieldSpec {
            name: "value",
            check: Check::Chain(&catalog::ticket::FQDN),
            presence: Presence::Required,
            error: TicketItemError::InvalidFqdn,
        },
        PROVIDER,
        IS_ACTIVE,
        IS_DUPLICATE,
        IS_WHITELISTED,
        IS_ERROR,
    ],
);

static IPV4_BODY: Schema<TicketItemError> = Schema::new(
    "ticket_item.ipv4",
    &[
        FieldSpec {
            name: "value",
            check: Check::Chain(&catalog::ticket::IPV4),
            presence: Presence::Required,
            error: TicketItemError::InvalidIpv4,
        },
        PROVIDER,
        IS_ACTIVE,
        IS_DUPLICATE,
        IS_WHITELISTED,
        IS_ERROR,
    ],
);

static IPV6_BODY: Schema<TicketItemError> = Schema::new(
    "ticket_item.ipv6",
    &[
        FieldSpec {
            name: "value",
            check: Check::Chain(&catalog::ticket::IPV6),
            presence: Presence::Required,
            error: TicketItemError::InvalidIpv6,
        },
        PROVIDER,
        IS_ACTIVE,
        IS_DUPLICATE,
        IS_WHITELISTED,
        IS_ERROR,
    ],
);

/// Value, provider and flag fields for a genre.
fn body(genre: TicketItemGenre) -> &'static Schema<TicketItemError> {
    match genre {
        TicketItemGenre::Fqdn => &FQDN_BODY,
        TicketItemGenre::Ipv4 => &IPV4_BODY,
        TicketItemGenre::Ipv6 => &IPV6_BODY,
    }
}

/// Item state switches. Each item owns its own copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TicketItemFlags {
    /// The item takes part in blocking.
    pub is_active: bool,
    /// The value repeats an earlier item.
    pub is_duplicate: bool,
    /// The value matched a whitelist entry.
    pub is_whitelisted: bool,
    /// The item was reported in error.
    pub is_error: bool,
}

impl Default for TicketItemFlags {
    fn default() -> Self {
        Self {
            is_active: true,
            is_duplicate: false,
            is_whitelisted: false,
            is_error: false,
        }
    }
}

/// Unvalidated ticket item fields.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawTicketItem {
    /// Parent ticket.
    pub ticket_id: Option<RawField<String>>,
    /// 32-character item identifier.
    pub ticket_item_id: Option<RawField<String>>,
    /// `fqdn`, `ipv4` or `ipv6`.
    pub genre: Option<RawField<String>>,
    /// Target named by the genre.
    pub value: Option<RawField<String>>,
    /// Provider the item is dispatched to.
    pub provider_id: Option<RawField<String>>,
    /// See [`TicketItemFlags::is_active`].
    pub is_active: Option<RawField<bool>>,
    /// See [`TicketItemFlags::is_duplicate`].
    pub is_duplicate: Option<RawField<bool>>,
    /// See [`TicketItemFlags::is_whitelisted`].
    pub is_whitelisted: Option<RawField<bool>>,
    /// See [`TicketItemFlags::is_error`].
    pub is_error: Option<RawField<bool>>,
}

impl RawTicketItem {
    fn inputs(&self) -> [(&'static str, Input<'_>); 9] {
        [
            ("ticket_id", self.ticket_id.input()),
            ("ticket_item_id", self.ticket_item_id.input()),
            ("genre", self.genre.input()),
            ("value", self.value.input()),
            ("provider_id", self.provider_id.input()),
            ("is_active", self.is_active.input()),
            ("is_duplicate", self.is_duplicate.input()),
            ("is_whitelisted", self.is_whitelisted.input()),
            ("is_error", self.is_error.input()),
        ]
    }

    fn genre(&self) -> Result<TicketItemGenre, TicketItemError> {
        Ok(self.genre.rendered().parse()?)
    }

    fn flags(&self) -> TicketItemFlags {
        let defaults = TicketItemFlags::default();
        let flag =
            |field: &Option<RawField<bool>>, default| field.typed().copied().unwrap_or(default);
        TicketItemFlags {
            is_active: flag(&self.is_active, defaults.is_active),
            is_duplicate: flag(&self.is_duplicate, defaults.is_duplicate),
            is_whitelisted: flag(&self.is_whitelisted, defaults.is_whitelisted),
            is_error: flag(&self.is_error, defaults.is_error),
        }
    }
}

/// A validated ticket item, pending provider action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketItem {
    ticket_id: Identifier,
    ticket_item_id: Identifier,
    genre: TicketItemGenre,
    value: String,
    provider_id: Identifier,
    status: TicketItemStatus,
    #[serde(flatten)]
    flags: TicketItemFlags,
    settings: TicketItemSettings,
}

impl TicketItem {
    /// Validate and build an item with default settings.
    pub fn new(
        ticket_id: &str,
        ticket_item_id: &str,
        provider_id: &str,
        value: &str,
        genre: &str,
        flags: TicketItemFlags,
    ) -> Result<Self, TicketItemError> {
        Self::from_raw(&RawTicketItem {
            ticket_id: supplied(ticket_id),
            ticket_item_id: supplied(ticket_item_id),
            genre: supplied(genre),
            value: supplied(value),
            provider_id: supplied(provider_id),
            is_active: supplied(flags.is_active),
            is_duplicate: supplied(flags.is_duplicate),
            is_whitelisted: supplied(flags.is_whitelisted),
            is_error: supplied(flags.is_error),
        })
    }

    /// Omitted flags take their [`TicketItemFlags::default`] values.
    pub fn from_raw(raw: &RawTicketItem) -> Result<Self, TicketItemError> {
        let inputs = raw.inputs();
        HEAD.validate(&inputs)?;
        let genre = raw.genre()?;

        body(genre).construct(&inputs, || {
            Ok(Self {
                ticket_id: Identifier::from_validated(raw.ticket_id.text()),
                ticket_item_id: Identifier::from_validated(raw.ticket_item_id.text()),
                genre,
                value: raw.value.text().to_string(),
                provider_id: Identifier::from_validated(raw.provider_id.text()),
                status: TicketItemStatus::Pending,
                flags: raw.flags(),
                settings: TicketItemSettings::default(),
            })
        })
    }

    /// Every field error. An unparseable genre replaces the value check,
    /// since no chain applies to the value without one.
    pub fn audit(raw: &RawTicketItem) -> Vec<TicketItemError> {
        let inputs = raw.inputs();
        let mut errors = HEAD.validate_all(&inputs);
        let genre_missing = errors.iter().any(|e| matches!(e, TicketItemError::InvalidGenre(_)));
        match raw.genre() {
            Ok(genre) => errors.extend(body(genre).validate_all(&inputs)),
            Err(e) => {
                if !genre_missing {
                    errors.push(e);
                }
                errors.extend(TAIL.validate_all(&inputs));
            }
        }
        errors
    }

    /// Identifier and genre fields followed by the value, provider and flag
    /// fields for `genre`.
    pub fn schemas(genre: TicketItemGenre) -> [&'static Schema<TicketItemError>; 2] {
        [&HEAD, body(genre)]
    }

    /// Replace the default processing window.
    pub fn with_settings(mut self, settings: TicketItemSettings) -> Result<Self, TicketItemError> {
        settings.validate()?;
        self.settings = settings;
        Ok(self)
    }

    /// Parent ticket.
    pub fn ticket_id(&self) -> &Identifier {
        &self.ticket_id
    }

    /// Item identifier.
    pub fn ticket_item_id(&self) -> &Identifier {
        &self.ticket_item_id
    }

    /// Parsed genre.
    pub fn genre(&self) -> TicketItemGenre {
        self.genre
    }

    /// Target value, checked against the genre's chain.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Provider the item is dispatched to.
    pub fn provider_id(&self) -> &Identifier {
        &self.provider_id
    }

    /// Lifecycle status, `pending` on construction.
    pub fn status(&self) -> TicketItemStatus {
        self.status
    }

    /// State switches.
    pub fn flags(&self) -> &TicketItemFlags {
        &self.flags
    }

    /// Processing window.
    pub fn settings(&self) -> &TicketItemSettings {
        &self.settings
    }
}

impl_validating_deserialize!(TicketItem, RawTicketItem, |raw| TicketItem::from_raw(&raw));

impl Export for TicketItem {}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(value: &str, genre: &str) -> Result<TicketItem, TicketItemError> {
        TicketItem::new(
            &"t".repeat(32),
            &"i".repeat(32),
            &"p".repeat(32),
            value,
            genre,
            TicketItemFlags::default(),
        )
    }

    #[test]
    fn genre_selects_chain() {
        let ok = item("8.8.8.8", "ipv4").unwrap();
        assert_eq!(ok.genre(), TicketItemGenre::Ipv4);
        assert_eq!(ok.status(), TicketItemStatus::Pending);
        assert_eq!(ok.settings().update_max_time, 172800);

        assert!(matches!(item("8.8.8.8", "fqdn"), Err(TicketItemError::InvalidFqdn(_))));
        assert!(matches!(item("example.com", "ipv4"), Err(TicketItemError::InvalidIpv4(_))));
        assert!(matches!(item("8.8.8.8", "ipv6"), Err(TicketItemError::InvalidIpv6(_))));
    }

    #[test]
    fn unknown_genre() {
        match item("example.com", "url") {
            Err(TicketItemError::UnknownGenre(e)) => assert_eq!(e.value, "url"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn identifiers_precede_genre() {
        let err = TicketItem::new(
            "short",
            &"i".repeat(32),
            &"p".repeat(32),
            "x",
            "nope",
            TicketItemFlags::default(),
        )
        .unwrap_err();
        assert!(matches!(err, TicketItemError::InvalidTicketId(_)));
    }

    #[test]
    fn provider_checked_last() {
        let err = TicketItem::new(
            &"t".repeat(32),
            &"i".repeat(32),
            "",
            "example.com",
            "fqdn",
            TicketItemFlags::default(),
        )
        .unwrap_err();
        assert!(matches!(err, TicketItemError::InvalidProviderId(_)));
        assert!(err.is_missing());
    }

    #[test]
    fn flags_are_per_instance() {
        let mut flags = TicketItemFlags::default();
        flags.is_duplicate = true;
        let dup = TicketItem::new(
            &"t".repeat(32),
            &"i".repeat(32),
            &"p".repeat(32),
            "example.com",
            "fqdn",
            flags,
        )
        .unwrap();
        let plain = item("example.com", "fqdn").unwrap();
        assert!(dup.flags().is_duplicate);
        assert!(!plain.flags().is_duplicate);
        assert!(plain.flags().is_active);
    }

    #[test]
    fn audit_with_unknown_genre() {
        let raw = RawTicketItem {
            ticket_id: Some("t".repeat(32).into()),
            ticket_item_id: Some("i".repeat(32).into()),
            genre: Some("cidr".into()),
            value: Some("10.0.0.0/8".into()),
            provider_id: None,
            ..RawTicketItem::default()
        };
        let errors = TicketItem::audit(&raw);
        assert_eq!(errors.len(), 2);
        assert!(matches!(errors[0], TicketItemError::UnknownGenre(_)));
        assert!(errors[1].is_missing());
    }

    #[test]
    fn export_is_flat() {
        let attrs = item("::1", "ipv6").unwrap().attributes().unwrap();
        assert_eq!(attrs["genre"], "ipv6");
        assert_eq!(attrs["status"], "pending");
        assert_eq!(attrs["is_active"], true);
        assert_eq!(attrs["is_whitelisted"], false);
        assert_eq!(attrs["settings"]["update_max_time"], 172800);
        assert!(!attrs.contains_key("flags"));
    }

    #[test]
    fn with_settings_validates() {
        let it = item("::1", "ipv6").unwrap();
        let zero = TicketItemSettings { update_max_time: 0 };
        assert!(matches!(it.with_settings(zero), Err(TicketItemError::Settings(_))));
    }

    fn payload(overrides: serde_json::Value) -> RawTicketItem {
        let mut value = serde_json::json!({
            "ticket_id": "t".repeat(32),
            "ticket_item_id": "i".repeat(32),
            "genre": "fqdn",
            "value": "example.com",
            "provider_id": "p".repeat(32)
        });
        if let (Some(base), Some(extra)) = (value.as_object_mut(), overrides.as_object()) {
            base.extend(extra.clone());
        }
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn missing_genre_is_required_not_unknown() {
        let mut raw = payload(serde_json::json!({}));
        raw.genre = None;
        let err = TicketItem::from_raw(&raw).unwrap_err();
        assert!(matches!(err, TicketItemError::InvalidGenre(_)));
        assert!(err.is_missing());

        let errors = TicketItem::audit(&raw);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].is_missing());

        let err = TicketItem::from_raw(&payload(serde_json::json!({ "genre": "" }))).unwrap_err();
        assert!(matches!(err, TicketItemError::InvalidGenre(_)));
    }

    #[test]
    fn numeric_genre_is_unknown() {
        match TicketItem::from_raw(&payload(serde_json::json!({ "genre": 4 }))) {
            Err(TicketItemError::UnknownGenre(e)) => assert_eq!(e.value, "4"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn string_flag_is_a_flag_error() {
        let err = TicketItem::from_raw(&payload(serde_json::json!({ "is_whitelisted": "no" })))
            .unwrap_err();
        assert!(matches!(err, TicketItemError::InvalidIsWhitelisted(_)));

        let ok = TicketItem::from_raw(&payload(serde_json::json!({ "is_error": true }))).unwrap();
        assert!(ok.flags().is_error);
        assert!(ok.flags().is_active);
    }
}
