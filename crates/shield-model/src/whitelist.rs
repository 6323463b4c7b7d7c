//! # Whitelist
//!
//! Targets that must never be blocked. The genre is checked and parsed
//! first and picks both the value chain and the companion attribute:
//! domains carry the registrar that manages them, addresses and networks
//! carry the AS that announces them. The attribute belonging to the other
//! family is ignored and not stored.

use serde::{Deserialize, Serialize};
use shield_core::{Check, FieldError, FieldSpec, Input, Presence, Schema, ValidationVerdict};
use thiserror::Error;

use crate::catalog;
use crate::genre::WhitelistGenre;
use crate::raw::{supplied, RawField, RawSlot, RawText};
use crate::{Export, UnknownVariant};

/// Error constructing a [`WhitelistItem`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WhitelistError {
    /// `genre` was not supplied.
    #[error("whitelist genre is not valid:\n{0}")]
    InvalidGenre(ValidationVerdict),

    /// `genre` is not a [`WhitelistGenre`].
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

    /// Value declared `cidr_ipv4` is not an IPv4 network.
    #[error("IPv4 CIDR value is not valid:\n{0}")]
    InvalidCidrIpv4(ValidationVerdict),

    /// Value declared `cidr_ipv6` is not an IPv6 network.
    #[error("IPv6 CIDR value is not valid:\n{0}")]
    InvalidCidrIpv6(ValidationVerdict),

    /// `registrar` of a domain entry failed its chain.
    #[error("registrar is not valid:\n{0}")]
    InvalidRegistrar(ValidationVerdict),

    /// `as_code` of an address or network entry failed its chain.
    #[error("AS code is not valid:\n{0}")]
    InvalidAsCode(ValidationVerdict),

    /// `is_active` is not a boolean.
    #[error("whitelist active flag is not valid:\n{0}")]
    InvalidIsActive(ValidationVerdict),
}

impl FieldError for WhitelistError {
    fn verdict(&self) -> Option<&ValidationVerdict> {
        match self {
            Self::InvalidGenre(v)
            | Self::InvalidFqdn(v)
            | Self::InvalidIpv4(v)
            | Self::InvalidIpv6(v)
            | Self::InvalidCidrIpv4(v)
            | Self::InvalidCidrIpv6(v)
            | Self::InvalidRegistrar(v)
            | Self::InvalidAsCode(v)
            | Self::InvalidIsActive(v) => Some(v),
            Self::UnknownGenre(_) => None,
        }
    }
}

static HEAD: Schema<WhitelistError> = Schema::new(
    "whitelist",
    &[FieldSpec {
        name: "genre",
        check: Check::Chain(&catalog::whitelist::GENRE),
        presence: Presence::Required,
        error: WhitelistError::InvalidGenre,
    }],
);

const REGISTRAR: FieldSpec<WhitelistError> = FieldSpec {
    name: "registrar",
    check: Check::Chain(&catalog::whitelist::REGISTRAR),
    presence: Presence::Required,
    error: WhitelistError::InvalidRegistrar,
};

const AS_CODE: FieldSpec<WhitelistError> = FieldSpec {
    name: "as_code",
    check: Check::Chain(&catalog::whitelist::AS_CODE),
    presence: Presence::Required,
    error: WhitelistError::InvalidAsCode,
};

const IS_ACTIVE: FieldSpec<WhitelistError> = FieldSpec {
    name: "is_active",
    check: Check::Chain(&catalog::whitelist::IS_ACTIVE),
    presence: Presence::IfPresent,
    error: WhitelistError::InvalidIsActive,
};

static FQDN: Schema<WhitelistError> = Schema::new(
    "whitelist.fqdn",
    &[
        FieldSpec {
            name: "value",
            check: Check::Chain(&catalog::ticket::FQDN),
            presence: Presence::Required,
            error: WhitelistError::InvalidFqdn,
        },
        REGISTRAR,
        IS_ACTIVE,
    ],
);

static IPV4: Schema<WhitelistError> = Schema::new(
    "whitelist.ipv4",
    &[
        FieldSpec {
            name: "value",
            check: Check::Chain(&catalog::ticket::IPV4),
            presence: Presence::Required,
            error: WhitelistError::InvalidIpv4,
        },
        AS_CODE,
        IS_ACTIVE,
    ],
);

static IPV6: Schema<WhitelistError> = Schema::new(
    "whitelist.ipv6",
    &[
        FieldSpec {
            name: "value",
            check: Check::Chain(&catalog::ticket::IPV6),
            presence: Presence::Required,
            error: WhitelistError::InvalidIpv6,
        },
        AS_CODE,
        IS_ACTIVE,
    ],
);

static CIDR_IPV4: Schema<WhitelistError> = Schema::new(
    "whitelist.cidr_ipv4",
    &[
        FieldSpec {
            name: "value",
            check: Check::Chain(&catalog::whitelist::CIDR_IPV4),
            presence: Presence::Required,
            error: WhitelistError::InvalidCidrIpv4,
        },
        AS_CODE,
        IS_ACTIVE,
    ],
);

static CIDR_IPV6: Schema<WhitelistError> = Schema::new(
    "whitelist.cidr_ipv6",
    &[
        FieldSpec {
            name: "value",
            check: Check::Chain(&catalog::whitelist::CIDR_IPV6),
            presence: Presence::Required,
            error: WhitelistError::InvalidCidrIpv6,
        },
        AS_CODE,
        IS_ACTIVE,
    ],
);

fn body(genre: WhitelistGenre) -> &'static Schema<WhitelistError> {
    match genre {
        WhitelistGenre::Fqdn => &FQDN,
        WhitelistGenre::Ipv4 => &IPV4,
        WhitelistGenre::Ipv6 => &IPV6,
        WhitelistGenre::CidrIpv4 => &CIDR_IPV4,
        WhitelistGenre::CidrIpv6 => &CIDR_IPV6,
    }
}

/// Unvalidated whitelist entry fields.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawWhitelistItem {
    /// Wire spelling of a [`WhitelistGenre`].
    pub genre: Option<RawField<String>>,
    /// Target named by the genre.
    pub value: Option<RawField<String>>,
    /// Defaults to `true` when omitted.
    pub is_active: Option<RawField<bool>>,
    /// Registrar, read for `fqdn` entries only.
    pub registrar: Option<RawField<String>>,
    /// AS code, read for address and network entries only.
    pub as_code: Option<RawField<String>>,
}

impl RawWhitelistItem {
    fn inputs(&self) -> [(&'static str, Input<'_>); 5] {
        [
            ("genre", self.genre.input()),
            ("value", self.value.input()),
            ("registrar", self.registrar.input()),
            ("as_code", self.as_code.input()),
            ("is_active", self.is_active.input()),
        ]
    }

    fn genre(&self) -> Result<WhitelistGenre, WhitelistError> {
        Ok(self.genre.rendered().parse()?)
    }
}

/// A validated whitelist entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WhitelistItem {
    genre: WhitelistGenre,
    value: String,
    is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    registrar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    as_code: Option<String>,
}

impl WhitelistItem {
    /// Validate and build a whitelist entry.
    pub fn new(
        genre: &str,
        value: &str,
        is_active: bool,
        registrar: Option<&str>,
        as_code: Option<&str>,
    ) -> Result<Self, WhitelistError> {
        Self::from_raw(&RawWhitelistItem {
            genre: supplied(genre),
            value: supplied(value),
            is_active: supplied(is_active),
            registrar: registrar.map(RawField::from),
            as_code: as_code.map(RawField::from),
        })
    }

    /// Check and parse the genre, then the fields it selects.
    ///
    /// An omitted `is_active` defaults to `true`. Only the genre's own
    /// companion attribute is kept.
    pub fn from_raw(raw: &RawWhitelistItem) -> Result<Self, WhitelistError> {
        let inputs = raw.inputs();
        HEAD.validate(&inputs)?;
        let genre = raw.genre()?;

        body(genre).construct(&inputs, || {
            let (registrar, as_code) = if genre.needs_registrar() {
                (raw.registrar.typed().cloned(), None)
            } else {
                (None, raw.as_code.typed().cloned())
            };
            Ok(Self {
                genre,
                value: raw.value.text().to_string(),
                is_active: raw.is_active.typed().copied().unwrap_or(true),
                registrar,
                as_code,
            })
        })
    }

    /// Every field error. Without a usable genre only the genre error is
    /// reported, since it selects every other chain.
    pub fn audit(raw: &RawWhitelistItem) -> Vec<WhitelistError> {
        let inputs = raw.inputs();
        let errors = HEAD.validate_all(&inputs);
        if !errors.is_empty() {
            return errors;
        }
        match raw.genre() {
            Ok(genre) => body(genre).validate_all(&inputs),
            Err(e) => vec![e],
        }
    }

    /// Genre declaration followed by the value, companion attribute and
    /// flag declarations for `genre`.
    pub fn schemas(genre: WhitelistGenre) -> [&'static Schema<WhitelistError>; 2] {
        [&HEAD, body(genre)]
    }

    /// Parsed genre.
    pub fn genre(&self) -> WhitelistGenre {
        self.genre
    }

    /// Whitelisted target.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Whether the entry is in force.
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Registrar of a domain entry.
    pub fn registrar(&self) -> Option<&str> {
        self.registrar.as_deref()
    }

    /// AS code of an address or network entry.
    pub fn as_code(&self) -> Option<&str> {
        self.as_code.as_deref()
    }
}

impl_validating_deserialize!(WhitelistItem, RawWhitelistItem, |raw| WhitelistItem::from_raw(&raw));

impl Export for WhitelistItem {}

#[cfg(test)]
mod tests {
    use super::*;
    use shield_core::RuleKind;

    #[test]
    fn fqdn_needs_registrar() {
        let item = WhitelistItem::new("fqdn", "example.org", true, Some("Example Registrar"), None)
            .unwrap();
        assert_eq!(item.registrar(), Some("Example Registrar"));

        let err = WhitelistItem::new("fqdn", "example.org", true, None, None).unwrap_err();
        assert!(matches!(err, WhitelistError::InvalidRegistrar(_)));
        assert!(err.is_missing());
    }

    #[test]
    fn addresses_need_as_code() {
        for (genre, value) in [
            ("ipv4", "192.0.2.10"),
            ("ipv6", "2001:db8::10"),
            ("cidr_ipv4", "192.0.2.0/24"),
            ("cidr_ipv6", "2001:db8::/32"),
        ] {
            assert!(WhitelistItem::new(genre, value, true, None, Some("AS12345")).is_ok(), "{genre}");
            let err = WhitelistItem::new(genre, value, true, None, None).unwrap_err();
            assert!(matches!(err, WhitelistError::InvalidAsCode(_)), "{genre}");
        }
    }

    #[test]
    fn value_checked_strictly_as_genre() {
        let err = WhitelistItem::new("ipv4", "192.0.2.0/24", true, None, Some("AS1")).unwrap_err();
        match err {
            WhitelistError::InvalidIpv4(v) => assert_eq!(v.kinds(), vec![RuleKind::Ipv4]),
            other => panic!("unexpected: {other:?}"),
        }
        let err = WhitelistItem::new("cidr_ipv4", "192.0.2.10", true, None, Some("AS1")).unwrap_err();
        assert!(matches!(err, WhitelistError::InvalidCidrIpv4(_)));
    }

    #[test]
    fn other_family_attribute_is_ignored() {
        let item = WhitelistItem::new("fqdn", "example.org", true, Some("Registrar"), Some("AS1"))
            .unwrap();
        assert_eq!(item.registrar(), Some("Registrar"));
        assert_eq!(item.as_code(), None);

        let item = WhitelistItem::new("ipv6", "::1", true, Some(""), Some("AS1")).unwrap();
        assert_eq!(item.as_code(), Some("AS1"));
        assert!(!item.attributes().unwrap().contains_key("registrar"));

        let item = WhitelistItem::new("ipv4", "192.0.2.1", true, Some("bad, name"), Some("AS1"))
            .unwrap();
        assert_eq!(item.registrar(), None);
    }

    #[test]
    fn unknown_genre() {
        let err = WhitelistItem::new("url", "https://example.org", true, None, None).unwrap_err();
        assert!(matches!(err, WhitelistError::UnknownGenre(_)));
    }

    #[test]
    fn missing_genre_is_required_not_unknown() {
        let err = WhitelistItem::from_raw(&RawWhitelistItem::default()).unwrap_err();
        assert!(matches!(err, WhitelistError::InvalidGenre(_)));
        assert!(err.is_missing());

        let errors = WhitelistItem::audit(&RawWhitelistItem::default());
        assert_eq!(errors.len(), 1);
        assert!(errors[0].is_missing());
    }

    #[test]
    fn string_flag_is_rejected() {
        let raw: RawWhitelistItem = serde_json::from_value(serde_json::json!({
            "genre": "ipv4",
            "value": "192.0.2.1",
            "as_code": "AS1",
            "is_active": "yes"
        }))
        .unwrap();
        match WhitelistItem::from_raw(&raw).unwrap_err() {
            WhitelistError::InvalidIsActive(v) => assert_eq!(v.kinds(), vec![RuleKind::Boolean]),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn registrar_charset() {
        let err = WhitelistItem::new("fqdn", "example.org", true, Some("Acme, Inc."), None)
            .unwrap_err();
        assert!(matches!(err, WhitelistError::InvalidRegistrar(_)));
    }

    #[test]
    fn export_omits_other_family() {
        let item = WhitelistItem::new("cidr_ipv6", "2001:db8::/32", false, None, Some("AS3269"))
            .unwrap();
        let attrs = item.attributes().unwrap();
        assert_eq!(attrs["genre"], "cidr_ipv6");
        assert_eq!(attrs["as_code"], "AS3269");
        assert_eq!(attrs["is_active"], false);
        assert!(!attrs.contains_key("registrar"));
    }
}
