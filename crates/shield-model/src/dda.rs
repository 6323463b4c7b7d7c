//! # DDA: Blocking-Order Authorisations
//!
//! A DDA record links a reporter account to the regulatory decision
//! (`instance`, e.g. `123/24/DDA/CA`) under which it may file tickets.
//!
//! Validation order: `dda_id`, `description`, `instance`, `account_id`,
//! `is_active`.

use serde::{Deserialize, Serialize};
use shield_core::{Check, FieldError, FieldSpec, Input, Presence, Schema, ValidationVerdict};
use thiserror::Error;

use crate::catalog;
use crate::identifier::Identifier;
use crate::raw::{supplied, RawField, RawSlot, RawText};
use crate::Export;

/// Error constructing a [`Dda`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DdaError {
    /// `dda_id` failed its chain.
    #[error("DDA identifier is not valid:\n{0}")]
    InvalidDdaId(ValidationVerdict),

    /// `description` failed its chain.
    #[error("DDA description is not valid:\n{0}")]
    InvalidDescription(ValidationVerdict),

    /// `instance` failed its chain.
    #[error("DDA instance is not valid:\n{0}")]
    InvalidInstance(ValidationVerdict),

    /// `account_id` failed its chain.
    #[error("DDA account identifier is not valid:\n{0}")]
    InvalidAccountId(ValidationVerdict),

    /// `is_active` is not a boolean.
    #[error("DDA active flag is not valid:\n{0}")]
    InvalidIsActive(ValidationVerdict),
}

impl FieldError for DdaError {
    fn verdict(&self) -> Option<&ValidationVerdict> {
        match self {
            Self::InvalidDdaId(v)
            | Self::InvalidDescription(v)
            | Self::InvalidInstance(v)
            | Self::InvalidAccountId(v)
            | Self::InvalidIsActive(v) => Some(v),
        }
    }
}

static SCHEMA: Schema<DdaError> = Schema::new(
    "dda",
    &[
        FieldSpec {
            name: "dda_id",
            check: Check::Chain(&catalog::dda::DDA_ID),
            presence: Presence::Required,
            error: DdaError::InvalidDdaId,
        },
        FieldSpec {
            name: "description",
            check: Check::Chain(&catalog::dda::DESCRIPTION),
            presence: Presence::Required,
            error: DdaError::InvalidDescription,
        },
        FieldSpec {
            name: "instance",
            check: Check::Chain(&catalog::dda::INSTANCE),
            presence: Presence::Required,
            error: DdaError::InvalidInstance,
        },
        FieldSpec {
            name: "account_id",
            check: Check::Chain(&catalog::account::ACCOUNT_ID),
            presence: Presence::Required,
            error: DdaError::InvalidAccountId,
        },
        FieldSpec {
            name: "is_active",
            check: Check::Chain(&catalog::dda::IS_ACTIVE),
            presence: Presence::IfPresent,
            error: DdaError::InvalidIsActive,
        },
    ],
);

/// Unvalidated DDA fields.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawDda {
    /// 32-character identifier.
    pub dda_id: Option<RawField<String>>,
    /// Free-text description.
    pub description: Option<RawField<String>>,
    /// Order reference.
    pub instance: Option<RawField<String>>,
    /// Reporter account the order belongs to.
    pub account_id: Option<RawField<String>>,
    /// Defaults to `true` when omitted.
    pub is_active: Option<RawField<bool>>,
}

impl RawDda {
    fn inputs(&self) -> [(&'static str, Input<'_>); 5] {
        [
            ("dda_id", self.dda_id.input()),
            ("description", self.description.input()),
            ("instance", self.instance.input()),
            ("account_id", self.account_id.input()),
            ("is_active", self.is_active.input()),
        ]
    }
}

/// A validated DDA record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dda {
    dda_id: Identifier,
    description: String,
    instance: String,
    account_id: Identifier,
    is_active: bool,
}

impl Dda {
    /// Validate and build a DDA record.
    pub fn new(
        dda_id: &str,
        description: &str,
        instance: &str,
        account_id: &str,
        is_active: bool,
    ) -> Result<Self, DdaError> {
        Self::from_raw(&RawDda {
            dda_id: supplied(dda_id),
            description: supplied(description),
            instance: supplied(instance),
            account_id: supplied(account_id),
            is_active: supplied(is_active),
        })
    }

    /// An omitted `is_active` defaults to `true`.
    pub fn from_raw(raw: &RawDda) -> Result<Self, DdaError> {
        SCHEMA.construct(&raw.inputs(), || {
            Ok(Self {
                dda_id: Identifier::from_validated(raw.dda_id.text()),
                description: raw.description.text().to_string(),
                instance: raw.instance.text().to_string(),
                account_id: Identifier::from_validated(raw.account_id.text()),
                is_active: raw.is_active.typed().copied().unwrap_or(true),
            })
        })
    }

    /// Every field error, in declaration order.
    pub fn audit(raw: &RawDda) -> Vec<DdaError> {
        SCHEMA.validate_all(&raw.inputs())
    }

    /// Field declarations, in validation order.
    pub fn schema() -> &'static Schema<DdaError> {
        &SCHEMA
    }

    /// DDA identifier.
    pub fn dda_id(&self) -> &Identifier {
        &self.dda_id
    }

    /// Free-text description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Order reference.
    pub fn instance(&self) -> &str {
        &self.instance
    }

    /// Reporter account.
    pub fn account_id(&self) -> &Identifier {
        &self.account_id
    }

    /// Whether the order is in force.
    pub fn is_active(&self) -> bool {
        self.is_active
    }
}

impl_validating_deserialize!(Dda, RawDda, |raw| Dda::from_raw(&raw));

impl Export for Dda {}

#[cfg(test)]
mod tests {
    use super::*;
    use shield_core::RuleKind;

    #[test]
    fn valid_dda() {
        let dda = Dda::new(&"d".repeat(32), "Serie A 2024-25", "123/24/DDA/CA", &"a".repeat(32), true)
            .unwrap();
        assert_eq!(dda.instance(), "123/24/DDA/CA");
        assert!(dda.is_active());
    }

    #[test]
    fn bad_instance() {
        let err = Dda::new(&"d".repeat(32), "Serie A", "123-24-DDA-CA", &"a".repeat(32), true)
            .unwrap_err();
        match err {
            DdaError::InvalidInstance(v) => assert_eq!(v.kinds(), vec![RuleKind::DdaInstance]),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn description_charset() {
        let err = Dda::new(&"d".repeat(32), "Serie A #1", "1/24/DDA/CA", &"a".repeat(32), true)
            .unwrap_err();
        assert!(matches!(err, DdaError::InvalidDescription(_)));
    }

    #[test]
    fn audit_collects_all() {
        let raw = RawDda::default();
        let errors = Dda::audit(&raw);
        assert_eq!(errors.len(), 4);
        assert!(errors.iter().all(|e| e.is_missing()));
    }

    #[test]
    fn export_roundtrip() {
        let dda = Dda::new(&"d".repeat(32), "Serie A", "7/25/DDA/CA", &"a".repeat(32), false).unwrap();
        let attrs = dda.attributes().unwrap();
        let back: Dda = serde_json::from_value(serde_json::Value::Object(attrs)).unwrap();
        assert_eq!(back, dda);
    }

    #[test]
    fn string_flag_is_rejected() {
        let raw = RawDda {
            dda_id: Some("d".repeat(32).into()),
            description: Some("Serie A".into()),
            instance: Some("7/25/DDA/CA".into()),
            account_id: Some("a".repeat(32).into()),
            is_active: Some(RawField::Mistyped(serde_json::json!("true"))),
        };
        match Dda::from_raw(&raw).unwrap_err() {
            DdaError::InvalidIsActive(v) => assert_eq!(v.kinds(), vec![RuleKind::Boolean]),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
