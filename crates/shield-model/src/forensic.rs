//! # Forensic Evidence
//!
//! A reporter backs a ticket with an evidence archive and, before the
//! archive is uploaded, a digest of it.
//!
//! - [`ForensicArchive`]: `ticket_id`, `name`. Starts `scheduled`.
//! - [`ForensicHash`]: `hash_type`, then `hash_string` against the digest
//!   chain for that algorithm. Starts `pending`. The type is matched without
//!   regard to case and stored under its canonical upper-case name.

use std::path::Path;

use serde::{Deserialize, Serialize};
use shield_core::{
    Check, FieldError, FieldSpec, HashKind, Input, Presence, Schema, UnknownHashKind,
    ValidationVerdict,
};
use thiserror::Error;

use crate::catalog;
use crate::identifier::Identifier;
use crate::raw::{supplied, RawField, RawSlot, RawText};
use crate::status::ForensicStatus;
use crate::Export;

closed_set! {
    /// Archive container formats accepted for upload.
    pub enum ForensicFormat("forensic format") {
        /// ZIP archive.
        Zip => "zip",
        /// RAR archive.
        Rar => "rar",
    }
}

impl ForensicFormat {
    /// Format named by a file name's extension, ignoring case.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let extension = Path::new(name).extension()?.to_str()?;
        Self::all()
            .iter()
            .copied()
            .find(|format| format.as_str().eq_ignore_ascii_case(extension))
    }
}

/// Error constructing a [`ForensicArchive`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ForensicArchiveError {
    /// `ticket_id` failed its chain.
    #[error("ticket identifier is not valid:\n{0}")]
    InvalidTicketId(ValidationVerdict),

    /// `name` failed its chain.
    #[error("archive name is not valid:\n{0}")]
    InvalidName(ValidationVerdict),
}

impl FieldError for ForensicArchiveError {
    fn verdict(&self) -> Option<&ValidationVerdict> {
        match self {
            Self::InvalidTicketId(v) | Self::InvalidName(v) => Some(v),
        }
    }
}

static ARCHIVE: Schema<ForensicArchiveError> = Schema::new(
    "forensic_archive",
    &[
        FieldSpec {
            name: "ticket_id",
            check: Check::Chain(&catalog::ticket::TICKET_ID),
            presence: Presence::Required,
            error: ForensicArchiveError::InvalidTicketId,
        },
        FieldSpec {
            name: "name",
            check: Check::Chain(&catalog::forensic::ARCHIVE_NAME),
            presence: Presence::Required,
            error: ForensicArchiveError::InvalidName,
        },
    ],
);

/// Unvalidated forensic archive fields.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawForensicArchive {
    /// Ticket the evidence backs.
    pub ticket_id: Option<RawField<String>>,
    /// Archive file name.
    pub name: Option<RawField<String>>,
}

impl RawForensicArchive {
    fn inputs(&self) -> [(&'static str, Input<'_>); 2] {
        [
            ("ticket_id", self.ticket_id.input()),
            ("name", self.name.input()),
        ]
    }
}

/// An evidence archive scheduled for upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForensicArchive {
    ticket_id: Identifier,
    name: String,
    status: ForensicStatus,
}

impl ForensicArchive {
    /// Validate and build an archive record.
    pub fn new(ticket_id: &str, name: &str) -> Result<Self, ForensicArchiveError> {
        Self::from_raw(&RawForensicArchive {
            ticket_id: supplied(ticket_id),
            name: supplied(name),
        })
    }

    /// Validate raw fields. The archive starts `scheduled`.
    pub fn from_raw(raw: &RawForensicArchive) -> Result<Self, ForensicArchiveError> {
        ARCHIVE.construct(&raw.inputs(), || {
            Ok(Self {
                ticket_id: Identifier::from_validated(raw.ticket_id.text()),
                name: raw.name.text().to_string(),
                status: ForensicStatus::Scheduled,
            })
        })
    }

    /// Every field error, in declaration order.
    pub fn audit(raw: &RawForensicArchive) -> Vec<ForensicArchiveError> {
        ARCHIVE.validate_all(&raw.inputs())
    }

    /// Field declarations, in validation order.
    pub fn schema() -> &'static Schema<ForensicArchiveError> {
        &ARCHIVE
    }

    /// Ticket the evidence backs.
    pub fn ticket_id(&self) -> &Identifier {
        &self.ticket_id
    }

    /// Archive file name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Upload status.
    pub fn status(&self) -> ForensicStatus {
        self.status
    }

    /// Container format, when the name carries a known extension.
    pub fn format(&self) -> Option<ForensicFormat> {
        ForensicFormat::from_file_name(&self.name)
    }
}

impl_validating_deserialize!(ForensicArchive, RawForensicArchive, |raw| {
    ForensicArchive::from_raw(&raw)
});

impl Export for ForensicArchive {}

/// Error constructing a [`ForensicHash`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ForensicHashError {
    /// `hash_type` failed its chain.
    #[error("hash type is not valid:\n{0}")]
    InvalidHashType(ValidationVerdict),

    /// Well-formed type naming no supported algorithm.
    #[error(transparent)]
    UnsupportedHashType(#[from] UnknownHashKind),

    /// `hash_string` failed the digest chain for the declared type.
    #[error("hash string is not valid:\n{0}")]
    InvalidHashString(ValidationVerdict),
}

impl FieldError for ForensicHashError {
    fn verdict(&self) -> Option<&ValidationVerdict> {
        match self {
            Self::InvalidHashType(v) | Self::InvalidHashString(v) => Some(v),
            Self::UnsupportedHashType(_) => None,
        }
    }
}

static HASH_TYPE: Schema<ForensicHashError> = Schema::new(
    "forensic_hash",
    &[FieldSpec {
        name: "hash_type",
        check: Check::Chain(&catalog::forensic::HASH_TYPE),
        presence: Presence::Required,
        error: ForensicHashError::InvalidHashType,
    }],
);

macro_rules! digest_schema {
    ($name:ident, $entity:literal, $kind:expr) => {
        static $name: Schema<ForensicHashError> = Schema::new(
            $entity,
            &[FieldSpec {
                name: "hash_string",
                check: Check::Chain(catalog::forensic::hash_chain($kind)),
                presence: Presence::Required,
                error: ForensicHashError::InvalidHashString,
            }],
        );
    };
}

digest_schema!(SHA256, "forensic_hash.sha256", HashKind::Sha256);
digest_schema!(SHA384, "forensic_hash.sha384", HashKind::Sha384);
digest_schema!(SHA512, "forensic_hash.sha512", HashKind::Sha512);
digest_schema!(BLAKE2B, "forensic_hash.blake2b", HashKind::Blake2b);
digest_schema!(BLAKE2S, "forensic_hash.blake2s", HashKind::Blake2s);

fn digest(kind: HashKind) -> &'static Schema<ForensicHashError> {
    match kind {
        HashKind::Sha256 => &SHA256,
        HashKind::Sha384 => &SHA384,
        HashKind::Sha512 => &SHA512,
        HashKind::Blake2b => &BLAKE2B,
        HashKind::Blake2s => &BLAKE2S,
    }
}

/// Unvalidated forensic hash fields.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawForensicHash {
    /// Hex digest.
    pub hash_string: Option<RawField<String>>,
    /// Algorithm name, any case.
    pub hash_type: Option<RawField<String>>,
}

impl RawForensicHash {
    fn inputs(&self) -> [(&'static str, Input<'_>); 2] {
        [
            ("hash_type", self.hash_type.input()),
            ("hash_string", self.hash_string.input()),
        ]
    }

    fn kind(&self) -> Result<HashKind, ForensicHashError> {
        Ok(self.hash_type.text().parse()?)
    }
}

/// A digest of an evidence archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForensicHash {
    hash_string: String,
    hash_type: HashKind,
    status: ForensicStatus,
}

impl ForensicHash {
    /// Validate and build a digest record.
    pub fn new(hash_string: &str, hash_type: &str) -> Result<Self, ForensicHashError> {
        Self::from_raw(&RawForensicHash {
            hash_string: supplied(hash_string),
            hash_type: supplied(hash_type),
        })
    }

    /// Check the type, parse it, then check the digest against its chain.
    /// The record starts `pending`.
    pub fn from_raw(raw: &RawForensicHash) -> Result<Self, ForensicHashError> {
        let inputs = raw.inputs();
        HASH_TYPE.validate(&inputs)?;
        let kind = raw.kind()?;

        digest(kind).construct(&inputs, || {
            Ok(Self {
                hash_string: raw.hash_string.text().to_string(),
                hash_type: kind,
                status: ForensicStatus::Pending,
            })
        })
    }

    /// Every error, type first. The digest is checked only when the type
    /// parses.
    pub fn audit(raw: &RawForensicHash) -> Vec<ForensicHashError> {
        let inputs = raw.inputs();
        let mut errors = HASH_TYPE.validate_all(&inputs);
        if errors.is_empty() {
            match raw.kind() {
                Ok(kind) => errors.extend(digest(kind).validate_all(&inputs)),
                Err(e) => errors.push(e),
            }
        }
        errors
    }

    /// Type declaration followed by the digest declaration for `kind`.
    pub fn schemas(kind: HashKind) -> [&'static Schema<ForensicHashError>; 2] {
        [&HASH_TYPE, digest(kind)]
    }

    /// Hex digest as supplied.
    pub fn hash_string(&self) -> &str {
        &self.hash_string
    }

    /// Parsed algorithm.
    pub fn hash_type(&self) -> HashKind {
        self.hash_type
    }

    /// Verification status.
    pub fn status(&self) -> ForensicStatus {
        self.status
    }
}

impl_validating_deserialize!(ForensicHash, RawForensicHash, |raw| ForensicHash::from_raw(&raw));

impl Export for ForensicHash {}

#[cfg(test)]
mod tests {
    use super::*;
    use sha2::{Digest, Sha256, Sha384, Sha512};
    use shield_core::RuleKind;

    #[test]
    fn archive_defaults() {
        let archive = ForensicArchive::new(&"t".repeat(32), "evidence-2024_03.zip").unwrap();
        assert_eq!(archive.status(), ForensicStatus::Scheduled);
        assert_eq!(archive.format(), Some(ForensicFormat::Zip));
        assert_eq!(archive.attributes().unwrap()["status"], "scheduled");
    }

    #[test]
    fn archive_format_from_extension() {
        let tid = "t".repeat(32);
        assert_eq!(ForensicArchive::new(&tid, "capture.RAR").unwrap().format(), Some(ForensicFormat::Rar));
        assert_eq!(ForensicArchive::new(&tid, "capture.tar").unwrap().format(), None);
        assert_eq!(ForensicArchive::new(&tid, "capture file").unwrap().format(), None);
    }

    #[test]
    fn archive_name_rules() {
        let tid = "t".repeat(32);
        let err = ForensicArchive::new(&tid, "a.zip").unwrap_err();
        match err {
            ForensicArchiveError::InvalidName(v) => assert_eq!(v.kinds(), vec![RuleKind::Length]),
            other => panic!("unexpected: {other:?}"),
        }
        assert!(matches!(
            ForensicArchive::new(&tid, "../etc/passwd.zip"),
            Err(ForensicArchiveError::InvalidName(_))
        ));
        assert!(matches!(
            ForensicArchive::new("bad", "evidence.zip"),
            Err(ForensicArchiveError::InvalidTicketId(_))
        ));
    }

    #[test]
    fn real_digests_accepted() {
        let data = b"forensic evidence archive";
        let cases = [
            (format!("{:x}", Sha256::digest(data)), "sha256", HashKind::Sha256),
            (format!("{:x}", Sha384::digest(data)), "Sha384", HashKind::Sha384),
            (format!("{:X}", Sha512::digest(data)), "SHA512", HashKind::Sha512),
        ];
        for (hex, declared, kind) in cases {
            let hash = ForensicHash::new(&hex, declared).unwrap();
            assert_eq!(hash.hash_type(), kind);
            assert_eq!(hash.hash_string(), hex);
            assert_eq!(hash.status(), ForensicStatus::Pending);
        }
    }

    #[test]
    fn blake_lengths() {
        assert!(ForensicHash::new(&"ab".repeat(64), "blake2b").is_ok());
        assert!(ForensicHash::new(&"ab".repeat(32), "blake2s").is_ok());
        assert!(matches!(
            ForensicHash::new(&"ab".repeat(32), "blake2b"),
            Err(ForensicHashError::InvalidHashString(_))
        ));
    }

    #[test]
    fn digest_length_must_match_type() {
        let sha256 = format!("{:x}", Sha256::digest(b"x"));
        let err = ForensicHash::new(&sha256, "sha512").unwrap_err();
        match err {
            ForensicHashError::InvalidHashString(v) => {
                assert_eq!(v.kinds(), vec![RuleKind::HashDigest]);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn type_checked_before_string() {
        let err = ForensicHash::new("", "md5").unwrap_err();
        assert_eq!(err, ForensicHashError::UnsupportedHashType(UnknownHashKind("md5".into())));

        let err = ForensicHash::new("", "").unwrap_err();
        assert!(matches!(err, ForensicHashError::InvalidHashType(_)));
        assert!(err.is_missing());
    }

    #[test]
    fn exported_type_is_canonical() {
        let hex = format!("{:x}", Sha256::digest(b"y"));
        let attrs = ForensicHash::new(&hex, "sha256").unwrap().attributes().unwrap();
        assert_eq!(attrs["hash_type"], "SHA256");
        assert_eq!(attrs["hash_string"], hex.as_str());
    }

    #[test]
    fn audit_reports_unsupported_type_alone() {
        let raw = RawForensicHash {
            hash_string: Some("zz".into()),
            hash_type: Some("crc32".into()),
        };
        let errors = ForensicHash::audit(&raw);
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], ForensicHashError::UnsupportedHashType(_)));
    }

    #[test]
    fn digest_schemas_use_catalog_chains() {
        for kind in HashKind::all() {
            let [_, schema] = ForensicHash::schemas(*kind);
            let field = schema.field("hash_string").unwrap();
            match field.check {
                Check::Chain(chain) => {
                    assert_eq!(chain, catalog::forensic::hash_chain(*kind));
                }
                _ => panic!("hash_string must use a single chain"),
            }
        }
    }

    #[test]
    fn numeric_hash_type_is_a_type_error() {
        let raw = RawForensicHash {
            hash_string: Some("ab".repeat(32).into()),
            hash_type: Some(RawField::Mistyped(serde_json::json!(256))),
        };
        match ForensicHash::from_raw(&raw).unwrap_err() {
            ForensicHashError::InvalidHashType(v) => {
                assert!(v.kinds().contains(&RuleKind::TypedString));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
