use serde::{Deserialize, Serialize};
use shield_core::{Check, FieldError, FieldSpec, Input, Presence, Schema, ValidationVerdict};
use thiserror::Error;

use super::has_targets;
use crate::catalog;
use crate::genre::TicketGenre;
use crate::identifier::Identifier;
use crate::raw::{supplied, RawField, RawSlot, RawText};
use crate::Export;

/// Error constructing a [`TicketErrorReport`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TicketErrorReportError {
    /// None of `fqdn`, `ipv4`, `ipv6` carries a value.
    #[error("ticket error report has no FQDN, IPv4 or IPv6 items")]
    NoData,

    /// `ticket_error_id` failed its chain.
    #[error("ticket error identifier is not valid:\n{0}")]
    InvalidTicketErrorId(ValidationVerdict),

    /// `ticket_id` failed its chain.
    #[error("ticket identifier is not valid:\n{0}")]
    InvalidTicketId(ValidationVerdict),

    /// `fqdn` is empty or has a bad element.
    #[error("FQDN list is not valid:\n{0}")]
    InvalidFqdn(ValidationVerdict),

    /// `ipv4` is empty or has a bad element.
    #[error("IPv4 list is not valid:\n{0}")]
    InvalidIpv4(ValidationVerdict),

    /// `ipv6` is empty or has a bad element.
    #[error("IPv6 list is not valid:\n{0}")]
    InvalidIpv6(ValidationVerdict),
}

impl FieldError for TicketErrorReportError {
    fn verdict(&self) -> Option<&ValidationVerdict> {
        match self {
            Self::InvalidTicketErrorId(v)
            | Self::InvalidTicketId(v)
            | Self::InvalidFqdn(v)
            | Self::InvalidIpv4(v)
            | Self::InvalidIpv6(v) => Some(v),
            Self::NoData => None,
        }
    }
}

static SCHEMA: Schema<TicketErrorReportError> = Schema::new(
    "ticket_error",
    &[
        FieldSpec {
            name: "ticket_error_id",
            check: Check::Chain(&catalog::ticket_error::TICKET_ERROR_ID),
            presence: Presence::Required,
            error: TicketErrorReportError::InvalidTicketErrorId,
        },
        FieldSpec {
            name: "ticket_id",
            check: Check::Chain(&catalog::ticket::TICKET_ID),
            presence: Presence::Required,
            error: TicketErrorReportError::InvalidTicketId,
        },
        FieldSpec {
            name: "fqdn",
            check: Check::Each(&catalog::ticket::FQDN),
            presence: Presence::IfPresent,
            error: TicketErrorReportError::InvalidFqdn,
        },
        FieldSpec {
            name: "ipv4",
            check: Check::Each(&catalog::ticket::IPV4),
            presence: Presence::IfPresent,
            error: TicketErrorReportError::InvalidIpv4,
        },
        FieldSpec {
            name: "ipv6",
            check: Check::Each(&catalog::ticket::IPV6),
            presence: Presence::IfPresent,
            error: TicketErrorReportError::InvalidIpv6,
        },
    ],
);

/// Unvalidated ticket error report fields.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawTicketErrorReport {
    /// 32-character report identifier.
    pub ticket_error_id: Option<RawField<String>>,
    /// Ticket being corrected.
    pub ticket_id: Option<RawField<String>>,
    /// FQDNs blocked in error.
    pub fqdn: Option<RawField<Vec<String>>>,
    /// IPv4 addresses blocked in error.
    pub ipv4: Option<RawField<Vec<String>>>,
    /// IPv6 addresses blocked in error.
    pub ipv6: Option<RawField<Vec<String>>>,
}

impl RawTicketErrorReport {
    fn inputs(&self) -> [(&'static str, Input<'_>); 5] {
        [
            ("ticket_error_id", self.ticket_error_id.input()),
            ("ticket_id", self.ticket_id.input()),
            ("fqdn", self.fqdn.input()),
            ("ipv4", self.ipv4.input()),
            ("ipv6", self.ipv6.input()),
        ]
    }

    fn has_targets(&self) -> bool {
        has_targets([self.fqdn.input(), self.ipv4.input(), self.ipv6.input()])
    }
}

/// A correction filed against an existing ticket, listing the targets
/// that were blocked in error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketErrorReport {
    ticket_error_id: Identifier,
    ticket_id: Identifier,
    #[serde(skip_serializing_if = "Option::is_none")]
    fqdn: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ipv4: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ipv6: Option<Vec<String>>,
    genre: TicketGenre,
}

impl TicketErrorReport {
    /// Validate and build a report.
    pub fn new(
        ticket_error_id: &str,
        ticket_id: &str,
        fqdn: Option<&[String]>,
        ipv4: Option<&[String]>,
        ipv6: Option<&[String]>,
    ) -> Result<Self, TicketErrorReportError> {
        Self::from_raw(&RawTicketErrorReport {
            ticket_error_id: supplied(ticket_error_id),
            ticket_id: supplied(ticket_id),
            fqdn: fqdn.map(<[String]>::to_vec).map(RawField::from),
            ipv4: ipv4.map(<[String]>::to_vec).map(RawField::from),
            ipv6: ipv6.map(<[String]>::to_vec).map(RawField::from),
        })
    }

    /// Same no-data precheck as [`Ticket`](super::Ticket), then every field
    /// in declaration order.
    pub fn from_raw(raw: &RawTicketErrorReport) -> Result<Self, TicketErrorReportError> {
        if !raw.has_targets() {
            tracing::debug!(entity = "ticket_error", "no target lists supplied");
            return Err(TicketErrorReportError::NoData);
        }

        SCHEMA.construct(&raw.inputs(), || {
            Ok(Self {
                ticket_error_id: Identifier::from_validated(raw.ticket_error_id.text()),
                ticket_id: Identifier::from_validated(raw.ticket_id.text()),
                fqdn: raw.fqdn.typed().cloned(),
                ipv4: raw.ipv4.typed().cloned(),
                ipv6: raw.ipv6.typed().cloned(),
                genre: TicketGenre::Error,
            })
        })
    }

    /// Every error; a failed no-data precheck is reported alone.
    pub fn audit(raw: &RawTicketErrorReport) -> Vec<TicketErrorReportError> {
        if !raw.has_targets() {
            return vec![TicketErrorReportError::NoData];
        }
        SCHEMA.validate_all(&raw.inputs())
    }

    /// Field declarations, in validation order.
    pub fn schema() -> &'static Schema<TicketErrorReportError> {
        &SCHEMA
    }

    /// Report identifier.
    pub fn ticket_error_id(&self) -> &Identifier {
        &self.ticket_error_id
    }

    /// Ticket being corrected.
    pub fn ticket_id(&self) -> &Identifier {
        &self.ticket_id
    }

    /// FQDNs blocked in error.
    pub fn fqdn(&self) -> Option<&[String]> {
        self.fqdn.as_deref()
    }

    /// IPv4 addresses blocked in error.
    pub fn ipv4(&self) -> Option<&[String]> {
        self.ipv4.as_deref()
    }

    /// IPv6 addresses blocked in error.
    pub fn ipv6(&self) -> Option<&[String]> {
        self.ipv6.as_deref()
    }

    /// Always [`TicketGenre::Error`].
    pub fn genre(&self) -> TicketGenre {
        self.genre
    }
}

impl_validating_deserialize!(TicketErrorReport, RawTicketErrorReport, |raw| {
    TicketErrorReport::from_raw(&raw)
});

impl Export for TicketErrorReport {}
