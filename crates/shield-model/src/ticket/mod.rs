//! # Tickets
//!
//! A blocking ticket names the targets of a blocking order: lists of FQDNs,
//! IPv4 and IPv6 addresses. A ticket error report corrects a previous
//! ticket with the same kind of lists.
//!
//! ## Validation Order
//!
//! 1. No-data precheck: at least one of `fqdn`, `ipv4`, `ipv6` must carry
//!    a non-empty value. This runs before any field check.
//! 2. `ticket_id`, `dda_id`, `description`, `fqdn`, `ipv4`, `ipv6`,
//!    `assigned_to`. An empty `description` or `assigned_to` counts as
//!    omitted. A target list that is supplied but empty fails as missing.

mod report;

pub use report::{RawTicketErrorReport, TicketErrorReport, TicketErrorReportError};

use serde::{Deserialize, Serialize};
use shield_core::{Check, FieldError, FieldSpec, Input, Presence, Schema, ValidationVerdict};
use thiserror::Error;

use crate::catalog;
use crate::genre::TicketGenre;
use crate::identifier::Identifier;
use crate::raw::{supplied, RawField, RawSlot, RawText};
use crate::settings::{ConfigError, TicketSettings};
use crate::status::TicketStatus;
use crate::Export;

/// Error constructing a [`Ticket`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TicketError {
    /// None of `fqdn`, `ipv4`, `ipv6` carries a value.
    #[error("ticket has no FQDN, IPv4 or IPv6 items")]
    NoData,

    /// `ticket_id` failed its chain.
    #[error("ticket identifier is not valid:\n{0}")]
    InvalidTicketId(ValidationVerdict),

    /// `dda_id` failed its chain.
    #[error("DDA identifier is not valid:\n{0}")]
    InvalidDdaId(ValidationVerdict),

    /// `description` failed its chain.
    #[error("ticket description is not valid:\n{0}")]
    InvalidDescription(ValidationVerdict),

    /// `fqdn` is empty or has a bad element.
    #[error("FQDN list is not valid:\n{0}")]
    InvalidFqdn(ValidationVerdict),

    /// `ipv4` is empty or has a bad element.
    #[error("IPv4 list is not valid:\n{0}")]
    InvalidIpv4(ValidationVerdict),

    /// `ipv6` is empty or has a bad element.
    #[error("IPv6 list is not valid:\n{0}")]
    InvalidIpv6(ValidationVerdict),

    /// An `assigned_to` element is not an account identifier.
    #[error("assigned account list is not valid:\n{0}")]
    InvalidAssignedTo(ValidationVerdict),

    /// Settings passed to [`Ticket::with_settings`] are inconsistent.
    #[error(transparent)]
    Settings(#[from] ConfigError),
}

impl FieldError for TicketError {
    fn verdict(&self) -> Option<&ValidationVerdict> {
        match self {
            Self::InvalidTicketId(v)
            | Self::InvalidDdaId(v)
            | Self::InvalidDescription(v)
            | Self::InvalidFqdn(v)
            | Self::InvalidIpv4(v)
            | Self::InvalidIpv6(v)
            | Self::InvalidAssignedTo(v) => Some(v),
            Self::NoData | Self::Settings(_) => None,
        }
    }
}

static SCHEMA: Schema<TicketError> = Schema::new(
    "ticket",
    &[
        FieldSpec {
            name: "ticket_id",
            check: Check::Chain(&catalog::ticket::TICKET_ID),
            presence: Presence::Required,
            error: TicketError::InvalidTicketId,
        },
        FieldSpec {
            name: "dda_id",
            check: Check::Chain(&catalog::dda::DDA_ID),
            presence: Presence::Required,
            error: TicketError::InvalidDdaId,
        },
        FieldSpec {
            name: "description",
            check: Check::Chain(&catalog::ticket::DESCRIPTION),
            presence: Presence::Optional,
            error: TicketError::InvalidDescription,
        },
        FieldSpec {
            name: "fqdn",
            check: Check::Each(&catalog::ticket::FQDN),
            presence: Presence::IfPresent,
            error: TicketError::InvalidFqdn,
        },
        FieldSpec {
            name: "ipv4",
            check: Check::Each(&catalog::ticket::IPV4),
            presence: Presence::IfPresent,
            error: TicketError::InvalidIpv4,
        },
        FieldSpec {
            name: "ipv6",
            check: Check::Each(&catalog::ticket::IPV6),
            presence: Presence::IfPresent,
            error: TicketError::InvalidIpv6,
        },
        FieldSpec {
            name: "assigned_to",
            check: Check::Each(&catalog::account::ACCOUNT_ID),
            presence: Presence::Optional,
            error: TicketError::InvalidAssignedTo,
        },
    ],
);

/// True when at least one target field carries a value. A non-list value
/// counts, so it reaches its own field check.
pub(crate) fn has_targets(targets: [Input<'_>; 3]) -> bool {
    targets.iter().any(|input| !input.is_empty())
}

/// Unvalidated ticket fields.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawTicket {
    /// 32-character identifier.
    pub ticket_id: Option<RawField<String>>,
    /// DDA the ticket is filed under.
    pub dda_id: Option<RawField<String>>,
    /// Optional free text.
    pub description: Option<RawField<String>>,
    /// FQDN targets.
    pub fqdn: Option<RawField<Vec<String>>>,
    /// IPv4 targets.
    pub ipv4: Option<RawField<Vec<String>>>,
    /// IPv6 targets.
    pub ipv6: Option<RawField<Vec<String>>>,
    /// Provider accounts the ticket is assigned to.
    pub assigned_to: Option<RawField<Vec<String>>>,
}

impl RawTicket {
    fn inputs(&self) -> [(&'static str, Input<'_>); 7] {
        [
            ("ticket_id", self.ticket_id.input()),
            ("dda_id", self.dda_id.input()),
            ("description", self.description.input()),
            ("fqdn", self.fqdn.input()),
            ("ipv4", self.ipv4.input()),
            ("ipv6", self.ipv6.input()),
            ("assigned_to", self.assigned_to.input()),
        ]
    }

    fn has_targets(&self) -> bool {
        has_targets([self.fqdn.input(), self.ipv4.input(), self.ipv6.input()])
    }
}

/// A validated blocking ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ticket {
    ticket_id: Identifier,
    dda_id: Identifier,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fqdn: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ipv4: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ipv6: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    assigned_to: Option<Vec<Identifier>>,
    status: TicketStatus,
    genre: TicketGenre,
    settings: TicketSettings,
}

impl Ticket {
    /// Validate and build a blocking ticket with default settings.
    pub fn new(
        ticket_id: &str,
        dda_id: &str,
        fqdn: Option<&[String]>,
        ipv4: Option<&[String]>,
        ipv6: Option<&[String]>,
        assigned_to: Option<&[String]>,
        description: Option<&str>,
    ) -> Result<Self, TicketError> {
        Self::from_raw(&RawTicket {
            ticket_id: supplied(ticket_id),
            dda_id: supplied(dda_id),
            description: description.map(RawField::from),
            fqdn: fqdn.map(<[String]>::to_vec).map(RawField::from),
            ipv4: ipv4.map(<[String]>::to_vec).map(RawField::from),
            ipv6: ipv6.map(<[String]>::to_vec).map(RawField::from),
            assigned_to: assigned_to.map(<[String]>::to_vec).map(RawField::from),
        })
    }

    /// Validate raw fields, failing on the first offending one.
    ///
    /// An empty `description` or `assigned_to` is stored as absent.
    pub fn from_raw(raw: &RawTicket) -> Result<Self, TicketError> {
        if !raw.has_targets() {
            tracing::debug!(entity = "ticket", "no target lists supplied");
            return Err(TicketError::NoData);
        }

        SCHEMA.construct(&raw.inputs(), || {
            Ok(Self {
                ticket_id: Identifier::from_validated(raw.ticket_id.text()),
                dda_id: Identifier::from_validated(raw.dda_id.text()),
                description: raw.description.non_empty(),
                fqdn: raw.fqdn.typed().cloned(),
                ipv4: raw.ipv4.typed().cloned(),
                ipv6: raw.ipv6.typed().cloned(),
                assigned_to: raw
                    .assigned_to
                    .typed()
                    .filter(|ids| !ids.is_empty())
                    .map(|ids| ids.iter().map(|id| Identifier::from_validated(id)).collect()),
                status: TicketStatus::Created,
                genre: TicketGenre::Blocking,
                settings: TicketSettings::default(),
            })
        })
    }

    /// Every error the raw fields produce. The no-data precheck, when it
    /// fails, is the only error reported.
    pub fn audit(raw: &RawTicket) -> Vec<TicketError> {
        if !raw.has_targets() {
            return vec![TicketError::NoData];
        }
        SCHEMA.validate_all(&raw.inputs())
    }

    /// Field declarations, in validation order.
    pub fn schema() -> &'static Schema<TicketError> {
        &SCHEMA
    }

    /// Replace the default processing windows.
    pub fn with_settings(mut self, settings: TicketSettings) -> Result<Self, TicketError> {
        settings.validate()?;
        self.settings = settings;
        Ok(self)
    }

    /// Ticket identifier.
    pub fn ticket_id(&self) -> &Identifier {
        &self.ticket_id
    }

    /// DDA the ticket is filed under.
    pub fn dda_id(&self) -> &Identifier {
        &self.dda_id
    }

    /// Free text, when supplied.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// FQDN targets.
    pub fn fqdn(&self) -> Option<&[String]> {
        self.fqdn.as_deref()
    }

    /// IPv4 targets.
    pub fn ipv4(&self) -> Option<&[String]> {
        self.ipv4.as_deref()
    }

    /// IPv6 targets.
    pub fn ipv6(&self) -> Option<&[String]> {
        self.ipv6.as_deref()
    }

    /// Assigned provider accounts.
    pub fn assigned_to(&self) -> Option<&[Identifier]> {
        self.assigned_to.as_deref()
    }

    /// Lifecycle status, `created` on construction.
    pub fn status(&self) -> TicketStatus {
        self.status
    }

    /// Always [`TicketGenre::Blocking`].
    pub fn genre(&self) -> TicketGenre {
        self.genre
    }

    /// Processing windows.
    pub fn settings(&self) -> &TicketSettings {
        &self.settings
    }
}

impl_validating_deserialize!(Ticket, RawTicket, |raw| Ticket::from_raw(&raw));

impl Export for Ticket {}

#[cfg(test)]
mod tests {
    use super::*;
    use shield_core::RuleKind;

    fn list(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn tid() -> String {
        "t".repeat(32)
    }

    fn did() -> String {
        "d".repeat(32)
    }

    #[test]
    fn all_lists_empty_is_no_data() {
        let empty: Vec<String> = Vec::new();
        let err = Ticket::new(&tid(), &did(), Some(&empty[..]), Some(&empty[..]), Some(&empty[..]), None, None)
            .unwrap_err();
        assert_eq!(err, TicketError::NoData);
    }

    #[test]
    fn no_data_precedes_field_checks() {
        let err = Ticket::new("bad", "bad", None, None, None, None, Some("!")).unwrap_err();
        assert_eq!(err, TicketError::NoData);
    }

    #[test]
    fn one_list_is_enough() {
        let fqdn = list(&["streaming.example.com"]);
        let ticket = Ticket::new(&tid(), &did(), Some(&fqdn[..]), None, None, None, None).unwrap();
        assert_eq!(ticket.status(), TicketStatus::Created);
        assert_eq!(ticket.genre(), TicketGenre::Blocking);
        assert_eq!(ticket.settings(), &TicketSettings::default());
        assert_eq!(ticket.fqdn(), Some(fqdn.as_slice()));
        assert!(ticket.ipv4().is_none());
    }

    #[test]
    fn declared_but_empty_list_is_missing() {
        let ipv4 = list(&["8.8.8.8"]);
        let empty: Vec<String> = Vec::new();
        let err = Ticket::new(&tid(), &did(), Some(&empty[..]), Some(&ipv4[..]), None, None, None)
            .unwrap_err();
        assert!(matches!(err, TicketError::InvalidFqdn(_)));
        assert!(err.is_missing());
    }

    #[test]
    fn list_elements_are_checked_with_index() {
        let ipv4 = list(&["8.8.8.8", "999.1.1.1"]);
        match Ticket::new(&tid(), &did(), None, Some(&ipv4[..]), None, None, None).unwrap_err() {
            TicketError::InvalidIpv4(v) => {
                assert_eq!(v.violations().len(), 1);
                assert_eq!(v.violations()[0].index, Some(1));
                assert_eq!(v.violations()[0].rule, RuleKind::Ipv4);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn assigned_to_holds_account_ids() {
        let ipv6 = list(&["2001:db8::1"]);
        let assigned = list(&["p".repeat(32).as_str(), "short"]);
        let err = Ticket::new(&tid(), &did(), None, None, Some(&ipv6[..]), Some(&assigned[..]), None)
            .unwrap_err();
        assert!(matches!(err, TicketError::InvalidAssignedTo(_)));

        let assigned = list(&["p".repeat(32).as_str()]);
        let ticket =
            Ticket::new(&tid(), &did(), None, None, Some(&ipv6[..]), Some(&assigned[..]), None).unwrap();
        assert_eq!(ticket.assigned_to().map(|a| a.len()), Some(1));
    }

    #[test]
    fn description_is_optional_but_checked() {
        let fqdn = list(&["example.com"]);
        let ok = Ticket::new(&tid(), &did(), Some(&fqdn[..]), None, None, None, Some("Serie A, round 3"));
        assert_eq!(ok.unwrap().description(), Some("Serie A, round 3"));

        let err = Ticket::new(&tid(), &did(), Some(&fqdn[..]), None, None, None, Some("<script>"))
            .unwrap_err();
        assert!(matches!(err, TicketError::InvalidDescription(_)));
    }

    #[test]
    fn settings_override() {
        let fqdn = list(&["example.com"]);
        let ticket = Ticket::new(&tid(), &did(), Some(&fqdn[..]), None, None, None, None).unwrap();
        let custom = TicketSettings {
            autoclose_time: 3600,
            ..TicketSettings::default()
        };
        let ticket = ticket.with_settings(custom).unwrap();
        assert_eq!(ticket.settings().autoclose_time, 3600);

        let broken = TicketSettings {
            revoke_time: 0,
            ..TicketSettings::default()
        };
        assert!(matches!(ticket.with_settings(broken), Err(TicketError::Settings(_))));
    }

    #[test]
    fn audit_collects_field_errors() {
        let raw = RawTicket {
            ticket_id: Some("x".into()),
            dda_id: None,
            fqdn: Some(list(&["bad_host"]).into()),
            ..RawTicket::default()
        };
        let errors = Ticket::audit(&raw);
        assert_eq!(errors.len(), 3);
        assert!(matches!(errors[0], TicketError::InvalidTicketId(_)));
        assert!(errors[1].is_missing());
        assert!(matches!(errors[2], TicketError::InvalidFqdn(_)));
    }

    #[test]
    fn export_omits_absent_lists() {
        let fqdn = list(&["example.com"]);
        let attrs = Ticket::new(&tid(), &did(), Some(&fqdn[..]), None, None, None, None)
            .unwrap()
            .attributes()
            .unwrap();
        assert_eq!(attrs["ticket_id"], tid());
        assert_eq!(attrs["status"], "created");
        assert_eq!(attrs["genre"], "blocking");
        assert_eq!(attrs["settings"]["revoke_time"], 75);
        assert!(!attrs.contains_key("ipv4"));
        assert!(!attrs.contains_key("description"));
        assert!(!attrs.contains_key("assigned_to"));
    }

    #[test]
    fn empty_optionals_count_as_omitted() {
        let fqdn = list(&["example.com"]);
        let none: Vec<String> = Vec::new();
        let ticket =
            Ticket::new(&tid(), &did(), Some(&fqdn[..]), None, None, Some(&none[..]), Some(""))
                .unwrap();
        assert_eq!(ticket.description(), None);
        assert_eq!(ticket.assigned_to(), None);
        let attrs = ticket.attributes().unwrap();
        assert!(!attrs.contains_key("description"));
        assert!(!attrs.contains_key("assigned_to"));
    }

    #[test]
    fn non_list_target_reaches_its_field_check() {
        let raw: RawTicket = serde_json::from_value(serde_json::json!({
            "ticket_id": tid(),
            "dda_id": did(),
            "fqdn": "example.com"
        }))
        .unwrap();
        match Ticket::from_raw(&raw).unwrap_err() {
            TicketError::InvalidFqdn(v) => assert!(!v.is_missing()),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
