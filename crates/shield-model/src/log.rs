//! Audit messages attached to a ticket or to a single ticket item.

use serde::{Deserialize, Serialize};
use shield_core::{Check, FieldError, FieldSpec, Input, Presence, Schema, ValidationVerdict};
use thiserror::Error;

use crate::catalog;
use crate::identifier::Identifier;
use crate::raw::{supplied, RawField, RawSlot, RawText};
use crate::Export;

/// Error constructing a [`LogTicket`] or [`LogTicketItem`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LogError {
    /// `ticket_id` failed its chain.
    #[error("ticket identifier is not valid:\n{0}")]
    InvalidTicketId(ValidationVerdict),

    /// `ticket_item_id` failed its chain.
    #[error("ticket item identifier is not valid:\n{0}")]
    InvalidTicketItemId(ValidationVerdict),

    /// `message` failed its chain.
    #[error("log message is not valid:\n{0}")]
    InvalidMessage(ValidationVerdict),
}

impl FieldError for LogError {
    fn verdict(&self) -> Option<&ValidationVerdict> {
        match self {
            Self::InvalidTicketId(v) | Self::InvalidTicketItemId(v) | Self::InvalidMessage(v) => Some(v),
        }
    }
}

const MESSAGE: FieldSpec<LogError> = FieldSpec {
    name: "message",
    check: Check::Chain(&catalog::log::MESSAGE),
    presence: Presence::Required,
    error: LogError::InvalidMessage,
};

static TICKET: Schema<LogError> = Schema::new(
    "log_ticket",
    &[
        FieldSpec {
            name: "ticket_id",
            check: Check::Chain(&catalog::ticket::TICKET_ID),
            presence: Presence::Required,
            error: LogError::InvalidTicketId,
        },
        MESSAGE,
    ],
);

static TICKET_ITEM: Schema<LogError> = Schema::new(
    "log_ticket_item",
    &[
        FieldSpec {
            name: "ticket_item_id",
            check: Check::Chain(&catalog::ticket_item::TICKET_ITEM_ID),
            presence: Presence::Required,
            error: LogError::InvalidTicketItemId,
        },
        MESSAGE,
    ],
);

/// Unvalidated [`LogTicket`] fields.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawLogTicket {
    /// Ticket the message is about.
    pub ticket_id: Option<RawField<String>>,
    /// Message text.
    pub message: Option<RawField<String>>,
}

impl RawLogTicket {
    fn inputs(&self) -> [(&'static str, Input<'_>); 2] {
        [
            ("ticket_id", self.ticket_id.input()),
            ("message", self.message.input()),
        ]
    }
}

/// A message about a ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogTicket {
    ticket_id: Identifier,
    message: String,
}

impl LogTicket {
    /// Validate and build the record.
    pub fn new(ticket_id: &str, message: &str) -> Result<Self, LogError> {
        Self::from_raw(&RawLogTicket {
            ticket_id: supplied(ticket_id),
            message: supplied(message),
        })
    }

    /// Validate raw fields, failing on the first offending one.
    pub fn from_raw(raw: &RawLogTicket) -> Result<Self, LogError> {
        TICKET.construct(&raw.inputs(), || {
            Ok(Self {
                ticket_id: Identifier::from_validated(raw.ticket_id.text()),
                message: raw.message.text().to_string(),
            })
        })
    }

    /// Every field error, in declaration order.
    pub fn audit(raw: &RawLogTicket) -> Vec<LogError> {
        TICKET.validate_all(&raw.inputs())
    }

    /// Field declarations, in validation order.
    pub fn schema() -> &'static Schema<LogError> {
        &TICKET
    }

    /// Ticket the message is about.
    pub fn ticket_id(&self) -> &Identifier {
        &self.ticket_id
    }

    /// Message text.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl_validating_deserialize!(LogTicket, RawLogTicket, |raw| LogTicket::from_raw(&raw));

impl Export for LogTicket {}

/// Unvalidated [`LogTicketItem`] fields.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawLogTicketItem {
    /// Item the message is about.
    pub ticket_item_id: Option<RawField<String>>,
    /// Message text.
    pub message: Option<RawField<String>>,
}

impl RawLogTicketItem {
    fn inputs(&self) -> [(&'static str, Input<'_>); 2] {
        [
            ("ticket_item_id", self.ticket_item_id.input()),
            ("message", self.message.input()),
        ]
    }
}

/// A message about one ticket item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogTicketItem {
    ticket_item_id: Identifier,
    message: String,
}

impl LogTicketItem {
    /// Validate and build the record.
    pub fn new(ticket_item_id: &str, message: &str) -> Result<Self, LogError> {
        Self::from_raw(&RawLogTicketItem {
            ticket_item_id: supplied(ticket_item_id),
            message: supplied(message),
        })
    }

    /// Validate raw fields, failing on the first offending one.
    pub fn from_raw(raw: &RawLogTicketItem) -> Result<Self, LogError> {
        TICKET_ITEM.construct(&raw.inputs(), || {
            Ok(Self {
                ticket_item_id: Identifier::from_validated(raw.ticket_item_id.text()),
                message: raw.message.text().to_string(),
            })
        })
    }

    /// Every field error, in declaration order.
    pub fn audit(raw: &RawLogTicketItem) -> Vec<LogError> {
        TICKET_ITEM.validate_all(&raw.inputs())
    }

    /// Field declarations, in validation order.
    pub fn schema() -> &'static Schema<LogError> {
        &TICKET_ITEM
    }

    /// Item the message is about.
    pub fn ticket_item_id(&self) -> &Identifier {
        &self.ticket_item_id
    }

    /// Message text.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl_validating_deserialize!(LogTicketItem, RawLogTicketItem, |raw| LogTicketItem::from_raw(&raw));

impl Export for LogTicketItem {}
