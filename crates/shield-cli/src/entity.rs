//! # Entity Dispatch
//!
//! Maps a command-line entity name onto the record type in `shield-model`
//! and runs one of three operations on a JSON payload: build and export,
//! audit every field, or describe the declared chains.
//!
//! Payloads are deserialized into the record's raw form and passed to
//! `from_raw`, so a rejected payload surfaces the record's own
//! field-specific error rather than a serde message.

use std::fmt::Display;

use clap::ValueEnum;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use shield_core::HashKind;
use shield_model::account::{RawAccount, RawAuthentication, KNOWN_FLAGS};
use shield_model::dda::RawDda;
use shield_model::forensic::{RawForensicArchive, RawForensicHash};
use shield_model::log::{RawLogTicket, RawLogTicketItem};
use shield_model::ticket::{RawTicket, RawTicketErrorReport};
use shield_model::ticket_item::{RawTicketItem, RawTicketItemProcessed, RawTicketItemUnprocessed};
use shield_model::whitelist::RawWhitelistItem;
use shield_model::{
    Account, AccountFlags, Authentication, Dda, Export, ForensicArchive, ForensicHash, LogTicket,
    LogTicketItem, ModelError, ModelSettings, Ticket, TicketErrorReport, TicketItem,
    TicketItemGenre, TicketItemProcessed, TicketItemUnprocessed, WhitelistGenre, WhitelistItem,
};

/// Record types the CLI can check.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Account,
    Authentication,
    AccountFlags,
    Dda,
    Ticket,
    TicketError,
    TicketItem,
    TicketItemProcessed,
    TicketItemUnprocessed,
    Whitelist,
    ForensicArchive,
    ForensicHash,
    LogTicket,
    LogTicketItem,
}

impl EntityKind {
    /// Build the record from `payload` and return its exported attributes.
    ///
    /// `settings` replaces the default processing windows of tickets and
    /// ticket items; other records ignore it.
    pub fn build(
        self,
        payload: Value,
        settings: &ModelSettings,
    ) -> Result<Map<String, Value>, ModelError> {
        match self {
            Self::Account => export::<RawAccount, _, _>(payload, Account::from_raw),
            Self::Authentication => {
                export::<RawAuthentication, _, _>(payload, Authentication::from_raw)
            }
            Self::AccountFlags => match payload {
                Value::Object(map) => Ok(AccountFlags::new(&map)?.attributes()?),
                other => Err(not_an_object(&other)),
            },
            Self::Dda => export::<RawDda, _, _>(payload, Dda::from_raw),
            Self::Ticket => {
                let ticket = build::<RawTicket, _, _>(payload, Ticket::from_raw)?;
                ticket.with_settings(settings.ticket)?.attributes()
            }
            Self::TicketError => {
                export::<RawTicketErrorReport, _, _>(payload, TicketErrorReport::from_raw)
            }
            Self::TicketItem => {
                let item = build::<RawTicketItem, _, _>(payload, TicketItem::from_raw)?;
                item.with_settings(settings.ticket_item)?.attributes()
            }
            Self::TicketItemProcessed => {
                export::<RawTicketItemProcessed, _, _>(payload, TicketItemProcessed::from_raw)
            }
            Self::TicketItemUnprocessed => {
                export::<RawTicketItemUnprocessed, _, _>(payload, TicketItemUnprocessed::from_raw)
            }
            Self::Whitelist => export::<RawWhitelistItem, _, _>(payload, WhitelistItem::from_raw),
            Self::ForensicArchive => {
                export::<RawForensicArchive, _, _>(payload, ForensicArchive::from_raw)
            }
            Self::ForensicHash => export::<RawForensicHash, _, _>(payload, ForensicHash::from_raw),
            Self::LogTicket => export::<RawLogTicket, _, _>(payload, LogTicket::from_raw),
            Self::LogTicketItem => {
                export::<RawLogTicketItem, _, _>(payload, LogTicketItem::from_raw)
            }
        }
    }

    /// Every field error in `payload`, rendered. Empty when the payload
    /// passes field validation.
    pub fn audit(self, payload: Value) -> Result<Vec<String>, ModelError> {
        match self {
            Self::Account => audit::<RawAccount, _>(payload, Account::audit),
            Self::Authentication => audit::<RawAuthentication, _>(payload, Authentication::audit),
            Self::AccountFlags => match payload {
                Value::Object(map) => Ok(AccountFlags::new(&map)
                    .err()
                    .map(|e| e.to_string())
                    .into_iter()
                    .collect()),
                other => Err(not_an_object(&other)),
            },
            Self::Dda => audit::<RawDda, _>(payload, Dda::audit),
            Self::Ticket => audit::<RawTicket, _>(payload, Ticket::audit),
            Self::TicketError => {
                audit::<RawTicketErrorReport, _>(payload, TicketErrorReport::audit)
            }
            Self::TicketItem => audit::<RawTicketItem, _>(payload, TicketItem::audit),
            Self::TicketItemProcessed => {
                audit::<RawTicketItemProcessed, _>(payload, TicketItemProcessed::audit)
            }
            Self::TicketItemUnprocessed => {
                audit::<RawTicketItemUnprocessed, _>(payload, TicketItemUnprocessed::audit)
            }
            Self::Whitelist => audit::<RawWhitelistItem, _>(payload, WhitelistItem::audit),
            Self::ForensicArchive => {
                audit::<RawForensicArchive, _>(payload, ForensicArchive::audit)
            }
            Self::ForensicHash => audit::<RawForensicHash, _>(payload, ForensicHash::audit),
            Self::LogTicket => audit::<RawLogTicket, _>(payload, LogTicket::audit),
            Self::LogTicketItem => audit::<RawLogTicketItem, _>(payload, LogTicketItem::audit),
        }
    }

    /// Declared field chains, one schema per entry. Records whose chains
    /// depend on a genre or algorithm list one entry per choice.
    pub fn rules(self) -> Vec<String> {
        match self {
            Self::Account => vec![Account::schema().to_string()],
            Self::Authentication => vec![Authentication::schema().to_string()],
            Self::AccountFlags => {
                vec![format!("account_flags\n  known: {}", KNOWN_FLAGS.join(", "))]
            }
            Self::Dda => vec![Dda::schema().to_string()],
            Self::Ticket => vec![Ticket::schema().to_string()],
            Self::TicketError => vec![TicketErrorReport::schema().to_string()],
            Self::TicketItem => TicketItemGenre::all()
                .iter()
                .map(|genre| joined(TicketItem::schemas(*genre)))
                .collect(),
            Self::TicketItemProcessed => vec![TicketItemProcessed::schema().to_string()],
            Self::TicketItemUnprocessed => vec![joined(TicketItemUnprocessed::schemas())],
            Self::Whitelist => WhitelistGenre::all()
                .iter()
                .map(|genre| joined(WhitelistItem::schemas(*genre)))
                .collect(),
            Self::ForensicArchive => vec![ForensicArchive::schema().to_string()],
            Self::ForensicHash => HashKind::all()
                .iter()
                .map(|kind| joined(ForensicHash::schemas(*kind)))
                .collect(),
            Self::LogTicket => vec![LogTicket::schema().to_string()],
            Self::LogTicketItem => vec![LogTicketItem::schema().to_string()],
        }
    }
}

fn build<R, T, E>(payload: Value, from_raw: fn(&R) -> Result<T, E>) -> Result<T, ModelError>
where
    R: DeserializeOwned,
    ModelError: From<E>,
{
    let raw: R = serde_json::from_value(payload)?;
    Ok(from_raw(&raw)?)
}

fn export<R, T, E>(
    payload: Value,
    from_raw: fn(&R) -> Result<T, E>,
) -> Result<Map<String, Value>, ModelError>
where
    R: DeserializeOwned,
    T: Export,
    ModelError: From<E>,
{
    build(payload, from_raw)?.attributes()
}

fn audit<R, E>(payload: Value, audit: fn(&R) -> Vec<E>) -> Result<Vec<String>, ModelError>
where
    R: DeserializeOwned,
    E: Display,
{
    let raw: R = serde_json::from_value(payload)?;
    Ok(audit(&raw).iter().map(ToString::to_string).collect())
}

fn joined<S: Display, const N: usize>(schemas: [S; N]) -> String {
    schemas.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n")
}

fn not_an_object(value: &Value) -> ModelError {
    ModelError::Serialization(serde::de::Error::custom(format!(
        "expected a JSON object, got {value}"
    )))
}
