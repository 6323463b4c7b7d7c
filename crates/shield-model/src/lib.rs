//! # shield-model: Self-Validating Records for the Anti-Piracy Back Office
//!
//! Every record in this crate validates itself at construction. A value of
//! type [`Ticket`], [`WhitelistItem`] or [`ForensicHash`] is proof that each
//! of its fields passed the rule chain declared for it in [`catalog`] and
//! that the record's cross-field invariants hold.
//!
//! ## Design Principles
//!
//! 1. **Construction is validation.** Records have private fields. The only
//!    ways in are `new`, `from_raw`, and `Deserialize`, and all three run the
//!    same schema in the same order.
//!
//! 2. **Errors name the field.** Each record has its own error enum whose
//!    variants carry the failing field's
//!    [`ValidationVerdict`](shield_core::ValidationVerdict). The first
//!    offending field in declaration order wins; `audit` reports all of them.
//!
//! 3. **Closed sets are enums.** Roles, statuses, genres and reasons are
//!    Rust enums with a fixed wire spelling. Unknown raw values fail with
//!    [`UnknownVariant`].
//!
//! 4. **Wrong-typed payload fields are field errors.** Raw payload fields
//!    are held as [`RawField`], so `"account_id": 12345` reaches the
//!    account-id chain and fails as `InvalidAccountId` rather than as a
//!    serialization error.
//!
//! 5. **Genre tags are strict.** A ticket item or whitelist entry is checked
//!    only against the chain its genre selects. Provider reports, which carry
//!    no genre, accept any of FQDN, IPv4 or IPv6 instead.
//!
//! ## Crate Policy
//!
//! - Records hold no behaviour beyond validation and export. Status
//!   transitions belong to the services that store them.
//! - No `.unwrap()` outside tests.
//! - Rejections are logged with `tracing::debug!`. No subscriber is
//!   installed here.

#![deny(missing_docs)]

#[macro_use]
mod macros;

pub mod account;
pub mod catalog;
pub mod dda;
pub mod error;
pub mod export;
pub mod forensic;
pub mod genre;
pub mod identifier;
pub mod log;
pub mod raw;
pub mod settings;
pub mod status;
pub mod ticket;
pub mod ticket_item;
pub mod whitelist;

// Re-export primary types at crate root for ergonomic imports.
pub use account::{
    Account, AccountError, AccountFlags, AccountFlagsError, AccountRole, Authentication,
    AuthenticationError, Permission,
};
pub use dda::{Dda, DdaError};
pub use error::{ModelError, UnknownVariant};
pub use export::Export;
pub use forensic::{
    ForensicArchive, ForensicArchiveError, ForensicFormat, ForensicHash, ForensicHashError,
};
pub use genre::{TicketGenre, TicketItemGenre, WhitelistGenre};
pub use identifier::{Identifier, IdentifierError};
pub use log::{LogError, LogTicket, LogTicketItem};
pub use raw::{AsInput, RawField, RawSlot, RawText};
pub use settings::{ConfigError, ModelSettings, TicketItemSettings, TicketSettings};
pub use status::{ForensicStatus, TicketItemStatus, TicketStatus};
pub use ticket::{Ticket, TicketError, TicketErrorReport, TicketErrorReportError};
pub use ticket_item::{
    TicketItem, TicketItemError, TicketItemFlags, TicketItemOutcomeError, TicketItemProcessed,
    TicketItemUnprocessed, UnprocessedReason,
};
pub use whitelist::{WhitelistError, WhitelistItem};
