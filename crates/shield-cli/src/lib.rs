//! # shield-cli: Command-Line Front End for the Data Model
//!
//! Provides the `shield` binary, which exercises the self-validating records
//! of `shield-model` from the shell.
//!
//! ## Subcommands
//!
//! - `shield check <entity> [FILE]`: Build a record and print its export.
//! - `shield rules <entity>`: Print the record's declared field chains.
//! - `shield generate-id`: Print fresh record identifiers.
//!
//! ```bash
//! shield check account account.json
//! shield check ticket-item --settings windows.yaml < item.json
//! shield rules whitelist
//! ```

pub mod check;
pub mod entity;
pub mod generate;
pub mod rules;

pub use entity::EntityKind;
