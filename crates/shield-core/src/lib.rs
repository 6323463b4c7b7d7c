//! # shield-core: Rule Engine for Self-Validating Records
//!
//! This crate is the leaf of the workspace. It defines the atomic rules,
//! the ordered chains that run them, the structured verdicts they produce,
//! and the declarative [`Schema`] that every entity in `shield-model` uses to
//! validate and construct itself.
//!
//! ## Key Design Principles
//!
//! 1. **Rules are total.** [`Rule::evaluate`] never panics. A rule applied to
//!    a value of the wrong shape records a failure instead.
//!
//! 2. **Chains are fixed at build time.** A [`RuleChain`] is a `const` over a
//!    `&'static [Rule]`. There is no runtime composition.
//!
//! 3. **Verdicts are values.** A [`ValidationVerdict`] lists every violation
//!    in rule-declaration order. Callers turn it into their own error type.
//!
//! 4. **One generic builder.** A [`Schema`] is an ordered list of
//!    [`FieldSpec`]s. Entities supply inputs and a closure for cross-field
//!    invariants; the schema does the rest.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `shield-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - No I/O. Logging is limited to `tracing::debug!` at rejection points.

#![deny(missing_docs)]

pub mod chain;
pub mod digest;
pub mod format;
pub mod input;
pub mod rule;
pub mod schema;
pub mod verdict;

pub use chain::{RuleChain, Validator};
pub use digest::{HashKind, UnknownHashKind};
pub use input::Input;
pub use rule::{Rule, RuleKind, Verdict};
pub use schema::{Check, FieldError, FieldSpec, Presence, Schema};
pub use verdict::{ValidationVerdict, Violation};
