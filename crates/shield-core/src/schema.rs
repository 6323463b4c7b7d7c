//! # Schema: Declarative Field Validation for Entities
//!
//! A [`Schema`] lists, in validation order, every field an entity accepts,
//! the [`Check`] applied to it, whether it may be omitted, and the entity
//! error it maps to. Entities declare one `static` schema and build through
//! [`Schema::construct`], which validates every field and then runs the
//! entity's own cross-field invariants.
//!
//! ## Error Precedence
//!
//! [`Schema::validate`] stops at the first offending field in declaration
//! order. [`Schema::validate_all`] is the batch variant and reports one error
//! per offending field.

use std::fmt;

use crate::chain::RuleChain;
use crate::input::Input;
use crate::verdict::ValidationVerdict;

/// How a field's input is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    /// Conjunctive chain over a scalar value.
    Chain(&'static RuleChain),
    /// Conjunctive chain over each element of a list.
    Each(&'static RuleChain),
    /// Passes when any one of the chains passes.
    AnyOf(&'static [&'static RuleChain]),
}

impl Check {
    /// Run the check against an input.
    pub fn evaluate(&self, input: Input<'_>) -> ValidationVerdict {
        match self {
            Self::Chain(chain) => chain.check(input),
            Self::Each(chain) => chain.check_each(input),
            Self::AnyOf(chains) => RuleChain::check_any(chains, input),
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chain(chain) => write!(f, "{chain}"),
            Self::Each(chain) => write!(f, "each {chain}"),
            Self::AnyOf(chains) => {
                f.write_str("any of ")?;
                for (i, chain) in chains.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{chain}")?;
                }
                Ok(())
            }
        }
    }
}

/// Whether a field may be omitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// The field must be supplied.
    Required,
    /// An absent value, empty text or an empty list skips the check.
    Optional,
    /// Only an absent value skips the check. A supplied empty value is
    /// checked, so a chain starting with `Required` rejects it.
    IfPresent,
}

impl Presence {
    /// Whether `input` bypasses the field's check.
    pub fn skips(&self, input: Input<'_>) -> bool {
        match self {
            Self::Required => false,
            Self::Optional => input.is_empty(),
            Self::IfPresent => input == Input::Absent,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Optional => "optional",
            Self::IfPresent => "if present",
        }
    }
}

/// One field of an entity schema.
pub struct FieldSpec<E> {
    /// Field name as supplied by the caller.
    pub name: &'static str,
    /// Check applied to the raw input.
    pub check: Check,
    /// Whether the field may be omitted.
    pub presence: Presence,
    /// Maps a failing verdict to the entity's field-specific error.
    pub error: fn(ValidationVerdict) -> E,
}

impl<E> FieldSpec<E> {
    /// Evaluate this field. Returns `None` when its presence lets the input
    /// skip the check.
    pub fn evaluate(&self, input: Input<'_>) -> Option<ValidationVerdict> {
        if self.presence.skips(input) {
            return None;
        }
        Some(self.check.evaluate(input))
    }
}

impl<E> fmt::Display for FieldSpec<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) {}", self.name, self.presence.as_str(), self.check)
    }
}

/// Errors that carry the verdict of the field that caused them.
pub trait FieldError {
    /// The failing field's verdict, when the error came from a field check.
    fn verdict(&self) -> Option<&ValidationVerdict>;

    /// True when the error is a missing required value.
    fn is_missing(&self) -> bool {
        self.verdict().is_some_and(ValidationVerdict::is_missing)
    }
}

/// Ordered field declarations for one entity.
pub struct Schema<E: 'static> {
    /// Entity name, used in log events.
    pub entity: &'static str,
    /// Fields in validation order.
    pub fields: &'static [FieldSpec<E>],
}

impl<E: 'static> Schema<E> {
    /// Declare a schema.
    pub const fn new(entity: &'static str, fields: &'static [FieldSpec<E>]) -> Self {
        Self { entity, fields }
    }

    /// Look up a field declaration by name.
    pub fn field(&self, name: &str) -> Option<&FieldSpec<E>> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Validate every field in order, failing on the first offending one.
    pub fn validate(&self, inputs: &[(&str, Input<'_>)]) -> Result<(), E> {
        for field in self.fields {
            if let Some(verdict) = field.evaluate(lookup(inputs, field.name)) {
                if !verdict.is_valid() {
                    tracing::debug!(
                        entity = self.entity,
                        field = field.name,
                        violations = verdict.len(),
                        "field rejected:\n{verdict}"
                    );
                    return Err((field.error)(verdict));
                }
            }
        }
        Ok(())
    }

    /// Validate every field and return one error per offending field.
    pub fn validate_all(&self, inputs: &[(&str, Input<'_>)]) -> Vec<E> {
        let errors: Vec<E> = self
            .fields
            .iter()
            .filter_map(|field| {
                let verdict = field.evaluate(lookup(inputs, field.name))?;
                (!verdict.is_valid()).then(|| (field.error)(verdict))
            })
            .collect();
        if !errors.is_empty() {
            tracing::debug!(
                entity = self.entity,
                failed_fields = errors.len(),
                "batch validation rejected"
            );
        }
        errors
    }

    /// Validate every field, then run the entity's invariants and build it.
    ///
    /// `build` runs only after all fields pass, so it may assume every
    /// declared field is well-formed.
    pub fn construct<T>(
        &self,
        inputs: &[(&str, Input<'_>)],
        build: impl FnOnce() -> Result<T, E>,
    ) -> Result<T, E> {
        self.validate(inputs)?;
        build()
    }
}

impl<E: 'static> fmt::Display for Schema<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.entity)?;
        for field in self.fields {
            write!(f, "\n  {field}")?;
        }
        Ok(())
    }
}

fn lookup<'a>(inputs: &[(&str, Input<'a>)], name: &str) -> Input<'a> {
    inputs
        .iter()
        .find(|(n, _)| *n == name)
        .map_or(Input::Absent, |(_, input)| *input)
}
