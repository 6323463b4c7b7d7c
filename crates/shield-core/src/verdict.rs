//! # Validation Verdicts
//!
//! A [`Violation`] records one failed rule. A [`ValidationVerdict`] is the
//! ordered list of violations produced by running a chain over one value.
//! An empty verdict is a pass.

use std::fmt;

use serde::Serialize;

use crate::rule::RuleKind;

/// A single failed rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// The rule that failed.
    pub rule: RuleKind,
    /// Human-readable description of the failure.
    pub message: String,
    /// Position of the offending element for element-wise list checks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
}

impl Violation {
    /// Create a violation for a scalar value.
    pub fn new(rule: RuleKind, message: impl Into<String>) -> Self {
        Self {
            rule,
            message: message.into(),
            index: None,
        }
    }

    /// Tag this violation with the list position it came from.
    pub fn at(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(i) => write!(f, "  [{i}] {}: {}", self.rule, self.message),
            None => write!(f, "  {}: {}", self.rule, self.message),
        }
    }
}

/// Outcome of validating one value against one chain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationVerdict {
    violations: Vec<Violation>,
}

impl ValidationVerdict {
    /// A verdict with no violations.
    pub fn pass() -> Self {
        Self::default()
    }

    /// Build a verdict from violations in the order they were recorded.
    pub fn from_violations(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    /// A verdict holding a single violation.
    pub fn single(violation: Violation) -> Self {
        Self {
            violations: vec![violation],
        }
    }

    /// True iff no rule failed.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// True when the only failure is a missing required value.
    pub fn is_missing(&self) -> bool {
        matches!(self.violations.as_slice(), [v] if v.rule == RuleKind::Required)
    }

    /// The recorded violations, in rule-declaration order.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// The kinds of the failed rules, in order.
    pub fn kinds(&self) -> Vec<RuleKind> {
        self.violations.iter().map(|v| v.rule).collect()
    }

    /// Number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Append the violations of another verdict.
    pub fn extend(&mut self, other: ValidationVerdict) {
        self.violations.extend(other.violations);
    }

    /// Consume the verdict and return its violations.
    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }
}

impl fmt::Display for ValidationVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.violations.is_empty() {
            return f.write_str("  (no violations)");
        }
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}
