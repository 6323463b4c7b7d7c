//! # Rules: Atomic Constraints
//!
//! A [`Rule`] is a stateless predicate over one [`Input`]. Every variant is
//! `const`-constructible so chains can live in `const` tables, and every
//! variant is total: a value of the wrong shape yields [`Verdict::Fail`].

use std::fmt;

use serde::Serialize;

use crate::digest::HashKind;
use crate::format;
use crate::input::Input;
use crate::verdict::Violation;

/// An atomic constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    /// Value must be present and non-empty.
    Required,
    /// Text made only of alphanumerics plus the listed extra characters.
    TypedString {
        /// Characters accepted in addition to alphanumerics.
        allowed: &'static str,
    },
    /// Inclusive bounds on character count (text) or item count (list).
    Length {
        /// Minimum length, inclusive.
        min: usize,
        /// Maximum length, inclusive.
        max: usize,
    },
    /// E-mail address.
    Email,
    /// Fully qualified domain name.
    Fqdn,
    /// IPv4 address.
    Ipv4,
    /// IPv6 address.
    Ipv6,
    /// IPv4 network in CIDR notation.
    CidrIpv4,
    /// IPv6 network in CIDR notation.
    CidrIpv6,
    /// Autonomous system number (`AS<n>`).
    AsCode,
    /// Hex digest of the given algorithm.
    HashDigest(HashKind),
    /// Blocking-order reference (`<n>/<yy>/DDA/<XX>`).
    DdaInstance,
    /// ISO-8601 date-time.
    Iso8601,
    /// Whole number.
    Integer,
    /// `true` or `false`.
    Boolean,
}

/// Fieldless tag identifying which rule produced a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// See [`Rule::Required`].
    Required,
    /// See [`Rule::TypedString`].
    TypedString,
    /// See [`Rule::Length`].
    Length,
    /// See [`Rule::Email`].
    Email,
    /// See [`Rule::Fqdn`].
    Fqdn,
    /// See [`Rule::Ipv4`].
    Ipv4,
    /// See [`Rule::Ipv6`].
    Ipv6,
    /// See [`Rule::CidrIpv4`].
    CidrIpv4,
    /// See [`Rule::CidrIpv6`].
    CidrIpv6,
    /// See [`Rule::AsCode`].
    AsCode,
    /// See [`Rule::HashDigest`].
    HashDigest,
    /// See [`Rule::DdaInstance`].
    DdaInstance,
    /// See [`Rule::Iso8601`].
    Iso8601,
    /// See [`Rule::Integer`].
    Integer,
    /// See [`Rule::Boolean`].
    Boolean,
}

impl RuleKind {
    /// snake_case name, matching the serde form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::TypedString => "typed_string",
            Self::Length => "length",
            Self::Email => "email",
            Self::Fqdn => "fqdn",
            Self::Ipv4 => "ipv4",
            Self::Ipv6 => "ipv6",
            Self::CidrIpv4 => "cidr_ipv4",
            Self::CidrIpv6 => "cidr_ipv6",
            Self::AsCode => "as_code",
            Self::HashDigest => "hash_digest",
            Self::DdaInstance => "dda_instance",
            Self::Iso8601 => "iso8601",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of evaluating one rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The value satisfies the rule.
    Pass,
    /// The value violates the rule.
    Fail(Violation),
}

impl Verdict {
    /// True for [`Verdict::Pass`].
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }
}

impl Rule {
    /// The tag of this rule.
    pub const fn kind(&self) -> RuleKind {
        match self {
            Self::Required => RuleKind::Required,
            Self::TypedString { .. } => RuleKind::TypedString,
            Self::Length { .. } => RuleKind::Length,
            Self::Email => RuleKind::Email,
            Self::Fqdn => RuleKind::Fqdn,
            Self::Ipv4 => RuleKind::Ipv4,
            Self::Ipv6 => RuleKind::Ipv6,
            Self::CidrIpv4 => RuleKind::CidrIpv4,
            Self::CidrIpv6 => RuleKind::CidrIpv6,
            Self::AsCode => RuleKind::AsCode,
            Self::HashDigest(_) => RuleKind::HashDigest,
            Self::DdaInstance => RuleKind::DdaInstance,
            Self::Iso8601 => RuleKind::Iso8601,
            Self::Integer => RuleKind::Integer,
            Self::Boolean => RuleKind::Boolean,
        }
    }

    /// Evaluate this rule against a raw input.
    pub fn evaluate(&self, input: Input<'_>) -> Verdict {
        match self {
            Self::Required => self.required(input),
            Self::TypedString { allowed } => self.typed_string(input, allowed),
            Self::Length { min, max } => self.length(input, *min, *max),
            Self::Email => self.text_format(input, format::is_email, "not a valid e-mail address"),
            Self::Fqdn => self.text_format(input, format::is_fqdn, "not a valid FQDN"),
            Self::Ipv4 => self.text_format(input, format::is_ipv4, "not a valid IPv4 address"),
            Self::Ipv6 => self.text_format(input, format::is_ipv6, "not a valid IPv6 address"),
            Self::CidrIpv4 => {
                self.text_format(input, format::is_cidr_ipv4, "not a valid IPv4 CIDR block")
            }
            Self::CidrIpv6 => {
                self.text_format(input, format::is_cidr_ipv6, "not a valid IPv6 CIDR block")
            }
            Self::AsCode => self.text_format(input, format::is_as_code, "not a valid AS code"),
            Self::HashDigest(kind) => match input {
                Input::Text(s) if format::is_hex_digest(s, kind.hex_len()) => Verdict::Pass,
                Input::Text(_) => self.fail(format!(
                    "not a valid {kind} digest (expected {} hex characters)",
                    kind.hex_len()
                )),
                other => self.mismatch(other),
            },
            Self::DdaInstance => {
                self.text_format(input, format::is_dda_instance, "not a valid DDA instance")
            }
            Self::Iso8601 => {
                self.text_format(input, format::is_iso8601, "not a valid ISO-8601 timestamp")
            }
            Self::Integer => match input {
                Input::Integer(_) => Verdict::Pass,
                other => self.fail(format!("expected an integer, got {}", other.shape())),
            },
            Self::Boolean => match input {
                Input::Boolean(_) => Verdict::Pass,
                other => self.fail(format!("expected a boolean, got {}", other.shape())),
            },
        }
    }

    fn required(&self, input: Input<'_>) -> Verdict {
        match input {
            Input::Absent => self.fail("value is required"),
            other if other.is_empty() => self.fail("value must not be empty"),
            _ => Verdict::Pass,
        }
    }

    fn typed_string(&self, input: Input<'_>, allowed: &str) -> Verdict {
        let Input::Text(s) = input else {
            return self.mismatch(input);
        };
        match s.chars().find(|c| !c.is_alphanumeric() && !allowed.contains(*c)) {
            Some(c) => self.fail(format!("character {c:?} is not allowed")),
            None => Verdict::Pass,
        }
    }

    fn length(&self, input: Input<'_>, min: usize, max: usize) -> Verdict {
        let len = match input {
            Input::Text(s) => s.chars().count(),
            Input::List(items) => items.len(),
            other => return self.mismatch(other),
        };
        if (min..=max).contains(&len) {
            Verdict::Pass
        } else {
            self.fail(format!("length {len} is outside {min}..={max}"))
        }
    }

    fn text_format(&self, input: Input<'_>, predicate: fn(&str) -> bool, message: &str) -> Verdict {
        match input {
            Input::Text(s) if predicate(s) => Verdict::Pass,
            Input::Text(_) => self.fail(message),
            other => self.mismatch(other),
        }
    }

    fn mismatch(&self, input: Input<'_>) -> Verdict {
        self.fail(format!("expected text, got {}", input.shape()))
    }

    fn fail(&self, message: impl Into<String>) -> Verdict {
        Verdict::Fail(Violation::new(self.kind(), message))
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypedString { allowed } => write!(f, "typed_string(extra={allowed:?})"),
            Self::Length { min, max } => write!(f, "length({min}..={max})"),
            Self::HashDigest(kind) => write!(f, "hash_digest({kind})"),
            other => f.write_str(other.kind().as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fails(rule: Rule, input: Input<'_>) -> bool {
        !rule.evaluate(input).is_pass()
    }

    #[test]
    fn required_rejects_absent_and_empty() {
        let empty: Vec<String> = Vec::new();
        assert!(fails(Rule::Required, Input::Absent));
        assert!(fails(Rule::Required, Input::Text("")));
        assert!(fails(Rule::Required, Input::from(&empty)));
        assert!(Rule::Required.evaluate(Input::Text("x")).is_pass());
        assert!(Rule::Required.evaluate(Input::Integer(0)).is_pass());
        assert!(Rule::Required.evaluate(Input::Boolean(false)).is_pass());
    }

    #[test]
    fn typed_string_allows_listed_extras_only() {
        let rule = Rule::TypedString { allowed: "-_" };
        assert!(rule.evaluate(Input::Text("abc-DEF_123")).is_pass());
        assert!(rule.evaluate(Input::Text("àèìòù")).is_pass());
        match rule.evaluate(Input::Text("abc!")) {
            Verdict::Fail(v) => {
                assert_eq!(v.rule, RuleKind::TypedString);
                assert!(v.message.contains("'!'"));
            }
            Verdict::Pass => panic!("expected failure"),
        }
    }

    #[test]
    fn typed_string_rejects_non_text() {
        let rule = Rule::TypedString { allowed: "" };
        assert!(fails(rule, Input::Integer(3)));
        assert!(fails(rule, Input::Absent));
        assert!(fails(rule, Input::Other));
    }

    #[test]
    fn length_counts_chars_and_items() {
        let rule = Rule::Length { min: 2, max: 3 };
        assert!(rule.evaluate(Input::Text("ab")).is_pass());
        assert!(rule.evaluate(Input::Text("€€€")).is_pass());
        assert!(fails(rule, Input::Text("a")));
        assert!(fails(rule, Input::Text("abcd")));

        let items = vec!["a".to_string(), "b".to_string()];
        assert!(rule.evaluate(Input::from(&items)).is_pass());
        assert!(fails(rule, Input::Boolean(true)));
    }

    #[test]
    fn format_rules_reject_non_text() {
        for rule in [
            Rule::Email,
            Rule::Fqdn,
            Rule::Ipv4,
            Rule::Ipv6,
            Rule::CidrIpv4,
            Rule::CidrIpv6,
            Rule::AsCode,
            Rule::HashDigest(HashKind::Sha256),
            Rule::DdaInstance,
            Rule::Iso8601,
        ] {
            assert!(fails(rule, Input::Integer(1)), "{rule} accepted an integer");
        }
    }

    #[test]
    fn scalar_type_rules() {
        assert!(Rule::Integer.evaluate(Input::Integer(300)).is_pass());
        assert!(fails(Rule::Integer, Input::Text("300")));
        assert!(fails(Rule::Integer, Input::Other));

        assert!(Rule::Boolean.evaluate(Input::Boolean(false)).is_pass());
        assert!(fails(Rule::Boolean, Input::Text("yes")));
        match Rule::Boolean.evaluate(Input::Integer(1)) {
            Verdict::Fail(v) => {
                assert_eq!(v.rule, RuleKind::Boolean);
                assert_eq!(v.message, "expected a boolean, got integer");
            }
            Verdict::Pass => panic!("expected failure"),
        }
    }

    #[test]
    fn hash_digest_checks_length_per_kind() {
        let digest = "0".repeat(96);
        assert!(Rule::HashDigest(HashKind::Sha384).evaluate(Input::Text(&digest)).is_pass());
        assert!(fails(Rule::HashDigest(HashKind::Sha256), Input::Text(&digest)));
    }

    #[test]
    fn failures_carry_their_kind() {
        let rules = [Rule::Fqdn, Rule::Ipv4, Rule::AsCode];
        for rule in rules {
            match rule.evaluate(Input::Text("???")) {
                Verdict::Fail(v) => assert_eq!(v.rule, rule.kind()),
                Verdict::Pass => panic!("{rule} accepted garbage"),
            }
        }
    }

    #[test]
    fn display_shows_parameters() {
        assert_eq!(Rule::Length { min: 3, max: 255 }.to_string(), "length(3..=255)");
        assert_eq!(Rule::TypedString { allowed: " -" }.to_string(), "typed_string(extra=\" -\")");
        assert_eq!(Rule::HashDigest(HashKind::Sha256).to_string(), "hash_digest(SHA256)");
        assert_eq!(Rule::Required.to_string(), "required");
    }
}
