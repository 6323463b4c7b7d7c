//! # Rule Chains and the Validator
//!
//! A [`RuleChain`] is the ordered list of rules declared for one field. The
//! [`Validator`] runs a chain over one input and returns a
//! [`ValidationVerdict`].
//!
//! ## Evaluation Policy
//!
//! Rules run in declaration order against the same raw input; no rule sees
//! the output of another. Every rule runs and every failure is recorded,
//! with one exception: when the chain contains [`Rule::Required`] and that
//! rule fails, evaluation stops and the verdict holds only the `Required`
//! violation. Format and length rules would otherwise report secondary
//! failures against a value that does not exist.

use std::fmt;

use crate::input::Input;
use crate::rule::{Rule, RuleKind, Verdict};
use crate::verdict::{ValidationVerdict, Violation};

/// An ordered, named sequence of rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleChain {
    /// Field the chain is declared for, e.g. `account_id`.
    pub name: &'static str,
    /// Rules in evaluation order.
    pub rules: &'static [Rule],
}

impl RuleChain {
    /// Declare a chain.
    pub const fn new(name: &'static str, rules: &'static [Rule]) -> Self {
        Self { name, rules }
    }

    /// Whether the chain contains a rule of the given kind.
    pub fn contains(&self, kind: RuleKind) -> bool {
        self.rules.iter().any(|r| r.kind() == kind)
    }

    /// Shorthand for `Validator::new(input, self).validate()`.
    pub fn check(&self, input: Input<'_>) -> ValidationVerdict {
        Validator::new(input, self).validate()
    }

    /// Apply the chain to every element of a list.
    ///
    /// An absent value or an empty list yields a single `Required`
    /// violation. Otherwise every element is validated as text and each
    /// violation is tagged with its element index. A value that is not a
    /// list fails with a `Length` violation, the only list-aware rule.
    pub fn check_each(&self, input: Input<'_>) -> ValidationVerdict {
        let items = match input {
            Input::List(items) if !items.is_empty() => items,
            Input::Absent | Input::List(_) => return required_violation(input),
            other => {
                return ValidationVerdict::single(Violation::new(
                    RuleKind::Length,
                    format!("expected a list, got {}", other.shape()),
                ))
            }
        };

        let mut verdict = ValidationVerdict::pass();
        for (i, item) in items.iter().enumerate() {
            let element = self.check(Input::Text(item));
            verdict.extend(ValidationVerdict::from_violations(
                element.into_violations().into_iter().map(|v| v.at(i)).collect(),
            ));
        }
        verdict
    }

    /// Disjunctive check: pass if any of `chains` accepts the input.
    ///
    /// A missing value yields only the `Required` violation. Otherwise, when
    /// every alternative fails, the verdict concatenates their violations in
    /// the order the alternatives were given.
    pub fn check_any(chains: &[&RuleChain], input: Input<'_>) -> ValidationVerdict {
        if let Verdict::Fail(v) = Rule::Required.evaluate(input) {
            return ValidationVerdict::single(v);
        }

        let mut combined = ValidationVerdict::pass();
        for chain in chains {
            let verdict = chain.check(input);
            if verdict.is_valid() {
                return verdict;
            }
            combined.extend(verdict);
        }
        combined
    }
}

fn required_violation(input: Input<'_>) -> ValidationVerdict {
    match Rule::Required.evaluate(input) {
        Verdict::Fail(v) => ValidationVerdict::single(v),
        Verdict::Pass => ValidationVerdict::pass(),
    }
}

impl fmt::Display for RuleChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: [", self.name)?;
        for (i, rule) in self.rules.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{rule}")?;
        }
        f.write_str("]")
    }
}

/// Runs one chain over one input.
#[derive(Debug, Clone, Copy)]
pub struct Validator<'a, 'c> {
    input: Input<'a>,
    chain: &'c RuleChain,
}

impl<'a, 'c> Validator<'a, 'c> {
    /// Bind an input to a chain.
    pub fn new(input: Input<'a>, chain: &'c RuleChain) -> Self {
        Self { input, chain }
    }

    /// Evaluate the chain and return the verdict.
    pub fn validate(&self) -> ValidationVerdict {
        let mut violations = Vec::new();
        for rule in self.chain.rules {
            if let Verdict::Fail(v) = rule.evaluate(self.input) {
                if v.rule == RuleKind::Required {
                    return ValidationVerdict::single(v);
                }
                violations.push(v);
            }
        }
        ValidationVerdict::from_violations(violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAME: RuleChain = RuleChain::new(
        "name",
        &[
            Rule::Required,
            Rule::TypedString { allowed: " " },
            Rule::Length { min: 3, max: 8 },
        ],
    );
    const FQDN: RuleChain = RuleChain::new("fqdn", &[Rule::Required, Rule::Fqdn]);
    const IPV4: RuleChain = RuleChain::new("ipv4", &[Rule::Required, Rule::Ipv4]);
    const IPV6: RuleChain = RuleChain::new("ipv6", &[Rule::Required, Rule::Ipv6]);

    #[test]
    fn valid_value_has_no_violations() {
        assert!(NAME.check(Input::Text("Jane")).is_valid());
    }

    #[test]
    fn all_failures_are_reported_in_order() {
        let verdict = NAME.check(Input::Text("a!"));
        assert_eq!(verdict.kinds(), vec![RuleKind::TypedString, RuleKind::Length]);
    }

    #[test]
    fn required_failure_short_circuits() {
        let absent = NAME.check(Input::Absent);
        assert_eq!(absent.kinds(), vec![RuleKind::Required]);
        assert!(absent.is_missing());

        let empty = NAME.check(Input::Text(""));
        assert_eq!(empty.kinds(), vec![RuleKind::Required]);
    }

    #[test]
    fn chain_without_required_reports_mismatch_for_absent() {
        const LOOSE: RuleChain = RuleChain::new("loose", &[Rule::Length { min: 1, max: 2 }]);
        let verdict = LOOSE.check(Input::Absent);
        assert_eq!(verdict.kinds(), vec![RuleKind::Length]);
    }

    #[test]
    fn each_tags_offending_indices() {
        let items: Vec<String> = ["example.com", "bad_host", "ok.org", "-x.com"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let verdict = FQDN.check_each(Input::from(&items));
        let indices: Vec<_> = verdict.violations().iter().map(|v| v.index).collect();
        assert_eq!(indices, vec![Some(1), Some(3)]);
    }

    #[test]
    fn each_treats_empty_list_as_missing() {
        let empty: Vec<String> = Vec::new();
        assert!(FQDN.check_each(Input::from(&empty)).is_missing());
        assert!(FQDN.check_each(Input::Absent).is_missing());
        assert_eq!(FQDN.check_each(Input::Text("example.com")).kinds(), vec![RuleKind::Length]);
    }

    #[test]
    fn any_accepts_first_matching_alternative() {
        let chains = [&FQDN, &IPV4, &IPV6];
        assert!(RuleChain::check_any(&chains, Input::Text("8.8.8.8")).is_valid());
        assert!(RuleChain::check_any(&chains, Input::Text("example.com")).is_valid());
        assert!(RuleChain::check_any(&chains, Input::Text("::1")).is_valid());
    }

    #[test]
    fn any_reports_every_alternative_on_failure() {
        let chains = [&FQDN, &IPV4, &IPV6];
        let verdict = RuleChain::check_any(&chains, Input::Text("not-an-ip-or-host!!"));
        assert_eq!(
            verdict.kinds(),
            vec![RuleKind::Fqdn, RuleKind::Ipv4, RuleKind::Ipv6]
        );
        assert!(RuleChain::check_any(&chains, Input::Absent).is_missing());
    }

    #[test]
    fn display_lists_rules() {
        assert_eq!(FQDN.to_string(), "fqdn: [required, fqdn]");
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn validation_is_idempotent(s in "\\PC{0,12}") {
                let first = NAME.check(Input::Text(&s));
                let second = NAME.check(Input::Text(&s));
                prop_assert_eq!(first, second);
            }

            #[test]
            fn alphanumeric_in_bounds_always_passes(s in "[a-zA-Z0-9]{3,8}") {
                prop_assert!(NAME.check(Input::Text(&s)).is_valid());
            }
        }
    }
}
