//! Declarative rule sets
//!
//! Rules are declared per member with an accessor closure and a chain of
//! checks. Every failing check produces one message; `{PropertyName}` in a
//! message is replaced by the member's display name at validation time.

use super::{ValidationContext, ValidationFailure, ValidationResult, Validator};
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;
use std::sync::Arc;

/// Placeholder replaced with the member's display name
const PROPERTY_NAME: &str = "{PropertyName}";

type Check<T> = Box<dyn Fn(&T) -> Option<String> + Send + Sync>;
type Accessor<T, P> = Arc<dyn Fn(&T) -> &P + Send + Sync>;

struct Rule<T> {
    member: String,
    check: Check<T>,
    message: Option<String>,
}

/// Ordered collection of member rules for `T`
pub struct RuleSet<T> {
    rules: Vec<Rule<T>>,
}

impl<T> Default for RuleSet<T> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<T> std::fmt::Debug for RuleSet<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleSet")
            .field(
                "members",
                &self.rules.iter().map(|r| r.member.as_str()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl<T: 'static> RuleSet<T> {
    /// Create an empty rule set
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the rules for one member.
    ///
    /// `member` is the name used in messages, `accessor` selects the value
    /// and `build` chains the checks.
    #[must_use]
    pub fn rule_for<P, F, B>(mut self, member: &str, accessor: F, build: B) -> Self
    where
        P: ?Sized + 'static,
        F: Fn(&T) -> &P + Send + Sync + 'static,
        B: FnOnce(RuleBuilder<T, P>) -> RuleBuilder<T, P>,
    {
        let builder = RuleBuilder {
            member: member.to_string(),
            accessor: Arc::new(accessor),
            rules: Vec::new(),
        };
        self.rules.extend(build(builder).rules);
        self
    }

    /// Append every rule of `other` after the rules already declared
    #[must_use]
    pub fn include(mut self, other: RuleSet<T>) -> Self {
        self.rules.extend(other.rules);
        self
    }

    /// Number of declared checks
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True when no check has been declared
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<T> Validator<T> for RuleSet<T> {
    fn validate(&self, instance: &T, ctx: &ValidationContext<'_>) -> ValidationResult {
        let errors = self
            .rules
            .iter()
            .filter_map(|rule| {
                let rendered = (rule.check)(instance)?;
                let property_name = ctx.display_name(&rule.member);
                let template = rule.message.as_deref().unwrap_or(&rendered);
                Some(ValidationFailure {
                    error_message: template.replace(PROPERTY_NAME, &property_name),
                    property_name,
                })
            })
            .collect();
        ValidationResult { errors }
    }
}

// =============================================================================
// Rule Builder
// =============================================================================

/// Chain of checks for a single member, created by [`RuleSet::rule_for`]
pub struct RuleBuilder<T, P: ?Sized> {
    member: String,
    accessor: Accessor<T, P>,
    rules: Vec<Rule<T>>,
}

impl<T: 'static, P: ?Sized + 'static> RuleBuilder<T, P> {
    fn check<C>(mut self, check: C) -> Self
    where
        C: Fn(&P) -> Option<String> + Send + Sync + 'static,
    {
        let accessor = Arc::clone(&self.accessor);
        self.rules.push(Rule {
            member: self.member.clone(),
            check: Box::new(move |instance: &T| check((*accessor)(instance))),
            message: None,
        });
        self
    }

    /// Replace the message of the most recently added check.
    ///
    /// `{PropertyName}` is still substituted.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        if let Some(last) = self.rules.last_mut() {
            last.message = Some(message.into());
        }
        self
    }

    /// Fail unless `predicate` holds
    #[must_use]
    pub fn must<F>(self, predicate: F) -> Self
    where
        F: Fn(&P) -> bool + Send + Sync + 'static,
    {
        self.check(move |value| {
            (!predicate(value))
                .then(|| format!("The specified condition was not met for '{PROPERTY_NAME}'."))
        })
    }

    /// Fail if the pattern does not match
    #[must_use]
    pub fn matches(self, pattern: Regex) -> Self
    where
        P: AsRef<str>,
    {
        self.check(move |value| {
            (!pattern.is_match(value.as_ref()))
                .then(|| format!("'{PROPERTY_NAME}' is not in the correct format."))
        })
    }
}

impl<T: 'static, P: HasLength + ?Sized + 'static> RuleBuilder<T, P> {
    /// Fail on empty strings (including whitespace-only) and empty collections
    #[must_use]
    pub fn not_empty(self) -> Self {
        self.check(|value| {
            value
                .is_blank()
                .then(|| format!("'{PROPERTY_NAME}' must not be empty."))
        })
    }

    /// Fail when shorter than `min`
    #[must_use]
    pub fn min_length(self, min: usize) -> Self {
        self.check(move |value| {
            let total = value.length();
            (total < min).then(|| {
                format!(
                    "The length of '{PROPERTY_NAME}' must be at least {min} characters. You entered {total} characters."
                )
            })
        })
    }

    /// Fail when longer than `max`
    #[must_use]
    pub fn max_length(self, max: usize) -> Self {
        self.check(move |value| {
            let total = value.length();
            (total > max).then(|| {
                format!(
                    "The length of '{PROPERTY_NAME}' must be {max} characters or fewer. You entered {total} characters."
                )
            })
        })
    }

    /// Fail when the length is outside `min..=max`
    #[must_use]
    pub fn length(self, min: usize, max: usize) -> Self {
        self.check(move |value| {
            let total = value.length();
            (total < min || total > max).then(|| {
                format!(
                    "'{PROPERTY_NAME}' must be between {min} and {max} characters. You entered {total} characters."
                )
            })
        })
    }
}

impl<T: 'static, P> RuleBuilder<T, P>
where
    P: PartialOrd + Display + Send + Sync + 'static,
{
    /// Fail when outside `from..=to`
    #[must_use]
    pub fn inclusive_between(self, from: P, to: P) -> Self {
        self.check(move |value| {
            (*value < from || *value > to).then(|| {
                format!(
                    "'{PROPERTY_NAME}' must be between {from} and {to}. You entered {value}."
                )
            })
        })
    }

    /// Fail unless strictly greater than `bound`
    #[must_use]
    pub fn greater_than(self, bound: P) -> Self {
        self.check(move |value| {
            (*value <= bound)
                .then(|| format!("'{PROPERTY_NAME}' must be greater than '{bound}'."))
        })
    }

    /// Fail when less than `bound`
    #[must_use]
    pub fn greater_than_or_equal(self, bound: P) -> Self {
        self.check(move |value| {
            (*value < bound).then(|| {
                format!("'{PROPERTY_NAME}' must be greater than or equal to '{bound}'.")
            })
        })
    }

    /// Fail unless strictly less than `bound`
    #[must_use]
    pub fn less_than(self, bound: P) -> Self {
        self.check(move |value| {
            (*value >= bound).then(|| format!("'{PROPERTY_NAME}' must be less than '{bound}'."))
        })
    }

    /// Fail when greater than `bound`
    #[must_use]
    pub fn less_than_or_equal(self, bound: P) -> Self {
        self.check(move |value| {
            (*value > bound)
                .then(|| format!("'{PROPERTY_NAME}' must be less than or equal to '{bound}'."))
        })
    }
}

// =============================================================================
// Length
// =============================================================================

/// Values with a length, for the emptiness and length checks
pub trait HasLength {
    /// Characters for strings, elements for collections
    fn length(&self) -> usize;

    /// Whether the value counts as empty
    fn is_blank(&self) -> bool {
        self.length() == 0
    }
}

impl HasLength for str {
    fn length(&self) -> usize {
        self.chars().count()
    }

    fn is_blank(&self) -> bool {
        self.trim().is_empty()
    }
}

impl HasLength for String {
    fn length(&self) -> usize {
        self.as_str().length()
    }

    fn is_blank(&self) -> bool {
        self.as_str().is_blank()
    }
}

impl<U> HasLength for [U] {
    fn length(&self) -> usize {
        self.len()
    }
}

impl<U> HasLength for Vec<U> {
    fn length(&self) -> usize {
        self.len()
    }
}

impl<K, V, S> HasLength for HashMap<K, V, S> {
    fn length(&self) -> usize {
        self.len()
    }
}

impl<K, V> HasLength for BTreeMap<K, V> {
    fn length(&self) -> usize {
        self.len()
    }
}
