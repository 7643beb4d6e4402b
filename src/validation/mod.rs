//! Rule-based validation
//!
//! A [`Validator`] checks an instance and reports every violated rule, in
//! declaration order. How members are named in messages is decided by the
//! [`DisplayNamePolicy`] carried in the [`ValidationContext`]; the policy is
//! passed into every call, so there is no process-wide naming state.
//!
//! ```rust
//! use optguard::{RuleSet, ValidationContext, Validator};
//!
//! struct Server {
//!     host: String,
//!     port: u16,
//! }
//!
//! let rules = RuleSet::<Server>::new()
//!     .rule_for("Host", |s| &s.host, |r| r.not_empty())
//!     .rule_for("Port", |s| &s.port, |r| r.inclusive_between(1024, 65535));
//!
//! let server = Server { host: String::new(), port: 80 };
//! let result = rules.validate(&server, &ValidationContext::new("Server"));
//!
//! assert_eq!(result.error_messages(), vec![
//!     "'Host' must not be empty.",
//!     "'Port' must be between 1024 and 65535. You entered 80.",
//! ]);
//! ```

mod rules;

pub use rules::{HasLength, RuleBuilder, RuleSet};

use serde::Serialize;

/// How member names are rendered in validation messages
#[derive(Debug, Clone, Copy, Default)]
pub enum DisplayNamePolicy {
    /// Bare member name: `'Host' must not be empty.`
    #[default]
    Member,
    /// Qualified with the type name: `'DatabaseOptions:Host' must not be empty.`
    Qualified,
    /// Caller-provided `fn(type_name, member) -> display name`
    Custom(fn(&str, &str) -> String),
}

impl DisplayNamePolicy {
    /// Render the display name for `member` of `type_name`
    pub fn display_name(&self, type_name: &str, member: &str) -> String {
        match self {
            DisplayNamePolicy::Member => member.to_string(),
            DisplayNamePolicy::Qualified => format!("{type_name}:{member}"),
            DisplayNamePolicy::Custom(resolve) => resolve(type_name, member),
        }
    }
}

/// Per-call validation state
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    /// Name of the type being validated
    pub type_name: &'a str,
    /// Naming policy for this call
    pub policy: DisplayNamePolicy,
}

impl<'a> ValidationContext<'a> {
    /// Context with the default (bare member) naming policy
    pub fn new(type_name: &'a str) -> Self {
        Self {
            type_name,
            policy: DisplayNamePolicy::Member,
        }
    }

    /// Replace the naming policy
    #[must_use]
    pub fn with_policy(mut self, policy: DisplayNamePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Display name of `member` under this context's policy
    pub fn display_name(&self, member: &str) -> String {
        self.policy.display_name(self.type_name, member)
    }
}

/// A single violated rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationFailure {
    /// Display name of the offending member
    pub property_name: String,
    /// Rendered, human-readable message
    pub error_message: String,
}

/// Outcome of validating one instance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    /// Violations, in the order the rules were declared
    pub errors: Vec<ValidationFailure>,
}

impl ValidationResult {
    /// True when no rule was violated
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Messages only, in order
    pub fn error_messages(&self) -> Vec<&str> {
        self.errors
            .iter()
            .map(|f| f.error_message.as_str())
            .collect()
    }
}

/// Something that can check instances of `T`
///
/// Implement this directly for hand-written checks, or delegate to a
/// [`RuleSet`]:
///
/// ```rust
/// use optguard::{RuleSet, ValidationContext, ValidationResult, Validator};
///
/// struct Limits {
///     max: u32,
/// }
///
/// struct LimitsValidator(RuleSet<Limits>);
///
/// impl Default for LimitsValidator {
///     fn default() -> Self {
///         Self(RuleSet::<Limits>::new().rule_for("Max", |l| &l.max, |r| r.greater_than(0)))
///     }
/// }
///
/// impl Validator<Limits> for LimitsValidator {
///     fn validate(&self, instance: &Limits, ctx: &ValidationContext<'_>) -> ValidationResult {
///         self.0.validate(instance, ctx)
///     }
/// }
/// ```
pub trait Validator<T>: Send + Sync {
    /// Check `instance`, reporting every violation
    fn validate(&self, instance: &T, ctx: &ValidationContext<'_>) -> ValidationResult;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shout(type_name: &str, member: &str) -> String {
        format!("{}.{}", type_name.to_uppercase(), member.to_uppercase())
    }

    #[test]
    fn test_display_name_policies() {
        let ctx = ValidationContext::new("DatabaseOptions");
        assert_eq!(ctx.display_name("Host"), "Host");

        let qualified = ctx.with_policy(DisplayNamePolicy::Qualified);
        assert_eq!(qualified.display_name("Host"), "DatabaseOptions:Host");

        let custom = ctx.with_policy(DisplayNamePolicy::Custom(shout));
        assert_eq!(custom.display_name("Host"), "DATABASEOPTIONS.HOST");
    }

    #[test]
    fn test_empty_result_is_valid() {
        let result = ValidationResult::default();
        assert!(result.is_valid());
        assert!(result.error_messages().is_empty());
    }
}
