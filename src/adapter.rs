//! Bridge between validators and the options registry
//!
//! The registry only knows [`ValidateOptions`]: "validate this named options
//! value, give me success or a list of messages". [`RuleValidation`] adapts
//! any [`Validator`] to that contract and [`DelegateValidation`] adapts a
//! plain predicate.

use crate::validation::{DisplayNamePolicy, ValidationContext, Validator};
use std::marker::PhantomData;

/// Outcome of validating an options value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidateOptionsResult {
    /// Every rule passed
    Success,
    /// One message per violated rule, in the order the validator reported them
    Failure(Vec<String>),
}

impl ValidateOptionsResult {
    /// Failure with the given messages
    pub fn fail<I, S>(messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Failure(messages.into_iter().map(Into::into).collect())
    }

    /// True for [`ValidateOptionsResult::Success`]
    pub fn succeeded(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// The failure messages (empty on success)
    pub fn failures(&self) -> &[String] {
        match self {
            Self::Success => &[],
            Self::Failure(messages) => messages,
        }
    }

    /// All failure messages joined with `"; "`
    pub fn failure_message(&self) -> String {
        self.failures().join("; ")
    }
}

/// The registry-side validation contract for options of type `T`
pub trait ValidateOptions<T>: Send + Sync {
    /// Validate `options`.
    ///
    /// `name` is the options instance name, `None` for the default instance.
    /// `policy` decides how members are named in messages.
    fn validate(
        &self,
        name: Option<&str>,
        options: &T,
        policy: DisplayNamePolicy,
    ) -> ValidateOptionsResult;
}

/// Adapts a rule-based [`Validator`] to [`ValidateOptions`]
///
/// Named instances are not supported: the `name` argument is ignored and
/// every instance of `T` is checked by the same rules.
pub struct RuleValidation<T, V> {
    validator: V,
    type_name: &'static str,
    _options: PhantomData<fn(&T)>,
}

impl<T, V: Validator<T>> RuleValidation<T, V> {
    /// Wrap `validator`; `type_name` is used for qualified display names
    pub fn new(validator: V, type_name: &'static str) -> Self {
        Self {
            validator,
            type_name,
            _options: PhantomData,
        }
    }
}

impl<T, V: Validator<T>> ValidateOptions<T> for RuleValidation<T, V> {
    fn validate(
        &self,
        _name: Option<&str>,
        options: &T,
        policy: DisplayNamePolicy,
    ) -> ValidateOptionsResult {
        let ctx = ValidationContext::new(self.type_name).with_policy(policy);
        let result = self.validator.validate(options, &ctx);
        if result.is_valid() {
            return ValidateOptionsResult::Success;
        }

        ValidateOptionsResult::Failure(
            result
                .errors
                .into_iter()
                .map(|failure| failure.error_message)
                .collect(),
        )
    }
}

/// Adapts a predicate plus a fixed message to [`ValidateOptions`]
pub struct DelegateValidation<T> {
    predicate: Box<dyn Fn(&T) -> bool + Send + Sync>,
    message: String,
}

impl<T> DelegateValidation<T> {
    /// Fail with `message` whenever `predicate` returns false
    pub fn new<F>(predicate: F, message: impl Into<String>) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Box::new(predicate),
            message: message.into(),
        }
    }
}

impl<T> ValidateOptions<T> for DelegateValidation<T> {
    fn validate(
        &self,
        _name: Option<&str>,
        options: &T,
        _policy: DisplayNamePolicy,
    ) -> ValidateOptionsResult {
        if (self.predicate)(options) {
            ValidateOptionsResult::Success
        } else {
            ValidateOptionsResult::fail([self.message.as_str()])
        }
    }
}
