//! Fluent configuration of a single options registration

use super::{Registration, ValidatorKey};
use crate::adapter::{DelegateValidation, RuleValidation, ValidateOptions};
use crate::config::ConfigurationSection;
use crate::options::Options;
use crate::validation::Validator;
use log::debug;
use std::any::TypeId;
use std::sync::Arc;

/// Builder returned by [`OptionsRegistry::add_options`](super::OptionsRegistry::add_options).
///
/// Every method mutates the registration in place and hands the builder
/// back, so calls can be chained or dropped at any point.
pub struct OptionsBuilder<'a, T: Options> {
    registration: &'a mut Registration<T>,
}

impl<'a, T: Options> OptionsBuilder<'a, T> {
    pub(super) fn new(registration: &'a mut Registration<T>) -> Self {
        Self { registration }
    }

    /// Bind `T` from a configuration section.
    ///
    /// The section is applied on top of whatever earlier sources produced.
    pub fn bind(self, section: ConfigurationSection) -> Self {
        debug!(
            "Adding configuration binding '{}' for {}",
            section.key(),
            T::type_name()
        );
        self.registration
            .add_source(move |value| section.bind_into(value, T::type_name()));
        self
    }

    /// Run `configure` against the value during materialization
    pub fn configure<F>(self, configure: F) -> Self
    where
        F: Fn(&mut T) + Send + Sync + 'static,
    {
        self.registration.add_source(move |value| {
            configure(value);
            Ok(())
        });
        self
    }

    /// Validate `T` with a default-constructed `V`.
    ///
    /// At most one `V` is ever bound to `T`, no matter how often this runs.
    pub fn validate_with<V>(self) -> Self
    where
        V: Validator<T> + Default + 'static,
    {
        self.insert_typed::<V>(V::default)
    }

    /// Validate `T` with a specific validator instance.
    ///
    /// Deduplicated by the validator's type, like [`validate_with`](Self::validate_with).
    pub fn validate_with_instance<V>(self, validator: V) -> Self
    where
        V: Validator<T> + 'static,
    {
        self.insert_typed::<V>(move || validator)
    }

    /// Fail validation with `message` whenever `predicate` returns false
    pub fn validate<F>(self, predicate: F, message: impl Into<String>) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let delegate = DelegateValidation::new(predicate, message);
        self.registration
            .insert_validator(ValidatorKey::Delegate, || Arc::new(delegate));
        self
    }

    /// Materialize and validate `T` when the registry is built, instead of
    /// on first access
    pub fn validate_on_start(self) -> Self {
        self.registration.validate_on_start = true;
        self
    }

    fn insert_typed<V>(self, make: impl FnOnce() -> V) -> Self
    where
        V: Validator<T> + 'static,
    {
        let added = self
            .registration
            .insert_validator(ValidatorKey::Type(TypeId::of::<V>()), || {
                let adapter: Arc<dyn ValidateOptions<T>> =
                    Arc::new(RuleValidation::new(make(), T::type_name()));
                adapter
            });
        if !added {
            debug!(
                "Validator {} already bound to {}",
                std::any::type_name::<V>(),
                T::type_name()
            );
        }
        self
    }
}
