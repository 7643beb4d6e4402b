//! Options registry
//!
//! This module contains [`OptionsRegistry`], where options types are
//! registered during startup, and [`OptionsProvider`], the finalized form
//! that materializes and validates values on access.
//!
//! Materializing a value means: start from `T::default()`, apply every
//! source (configuration bindings and `configure` closures) in registration
//! order, then run every validator bound to `T`.

mod builder;
mod provider;
mod sweep;

pub use builder::OptionsBuilder;
pub use provider::{OptionsProvider, OptionsScope};
pub use sweep::{SweepFailure, SweepReport};

use crate::adapter::ValidateOptions;
use crate::config::Configuration;
use crate::error::{Error, Result};
use crate::options::Options;
use crate::validation::{DisplayNamePolicy, Validator};
use log::debug;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

type Source<T> = Box<dyn Fn(&mut T) -> Result<()> + Send + Sync>;

/// Identity of a bound validator. Typed validators collapse by type,
/// delegate validations never do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValidatorKey {
    Type(TypeId),
    Delegate,
}

/// Everything registered for one options type
struct Registration<T> {
    sources: Vec<Source<T>>,
    validators: Vec<(ValidatorKey, Arc<dyn ValidateOptions<T>>)>,
    validate_on_start: bool,
}

impl<T: Options> Registration<T> {
    fn new() -> Self {
        Self {
            sources: Vec::new(),
            validators: Vec::new(),
            validate_on_start: false,
        }
    }

    fn add_source<F>(&mut self, source: F)
    where
        F: Fn(&mut T) -> Result<()> + Send + Sync + 'static,
    {
        self.sources.push(Box::new(source));
    }

    /// Add a validator unless one with the same key is already bound
    fn insert_validator<F>(&mut self, key: ValidatorKey, make: F) -> bool
    where
        F: FnOnce() -> Arc<dyn ValidateOptions<T>>,
    {
        if key != ValidatorKey::Delegate && self.validators.iter().any(|(k, _)| *k == key) {
            return false;
        }
        self.validators.push((key, make()));
        true
    }

    fn materialize_typed(&self, policy: DisplayNamePolicy) -> Result<T> {
        let mut value = T::default();
        for source in &self.sources {
            source(&mut value)?;
        }

        let failures: Vec<String> = self
            .validators
            .iter()
            .flat_map(|(_, validator)| validator.validate(None, &value, policy).failures().to_vec())
            .collect();

        if !failures.is_empty() {
            return Err(Error::Validation {
                type_name: T::type_name(),
                failures,
            });
        }

        debug!("Materialized options {}", T::type_name());
        Ok(value)
    }
}

/// Type-erased view of a [`Registration`] used by the provider and the sweep
trait ErasedRegistration: Send + Sync {
    fn type_name(&self) -> &'static str;
    fn has_source(&self) -> bool;
    fn validator_count(&self) -> usize;
    fn validate_on_start(&self) -> bool;
    fn materialize(&self, policy: DisplayNamePolicy) -> Result<Arc<dyn Any + Send + Sync>>;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Options> ErasedRegistration for Registration<T> {
    fn type_name(&self) -> &'static str {
        T::type_name()
    }

    fn has_source(&self) -> bool {
        !self.sources.is_empty()
    }

    fn validator_count(&self) -> usize {
        self.validators.len()
    }

    fn validate_on_start(&self) -> bool {
        self.validate_on_start
    }

    fn materialize(&self, policy: DisplayNamePolicy) -> Result<Arc<dyn Any + Send + Sync>> {
        let value: Arc<dyn Any + Send + Sync> = Arc::new(self.materialize_typed(policy)?);
        Ok(value)
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Registrations in the order their types were first seen
#[derive(Default)]
struct Registrations {
    entries: HashMap<TypeId, Box<dyn ErasedRegistration>>,
    order: Vec<TypeId>,
}

impl Registrations {
    fn get(&self, id: &TypeId) -> Option<&dyn ErasedRegistration> {
        self.entries.get(id).map(|r| &**r)
    }

    fn iter(&self) -> impl Iterator<Item = (TypeId, &dyn ErasedRegistration)> {
        self.order
            .iter()
            .filter_map(|id| self.get(id).map(|r| (*id, r)))
    }

    fn typed_mut<T: Options>(&mut self) -> &mut Registration<T> {
        let id = TypeId::of::<T>();
        if !self.entries.contains_key(&id) {
            debug!("Registering options type {}", T::type_name());
            self.order.push(id);
        }
        let entry = self
            .entries
            .entry(id)
            .or_insert_with(|| Box::new(Registration::<T>::new()));
        // `entries` is private and only written by the `or_insert_with` above,
        // so the value under `TypeId::of::<T>()` is always a `Registration<T>`.
        match entry.as_any_mut().downcast_mut::<Registration<T>>() {
            Some(registration) => registration,
            None => unreachable!("registration for {} stored under a foreign TypeId", T::type_name()),
        }
    }
}

// =============================================================================
// Options Registry
// =============================================================================

/// Collection of options registrations, populated during startup.
///
/// # Example
///
/// ```rust
/// use optguard::{Configuration, Options, OptionsRegistry, RuleSet, ValidationContext,
///     ValidationResult, Validator};
/// use serde::{Deserialize, Serialize};
/// use serde_json::json;
///
/// #[derive(Default, Serialize, Deserialize)]
/// struct DatabaseOptions {
///     host: String,
///     port: u16,
/// }
///
/// impl Options for DatabaseOptions {
///     const KEY: Option<&'static str> = Some("App:Database");
/// }
///
/// struct DatabaseValidator(RuleSet<DatabaseOptions>);
///
/// impl Default for DatabaseValidator {
///     fn default() -> Self {
///         Self(RuleSet::<DatabaseOptions>::new()
///             .rule_for("Host", |o| &o.host, |r| r.not_empty())
///             .rule_for("Port", |o| &o.port, |r| r.greater_than(0)))
///     }
/// }
///
/// impl Validator<DatabaseOptions> for DatabaseValidator {
///     fn validate(&self, o: &DatabaseOptions, ctx: &ValidationContext<'_>) -> ValidationResult {
///         self.0.validate(o, ctx)
///     }
/// }
///
/// let config = Configuration::from_value(json!({
///     "App": {"Database": {"Host": "db.internal", "Port": 5432}}
/// }));
///
/// let mut registry = OptionsRegistry::new();
/// registry
///     .add_validated_options::<DatabaseOptions, DatabaseValidator>(&config)
///     .validate_on_start();
///
/// let provider = registry.build()?;
/// assert_eq!(provider.get::<DatabaseOptions>()?.port, 5432);
/// # Ok::<(), optguard::Error>(())
/// ```
#[derive(Default)]
pub struct OptionsRegistry {
    registrations: Registrations,
}

impl std::fmt::Debug for OptionsRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.registrations.iter().map(|(_, r)| r.type_name()))
            .finish()
    }
}

impl OptionsRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `T` (if not yet registered) and return a builder for it
    pub fn add_options<T: Options>(&mut self) -> OptionsBuilder<'_, T> {
        OptionsBuilder::new(self.registrations.typed_mut::<T>())
    }

    /// Bind `T` from its configuration section and validate it with `V`.
    ///
    /// The section key is `T::KEY` when declared, otherwise the type name
    /// verbatim. A missing section is not an error: `T` keeps its defaults.
    ///
    /// Returns the builder so the caller can chain `.validate_on_start()`.
    pub fn add_validated_options<T, V>(&mut self, configuration: &Configuration) -> OptionsBuilder<'_, T>
    where
        T: Options,
        V: Validator<T> + Default + 'static,
    {
        let key = T::configuration_key();
        let section = configuration.section(key);
        if !section.exists() {
            debug!(
                "No configuration section '{key}' for {}, binding defaults",
                T::type_name()
            );
        }
        self.add_options::<T>().bind(section).validate_with::<V>()
    }

    /// Produce `T` by running `configure` on `T::default()` and validate it with `V`
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// registry
    ///     .add_validated_options_with::<DatabaseOptions, DatabaseValidator, _>(|o| {
    ///         o.host = "localhost".into();
    ///         o.port = 5432;
    ///     })
    ///     .validate_on_start();
    /// ```
    pub fn add_validated_options_with<T, V, F>(&mut self, configure: F) -> OptionsBuilder<'_, T>
    where
        T: Options,
        V: Validator<T> + Default + 'static,
        F: Fn(&mut T) + Send + Sync + 'static,
    {
        self.add_options::<T>().configure(configure).validate_with::<V>()
    }

    /// Bind validator `V` to `T` without adding a value source.
    ///
    /// Binding the same pair again has no effect.
    pub fn add_validator<T, V>(&mut self) -> &mut Self
    where
        T: Options,
        V: Validator<T> + Default + 'static,
    {
        let _ = self.add_options::<T>().validate_with::<V>();
        self
    }

    /// Whether `T` has been registered in any way
    pub fn contains<T: Options>(&self) -> bool {
        self.registrations.get(&TypeId::of::<T>()).is_some()
    }

    /// Number of validators currently bound to `T`
    pub fn validator_count<T: Options>(&self) -> usize {
        self.registrations
            .get(&TypeId::of::<T>())
            .map_or(0, |r| r.validator_count())
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.registrations.order.len()
    }

    /// True when nothing has been registered
    pub fn is_empty(&self) -> bool {
        self.registrations.order.is_empty()
    }

    /// Finalize the registry.
    ///
    /// Every type that opted into `validate_on_start()` is materialized now.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StartupValidation`] carrying every eager failure
    /// (validation or binding) if any occurred.
    pub fn build(self) -> Result<OptionsProvider> {
        OptionsProvider::start(self.registrations)
    }
}
