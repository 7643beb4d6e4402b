//! Finalized registry: lazy, cached access to validated options

use super::Registrations;
use crate::error::{Error, Result};
use crate::options::Options;
use crate::sync::RwLockExt;
use crate::validation::DisplayNamePolicy;
use log::{info, warn};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

type ValueCache = RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>;

// =============================================================================
// Options Provider
// =============================================================================

/// Read side of the registry, produced by [`OptionsRegistry::build`](super::OptionsRegistry::build).
///
/// Values are materialized on first access and cached for the provider's
/// lifetime. Failures are not cached: a later `get` tries again.
pub struct OptionsProvider {
    pub(super) registrations: Registrations,
    values: ValueCache,
}

impl std::fmt::Debug for OptionsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OptionsProvider")
            .field("registered", &self.registrations.order.len())
            .field("cached", &self.values.read_recovered().len())
            .finish()
    }
}

impl OptionsProvider {
    /// Finalize registrations and run eager validation
    pub(super) fn start(registrations: Registrations) -> Result<Self> {
        let provider = Self {
            registrations,
            values: RwLock::new(HashMap::new()),
        };

        let eager: Vec<(TypeId, &'static str)> = provider
            .registrations
            .iter()
            .filter(|(_, r)| r.validate_on_start())
            .map(|(id, r)| (id, r.type_name()))
            .collect();

        let errors: Vec<Error> = eager
            .iter()
            .filter_map(|(id, name)| {
                provider
                    .resolve_in(&provider.values, *id, name, DisplayNamePolicy::Member)
                    .err()
            })
            .collect();

        if !errors.is_empty() {
            warn!(
                "{} of {} eagerly validated options type(s) failed",
                errors.len(),
                eager.len()
            );
            return Err(Error::StartupValidation { errors });
        }

        info!(
            "Options provider ready: {} type(s) registered, {} validated at startup",
            provider.registrations.order.len(),
            eager.len()
        );
        Ok(provider)
    }

    /// Get the validated value for `T`.
    ///
    /// # Errors
    ///
    /// - [`Error::NotRegistered`] if `T` was never registered
    /// - [`Error::Bind`] if a configuration binding failed
    /// - [`Error::Validation`] listing every violated rule
    pub fn get<T: Options>(&self) -> Result<Arc<T>> {
        let value = self.resolve_in(
            &self.values,
            TypeId::of::<T>(),
            T::type_name(),
            DisplayNamePolicy::Member,
        )?;
        downcast(value)
    }

    /// Start a resolution scope with its own cache
    pub fn create_scope(&self) -> OptionsScope<'_> {
        OptionsScope {
            provider: self,
            values: RwLock::new(HashMap::new()),
        }
    }

    /// Names of the types that have at least one value source, in
    /// registration order
    pub fn registered_types(&self) -> Vec<&'static str> {
        self.registrations
            .iter()
            .filter(|(_, r)| r.has_source())
            .map(|(_, r)| r.type_name())
            .collect()
    }

    /// Whether `T` is registered
    pub fn contains<T: Options>(&self) -> bool {
        self.registrations.get(&TypeId::of::<T>()).is_some()
    }

    pub(super) fn resolve_in(
        &self,
        cache: &ValueCache,
        id: TypeId,
        type_name: &'static str,
        policy: DisplayNamePolicy,
    ) -> Result<Arc<dyn Any + Send + Sync>> {
        if let Some(value) = cache.read_recovered().get(&id) {
            return Ok(Arc::clone(value));
        }

        let registration = self
            .registrations
            .get(&id)
            .ok_or(Error::NotRegistered(type_name))?;
        let value = registration.materialize(policy)?;

        // Another thread may have won the race; keep the first value
        let mut cache = cache.write_recovered();
        Ok(Arc::clone(cache.entry(id).or_insert(value)))
    }
}

fn downcast<T: Options>(value: Arc<dyn Any + Send + Sync>) -> Result<Arc<T>> {
    value.downcast::<T>().map_err(|_| {
        Error::Config(format!(
            "cached options value is not of type {}",
            T::type_name()
        ))
    })
}

// =============================================================================
// Options Scope
// =============================================================================

/// A resolution scope.
///
/// Values resolved through a scope are cached in the scope only, so they are
/// materialized at most once per scope and never leak into the provider's
/// root cache.
pub struct OptionsScope<'p> {
    provider: &'p OptionsProvider,
    values: ValueCache,
}

impl OptionsScope<'_> {
    /// Get the validated value for `T` within this scope
    ///
    /// # Errors
    ///
    /// Same as [`OptionsProvider::get`].
    pub fn get<T: Options>(&self) -> Result<Arc<T>> {
        let value = self.provider.resolve_in(
            &self.values,
            TypeId::of::<T>(),
            T::type_name(),
            DisplayNamePolicy::Member,
        )?;
        downcast(value)
    }

    pub(super) fn resolve_with_policy(
        &self,
        id: TypeId,
        type_name: &'static str,
        policy: DisplayNamePolicy,
    ) -> Result<Arc<dyn Any + Send + Sync>> {
        self.provider.resolve_in(&self.values, id, type_name, policy)
    }
}
