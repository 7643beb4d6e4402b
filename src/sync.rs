//! Poison recovery for the provider's value caches
//!
//! A panic inside a user `configure` closure must not leave the root cache
//! unusable, so poisoned locks are recovered with a warning instead.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Extension trait for RwLock with poison recovery
pub(crate) trait RwLockExt<T> {
    /// Acquire a read lock, recovering from poison errors
    fn read_recovered(&self) -> RwLockReadGuard<'_, T>;

    /// Acquire a write lock, recovering from poison errors
    fn write_recovered(&self) -> RwLockWriteGuard<'_, T>;
}

impl<T> RwLockExt<T> for RwLock<T> {
    fn read_recovered(&self) -> RwLockReadGuard<'_, T> {
        self.read().unwrap_or_else(|poisoned| {
            log::warn!("Options cache lock was poisoned (read), recovering");
            poisoned.into_inner()
        })
    }

    fn write_recovered(&self) -> RwLockWriteGuard<'_, T> {
        self.write().unwrap_or_else(|poisoned| {
            log::warn!("Options cache lock was poisoned (write), recovering");
            poisoned.into_inner()
        })
    }
}
