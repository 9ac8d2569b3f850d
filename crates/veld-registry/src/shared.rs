//! Shared read access to a store under compilation.
//!
//! All writes for one module compilation are sequential within the
//! compilation driver, but other stages may read the store while it is
//! being populated (a nested macro expansion querying already-registered
//! signatures, for example). [`SharedDefinitionStore`] wraps the store in
//! an `RwLock` so readers and the single writer can interleave; two
//! writers never run concurrently by construction.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::store::DefinitionStore;

/// Cloneable handle to a definition store for one module compilation.
#[derive(Debug, Default, Clone)]
pub struct SharedDefinitionStore {
    inner: Arc<RwLock<DefinitionStore>>,
}

impl SharedDefinitionStore {
    /// Create a handle around an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire read access.
    ///
    /// Lock poisoning is ignored: the store holds plain data and a
    /// panicked writer cannot leave it logically half-updated in a way a
    /// reader could observe mid-operation.
    pub fn read(&self) -> RwLockReadGuard<'_, DefinitionStore> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Acquire write access. Only the compilation driver should call this.
    pub fn write(&self) -> RwLockWriteGuard<'_, DefinitionStore> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Recover the store at module close, for consolidation.
    ///
    /// Returns `None` while other handles are still alive.
    pub fn into_inner(self) -> Option<DefinitionStore> {
        Arc::try_unwrap(self.inner)
            .ok()
            .map(|lock| lock.into_inner().unwrap_or_else(PoisonError::into_inner))
    }
}
