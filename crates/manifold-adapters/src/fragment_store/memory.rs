//! In-memory fragment store with built-in fragments.

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, RwLock},
};

use tracing::{debug, info, instrument, trace};

use manifold_core::{
    application::{
        ApplicationError,
        ports::{FragmentKey, FragmentStore},
    },
    error::ManifoldResult,
};

use crate::{builtin_fragments::BUILTIN_FRAGMENTS, fragment_loader::FilesystemFragmentLoader};

/// Thread-safe fragment store keyed by storage path.
#[derive(Clone, Default)]
pub struct InMemoryFragmentStore {
    inner: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryFragmentStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with the built-in fragments loaded.
    pub fn with_builtin() -> ManifoldResult<Self> {
        let store = Self::new();
        for (path, text) in BUILTIN_FRAGMENTS {
            store.insert(*path, *text)?;
        }
        Ok(store)
    }

    /// Built-ins, shadowed path by path by the files under `dir`.
    #[instrument(skip_all, fields(dir = %dir.display()))]
    pub fn with_overrides(dir: &Path) -> ManifoldResult<Self> {
        let store = Self::with_builtin()?;
        let loaded = FilesystemFragmentLoader::new(dir).load_all()?;
        let count = loaded.fragments.len();
        for (path, text) in loaded.fragments {
            store.insert(path, text)?;
        }
        info!(
            count,
            name = loaded.name.as_deref().unwrap_or("unnamed"),
            "Fragment overrides loaded"
        );
        Ok(store)
    }

    /// Add or replace a fragment.
    pub fn insert(&self, path: impl Into<String>, text: impl Into<String>) -> ManifoldResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        inner.insert(path.into(), text.into());
        Ok(())
    }

    /// Get the number of fragments.
    pub fn len(&self) -> usize {
        self.inner.read().map(|inner| inner.len()).unwrap_or(0)
    }

    /// Check if store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FragmentStore for InMemoryFragmentStore {
    fn fetch(&self, key: &FragmentKey) -> ManifoldResult<String> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;

        for candidate in key.candidates() {
            if let Some(text) = inner.get(&candidate) {
                trace!(path = %candidate, "Fragment resolved");
                return Ok(text.clone());
            }
        }

        debug!(key = %key, "Fragment not found");
        Err(key.not_found())
    }

    fn list(&self) -> ManifoldResult<Vec<String>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;
        let mut paths: Vec<_> = inner.keys().cloned().collect();
        paths.sort();
        Ok(paths)
    }
}
