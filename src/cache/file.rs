//! File-backed result cache with lazy load and write-through persistence.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::{debug, warn};

use super::ResultCache;
use super::error::CacheResult;
use super::store::CacheStore;
use crate::model::InferenceResult;

/// [`ResultCache`] persisted as one JSON document.
///
/// The store is read from disk on first use and then kept in memory. Every
/// [`ResultCache::put`] rewrites the whole file. Not safe for concurrent
/// writers in separate processes: load → mutate → save is not transactional.
pub struct JsonFileCache {
    path: PathBuf,
    store: Mutex<Option<CacheStore>>,
}

impl JsonFileCache {
    /// Creates a cache backed by `path`. Nothing is read until first use.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            store: Mutex::new(None),
        }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` once the store has been read from disk.
    pub fn is_loaded(&self) -> bool {
        self.store.lock().is_some()
    }

    /// Returns the number of entries (loading the store if needed).
    pub fn len(&self) -> usize {
        self.with_store(|store| store.len())
    }

    /// Returns `true` if the store has no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn with_store<R>(&self, f: impl FnOnce(&mut CacheStore) -> R) -> R {
        let mut guard = self.store.lock();
        let store = guard.get_or_insert_with(|| CacheStore::load(&self.path));
        f(store)
    }
}

impl ResultCache for JsonFileCache {
    fn get(&self, key: &str) -> Option<InferenceResult> {
        self.with_store(|store| store.get(key).cloned())
    }

    fn put(&self, key: &str, result: InferenceResult) -> CacheResult<()> {
        self.with_store(|store| {
            let previous = store.put(key, result);
            debug!(key, entries = store.len(), "Persisting cache entry");

            if let Err(e) = store.save(&self.path) {
                match previous {
                    Some(previous) => {
                        store.put(key, previous);
                    }
                    None => {
                        store.remove(key);
                    }
                }
                warn!(key, error = %e, "Cache write failed, entry rolled back");
                return Err(e);
            }
            Ok(())
        })
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

impl std::fmt::Debug for JsonFileCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonFileCache")
            .field("path", &self.path)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}
