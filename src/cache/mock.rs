use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::RwLock;

use super::ResultCache;
use super::error::{CacheError, CacheResult};
use crate::model::InferenceResult;

/// In-memory [`ResultCache`] for tests.
#[derive(Default)]
pub struct MemoryResultCache {
    entries: RwLock<HashMap<String, InferenceResult>>,
    writes: AtomicUsize,
    fail_writes: AtomicBool,
}

impl MemoryResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent `put` calls fail (simulates a full disk).
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful `put` calls.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn keys(&self) -> Vec<String> {
        self.entries.read().keys().cloned().collect()
    }
}

impl ResultCache for MemoryResultCache {
    fn get(&self, key: &str) -> Option<InferenceResult> {
        self.entries.read().get(key).cloned()
    }

    fn put(&self, key: &str, result: InferenceResult) -> CacheResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CacheError::Rejected {
                key: key.to_string(),
                reason: "writes disabled".to_string(),
            });
        }
        self.entries.write().insert(key.to_string(), result);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

impl std::fmt::Debug for MemoryResultCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryResultCache")
            .field("entries", &self.len())
            .field("writes", &self.write_count())
            .finish()
    }
}
