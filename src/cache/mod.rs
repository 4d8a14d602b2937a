//! Content-addressed memoization of strategy results.
//!
//! [`CacheStore`] is the persisted `{version, entries}` document.
//! [`JsonFileCache`] wraps one store file behind the [`ResultCache`]
//! capability that strategies receive at construction time.

pub mod error;
pub mod file;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod store;


pub use error::{CacheError, CacheResult};
pub use file::JsonFileCache;
#[cfg(any(test, feature = "mock"))]
pub use mock::MemoryResultCache;
pub use store::CacheStore;

use crate::model::InferenceResult;

/// Key → result memoization used by cached strategies.
pub trait ResultCache: Send + Sync {
    /// Pure lookup.
    fn get(&self, key: &str) -> Option<InferenceResult>;

    /// Inserts (or overwrites) `key` and persists the change.
    ///
    /// On error the cache is left as it was before the call: a later `get`
    /// returns the previous value for `key`, or `None` if there was none.
    fn put(&self, key: &str, result: InferenceResult) -> CacheResult<()>;

    /// Human-readable location recorded in audits (path, or `memory`).
    fn location(&self) -> String;
}
