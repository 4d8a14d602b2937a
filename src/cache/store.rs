//! Versioned cache document persisted as JSON.

use std::collections::BTreeMap;
use std::fs;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use super::error::{CacheError, CacheResult};
use crate::constants::CACHE_FORMAT_VERSION;
use crate::model::InferenceResult;

fn default_version() -> String {
    CACHE_FORMAT_VERSION.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// `{version, entries}` mapping cache keys to stored results.
///
/// Unknown top-level fields are ignored and missing ones default, so files
/// written by newer versions that only add fields still load.
pub struct CacheStore {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub entries: BTreeMap<String, InferenceResult>,
}

impl Default for CacheStore {
    fn default() -> Self {
        Self {
            version: default_version(),
            entries: BTreeMap::new(),
        }
    }
}

impl CacheStore {
    /// Creates an empty store at the current format version.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the store at `path`.
    ///
    /// A missing file yields an empty store. An unreadable or unparseable file
    /// is logged and also yields an empty store.
    pub fn load(path: &Path) -> Self {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "No cache file, starting empty");
                return Self::new();
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Cache file unreadable, starting empty");
                return Self::new();
            }
        };

        match serde_json::from_slice::<CacheStore>(&bytes) {
            Ok(store) => {
                debug!(
                    path = %path.display(),
                    entries = store.entries.len(),
                    version = %store.version,
                    "Loaded cache store"
                );
                store
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Cache file corrupted, starting empty");
                Self::new()
            }
        }
    }

    /// Returns the stored result for `key`.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&InferenceResult> {
        self.entries.get(key)
    }

    /// Inserts or overwrites `key`, returning the displaced result. Call
    /// [`CacheStore::save`] to persist.
    #[inline]
    pub fn put(
        &mut self,
        key: impl Into<String>,
        result: InferenceResult,
    ) -> Option<InferenceResult> {
        self.entries.insert(key.into(), result)
    }

    /// Removes `key`, returning its result.
    #[inline]
    pub fn remove(&mut self, key: &str) -> Option<InferenceResult> {
        self.entries.remove(key)
    }

    /// Returns the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Writes the whole store to `path` atomically.
    ///
    /// Data goes to a temporary file in the same directory, is synced, then
    /// renamed over `path`. Readers see either the old or the new store.
    pub fn save(&self, path: &Path) -> CacheResult<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        if !dir.exists() {
            fs::create_dir_all(dir).map_err(|source| CacheError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let write_err = |source: std::io::Error| CacheError::Write {
            path: path.to_path_buf(),
            source,
        };

        let temp = NamedTempFile::new_in(dir).map_err(write_err)?;
        {
            let mut writer = BufWriter::new(temp.as_file());
            serde_json::to_writer_pretty(&mut writer, self).map_err(|source| {
                CacheError::Serialize {
                    path: path.to_path_buf(),
                    source,
                }
            })?;
            writer.flush().map_err(write_err)?;
        }
        temp.as_file().sync_all().map_err(write_err)?;
        temp.persist(path).map_err(|e| write_err(e.error))?;

        debug!(path = %path.display(), entries = self.entries.len(), "Saved cache store");
        Ok(())
    }
}
