use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("failed to serialize cache: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write cache file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// In-memory cache of fetched JSON responses, keyed by exact URL.
///
/// The map memoizes every successful fetch within a run. When constructed
/// with a backing file it additionally survives across runs: the file is
/// read once at startup and written once at normal exit. Load failures are
/// non-fatal (the cache just starts empty); save failures are reported to
/// the caller.
#[derive(Debug, Default)]
pub struct ResponseCache {
    path: Option<PathBuf>,
    entries: HashMap<String, Value>,
}

impl ResponseCache {
    /// A cache with no backing file. Still memoizes within the run.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load a cache backed by `path`. A missing file starts a new cache;
    /// an unreadable or corrupt file is logged and treated the same way.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        let entries = match std::fs::read(path) {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(entries) => {
                    debug!(path = %path.display(), "loaded cache");
                    entries
                }
                Err(e) => {
                    warn!(path = %path.display(), "cache file corrupt, starting empty: {e}");
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "new cache");
                HashMap::new()
            }
            Err(e) => {
                warn!(path = %path.display(), "cache file unreadable, starting empty: {e}");
                HashMap::new()
            }
        };
        Self {
            path: Some(path.to_path_buf()),
            entries,
        }
    }

    #[must_use]
    pub fn get(&self, url: &str) -> Option<&Value> {
        self.entries.get(url)
    }

    pub fn insert(&mut self, url: String, value: Value) {
        self.entries.insert(url, value);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write the cache back to its backing file, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the entries cannot be serialized or the file
    /// cannot be written.
    pub fn save(&self) -> Result<(), CacheError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let bytes = serde_json::to_vec(&self.entries)?;
        std::fs::write(path, bytes).map_err(|source| CacheError::Write {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), entries = self.entries.len(), "cache saved");
        Ok(())
    }
}
