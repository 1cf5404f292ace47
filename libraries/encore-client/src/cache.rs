//! Offline cache for read results.
//!
//! Successful reads are stored as JSON under a string key. When a later
//! read of the same key fails with a transient error, the cached copy is
//! served instead. An optional directory mirrors every entry to disk so
//! the cache survives restarts. The disk copy holds the same entries as
//! memory: files of evicted entries are removed.

use crate::error::Result;
use crate::types::CacheSettings;
use lru::LruCache;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

const ENTRY_EXTENSION: &str = "json";

/// LRU cache of backend responses, optionally mirrored to disk.
#[derive(Clone)]
pub struct OfflineCache {
    entries: Arc<Mutex<LruCache<String, Value>>>,
    directory: Option<PathBuf>,
}

impl OfflineCache {
    /// In-memory cache holding at most `capacity` entries (minimum 1).
    pub fn in_memory(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Arc::new(Mutex::new(LruCache::new(capacity))),
            directory: None,
        }
    }

    /// Cache mirrored to `directory`.
    ///
    /// The directory is created on first write.
    pub fn with_directory(capacity: usize, directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: Some(directory.into()),
            ..Self::in_memory(capacity)
        }
    }

    pub fn from_settings(settings: &CacheSettings) -> Self {
        match &settings.directory {
            Some(dir) => Self::with_directory(settings.capacity, dir),
            None => Self::in_memory(settings.capacity),
        }
    }

    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    /// Number of entries held in memory
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Store a value, writing through to disk when a directory is set.
    ///
    /// Disk failures are logged, not returned; the in-memory copy still
    /// serves this process.
    pub async fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_value(value).map_err(encore_core::EncoreError::from)?;

        if let Some(dir) = &self.directory {
            if let Err(e) = write_entry(dir, key, &json).await {
                tracing::warn!(key, error = %e, "Failed to persist cache entry");
            }
        }

        self.insert(key, json).await;
        Ok(())
    }

    /// Look up a value, falling back to the disk copy on a memory miss.
    ///
    /// Entries that no longer deserialize as `T` are treated as misses.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let hit = self.lock().get(key).cloned();

        let json = match hit {
            Some(json) => json,
            None => {
                let dir = self.directory.as_ref()?;
                let json = read_entry(dir, key).await?;
                self.insert(key, json.clone()).await;
                json
            }
        };

        match serde_json::from_value(json) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!(key, error = %e, "Discarding unreadable cache entry");
                None
            }
        }
    }

    /// Drop every entry, in memory and on disk.
    pub async fn clear(&self) -> Result<()> {
        self.lock().clear();

        if let Some(dir) = &self.directory {
            match tokio::fs::read_dir(dir).await {
                Ok(mut listing) => {
                    while let Some(entry) = listing.next_entry().await? {
                        let path = entry.path();
                        if path.extension().is_some_and(|ext| ext == ENTRY_EXTENSION) {
                            tokio::fs::remove_file(&path).await?;
                        }
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    /// Write every in-memory entry to the cache directory.
    ///
    /// Returns the number of entries written; zero without a directory.
    pub async fn persist(&self) -> Result<usize> {
        let Some(dir) = &self.directory else {
            return Ok(0);
        };

        let snapshot: Vec<(String, Value)> = self
            .lock()
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        for (key, json) in &snapshot {
            write_entry(dir, key, json).await?;
        }
        tracing::debug!(entries = snapshot.len(), dir = %dir.display(), "Persisted offline cache");
        Ok(snapshot.len())
    }

    /// Load entries found in the cache directory into memory.
    ///
    /// Reads at most the cache's capacity; surplus files are deleted.
    /// Unreadable files are skipped. Returns the number of entries loaded.
    pub async fn load(&self) -> Result<usize> {
        let Some(dir) = &self.directory else {
            return Ok(0);
        };

        let mut listing = match tokio::fs::read_dir(dir).await {
            Ok(listing) => listing,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let capacity = self.lock().cap().get();
        let mut loaded = 0;
        while let Some(entry) = listing.next_entry().await? {
            let path = entry.path();
            let Some(key) = key_from_path(&path) else {
                continue;
            };
            if loaded >= capacity {
                remove_entry(dir, &key).await;
                continue;
            }
            if let Some(json) = read_entry(dir, &key).await {
                self.insert(&key, json).await;
                loaded += 1;
            }
        }
        tracing::debug!(entries = loaded, dir = %dir.display(), "Loaded offline cache");
        Ok(loaded)
    }

    /// Insert into memory and drop the disk copy of whatever got evicted
    async fn insert(&self, key: &str, json: Value) {
        let evicted = self
            .lock()
            .push(key.to_string(), json)
            .map(|(old_key, _)| old_key)
            .filter(|old_key| old_key != key);

        if let (Some(dir), Some(old_key)) = (&self.directory, evicted) {
            remove_entry(dir, &old_key).await;
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LruCache<String, Value>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for OfflineCache {
    fn default() -> Self {
        Self::from_settings(&CacheSettings::default())
    }
}

impl std::fmt::Debug for OfflineCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OfflineCache")
            .field("len", &self.len())
            .field("directory", &self.directory)
            .finish()
    }
}

/// Hex-encode the key so any key maps to a distinct, portable file name
fn entry_path(dir: &Path, key: &str) -> PathBuf {
    let name: String = key.bytes().map(|b| format!("{b:02x}")).collect();
    dir.join(format!("{name}.{ENTRY_EXTENSION}"))
}

/// Recover the key from an entry file name
fn key_from_path(path: &Path) -> Option<String> {
    if path.extension()? != ENTRY_EXTENSION {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    if stem.len() % 2 != 0 {
        return None;
    }
    let bytes = (0..stem.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(stem.get(i..i + 2)?, 16).ok())
        .collect::<Option<Vec<u8>>>()?;
    String::from_utf8(bytes).ok()
}

async fn write_entry(dir: &Path, key: &str, json: &Value) -> std::io::Result<()> {
    tokio::fs::create_dir_all(dir).await?;
    let bytes = serde_json::to_vec(json)?;
    tokio::fs::write(entry_path(dir, key), bytes).await
}

async fn remove_entry(dir: &Path, key: &str) {
    match tokio::fs::remove_file(entry_path(dir, key)).await {
        Ok(()) => tracing::trace!(key, "Evicted cache entry from disk"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(key, error = %e, "Failed to remove cache entry"),
    }
}

async fn read_entry(dir: &Path, key: &str) -> Option<Value> {
    let bytes = tokio::fs::read(entry_path(dir, key)).await.ok()?;
    serde_json::from_slice(&bytes).ok()
}
