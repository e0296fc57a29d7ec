//! Durable local cache: a keyed string store.
//!
//! The file-backed implementation keeps one file per key under a data
//! directory, created on first write. Values can reach low megabytes
//! (profile logos are embedded base64), so writes report quota exhaustion
//! as a distinct non-error outcome.

use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    /// I/O error reading or writing a cache file.
    #[error("I/O error for {0}: {1}")]
    Io(PathBuf, #[source] io::Error),
}

/// A durable keyed string store.
///
/// `set` returns `Ok(false)` when the value exceeds the store's quota;
/// the caller decides whether to surface that as an advisory.
pub trait LocalCache: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<bool, CacheError>;
    fn delete(&self, key: &str);
}

/// File-per-key cache rooted at a data directory.
#[derive(Debug, Clone)]
pub struct FileCache {
    data_dir: PathBuf,
    max_value_bytes: Option<usize>,
}

impl FileCache {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            max_value_bytes: None,
        }
    }

    /// Limit the size of a single cached value. Writes above the limit
    /// report quota exhaustion instead of failing.
    pub fn with_quota(mut self, max_value_bytes: usize) -> Self {
        self.max_value_bytes = Some(max_value_bytes);
        self
    }

    pub fn data_dir(&self) -> &PathBuf {
        &self.data_dir
    }

    fn path(&self, key: &str) -> PathBuf {
        // Cache keys may embed user ids; keep filenames flat and safe.
        let safe: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                    c
                } else {
                    '-'
                }
            })
            .collect();
        self.data_dir.join(format!("{}.json", safe))
    }
}

impl LocalCache for FileCache {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.path(key);
        match fs::read_to_string(&path) {
            Ok(value) => Some(value),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "cache read failed");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<bool, CacheError> {
        if let Some(max) = self.max_value_bytes {
            if value.len() > max {
                return Ok(false);
            }
        }

        fs::create_dir_all(&self.data_dir)
            .map_err(|e| CacheError::Io(self.data_dir.clone(), e))?;

        let path = self.path(key);
        fs::write(&path, value).map_err(|e| CacheError::Io(path, e))?;
        Ok(true)
    }

    fn delete(&self, key: &str) {
        let path = self.path(key);
        if let Err(e) = fs::remove_file(&path) {
            if e.kind() != io::ErrorKind::NotFound {
                debug!(path = %path.display(), error = %e, "cache delete failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_cache() -> (FileCache, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let cache = FileCache::new(temp_dir.path().to_path_buf());
        (cache, temp_dir)
    }

    #[test]
    fn test_get_missing_returns_none() {
        let (cache, _temp) = test_cache();
        assert!(cache.get("basket_guest").is_none());
    }

    #[test]
    fn test_set_and_get_roundtrip() {
        let (cache, _temp) = test_cache();
        assert!(cache.set("basket_guest", "[1,2,3]").unwrap());
        assert_eq!(cache.get("basket_guest").as_deref(), Some("[1,2,3]"));
    }

    #[test]
    fn test_set_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("nested").join("data");
        let cache = FileCache::new(nested.clone());

        assert!(cache.set("profile_guest", "{}").unwrap());
        assert!(nested.exists());
    }

    #[test]
    fn test_delete_removes_value() {
        let (cache, _temp) = test_cache();
        cache.set("settings_guest", "{}").unwrap();
        cache.delete("settings_guest");
        assert!(cache.get("settings_guest").is_none());

        // Deleting a missing key is a no-op
        cache.delete("settings_guest");
    }

    #[test]
    fn test_quota_exhaustion_reported_not_errored() {
        let (cache, _temp) = test_cache();
        let cache = cache.with_quota(8);

        assert!(cache.set("small", "1234").unwrap());
        assert!(!cache.set("big", "123456789").unwrap());
        // The oversized write left no partial value behind
        assert!(cache.get("big").is_none());
    }

    #[test]
    fn test_keys_with_unsafe_characters() {
        let (cache, _temp) = test_cache();
        cache.set("profile_user@example.com", "{}").unwrap();
        assert_eq!(cache.get("profile_user@example.com").as_deref(), Some("{}"));
    }

    #[test]
    fn test_overwrite_existing_value() {
        let (cache, _temp) = test_cache();
        cache.set("basket_guest", "old").unwrap();
        cache.set("basket_guest", "new").unwrap();
        assert_eq!(cache.get("basket_guest").as_deref(), Some("new"));
    }
}
