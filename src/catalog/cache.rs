//! Durable key-value storage for the last fetched catalog.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::error::Result;

/// A key-value store holding JSON text.
///
/// Reads return `Ok(None)` on a miss; errors are reserved for storage that
/// exists but cannot be accessed.
pub trait CatalogCache: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>>;

    fn write(&self, key: &str, value: &str) -> Result<()>;
}

// ============================================================================
// FileCache
// ============================================================================

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl CatalogCache for FileCache {
    fn read(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Writes through a temporary file so readers never see a partial entry.
    fn write(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let temp = self.dir.join(format!(".{key}.json.tmp"));
        if let Err(err) = fs::write(&temp, value).and_then(|()| fs::rename(&temp, &path)) {
            let _ = fs::remove_file(&temp);
            return Err(err.into());
        }
        Ok(())
    }
}

// ============================================================================
// MemoryCache
// ============================================================================

/// Process-local cache, mostly useful for tests and one-shot runs.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cache that already holds `value` under `key`.
    pub fn with_entry(key: &str, value: impl Into<String>) -> Self {
        let cache = Self::new();
        cache
            .entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string(), value.into());
        cache
    }
}

impl CatalogCache for MemoryCache {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_cache_miss_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path().join("nested"));
        assert_eq!(cache.read("devIconOptions").unwrap(), None);
    }

    #[test]
    fn file_cache_creates_directory_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path().join("nested"));

        cache.write("devIconOptions", "[]").unwrap();

        assert!(dir.path().join("nested/devIconOptions.json").exists());
        assert_eq!(cache.read("devIconOptions").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn file_cache_replaces_whole_entry() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path());

        cache.write("devIconOptions", "[1, 2, 3]").unwrap();
        cache.write("devIconOptions", "[]").unwrap();

        assert_eq!(cache.read("devIconOptions").unwrap().as_deref(), Some("[]"));
        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, ["devIconOptions.json"]);
    }

    #[test]
    fn memory_cache_overwrites() {
        let cache = MemoryCache::with_entry("k", "one");
        cache.write("k", "two").unwrap();
        assert_eq!(cache.read("k").unwrap().as_deref(), Some("two"));
        assert_eq!(cache.read("other").unwrap(), None);
    }
}
