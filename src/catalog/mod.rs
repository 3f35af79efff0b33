//! Icon catalog: built-in entries, remote normalization and cache fallback.
//!
//! Loading follows a two-stage protocol:
//!
//! 1. [`IconCatalog::builtins`] is usable immediately, before any network I/O.
//! 2. [`CatalogLoader::load`] settles into a single [`CatalogLoad`]: the remote
//!    list merged after the built-ins, the cached list, or the built-ins alone.
//!
//! The settled result only ever replaces the catalog, so it can be delivered
//! into a [`Composer`](crate::Composer) at any time without touching edits made
//! while the fetch was in flight.
//!
//! # Example
//!
//! ```no_run
//! use cover_renderer::{CatalogLoader, HttpCatalogSource, MemoryCache};
//!
//! # async fn run() {
//! let loader = CatalogLoader::new(HttpCatalogSource::default(), MemoryCache::new());
//! let load = loader.load().await;
//! println!("{} icons ({:?})", load.catalog.len(), load.origin);
//! # }
//! ```

mod cache;
mod source;

pub use cache::{CatalogCache, FileCache, MemoryCache};
pub use source::{
    CatalogSource, DEFAULT_CATALOG_URL, HttpCatalogSource, RemoteIcon, RemoteVersions,
};

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Cache key under which the merged catalog is stored.
pub const CATALOG_CACHE_KEY: &str = "devIconOptions";

/// Value of the entry that stands for a user-uploaded image.
pub const CUSTOM_ICON: &str = "custom";

/// Value of the fixed platform icon.
pub const HUGO_FIXIT_ICON: &str = "hugo-fixit";

// ============================================================================
// IconCatalogEntry
// ============================================================================

/// A selectable icon and its available style variants.
///
/// `opts[0]` is the default style. Built-in entries have no variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct IconCatalogEntry {
    pub label: String,
    pub value: String,
    #[serde(default)]
    pub opts: Vec<String>,
}

impl IconCatalogEntry {
    pub fn new(label: impl Into<String>, value: impl Into<String>, opts: Vec<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            opts,
        }
    }

    /// The placeholder entry for an uploaded image.
    pub fn custom(label: impl Into<String>) -> Self {
        Self::new(label, CUSTOM_ICON, Vec::new())
    }

    /// The fixed icon forced by the `hugo-fixit` platform.
    pub fn hugo_fixit() -> Self {
        Self::new("Hugo FixIt", HUGO_FIXIT_ICON, Vec::new())
    }

    pub fn is_custom(&self) -> bool {
        self.value == CUSTOM_ICON
    }

    pub fn is_hugo_fixit(&self) -> bool {
        self.value == HUGO_FIXIT_ICON
    }

    /// The style selected when this entry is picked.
    pub fn default_style(&self) -> &str {
        self.opts.first().map(String::as_str).unwrap_or("")
    }

    pub fn has_style(&self, style: &str) -> bool {
        self.opts.iter().any(|opt| opt == style)
    }
}

impl From<RemoteIcon> for IconCatalogEntry {
    fn from(icon: RemoteIcon) -> Self {
        let label = icon
            .altnames
            .into_iter()
            .next()
            .unwrap_or_else(|| icon.name.clone());
        Self {
            label,
            value: icon.name,
            opts: icon.versions.svg,
        }
    }
}

// ============================================================================
// IconCatalog
// ============================================================================

/// Ordered list of selectable icons.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IconCatalog {
    entries: Vec<IconCatalogEntry>,
}

impl IconCatalog {
    pub fn from_entries(entries: Vec<IconCatalogEntry>) -> Self {
        Self { entries }
    }

    /// The two entries available before any fetch completes.
    pub fn builtins() -> Self {
        Self::builtins_with_label("Custom")
    }

    /// Built-ins with a caller-chosen label for the upload entry.
    pub fn builtins_with_label(custom_label: impl Into<String>) -> Self {
        Self::from_entries(vec![
            IconCatalogEntry::custom(custom_label),
            IconCatalogEntry::hugo_fixit(),
        ])
    }

    /// Finds an entry by its value.
    pub fn find(&self, value: &str) -> Option<&IconCatalogEntry> {
        self.entries.iter().find(|entry| entry.value == value)
    }

    pub fn entries(&self) -> &[IconCatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &IconCatalogEntry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a IconCatalog {
    type Item = &'a IconCatalogEntry;
    type IntoIter = std::slice::Iter<'a, IconCatalogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Where a settled catalog came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogOrigin {
    /// Fresh remote list merged after the built-ins.
    Remote,
    /// The remote fetch failed and the cached list was used.
    Cache,
    /// Neither remote nor cache were usable.
    BuiltinsOnly,
}

/// The single atomic result of a catalog load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogLoad {
    pub catalog: IconCatalog,
    pub origin: CatalogOrigin,
}

/// Runs the settle stage of the catalog protocol.
///
/// Exactly one fetch attempt is made per call; there is no retry.
#[derive(Clone)]
pub struct CatalogLoader {
    source: Arc<dyn CatalogSource>,
    cache: Arc<dyn CatalogCache>,
    builtins: IconCatalog,
}

impl CatalogLoader {
    pub fn new(
        source: impl CatalogSource + 'static,
        cache: impl CatalogCache + 'static,
    ) -> Self {
        Self {
            source: Arc::new(source),
            cache: Arc::new(cache),
            builtins: IconCatalog::builtins(),
        }
    }

    /// Replaces the built-in entries merged ahead of remote ones.
    pub fn with_builtins(mut self, builtins: IconCatalog) -> Self {
        self.builtins = builtins;
        self
    }

    /// The catalog to show before the load settles.
    pub fn optimistic(&self) -> IconCatalog {
        self.builtins.clone()
    }

    /// Fetches, normalizes and caches the catalog, falling back to the cache
    /// and then to the built-ins.
    pub async fn load(&self) -> CatalogLoad {
        match self.source.fetch().await {
            Ok(remote) => {
                let mut entries = self.builtins.entries.clone();
                entries.extend(remote.into_iter().map(IconCatalogEntry::from));
                let catalog = IconCatalog::from_entries(entries);
                self.persist(&catalog);
                info!(entries = catalog.len(), "loaded icon catalog");
                CatalogLoad {
                    catalog,
                    origin: CatalogOrigin::Remote,
                }
            }
            Err(err) => {
                warn!(error = %err, "failed to fetch icon catalog");
                match self.read_cached() {
                    Some(catalog) => {
                        info!(entries = catalog.len(), "using cached icon catalog");
                        CatalogLoad {
                            catalog,
                            origin: CatalogOrigin::Cache,
                        }
                    }
                    None => CatalogLoad {
                        catalog: self.builtins.clone(),
                        origin: CatalogOrigin::BuiltinsOnly,
                    },
                }
            }
        }
    }

    /// Runs [`load`](Self::load) as a background task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(self) -> tokio::task::JoinHandle<CatalogLoad> {
        tokio::spawn(async move { self.load().await })
    }

    fn persist(&self, catalog: &IconCatalog) {
        let json = match serde_json::to_string(catalog) {
            Ok(json) => json,
            Err(err) => {
                warn!(error = %err, "failed to serialize icon catalog");
                return;
            }
        };
        if let Err(err) = self.cache.write(CATALOG_CACHE_KEY, &json) {
            warn!(error = %err, "failed to cache icon catalog");
        }
    }

    fn read_cached(&self) -> Option<IconCatalog> {
        let json = match self.cache.read(CATALOG_CACHE_KEY) {
            Ok(Some(json)) => json,
            Ok(None) => return None,
            Err(err) => {
                debug!(error = %err, "icon catalog cache unreadable");
                return None;
            }
        };
        match serde_json::from_str(&json) {
            Ok(catalog) => Some(catalog),
            Err(err) => {
                debug!(error = %err, "icon catalog cache is corrupt");
                None
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use async_trait::async_trait;

    struct FixedSource(Vec<RemoteIcon>);

    #[async_trait]
    impl CatalogSource for FixedSource {
        async fn fetch(&self) -> Result<Vec<RemoteIcon>> {
            Ok(self.0.clone())
        }
    }

    struct OfflineSource;

    #[async_trait]
    impl CatalogSource for OfflineSource {
        async fn fetch(&self) -> Result<Vec<RemoteIcon>> {
            Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "offline",
            )))
        }
    }

    fn remote(name: &str, altnames: &[&str], svg: &[&str]) -> RemoteIcon {
        RemoteIcon {
            name: name.to_string(),
            altnames: altnames.iter().map(|s| s.to_string()).collect(),
            versions: RemoteVersions {
                svg: svg.iter().map(|s| s.to_string()).collect(),
            },
        }
    }

    fn sample_remote() -> Vec<RemoteIcon> {
        vec![
            remote("react", &["reactjs"], &["original", "original-wordmark"]),
            remote("rust", &[], &["original", "plain"]),
            remote("go", &["golang"], &["original-wordmark"]),
        ]
    }

    #[test]
    fn builtins_are_custom_then_fixed_platform() {
        let catalog = IconCatalog::builtins();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.entries()[0].is_custom());
        assert!(catalog.entries()[1].is_hugo_fixit());
        assert!(catalog.iter().all(|entry| entry.opts.is_empty()));
    }

    #[test]
    fn normalization_prefers_first_altname() {
        let entry = IconCatalogEntry::from(remote("react", &["reactjs", "jsx"], &["original"]));
        assert_eq!(entry.label, "reactjs");
        assert_eq!(entry.value, "react");
        assert_eq!(entry.opts, vec!["original"]);

        let entry = IconCatalogEntry::from(remote("rust", &[], &["plain"]));
        assert_eq!(entry.label, "rust");
    }

    #[test]
    fn entry_json_shape() {
        let entry = IconCatalogEntry::new("reactjs", "react", vec!["original".into()]);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "label": "reactjs", "value": "react", "opts": ["original"] })
        );
    }

    #[tokio::test]
    async fn success_merges_builtins_and_writes_cache() {
        let cache = Arc::new(MemoryCache::new());
        let loader = CatalogLoader {
            source: Arc::new(FixedSource(sample_remote())),
            cache: cache.clone(),
            builtins: IconCatalog::builtins(),
        };

        let load = loader.load().await;

        assert_eq!(load.origin, CatalogOrigin::Remote);
        assert_eq!(load.catalog.len(), 2 + 3);
        assert!(load.catalog.entries()[0].is_custom());
        assert_eq!(load.catalog.entries()[2].value, "react");

        let cached = cache.read(CATALOG_CACHE_KEY).unwrap().unwrap();
        let restored: IconCatalog = serde_json::from_str(&cached).unwrap();
        assert_eq!(restored, load.catalog);
    }

    #[tokio::test]
    async fn failure_falls_back_to_cached_list() {
        let cached = IconCatalog::from_entries(vec![
            IconCatalogEntry::custom("Custom"),
            IconCatalogEntry::hugo_fixit(),
            IconCatalogEntry::new("golang", "go", vec!["original".into()]),
        ]);
        let cache = MemoryCache::with_entry(
            CATALOG_CACHE_KEY,
            serde_json::to_string(&cached).unwrap(),
        );
        let loader = CatalogLoader::new(OfflineSource, cache);

        let load = loader.load().await;

        assert_eq!(load.origin, CatalogOrigin::Cache);
        assert_eq!(load.catalog, cached);
    }

    #[tokio::test]
    async fn failure_without_cache_keeps_builtins() {
        let loader = CatalogLoader::new(OfflineSource, MemoryCache::new());
        let load = loader.load().await;

        assert_eq!(load.origin, CatalogOrigin::BuiltinsOnly);
        assert_eq!(load.catalog.len(), 2);
    }

    #[tokio::test]
    async fn corrupt_cache_counts_as_miss() {
        let cache = MemoryCache::with_entry(CATALOG_CACHE_KEY, "{not json");
        let loader = CatalogLoader::new(OfflineSource, cache);
        let load = loader.load().await;

        assert_eq!(load.origin, CatalogOrigin::BuiltinsOnly);
        assert_eq!(load.catalog, IconCatalog::builtins());
    }

    #[tokio::test]
    async fn spawned_load_settles() {
        let loader = CatalogLoader::new(FixedSource(sample_remote()), MemoryCache::new())
            .with_builtins(IconCatalog::builtins_with_label("Upload"));
        assert_eq!(loader.optimistic().entries()[0].label, "Upload");

        let load = loader.spawn().await.unwrap();
        assert_eq!(load.catalog.len(), 5);
        assert_eq!(load.catalog.entries()[0].label, "Upload");
    }
}
