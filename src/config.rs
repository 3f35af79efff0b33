//! Engine settings loaded from an optional JSON file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogLoader, DEFAULT_CATALOG_URL, FileCache, HttpCatalogSource, IconCatalog};
use crate::composition::CompositionConfig;
use crate::error::{Error, Result};
use crate::export::{HttpAssetLoader, RasterExporter};

/// Directory name used under the platform cache dir.
const CACHE_DIR_NAME: &str = "cover-renderer";

/// Where things are fetched from and written to.
///
/// Every field has a default, so an empty object `{}` is a valid file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    pub catalog_url: String,
    /// Overrides the platform cache directory.
    pub cache_dir: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub custom_icon_label: String,
    pub default_author: Option<String>,
    pub load_system_fonts: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            cache_dir: None,
            output_dir: PathBuf::from("."),
            custom_icon_label: "Custom".to_string(),
            default_author: None,
            load_system_fonts: true,
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|err| Error::Config(err.to_string()))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|err| Error::Config(format!("{}: {err}", path.display())))?;
        Self::from_json(&json)
    }

    /// The configured cache directory, else the platform default.
    pub fn cache_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.cache_dir {
            return Ok(dir.clone());
        }
        dirs_next::cache_dir()
            .map(|dir| dir.join(CACHE_DIR_NAME))
            .ok_or_else(|| Error::Config("no cache directory on this platform".to_string()))
    }

    /// Built-in entries with the configured custom label.
    pub fn builtins(&self) -> IconCatalog {
        IconCatalog::builtins_with_label(&self.custom_icon_label)
    }

    /// Startup composition, honoring the configured author.
    pub fn initial_composition(&self) -> CompositionConfig {
        match &self.default_author {
            Some(author) => CompositionConfig::with_author(author),
            None => CompositionConfig::default(),
        }
    }

    /// HTTP catalog loader backed by a file cache.
    pub fn catalog_loader(&self) -> Result<CatalogLoader> {
        let source = HttpCatalogSource::new(&self.catalog_url);
        let cache = FileCache::new(self.cache_dir()?);
        Ok(CatalogLoader::new(source, cache).with_builtins(self.builtins()))
    }

    /// HTTP exporter, with system fonts when enabled.
    pub fn exporter(&self) -> RasterExporter {
        let exporter = RasterExporter::new(Arc::new(HttpAssetLoader::new()));
        if self.load_system_fonts {
            exporter.with_system_fonts()
        } else {
            exporter
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_all_defaults() {
        assert_eq!(EngineConfig::from_json("{}").unwrap(), EngineConfig::default());
    }

    #[test]
    fn camel_case_keys() {
        let config = EngineConfig::from_json(
            r#"{ "catalogUrl": "http://localhost/icons.json", "cacheDir": "/tmp/covers", "loadSystemFonts": false, "defaultAuthor": "Ada" }"#,
        )
        .unwrap();
        assert_eq!(config.catalog_url, "http://localhost/icons.json");
        assert_eq!(config.cache_dir().unwrap(), PathBuf::from("/tmp/covers"));
        assert!(!config.load_system_fonts);
        assert_eq!(config.initial_composition().author(), "Ada");
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(EngineConfig::from_json_file(&path), Err(Error::Config(_))));
        assert!(matches!(
            EngineConfig::from_json_file(dir.path().join("missing.json")),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn custom_label_flows_into_builtins() {
        let config = EngineConfig {
            custom_icon_label: "Upload".to_string(),
            ..EngineConfig::default()
        };
        let builtins = config.builtins();
        assert_eq!(builtins.find("custom").unwrap().label, "Upload");
        assert_eq!(builtins.len(), 2);
    }
}
