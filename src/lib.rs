//! cover-renderer: blog cover image composition and export
//!
//! This crate turns a small composition record (title, author, icon, font,
//! theme, background and target platform) into an SVG tree and a PNG file.
//!
//! # Example
//!
//! ```
//! use cover_renderer::{Composer, IconCatalog};
//!
//! let mut composer = Composer::new(IconCatalog::builtins());
//! composer.set_field("title", "Shipping Rust to production");
//! composer.set_field("theme", "modern");
//! composer.set_field("bgColor", "#264653");
//!
//! let tree = composer.render();
//! assert_eq!((tree.size.width, tree.size.height), (1600.0, 840.0));
//! let preview = tree.to_svg();
//! assert!(preview.contains("Shipping Rust"));
//! ```
//!
//! # Catalog and Export
//!
//! The icon catalog starts with the built-in entries and is filled in by a
//! background load. Export fetches fonts and icons before rasterizing:
//!
//! ```no_run
//! use cover_renderer::{Composer, EngineConfig};
//!
//! # async fn run() -> cover_renderer::Result<()> {
//! let engine = EngineConfig::default();
//! let loader = engine.catalog_loader()?;
//! let mut composer = Composer::new(loader.optimistic());
//! let pending = loader.spawn();
//!
//! composer.set_field("title", "Async all the way down");
//! if let Ok(load) = pending.await {
//!     composer.deliver_catalog(load);
//! }
//! composer.set_field("icon", "rust");
//!
//! let path = engine.exporter().export(&composer.render(), &engine.output_dir).await?;
//! println!("wrote {}", path.display());
//! # Ok(())
//! # }
//! ```

mod catalog;
mod color;
mod composer;
mod composition;
mod config;
mod error;
mod export;
mod render;
mod theme;

pub use catalog::{
    CATALOG_CACHE_KEY, CUSTOM_ICON, CatalogCache, CatalogLoad, CatalogLoader, CatalogOrigin,
    CatalogSource, DEFAULT_CATALOG_URL, FileCache, HUGO_FIXIT_ICON, HttpCatalogSource, IconCatalog,
    IconCatalogEntry, MemoryCache, RemoteIcon, RemoteVersions,
};
pub use color::{HexColor, InvalidHexColor};
pub use composer::{Composer, EditOutcome};
pub use composition::{
    Backdrop, CompositionConfig, CompositionMode, Edit, EditRejected, Field, Font, FontSource,
    Platform, Theme, UploadedImage, apply_edit,
};
pub use config::EngineConfig;
pub use error::{Error, Result};
pub use export::{
    AssetLoader, HttpAssetLoader, RasterExporter, encode_png, export_file_name, rasterize,
    slugify,
};
pub use render::{
    AssetKind, CanvasSize, CustomSizeVars, FontFace, HUGO_FIXIT_SVG, ICON_CDN_BASE, IconSource,
    LoadedAssets, MAX_CANVAS_PIXELS, PendingAsset, Rect, VisualTree, icon_asset_url, render,
};
pub use theme::{PALETTES, Palette, Pattern, RandomTheme, random_theme};
