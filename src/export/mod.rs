//! Turning a [`VisualTree`] into a PNG file.
//!
//! Export waits for every asset the tree references, feeds fetched fonts to
//! the font database, rasterizes the self-contained SVG and writes the result
//! atomically. A failure at any step leaves no file behind.

mod assets;
mod fonts;
mod raster;

pub use assets::{AssetLoader, HttpAssetLoader};
pub use raster::{encode_png, rasterize};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::future::try_join_all;
use image::RgbaImage;
use resvg::usvg::{Options, fontdb};

use crate::composition::Platform;
use crate::error::Result;
use crate::render::{AssetKind, LoadedAssets, VisualTree};

/// Rasterizes visual trees, fetching their assets through an [`AssetLoader`].
#[derive(Clone)]
pub struct RasterExporter {
    loader: Arc<dyn AssetLoader>,
    fontdb: Arc<fontdb::Database>,
}

impl RasterExporter {
    /// An exporter with an empty font database.
    pub fn new(loader: Arc<dyn AssetLoader>) -> Self {
        Self {
            loader,
            fontdb: Arc::new(fontdb::Database::new()),
        }
    }

    /// Adds the fonts installed on this machine as fallbacks.
    pub fn with_system_fonts(mut self) -> Self {
        Arc::make_mut(&mut self.fontdb).load_system_fonts();
        self
    }

    /// Adds a font file that every export can use.
    pub fn with_font_data(mut self, data: Vec<u8>) -> Self {
        Arc::make_mut(&mut self.fontdb).load_font_data(data);
        self
    }

    /// Fetches every pending asset of `tree` concurrently.
    pub async fn load_assets(&self, tree: &VisualTree) -> Result<LoadedAssets> {
        let pending = tree.pending_assets();
        let fetches = pending.iter().map(|asset| async move {
            let bytes = self.loader.fetch(&asset.url).await?;
            Ok::<_, crate::Error>((asset.url.clone(), bytes))
        });
        let loaded: LoadedAssets = try_join_all(fetches).await?.into_iter().collect();
        tracing::debug!(count = loaded.len(), "assets loaded");
        Ok(loaded)
    }

    /// Parser options with the fetched web font of `tree` registered under
    /// its stylesheet family.
    ///
    /// A font that cannot be parsed is logged and skipped; text then falls
    /// back through the family stack.
    pub(crate) fn render_options(&self, tree: &VisualTree, assets: &LoadedAssets) -> Options<'static> {
        let mut options = Options {
            fontdb: self.fontdb.clone(),
            ..Options::default()
        };
        let Some(face) = &tree.font_face else {
            return options;
        };
        for asset in tree.pending_assets() {
            if asset.kind != AssetKind::Font {
                continue;
            }
            let Some(bytes) = assets.get(&asset.url) else {
                continue;
            };
            let db = Arc::make_mut(&mut options.fontdb);
            match fonts::register_web_font(db, &asset.url, bytes, face.family) {
                Ok(faces) => tracing::debug!(family = face.family, faces, "web font registered"),
                Err(err) => tracing::warn!(error = %err, "web font skipped"),
            }
        }
        options
    }

    /// Renders `tree` to a bitmap once all of its assets are available.
    pub async fn capture(&self, tree: &VisualTree) -> Result<RgbaImage> {
        let assets = self.load_assets(tree).await?;
        let svg = tree.to_svg_with_assets(&assets)?;
        let options = self.render_options(tree, &assets);
        rasterize(&svg, tree.size, &options)
    }

    /// Captures `tree` and writes it as PNG into `dir`, returning the file path.
    pub async fn export(&self, tree: &VisualTree, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let image = self.capture(tree).await?;
        let png = encode_png(image)?;

        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let file_name = export_file_name(&tree.title, tree.platform);
        let path = dir.join(&file_name);
        let temp = dir.join(format!(".{file_name}.tmp"));

        if let Err(err) = std::fs::write(&temp, &png).and_then(|()| std::fs::rename(&temp, &path)) {
            let _ = std::fs::remove_file(&temp);
            return Err(err.into());
        }

        tracing::info!(path = %path.display(), bytes = png.len(), "cover exported");
        Ok(path)
    }
}

/// `{slug(title)}-{platform}.png`
pub fn export_file_name(title: &str, platform: Platform) -> String {
    format!("{}-{}.png", slugify(title), platform_slug(platform))
}

/// Lowercases `title` and joins its alphanumeric runs with dashes.
pub fn slugify(title: &str) -> String {
    let slug = title
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() {
        "cover".to_string()
    } else {
        slug
    }
}

fn platform_slug(platform: Platform) -> String {
    platform.as_str().replace(':', "x")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composition::{CompositionConfig, Edit, Font, apply_edit};
    use crate::render::{HUGO_FIXIT_SVG, icon_asset_url, render};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Serves assets from memory and records what was requested.
    #[derive(Default)]
    struct StubLoader {
        assets: HashMap<String, Vec<u8>>,
        requested: Mutex<Vec<String>>,
    }

    impl StubLoader {
        fn with(mut self, url: impl Into<String>, bytes: &[u8]) -> Self {
            self.assets.insert(url.into(), bytes.to_vec());
            self
        }
    }

    #[async_trait]
    impl AssetLoader for StubLoader {
        async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
            self.requested.lock().unwrap().push(url.to_string());
            self.assets
                .get(url)
                .cloned()
                .ok_or_else(|| crate::Error::AssetLoad {
                    url: url.to_string(),
                    reason: "not found".to_string(),
                })
        }
    }

    const VIRGIL_URL: &str = "https://virgil.excalidraw.com/Virgil.woff2";
    const OPEN_SANS_WOFF2: &[u8] = include_bytes!("../../assets/test-fonts/OpenSans-Regular.woff2");
    const TUFFY_TTF: &[u8] = include_bytes!("../../assets/test-fonts/Tuffy.ttf");

    fn has_family(options: &Options<'_>, family: &str) -> bool {
        options
            .fontdb
            .faces()
            .any(|face| face.families.iter().any(|(name, _)| name == family))
    }

    fn default_assets() -> StubLoader {
        StubLoader::default()
            .with(VIRGIL_URL, OPEN_SANS_WOFF2)
            .with(icon_asset_url("react", "original"), HUGO_FIXIT_SVG.as_bytes())
    }

    #[test]
    fn file_names_are_slugged() {
        assert_eq!(
            export_file_name("A begineers guide to frontend development", Platform::Hashnode),
            "a-begineers-guide-to-frontend-development-hashnode.png"
        );
        assert_eq!(export_file_name("  C++ & Rust!  ", Platform::Size16x9), "c-rust-size-16x9.png");
        assert_eq!(export_file_name("???", Platform::Dev), "cover-dev.png");
    }

    #[tokio::test]
    async fn capture_waits_for_all_assets() {
        let loader = Arc::new(default_assets());
        let exporter = RasterExporter::new(loader.clone());
        let tree = render(&CompositionConfig::default());

        let image = exporter.capture(&tree).await.unwrap();
        assert_eq!(image.dimensions(), (1600, 840));

        let mut requested = loader.requested.lock().unwrap().clone();
        requested.sort();
        assert_eq!(requested.len(), 2);
        assert!(requested.contains(&icon_asset_url("react", "original")));
    }

    #[tokio::test]
    async fn fetched_fonts_reach_the_database() {
        let exporter = RasterExporter::new(Arc::new(
            default_assets().with(Font::Mmt.network_source().unwrap().url, TUFFY_TTF),
        ));

        let tree = render(&CompositionConfig::default());
        let assets = exporter.load_assets(&tree).await.unwrap();
        let options = exporter.render_options(&tree, &assets);
        assert!(has_family(&options, "Virgil"));

        let mmt = apply_edit(CompositionConfig::default(), Edit::Font(Font::Mmt)).unwrap();
        let tree = render(&mmt);
        let assets = exporter.load_assets(&tree).await.unwrap();
        let options = exporter.render_options(&tree, &assets);
        assert!(has_family(&options, "MMT"));
        assert!(!has_family(&options, "Virgil"));
    }

    #[tokio::test]
    async fn unreadable_font_falls_back() {
        let loader = StubLoader::default()
            .with(VIRGIL_URL, b"not a real font")
            .with(icon_asset_url("react", "original"), HUGO_FIXIT_SVG.as_bytes());
        let exporter = RasterExporter::new(Arc::new(loader));
        let tree = render(&CompositionConfig::default());

        let image = exporter.capture(&tree).await.unwrap();
        assert_eq!(image.dimensions(), (1600, 840));
    }

    #[tokio::test]
    async fn export_writes_png_file() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = RasterExporter::new(Arc::new(default_assets()));
        let tree = render(&CompositionConfig::default());

        let path = exporter.export(&tree, dir.path()).await.unwrap();
        assert_eq!(
            path.file_name().unwrap(),
            "a-begineers-guide-to-frontend-development-hashnode.png"
        );
        let written = image::open(&path).unwrap();
        assert_eq!((written.width(), written.height()), (1600, 840));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn failed_asset_produces_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = RasterExporter::new(Arc::new(StubLoader::default()));
        let tree = render(&CompositionConfig::default());

        let err = exporter.export(&tree, dir.path()).await.unwrap_err();
        assert!(matches!(err, crate::Error::AssetLoad { .. }));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn zero_ratio_is_invalid_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = apply_edit(CompositionConfig::default(), Edit::Platform(Platform::Custom)).unwrap();
        config = apply_edit(config, Edit::CustomPlatformY(0.0)).unwrap();
        let tree = render(&config);

        let err = RasterExporter::new(Arc::new(default_assets()))
            .export(&tree, dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, crate::Error::InvalidDimensions { .. }));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn oversized_custom_canvas_is_refused() {
        let mut config = apply_edit(CompositionConfig::default(), Edit::Platform(Platform::Custom)).unwrap();
        for edit in [
            Edit::CustomPlatformWidth(45000.0),
            Edit::CustomPlatformX(1.0),
            Edit::CustomPlatformY(1.0),
        ] {
            config = apply_edit(config, edit).unwrap();
        }
        let tree = render(&config);
        assert_eq!((tree.size.width, tree.size.height), (45000.0, 45000.0));

        let err = RasterExporter::new(Arc::new(default_assets()))
            .capture(&tree)
            .await
            .unwrap_err();
        assert!(matches!(err, crate::Error::InvalidDimensions { .. }));
    }

    #[tokio::test]
    async fn hugo_fixit_needs_only_the_font() {
        let loader = Arc::new(
            StubLoader::default().with(VIRGIL_URL, OPEN_SANS_WOFF2),
        );
        let config = apply_edit(CompositionConfig::default(), Edit::Platform(Platform::HugoFixit)).unwrap();
        let image = RasterExporter::new(loader)
            .capture(&render(&config))
            .await
            .unwrap();
        assert_eq!(image.dimensions(), (1200, 630));
    }
}
