//! Pure mapping from a [`CompositionConfig`] to a renderable tree.
//!
//! [`render`] never touches the network. The returned [`VisualTree`] knows
//! which remote assets it references ([`VisualTree::pending_assets`]) so the
//! exporter can fetch them and produce a self-contained SVG with
//! [`VisualTree::to_svg_with_assets`].

mod geometry;
mod pattern;
mod templates;

pub use geometry::{CanvasSize, MAX_CANVAS_PIXELS, Rect};

use std::collections::HashMap;
use std::fmt::Write as _;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::composition::{
    CompositionConfig, CompositionMode, Font, FontSource, Platform, UploadedImage, sniff_mime,
};
use crate::error::{Error, Result};

use templates::{Layout, compose, escape_xml};

/// Base URL icon images are served from.
pub const ICON_CDN_BASE: &str = "https://cdn.jsdelivr.net/gh/devicons/devicon@latest/icons";

/// Logo shipped with the crate for the Hugo FixIt platform.
pub const HUGO_FIXIT_SVG: &str = include_str!("../../assets/fixit.svg");

/// CDN address of an icon in a given style.
pub fn icon_asset_url(value: &str, style: &str) -> String {
    format!("{ICON_CDN_BASE}/{value}/{value}-{style}.svg")
}

// ============================================================================
// Tree parts
// ============================================================================

/// Where the icon image comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconSource {
    /// A user upload, embedded inline.
    Uploaded(UploadedImage),
    /// SVG markup compiled into the crate.
    Bundled(&'static str),
    /// A CDN image that must be fetched before export.
    Remote(String),
}

/// An `@font-face` rule for a network font.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontFace {
    pub family: &'static str,
    pub url: &'static str,
    pub format: &'static str,
}

impl From<FontSource> for FontFace {
    fn from(source: FontSource) -> Self {
        Self {
            family: source.family,
            url: source.url,
            format: source.format,
        }
    }
}

impl FontFace {
    pub fn css(&self) -> String {
        format!(
            "@font-face {{ font-family: '{}'; src: url('{}') format('{}'); font-display: swap; }}",
            self.family, self.url, self.format
        )
    }
}

/// Size parameters of the custom platform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CustomSizeVars {
    pub width: f32,
    pub x: f32,
    pub y: f32,
}

impl CustomSizeVars {
    /// `width * y / x`. Not finite when `x` is zero.
    pub fn height(&self) -> f32 {
        self.width * (self.y / self.x)
    }

    pub fn css(&self) -> String {
        format!(
            ".custom {{ --cv-width: {}px; --cv-platform-x: {}; --cv-platform-y: {};}}",
            self.width, self.x, self.y
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Font,
    Icon,
}

/// A network resource the tree references.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PendingAsset {
    pub kind: AssetKind,
    pub url: String,
}

/// Fetched asset bytes keyed by URL.
#[derive(Debug, Clone, Default)]
pub struct LoadedAssets {
    bytes: HashMap<String, Vec<u8>>,
}

impl LoadedAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, url: impl Into<String>, bytes: Vec<u8>) {
        self.bytes.insert(url.into(), bytes);
    }

    pub fn get(&self, url: &str) -> Option<&[u8]> {
        self.bytes.get(url).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    fn data_uri(&self, url: &str) -> Result<String> {
        let bytes = self.get(url).ok_or_else(|| Error::AssetLoad {
            url: url.to_string(),
            reason: "asset was not loaded".to_string(),
        })?;
        let mime = sniff_mime(bytes).unwrap_or("image/svg+xml");
        Ok(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
    }
}

impl FromIterator<(String, Vec<u8>)> for LoadedAssets {
    fn from_iter<I: IntoIterator<Item = (String, Vec<u8>)>>(iter: I) -> Self {
        Self {
            bytes: iter.into_iter().collect(),
        }
    }
}

// ============================================================================
// VisualTree
// ============================================================================

/// Everything needed to draw one cover.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualTree {
    pub size: CanvasSize,
    pub platform: Platform,
    pub custom_vars: Option<CustomSizeVars>,
    pub font: Font,
    pub font_face: Option<FontFace>,
    pub icon: Option<IconSource>,
    pub title: String,
    pub author: String,
    pub mode: CompositionMode,
}

/// Builds the visual tree for `config`.
pub fn render(config: &CompositionConfig) -> VisualTree {
    let icon = config.icon();
    let icon_source = if let Some(upload) = config.custom_icon() {
        Some(IconSource::Uploaded(upload.clone()))
    } else if icon.is_hugo_fixit() {
        Some(IconSource::Bundled(HUGO_FIXIT_SVG))
    } else if icon.is_custom() || icon.value.is_empty() {
        None
    } else {
        let style = match config.icon_style() {
            "" => icon.default_style(),
            style => style,
        };
        Some(IconSource::Remote(icon_asset_url(&icon.value, style)))
    };

    let platform = config.platform();
    let (size, custom_vars) = match platform.preset_size() {
        Some((width, height)) => (CanvasSize::new(width as f32, height as f32), None),
        None => {
            let vars = CustomSizeVars {
                width: config.custom_platform_width(),
                x: config.custom_platform_x(),
                y: config.custom_platform_y(),
            };
            (CanvasSize::new(vars.width, vars.height()), Some(vars))
        }
    };

    VisualTree {
        size,
        platform,
        custom_vars,
        font: config.font(),
        font_face: config.font().network_source().map(FontFace::from),
        icon: icon_source,
        title: config.title().to_string(),
        author: config.author().to_string(),
        mode: config.mode(),
    }
}

impl VisualTree {
    /// Preview SVG. Remote icons stay as links and the stylesheet is embedded.
    pub fn to_svg(&self) -> String {
        let href = match &self.icon {
            Some(IconSource::Remote(url)) => Some(url.clone()),
            Some(other) => Some(inline_href(other)),
            None => None,
        };
        let stylesheet = self.stylesheet();
        let style = if stylesheet.is_empty() {
            String::new()
        } else {
            format!("<style><![CDATA[{stylesheet}]]></style>")
        };
        self.document(href.as_deref(), &style)
    }

    /// Self-contained SVG with every remote asset inlined from `assets`.
    ///
    /// Fails with [`Error::AssetLoad`] when a referenced icon is missing.
    pub fn to_svg_with_assets(&self, assets: &LoadedAssets) -> Result<String> {
        let href = match &self.icon {
            Some(IconSource::Remote(url)) => Some(assets.data_uri(url)?),
            Some(other) => Some(inline_href(other)),
            None => None,
        };
        Ok(self.document(href.as_deref(), ""))
    }

    /// Font-face and custom-size CSS, whitespace-collapsed.
    pub fn stylesheet(&self) -> String {
        let rules: Vec<String> = self
            .font_face
            .iter()
            .map(FontFace::css)
            .chain(self.custom_vars.iter().map(CustomSizeVars::css))
            .collect();
        collapse_whitespace(&rules.join(" "))
    }

    /// Network assets that must be fetched before export.
    pub fn pending_assets(&self) -> Vec<PendingAsset> {
        let mut pending = Vec::new();
        if let Some(face) = &self.font_face {
            pending.push(PendingAsset {
                kind: AssetKind::Font,
                url: face.url.to_string(),
            });
        }
        if let Some(IconSource::Remote(url)) = &self.icon {
            pending.push(PendingAsset {
                kind: AssetKind::Icon,
                url: url.clone(),
            });
        }
        pending
    }

    fn document(&self, icon_href: Option<&str>, style: &str) -> String {
        let layout = Layout {
            size: self.size,
            title: &self.title,
            author: &self.author,
            icon_href,
            mode: self.mode,
        };
        let mut svg = String::new();
        let _ = write!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{w}" height="{h}" viewBox="0 0 {w} {h}" class="{class}" font-family="{font}">"#,
            w = self.size.width,
            h = self.size.height,
            class = escape_xml(self.platform.as_str()),
            font = self.font.family_stack(),
        );
        svg.push_str(style);
        svg.push_str(&compose(&layout));
        svg.push_str("</svg>");
        svg
    }
}

fn inline_href(source: &IconSource) -> String {
    match source {
        IconSource::Uploaded(image) => image.data_uri(),
        IconSource::Bundled(svg) => {
            format!("data:image/svg+xml;base64,{}", STANDARD.encode(svg))
        }
        IconSource::Remote(url) => url.clone(),
    }
}

fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}
