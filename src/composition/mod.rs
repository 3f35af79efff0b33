//! The composition record and its tagged rendering mode.
//!
//! A [`CompositionConfig`] is only changed through [`apply_edit`], which keeps
//! the icon and platform coupling rules in one place.
//!
//! # JSON Format
//!
//! Configs serialize with camelCase keys; the uploaded image and the
//! randomizer's border color are session-only and never written:
//!
//! ```json
//! {
//!   "title": "A begineers guide to frontend development",
//!   "author": "PangXf",
//!   "icon": { "label": "reactjs", "value": "react", "opts": ["original", "original-wordmark"] },
//!   "iconStyle": "original",
//!   "font": "font-Virgil",
//!   "theme": "background",
//!   "bgColor": "#949ee5",
//!   "pattern": "none",
//!   "platform": "hashnode",
//!   "customPlatformWidth": 1024.0,
//!   "customPlatformX": 16.0,
//!   "customPlatformY": 9.0
//! }
//! ```

mod edit;
mod options;

pub use edit::{Edit, EditRejected, Field, apply_edit};
pub use options::{Font, FontSource, Platform, Theme};

use std::path::Path;
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::catalog::IconCatalogEntry;
use crate::color::HexColor;
use crate::error::Result;
use crate::theme::Pattern;

/// How much darker than the background a derived border is.
const DERIVED_BORDER_DARKEN: f32 = 0.15;

// ============================================================================
// UploadedImage
// ============================================================================

/// A user-supplied icon image held in memory.
///
/// The bytes are never uploaded anywhere; they are embedded into the rendered
/// tree as a data URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    bytes: Arc<[u8]>,
    mime: &'static str,
}

impl UploadedImage {
    /// Wraps raw image bytes, detecting PNG, JPEG, GIF, WebP or SVG.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self> {
        let bytes: Vec<u8> = bytes.into();
        let mime = sniff_mime(&bytes).ok_or_else(|| crate::Error::AssetLoad {
            url: "uploaded image".to_string(),
            reason: "unsupported image format".to_string(),
        })?;
        Ok(Self {
            bytes: bytes.into(),
            mime,
        })
    }

    /// Reads and wraps an image file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_bytes(std::fs::read(path)?)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime(&self) -> &'static str {
        self.mime
    }

    /// The image as a `data:` URI.
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }
}

pub(crate) fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    if let Ok(format) = image::guess_format(bytes) {
        return match format {
            image::ImageFormat::Png => Some("image/png"),
            image::ImageFormat::Jpeg => Some("image/jpeg"),
            image::ImageFormat::Gif => Some("image/gif"),
            image::ImageFormat::WebP => Some("image/webp"),
            _ => None,
        };
    }
    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(512)]);
    let head = head.trim_start();
    if head.starts_with("<svg") || (head.starts_with("<?xml") && head.contains("<svg")) {
        Some("image/svg+xml")
    } else {
        None
    }
}

// ============================================================================
// CompositionMode
// ============================================================================

/// Resolved background inputs of a decorated template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backdrop {
    pub bg_color: HexColor,
    pub border_color: HexColor,
    pub pattern: Pattern,
}

/// Which background inputs apply to the current theme.
///
/// The flat mode carries no color or pattern, so a renderer matching on it
/// cannot read fields that do not apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositionMode {
    Flat,
    Decorated { theme: Theme, backdrop: Backdrop },
}

// ============================================================================
// CompositionConfig
// ============================================================================

/// Everything that describes one cover image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct CompositionConfig {
    pub(crate) title: String,
    pub(crate) author: String,
    pub(crate) icon: IconCatalogEntry,
    pub(crate) icon_style: String,
    #[serde(skip)]
    #[cfg_attr(feature = "jsonschema", schemars(skip))]
    pub(crate) custom_icon: Option<UploadedImage>,
    pub(crate) font: Font,
    pub(crate) theme: Theme,
    pub(crate) bg_color: HexColor,
    #[serde(skip)]
    #[cfg_attr(feature = "jsonschema", schemars(skip))]
    pub(crate) border_color: Option<HexColor>,
    pub(crate) pattern: Pattern,
    pub(crate) platform: Platform,
    pub(crate) custom_platform_width: f32,
    pub(crate) custom_platform_x: f32,
    pub(crate) custom_platform_y: f32,
}

impl Default for CompositionConfig {
    fn default() -> Self {
        Self {
            title: "A begineers guide to frontend development".to_string(),
            author: "PangXf".to_string(),
            icon: IconCatalogEntry::new(
                "reactjs",
                "react",
                vec!["original".to_string(), "original-wordmark".to_string()],
            ),
            icon_style: "original".to_string(),
            custom_icon: None,
            font: Font::Virgil,
            theme: Theme::Background,
            bg_color: HexColor::rgb(0x94, 0x9e, 0xe5),
            border_color: None,
            pattern: Pattern::None,
            platform: Platform::Hashnode,
            custom_platform_width: 1024.0,
            custom_platform_x: 16.0,
            custom_platform_y: 9.0,
        }
    }
}

impl CompositionConfig {
    /// Defaults with a different author, e.g. from configuration.
    pub fn with_author(author: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            ..Self::default()
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn icon(&self) -> &IconCatalogEntry {
        &self.icon
    }

    pub fn icon_style(&self) -> &str {
        &self.icon_style
    }

    pub fn custom_icon(&self) -> Option<&UploadedImage> {
        self.custom_icon.as_ref()
    }

    pub fn font(&self) -> Font {
        self.font
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn bg_color(&self) -> HexColor {
        self.bg_color
    }

    /// Border color set by the randomizer, if any.
    pub fn border_color(&self) -> Option<HexColor> {
        self.border_color
    }

    pub fn pattern(&self) -> Pattern {
        self.pattern
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn custom_platform_width(&self) -> f32 {
        self.custom_platform_width
    }

    pub fn custom_platform_x(&self) -> f32 {
        self.custom_platform_x
    }

    pub fn custom_platform_y(&self) -> f32 {
        self.custom_platform_y
    }

    /// The theme as a tagged variant carrying only the inputs it uses.
    pub fn mode(&self) -> CompositionMode {
        if self.theme.is_flat() {
            return CompositionMode::Flat;
        }
        CompositionMode::Decorated {
            theme: self.theme,
            backdrop: Backdrop {
                bg_color: self.bg_color,
                border_color: self
                    .border_color
                    .unwrap_or_else(|| self.bg_color.darken(DERIVED_BORDER_DARKEN)),
                pattern: self.pattern,
            },
        }
    }

    /// Serializes the config to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serializes the config to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserializes a config, repairing an icon style that is not offered by
    /// the stored icon.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut config: Self = serde_json::from_str(json)?;
        if !config.icon.opts.is_empty() && !config.icon.has_style(&config.icon_style) {
            config.icon_style = config.icon.default_style().to_string();
        }
        if config.icon.opts.is_empty() {
            config.icon_style.clear();
        }
        Ok(config)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0, 0, 0, 0];

    #[test]
    fn defaults_match_startup_state() {
        let config = CompositionConfig::default();
        assert_eq!(config.title(), "A begineers guide to frontend development");
        assert_eq!(config.platform(), Platform::Hashnode);
        assert_eq!(config.icon().value, "react");
        assert_eq!(config.icon_style(), "original");
        assert!(config.custom_platform_width() >= 500.0);
        assert!(config.custom_platform_x() >= 1.0 && config.custom_platform_y() >= 1.0);
        assert_eq!(config.mode(), CompositionMode::Flat);
    }

    #[test]
    fn decorated_mode_derives_border_from_background() {
        let config = CompositionConfig {
            theme: Theme::Outline,
            pattern: Pattern::Dots,
            ..CompositionConfig::default()
        };
        let CompositionMode::Decorated { theme, backdrop } = config.mode() else {
            panic!("outline is a decorated theme");
        };
        assert_eq!(theme, Theme::Outline);
        assert_eq!(backdrop.pattern, Pattern::Dots);
        assert_eq!(backdrop.border_color, config.bg_color().darken(0.15));
    }

    #[test]
    fn json_roundtrip_skips_session_fields() {
        let config = CompositionConfig {
            theme: Theme::Modern,
            border_color: Some(HexColor::rgb(1, 1, 1)),
            custom_icon: Some(UploadedImage::from_bytes(PNG_MAGIC.to_vec()).unwrap()),
            ..CompositionConfig::default()
        };

        let json = config.to_json().unwrap();
        assert!(json.contains("\"iconStyle\""));
        assert!(json.contains("\"customPlatformWidth\""));
        assert!(!json.contains("customIcon"));
        assert!(!json.contains("borderColor"));

        let restored = CompositionConfig::from_json(&json).unwrap();
        assert_eq!(restored.theme(), Theme::Modern);
        assert!(restored.custom_icon().is_none());
        assert!(restored.border_color().is_none());
    }

    #[test]
    fn from_json_repairs_icon_style() {
        let json = r#"{ "icon": { "label": "rust", "value": "rust", "opts": ["plain"] }, "iconStyle": "original" }"#;
        let config = CompositionConfig::from_json(json).unwrap();
        assert_eq!(config.icon_style(), "plain");
        assert_eq!(config.title(), CompositionConfig::default().title());
    }

    #[test]
    fn uploaded_image_detects_format() {
        let png = UploadedImage::from_bytes(PNG_MAGIC.to_vec()).unwrap();
        assert_eq!(png.mime(), "image/png");
        assert!(png.data_uri().starts_with("data:image/png;base64,"));

        let svg = UploadedImage::from_bytes(b"<svg xmlns=\"http://www.w3.org/2000/svg\"/>".to_vec())
            .unwrap();
        assert_eq!(svg.mime(), "image/svg+xml");

        assert!(UploadedImage::from_bytes(b"plain text".to_vec()).is_err());
    }
}
