//! Enumerated choices: fonts, themes and platform presets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ============================================================================
// Font
// ============================================================================

/// A web font that must be fetched before text can render with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontSource {
    pub family: &'static str,
    pub url: &'static str,
    pub format: &'static str,
}

/// Font used for the title and author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum Font {
    #[default]
    #[serde(rename = "font-Virgil")]
    Virgil,
    #[serde(rename = "font-MMT")]
    Mmt,
    #[serde(rename = "font-Anek")]
    Anek,
    #[serde(rename = "font-Inter")]
    Inter,
    #[serde(rename = "font-mono")]
    Mono,
    #[serde(rename = "font-Poppins")]
    Poppins,
    #[serde(rename = "font-sans")]
    Sans,
    #[serde(rename = "font-serif")]
    Serif,
}

impl Font {
    pub const ALL: [Font; 8] = [
        Font::Virgil,
        Font::Mmt,
        Font::Anek,
        Font::Inter,
        Font::Mono,
        Font::Poppins,
        Font::Sans,
        Font::Serif,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Font::Virgil => "font-Virgil",
            Font::Mmt => "font-MMT",
            Font::Anek => "font-Anek",
            Font::Inter => "font-Inter",
            Font::Mono => "font-mono",
            Font::Poppins => "font-Poppins",
            Font::Sans => "font-sans",
            Font::Serif => "font-serif",
        }
    }

    /// CSS font-family list, most specific first.
    pub fn family_stack(&self) -> &'static str {
        match self {
            Font::Virgil => "Virgil, 'Comic Sans MS', cursive",
            Font::Mmt => "MMT, 'Comic Sans MS', cursive",
            Font::Anek => "'Anek Latin', sans-serif",
            Font::Inter => "Inter, sans-serif",
            Font::Mono => "'DejaVu Sans Mono', Menlo, monospace",
            Font::Poppins => "Poppins, sans-serif",
            Font::Sans => "'DejaVu Sans', Arial, sans-serif",
            Font::Serif => "'DejaVu Serif', Georgia, serif",
        }
    }

    /// The font file to fetch, for fonts that are not assumed installed.
    pub fn network_source(&self) -> Option<FontSource> {
        match self {
            Font::Virgil => Some(FontSource {
                family: "Virgil",
                url: "https://virgil.excalidraw.com/Virgil.woff2",
                format: "woff2",
            }),
            Font::Mmt => Some(FontSource {
                family: "MMT",
                url: "https://lruihao.cn/fonts/mmt_1.5.ttf",
                format: "truetype",
            }),
            _ => None,
        }
    }
}

impl fmt::Display for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Font {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Font::ALL
            .iter()
            .copied()
            .find(|font| font.id() == s)
            .ok_or_else(|| format!("unknown font: {s}"))
    }
}

// ============================================================================
// Theme
// ============================================================================

/// Layout template. `Background` is the flat mode that ignores color and pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Background,
    Basic,
    Modern,
    Stylish,
    Outline,
    Preview,
    Mobile,
}

impl Theme {
    pub const ALL: [Theme; 7] = [
        Theme::Background,
        Theme::Basic,
        Theme::Modern,
        Theme::Stylish,
        Theme::Outline,
        Theme::Preview,
        Theme::Mobile,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Background => "background",
            Theme::Basic => "basic",
            Theme::Modern => "modern",
            Theme::Stylish => "stylish",
            Theme::Outline => "outline",
            Theme::Preview => "preview",
            Theme::Mobile => "mobile",
        }
    }

    pub fn is_flat(&self) -> bool {
        matches!(self, Theme::Background)
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Theme::ALL
            .iter()
            .copied()
            .find(|theme| theme.as_str() == s)
            .ok_or_else(|| format!("unknown theme: {s}"))
    }
}

// ============================================================================
// Platform
// ============================================================================

/// Width used by the plain aspect-ratio presets.
const RATIO_PRESET_WIDTH: u32 = 1600;

/// Target platform; each preset implies an output size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum Platform {
    #[default]
    #[serde(rename = "hashnode")]
    Hashnode,
    #[serde(rename = "dev")]
    Dev,
    #[serde(rename = "hugo-fixit")]
    HugoFixit,
    #[serde(rename = "juejin")]
    Juejin,
    #[serde(rename = "size-16:9")]
    Size16x9,
    #[serde(rename = "size-5:4")]
    Size5x4,
    #[serde(rename = "size-7:5")]
    Size7x5,
    #[serde(rename = "size-4:3")]
    Size4x3,
    #[serde(rename = "size-5:3")]
    Size5x3,
    #[serde(rename = "size-3:2")]
    Size3x2,
    #[serde(rename = "size-2:1")]
    Size2x1,
    #[serde(rename = "size-1:1")]
    Size1x1,
    #[serde(rename = "custom")]
    Custom,
}

impl Platform {
    pub const ALL: [Platform; 13] = [
        Platform::Custom,
        Platform::Hashnode,
        Platform::Dev,
        Platform::HugoFixit,
        Platform::Juejin,
        Platform::Size16x9,
        Platform::Size5x4,
        Platform::Size7x5,
        Platform::Size4x3,
        Platform::Size5x3,
        Platform::Size3x2,
        Platform::Size2x1,
        Platform::Size1x1,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Hashnode => "hashnode",
            Platform::Dev => "dev",
            Platform::HugoFixit => "hugo-fixit",
            Platform::Juejin => "juejin",
            Platform::Size16x9 => "size-16:9",
            Platform::Size5x4 => "size-5:4",
            Platform::Size7x5 => "size-7:5",
            Platform::Size4x3 => "size-4:3",
            Platform::Size5x3 => "size-5:3",
            Platform::Size3x2 => "size-3:2",
            Platform::Size2x1 => "size-2:1",
            Platform::Size1x1 => "size-1:1",
            Platform::Custom => "custom",
        }
    }

    /// Human-readable menu label.
    pub fn label(&self) -> &'static str {
        match self {
            Platform::Hashnode => "Hashnode",
            Platform::Dev => "Dev.to",
            Platform::HugoFixit => "Hugo FixIt",
            Platform::Juejin => "稀土掘金",
            Platform::Custom => "Custom",
            other => &other.as_str()["size-".len()..],
        }
    }

    /// Output size in pixels, or `None` for [`Platform::Custom`].
    pub fn preset_size(&self) -> Option<(u32, u32)> {
        let ratio = |x: u32, y: u32| {
            let height = (RATIO_PRESET_WIDTH as f32 * y as f32 / x as f32).round() as u32;
            Some((RATIO_PRESET_WIDTH, height))
        };
        match self {
            Platform::Hashnode => Some((1600, 840)),
            Platform::Dev => Some((1000, 420)),
            Platform::HugoFixit => Some((1200, 630)),
            Platform::Juejin => Some((1200, 720)),
            Platform::Size16x9 => ratio(16, 9),
            Platform::Size5x4 => ratio(5, 4),
            Platform::Size7x5 => ratio(7, 5),
            Platform::Size4x3 => ratio(4, 3),
            Platform::Size5x3 => ratio(5, 3),
            Platform::Size3x2 => ratio(3, 2),
            Platform::Size2x1 => ratio(2, 1),
            Platform::Size1x1 => ratio(1, 1),
            Platform::Custom => None,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Platform::Custom)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::ALL
            .iter()
            .copied()
            .find(|platform| platform.as_str() == s)
            .ok_or_else(|| format!("unknown platform: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_virgil_and_mmt_need_network_fonts() {
        let networked: Vec<_> = Font::ALL
            .iter()
            .filter(|font| font.network_source().is_some())
            .collect();
        assert_eq!(networked, vec![&Font::Virgil, &Font::Mmt]);
    }

    #[test]
    fn ids_roundtrip_through_from_str_and_serde() {
        for font in Font::ALL {
            assert_eq!(font.id().parse::<Font>().unwrap(), font);
            let json = serde_json::to_string(&font).unwrap();
            assert_eq!(json, format!("\"{}\"", font.id()));
        }
        for platform in Platform::ALL {
            assert_eq!(platform.as_str().parse::<Platform>().unwrap(), platform);
            let json = serde_json::to_string(&platform).unwrap();
            assert_eq!(json, format!("\"{}\"", platform.as_str()));
        }
        for theme in Theme::ALL {
            assert_eq!(theme.as_str().parse::<Theme>().unwrap(), theme);
        }
    }

    #[test]
    fn ratio_presets_keep_their_aspect() {
        assert_eq!(Platform::Size16x9.preset_size(), Some((1600, 900)));
        assert_eq!(Platform::Size2x1.preset_size(), Some((1600, 800)));
        assert_eq!(Platform::Size1x1.preset_size(), Some((1600, 1600)));
        assert_eq!(Platform::Custom.preset_size(), None);
    }

    #[test]
    fn ratio_labels_strip_prefix() {
        assert_eq!(Platform::Size7x5.label(), "7:5");
        assert_eq!(Platform::Dev.label(), "Dev.to");
    }
}
