//! Hex colors and the lightness adjustments used for borders and overlays.

use std::fmt;
use std::str::FromStr;

use palette::{Hsl, IntoColor, Srgb};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Returned when a string is not a `#rrggbb` or `#rgb` hex code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid hex color: {0:?}")]
pub struct InvalidHexColor(pub String);

/// An opaque sRGB color written as a hex code.
///
/// Serializes to and from the lowercase `#rrggbb` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexColor {
    r: u8,
    g: u8,
    b: u8,
}

impl HexColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Returns the `(r, g, b)` components.
    pub fn components(&self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    /// Returns a copy with its HSL lightness reduced by `amount` (0.0-1.0).
    pub fn darken(&self, amount: f32) -> Self {
        self.adjust_lightness(-amount)
    }

    /// Returns a copy with its HSL lightness raised by `amount` (0.0-1.0).
    pub fn lighten(&self, amount: f32) -> Self {
        self.adjust_lightness(amount)
    }

    /// True when dark text reads better than light text on this color.
    pub fn is_light(&self) -> bool {
        self.hsl().lightness > 0.6
    }

    fn hsl(&self) -> Hsl {
        let rgb = Srgb::new(
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        );
        rgb.into_color()
    }

    fn adjust_lightness(&self, delta: f32) -> Self {
        let mut hsl = self.hsl();
        hsl.lightness = (hsl.lightness + delta).clamp(0.0, 1.0);
        let adjusted: Srgb = hsl.into_color();
        Self {
            r: (adjusted.red * 255.0).round() as u8,
            g: (adjusted.green * 255.0).round() as u8,
            b: (adjusted.blue * 255.0).round() as u8,
        }
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for HexColor {
    type Err = InvalidHexColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if !trimmed.starts_with('#') {
            return Err(InvalidHexColor(s.to_string()));
        }
        let rgb: Srgb<u8> = trimmed
            .parse()
            .map_err(|_| InvalidHexColor(s.to_string()))?;
        Ok(Self::rgb(rgb.red, rgb.green, rgb.blue))
    }
}

impl Serialize for HexColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(feature = "jsonschema")]
impl schemars::JsonSchema for HexColor {
    fn schema_name() -> String {
        "HexColor".to_string()
    }

    fn json_schema(generator: &mut schemars::r#gen::SchemaGenerator) -> schemars::schema::Schema {
        String::json_schema(generator)
    }
}
