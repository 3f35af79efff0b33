//! Edits and the pure transition that applies them.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::{CompositionConfig, Font, Platform, Theme, UploadedImage};
use crate::catalog::{IconCatalog, IconCatalogEntry};
use crate::color::HexColor;
use crate::theme::{Pattern, RandomTheme};

/// A single user change to a composition.
#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    Title(String),
    Author(String),
    Icon(IconCatalogEntry),
    IconStyle(String),
    CustomIcon(UploadedImage),
    Font(Font),
    Theme(Theme),
    BgColor(HexColor),
    Pattern(Pattern),
    /// Merges a randomizer result: background, border and pattern together.
    Backdrop(RandomTheme),
    Platform(Platform),
    CustomPlatformWidth(f32),
    CustomPlatformX(f32),
    CustomPlatformY(f32),
}

/// Why an edit left the composition unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditRejected {
    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("invalid value {value:?} for {field}")]
    InvalidValue { field: Field, value: String },

    #[error("no icon {0:?} in the catalog")]
    UnknownIcon(String),

    #[error("icon {icon:?} has no style {style:?}")]
    UnknownIconStyle { icon: String, style: String },
}

// ============================================================================
// Field
// ============================================================================

/// Names accepted by [`Composer::set_field`](crate::Composer::set_field).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Author,
    Icon,
    IconStyle,
    Font,
    Theme,
    BgColor,
    Pattern,
    Platform,
    CustomPlatformWidth,
    CustomPlatformX,
    CustomPlatformY,
}

impl Field {
    pub const ALL: [Field; 12] = [
        Field::Title,
        Field::Author,
        Field::Icon,
        Field::IconStyle,
        Field::Font,
        Field::Theme,
        Field::BgColor,
        Field::Pattern,
        Field::Platform,
        Field::CustomPlatformWidth,
        Field::CustomPlatformX,
        Field::CustomPlatformY,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Author => "author",
            Field::Icon => "icon",
            Field::IconStyle => "iconStyle",
            Field::Font => "font",
            Field::Theme => "theme",
            Field::BgColor => "bgColor",
            Field::Pattern => "pattern",
            Field::Platform => "platform",
            Field::CustomPlatformWidth => "customPlatformWidth",
            Field::CustomPlatformX => "customPlatformX",
            Field::CustomPlatformY => "customPlatformY",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = EditRejected;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .iter()
            .copied()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| EditRejected::UnknownField(s.to_string()))
    }
}

impl Edit {
    /// Builds an edit from a field and its textual value.
    ///
    /// Icon values are looked up in `catalog`.
    pub fn parse(field: Field, value: &str, catalog: &IconCatalog) -> Result<Self, EditRejected> {
        let invalid = || EditRejected::InvalidValue {
            field,
            value: value.to_string(),
        };
        let number = || value.trim().parse::<f32>().map_err(|_| invalid());

        Ok(match field {
            Field::Title => Edit::Title(value.to_string()),
            Field::Author => Edit::Author(value.to_string()),
            Field::Icon => Edit::Icon(
                catalog
                    .find(value)
                    .cloned()
                    .ok_or_else(|| EditRejected::UnknownIcon(value.to_string()))?,
            ),
            Field::IconStyle => Edit::IconStyle(value.to_string()),
            Field::Font => Edit::Font(value.parse().map_err(|_| invalid())?),
            Field::Theme => Edit::Theme(value.parse().map_err(|_| invalid())?),
            Field::BgColor => Edit::BgColor(value.parse().map_err(|_| invalid())?),
            Field::Pattern => Edit::Pattern(value.parse().map_err(|_| invalid())?),
            Field::Platform => Edit::Platform(value.parse().map_err(|_| invalid())?),
            Field::CustomPlatformWidth => Edit::CustomPlatformWidth(number()?),
            Field::CustomPlatformX => Edit::CustomPlatformX(number()?),
            Field::CustomPlatformY => Edit::CustomPlatformY(number()?),
        })
    }
}

// ============================================================================
// Transition
// ============================================================================

/// Applies one edit, returning the next composition.
///
/// Coupling rules:
/// - picking an icon resets its style to the first variant and drops any upload
/// - uploading an image selects the `custom` entry
/// - the `hugo-fixit` platform forces its fixed icon
///
/// Background color and pattern are stored in every theme, even though the
/// flat theme does not draw them. Custom platform dimensions are stored as
/// given, without range checks.
pub fn apply_edit(
    mut config: CompositionConfig,
    edit: Edit,
) -> Result<CompositionConfig, EditRejected> {
    match edit {
        Edit::Title(title) => config.title = title,
        Edit::Author(author) => config.author = author,
        Edit::Icon(entry) => select_icon(&mut config, entry),
        Edit::IconStyle(style) => {
            if !config.icon.has_style(&style) {
                return Err(EditRejected::UnknownIconStyle {
                    icon: config.icon.value.clone(),
                    style,
                });
            }
            config.icon_style = style;
        }
        Edit::CustomIcon(image) => {
            if !config.icon.is_custom() {
                select_icon(&mut config, IconCatalogEntry::custom("Custom"));
            }
            config.custom_icon = Some(image);
        }
        Edit::Font(font) => config.font = font,
        Edit::Theme(theme) => config.theme = theme,
        Edit::BgColor(color) => config.bg_color = color,
        Edit::Pattern(pattern) => config.pattern = pattern,
        Edit::Backdrop(theme) => {
            config.bg_color = theme.bg_color;
            config.border_color = Some(theme.border_color);
            config.pattern = theme.pattern;
        }
        Edit::Platform(platform) => {
            config.platform = platform;
            if platform == Platform::HugoFixit {
                select_icon(&mut config, IconCatalogEntry::hugo_fixit());
            }
        }
        Edit::CustomPlatformWidth(width) => config.custom_platform_width = width,
        Edit::CustomPlatformX(x) => config.custom_platform_x = x,
        Edit::CustomPlatformY(y) => config.custom_platform_y = y,
    }
    Ok(config)
}

fn select_icon(config: &mut CompositionConfig, entry: IconCatalogEntry) {
    config.icon_style = entry.default_style().to_string();
    config.icon = entry;
    config.custom_icon = None;
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composition::CompositionMode;

    fn decorated() -> CompositionConfig {
        apply_edit(CompositionConfig::default(), Edit::Theme(Theme::Basic)).unwrap()
    }

    fn svg_upload() -> UploadedImage {
        UploadedImage::from_bytes(b"<svg xmlns=\"http://www.w3.org/2000/svg\"/>".to_vec()).unwrap()
    }

    #[test]
    fn scalar_edits_touch_only_their_field() {
        let before = CompositionConfig::default();
        let after = apply_edit(before.clone(), Edit::Title("Rust".into())).unwrap();
        assert_eq!(after.title(), "Rust");
        assert_eq!(CompositionConfig { title: before.title.clone(), ..after.clone() }, before);

        let after = apply_edit(before.clone(), Edit::CustomPlatformX(3.0)).unwrap();
        assert_eq!(after.custom_platform_x(), 3.0);
        assert_eq!(CompositionConfig { custom_platform_x: before.custom_platform_x, ..after }, before);
    }

    #[test]
    fn picking_an_icon_resets_style_and_upload() {
        let with_upload = apply_edit(CompositionConfig::default(), Edit::CustomIcon(svg_upload())).unwrap();
        assert!(with_upload.icon().is_custom());
        assert!(with_upload.custom_icon().is_some());
        assert_eq!(with_upload.icon_style(), "");

        let rust = IconCatalogEntry::new("rust", "rust", vec!["plain".into(), "original".into()]);
        let after = apply_edit(with_upload, Edit::Icon(rust)).unwrap();
        assert_eq!(after.icon().value, "rust");
        assert_eq!(after.icon_style(), "plain");
        assert!(after.custom_icon().is_none());
    }

    #[test]
    fn icon_style_must_be_offered() {
        let config = CompositionConfig::default();
        let ok = apply_edit(config.clone(), Edit::IconStyle("original-wordmark".into())).unwrap();
        assert_eq!(ok.icon_style(), "original-wordmark");

        let err = apply_edit(config, Edit::IconStyle("line".into())).unwrap_err();
        assert!(matches!(err, EditRejected::UnknownIconStyle { .. }));
    }

    #[test]
    fn hugo_fixit_platform_forces_icon() {
        let uploaded = apply_edit(CompositionConfig::default(), Edit::CustomIcon(svg_upload())).unwrap();
        let after = apply_edit(uploaded, Edit::Platform(Platform::HugoFixit)).unwrap();

        assert_eq!(after.platform(), Platform::HugoFixit);
        assert_eq!(after.icon().value, "hugo-fixit");
        assert_eq!(after.icon_style(), "");
        assert!(after.custom_icon().is_none());
    }

    #[test]
    fn other_platforms_keep_icon() {
        let after = apply_edit(CompositionConfig::default(), Edit::Platform(Platform::Dev)).unwrap();
        assert_eq!(after.icon().value, "react");
    }

    #[test]
    fn backdrop_edits_are_kept_in_flat_theme() {
        let flat = CompositionConfig::default();
        let after = apply_edit(flat, Edit::BgColor(HexColor::rgb(0, 0, 0))).unwrap();
        let after = apply_edit(after, Edit::Pattern(Pattern::Dots)).unwrap();
        assert_eq!(after.bg_color(), HexColor::rgb(0, 0, 0));
        assert_eq!(after.pattern(), Pattern::Dots);
        assert_eq!(after.mode(), CompositionMode::Flat);

        let CompositionMode::Decorated { backdrop, .. } =
            apply_edit(after, Edit::Theme(Theme::Basic)).unwrap().mode()
        else {
            panic!("basic is a decorated theme");
        };
        assert_eq!(backdrop.bg_color, HexColor::rgb(0, 0, 0));
        assert_eq!(backdrop.pattern, Pattern::Dots);
    }

    #[test]
    fn backdrop_merges_three_fields() {
        let random = RandomTheme {
            bg_color: HexColor::rgb(1, 2, 3),
            border_color: HexColor::rgb(4, 5, 6),
            pattern: Pattern::Sun,
        };
        let after = apply_edit(decorated(), Edit::Backdrop(random)).unwrap();
        assert_eq!(after.bg_color(), random.bg_color);
        assert_eq!(after.border_color(), Some(random.border_color));
        assert_eq!(after.pattern(), Pattern::Sun);
    }

    #[test]
    fn custom_dimensions_are_not_validated() {
        let after = apply_edit(CompositionConfig::default(), Edit::CustomPlatformWidth(-20.0)).unwrap();
        assert_eq!(after.custom_platform_width(), -20.0);
        let after = apply_edit(after, Edit::CustomPlatformY(0.0)).unwrap();
        assert_eq!(after.custom_platform_y(), 0.0);
    }

    #[test]
    fn parse_field_values() {
        let catalog = IconCatalog::builtins();
        assert_eq!("bgColor".parse::<Field>().unwrap(), Field::BgColor);
        assert!(matches!("colour".parse::<Field>(), Err(EditRejected::UnknownField(_))));

        assert_eq!(
            Edit::parse(Field::CustomPlatformWidth, "500", &catalog).unwrap(),
            Edit::CustomPlatformWidth(500.0)
        );
        assert_eq!(
            Edit::parse(Field::Platform, "size-16:9", &catalog).unwrap(),
            Edit::Platform(Platform::Size16x9)
        );
        assert_eq!(
            Edit::parse(Field::Icon, "hugo-fixit", &catalog).unwrap(),
            Edit::Icon(IconCatalogEntry::hugo_fixit())
        );
        assert_eq!(
            Edit::parse(Field::Icon, "react", &catalog).unwrap_err(),
            EditRejected::UnknownIcon("react".into())
        );
        assert!(matches!(
            Edit::parse(Field::Font, "font-Comic", &catalog),
            Err(EditRejected::InvalidValue { field: Field::Font, .. })
        ));
        assert!(Edit::parse(Field::CustomPlatformX, "two", &catalog).is_err());
    }
}
