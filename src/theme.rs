//! Background patterns and the random theme generator.
//!
//! # Example
//!
//! ```
//! use cover_renderer::{random_theme, Pattern};
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! let theme = random_theme(&mut rng, true);
//! assert_ne!(theme.pattern, Pattern::None);
//! ```

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::color::HexColor;
use crate::composition::Theme;

// ============================================================================
// Pattern
// ============================================================================

/// Decorative overlay drawn above the background fill.
///
/// [`Pattern::None`] is the flat sentinel: no overlay at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "kebab-case")]
pub enum Pattern {
    #[default]
    #[serde(alias = "")]
    None,
    GraphPaper,
    Jigsaw,
    Hideout,
    Dots,
    FallingTriangles,
    CircuitBoard,
    Temple,
    Anchors,
    Brickwall,
    OverlappingCircles,
    Wiggle,
    TicTacToe,
    Leaf,
    Bubbles,
    Squares,
    Explorer,
    Jupiter,
    Sun,
}

impl Pattern {
    /// Every pattern, in menu order.
    pub const ALL: [Pattern; 19] = [
        Pattern::None,
        Pattern::GraphPaper,
        Pattern::Jigsaw,
        Pattern::Hideout,
        Pattern::Dots,
        Pattern::FallingTriangles,
        Pattern::CircuitBoard,
        Pattern::Temple,
        Pattern::Anchors,
        Pattern::Brickwall,
        Pattern::OverlappingCircles,
        Pattern::Wiggle,
        Pattern::TicTacToe,
        Pattern::Leaf,
        Pattern::Bubbles,
        Pattern::Squares,
        Pattern::Explorer,
        Pattern::Jupiter,
        Pattern::Sun,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Pattern::None => "none",
            Pattern::GraphPaper => "graph-paper",
            Pattern::Jigsaw => "jigsaw",
            Pattern::Hideout => "hideout",
            Pattern::Dots => "dots",
            Pattern::FallingTriangles => "falling-triangles",
            Pattern::CircuitBoard => "circuit-board",
            Pattern::Temple => "temple",
            Pattern::Anchors => "anchors",
            Pattern::Brickwall => "brickwall",
            Pattern::OverlappingCircles => "overlapping-circles",
            Pattern::Wiggle => "wiggle",
            Pattern::TicTacToe => "tic-tac-toe",
            Pattern::Leaf => "leaf",
            Pattern::Bubbles => "bubbles",
            Pattern::Squares => "squares",
            Pattern::Explorer => "explorer",
            Pattern::Jupiter => "jupiter",
            Pattern::Sun => "sun",
        }
    }

    /// Returns true for the flat sentinel.
    pub fn is_none(&self) -> bool {
        matches!(self, Pattern::None)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Pattern {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Pattern::None);
        }
        Pattern::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("unknown pattern: {s}"))
    }
}

// ============================================================================
// Palettes
// ============================================================================

/// A preset background/border color pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub bg_color: HexColor,
    pub border_color: HexColor,
}

const fn palette(bg: (u8, u8, u8), border: (u8, u8, u8)) -> Palette {
    Palette {
        bg_color: HexColor::rgb(bg.0, bg.1, bg.2),
        border_color: HexColor::rgb(border.0, border.1, border.2),
    }
}

/// The fixed palette set the randomizer draws from.
pub const PALETTES: [Palette; 12] = [
    palette((0x94, 0x9e, 0xe5), (0xee, 0xf0, 0xfc)),
    palette((0x49, 0x79, 0x6b), (0xe8, 0xf3, 0xee)),
    palette((0xff, 0x7a, 0x59), (0xff, 0xf1, 0xe6)),
    palette((0x1f, 0x29, 0x37), (0xf9, 0x73, 0x16)),
    palette((0xfd, 0xe6, 0x8a), (0x92, 0x40, 0x0e)),
    palette((0x0e, 0xa5, 0xe9), (0xe0, 0xf2, 0xfe)),
    palette((0x6d, 0x28, 0xd9), (0xed, 0xe9, 0xfe)),
    palette((0xf4, 0x72, 0xb6), (0x83, 0x18, 0x43)),
    palette((0x10, 0xb9, 0x81), (0x06, 0x4e, 0x3b)),
    palette((0xe1, 0x1d, 0x48), (0xff, 0xe4, 0xe6)),
    palette((0xf5, 0xf5, 0xf4), (0x29, 0x25, 0x24)),
    palette((0x33, 0x41, 0x55), (0x38, 0xbd, 0xf8)),
];

// ============================================================================
// Random Theme
// ============================================================================

/// Background color, border color and pattern produced by the randomizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomTheme {
    pub bg_color: HexColor,
    pub border_color: HexColor,
    pub pattern: Pattern,
}

impl RandomTheme {
    /// Draws a theme with the thread rng.
    ///
    /// The flat sentinel pattern is excluded unless `current` is the flat
    /// background theme, where patterns are not drawn anyway.
    pub fn generate(current: Theme) -> Self {
        random_theme(&mut rand::thread_rng(), !current.is_flat())
    }
}

/// Draws a palette and a pattern from the fixed sets.
///
/// When `exclude_flat` is true the pattern is never [`Pattern::None`].
pub fn random_theme<R: Rng + ?Sized>(rng: &mut R, exclude_flat: bool) -> RandomTheme {
    let palette = PALETTES.choose(rng).copied().unwrap_or(PALETTES[0]);

    let candidates: &[Pattern] = if exclude_flat {
        &Pattern::ALL[1..]
    } else {
        &Pattern::ALL
    };
    let pattern = candidates.choose(rng).copied().unwrap_or(Pattern::Dots);

    RandomTheme {
        bg_color: palette.bg_color,
        border_color: palette.border_color,
        pattern,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn pattern_names_roundtrip() {
        for pattern in Pattern::ALL {
            assert_eq!(pattern.as_str().parse::<Pattern>().unwrap(), pattern);
        }
        assert_eq!("".parse::<Pattern>().unwrap(), Pattern::None);
        assert!("zigzag".parse::<Pattern>().is_err());
    }

    #[test]
    fn pattern_serializes_kebab_case() {
        let json = serde_json::to_string(&Pattern::TicTacToe).unwrap();
        assert_eq!(json, "\"tic-tac-toe\"");
        let empty: Pattern = serde_json::from_str("\"\"").unwrap();
        assert_eq!(empty, Pattern::None);
    }

    #[test]
    fn output_is_always_from_the_fixed_sets() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            let theme = random_theme(&mut rng, false);
            assert!(PALETTES.iter().any(|p| {
                p.bg_color == theme.bg_color && p.border_color == theme.border_color
            }));
            assert!(Pattern::ALL.contains(&theme.pattern));
        }
    }

    #[test]
    fn exclude_flat_never_yields_none() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..500 {
            assert_ne!(random_theme(&mut rng, true).pattern, Pattern::None);
        }
    }

    #[test]
    fn generate_for_template_theme_has_a_pattern() {
        for _ in 0..50 {
            assert!(!RandomTheme::generate(Theme::Basic).pattern.is_none());
        }
    }
}
