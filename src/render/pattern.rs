//! SVG `<pattern>` definitions for the background overlays.

use std::fmt::Write as _;

use crate::theme::Pattern;

/// Id the template fills reference via `url(#cover-pattern)`.
pub const PATTERN_ID: &str = "cover-pattern";

/// Motif markup and its tile size in motif units.
struct Motif {
    width: f32,
    height: f32,
    body: String,
}

fn motif(width: f32, height: f32, body: impl Into<String>) -> Motif {
    Motif {
        width,
        height,
        body: body.into(),
    }
}

/// Builds the `<pattern>` element for `pattern`, or `None` for the flat sentinel.
///
/// `scale` enlarges the tile so the overlay keeps its density across output
/// sizes.
pub fn pattern_def(pattern: Pattern, color: &str, opacity: f32, scale: f32) -> Option<String> {
    let fill = format!(r#"fill="{color}" fill-opacity="{opacity}""#);
    let stroke = |width: f32| {
        format!(r#"fill="none" stroke="{color}" stroke-opacity="{opacity}" stroke-width="{width}""#)
    };

    let motif = match pattern {
        Pattern::None => return None,
        Pattern::GraphPaper => motif(
            100.0,
            100.0,
            format!(
                r#"<path d="M0 0H100M0 0V100" {}/><path d="M0 20H100M0 40H100M0 60H100M0 80H100M20 0V100M40 0V100M60 0V100M80 0V100" {}/>"#,
                stroke(2.0),
                stroke(0.5)
            ),
        ),
        Pattern::Jigsaw => motif(
            60.0,
            60.0,
            format!(
                r#"<path d="M0 0H60V60H0Z" {}/><circle cx="30" cy="0" r="6" {fill}/><circle cx="0" cy="30" r="6" {fill}/>"#,
                stroke(1.5)
            ),
        ),
        Pattern::Hideout => motif(
            40.0,
            40.0,
            format!(
                r#"<path d="M20 0L40 20L20 40L0 20Z" {}/><path d="M20 12L28 20L20 28L12 20Z" {fill}/>"#,
                stroke(1.0)
            ),
        ),
        Pattern::Dots => motif(20.0, 20.0, format!(r#"<circle cx="10" cy="10" r="2" {fill}/>"#)),
        Pattern::FallingTriangles => motif(
            40.0,
            40.0,
            format!(r#"<path d="M10 4L16 14H4Z" {fill}/><path d="M30 24L36 34H24Z" {fill}/>"#),
        ),
        Pattern::CircuitBoard => motif(
            80.0,
            80.0,
            format!(
                r#"<path d="M0 20H30V40H50M80 60H60V30M40 80V60H20" {}/><circle cx="50" cy="40" r="3" {fill}/><circle cx="60" cy="30" r="3" {fill}/><circle cx="20" cy="60" r="3" {fill}/>"#,
                stroke(1.5)
            ),
        ),
        Pattern::Temple => motif(
            60.0,
            60.0,
            format!(
                r#"<path d="M5 5H55V55H5ZM15 15H45V45H15ZM25 25H35V35H25Z" {}/>"#,
                stroke(1.5)
            ),
        ),
        Pattern::Anchors => motif(
            60.0,
            60.0,
            format!(
                r#"<circle cx="30" cy="12" r="4" {s}/><path d="M30 16V46M24 24H36M18 38A12 12 0 0 0 42 38" {s}/>"#,
                s = stroke(2.0)
            ),
        ),
        Pattern::Brickwall => motif(
            42.0,
            44.0,
            format!(
                r#"<path d="M0 0H42V22H0ZM-21 22H21V44H-21ZM21 22H63V44H21Z" {}/>"#,
                stroke(1.5)
            ),
        ),
        Pattern::OverlappingCircles => motif(
            50.0,
            50.0,
            format!(
                r#"<circle cx="0" cy="0" r="25" {s}/><circle cx="50" cy="0" r="25" {s}/><circle cx="0" cy="50" r="25" {s}/><circle cx="50" cy="50" r="25" {s}/><circle cx="25" cy="25" r="25" {s}/>"#,
                s = stroke(1.0)
            ),
        ),
        Pattern::Wiggle => motif(
            52.0,
            26.0,
            format!(
                r#"<path d="M0 13C6.5 13 6.5 3 13 3S19.5 13 26 13 32.5 3 39 3 45.5 13 52 13" {}/>"#,
                stroke(2.0)
            ),
        ),
        Pattern::TicTacToe => motif(
            64.0,
            64.0,
            format!(
                r#"<path d="M10 10L22 22M22 10L10 22M42 42L54 54M54 42L42 54" {s}/><circle cx="48" cy="16" r="6" {s}/><circle cx="16" cy="48" r="6" {s}/>"#,
                s = stroke(2.0)
            ),
        ),
        Pattern::Leaf => motif(
            40.0,
            40.0,
            format!(r#"<path d="M8 32C8 16 20 8 32 8C32 24 24 32 8 32Z" {fill}/>"#),
        ),
        Pattern::Bubbles => motif(
            100.0,
            100.0,
            format!(
                r#"<circle cx="17" cy="17" r="4" {s}/><circle cx="60" cy="30" r="8" {s}/><circle cx="85" cy="80" r="3" {s}/><circle cx="30" cy="75" r="6" {s}/>"#,
                s = stroke(1.5)
            ),
        ),
        Pattern::Squares => motif(
            32.0,
            32.0,
            format!(
                r#"<rect x="6" y="6" width="10" height="10" {fill}/><rect x="22" y="22" width="4" height="4" {fill}/>"#
            ),
        ),
        Pattern::Explorer => motif(
            40.0,
            40.0,
            format!(r#"<path d="M20 12V28M12 20H28" {}/>"#, stroke(2.0)),
        ),
        Pattern::Jupiter => motif(
            52.0,
            52.0,
            format!(
                r#"<circle cx="13" cy="13" r="6" {fill}/><circle cx="39" cy="39" r="6" {fill}/><circle cx="39" cy="13" r="2" {fill}/><circle cx="13" cy="39" r="2" {fill}/>"#
            ),
        ),
        Pattern::Sun => motif(
            60.0,
            60.0,
            format!(
                r#"<circle cx="30" cy="30" r="6" {fill}/><path d="M30 20V12M30 40V48M20 30H12M40 30H48M23 23L17 17M37 37L43 43M37 23L43 17M23 37L17 43" {}/>"#,
                stroke(2.0)
            ),
        ),
    };

    let mut def = String::new();
    let _ = write!(
        def,
        r#"<pattern id="{PATTERN_ID}" patternUnits="userSpaceOnUse" width="{w}" height="{h}">{body}</pattern>"#,
        w = motif.width * scale,
        h = motif.height * scale,
        body = if (scale - 1.0).abs() > f32::EPSILON {
            format!(r#"<g transform="scale({scale})">{}</g>"#, motif.body)
        } else {
            motif.body
        },
    );
    Some(def)
}
