//! Per-theme layouts that turn a composition into SVG markup.
//!
//! Every template receives the same [`Layout`] and emits the body of the
//! root `<svg>` element. Sizes are derived from the canvas' shorter side so
//! each theme scales with the platform preset.

use std::fmt::Write as _;

use crate::color::HexColor;
use crate::composition::{Backdrop, CompositionMode, Theme};

use super::geometry::{CanvasSize, Rect};
use super::pattern::{PATTERN_ID, pattern_def};

/// Average glyph advance as a fraction of the font size.
const CHAR_WIDTH_EM: f32 = 0.55;
const LINE_HEIGHT_EM: f32 = 1.25;

const DARK_TEXT: &str = "#1f2937";
const LIGHT_TEXT: &str = "#ffffff";

/// Canvas side a pattern tile is designed against.
const PATTERN_REFERENCE_SIDE: f32 = 420.0;

/// Inputs shared by all templates.
pub(crate) struct Layout<'a> {
    pub size: CanvasSize,
    pub title: &'a str,
    pub author: &'a str,
    pub icon_href: Option<&'a str>,
    pub mode: CompositionMode,
}

impl Layout<'_> {
    fn unit(&self) -> f32 {
        self.size.min_side()
    }

    fn title_size(&self) -> f32 {
        self.unit() * 0.085
    }

    fn author_size(&self) -> f32 {
        self.unit() * 0.04
    }
}

/// Markup for the body of the root element.
pub(crate) fn compose(layout: &Layout<'_>) -> String {
    match layout.mode {
        CompositionMode::Flat => flat(layout),
        CompositionMode::Decorated { theme, backdrop } => {
            let mut out = backdrop_markup(layout.size, &backdrop);
            let body = match theme {
                Theme::Basic => basic(layout, &backdrop),
                Theme::Modern => modern(layout, &backdrop),
                Theme::Stylish => stylish(layout, &backdrop),
                Theme::Outline => outline(layout, &backdrop),
                Theme::Preview => preview(layout, &backdrop),
                Theme::Mobile => mobile(layout, &backdrop),
                // mode() never decorates the flat theme
                Theme::Background => flat(layout),
            };
            out.push_str(&body);
            out
        }
    }
}

// ============================================================================
// Flat
// ============================================================================

fn flat(layout: &Layout<'_>) -> String {
    let bounds = layout.size.bounds();
    let unit = layout.unit();
    let mut out = String::new();
    let _ = write!(
        out,
        r##"<defs><linearGradient id="cover-flat" x1="0" y1="0" x2="1" y2="1"><stop offset="0" stop-color="#1e293b"/><stop offset="1" stop-color="#0f172a"/></linearGradient></defs><rect width="{w}" height="{h}" fill="url(#cover-flat)"/>"##,
        w = bounds.width,
        h = bounds.height,
    );

    let card = bounds.inset(unit * 0.1);
    let _ = write!(
        out,
        r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{}" fill="{LIGHT_TEXT}" fill-opacity="0.08"/>"#,
        card.x,
        card.y,
        card.width,
        card.height,
        unit * 0.04,
    );

    let content = card.inset(unit * 0.06);
    let (icon_box, text_box) = content.split_horizontal(0.3);
    if let Some(href) = layout.icon_href {
        out.push_str(&image(href, icon_box.centered_square(icon_box.width.min(icon_box.height) * 0.8)));
    }
    let text_box = if layout.icon_href.is_some() { text_box } else { content };
    out.push_str(&title_and_author(layout, text_box, LIGHT_TEXT, Anchor::Start));
    out
}

// ============================================================================
// Decorated templates
// ============================================================================

fn backdrop_markup(size: CanvasSize, backdrop: &Backdrop) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        r#"<rect width="{}" height="{}" fill="{}"/>"#,
        size.width, size.height, backdrop.bg_color
    );
    let (overlay, opacity) = if backdrop.bg_color.is_light() {
        ("#000000", 0.12)
    } else {
        ("#ffffff", 0.18)
    };
    let scale = (size.min_side() / PATTERN_REFERENCE_SIDE).max(0.25);
    if let Some(def) = pattern_def(backdrop.pattern, overlay, opacity, scale) {
        let _ = write!(
            out,
            r#"<defs>{def}</defs><rect width="{}" height="{}" fill="url(#{PATTERN_ID})"/>"#,
            size.width, size.height
        );
    }
    out
}

fn basic(layout: &Layout<'_>, backdrop: &Backdrop) -> String {
    let unit = layout.unit();
    let card = layout.size.bounds().inset(unit * 0.1);
    let mut out = card_rect(card, unit * 0.03, "#ffffff", Some((backdrop.border_color, unit * 0.012)));

    let (text_box, footer) = card.inset(unit * 0.05).split_vertical(0.72);
    out.push_str(&text_lines(
        layout.title,
        text_box,
        layout.title_size(),
        DARK_TEXT,
        Anchor::Middle,
        3,
        "bold",
    ));
    let (author_box, icon_box) = footer.split_horizontal(0.7);
    out.push_str(&text_lines(
        layout.author,
        author_box,
        layout.author_size(),
        DARK_TEXT,
        Anchor::Start,
        1,
        "normal",
    ));
    if let Some(href) = layout.icon_href {
        let side = icon_box.height.min(icon_box.width) * 0.9;
        out.push_str(&image(
            href,
            Rect::new(icon_box.right() - side, icon_box.y, side, side),
        ));
    }
    out
}

fn modern(layout: &Layout<'_>, backdrop: &Backdrop) -> String {
    let unit = layout.unit();
    let content = layout.size.bounds().inset(unit * 0.1);
    let (icon_column, text_column) = content.split_horizontal(0.32);
    let mut out = String::new();

    if let Some(href) = layout.icon_href {
        let tile = icon_column.centered_square(icon_column.width.min(icon_column.height) * 0.85);
        out.push_str(&card_rect(
            tile,
            unit * 0.04,
            "#ffffff",
            Some((backdrop.border_color, unit * 0.01)),
        ));
        out.push_str(&image(href, tile.inset(tile.width * 0.15)));
    }

    let text_color = text_on(backdrop.bg_color);
    let text_column = if layout.icon_href.is_some() {
        text_column.inset(unit * 0.02)
    } else {
        content
    };
    out.push_str(&title_and_author(layout, text_column, text_color, Anchor::Start));
    out
}

fn stylish(layout: &Layout<'_>, backdrop: &Backdrop) -> String {
    let unit = layout.unit();
    let (panel, showcase) = layout.size.bounds().split_horizontal(0.55);
    let mut out = card_rect(panel, 0.0, "#ffffff", None);
    let _ = write!(
        out,
        r#"<rect x="{}" y="0" width="{}" height="{}" fill="{}"/>"#,
        panel.right() - unit * 0.015,
        unit * 0.015,
        panel.height,
        backdrop.border_color
    );

    out.push_str(&title_and_author(
        layout,
        panel.inset(unit * 0.08),
        DARK_TEXT,
        Anchor::Start,
    ));

    if let Some(href) = layout.icon_href {
        let side = showcase.width.min(showcase.height) * 0.5;
        let tile = showcase.centered_square(side);
        out.push_str(&card_rect(tile.inset(-side * 0.12), side * 0.12, "#ffffff", None));
        out.push_str(&image(href, tile));
    }
    out
}

fn outline(layout: &Layout<'_>, backdrop: &Backdrop) -> String {
    let unit = layout.unit();
    let frame = layout.size.bounds().inset(unit * 0.06);
    let stroke = unit * 0.025;
    let mut out = String::new();
    let _ = write!(
        out,
        r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{}" fill="none" stroke="{}" stroke-width="{stroke}"/>"#,
        frame.x,
        frame.y,
        frame.width,
        frame.height,
        unit * 0.03,
        backdrop.border_color
    );

    let inner = frame.inset(unit * 0.08);
    let (icon_row, text_box) = inner.split_vertical(0.3);
    if let Some(href) = layout.icon_href {
        out.push_str(&image(href, icon_row.centered_square(icon_row.height)));
    }
    let text_box = if layout.icon_href.is_some() { text_box } else { inner };
    out.push_str(&title_and_author(
        layout,
        text_box,
        text_on(backdrop.bg_color),
        Anchor::Middle,
    ));
    out
}

fn preview(layout: &Layout<'_>, backdrop: &Backdrop) -> String {
    let unit = layout.unit();
    let bounds = layout.size.bounds();
    let (header, body) = bounds.split_vertical(0.42);
    let text_color = text_on(backdrop.bg_color);
    let mut out = String::new();

    let header = header.inset(unit * 0.06);
    let (title_box, author_box) = header.split_vertical(0.75);
    out.push_str(&text_lines(
        layout.title,
        title_box,
        layout.title_size() * 0.85,
        text_color,
        Anchor::Middle,
        2,
        "bold",
    ));
    out.push_str(&text_lines(
        layout.author,
        author_box,
        layout.author_size(),
        text_color,
        Anchor::Middle,
        1,
        "normal",
    ));

    // browser window peeking in from the bottom edge
    let window_width = bounds.width * 0.7;
    let window = Rect::new(
        (bounds.width - window_width) / 2.0,
        body.y,
        window_width,
        body.height + unit * 0.05,
    );
    out.push_str(&card_rect(
        window,
        unit * 0.03,
        "#ffffff",
        Some((backdrop.border_color, unit * 0.008)),
    ));
    let bar = unit * 0.07;
    let _ = write!(
        out,
        r#"<path d="M{} {}H{}" stroke="{}" stroke-width="{}"/>"#,
        window.x,
        window.y + bar,
        window.right(),
        backdrop.border_color,
        unit * 0.006
    );
    for (i, color) in ["#ff5f57", "#febc2e", "#28c840"].iter().enumerate() {
        let _ = write!(
            out,
            r#"<circle cx="{}" cy="{}" r="{}" fill="{color}"/>"#,
            window.x + bar * (0.6 + 0.45 * i as f32),
            window.y + bar / 2.0,
            bar * 0.15
        );
    }
    if let Some(href) = layout.icon_href {
        let screen = Rect::new(window.x, window.y + bar, window.width, body.height - bar);
        out.push_str(&image(
            href,
            screen.centered_square(screen.height.min(screen.width) * 0.7),
        ));
    }
    out
}

fn mobile(layout: &Layout<'_>, backdrop: &Backdrop) -> String {
    let unit = layout.unit();
    let content = layout.size.bounds().inset(unit * 0.08);
    let (text_box, device_box) = content.split_horizontal(0.6);
    let mut out = title_and_author(layout, text_box, text_on(backdrop.bg_color), Anchor::Start);

    let phone_height = device_box.height * 1.1;
    let phone_width = phone_height * 0.5;
    let (cx, _) = device_box.center();
    let phone = Rect::new(
        cx - phone_width / 2.0,
        device_box.y + unit * 0.02,
        phone_width,
        phone_height,
    );
    out.push_str(&card_rect(phone, phone_width * 0.12, "#111827", None));
    let screen = phone.inset(phone_width * 0.05);
    out.push_str(&card_rect(screen, phone_width * 0.09, "#ffffff", None));
    let _ = write!(
        out,
        r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{}" fill="{}"/>"#,
        screen.x + screen.width * 0.3,
        screen.y + screen.width * 0.04,
        screen.width * 0.4,
        screen.width * 0.06,
        screen.width * 0.03,
        backdrop.border_color
    );
    if let Some(href) = layout.icon_href {
        out.push_str(&image(href, screen.centered_square(screen.width * 0.6)));
    }
    out
}

// ============================================================================
// Building blocks
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Anchor {
    Start,
    Middle,
}

/// Title filling the upper part of `area` with the author underneath.
fn title_and_author(layout: &Layout<'_>, area: Rect, fill: &str, anchor: Anchor) -> String {
    let (title_box, author_box) = area.split_vertical(0.78);
    let mut out = text_lines(
        layout.title,
        title_box,
        layout.title_size(),
        fill,
        anchor,
        3,
        "bold",
    );
    out.push_str(&text_lines(
        layout.author,
        author_box,
        layout.author_size(),
        fill,
        anchor,
        1,
        "normal",
    ));
    out
}

/// Wrapped text vertically centered in `area`.
fn text_lines(
    text: &str,
    area: Rect,
    font_size: f32,
    fill: &str,
    anchor: Anchor,
    max_lines: usize,
    weight: &str,
) -> String {
    let lines = wrap_text(text, area.width, font_size, max_lines);
    if lines.is_empty() {
        return String::new();
    }

    let line_height = font_size * LINE_HEIGHT_EM;
    let (cx, cy) = area.center();
    let x = match anchor {
        Anchor::Start => area.x,
        Anchor::Middle => cx,
    };
    let first_baseline =
        cy - (lines.len() - 1) as f32 * line_height / 2.0 + font_size * 0.35;
    let anchor = match anchor {
        Anchor::Start => "start",
        Anchor::Middle => "middle",
    };

    let mut out = String::new();
    let _ = write!(
        out,
        r#"<text font-size="{font_size}" font-weight="{weight}" fill="{fill}" text-anchor="{anchor}">"#
    );
    for (i, line) in lines.iter().enumerate() {
        let _ = write!(
            out,
            r#"<tspan x="{x}" y="{}">{}</tspan>"#,
            first_baseline + i as f32 * line_height,
            escape_xml(line)
        );
    }
    out.push_str("</text>");
    out
}

fn card_rect(rect: Rect, radius: f32, fill: &str, stroke: Option<(HexColor, f32)>) -> String {
    let stroke = stroke
        .map(|(color, width)| format!(r#" stroke="{color}" stroke-width="{width}""#))
        .unwrap_or_default();
    format!(
        r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{radius}" fill="{fill}"{stroke}/>"#,
        rect.x, rect.y, rect.width, rect.height
    )
}

fn image(href: &str, rect: Rect) -> String {
    format!(
        r#"<image x="{}" y="{}" width="{}" height="{}" preserveAspectRatio="xMidYMid meet" xlink:href="{}"/>"#,
        rect.x,
        rect.y,
        rect.width,
        rect.height,
        escape_xml(href)
    )
}

fn text_on(background: HexColor) -> &'static str {
    if background.is_light() {
        DARK_TEXT
    } else {
        LIGHT_TEXT
    }
}

pub(crate) fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Greedy word wrap using an estimated glyph width.
///
/// Words longer than a line are broken between characters, which also covers
/// scripts written without spaces. Overflowing text ends in an ellipsis on the
/// last kept line.
pub(crate) fn wrap_text(text: &str, max_width: f32, font_size: f32, max_lines: usize) -> Vec<String> {
    let per_line = max_width / (font_size * CHAR_WIDTH_EM);
    let max_chars = if per_line.is_finite() && per_line >= 1.0 {
        per_line as usize
    } else {
        1
    };

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut chars: Vec<char> = word.chars().collect();
        while chars.len() > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            lines.push(chars.drain(..max_chars).collect());
        }
        if chars.is_empty() {
            continue;
        }

        let word_len = chars.len();
        if current_len > 0 && current_len + 1 + word_len > max_chars {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.extend(chars);
        current_len += word_len;
    }
    if !current.is_empty() {
        lines.push(current);
    }

    if lines.len() > max_lines {
        lines.truncate(max_lines);
        if let Some(last) = lines.last_mut() {
            let kept: String = last.chars().take(max_chars.saturating_sub(1)).collect();
            *last = format!("{}…", kept.trim_end());
        }
    }
    lines
}
