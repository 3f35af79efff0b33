//! Sizes and boxes used to lay out a cover.

/// Largest bitmap area export will allocate, 8192 x 8192 pixels.
pub const MAX_CANVAS_PIXELS: u64 = 8192 * 8192;

/// Output canvas size in CSS pixels.
///
/// Custom platform input is not validated, so either side may be zero,
/// negative or non-finite; [`to_pixels`](Self::to_pixels) is where that
/// is caught.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CanvasSize {
    pub width: f32,
    pub height: f32,
}

impl CanvasSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Whole-pixel dimensions, or `None` when no bitmap can back this size.
    ///
    /// Sizes above [`MAX_CANVAS_PIXELS`] in area are refused as well.
    pub fn to_pixels(&self) -> Option<(u32, u32)> {
        let valid = |v: f32| v.is_finite() && v >= 1.0 && v <= u32::MAX as f32;
        if !valid(self.width) || !valid(self.height) {
            return None;
        }
        let (width, height) = (self.width.round() as u32, self.height.round() as u32);
        if u64::from(width) * u64::from(height) > MAX_CANVAS_PIXELS {
            return None;
        }
        Some((width, height))
    }

    /// The whole canvas as a rectangle at the origin.
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// The shorter side, used to scale type and margins.
    pub fn min_side(&self) -> f32 {
        self.width.min(self.height)
    }
}

/// An axis-aligned box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Shrinks the box by `amount` on every side.
    pub fn inset(&self, amount: f32) -> Self {
        Self::new(
            self.x + amount,
            self.y + amount,
            (self.width - 2.0 * amount).max(0.0),
            (self.height - 2.0 * amount).max(0.0),
        )
    }

    /// Splits at `fraction` of the width into left and right parts.
    pub fn split_horizontal(&self, fraction: f32) -> (Self, Self) {
        let left_width = self.width * fraction;
        (
            Self::new(self.x, self.y, left_width, self.height),
            Self::new(self.x + left_width, self.y, self.width - left_width, self.height),
        )
    }

    /// Splits at `fraction` of the height into top and bottom parts.
    pub fn split_vertical(&self, fraction: f32) -> (Self, Self) {
        let top_height = self.height * fraction;
        (
            Self::new(self.x, self.y, self.width, top_height),
            Self::new(self.x, self.y + top_height, self.width, self.height - top_height),
        )
    }

    /// A square of `side` centered in this box.
    pub fn centered_square(&self, side: f32) -> Self {
        let (cx, cy) = self.center();
        Self::new(cx - side / 2.0, cy - side / 2.0, side, side)
    }
}
