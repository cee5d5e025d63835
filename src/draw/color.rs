//! RGBA color type, the annotation palette and toolbar chrome colors.

use crate::util;

/// Represents an RGBA color with floating-point components.
///
/// All components are in the range 0.0 (minimum) to 1.0 (maximum).
///
/// # Examples
///
/// ```
/// use imgmark::draw::Color;
/// let red = Color::from_rgb8(230, 25, 75);
/// assert_eq!(red.a, 1.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red component (0.0 = no red, 1.0 = full red)
    pub r: f64,
    /// Green component (0.0 = no green, 1.0 = full green)
    pub g: f64,
    /// Blue component (0.0 = no blue, 1.0 = full blue)
    pub b: f64,
    /// Alpha/transparency (0.0 = fully transparent, 1.0 = fully opaque)
    pub a: f64,
}

impl Color {
    /// Creates a new color from RGBA components.
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from 8-bit channels.
    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
            a: 1.0,
        }
    }

    /// Same color with a different alpha.
    pub const fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }

    /// Sets this color as the source of `ctx`.
    pub fn apply(&self, ctx: &cairo::Context) {
        ctx.set_source_rgba(self.r, self.g, self.b, self.a);
    }

    pub fn luminance(&self) -> f64 {
        util::relative_luminance(self.r, self.g, self.b)
    }

    /// Black on light colors, white on dark ones.
    ///
    /// Used for bullet labels and their outline ring.
    pub fn contrast(&self) -> Color {
        if self.luminance() > 0.5 { BLACK } else { WHITE }
    }

    /// Cache key friendly representation (8-bit RGBA).
    pub fn to_rgba8(&self) -> [u8; 4] {
        let quantize = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [
            quantize(self.r),
            quantize(self.g),
            quantize(self.b),
            quantize(self.a),
        ]
    }
}

// ============================================================================
// Palette
// ============================================================================

pub const MAROON: Color = Color::from_rgb8(128, 0, 0);
pub const RED: Color = Color::from_rgb8(230, 25, 75);
pub const YELLOW: Color = Color::from_rgb8(255, 255, 25);
pub const GREEN: Color = Color::from_rgb8(60, 180, 75);
pub const CYAN: Color = Color::from_rgb8(70, 240, 240);
pub const MAGENTA: Color = Color::from_rgb8(240, 50, 230);
pub const BLUE: Color = Color::from_rgb8(0, 130, 200);
pub const WHITE: Color = Color::from_rgb8(255, 255, 255);
pub const BLACK: Color = Color::from_rgb8(0, 0, 0);

/// Selectable annotation colors in toolbar order.
pub const PALETTE: [Color; 9] = [
    MAROON, RED, YELLOW, GREEN, CYAN, MAGENTA, BLUE, WHITE, BLACK,
];

// ============================================================================
// Chrome
// ============================================================================

/// Highlight behind the selected toolbar icon.
pub const SELECTED: Color = Color::from_rgb8(255, 128, 0);

/// Toolbar background and unselected shape icons.
pub const GREY: Color = Color::from_rgb8(128, 128, 128);

/// Face of toolbar action buttons.
pub const BUTTON_FACE: Color = Color::from_rgb8(200, 200, 200);

/// Drop shadow painted under every committed shape.
pub const SHADOW: Color = Color::new(0.0, 0.0, 0.0, 150.0 / 255.0);

/// Shadow under palette swatches.
pub const SWATCH_SHADOW: Color = Color::from_rgb8(50, 50, 50);

pub const TRANSPARENT: Color = Color::new(0.0, 0.0, 0.0, 0.0);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contrast_picks_black_for_light_fills() {
        assert_eq!(YELLOW.contrast(), BLACK);
        assert_eq!(WHITE.contrast(), BLACK);
        assert_eq!(CYAN.contrast(), BLACK);
    }

    #[test]
    fn contrast_picks_white_for_dark_fills() {
        assert_eq!(MAROON.contrast(), WHITE);
        assert_eq!(BLUE.contrast(), WHITE);
        assert_eq!(BLACK.contrast(), WHITE);
        assert_eq!(RED.contrast(), WHITE);
    }

    #[test]
    fn rgba8_round_trips_palette_entries() {
        assert_eq!(RED.to_rgba8(), [230, 25, 75, 255]);
        assert_eq!(SHADOW.to_rgba8(), [0, 0, 0, 150]);
    }
}
