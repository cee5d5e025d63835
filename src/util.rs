//! Geometry helpers shared by the canvas, toolbar and renderer.
//!
//! This module provides:
//! - [`Point`] and [`Rect`] integer geometry in canvas/window space
//! - [`SnapGrid`] pointer quantization
//! - Arrowhead geometry for the arrow rasterizer

use std::f64::consts::PI;

// ============================================================================
// Points and Rectangles
// ============================================================================

/// Integer 2D coordinate in canvas or window space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns this point shifted by the given offsets.
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Axis-aligned rectangle used for shape bounds, icon hit boxes and damage regions.
///
/// Width and height are never negative. Zero-sized rectangles are allowed as
/// geometry (a freshly created shape has `start == end`) but are not
/// [valid](Rect::is_valid) as damage regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// Creates a new rectangle. Width/height must be positive.
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Option<Self> {
        if width <= 0 || height <= 0 {
            None
        } else {
            Some(Self {
                x,
                y,
                width,
                height,
            })
        }
    }

    /// Axis-aligned bounding box of two corners, whatever the drag direction.
    pub fn from_corners(a: Point, b: Point) -> Self {
        let x = a.x.min(b.x);
        let y = a.y.min(b.y);
        Self {
            x,
            y,
            width: a.x.max(b.x) - x,
            height: a.y.max(b.y) - y,
        }
    }

    /// Square of side `size` with its top-left corner at `(x, y)`.
    pub const fn square(x: i32, y: i32, size: i32) -> Self {
        Self {
            x,
            y,
            width: size,
            height: size,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn bottom_right(&self) -> Point {
        Point::new(self.right(), self.bottom())
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Returns true if rectangle has a positive area.
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Point containment with inclusive min and exclusive max edges.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Expands the rectangle evenly in all directions by `amount`.
    pub fn inflate(self, amount: i32) -> Self {
        Self {
            x: self.x - amount,
            y: self.y - amount,
            width: self.width + amount * 2,
            height: self.height + amount * 2,
        }
    }

    /// Shrinks the rectangle evenly; never produces negative dimensions.
    pub fn inset(self, amount: i32) -> Self {
        Self {
            x: self.x + amount,
            y: self.y + amount,
            width: (self.width - amount * 2).max(0),
            height: (self.height - amount * 2).max(0),
        }
    }

    pub fn translate(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    /// Smallest rectangle covering both inputs.
    pub fn union(self, other: Rect) -> Rect {
        let min_x = self.x.min(other.x);
        let min_y = self.y.min(other.y);
        Rect {
            x: min_x,
            y: min_y,
            width: self.right().max(other.right()) - min_x,
            height: self.bottom().max(other.bottom()) - min_y,
        }
    }

    /// Clamps the rectangle to `[0, width) x [0, height)`.
    pub fn clamp_to_bounds(self, width: i32, height: i32) -> Rect {
        let x = self.x.clamp(0, width);
        let y = self.y.clamp(0, height);
        Rect {
            x,
            y,
            width: (self.right().clamp(0, width) - x).max(0),
            height: (self.bottom().clamp(0, height) - y).max(0),
        }
    }
}

// ============================================================================
// Snap-to-grid
// ============================================================================

/// Quantizes pointer coordinates to a square grid.
///
/// A grid size of 0 disables snapping. Otherwise every axis is rounded to the
/// nearest multiple of the grid size (ties round up).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SnapGrid {
    size: u32,
}

impl SnapGrid {
    pub const fn new(size: u32) -> Self {
        Self { size }
    }

    /// Grid that leaves coordinates untouched.
    pub const fn disabled() -> Self {
        Self { size: 0 }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn is_enabled(&self) -> bool {
        self.size > 0
    }

    /// Snaps a single coordinate.
    ///
    /// Uses floored division so coordinates left of or above the canvas origin
    /// (possible while dragging past the window edge) round the same way.
    pub fn snap_value(&self, value: i32) -> i32 {
        if self.size == 0 {
            return value;
        }
        let grid = self.size as i32;
        (grid / 2 + value).div_euclid(grid) * grid
    }

    /// Snaps both axes of a point.
    pub fn snap(&self, point: Point) -> Point {
        Point::new(self.snap_value(point.x), self.snap_value(point.y))
    }
}

// ============================================================================
// Arrowhead Geometry
// ============================================================================

/// Half-angle between the arrow shaft and each side of the head.
pub const ARROWHEAD_HALF_ANGLE: f64 = PI / 6.0;

/// Direction of the segment `start -> end` in radians.
pub fn segment_angle(start: (f64, f64), end: (f64, f64)) -> f64 {
    (end.1 - start.1).atan2(end.0 - start.0)
}

/// Triangle vertices of an arrowhead with its tip at `tip`.
///
/// `angle` is the shaft direction (pointing towards the tip) and `size` the
/// length of each side of the head. Returns `[tip, left, right]`.
pub fn arrowhead_triangle(tip: (f64, f64), angle: f64, size: f64) -> [(f64, f64); 3] {
    let left = (
        tip.0 - size * (angle - ARROWHEAD_HALF_ANGLE).cos(),
        tip.1 - size * (angle - ARROWHEAD_HALF_ANGLE).sin(),
    );
    let right = (
        tip.0 - size * (angle + ARROWHEAD_HALF_ANGLE).cos(),
        tip.1 - size * (angle + ARROWHEAD_HALF_ANGLE).sin(),
    );
    [tip, left, right]
}

/// Point at `distance` from `start` along `angle`.
pub fn point_along(start: (f64, f64), angle: f64, distance: f64) -> (f64, f64) {
    (
        start.0 + distance * angle.cos(),
        start.1 + distance * angle.sin(),
    )
}

/// Relative luminance (Rec. 709 weights) of linear components in `0.0..=1.0`.
pub fn relative_luminance(r: f64, g: f64, b: f64) -> f64 {
    0.2126 * r + 0.7152 * g + 0.0722 * b
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snap_rounds_to_nearest_multiple() {
        let grid = SnapGrid::new(8);
        assert_eq!(grid.snap_value(0), 0);
        assert_eq!(grid.snap_value(3), 0);
        assert_eq!(grid.snap_value(4), 8);
        assert_eq!(grid.snap_value(11), 8);
        assert_eq!(grid.snap_value(12), 16);
        assert_eq!(grid.snap_value(100), 104);
    }

    #[test]
    fn snap_is_idempotent_and_lands_on_grid() {
        for size in [1u32, 2, 5, 8, 10, 16, 33] {
            let grid = SnapGrid::new(size);
            for value in -200..200 {
                let once = grid.snap_value(value);
                assert_eq!(once % size as i32, 0, "size {size} value {value}");
                assert_eq!(grid.snap_value(once), once, "size {size} value {value}");
            }
        }
    }

    #[test]
    fn snap_with_zero_grid_is_identity() {
        let grid = SnapGrid::new(0);
        assert!(!grid.is_enabled());
        for value in [-17, 0, 1, 7, 255, 4099] {
            assert_eq!(grid.snap_value(value), value);
        }
        assert_eq!(grid.snap(Point::new(13, 27)), Point::new(13, 27));
    }

    #[test]
    fn snap_handles_negative_coordinates() {
        let grid = SnapGrid::new(8);
        assert_eq!(grid.snap_value(-3), 0);
        assert_eq!(grid.snap_value(-5), -8);
    }

    #[test]
    fn rect_from_corners_normalizes_drag_direction() {
        let a = Point::new(300, 250);
        let b = Point::new(100, 100);
        let rect = Rect::from_corners(a, b);
        assert_eq!(rect, Rect::from_corners(b, a));
        assert_eq!((rect.x, rect.y, rect.width, rect.height), (100, 100, 200, 150));

        let degenerate = Rect::from_corners(b, b);
        assert_eq!((degenerate.width, degenerate.height), (0, 0));
        assert!(!degenerate.is_valid());
    }

    #[test]
    fn rect_contains_uses_half_open_edges() {
        let rect = Rect::square(5, 0, 40);
        assert!(rect.contains(5, 0));
        assert!(rect.contains(44, 39));
        assert!(!rect.contains(45, 10));
        assert!(!rect.contains(4, 10));
    }

    #[test]
    fn rect_union_and_clamp() {
        let a = Rect::new(0, 0, 10, 10).unwrap();
        let b = Rect::new(20, 5, 10, 10).unwrap();
        assert_eq!(a.union(b), Rect::new(0, 0, 30, 15).unwrap());

        let clamped = Rect::new(-5, 90, 20, 20).unwrap().clamp_to_bounds(100, 100);
        assert_eq!(clamped, Rect::new(0, 90, 15, 10).unwrap());
    }

    #[test]
    fn arrowhead_points_back_along_shaft() {
        let [tip, left, right] = arrowhead_triangle((100.0, 0.0), 0.0, 20.0);
        assert_eq!(tip, (100.0, 0.0));
        assert!(left.0 < 100.0 && right.0 < 100.0);
        assert!((left.1 + right.1).abs() < 1e-9);
        let side = ((tip.0 - left.0).powi(2) + (tip.1 - left.1).powi(2)).sqrt();
        assert!((side - 20.0).abs() < 1e-9);
    }
}
