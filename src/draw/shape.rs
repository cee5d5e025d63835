//! Annotation shapes and their per-shape raster cache.

use super::color::Color;
use super::font::FontDescriptor;
use super::render::{self, Raster, RenderContext, WidgetScale};
use crate::input::Tool;
use crate::util::{Point, Rect};

/// Number printed on the toolbar's bullet icon.
pub const PREVIEW_BULLET_NUMBER: u32 = 2;

/// Closed set of annotation primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// Translucent filled box with a solid outline, spanning `start`..`end`.
    Rectangle,
    /// Shaft from `start` with its head at `end`.
    Arrow,
    /// Numbered disc centered on `start`; `end` is ignored.
    Bullet { label: u32 },
}

impl ShapeKind {
    /// Tool that creates this kind of shape.
    pub fn tool(self) -> Tool {
        match self {
            ShapeKind::Rectangle => Tool::Rectangle,
            ShapeKind::Arrow => Tool::Arrow,
            ShapeKind::Bullet { .. } => Tool::Bullet,
        }
    }
}

/// Everything a rasterized shape depends on.
///
/// A cached raster is reused only while the key is unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheKey {
    pub kind: ShapeKind,
    pub start: Point,
    pub end: Point,
    pub color: [u8; 4],
    pub scale: WidgetScale,
    pub font: FontDescriptor,
}

/// Rasterized shape together with the inputs it was produced from.
#[derive(Debug)]
pub struct RenderCache {
    key: CacheKey,
    raster: Raster,
}

impl RenderCache {
    pub fn key(&self) -> &CacheKey {
        &self.key
    }

    pub fn raster(&self) -> &Raster {
        &self.raster
    }
}

/// A drawable annotation.
///
/// Preview shapes are toolbar thumbnails: `start`/`end` are the corners of
/// the icon and the miniature always fills it, whatever the widget scale.
#[derive(Debug)]
pub struct Shape {
    pub kind: ShapeKind,
    pub color: Color,
    pub start: Point,
    pub end: Point,
    preview: bool,
    cache: Option<RenderCache>,
}

impl Shape {
    /// Creates a shape anchored at `at` with `start == end`.
    pub fn new(kind: ShapeKind, color: Color, at: Point) -> Self {
        Self {
            kind,
            color,
            start: at,
            end: at,
            preview: false,
            cache: None,
        }
    }

    /// Creates the toolbar thumbnail for `tool` filling `area`.
    pub fn preview(tool: Tool, color: Color, area: Rect) -> Self {
        let kind = match tool {
            Tool::Rectangle => ShapeKind::Rectangle,
            Tool::Arrow => ShapeKind::Arrow,
            Tool::Bullet => ShapeKind::Bullet {
                label: PREVIEW_BULLET_NUMBER,
            },
        };
        Self {
            kind,
            color,
            start: area.top_left(),
            end: area.bottom_right(),
            preview: true,
            cache: None,
        }
    }

    pub fn is_preview(&self) -> bool {
        self.preview
    }

    /// Label of a bullet, `None` for other kinds.
    pub fn bullet_label(&self) -> Option<u32> {
        match self.kind {
            ShapeKind::Bullet { label } => Some(label),
            _ => None,
        }
    }

    /// Normalized box spanned by `start` and `end`, whatever the drag direction.
    pub fn rect(&self) -> Rect {
        Rect::from_corners(self.start, self.end)
    }

    /// Canvas area this shape paints at `scale`, shadows included.
    ///
    /// Used for damage tracking; always covers the cached raster.
    pub fn bounding_box(&self, scale: WidgetScale) -> Rect {
        if self.preview {
            return self.rect();
        }
        match self.kind {
            ShapeKind::Rectangle => render::rectangle_bounds(self.start, self.end),
            ShapeKind::Arrow => render::arrow_bounds(self.start, self.end, scale),
            ShapeKind::Bullet { .. } => render::bullet_bounds(self.start, scale),
        }
    }

    fn cache_key(&self, rc: &RenderContext) -> CacheKey {
        // A placed bullet only depends on its center
        let end = match self.kind {
            ShapeKind::Bullet { .. } if !self.preview => self.start,
            _ => self.end,
        };
        CacheKey {
            kind: self.kind,
            start: self.start,
            end,
            color: self.color.to_rgba8(),
            scale: rc.scale,
            font: rc.font.clone(),
        }
    }

    /// Returns true when the next draw has to rasterize again.
    pub fn needs_render(&self, rc: &RenderContext) -> bool {
        match &self.cache {
            Some(cache) => cache.key != self.cache_key(rc),
            None => true,
        }
    }

    pub fn cache(&self) -> Option<&RenderCache> {
        self.cache.as_ref()
    }

    /// Makes sure the cached raster matches the current state.
    ///
    /// Returns `true` if the shape had to be rasterized again.
    pub fn ensure_rendered(&mut self, rc: &RenderContext) -> Result<bool, cairo::Error> {
        let key = self.cache_key(rc);
        if self.cache.as_ref().is_some_and(|cache| cache.key == key) {
            return Ok(false);
        }

        let raster = self.rasterize(rc)?;
        log::trace!(
            "Rasterized {:?} at {:?} ({}x{})",
            self.kind,
            raster.origin,
            raster.surface.width(),
            raster.surface.height()
        );
        self.cache = Some(RenderCache { key, raster });
        Ok(true)
    }

    /// Draws the shape onto `target`, rasterizing only if something changed.
    pub fn draw(&mut self, target: &cairo::Context, rc: &RenderContext) -> Result<(), cairo::Error> {
        self.ensure_rendered(rc)?;
        match &self.cache {
            Some(cache) => cache.raster.paint_onto(target),
            None => Ok(()),
        }
    }

    fn rasterize(&self, rc: &RenderContext) -> Result<Raster, cairo::Error> {
        if self.preview {
            let area = self.rect();
            return match self.kind {
                ShapeKind::Rectangle => render::rasterize_rectangle_preview(area, self.color),
                ShapeKind::Arrow => render::rasterize_arrow_preview(area, self.color),
                ShapeKind::Bullet { label } => {
                    render::rasterize_bullet_preview(area, &label.to_string(), self.color, &rc.font)
                }
            };
        }

        match self.kind {
            ShapeKind::Rectangle => render::rasterize_rectangle(self.start, self.end, self.color, rc),
            ShapeKind::Arrow => render::rasterize_arrow(self.start, self.end, self.color, rc),
            ShapeKind::Bullet { label } => {
                render::rasterize_bullet(self.start, &label.to_string(), self.color, rc)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::color::{BLUE, RED};

    fn rect_shape(start: (i32, i32), end: (i32, i32)) -> Shape {
        let mut shape = Shape::new(ShapeKind::Rectangle, RED, Point::new(start.0, start.1));
        shape.end = Point::new(end.0, end.1);
        shape
    }

    #[test]
    fn rect_is_normalized_for_every_drag_direction() {
        let corners = [(10, 10), (60, 40)];
        for (a, b) in [(corners[0], corners[1]), (corners[1], corners[0]), ((10, 40), (60, 10)), ((60, 10), (10, 40))]
        {
            let rect = rect_shape(a, b).rect();
            assert_eq!(rect.x, a.0.min(b.0));
            assert_eq!(rect.y, a.1.min(b.1));
            assert_eq!((rect.width, rect.height), (50, 30));
        }
    }

    #[test]
    fn new_shape_starts_degenerate() {
        let shape = Shape::new(ShapeKind::Arrow, RED, Point::new(100, 100));
        assert_eq!(shape.start, shape.end);
        assert_eq!(shape.rect().width, 0);
        assert!(!shape.is_preview());
    }

    #[test]
    fn bounding_box_covers_rect() {
        let shape = rect_shape((100, 100), (300, 250));
        let bbox = shape.bounding_box(WidgetScale::Normal);
        let rect = shape.rect();
        assert!(bbox.x <= rect.x && bbox.y <= rect.y);
        assert!(bbox.right() >= rect.right() && bbox.bottom() >= rect.bottom());
    }

    #[test]
    fn arrow_bounds_grow_with_scale() {
        let mut arrow = Shape::new(ShapeKind::Arrow, RED, Point::new(50, 50));
        arrow.end = Point::new(150, 80);
        let normal = arrow.bounding_box(WidgetScale::Normal);
        let large = arrow.bounding_box(WidgetScale::Large);
        assert!(large.width > normal.width);
    }

    #[test]
    fn cache_is_reused_until_inputs_change() {
        let rc = RenderContext::default();
        let mut shape = rect_shape((10, 10), (40, 30));
        assert!(shape.needs_render(&rc));
        assert!(shape.ensure_rendered(&rc).unwrap());
        assert!(!shape.needs_render(&rc));
        assert!(!shape.ensure_rendered(&rc).unwrap());

        shape.end = Point::new(50, 30);
        assert!(shape.needs_render(&rc));
        assert!(shape.ensure_rendered(&rc).unwrap());

        shape.color = BLUE;
        assert!(shape.needs_render(&rc));
        shape.ensure_rendered(&rc).unwrap();

        let large = RenderContext::new(WidgetScale::Large, rc.font.clone());
        assert!(shape.needs_render(&large));
        assert!(!shape.needs_render(&rc));
    }

    #[test]
    fn bullet_raster_survives_pointer_motion() {
        let rc = RenderContext::default();
        let mut bullet = Shape::new(ShapeKind::Bullet { label: 1 }, RED, Point::new(60, 60));
        assert!(bullet.ensure_rendered(&rc).unwrap());

        bullet.end = Point::new(140, 95);
        assert!(!bullet.needs_render(&rc));
        assert!(!bullet.ensure_rendered(&rc).unwrap());

        bullet.start = Point::new(61, 60);
        assert!(bullet.needs_render(&rc));
    }

    #[test]
    fn cached_raster_stays_inside_bounding_box() {
        let rc = RenderContext::default();
        let mut shape = Shape::new(ShapeKind::Bullet { label: 3 }, RED, Point::new(80, 80));
        shape.ensure_rendered(&rc).unwrap();
        let raster = shape.cache().unwrap().raster().bounds();
        assert_eq!(raster, shape.bounding_box(rc.scale));
    }

    #[test]
    fn preview_fills_its_icon() {
        let area = Rect::square(45, 0, 40);
        let mut shape = Shape::preview(Tool::Arrow, RED, area);
        assert!(shape.is_preview());
        assert_eq!(shape.rect(), area);
        assert_eq!(shape.bounding_box(WidgetScale::Large), area);

        let rc = RenderContext::default();
        shape.ensure_rendered(&rc).unwrap();
        assert_eq!(shape.cache().unwrap().raster().bounds(), area);
    }

    #[test]
    fn preview_bullet_shows_fixed_number() {
        let shape = Shape::preview(Tool::Bullet, RED, Rect::square(0, 0, 20));
        assert_eq!(shape.bullet_label(), Some(PREVIEW_BULLET_NUMBER));
        assert_eq!(shape.kind.tool(), Tool::Bullet);
    }
}
