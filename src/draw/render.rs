//! Cairo-based rasterizers for annotation shapes.
//!
//! Every shape is painted into its own small surface that covers only the
//! shape's bounds. Arrows and previews are drawn at up to [`SUPERSAMPLE`]
//! times the destination resolution with antialiasing disabled, then filtered
//! down; the downscale is what smooths the edges. Rectangles sit on the pixel
//! grid and are painted directly.

use cairo::{Format, ImageSurface};

use super::color::{self, Color};
use super::font::FontDescriptor;
use crate::util::{self, Point, Rect};

/// Oversampling factor applied to shape geometry before downscaling.
pub const SUPERSAMPLE: i32 = 4;

/// Largest width or height Cairo accepts for an image surface.
pub const MAX_SURFACE_SIDE: i32 = 32767;

/// Pixel budget of one oversized buffer (64 MiB of ARGB32).
const MAX_SUPERSAMPLED_PIXELS: i64 = 16 * 1024 * 1024;

/// Offset of the drop shadow, towards the bottom-left.
pub const SHADOW_OFFSET: f64 = 3.0;

/// Radius of a committed bullet at [`WidgetScale::Normal`].
pub const BULLET_RADIUS: i32 = 12;

const ARROW_THICKNESS: f64 = 5.0;
const ARROWHEAD_SIZE: f64 = 20.0;
const RECT_OUTLINE: f64 = 3.0;
const RECT_FILL_ALPHA: f64 = 50.0 / 255.0;

// Bullet design space: label size and ring width before downscaling.
const BULLET_FONT_SIZE: f64 = 48.0;
const BULLET_MIN_SIDE: f64 = (BULLET_RADIUS * SUPERSAMPLE) as f64;
const BULLET_BORDER: f64 = (3 * SUPERSAMPLE) as f64;
const BULLET_TEXT_PADDING: f64 = 10.0;
const BULLET_SHADOW_OFFSET: f64 = 4.0;

// ============================================================================
// Render Context
// ============================================================================

/// Global size of annotation widgets, toggled from the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WidgetScale {
    #[default]
    Normal,
    Large,
}

impl WidgetScale {
    pub fn from_large(large: bool) -> Self {
        if large { Self::Large } else { Self::Normal }
    }

    /// Integer multiplier applied to stroke widths and bullet size.
    pub fn factor(self) -> i32 {
        match self {
            Self::Normal => 1,
            Self::Large => 2,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Normal => Self::Large,
            Self::Large => Self::Normal,
        }
    }

    pub fn is_large(self) -> bool {
        self == Self::Large
    }
}

/// Parameters every rasterizer depends on besides the shape itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderContext {
    pub scale: WidgetScale,
    pub font: FontDescriptor,
}

impl RenderContext {
    pub fn new(scale: WidgetScale, font: FontDescriptor) -> Self {
        Self { scale, font }
    }
}

/// A shape rasterized at destination resolution, positioned in canvas space.
#[derive(Debug)]
pub struct Raster {
    pub surface: ImageSurface,
    pub origin: Point,
}

impl Raster {
    /// Paints the raster onto `target` at its origin.
    pub fn paint_onto(&self, target: &cairo::Context) -> Result<(), cairo::Error> {
        target.save()?;
        target.set_source_surface(&self.surface, self.origin.x as f64, self.origin.y as f64)?;
        let result = target.paint();
        target.restore()?;
        result
    }

    pub fn bounds(&self) -> Rect {
        Rect {
            x: self.origin.x,
            y: self.origin.y,
            width: self.surface.width(),
            height: self.surface.height(),
        }
    }
}

// ============================================================================
// Supersample Pipeline
// ============================================================================

/// Oversampling factor used for a `width` x `height` raster.
///
/// Starts at [`SUPERSAMPLE`] and steps down until the buffer fits both
/// Cairo's side limit and the pixel budget. Returns 1 for shapes too large to
/// oversample at all.
pub fn supersample_factor(width: i32, height: i32) -> i32 {
    let (w, h) = (width.max(1) as i64, height.max(1) as i64);
    (2..=SUPERSAMPLE)
        .rev()
        .find(|&factor| {
            let f = factor as i64;
            w * f <= MAX_SURFACE_SIDE as i64
                && h * f <= MAX_SURFACE_SIDE as i64
                && w * h * f * f <= MAX_SUPERSAMPLED_PIXELS
        })
        .unwrap_or(1)
}

/// Paints into an oversized buffer covering `bounds` and filters it down.
///
/// The painter receives a context whose user space is canvas space, so it can
/// draw with destination coordinates while Cairo writes up to `SUPERSAMPLE`
/// times as many pixels. At factor 1 Cairo's own antialiasing is used instead.
pub fn supersample<F>(bounds: Rect, paint: F) -> Result<Raster, cairo::Error>
where
    F: FnOnce(&cairo::Context) -> Result<(), cairo::Error>,
{
    let width = bounds.width.max(1);
    let height = bounds.height.max(1);
    let factor = supersample_factor(width, height);
    if factor == 1 {
        log::debug!("Rasterizing {}x{} without oversampling", width, height);
        return paint_direct(bounds, cairo::Antialias::Default, paint);
    }

    let big = ImageSurface::create(Format::ARgb32, width * factor, height * factor)?;
    {
        let ctx = cairo::Context::new(&big)?;
        ctx.set_antialias(cairo::Antialias::None);
        ctx.scale(factor as f64, factor as f64);
        ctx.translate(-bounds.x as f64, -bounds.y as f64);
        paint(&ctx)?;
    }

    Ok(Raster {
        surface: downsample(&big, width, height)?,
        origin: bounds.top_left(),
    })
}

/// Paints at destination resolution into a surface covering `bounds`.
fn paint_direct<F>(bounds: Rect, antialias: cairo::Antialias, paint: F) -> Result<Raster, cairo::Error>
where
    F: FnOnce(&cairo::Context) -> Result<(), cairo::Error>,
{
    let surface = ImageSurface::create(Format::ARgb32, bounds.width.max(1), bounds.height.max(1))?;
    {
        let ctx = cairo::Context::new(&surface)?;
        ctx.set_antialias(antialias);
        ctx.translate(-bounds.x as f64, -bounds.y as f64);
        paint(&ctx)?;
    }
    surface.flush();

    Ok(Raster {
        surface,
        origin: bounds.top_left(),
    })
}

/// Scales `source` to `width` x `height` with smooth filtering.
pub fn downsample(source: &ImageSurface, width: i32, height: i32) -> Result<ImageSurface, cairo::Error> {
    let target = ImageSurface::create(Format::ARgb32, width.max(1), height.max(1))?;
    {
        let ctx = cairo::Context::new(&target)?;
        ctx.scale(
            width.max(1) as f64 / source.width().max(1) as f64,
            height.max(1) as f64 / source.height().max(1) as f64,
        );
        ctx.set_source_surface(source, 0.0, 0.0)?;
        ctx.source().set_filter(cairo::Filter::Good);
        ctx.paint()?;
    }
    target.flush();
    Ok(target)
}

// ============================================================================
// Rectangle
// ============================================================================

/// Area touched by a committed rectangle (outline shadow included).
pub fn rectangle_bounds(start: Point, end: Point) -> Rect {
    Rect::from_corners(start, end).inflate(SHADOW_OFFSET as i32 + 1)
}

/// Rasterizes a committed rectangle: translucent fill plus solid outline.
pub fn rasterize_rectangle(
    start: Point,
    end: Point,
    color: Color,
    rc: &RenderContext,
) -> Result<Raster, cairo::Error> {
    let rect = Rect::from_corners(start, end);
    let outline = RECT_OUTLINE * rc.scale.factor() as f64;

    // Integer edges and widths, so nothing needs smoothing
    paint_direct(rectangle_bounds(start, end), cairo::Antialias::None, |ctx| {
        color::SHADOW.apply(ctx);
        stroke_inside(ctx, rect, outline, -SHADOW_OFFSET, SHADOW_OFFSET);

        color.with_alpha(RECT_FILL_ALPHA).apply(ctx);
        ctx.rectangle(rect.x as f64, rect.y as f64, rect.width as f64, rect.height as f64);
        let _ = ctx.fill();

        color.apply(ctx);
        stroke_inside(ctx, rect, outline, 0.0, 0.0);
        Ok(())
    })
}

/// Rasterizes the toolbar thumbnail of a rectangle: a thin inset outline.
pub fn rasterize_rectangle_preview(area: Rect, color: Color) -> Result<Raster, cairo::Error> {
    supersample(area, |ctx| {
        color.apply(ctx);
        stroke_inside(ctx, area.inset(3), 2.0, 0.0, 0.0);
        Ok(())
    })
}

/// Strokes `rect` so the whole line width stays inside its edges.
fn stroke_inside(ctx: &cairo::Context, rect: Rect, width: f64, dx: f64, dy: f64) {
    let half = width / 2.0;
    let w = (rect.width as f64 - width).max(0.0);
    let h = (rect.height as f64 - width).max(0.0);
    if rect.width == 0 && rect.height == 0 {
        return;
    }
    ctx.set_line_width(width);
    ctx.set_line_join(cairo::LineJoin::Miter);
    ctx.rectangle(rect.x as f64 + half + dx, rect.y as f64 + half + dy, w, h);
    let _ = ctx.stroke();
}

// ============================================================================
// Arrow
// ============================================================================

/// Stroke parameters of an arrow in destination pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowStyle {
    pub thickness: f64,
    pub head_size: f64,
    pub dot_radius: f64,
    pub shadow: bool,
}

impl ArrowStyle {
    /// Style of committed arrows.
    ///
    /// The head grows with the scale squared above 1 (20 px, then 40 px)
    /// while the shaft grows linearly.
    pub fn committed(scale: WidgetScale) -> Self {
        let s = scale.factor() as f64;
        let head_factor = if s > 1.0 { s * 0.5 } else { 1.0 };
        Self {
            thickness: ARROW_THICKNESS * s,
            head_size: ARROWHEAD_SIZE * s * head_factor,
            dot_radius: 2.0 * s,
            shadow: true,
        }
    }

    /// Style of the toolbar thumbnail, independent of the widget scale.
    pub fn preview() -> Self {
        Self {
            thickness: ARROW_THICKNESS / 2.0,
            head_size: ARROWHEAD_SIZE * 0.7,
            dot_radius: 0.5,
            shadow: false,
        }
    }

    fn margin(&self) -> i32 {
        (self.head_size + self.thickness + SHADOW_OFFSET).ceil() as i32 + 2
    }
}

/// Area touched by a committed arrow.
pub fn arrow_bounds(start: Point, end: Point, scale: WidgetScale) -> Rect {
    Rect::from_corners(start, end).inflate(ArrowStyle::committed(scale).margin())
}

/// Rasterizes a committed arrow from `start` to the head at `end`.
pub fn rasterize_arrow(
    start: Point,
    end: Point,
    color: Color,
    rc: &RenderContext,
) -> Result<Raster, cairo::Error> {
    let style = ArrowStyle::committed(rc.scale);
    let from = (start.x as f64, start.y as f64);
    let to = (end.x as f64, end.y as f64);
    supersample(arrow_bounds(start, end, rc.scale), |ctx| {
        paint_arrow(ctx, from, to, color, style);
        Ok(())
    })
}

/// Rasterizes the toolbar arrow, running diagonally across `area`.
pub fn rasterize_arrow_preview(area: Rect, color: Color) -> Result<Raster, cairo::Error> {
    let from = (area.x as f64 + 6.0, area.y as f64 + 6.0);
    let to = (area.right() as f64 - 4.0, area.bottom() as f64 - 4.0);
    supersample(area, |ctx| {
        paint_arrow(ctx, from, to, color, ArrowStyle::preview());
        Ok(())
    })
}

fn paint_arrow(ctx: &cairo::Context, start: (f64, f64), end: (f64, f64), color: Color, style: ArrowStyle) {
    let angle = util::segment_angle(start, end);
    let length = (end.0 - start.0).hypot(end.1 - start.1);
    let shaft_end = util::point_along(start, angle, length - style.head_size / 2.0);
    let head = util::arrowhead_triangle(end, angle, style.head_size);

    ctx.set_line_cap(cairo::LineCap::Butt);

    if style.shadow {
        color::SHADOW.apply(ctx);
        // Only the two base corners move; the tip stays put.
        fill_polygon(
            ctx,
            &[
                head[0],
                (head[1].0 - SHADOW_OFFSET, head[1].1 + SHADOW_OFFSET),
                (head[2].0 - SHADOW_OFFSET, head[2].1 + SHADOW_OFFSET),
            ],
        );
        ctx.set_line_width(style.thickness + 1.25);
        ctx.move_to(start.0, start.1);
        ctx.line_to(shaft_end.0 - SHADOW_OFFSET, shaft_end.1 + SHADOW_OFFSET);
        let _ = ctx.stroke();
    }

    color.apply(ctx);
    ctx.arc(start.0, start.1, style.dot_radius, 0.0, std::f64::consts::TAU);
    let _ = ctx.fill();

    fill_polygon(ctx, &head);

    ctx.set_line_width(style.thickness);
    ctx.move_to(start.0, start.1);
    ctx.line_to(shaft_end.0, shaft_end.1);
    let _ = ctx.stroke();
}

fn fill_polygon(ctx: &cairo::Context, points: &[(f64, f64)]) {
    let Some((first, rest)) = points.split_first() else {
        return;
    };
    ctx.move_to(first.0, first.1);
    for point in rest {
        ctx.line_to(point.0, point.1);
    }
    ctx.close_path();
    let _ = ctx.fill();
}

// ============================================================================
// Bullet
// ============================================================================

/// Area covered by a committed bullet centered on `center`.
pub fn bullet_bounds(center: Point, scale: WidgetScale) -> Rect {
    let radius = BULLET_RADIUS * scale.factor();
    Rect::square(center.x - radius, center.y - radius, radius * 2)
}

/// Rasterizes a committed bullet labelled `label` centered on `center`.
pub fn rasterize_bullet(
    center: Point,
    label: &str,
    color: Color,
    rc: &RenderContext,
) -> Result<Raster, cairo::Error> {
    let bounds = bullet_bounds(center, rc.scale);
    let design = paint_bullet_design(label, color, &rc.font, true)?;
    Ok(Raster {
        surface: downsample(&design, bounds.width, bounds.height)?,
        origin: bounds.top_left(),
    })
}

/// Rasterizes the toolbar bullet, filling `area`.
pub fn rasterize_bullet_preview(
    area: Rect,
    label: &str,
    color: Color,
    font: &FontDescriptor,
) -> Result<Raster, cairo::Error> {
    let design = paint_bullet_design(label, color, font, false)?;
    Ok(Raster {
        surface: downsample(&design, area.width, area.height)?,
        origin: area.top_left(),
    })
}

/// Paints a bullet in design space (label at 48 pt) sized to fit its text.
fn paint_bullet_design(
    label: &str,
    color: Color,
    font: &FontDescriptor,
    shadow: bool,
) -> Result<ImageSurface, cairo::Error> {
    let (text_width, text_height) = measure_text(label, font, BULLET_FONT_SIZE)?;
    let side = (text_width + BULLET_TEXT_PADDING).max(BULLET_MIN_SIDE) + BULLET_BORDER;
    let extent = (side + BULLET_BORDER).ceil() as i32;
    let center = extent as f64 / 2.0;
    let ink = color.contrast();

    let surface = ImageSurface::create(Format::ARgb32, extent, extent)?;
    {
        let ctx = cairo::Context::new(&surface)?;
        ctx.set_antialias(cairo::Antialias::None);

        if shadow {
            color::SHADOW.apply(&ctx);
            ctx.arc(
                center - BULLET_SHADOW_OFFSET,
                center + BULLET_SHADOW_OFFSET,
                side / 2.0,
                0.0,
                std::f64::consts::TAU,
            );
            let _ = ctx.fill();
        }

        ink.apply(&ctx);
        ctx.arc(center, center, side / 2.0, 0.0, std::f64::consts::TAU);
        let _ = ctx.fill();

        color.apply(&ctx);
        ctx.arc(center, center, (side - BULLET_BORDER) / 2.0, 0.0, std::f64::consts::TAU);
        let _ = ctx.fill();

        let layout = pangocairo::functions::create_layout(&ctx);
        layout.set_font_description(Some(&font.pango_description(BULLET_FONT_SIZE)));
        layout.set_text(label);
        ink.apply(&ctx);
        ctx.move_to(center - text_width / 2.0, center - text_height / 2.0);
        pangocairo::functions::show_layout(&ctx, &layout);
    }
    surface.flush();
    Ok(surface)
}

/// Logical pixel size of `text` set in `font` at `size` points.
pub fn measure_text(text: &str, font: &FontDescriptor, size: f64) -> Result<(f64, f64), cairo::Error> {
    let scratch = ImageSurface::create(Format::ARgb32, 1, 1)?;
    let ctx = cairo::Context::new(&scratch)?;
    let layout = pangocairo::functions::create_layout(&ctx);
    layout.set_font_description(Some(&font.pango_description(size)));
    layout.set_text(text);
    let (_ink, logical) = layout.pixel_extents();
    Ok((logical.width() as f64, logical.height() as f64))
}
