//! Painting helpers for toolbar icons.
//!
//! Shape icons reuse the shape rasterizers in preview mode; palette swatches
//! and action buttons are drawn here.

use std::f64::consts::{PI, TAU};

use crate::draw::color::{self, Color};
use crate::draw::render::{self, Raster};
use crate::util::Rect;

use super::toolbar::ToolbarButton;

/// Corner radius behind shape icons.
const ICON_RADIUS: f64 = 3.0;
/// Corner radius of action buttons.
const BUTTON_RADIUS: f64 = 5.0;

/// Adds a rounded rectangle path.
pub fn rounded_rect(ctx: &cairo::Context, rect: Rect, radius: f64) {
    let x = rect.x as f64;
    let y = rect.y as f64;
    let w = rect.width as f64;
    let h = rect.height as f64;
    let r = radius.min(w / 2.0).min(h / 2.0);

    ctx.new_sub_path();
    ctx.arc(x + w - r, y + r, r, -PI / 2.0, 0.0);
    ctx.arc(x + w - r, y + h - r, r, 0.0, PI / 2.0);
    ctx.arc(x + r, y + h - r, r, PI / 2.0, PI);
    ctx.arc(x + r, y + r, r, PI, 3.0 * PI / 2.0);
    ctx.close_path();
}

/// Fills the rounded tile behind a shape or swatch icon.
pub fn paint_icon_tile(ctx: &cairo::Context, rect: Rect, fill: Color) {
    fill.apply(ctx);
    rounded_rect(ctx, rect, ICON_RADIUS);
    let _ = ctx.fill();
}

/// Rasterizes a palette swatch: a shadowed disc filling 80% of the icon.
pub fn rasterize_swatch(rect: Rect, fill: Color) -> Result<Raster, cairo::Error> {
    let size = rect.width.min(rect.height) as f64;
    let radius = (0.4 * size * render::SUPERSAMPLE as f64).floor() / render::SUPERSAMPLE as f64;
    let cx = rect.x as f64 + rect.width as f64 / 2.0;
    let cy = rect.y as f64 + rect.height as f64 / 2.0;

    render::supersample(rect, |ctx| {
        color::SWATCH_SHADOW.apply(ctx);
        ctx.arc(cx - 1.0, cy + 1.0, radius, 0.0, TAU);
        let _ = ctx.fill();

        fill.apply(ctx);
        ctx.arc(cx, cy, radius, 0.0, TAU);
        let _ = ctx.fill();
        Ok(())
    })
}

/// Paints an action button: a rounded face with a line-art glyph.
pub fn paint_button(ctx: &cairo::Context, rect: Rect, button: ToolbarButton, face: Color) {
    let _ = ctx.save();
    face.apply(ctx);
    rounded_rect(ctx, rect, BUTTON_RADIUS);
    let _ = ctx.fill();

    let unit = rect.width.min(rect.height) as f64;
    let cx = rect.x as f64 + rect.width as f64 / 2.0;
    let cy = rect.y as f64 + rect.height as f64 / 2.0;
    // Glyph coordinates are in -1..1 around the button center.
    let s = unit * 0.3;

    color::BLACK.apply(ctx);
    ctx.set_line_width((unit / 14.0).max(1.0));
    ctx.set_line_cap(cairo::LineCap::Round);
    ctx.set_line_join(cairo::LineJoin::Round);

    match button {
        ToolbarButton::Undo => {
            ctx.arc_negative(cx, cy + s * 0.2, s * 0.8, 0.0, -PI * 0.9);
            let _ = ctx.stroke();
            let tip_x = cx - s * 0.8;
            let tip_y = cy + s * 0.05;
            ctx.move_to(tip_x - s * 0.35, tip_y - s * 0.35);
            ctx.line_to(tip_x, tip_y);
            ctx.line_to(tip_x + s * 0.4, tip_y - s * 0.25);
            let _ = ctx.stroke();
        }
        ToolbarButton::Copy => {
            ctx.rectangle(cx - s, cy - s, s * 1.3, s * 1.3);
            let _ = ctx.stroke();
            ctx.rectangle(cx - s * 0.3, cy - s * 0.3, s * 1.3, s * 1.3);
            let _ = ctx.stroke();
        }
        ToolbarButton::Save => {
            ctx.rectangle(cx - s, cy - s, s * 2.0, s * 2.0);
            let _ = ctx.stroke();
            ctx.rectangle(cx - s * 0.5, cy - s, s, s * 0.7);
            let _ = ctx.stroke();
            ctx.rectangle(cx - s * 0.6, cy + s * 0.2, s * 1.2, s * 0.8);
            let _ = ctx.fill();
        }
        ToolbarButton::ToggleScale => {
            ctx.rectangle(cx - s, cy, s * 0.8, s * 0.8);
            let _ = ctx.stroke();
            ctx.rectangle(cx - s * 0.4, cy - s, s * 1.4, s * 1.4);
            let _ = ctx.stroke();
        }
        ToolbarButton::Clear => {
            ctx.move_to(cx - s * 0.8, cy - s * 0.8);
            ctx.line_to(cx + s * 0.8, cy + s * 0.8);
            ctx.move_to(cx + s * 0.8, cy - s * 0.8);
            ctx.line_to(cx - s * 0.8, cy + s * 0.8);
            let _ = ctx.stroke();
        }
    }
    let _ = ctx.restore();
}
