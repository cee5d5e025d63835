//! The annotation canvas: background image, shape list and composited output.

use std::collections::BTreeSet;

use cairo::{Format, ImageSurface};

use super::color::Color;
use super::render::RenderContext;
use super::shape::{Shape, ShapeKind};
use crate::input::Tool;
use crate::util::{Point, Rect, SnapGrid};

/// Labels of the bullets currently on a canvas.
///
/// A new bullet gets the smallest positive number not in use, so removing a
/// bullet frees its number for the next one.
#[derive(Debug, Default, Clone)]
pub struct BulletNumbers {
    in_use: BTreeSet<u32>,
}

impl BulletNumbers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves and returns the next label.
    pub fn acquire(&mut self) -> u32 {
        let mut candidate = 1;
        for &used in &self.in_use {
            if used != candidate {
                break;
            }
            candidate += 1;
        }
        self.in_use.insert(candidate);
        candidate
    }

    /// Makes `label` available again.
    pub fn release(&mut self, label: u32) {
        self.in_use.remove(&label);
    }

    pub fn len(&self) -> usize {
        self.in_use.len()
    }

    pub fn is_empty(&self) -> bool {
        self.in_use.is_empty()
    }
}

/// Ordered shapes drawn over an immutable background image.
///
/// Shape order is creation order and z-order. Every mutation sets the dirty
/// flag and grows the pending damage; [`Canvas::composite_overlay`] rebuilds
/// the output and clears the flag.
#[derive(Debug)]
pub struct Canvas {
    background: ImageSurface,
    overlay: ImageSurface,
    composite: ImageSurface,
    shapes: Vec<Shape>,
    bullets: BulletNumbers,
    snap: SnapGrid,
    dragging: bool,
    dirty: bool,
    damage: Option<Rect>,
    rasterized: usize,
}

impl Canvas {
    /// Creates an empty canvas the size of `background`.
    pub fn new(background: ImageSurface, snap: SnapGrid) -> Result<Self, cairo::Error> {
        let width = background.width();
        let height = background.height();
        let overlay = ImageSurface::create(Format::ARgb32, width, height)?;
        let composite = ImageSurface::create(Format::ARgb32, width, height)?;
        Ok(Self {
            background,
            overlay,
            composite,
            shapes: Vec::new(),
            bullets: BulletNumbers::new(),
            snap,
            dragging: false,
            dirty: true,
            damage: Rect::new(0, 0, width, height),
            rasterized: 0,
        })
    }

    pub fn width(&self) -> i32 {
        self.background.width()
    }

    pub fn height(&self) -> i32 {
        self.background.height()
    }

    pub fn bounds(&self) -> Rect {
        Rect {
            x: 0,
            y: 0,
            width: self.width(),
            height: self.height(),
        }
    }

    pub fn background(&self) -> &ImageSurface {
        &self.background
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn bullet_numbers(&self) -> &BulletNumbers {
        &self.bullets
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Number of shape rasterizations performed by composites so far.
    pub fn rasterized_count(&self) -> usize {
        self.rasterized
    }

    /// Forces the next composite to run and reports the whole canvas as damaged.
    ///
    /// Used when something outside the shape list changes, like the widget scale.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
        self.add_damage(self.bounds());
    }

    /// Returns and resets the canvas area changed since the last call.
    pub fn take_damage(&mut self) -> Option<Rect> {
        self.damage
            .take()
            .map(|rect| rect.clamp_to_bounds(self.width(), self.height()))
            .filter(Rect::is_valid)
    }

    fn add_damage(&mut self, rect: Rect) {
        self.damage = Some(match self.damage {
            Some(existing) => existing.union(rect),
            None => rect,
        });
    }

    fn touch(&mut self, rect: Rect) {
        self.dirty = true;
        self.add_damage(rect);
    }

    /// Starts a new shape at the snapped `pos` with `start == end`.
    pub fn add_shape(&mut self, tool: Tool, color: Color, pos: Point, rc: &RenderContext) {
        let at = self.snap.snap(pos);
        let kind = match tool {
            Tool::Rectangle => ShapeKind::Rectangle,
            Tool::Arrow => ShapeKind::Arrow,
            Tool::Bullet => ShapeKind::Bullet {
                label: self.bullets.acquire(),
            },
        };
        let shape = Shape::new(kind, color, at);
        log::debug!("Added {:?} at ({}, {})", kind, at.x, at.y);
        self.touch(shape.bounding_box(rc.scale));
        self.shapes.push(shape);
        self.dragging = true;
    }

    /// Moves the end point of the shape being dragged.
    ///
    /// No-op when no drag is active or the snapped position did not change.
    pub fn update_active_shape_end(&mut self, pos: Point, rc: &RenderContext) {
        if !self.dragging {
            return;
        }
        let end = self.snap.snap(pos);
        let Some(shape) = self.shapes.last_mut() else {
            return;
        };
        if shape.end == end {
            return;
        }
        let before = shape.bounding_box(rc.scale);
        shape.end = end;
        let after = shape.bounding_box(rc.scale);
        self.touch(before.union(after));
    }

    /// Sets the final end point and ends the drag.
    pub fn finalize_drag(&mut self, pos: Point, rc: &RenderContext) {
        if !self.dragging {
            return;
        }
        self.update_active_shape_end(pos, rc);
        self.dragging = false;
    }

    /// Removes the most recent shape. No-op on an empty canvas.
    pub fn undo_last(&mut self, rc: &RenderContext) -> bool {
        match self.shapes.len() {
            0 => false,
            len => self.remove_at(len - 1, rc),
        }
    }

    /// Removes the shape at `index` (creation order).
    pub fn remove_at(&mut self, index: usize, rc: &RenderContext) -> bool {
        if index >= self.shapes.len() {
            return false;
        }
        let shape = self.shapes.remove(index);
        self.on_removed(&shape);
        if index == self.shapes.len() {
            self.dragging = false;
        }
        self.touch(shape.bounding_box(rc.scale));
        log::debug!("Removed {:?} ({} left)", shape.kind, self.shapes.len());
        true
    }

    /// Removes every shape.
    pub fn clear_all(&mut self) {
        if self.shapes.is_empty() {
            return;
        }
        for shape in std::mem::take(&mut self.shapes) {
            self.on_removed(&shape);
        }
        self.dragging = false;
        self.mark_dirty();
    }

    fn on_removed(&mut self, shape: &Shape) {
        if let Some(label) = shape.bullet_label() {
            self.bullets.release(label);
        }
    }

    /// Returns the background with all shapes composited over it.
    ///
    /// Rebuilds only when dirty; shapes whose inputs did not change reuse
    /// their cached raster.
    pub fn composite_overlay(&mut self, rc: &RenderContext) -> Result<&ImageSurface, cairo::Error> {
        if self.dirty {
            self.rebuild(rc)?;
            self.dirty = false;
        }
        Ok(&self.composite)
    }

    fn rebuild(&mut self, rc: &RenderContext) -> Result<(), cairo::Error> {
        {
            let ctx = cairo::Context::new(&self.overlay)?;
            ctx.set_operator(cairo::Operator::Clear);
            ctx.paint()?;
            ctx.set_operator(cairo::Operator::Over);
            for shape in &mut self.shapes {
                if shape.ensure_rendered(rc)? {
                    self.rasterized += 1;
                }
                shape.draw(&ctx, rc)?;
            }
        }
        self.overlay.flush();

        {
            let ctx = cairo::Context::new(&self.composite)?;
            ctx.set_operator(cairo::Operator::Source);
            ctx.set_source_surface(&self.background, 0.0, 0.0)?;
            ctx.paint()?;
            ctx.set_operator(cairo::Operator::Over);
            ctx.set_source_surface(&self.overlay, 0.0, 0.0)?;
            ctx.paint()?;
        }
        self.composite.flush();
        log::debug!("Composited {} shapes", self.shapes.len());
        Ok(())
    }
}
