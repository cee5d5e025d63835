use cairo::ImageSurface;

use crate::util::Rect;

use super::InputState;

impl InputState {
    /// Paints everything that changed since the last frame into `frame`.
    ///
    /// `frame` is the persistent window back-buffer. The toolbar is repainted
    /// when its state changed; the canvas only inside the area its shapes
    /// touched. Returns the window-space rectangles to report as damage.
    pub fn render_frame(&mut self, frame: &ImageSurface) -> Result<Vec<Rect>, cairo::Error> {
        let (width, height) = self.window_size();
        let toolbar_height = self.toolbar.height();
        let full = self.dirty_tracker.is_full();

        log::debug!("Render starting (full: {full})");

        {
            let ctx = cairo::Context::new(frame)?;

            if full || self.toolbar.is_dirty() {
                self.toolbar.render(&ctx, &self.render_context)?;
                self.dirty_tracker.mark_rect(self.toolbar.bounds());
            }

            // A failed composite keeps the damage for the next frame
            self.canvas.composite_overlay(&self.render_context)?;
            let damage = self.canvas.take_damage();
            let canvas_bounds = self.canvas.bounds();
            let composite = self.canvas.composite_overlay(&self.render_context)?;

            let region = if full { Some(canvas_bounds) } else { damage };
            if let Some(rect) = region {
                let target = rect.translate(0, toolbar_height);
                ctx.save()?;
                ctx.rectangle(
                    target.x as f64,
                    target.y as f64,
                    target.width as f64,
                    target.height as f64,
                );
                ctx.clip();
                ctx.set_operator(cairo::Operator::Source);
                ctx.set_source_surface(composite, 0.0, toolbar_height as f64)?;
                ctx.paint()?;
                ctx.restore()?;
                self.dirty_tracker.mark_rect(target);
            }
        }
        frame.flush();

        self.needs_redraw = false;
        let regions = self.dirty_tracker.take_regions(width, height);
        log::debug!("Render complete, {} damage region(s)", regions.len());
        Ok(regions)
    }

    /// Background with all shapes composited over it, as exported.
    pub fn composited_image(&mut self) -> Result<&ImageSurface, cairo::Error> {
        self.canvas.composite_overlay(&self.render_context)
    }
}
