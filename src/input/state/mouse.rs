use crate::input::events::MouseButton;
use crate::ui::{ClickOutcome, ToolbarButton};

use super::{DrawingState, ExportRequest, InputState};

impl InputState {
    /// Processes a mouse button press event.
    ///
    /// # Arguments
    /// * `button` - Which mouse button was pressed
    /// * `x` - Mouse X coordinate in window space
    /// * `y` - Mouse Y coordinate in window space
    ///
    /// # Behavior
    /// - Left click on the toolbar: selects a tool/colour or runs a button
    /// - Left click on the canvas while Idle: starts a new shape
    /// - Right click while dragging: discards the shape being dragged
    pub fn on_mouse_press(&mut self, button: MouseButton, x: i32, y: i32) {
        match button {
            MouseButton::Left => {
                if self.is_over_toolbar(y) {
                    self.on_toolbar_click(x, y);
                    return;
                }

                if matches!(self.state, DrawingState::Idle) {
                    let tool = self.toolbar.selected_tool();
                    let color = self.toolbar.selected_color();
                    let pos = self.to_canvas(x, y);
                    self.canvas
                        .add_shape(tool, color, pos, &self.render_context);
                    self.state = DrawingState::Dragging { tool };
                    self.needs_redraw = true;
                }
            }
            MouseButton::Right => {
                if matches!(self.state, DrawingState::Dragging { .. }) {
                    self.undo();
                }
            }
            MouseButton::Middle => {}
        }
    }

    /// Processes mouse motion events.
    ///
    /// While dragging, the active shape's end follows the pointer, even when
    /// it leaves the canvas area.
    pub fn on_mouse_motion(&mut self, x: i32, y: i32) {
        if let DrawingState::Dragging { .. } = self.state {
            let pos = self.to_canvas(x, y);
            self.canvas
                .update_active_shape_end(pos, &self.render_context);
            if self.canvas.is_dirty() {
                self.needs_redraw = true;
            }
        }
    }

    /// Processes mouse button release events.
    ///
    /// Releasing the left button finalizes the dragged shape and returns to
    /// Idle.
    pub fn on_mouse_release(&mut self, button: MouseButton, x: i32, y: i32) {
        if button != MouseButton::Left {
            return;
        }

        if let DrawingState::Dragging { tool } = self.state {
            let pos = self.to_canvas(x, y);
            self.canvas.finalize_drag(pos, &self.render_context);
            self.state = DrawingState::Idle;
            self.needs_redraw = true;
            log::debug!("Finished {} at ({}, {})", tool.name(), pos.x, pos.y);
        }
    }

    fn on_toolbar_click(&mut self, x: i32, y: i32) {
        let outcome = self.toolbar.handle_click(x, y);
        if let ClickOutcome::Button(button) = outcome {
            self.run_button(button);
        }
        if outcome.consumed() {
            self.needs_redraw = true;
        }
    }

    /// Executes a toolbar action button.
    pub fn run_button(&mut self, button: ToolbarButton) {
        match button {
            ToolbarButton::Undo => self.undo(),
            ToolbarButton::Copy => self.set_pending_export(ExportRequest::Copy),
            ToolbarButton::Save => self.set_pending_export(ExportRequest::Save),
            ToolbarButton::ToggleScale => self.toggle_widget_scale(),
            ToolbarButton::Clear => self.clear(),
        }
    }
}
