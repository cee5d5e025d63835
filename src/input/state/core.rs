//! Drawing state machine and input state management.

use crate::config::{Action, KeyBinding};
use crate::draw::{Canvas, DirtyTracker, RenderContext};
use crate::input::{modifiers::Modifiers, tool::Tool};
use crate::ui::Toolbar;
use crate::util::{Point, Rect};
use std::collections::HashMap;

/// Current drawing mode state machine.
///
/// Tracks whether the user is idle or dragging out a new shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawingState {
    /// Not actively drawing - waiting for user input
    Idle,
    /// Mouse button held down over the canvas; the last shape follows the pointer
    Dragging {
        /// Which tool created the shape being dragged
        tool: Tool,
    },
}

/// Export requested from the keyboard or a toolbar button.
///
/// The controller has no access to files or the clipboard; the backend
/// takes the request and performs it on the composited image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportRequest {
    Save,
    Copy,
}

/// Main input state containing all annotation session state.
///
/// The window shows the toolbar as a strip at the top and the canvas below
/// it. Window coordinates are routed to one or the other; canvas
/// coordinates are window coordinates shifted up by the toolbar height.
pub struct InputState {
    /// Background image and shapes drawn on it
    pub canvas: Canvas,
    /// Tool/colour selection and action buttons
    pub toolbar: Toolbar,
    /// Widget scale and label font used for every shape rasterization
    pub render_context: RenderContext,
    /// Current modifier key state
    pub modifiers: Modifiers,
    /// Current drawing mode state machine
    pub state: DrawingState,
    /// Whether user requested to exit
    pub should_exit: bool,
    /// Whether the display needs to be redrawn
    pub needs_redraw: bool,
    /// Window-space damage gathered for the next presented frame
    pub(crate) dirty_tracker: DirtyTracker,
    /// Keybinding action map for efficient lookup
    action_map: HashMap<KeyBinding, Action>,
    /// Pending export (to be handled by the backend)
    pending_export: Option<ExportRequest>,
}

impl InputState {
    /// Creates the controller for `canvas`.
    ///
    /// The toolbar is laid out for the canvas width and the first frame is
    /// marked for a full repaint.
    pub fn new(
        canvas: Canvas,
        render_context: RenderContext,
        action_map: HashMap<KeyBinding, Action>,
    ) -> Self {
        let mut toolbar = Toolbar::new(canvas.width());
        toolbar.set_large_widgets(render_context.scale.is_large());

        let mut dirty_tracker = DirtyTracker::new();
        dirty_tracker.mark_full();

        Self {
            canvas,
            toolbar,
            render_context,
            modifiers: Modifiers::new(),
            state: DrawingState::Idle,
            should_exit: false,
            needs_redraw: true,
            dirty_tracker,
            action_map,
            pending_export: None,
        }
    }

    /// Window size in pixels: canvas size plus the toolbar strip.
    pub fn window_size(&self) -> (i32, i32) {
        (
            self.canvas.width(),
            self.canvas.height() + self.toolbar.height(),
        )
    }

    pub fn toolbar_height(&self) -> i32 {
        self.toolbar.height()
    }

    /// Returns true when window row `y` lies on the toolbar strip.
    pub fn is_over_toolbar(&self, y: i32) -> bool {
        y < self.toolbar.height()
    }

    /// Converts window coordinates to canvas coordinates.
    pub fn to_canvas(&self, x: i32, y: i32) -> Point {
        Point::new(x, y - self.toolbar.height())
    }

    /// Window-space rectangle covered by the canvas.
    pub fn canvas_area(&self) -> Rect {
        self.canvas.bounds().translate(0, self.toolbar.height())
    }

    /// Returns the tool used for new shapes.
    pub fn active_tool(&self) -> Tool {
        match self.state {
            DrawingState::Dragging { tool } => tool,
            DrawingState::Idle => self.toolbar.selected_tool(),
        }
    }

    /// Marks the whole window for repainting.
    ///
    /// Called after (re)configure, when the compositor may have dropped the
    /// previous buffer contents.
    pub fn force_full_redraw(&mut self) {
        self.dirty_tracker.mark_full();
        self.toolbar.mark_dirty();
        self.needs_redraw = true;
    }

    /// Takes and clears any pending export request.
    pub fn take_pending_export(&mut self) -> Option<ExportRequest> {
        self.pending_export.take()
    }

    /// Stores an export request for retrieval by the backend.
    pub(super) fn set_pending_export(&mut self, request: ExportRequest) {
        log::debug!("Export {:?} pending for backend", request);
        self.pending_export = Some(request);
    }

    /// Look up an action for the given key and the held modifiers.
    pub(super) fn find_action(&self, key_str: &str) -> Option<Action> {
        self.action_map
            .iter()
            .find(|(binding, _)| {
                binding.matches(
                    key_str,
                    self.modifiers.ctrl,
                    self.modifiers.shift,
                    self.modifiers.alt,
                )
            })
            .map(|(_, action)| *action)
    }

    /// Selects the tool for subsequent shapes.
    pub fn select_tool(&mut self, tool: Tool) {
        self.toolbar.select_tool(tool);
        if self.toolbar.is_dirty() {
            self.needs_redraw = true;
        }
    }

    /// Removes the most recent shape, ending any drag in progress.
    pub fn undo(&mut self) {
        self.state = DrawingState::Idle;
        if self.canvas.undo_last(&self.render_context) {
            self.needs_redraw = true;
        }
    }

    /// Removes every shape.
    pub fn clear(&mut self) {
        self.state = DrawingState::Idle;
        if !self.canvas.is_empty() {
            self.canvas.clear_all();
            self.needs_redraw = true;
        }
    }

    /// Switches between normal and large widgets.
    ///
    /// Existing shapes are re-rasterized at the new scale, so the canvas is
    /// only invalidated when it has something to redraw.
    pub fn toggle_widget_scale(&mut self) {
        self.render_context.scale = self.render_context.scale.toggled();
        self.toolbar
            .set_large_widgets(self.render_context.scale.is_large());
        if !self.canvas.is_empty() {
            self.canvas.mark_dirty();
        }
        self.needs_redraw = true;
        log::info!(
            "Widget scale set to {}",
            self.render_context.scale.factor()
        );
    }
}
