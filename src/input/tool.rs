//! Shape tool selection.

/// Kind of shape created when the user presses on the canvas.
///
/// Chosen from the toolbar's shape icons or with the R/A/E shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tool {
    /// Filled rectangle dragged corner to corner
    #[default]
    Rectangle,
    /// Arrow dragged from tail to head
    Arrow,
    /// Numbered bullet placed at the press position
    Bullet,
}

impl Tool {
    /// Tools in toolbar order.
    pub const ALL: [Tool; 3] = [Tool::Rectangle, Tool::Arrow, Tool::Bullet];

    pub fn name(self) -> &'static str {
        match self {
            Tool::Rectangle => "rectangle",
            Tool::Arrow => "arrow",
            Tool::Bullet => "bullet",
        }
    }
}
