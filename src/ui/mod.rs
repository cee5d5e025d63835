//! Window chrome drawn around the canvas.

pub mod icons;
pub mod toolbar;

pub use toolbar::{ClickOutcome, Icon, IconTarget, Toolbar, ToolbarButton};
