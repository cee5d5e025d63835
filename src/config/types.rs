//! Configuration type definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default destination of the save action.
pub const DEFAULT_OUTPUT_PATH: &str = "/tmp/annotated.jpg";

/// Default snap grid in pixels.
pub const DEFAULT_GRID_SIZE: u32 = 8;

/// Largest accepted snap grid.
pub const MAX_GRID_SIZE: u32 = 256;

/// Drawing-related settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawingConfig {
    /// Snap grid in pixels; 0 disables snapping (valid range: 0 - 256)
    #[serde(default = "default_grid_size")]
    pub grid_size: u32,

    /// Start with large widgets (thicker strokes, bigger bullets)
    #[serde(default)]
    pub large_widgets: bool,

    /// Font family for bullet labels (e.g., "Sans", "DejaVu Sans")
    #[serde(default = "default_font_family")]
    pub font_family: String,

    /// Font weight for bullet labels ("normal", "bold", ... or 100-900)
    #[serde(default = "default_font_weight")]
    pub font_weight: String,
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self {
            grid_size: default_grid_size(),
            large_widgets: false,
            font_family: default_font_family(),
            font_weight: default_font_weight(),
        }
    }
}

/// Export settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// File written by the save action; the extension picks the format
    #[serde(default = "default_output_path")]
    pub path: PathBuf,

    /// Copy the annotated image to the clipboard when the window closes
    #[serde(default = "default_copy_on_exit")]
    pub copy_on_exit: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            copy_on_exit: default_copy_on_exit(),
        }
    }
}

fn default_grid_size() -> u32 {
    DEFAULT_GRID_SIZE
}

fn default_font_family() -> String {
    "Sans".to_string()
}

fn default_font_weight() -> String {
    "bold".to_string()
}

fn default_output_path() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_PATH)
}

fn default_copy_on_exit() -> bool {
    true
}
