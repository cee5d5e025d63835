use anyhow::Result;
use std::path::PathBuf;

use imgmark::input::InputState;

pub mod wayland;

/// Settings the window needs besides the controller.
pub struct BackendOptions {
    /// Destination of the save action
    pub output_path: PathBuf,
    /// Window title
    pub title: String,
}

/// Run the Wayland window until the user quits.
///
/// Returns the controller so the caller can export the final image.
pub fn run_wayland(input_state: InputState, options: BackendOptions) -> Result<InputState> {
    let backend = wayland::WaylandBackend::new(options);
    backend.run(input_state)
}
