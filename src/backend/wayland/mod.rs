// xdg-shell window backend: one fixed-size toplevel showing the toolbar and canvas.
mod backend;
mod handlers;
mod state;
mod surface;

pub use backend::WaylandBackend;
