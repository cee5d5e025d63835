//! Exporting the annotated image.
//!
//! The composited canvas can be saved to a file (format picked from the
//! extension) or handed to the session clipboard as PNG.

pub mod clipboard;
pub mod file;
pub mod types;

pub use clipboard::{ClipboardBackend, copy_to_clipboard};
pub use file::{encode_png, save_surface};
pub use types::ExportError;

use cairo::ImageSurface;

/// Encodes `surface` as PNG and copies it to the clipboard.
pub fn copy_surface(surface: &ImageSurface) -> Result<(), ExportError> {
    let bytes = encode_png(surface)?;
    copy_to_clipboard(&bytes)
}
