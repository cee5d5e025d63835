//! Error type for exporting the annotated image.

use thiserror::Error;

use crate::draw::pixels::PixelError;

/// Errors that can occur while saving or copying the annotated image.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write image: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Failed to read back the composited image: {0}")]
    Pixels(#[from] PixelError),

    #[error("Clipboard operation failed: {0}")]
    Clipboard(String),

    #[error("Unsupported output format for '{0}' (use .png, .jpg or .jpeg)")]
    UnsupportedFormat(String),
}

impl From<cairo::Error> for ExportError {
    fn from(err: cairo::Error) -> Self {
        ExportError::Pixels(PixelError::Cairo(err))
    }
}
