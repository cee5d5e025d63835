//! Conversion between straight-alpha RGBA images and Cairo ARGB32 surfaces.
//!
//! Cairo stores premultiplied alpha in native-endian 32-bit words; the
//! `image` crate works with straight alpha bytes. Opaque pixels survive a
//! round trip unchanged.

use std::path::Path;

use cairo::{Format, ImageSurface};
use image::RgbaImage;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PixelError {
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Cairo error: {0}")]
    Cairo(#[from] cairo::Error),

    #[error("Surface data is not accessible: {0}")]
    Borrow(#[from] cairo::BorrowError),

    #[error("Image dimensions {width}x{height} are not supported")]
    Dimensions { width: u32, height: u32 },

    #[error("Unsupported surface format {0:?}")]
    Format(Format),
}

/// Decodes an image file into a Cairo surface used as the canvas background.
pub fn load_background(path: &Path) -> Result<ImageSurface, PixelError> {
    let image = image::open(path)?.to_rgba8();
    log::debug!(
        "Decoded {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );
    surface_from_rgba(&image)
}

/// Copies an RGBA image into a new ARGB32 surface.
pub fn surface_from_rgba(image: &RgbaImage) -> Result<ImageSurface, PixelError> {
    let (w, h) = image.dimensions();
    let (Ok(width), Ok(height)) = (i32::try_from(w), i32::try_from(h)) else {
        return Err(PixelError::Dimensions {
            width: w,
            height: h,
        });
    };

    let mut surface = ImageSurface::create(Format::ARgb32, width, height)?;
    let stride = surface.stride() as usize;
    {
        let mut data = surface.data()?;
        for (y, row) in image.rows().enumerate() {
            let line = &mut data[y * stride..y * stride + w as usize * 4];
            for (pixel, out) in row.zip(line.chunks_exact_mut(4)) {
                out.copy_from_slice(&premultiply(pixel.0).to_ne_bytes());
            }
        }
    }
    Ok(surface)
}

/// Copies an ARGB32 surface into a straight-alpha RGBA image.
pub fn rgba_from_surface(surface: &ImageSurface) -> Result<RgbaImage, PixelError> {
    if surface.format() != Format::ARgb32 {
        return Err(PixelError::Format(surface.format()));
    }
    let width = surface.width().max(0) as u32;
    let height = surface.height().max(0) as u32;
    let stride = surface.stride() as usize;
    let mut image = RgbaImage::new(width, height);

    surface.flush();
    surface.with_data(|data| {
        for (y, row) in image.rows_mut().enumerate() {
            let line = &data[y * stride..y * stride + width as usize * 4];
            for (pixel, bytes) in row.zip(line.chunks_exact(4)) {
                let word = u32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
                pixel.0 = unpremultiply(word);
            }
        }
    })?;
    Ok(image)
}

/// Straight RGBA bytes to a premultiplied ARGB word.
fn premultiply([r, g, b, a]: [u8; 4]) -> u32 {
    let scale = |c: u8| (c as u32 * a as u32 + 127) / 255;
    (a as u32) << 24 | scale(r) << 16 | scale(g) << 8 | scale(b)
}

/// Premultiplied ARGB word to straight RGBA bytes.
fn unpremultiply(word: u32) -> [u8; 4] {
    let a = (word >> 24) & 0xff;
    if a == 0 {
        return [0, 0, 0, 0];
    }
    let scale = |c: u32| ((c * 255 + a / 2) / a).min(255) as u8;
    [
        scale((word >> 16) & 0xff),
        scale((word >> 8) & 0xff),
        scale(word & 0xff),
        a as u8,
    ]
}
