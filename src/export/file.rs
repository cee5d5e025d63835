//! Writing the annotated image to disk.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use cairo::ImageSurface;
use image::{DynamicImage, ImageFormat};

use super::types::ExportError;
use crate::draw::pixels;

/// Picks the encoder from the file extension.
///
/// Only PNG and JPEG are supported; anything else is an error rather than a
/// silent fallback.
pub fn format_for_path(path: &Path) -> Result<ImageFormat, ExportError> {
    match ImageFormat::from_path(path) {
        Ok(format @ (ImageFormat::Png | ImageFormat::Jpeg)) => Ok(format),
        _ => Err(ExportError::UnsupportedFormat(path.display().to_string())),
    }
}

/// Saves `surface` to `path`, creating the parent directory if needed.
///
/// JPEG output drops the alpha channel.
pub fn save_surface(surface: &ImageSurface, path: &Path) -> Result<(), ExportError> {
    let format = format_for_path(path)?;
    let rgba = pixels::rgba_from_surface(surface)?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        log::info!("Creating output directory: {}", parent.display());
        fs::create_dir_all(parent)?;
    }

    log::info!(
        "Saving annotated image to: {} ({}x{}, {:?})",
        path.display(),
        rgba.width(),
        rgba.height(),
        format
    );

    match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgba8(rgba)
            .to_rgb8()
            .save_with_format(path, ImageFormat::Jpeg)?,
        _ => rgba.save_with_format(path, format)?,
    }

    let written_size = fs::metadata(path)?.len();
    log::debug!("File written: {} bytes", written_size);
    Ok(())
}

/// Encodes `surface` as PNG bytes for the clipboard.
pub fn encode_png(surface: &ImageSurface) -> Result<Vec<u8>, ExportError> {
    let rgba = pixels::rgba_from_surface(surface)?;
    let mut bytes = Vec::new();
    rgba.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    log::debug!("Encoded {}x{} PNG ({} bytes)", rgba.width(), rgba.height(), bytes.len());
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cairo::Format;
    use std::path::PathBuf;

    fn solid_surface(width: i32, height: i32) -> ImageSurface {
        let surface = ImageSurface::create(Format::ARgb32, width, height).unwrap();
        {
            let ctx = cairo::Context::new(&surface).unwrap();
            ctx.set_source_rgb(1.0, 0.0, 0.0);
            ctx.paint().unwrap();
        }
        surface
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(
            format_for_path(&PathBuf::from("/tmp/a.PNG")).unwrap(),
            ImageFormat::Png
        );
        assert_eq!(
            format_for_path(&PathBuf::from("out.jpeg")).unwrap(),
            ImageFormat::Jpeg
        );
        assert_eq!(
            format_for_path(&PathBuf::from("out.jpg")).unwrap(),
            ImageFormat::Jpeg
        );
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = format_for_path(&PathBuf::from("out.xyz")).unwrap_err();
        assert!(matches!(err, ExportError::UnsupportedFormat(_)));
        assert!(format_for_path(&PathBuf::from("no_extension")).is_err());
    }

    #[test]
    fn saves_png_with_exact_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.png");
        save_surface(&solid_surface(6, 4), &path).unwrap();

        let image = image::open(&path).unwrap().to_rgba8();
        assert_eq!(image.dimensions(), (6, 4));
        assert_eq!(image.get_pixel(3, 2).0, [255, 0, 0, 255]);
    }

    #[test]
    fn saves_jpeg_without_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jpg");
        save_surface(&solid_surface(16, 16), &path).unwrap();

        let image = image::open(&path).unwrap();
        assert_eq!((image.width(), image.height()), (16, 16));
        assert!(!image.color().has_alpha());
    }

    #[test]
    fn encode_png_produces_png_signature() {
        let bytes = encode_png(&solid_surface(2, 2)).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (2, 2));
    }
}
