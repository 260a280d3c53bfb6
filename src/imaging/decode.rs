//! Image decoding using the `image` crate.

use crate::error::{Error, Result};
use image::{DynamicImage, ImageReader};
use std::path::Path;

/// Decode an image file into a bitmap.
///
/// The format is guessed from the file contents rather than the extension,
/// so camera exports with misleading suffixes still decode.
pub fn decode_image_file(path: &Path) -> Result<DynamicImage> {
    let reader = ImageReader::open(path).map_err(|e| Error::ImageOpen {
        path: path.to_path_buf(),
        source: e,
    })?;

    let reader = reader.with_guessed_format().map_err(|e| Error::ImageOpen {
        path: path.to_path_buf(),
        source: e,
    })?;

    reader.decode().map_err(|e| Error::InvalidImage {
        reason: format!("{}: {e}", path.display()),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage};
    use std::io::Cursor;
    use tempfile::TempDir;

    fn encoded_png(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(
            width,
            height,
            image::Rgb([200, 40, 90]),
        ));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_decode_png_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("daisy.png");
        std::fs::write(&path, encoded_png(12, 7)).unwrap();

        let img = decode_image_file(&path).unwrap();
        assert_eq!((img.width(), img.height()), (12, 7));
    }

    #[test]
    fn test_decode_ignores_misleading_extension() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("daisy.jpg");
        std::fs::write(&path, encoded_png(3, 3)).unwrap();

        assert!(decode_image_file(&path).is_ok());
    }

    #[test]
    fn test_decode_missing_file() {
        let result = decode_image_file(Path::new("/nonexistent/flower.png"));
        assert!(matches!(result, Err(Error::ImageOpen { .. })));
    }

    #[test]
    fn test_decode_garbage_is_invalid_image() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("daisy.png");
        std::fs::write(&path, b"definitely not an image").unwrap();

        let result = decode_image_file(&path);
        assert!(matches!(result, Err(Error::InvalidImage { .. })));
    }
}
