//! Pure image encoding logic: functional core.
//!
//! This module has zero infrastructure dependencies. It takes a frame in
//! and returns the base64 JPEG the vision API expects.

use base64::{engine::general_purpose::STANDARD, Engine};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ExtendedColorType};

/// Scales `(width, height)` so the longest side is at most `max_dim`,
/// keeping the aspect ratio. Sizes already within bounds are unchanged.
pub fn fit_within(width: u32, height: u32, max_dim: u32) -> (u32, u32) {
    if width <= max_dim && height <= max_dim {
        return (width, height);
    }
    let scale = max_dim as f64 / width.max(height) as f64;
    let new_w = ((width as f64 * scale).round() as u32).clamp(1, max_dim);
    let new_h = ((height as f64 * scale).round() as u32).clamp(1, max_dim);
    (new_w, new_h)
}

/// Downscales `image` to fit `max_dim`, encodes it as JPEG at `quality`
/// (1–100), and returns the base64 text.
pub fn encode_jpeg_base64(
    image: &DynamicImage,
    max_dim: u32,
    quality: u8,
) -> Result<String, EncodeError> {
    let (width, height) = (image.width(), image.height());
    if width == 0 || height == 0 {
        return Err(EncodeError::ZeroDimension);
    }

    let (new_w, new_h) = fit_within(width, height, max_dim);
    let rgb = if (new_w, new_h) == (width, height) {
        image.to_rgb8()
    } else {
        log::info!(
            "[CAPTURE] Resizing {}x{} -> {}x{} for upload",
            width, height, new_w, new_h
        );
        image.resize_exact(new_w, new_h, FilterType::Lanczos3).to_rgb8()
    };

    let mut jpeg_bytes: Vec<u8> = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg_bytes, quality.clamp(1, 100))
        .encode(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(STANDARD.encode(&jpeg_bytes))
}

#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("Image has zero width or height")]
    ZeroDimension,

    #[error("JPEG encoding failed: {0}")]
    EncodingFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    #[test]
    fn small_sizes_unchanged() {
        assert_eq!(fit_within(800, 600, 1024), (800, 600));
        assert_eq!(fit_within(1024, 1024, 1024), (1024, 1024));
    }

    #[test]
    fn landscape_scaled_by_width() {
        assert_eq!(fit_within(1920, 1080, 1024), (1024, 576));
    }

    #[test]
    fn portrait_scaled_by_height() {
        assert_eq!(fit_within(1080, 2160, 1024), (512, 1024));
    }

    #[test]
    fn extreme_aspect_keeps_one_pixel() {
        assert_eq!(fit_within(10_000, 2, 1024), (1024, 1));
    }

    #[test]
    fn encodes_jpeg() {
        let img = DynamicImage::ImageRgba8(RgbaImage::new(1920, 1080));
        let b64 = encode_jpeg_base64(&img, 1024, 85).unwrap();
        let bytes = STANDARD.decode(b64).unwrap();
        // JPEG SOI marker
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (1024, 576));
    }

    #[test]
    fn zero_dimension_fails() {
        let img = DynamicImage::ImageRgba8(RgbaImage::new(0, 10));
        let result = encode_jpeg_base64(&img, 1024, 85);
        assert!(matches!(result, Err(EncodeError::ZeroDimension)));
    }
}
