//! PNG encoding for captured images
//!
//! Every image the pipeline writes is a lossless PNG, so the only knob is
//! the compression level.
//!
//! # Examples
//!
//! ```
//! use screpo_core::{capture::ImageBuffer, util::encode::encode_png};
//!
//! let img = ImageBuffer::from_test_pattern(320, 200);
//! let png_bytes = encode_png(&img).unwrap();
//! assert_eq!(&png_bytes[1..4], b"PNG");
//! ```

use std::io::Cursor;

use image::{
    ImageEncoder,
    codecs::png::{CompressionType, FilterType, PngEncoder},
};

use crate::{
    capture::ImageBuffer,
    error::{CaptureError, CaptureResult},
};

/// Encodes an image as PNG with fast compression
///
/// Screenshots are written interactively right after a hotkey press, so the
/// encoder favours latency over file size.
pub fn encode_png(buffer: &ImageBuffer) -> CaptureResult<Vec<u8>> {
    encode_png_with_compression(buffer, CompressionType::Fast)
}

/// Encodes an image as PNG with the given compression level
///
/// Uses adaptive filtering. Output is always lossless.
///
/// ```
/// use image::codecs::png::CompressionType;
/// use screpo_core::{capture::ImageBuffer, util::encode::encode_png_with_compression};
///
/// let img = ImageBuffer::from_test_pattern(100, 100);
/// let best = encode_png_with_compression(&img, CompressionType::Best).unwrap();
/// assert_eq!(&best[1..4], b"PNG");
/// ```
pub fn encode_png_with_compression(
    buffer: &ImageBuffer,
    compression: CompressionType,
) -> CaptureResult<Vec<u8>> {
    let mut output = Vec::new();

    let encoder =
        PngEncoder::new_with_quality(Cursor::new(&mut output), compression, FilterType::Adaptive);

    let rgba = buffer.to_rgba8();
    let (width, height) = rgba.dimensions();

    if width == 0 || height == 0 {
        return Err(CaptureError::EncodingFailed {
            format: "png".to_string(),
            reason: "image has zero area".to_string(),
        });
    }

    encoder
        .write_image(rgba.as_raw(), width, height, image::ExtendedColorType::Rgba8)
        .map_err(|e| CaptureError::EncodingFailed {
            format: "png".to_string(),
            reason: e.to_string(),
        })?;

    Ok(output)
}

#[cfg(test)]
mod tests {
    use image::GenericImageView;

    use super::*;

    #[test]
    fn test_png_signature() {
        let img = ImageBuffer::from_test_pattern(64, 48);
        let bytes = encode_png(&img).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_png_is_lossless() {
        let img = ImageBuffer::from_test_pattern(64, 48);
        let bytes = encode_png(&img).unwrap();

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.dimensions(), (64, 48));
        assert_eq!(decoded.to_rgba8(), img.to_rgba8());
    }

    #[test]
    fn test_zero_area_rejected() {
        let img = ImageBuffer::new(image::DynamicImage::new_rgba8(0, 0));
        let err = encode_png(&img).unwrap_err();
        assert!(matches!(err, CaptureError::EncodingFailed { .. }));
    }
}
