//! Image buffer wrapper for captured pixels
//!
//! [`ImageBuffer`] wraps `image::DynamicImage` and is the raster type that
//! flows through the pipeline: produced by capture backends or the
//! clipboard, encoded once, written to disk.
//!
//! # Examples
//!
//! ```
//! use screpo_core::capture::ImageBuffer;
//!
//! let img = ImageBuffer::from_test_pattern(1920, 1080);
//! let cropped = img.crop(100, 100, 800, 400).unwrap();
//! assert_eq!(cropped.dimensions(), (800, 400));
//! ```

use image::GenericImageView;

use crate::error::{CaptureError, CaptureResult};

/// Wrapper around `image::DynamicImage`
///
/// Transformation methods return new `ImageBuffer` instances, leaving
/// the original unchanged. No method rescales pixels.
#[derive(Clone, Debug)]
pub struct ImageBuffer {
    inner: image::DynamicImage,
}

impl ImageBuffer {
    /// Creates a new ImageBuffer from a DynamicImage
    pub fn new(image: image::DynamicImage) -> Self {
        Self { inner: image }
    }

    /// Builds an image from tightly packed RGBA8 bytes
    ///
    /// This is the shape clipboard accessors hand over. Fails when the
    /// byte count does not match `width * height * 4`.
    ///
    /// # Examples
    ///
    /// ```
    /// use screpo_core::capture::ImageBuffer;
    ///
    /// let img = ImageBuffer::from_rgba(2, 1, vec![255; 8]).unwrap();
    /// assert_eq!(img.dimensions(), (2, 1));
    ///
    /// assert!(ImageBuffer::from_rgba(2, 2, vec![0; 3]).is_err());
    /// ```
    pub fn from_rgba(width: u32, height: u32, bytes: Vec<u8>) -> CaptureResult<Self> {
        let len = bytes.len();
        let rgba = image::RgbaImage::from_raw(width, height, bytes).ok_or_else(|| {
            CaptureError::PlatformFailure {
                reason: format!("{len} bytes do not form a {width}x{height} RGBA image"),
            }
        })?;
        Ok(Self::new(image::DynamicImage::ImageRgba8(rgba)))
    }

    /// Crops the image to a rectangle given in image coordinates
    ///
    /// Fails when the rectangle leaves the image. Pixels are copied, not
    /// resampled.
    pub fn crop(&self, x: u32, y: u32, width: u32, height: u32) -> CaptureResult<Self> {
        let (img_width, img_height) = self.dimensions();

        let fits = u64::from(x) + u64::from(width) <= u64::from(img_width)
            && u64::from(y) + u64::from(height) <= u64::from(img_height);
        if width == 0 || height == 0 || !fits {
            return Err(CaptureError::PlatformFailure {
                reason: format!(
                    "crop {}x{} at {},{} extends beyond image bounds ({}x{})",
                    width, height, x, y, img_width, img_height
                ),
            });
        }

        Ok(Self::new(self.inner.crop_imm(x, y, width, height)))
    }

    /// Returns the dimensions of the image as (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        self.inner.dimensions()
    }

    /// Returns the image width in pixels
    pub fn width(&self) -> u32 {
        self.dimensions().0
    }

    /// Returns the image height in pixels
    pub fn height(&self) -> u32 {
        self.dimensions().1
    }

    /// Converts the image to RGBA8 format
    pub fn to_rgba8(&self) -> image::RgbaImage {
        self.inner.to_rgba8()
    }

    /// Creates a test pattern image with the specified dimensions
    ///
    /// Vertical gradient from blue (top) to cyan (bottom). Used by the mock
    /// backend and in tests.
    pub fn from_test_pattern(width: u32, height: u32) -> Self {
        use image::{ImageBuffer as ImgBuf, Rgba};

        let start_color = Rgba([0u8, 0u8, 255u8, 255u8]);
        let end_color = Rgba([0u8, 255u8, 255u8, 255u8]);

        let img = ImgBuf::from_fn(width, height, |_x, y| {
            let ratio = y as f32 / height.max(1) as f32;
            Rgba([
                (start_color[0] as f32 * (1.0 - ratio) + end_color[0] as f32 * ratio) as u8,
                (start_color[1] as f32 * (1.0 - ratio) + end_color[1] as f32 * ratio) as u8,
                (start_color[2] as f32 * (1.0 - ratio) + end_color[2] as f32 * ratio) as u8,
                255,
            ])
        });

        Self::new(image::DynamicImage::ImageRgba8(img))
    }
}

impl From<image::RgbaImage> for ImageBuffer {
    fn from(image: image::RgbaImage) -> Self {
        Self::new(image::DynamicImage::ImageRgba8(image))
    }
}
