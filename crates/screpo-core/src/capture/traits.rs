//! Capability traits for screen capture backends
//!
//! - [`ScreenCapture`]: copy the pixels of a region
//! - [`MonitorEnumerator`]: list the monitors a user can pick from
//!
//! The pipeline depends only on these traits, never on a concrete
//! platform binding.

use async_trait::async_trait;

use super::ImageBuffer;
use crate::error::CaptureResult;
use crate::model::{CaptureRegion, MonitorInfo};

/// Capability: backend can capture a region of the screen.
#[async_trait]
pub trait ScreenCapture: Send + Sync {
    /// Captures the pixels inside `region`.
    ///
    /// The returned buffer is exactly `region.width × region.height`. Display
    /// scaling is never applied.
    ///
    /// # Errors
    ///
    /// - [`CaptureError::EmptyRegion`](crate::error::CaptureError::EmptyRegion)
    ///   - zero width or height
    /// - [`CaptureError::RegionOffScreen`](crate::error::CaptureError::RegionOffScreen)
    ///   - no monitor contains the region
    /// - [`CaptureError::PlatformFailure`](crate::error::CaptureError::PlatformFailure)
    ///   - the platform call failed
    async fn capture(&self, region: &CaptureRegion) -> CaptureResult<ImageBuffer>;
}

/// Capability: backend can enumerate monitors.
#[async_trait]
pub trait MonitorEnumerator: Send + Sync {
    /// Lists monitors in platform order.
    async fn list_monitors(&self) -> CaptureResult<Vec<MonitorInfo>>;

    /// Returns the monitor at `index` in [`list_monitors`](Self::list_monitors) order.
    async fn monitor_at(&self, index: usize) -> CaptureResult<MonitorInfo> {
        let monitors = self.list_monitors().await?;
        let available = monitors.len();
        monitors
            .into_iter()
            .nth(index)
            .ok_or(crate::error::CaptureError::MonitorNotFound { index, available })
    }
}

/// Rejects regions no platform can capture.
///
/// Backends call this before touching the platform so a zero-area region
/// never reaches the OS.
pub fn validate_region(region: &CaptureRegion) -> CaptureResult<()> {
    if region.is_empty() {
        return Err(crate::error::CaptureError::EmptyRegion { region: *region });
    }
    Ok(())
}

/// Verifies a captured buffer has exactly the region's dimensions.
pub fn ensure_dimensions(region: &CaptureRegion, image: &ImageBuffer) -> CaptureResult<()> {
    let (actual_width, actual_height) = image.dimensions();
    if (actual_width, actual_height) != (region.width, region.height) {
        return Err(crate::error::CaptureError::DimensionMismatch {
            expected_width: region.width,
            expected_height: region.height,
            actual_width,
            actual_height,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CaptureError;

    #[test]
    fn test_validate_region() {
        assert!(validate_region(&CaptureRegion::new(0, 0, 1, 1)).is_ok());
        assert!(matches!(
            validate_region(&CaptureRegion::new(5, 5, 0, 10)),
            Err(CaptureError::EmptyRegion { .. })
        ));
    }

    #[test]
    fn test_ensure_dimensions() {
        let region = CaptureRegion::new(0, 0, 64, 32);
        assert!(ensure_dimensions(&region, &ImageBuffer::from_test_pattern(64, 32)).is_ok());

        let err = ensure_dimensions(&region, &ImageBuffer::from_test_pattern(128, 64)).unwrap_err();
        assert!(matches!(
            err,
            CaptureError::DimensionMismatch {
                actual_width: 128,
                actual_height: 64,
                ..
            }
        ));
    }
}
