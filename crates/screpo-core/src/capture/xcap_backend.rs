//! Screen capture backend using xcap
//!
//! xcap wraps the native capture APIs (GDI/DXGI on Windows, CoreGraphics on
//! macOS, X11/portal on Linux) behind one monitor type. All xcap calls are
//! synchronous, so they run under `spawn_blocking` with a timeout.
//!
//! Captures are a direct pixel copy: the monitor is captured at its
//! physical resolution and cropped to the region. Pixels are never
//! resampled.
//!
//! Monitor origins stay in the platform's desktop coordinates (they are what
//! `Monitor::from_point` expects). Extents are physical pixels. macOS reports
//! bounds in points, so there the extent is multiplied by the scale factor
//! once, when the monitor is described.

use std::time::Duration;

use async_trait::async_trait;
use xcap::Monitor;

use super::{
    ImageBuffer, MonitorEnumerator, ScreenCapture,
    traits::{ensure_dimensions, validate_region},
};
use crate::{
    error::{CaptureError, CaptureResult},
    model::{BackendType, CaptureRegion, MonitorInfo},
    util::detect::detect_platform,
};

/// Upper bound for a single platform capture call
///
/// Native captures complete well under a second; the margin covers a
/// first-use permission prompt on macOS and Wayland.
const CAPTURE_TIMEOUT_MS: u64 = 5000;

/// Whether xcap reports monitor bounds in logical points instead of pixels
const REPORTS_LOGICAL_BOUNDS: bool = cfg!(target_os = "macos");

/// Screen capture backend built on xcap
#[derive(Debug, Clone)]
pub struct XcapBackend {
    backend: BackendType,
}

impl XcapBackend {
    /// Creates a backend for the detected display server
    pub fn new() -> CaptureResult<Self> {
        let platform = detect_platform();
        if platform.backend == BackendType::None {
            return Err(CaptureError::BackendNotAvailable {
                backend: BackendType::None,
            });
        }
        tracing::debug!("xcap backend on {} ({})", platform.os, platform.backend);
        Ok(Self {
            backend: platform.backend,
        })
    }

    /// Display backend this instance reports in errors
    pub fn backend_type(&self) -> BackendType {
        self.backend
    }

    async fn with_timeout<T, F>(future: F, timeout_ms: u64) -> CaptureResult<T>
    where
        F: std::future::Future<Output = CaptureResult<T>>,
    {
        tokio::time::timeout(Duration::from_millis(timeout_ms), future)
            .await
            .map_err(|_| CaptureError::CaptureTimeout {
                duration_ms: timeout_ms,
            })?
    }

    fn describe(monitor: &Monitor, backend: BackendType) -> CaptureResult<MonitorInfo> {
        let map = |e: xcap::XCapError| map_xcap_error(&e.to_string(), backend);
        let scale_factor = monitor.scale_factor().unwrap_or(1.0);

        let reported = CaptureRegion::new(
            monitor.x().map_err(map)?,
            monitor.y().map_err(map)?,
            monitor.width().map_err(map)?,
            monitor.height().map_err(map)?,
        );

        Ok(MonitorInfo {
            id:         monitor.id().map_err(map)?,
            name:       monitor.name().map_err(map)?,
            region:     physical_bounds(reported, scale_factor, REPORTS_LOGICAL_BOUNDS),
            scale_factor,
            is_primary: monitor.is_primary().unwrap_or(false),
        })
    }

    fn capture_blocking(region: CaptureRegion, backend: BackendType) -> CaptureResult<ImageBuffer> {
        let map = |e: xcap::XCapError| map_xcap_error(&e.to_string(), backend);

        let monitor = Monitor::from_point(region.x, region.y).map_err(|e| {
            tracing::warn!("No monitor at ({}, {}): {}", region.x, region.y, e);
            CaptureError::RegionOffScreen { region }
        })?;
        let info = Self::describe(&monitor, backend)?;
        let pixels_per_unit = if REPORTS_LOGICAL_BOUNDS {
            info.scale_factor
        } else {
            1.0
        };

        let (offset_x, offset_y) = crop_offsets(&info.region, pixels_per_unit, &region)
            .ok_or(CaptureError::RegionOffScreen { region })?;

        tracing::debug!(
            "Capturing {} from monitor '{}' {} (scale factor {})",
            region,
            info.name,
            info.region,
            info.scale_factor
        );

        let full: ImageBuffer = monitor.capture_image().map_err(map)?.into();
        ensure_dimensions(&info.region, &full)?;

        if info.region == region {
            return Ok(full);
        }
        full.crop(offset_x, offset_y, region.width, region.height)
    }
}

/// Converts reported monitor bounds to physical pixels
///
/// The origin is kept as reported; only the extent is scaled, and only when
/// the platform reports logical bounds.
fn physical_bounds(reported: CaptureRegion, scale_factor: f32, logical: bool) -> CaptureRegion {
    if !logical || scale_factor <= 0.0 || scale_factor == 1.0 {
        return reported;
    }
    let scale = |extent: u32| (f64::from(extent) * f64::from(scale_factor)).round() as u32;
    CaptureRegion::new(reported.x, reported.y, scale(reported.width), scale(reported.height))
}

/// Pixel offset of `region` inside the captured `monitor` image
///
/// Origins are in platform units, converted to pixels with
/// `pixels_per_unit`. Returns `None` when the region does not fit inside the
/// monitor.
fn crop_offsets(
    monitor: &CaptureRegion,
    pixels_per_unit: f32,
    region: &CaptureRegion,
) -> Option<(u32, u32)> {
    let to_pixels = |units: i64| (units as f64 * f64::from(pixels_per_unit)).round() as i64;
    let offset_x = to_pixels(i64::from(region.x) - i64::from(monitor.x));
    let offset_y = to_pixels(i64::from(region.y) - i64::from(monitor.y));

    let fits = offset_x >= 0
        && offset_y >= 0
        && offset_x + i64::from(region.width) <= i64::from(monitor.width)
        && offset_y + i64::from(region.height) <= i64::from(monitor.height);
    if !fits {
        return None;
    }
    Some((u32::try_from(offset_x).ok()?, u32::try_from(offset_y).ok()?))
}

/// Maps an xcap error message to a [`CaptureError`]
fn map_xcap_error(message: &str, backend: BackendType) -> CaptureError {
    let lowered = message.to_lowercase();

    if lowered.contains("permission") || lowered.contains("access denied") {
        tracing::warn!("xcap permission denied: {}", message);
        return CaptureError::PermissionDenied {
            platform: std::env::consts::OS.to_string(),
            backend,
        };
    }

    tracing::error!("xcap error: {}", message);
    CaptureError::PlatformFailure {
        reason: message.to_string(),
    }
}

#[async_trait]
impl ScreenCapture for XcapBackend {
    async fn capture(&self, region: &CaptureRegion) -> CaptureResult<ImageBuffer> {
        validate_region(region)?;

        let region = *region;
        let backend = self.backend;
        let task = tokio::task::spawn_blocking(move || Self::capture_blocking(region, backend));

        let image = Self::with_timeout(
            async {
                task.await.map_err(|e| {
                    tracing::error!("Capture task panicked: {}", e);
                    CaptureError::PlatformFailure {
                        reason: e.to_string(),
                    }
                })?
            },
            CAPTURE_TIMEOUT_MS,
        )
        .await?;

        ensure_dimensions(&region, &image)?;
        tracing::info!("Captured {}", region);
        Ok(image)
    }
}

#[async_trait]
impl MonitorEnumerator for XcapBackend {
    async fn list_monitors(&self) -> CaptureResult<Vec<MonitorInfo>> {
        let backend = self.backend;
        let task = tokio::task::spawn_blocking(move || {
            let monitors =
                Monitor::all().map_err(|e| map_xcap_error(&e.to_string(), backend))?;
            monitors
                .iter()
                .map(|m| Self::describe(m, backend))
                .collect::<CaptureResult<Vec<_>>>()
        });

        Self::with_timeout(
            async {
                task.await.map_err(|e| CaptureError::PlatformFailure {
                    reason: e.to_string(),
                })?
            },
            CAPTURE_TIMEOUT_MS,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logical_bounds_scaled_to_pixels() {
        // A 1440x900 point Retina display captures as 2880x1800 pixels
        let reported = CaptureRegion::new(0, 0, 1440, 900);
        assert_eq!(physical_bounds(reported, 2.0, true), CaptureRegion::new(0, 0, 2880, 1800));

        let secondary = CaptureRegion::new(1440, -200, 1280, 720);
        assert_eq!(
            physical_bounds(secondary, 1.5, true),
            CaptureRegion::new(1440, -200, 1920, 1080)
        );
    }

    #[test]
    fn test_physical_bounds_untouched() {
        let reported = CaptureRegion::new(-1920, 0, 3840, 2160);
        assert_eq!(physical_bounds(reported, 2.0, false), reported);
        assert_eq!(physical_bounds(reported, 1.0, true), reported);
        assert_eq!(physical_bounds(reported, 0.0, true), reported);
    }

    #[test]
    fn test_full_monitor_crop_offsets() {
        let monitor = physical_bounds(CaptureRegion::new(0, 0, 1440, 900), 2.0, true);
        let image = ImageBuffer::from_test_pattern(2880, 1800);

        ensure_dimensions(&monitor, &image).unwrap();
        assert_eq!(crop_offsets(&monitor, 2.0, &monitor), Some((0, 0)));
    }

    #[test]
    fn test_sub_region_crop_offsets() {
        let monitor = CaptureRegion::new(-1920, 0, 1920, 1080);
        assert_eq!(crop_offsets(&monitor, 1.0, &CaptureRegion::new(-1820, 10, 100, 50)), Some((100, 10)));

        let retina = CaptureRegion::new(100, 0, 2880, 1800);
        assert_eq!(crop_offsets(&retina, 2.0, &CaptureRegion::new(110, 5, 40, 40)), Some((20, 10)));
    }

    #[test]
    fn test_region_outside_monitor() {
        let monitor = CaptureRegion::new(0, 0, 1920, 1080);
        assert_eq!(crop_offsets(&monitor, 1.0, &CaptureRegion::new(-1, 0, 10, 10)), None);
        assert_eq!(crop_offsets(&monitor, 1.0, &CaptureRegion::new(1900, 0, 21, 10)), None);
        assert_eq!(crop_offsets(&monitor, 1.0, &CaptureRegion::new(0, 1000, 10, 81)), None);
    }

    #[test]
    fn test_map_permission_error() {
        let error = map_xcap_error("Permission denied accessing display", BackendType::X11);
        assert!(matches!(
            error,
            CaptureError::PermissionDenied {
                backend: BackendType::X11,
                ..
            }
        ));
    }

    #[test]
    fn test_map_generic_error() {
        let error = map_xcap_error("XGetImage failed", BackendType::X11);
        match error {
            CaptureError::PlatformFailure { reason } => assert_eq!(reason, "XGetImage failed"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_zero_area_never_reaches_platform() {
        let backend = XcapBackend {
            backend: BackendType::X11,
        };
        let result = backend.capture(&CaptureRegion::new(0, 0, 0, 0)).await;
        assert!(matches!(result, Err(CaptureError::EmptyRegion { .. })));
    }

    #[tokio::test]
    async fn test_with_timeout_expires() {
        let result: CaptureResult<()> = XcapBackend::with_timeout(
            async {
                tokio::time::sleep(Duration::from_millis(200)).await;
                Ok(())
            },
            10,
        )
        .await;
        assert!(matches!(result, Err(CaptureError::CaptureTimeout { duration_ms: 10 })));
    }

    #[tokio::test]
    #[ignore = "Requires a live desktop session"]
    async fn test_capture_primary_monitor_live() {
        let backend = XcapBackend::new().expect("display backend");
        let monitors = backend.list_monitors().await.expect("monitors");
        let primary = monitors.iter().find(|m| m.is_primary).unwrap_or(&monitors[0]);

        let image = backend.capture(&primary.region).await.expect("capture");
        assert_eq!(image.dimensions(), (primary.region.width, primary.region.height));
    }
}
