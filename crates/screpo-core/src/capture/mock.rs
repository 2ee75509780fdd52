//! Mock capture backend for testing
//!
//! [`MockBackend`] implements [`ScreenCapture`] and [`MonitorEnumerator`]
//! without a display server. Captures return a synthetic test pattern sized
//! to the requested region.
//!
//! # Features
//!
//! - **Mock Monitor Layout:** two side-by-side monitors by default
//! - **Configurable Delay:** simulate slow platform calls
//! - **Error Injection:** every operation fails with a chosen error
//! - **Call Counting:** assert whether the platform was touched
//!
//! # Examples
//!
//! ```
//! use screpo_core::{
//!     capture::{MockBackend, MonitorEnumerator, ScreenCapture},
//!     model::CaptureRegion,
//! };
//!
//! #[tokio::main]
//! async fn main() {
//!     let backend = MockBackend::new();
//!
//!     let monitors = backend.list_monitors().await.unwrap();
//!     assert_eq!(monitors.len(), 2);
//!
//!     let image = backend.capture(&monitors[0].region).await.unwrap();
//!     assert_eq!(image.dimensions(), (1920, 1080));
//! }
//! ```

use std::{
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use async_trait::async_trait;
use tokio::time::sleep;

use super::{ImageBuffer, MonitorEnumerator, ScreenCapture, traits::validate_region};
use crate::{
    error::{CaptureError, CaptureResult},
    model::{CaptureRegion, MonitorInfo},
};

/// Mock capture backend for testing and development
///
/// Thread-safe; share it across tasks with `Arc`.
#[derive(Debug)]
pub struct MockBackend {
    /// Optional delay to simulate platform timing
    delay:           Option<Duration>,
    /// Optional error returned by every operation
    error_injection: Option<CaptureError>,
    /// Mock monitor layout
    monitors:        Vec<MonitorInfo>,
    /// Number of capture calls that reached the backend
    captures:        AtomicUsize,
}

impl MockBackend {
    /// Creates a new MockBackend with the default monitor layout
    ///
    /// - `0`: primary 1920x1080 at (0, 0), scale 1.0
    /// - `1`: 2560x1440 at (1920, 0), scale 1.5
    pub fn new() -> Self {
        Self::with_monitors(Self::create_mock_monitors())
    }

    /// Creates a MockBackend with a custom monitor layout
    pub fn with_monitors(monitors: Vec<MonitorInfo>) -> Self {
        Self {
            delay: None,
            error_injection: None,
            monitors,
            captures: AtomicUsize::new(0),
        }
    }

    /// Sets a delay applied before every operation returns
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Injects an error returned by every operation
    pub fn with_error(mut self, error: CaptureError) -> Self {
        self.error_injection = Some(error);
        self
    }

    /// Number of capture calls received so far
    pub fn capture_count(&self) -> usize {
        self.captures.load(Ordering::SeqCst)
    }

    fn create_mock_monitors() -> Vec<MonitorInfo> {
        vec![
            MonitorInfo {
                id:           1,
                name:         "MOCK-PRIMARY".to_string(),
                region:       CaptureRegion::new(0, 0, 1920, 1080),
                scale_factor: 1.0,
                is_primary:   true,
            },
            MonitorInfo {
                id:           2,
                name:         "MOCK-SECONDARY".to_string(),
                region:       CaptureRegion::new(1920, 0, 2560, 1440),
                scale_factor: 1.5,
                is_primary:   false,
            },
        ]
    }

    async fn apply_delay(&self) {
        if let Some(duration) = self.delay {
            sleep(duration).await;
        }
    }

    fn check_error_injection(&self) -> CaptureResult<()> {
        match &self.error_injection {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ScreenCapture for MockBackend {
    async fn capture(&self, region: &CaptureRegion) -> CaptureResult<ImageBuffer> {
        self.captures.fetch_add(1, Ordering::SeqCst);
        self.apply_delay().await;
        self.check_error_injection()?;
        validate_region(region)?;

        if !self.monitors.iter().any(|m| m.region.contains(region)) {
            return Err(CaptureError::RegionOffScreen { region: *region });
        }

        Ok(ImageBuffer::from_test_pattern(region.width, region.height))
    }
}

#[async_trait]
impl MonitorEnumerator for MockBackend {
    async fn list_monitors(&self) -> CaptureResult<Vec<MonitorInfo>> {
        self.apply_delay().await;
        self.check_error_injection()?;
        Ok(self.monitors.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::model::BackendType;

    #[test]
    fn test_mock_backend_new() {
        let backend = MockBackend::new();
        assert_eq!(backend.monitors.len(), 2);
        assert!(backend.delay.is_none());
        assert!(backend.error_injection.is_none());
        assert_eq!(backend.capture_count(), 0);
    }

    #[tokio::test]
    async fn test_capture_matches_region_dimensions() {
        let backend = MockBackend::new();
        for (w, h) in [(1, 1), (640, 480), (1920, 1080)] {
            let image = backend.capture(&CaptureRegion::new(0, 0, w, h)).await.unwrap();
            assert_eq!(image.dimensions(), (w, h));
        }
        assert_eq!(backend.capture_count(), 3);
    }

    #[tokio::test]
    async fn test_capture_secondary_monitor_ignores_scale() {
        let backend = MockBackend::new();
        let monitors = backend.list_monitors().await.unwrap();

        let image = backend.capture(&monitors[1].region).await.unwrap();
        assert_eq!(image.dimensions(), (2560, 1440));
    }

    #[tokio::test]
    async fn test_capture_zero_area_rejected() {
        let backend = MockBackend::new();
        let result = backend.capture(&CaptureRegion::new(0, 0, 0, 0)).await;
        assert!(matches!(result, Err(CaptureError::EmptyRegion { .. })));
    }

    #[tokio::test]
    async fn test_capture_off_screen_rejected() {
        let backend = MockBackend::new();
        let result = backend.capture(&CaptureRegion::new(-100, 0, 50, 50)).await;
        assert!(matches!(result, Err(CaptureError::RegionOffScreen { .. })));
    }

    #[tokio::test]
    async fn test_error_injection() {
        let backend = MockBackend::new().with_error(CaptureError::BackendNotAvailable {
            backend: BackendType::None,
        });

        assert!(backend.list_monitors().await.is_err());
        let result = backend.capture(&CaptureRegion::new(0, 0, 10, 10)).await;
        assert!(matches!(result, Err(CaptureError::BackendNotAvailable { .. })));
    }

    #[tokio::test]
    async fn test_monitor_at() {
        let backend = MockBackend::new();
        assert_eq!(backend.monitor_at(1).await.unwrap().name, "MOCK-SECONDARY");

        let err = backend.monitor_at(5).await.unwrap_err();
        assert!(matches!(err, CaptureError::MonitorNotFound { index: 5, available: 2 }));
    }

    #[tokio::test]
    async fn test_with_delay() {
        let backend = MockBackend::new().with_delay(Duration::from_millis(50));

        let start = Instant::now();
        backend.list_monitors().await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(50));
    }
}
