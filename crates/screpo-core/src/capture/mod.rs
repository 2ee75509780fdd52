//! Capture backend traits and implementations
//!
//! - [`ScreenCapture`] - copy a region's pixels (all backends)
//! - [`MonitorEnumerator`] - list selectable monitors (all backends)
//!
//! | Backend | Source |
//! |---------|--------|
//! | [`XcapBackend`] | live screen through xcap (Windows, macOS, X11, Wayland portal) |
//! | [`MockBackend`] | synthetic test pattern |
//!
//! Use [`create_default_backend()`] to get the backend for the running
//! platform.

use std::sync::Arc;

use crate::error::CaptureResult;

pub mod image_buffer;
pub mod mock;
pub mod traits;
pub mod xcap_backend;

pub use image_buffer::ImageBuffer;
pub use mock::MockBackend;
pub use traits::{MonitorEnumerator, ScreenCapture};
pub use xcap_backend::XcapBackend;

/// Creates the capture backend for the current platform.
///
/// Returns a `BackendNotAvailable` error when no display server is
/// detected (e.g. a Linux shell without `DISPLAY` or `WAYLAND_DISPLAY`).
pub fn create_default_backend() -> CaptureResult<Arc<XcapBackend>> {
    let backend = XcapBackend::new()?;
    tracing::info!("Capture backend initialized: xcap ({})", backend.backend_type());
    Ok(Arc::new(backend))
}
