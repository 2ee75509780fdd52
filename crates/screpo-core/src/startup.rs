//! Session startup
//!
//! Startup runs in a fixed order and any failure is fatal:
//!
//! 1. resolve the destination folder (explicit path or [`FolderPicker`])
//! 2. register the global hotkey through a [`HotkeyRegistrar`] (watch mode only)
//! 3. create the `img/` folder ([`prepare_layout`])
//!
//! Nothing is created on disk before a folder has been chosen. The hotkey
//! guard is held by the caller and unregisters the key when dropped.
//!
//! Native dialogs and hotkey managers belong to the thread that runs the
//! platform event loop, so [`FolderPicker`] and [`HotkeyRegistrar`] are
//! synchronous and are called from the main thread.

use std::path::PathBuf;

use crate::{
    capture::MonitorEnumerator,
    error::{CaptureError, StartupError},
    model::{GalleryLayout, MonitorInfo},
};

/// Default global hotkey
pub const DEFAULT_HOTKEY: &str = "Control+PrintScreen";

/// Prompts the user for a destination folder
pub trait FolderPicker {
    /// Returns the chosen folder, or `None` when the prompt was dismissed
    ///
    /// Blocks until the prompt closes.
    fn pick_folder(&self) -> Option<PathBuf>;
}

/// Registers a system-wide hotkey
pub trait HotkeyRegistrar {
    /// Keeps the hotkey registered while alive
    type Guard;

    /// Registers `combo` (e.g. `Control+PrintScreen`)
    ///
    /// Fails with [`StartupError::HotkeyRegistrationFailed`] when the combo
    /// cannot be parsed or is owned by another application.
    fn register(&self, combo: &str) -> Result<Self::Guard, StartupError>;
}

/// Returns `explicit` when given, otherwise asks `picker`
pub fn resolve_folder(
    explicit: Option<PathBuf>,
    picker: &dyn FolderPicker,
) -> Result<PathBuf, StartupError> {
    if let Some(folder) = explicit {
        tracing::debug!("Using folder from command line: {}", folder.display());
        return Ok(folder);
    }

    match picker.pick_folder() {
        Some(folder) => {
            tracing::info!("Selected folder {}", folder.display());
            Ok(folder)
        }
        None => {
            tracing::error!("Folder selection cancelled");
            Err(StartupError::SelectionCancelled)
        }
    }
}

/// Derives the layout for `root` and creates its images folder
pub fn prepare_layout(root: PathBuf) -> Result<GalleryLayout, StartupError> {
    let layout = GalleryLayout::new(root);
    layout
        .ensure_images_dir()
        .map_err(|source| StartupError::LayoutFailed {
            path: layout.images_dir.clone(),
            source,
        })?;
    Ok(layout)
}

/// Picks the capture monitor
///
/// With an index the monitor at that position is returned. Without one the
/// primary monitor is preferred, falling back to the first listed.
pub async fn select_monitor(
    enumerator: &dyn MonitorEnumerator,
    index: Option<usize>,
) -> Result<MonitorInfo, StartupError> {
    if let Some(index) = index {
        return enumerator
            .monitor_at(index)
            .await
            .map_err(StartupError::MonitorSelection);
    }

    let monitors = enumerator
        .list_monitors()
        .await
        .map_err(StartupError::MonitorSelection)?;

    let chosen = monitors.iter().position(|m| m.is_primary).unwrap_or(0);
    monitors
        .into_iter()
        .nth(chosen)
        .ok_or(StartupError::MonitorSelection(CaptureError::MonitorNotFound {
            index:     0,
            available: 0,
        }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{capture::MockBackend, model::CaptureRegion};

    struct FixedPicker(Option<PathBuf>);

    impl FolderPicker for FixedPicker {
        fn pick_folder(&self) -> Option<PathBuf> {
            self.0.clone()
        }
    }

    #[test]
    fn test_explicit_folder_skips_picker() {
        let picker = FixedPicker(Some(PathBuf::from("/from/picker")));
        let folder = resolve_folder(Some(PathBuf::from("/explicit")), &picker).unwrap();
        assert_eq!(folder, PathBuf::from("/explicit"));
    }

    #[test]
    fn test_picked_folder_used() {
        let picker = FixedPicker(Some(PathBuf::from("/from/picker")));
        assert_eq!(resolve_folder(None, &picker).unwrap(), PathBuf::from("/from/picker"));
    }

    #[test]
    fn test_cancelled_picker_is_fatal() {
        let err = resolve_folder(None, &FixedPicker(None)).unwrap_err();
        assert!(matches!(err, StartupError::SelectionCancelled));
    }

    #[test]
    fn test_prepare_layout_creates_images_dir() {
        let dir = tempfile::tempdir().unwrap();
        let layout = prepare_layout(dir.path().to_path_buf()).unwrap();
        assert!(layout.images_dir.is_dir());
        assert!(!layout.index_path.exists());
    }

    #[test]
    fn test_prepare_layout_reports_blocked_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("img"), b"not a folder").unwrap();

        let err = prepare_layout(dir.path().to_path_buf()).unwrap_err();
        assert!(matches!(err, StartupError::LayoutFailed { .. }));
    }

    #[tokio::test]
    async fn test_select_monitor_prefers_primary() {
        let monitors = vec![
            MonitorInfo {
                id:           7,
                name:         "LEFT".to_string(),
                region:       CaptureRegion::new(-1280, 0, 1280, 1024),
                scale_factor: 1.0,
                is_primary:   false,
            },
            MonitorInfo {
                id:           8,
                name:         "MAIN".to_string(),
                region:       CaptureRegion::new(0, 0, 1920, 1080),
                scale_factor: 1.0,
                is_primary:   true,
            },
        ];
        let backend = MockBackend::with_monitors(monitors);

        assert_eq!(select_monitor(&backend, None).await.unwrap().name, "MAIN");
        assert_eq!(select_monitor(&backend, Some(0)).await.unwrap().name, "LEFT");
    }

    #[tokio::test]
    async fn test_select_monitor_out_of_range() {
        let err = select_monitor(&MockBackend::new(), Some(9)).await.unwrap_err();
        assert!(matches!(
            err,
            StartupError::MonitorSelection(CaptureError::MonitorNotFound { index: 9, .. })
        ));
    }

    #[tokio::test]
    async fn test_select_monitor_none_present() {
        let err = select_monitor(&MockBackend::with_monitors(vec![]), None)
            .await
            .unwrap_err();
        assert!(matches!(err, StartupError::MonitorSelection(_)));
    }
}
