//! Error types for the capture and gallery pipeline
//!
//! Errors are layered:
//! - [`CaptureError`] and [`GalleryError`] describe component failures
//! - [`PipelineError`] tags a user action's failure and carries the cause;
//!   it is always recoverable and ends up as a user-visible notification
//! - [`StartupError`] covers the fatal conditions that end the process
//!
//! Every type provides `remediation_hint()` with an actionable next step.

use std::path::PathBuf;

use crate::model::{BackendType, CaptureRegion};

/// Result type alias for capture operations
pub type CaptureResult<T> = Result<T, CaptureError>;

/// Result type alias for user actions
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Failure to acquire pixels from the screen
#[derive(Debug, Clone, thiserror::Error)]
pub enum CaptureError {
    /// Region has zero width or height
    #[error("Capture region {region} has zero area")]
    EmptyRegion {
        /// The rejected region
        region: CaptureRegion,
    },

    /// No monitor contains the region
    #[error("No monitor contains capture region {region}")]
    RegionOffScreen {
        /// The rejected region
        region: CaptureRegion,
    },

    /// Monitor index out of range
    #[error("Monitor {index} does not exist ({available} available)")]
    MonitorNotFound {
        /// Requested index
        index:     usize,
        /// Number of monitors present
        available: usize,
    },

    /// Permission denied for capture operation
    #[error("Permission denied for screenshot capture on {platform}")]
    PermissionDenied {
        /// Platform where permission was denied
        platform: String,
        /// Backend that denied permission
        backend:  BackendType,
    },

    /// Captured buffer does not match the requested region
    #[error(
        "Captured image is {actual_width}x{actual_height} but region is {expected_width}x{expected_height}"
    )]
    DimensionMismatch {
        /// Requested width
        expected_width:  u32,
        /// Requested height
        expected_height: u32,
        /// Width actually returned by the platform
        actual_width:    u32,
        /// Height actually returned by the platform
        actual_height:   u32,
    },

    /// The platform capture call failed
    #[error("Platform capture failed: {reason}")]
    PlatformFailure {
        /// Message reported by the platform
        reason: String,
    },

    /// Capture operation timed out
    #[error("Capture operation timed out after {duration_ms}ms")]
    CaptureTimeout {
        /// Timeout duration in milliseconds
        duration_ms: u64,
    },

    /// Requested backend is not available
    #[error("Backend {backend} is not available on this platform")]
    BackendNotAvailable {
        /// Backend type that's unavailable
        backend: BackendType,
    },

    /// Image encoding failed
    #[error("Failed to encode image as {format}: {reason}")]
    EncodingFailed {
        /// Image format that failed
        format: String,
        /// Reason for encoding failure
        reason: String,
    },
}

impl CaptureError {
    /// Returns an actionable remediation hint for this error
    ///
    /// # Examples
    ///
    /// ```
    /// use screpo_core::{error::CaptureError, model::CaptureRegion};
    ///
    /// let error = CaptureError::EmptyRegion {
    ///     region: CaptureRegion::new(0, 0, 0, 0),
    /// };
    /// assert!(error.remediation_hint().contains("monitors"));
    /// ```
    pub fn remediation_hint(&self) -> &str {
        match self {
            CaptureError::EmptyRegion { .. } | CaptureError::RegionOffScreen { .. } => {
                "Select a monitor again. Run `screpo monitors` to list the current monitor \
                 layout; regions go stale when displays are rearranged."
            }
            CaptureError::MonitorNotFound { .. } => {
                "Run `screpo monitors` and pass one of the listed indices with --monitor."
            }
            CaptureError::PermissionDenied { backend, .. } => match backend {
                BackendType::Wayland => {
                    "Grant screenshot permission when the desktop portal asks for it. On GNOME, \
                     check Settings > Privacy > Screen Sharing."
                }
                BackendType::X11 => {
                    "Ensure your X11 server allows screen capture. Check xhost settings if \
                     running in a restricted environment."
                }
                BackendType::Windows => {
                    "Grant screen capture permission in Windows Settings > Privacy. Ensure the \
                     application has necessary privileges."
                }
                BackendType::MacOS => {
                    "Grant screen recording permission in System Settings > Privacy & Security \
                     > Screen Recording and restart the application."
                }
                BackendType::None => "No backend available for screenshot capture.",
            },
            CaptureError::DimensionMismatch { .. } => {
                "The display reported logical instead of physical bounds. Re-select the monitor \
                 after changing display scaling."
            }
            CaptureError::PlatformFailure { .. } => {
                "The operating system refused the capture. Check that a desktop session is \
                 running and the screen is not locked."
            }
            CaptureError::CaptureTimeout { .. } => {
                "The capture took too long. A permission dialog may be waiting for an answer; \
                 close it and retry."
            }
            CaptureError::BackendNotAvailable { .. } => {
                "No display server detected. Run screpo inside a graphical session (DISPLAY or \
                 WAYLAND_DISPLAY must be set on Linux)."
            }
            CaptureError::EncodingFailed { .. } => {
                "PNG encoding failed. The captured buffer may be corrupt; retry the capture."
            }
        }
    }
}

/// Failure to build the gallery document
#[derive(Debug, thiserror::Error)]
pub enum GalleryError {
    /// Reading the images folder failed
    #[error("Failed to scan {path}: {source}")]
    Scan {
        /// Folder being scanned
        path:   PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Writing the document failed
    #[error("Failed to write {path}: {source}")]
    Write {
        /// Document path
        path:   PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The background build task did not complete
    #[error("Gallery build task failed: {0}")]
    Task(String),
}

impl GalleryError {
    /// Returns an actionable remediation hint for this error
    pub fn remediation_hint(&self) -> &str {
        match self {
            GalleryError::Scan { .. } => {
                "Check that the images folder still exists and is readable."
            }
            GalleryError::Write { .. } => {
                "Check that the destination folder is writable and index.html is not a \
                 directory or locked by another program."
            }
            GalleryError::Task(_) => "Retry generating the page.",
        }
    }
}

/// Tagged failure of a user action
///
/// All variants are recoverable: the dispatcher turns them into a
/// notification and the process keeps running.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Pixels could not be acquired; nothing was written
    #[error("Screenshot failed: {0}")]
    CaptureFailed(#[source] CaptureError),

    /// The captured image could not be persisted
    #[error("Failed to save screenshot to {path}: {reason}")]
    WriteFailed {
        /// Intended image path
        path:   PathBuf,
        /// Why the write failed
        reason: String,
    },

    /// The image was saved but the gallery rebuild failed
    #[error("Failed to regenerate the gallery: {source}")]
    PublishFailed {
        /// Image that was written, if the action produced one
        image_path: Option<PathBuf>,
        /// Gallery failure
        #[source]
        source:     GalleryError,
    },

    /// The clipboard holds no image
    #[error("The clipboard does not contain an image")]
    ClipboardEmpty,

    /// The clipboard image could not be persisted
    #[error("Failed to save clipboard image to {path}: {reason}")]
    ClipboardSaveFailed {
        /// Intended image path
        path:   PathBuf,
        /// Why the write failed
        reason: String,
    },

    /// The clipboard could not be opened
    #[error("Clipboard unavailable: {reason}")]
    ClipboardUnavailable {
        /// Message reported by the platform
        reason: String,
    },

    /// Writing the folder path to the clipboard failed
    #[error("Failed to copy folder path: {reason}")]
    CopyPathFailed {
        /// Message reported by the platform
        reason: String,
    },
}

impl PipelineError {
    /// Returns an actionable remediation hint for this error
    pub fn remediation_hint(&self) -> &str {
        match self {
            PipelineError::CaptureFailed(cause) => cause.remediation_hint(),
            PipelineError::WriteFailed { .. } | PipelineError::ClipboardSaveFailed { .. } => {
                "Check free disk space and write permission on the img folder. If two captures \
                 ran within the same millisecond, retry."
            }
            PipelineError::PublishFailed { source, .. } => source.remediation_hint(),
            PipelineError::ClipboardEmpty => {
                "Copy an image to the clipboard first (e.g. with the system screenshot tool)."
            }
            PipelineError::ClipboardUnavailable { .. } | PipelineError::CopyPathFailed { .. } => {
                "Another program may be holding the clipboard. Retry in a moment."
            }
        }
    }

    /// Path of the image written before the failure, if any
    pub fn written_image(&self) -> Option<&PathBuf> {
        match self {
            PipelineError::PublishFailed { image_path, .. } => image_path.as_ref(),
            _ => None,
        }
    }
}

/// Fatal startup conditions
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// The user closed the folder picker without choosing
    #[error("No folder was selected")]
    SelectionCancelled,

    /// The global hotkey could not be registered
    #[error("Failed to register hotkey '{combo}': {reason}")]
    HotkeyRegistrationFailed {
        /// Requested key combination
        combo:  String,
        /// Message reported by the platform
        reason: String,
    },

    /// The destination layout could not be created
    #[error("Failed to prepare {path}: {source}")]
    LayoutFailed {
        /// Folder being created
        path:   PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Monitor enumeration failed at startup
    #[error("Failed to select a monitor: {0}")]
    MonitorSelection(#[source] CaptureError),
}

impl StartupError {
    /// Returns an actionable remediation hint for this error
    pub fn remediation_hint(&self) -> &str {
        match self {
            StartupError::SelectionCancelled => {
                "Choose a destination folder in the dialog or pass --folder."
            }
            StartupError::HotkeyRegistrationFailed { .. } => {
                "Another application already owns this key combination. Close it or choose a \
                 different combination with --hotkey."
            }
            StartupError::LayoutFailed { .. } => {
                "Check that the destination folder is writable."
            }
            StartupError::MonitorSelection(cause) => cause.remediation_hint(),
        }
    }
}
