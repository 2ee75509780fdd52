//! Clipboard capabilities
//!
//! The pipeline reads images from and writes text to the system clipboard
//! through these traits. The platform implementation lives in the
//! application crate; tests use an in-memory clipboard.

use async_trait::async_trait;

use crate::{capture::ImageBuffer, error::PipelineError};

/// Reads an image from the clipboard
#[async_trait]
pub trait ClipboardReader: Send + Sync {
    /// Returns the clipboard image, or `None` when the clipboard holds no image
    ///
    /// Only a failure to open the clipboard is an error
    /// ([`PipelineError::ClipboardUnavailable`]).
    async fn read_image(&self) -> Result<Option<ImageBuffer>, PipelineError>;
}

/// Writes text to the clipboard
#[async_trait]
pub trait ClipboardWriter: Send + Sync {
    /// Replaces the clipboard contents with `text`
    ///
    /// Failures are reported as [`PipelineError::CopyPathFailed`].
    async fn write_text(&self, text: &str) -> Result<(), PipelineError>;
}
