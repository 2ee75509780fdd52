//! System clipboard through arboard
//!
//! One `arboard::Clipboard` is opened lazily and kept for the life of the
//! adapter. On X11 and Wayland the clipboard contents are served by the
//! process that set them, so text copied by screpo stays available only
//! while screpo is running.

use std::sync::Arc;

use arboard::Clipboard;
use async_trait::async_trait;
use parking_lot::Mutex;
use screpo_core::{
    capture::ImageBuffer,
    clipboard::{ClipboardReader, ClipboardWriter},
    error::PipelineError,
};

/// Clipboard adapter shared between actions
#[derive(Clone, Default)]
pub struct SystemClipboard {
    inner: Arc<Mutex<Option<Clipboard>>>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` with the open clipboard on the blocking pool
    async fn with_clipboard<T, F>(
        &self,
        on_error: fn(String) -> PipelineError,
        f: F,
    ) -> Result<T, PipelineError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Clipboard) -> Result<T, PipelineError> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || {
            let mut slot = inner.lock();
            if slot.is_none() {
                *slot = Some(Clipboard::new().map_err(|e| on_error(e.to_string()))?);
            }
            match slot.as_mut() {
                Some(clipboard) => f(clipboard),
                None => Err(on_error("clipboard not open".to_string())),
            }
        })
        .await
        .map_err(|e| on_error(e.to_string()))?
    }
}

fn unavailable(reason: String) -> PipelineError {
    PipelineError::ClipboardUnavailable { reason }
}

fn copy_failed(reason: String) -> PipelineError {
    PipelineError::CopyPathFailed { reason }
}

#[async_trait]
impl ClipboardReader for SystemClipboard {
    async fn read_image(&self) -> Result<Option<ImageBuffer>, PipelineError> {
        self.with_clipboard(unavailable, |clipboard| match clipboard.get_image() {
            Ok(data) => {
                let width = u32::try_from(data.width).map_err(|e| unavailable(e.to_string()))?;
                let height = u32::try_from(data.height).map_err(|e| unavailable(e.to_string()))?;
                ImageBuffer::from_rgba(width, height, data.bytes.into_owned())
                    .map(Some)
                    .map_err(|e| unavailable(e.to_string()))
            }
            Err(arboard::Error::ContentNotAvailable) => Ok(None),
            Err(e) => Err(unavailable(e.to_string())),
        })
        .await
    }
}

#[async_trait]
impl ClipboardWriter for SystemClipboard {
    async fn write_text(&self, text: &str) -> Result<(), PipelineError> {
        let text = text.to_string();
        self.with_clipboard(copy_failed, move |clipboard| {
            clipboard.set_text(text).map_err(|e| copy_failed(e.to_string()))
        })
        .await
    }
}
