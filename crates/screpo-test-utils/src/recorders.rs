//! In-memory stand-ins for platform services

use std::sync::Arc;

use async_trait::async_trait;
use screpo_core::{
    capture::ImageBuffer,
    clipboard::{ClipboardReader, ClipboardWriter},
    error::PipelineError,
    notify::{Notification, NotificationSink, Severity},
};
use tokio::sync::Mutex;

/// Notification sink that keeps every notification
#[derive(Debug, Default, Clone)]
pub struct RecordingNotifier {
    seen: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// All notifications received so far, in order
    pub async fn notifications(&self) -> Vec<Notification> {
        self.seen.lock().await.clone()
    }

    /// Severities received so far, in order
    pub async fn severities(&self) -> Vec<Severity> {
        self.seen.lock().await.iter().map(|n| n.severity).collect()
    }
}

#[async_trait]
impl NotificationSink for RecordingNotifier {
    async fn notify(&self, notification: Notification) {
        self.seen.lock().await.push(notification);
    }
}

/// Clipboard backed by memory
///
/// Starts empty. [`MemoryClipboard::unavailable`] simulates a clipboard
/// held by another program.
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    image:       Arc<Mutex<Option<ImageBuffer>>>,
    text:        Arc<Mutex<Option<String>>>,
    unavailable: bool,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clipboard preloaded with `image`
    pub fn with_image(image: ImageBuffer) -> Self {
        Self {
            image: Arc::new(Mutex::new(Some(image))),
            ..Self::default()
        }
    }

    /// Clipboard on which every operation fails
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Last text written
    pub async fn text(&self) -> Option<String> {
        self.text.lock().await.clone()
    }
}

#[async_trait]
impl ClipboardReader for MemoryClipboard {
    async fn read_image(&self) -> Result<Option<ImageBuffer>, PipelineError> {
        if self.unavailable {
            return Err(PipelineError::ClipboardUnavailable {
                reason: "clipboard locked".to_string(),
            });
        }
        Ok(self.image.lock().await.clone())
    }
}

#[async_trait]
impl ClipboardWriter for MemoryClipboard {
    async fn write_text(&self, text: &str) -> Result<(), PipelineError> {
        if self.unavailable {
            return Err(PipelineError::CopyPathFailed {
                reason: "clipboard locked".to_string(),
            });
        }
        *self.text.lock().await = Some(text.to_string());
        Ok(())
    }
}
