//! Single entry point for user actions
//!
//! The hotkey loop and the one-shot CLI commands both go through
//! [`Dispatcher::handle_user_action`]. Every outcome becomes a notification
//! on the selected region; recoverable failures never escape as panics.

use std::{fmt, path::PathBuf, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::{
    clipboard::{ClipboardReader, ClipboardWriter},
    error::{PipelineError, PipelineResult},
    gallery::GallerySummary,
    model::{CaptureRegion, SessionConfig},
    notify::{Notification, NotificationSink},
    pipeline::{CaptureOrchestrator, CaptureOutcome},
};

/// An action the user can trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserAction {
    /// Capture the selected monitor
    Capture,
    /// Save the clipboard image
    PublishClipboard,
    /// Regenerate the gallery page
    GeneratePage,
    /// Copy the destination folder path to the clipboard
    CopyPath,
}

impl fmt::Display for UserAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UserAction::Capture => "capture",
            UserAction::PublishClipboard => "publish-clipboard",
            UserAction::GeneratePage => "generate-page",
            UserAction::CopyPath => "copy-path",
        };
        f.write_str(name)
    }
}

/// What a successful action produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// A screenshot was saved
    Captured(CaptureOutcome),
    /// A clipboard image was saved
    ClipboardSaved(CaptureOutcome),
    /// The gallery was regenerated
    PageGenerated(GallerySummary),
    /// The folder path was placed on the clipboard
    PathCopied(PathBuf),
}

/// Routes user actions to the orchestrator and reports every outcome
pub struct Dispatcher {
    orchestrator: Arc<CaptureOrchestrator>,
    reader:       Arc<dyn ClipboardReader>,
    writer:       Arc<dyn ClipboardWriter>,
    sink:         Arc<dyn NotificationSink>,
}

impl Dispatcher {
    /// Creates a dispatcher
    pub fn new(
        orchestrator: Arc<CaptureOrchestrator>,
        reader: Arc<dyn ClipboardReader>,
        writer: Arc<dyn ClipboardWriter>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            orchestrator,
            reader,
            writer,
            sink,
        }
    }

    /// Runs `action` and notifies the user of the result
    ///
    /// The result is also returned so callers can set an exit status.
    pub async fn handle_user_action(
        &self,
        action: UserAction,
        config: &SessionConfig,
    ) -> PipelineResult<ActionOutcome> {
        tracing::debug!("Handling {}", action);
        let region = config.selected_region;

        let result = self.run(action, config).await;
        match &result {
            Ok(outcome) => self.report_success(outcome, region).await,
            Err(error) => self.report_failure(action, error, region).await,
        }
        result
    }

    async fn run(&self, action: UserAction, config: &SessionConfig) -> PipelineResult<ActionOutcome> {
        match action {
            UserAction::Capture => self
                .orchestrator
                .capture_and_maybe_publish(config)
                .await
                .map(ActionOutcome::Captured),
            UserAction::PublishClipboard => {
                let image = self.reader.read_image().await?;
                self.orchestrator
                    .publish_clipboard_image(image, config)
                    .await
                    .map(ActionOutcome::ClipboardSaved)
            }
            UserAction::GeneratePage => self
                .orchestrator
                .generate_page(config)
                .await
                .map(ActionOutcome::PageGenerated),
            UserAction::CopyPath => {
                let root = self.orchestrator.layout().root.clone();
                self.writer.write_text(&root.to_string_lossy()).await?;
                Ok(ActionOutcome::PathCopied(root))
            }
        }
    }

    async fn report_success(&self, outcome: &ActionOutcome, region: CaptureRegion) {
        match outcome {
            ActionOutcome::Captured(saved) => {
                self.notify_saved("Screenshot saved.", saved, region).await;
            }
            ActionOutcome::ClipboardSaved(saved) => {
                self.notify_saved("Clipboard image saved.", saved, region).await;
            }
            ActionOutcome::PageGenerated(summary) => {
                let message = format!(
                    "Gallery generated ({} images).\n{}",
                    summary.asset_count,
                    summary.output_path.display()
                );
                self.sink.notify(Notification::success(message, region)).await;
            }
            ActionOutcome::PathCopied(root) => {
                let message = format!("Folder path copied to the clipboard.\n{}", root.display());
                self.sink.notify(Notification::success(message, region)).await;
            }
        }
    }

    async fn notify_saved(&self, headline: &str, saved: &CaptureOutcome, region: CaptureRegion) {
        let message = format!("{}\n{}", headline, saved.image_path.display());
        self.sink.notify(Notification::success(message, region)).await;

        if saved.gallery.is_some() {
            self.sink
                .notify(Notification::success("Gallery regenerated automatically.", region))
                .await;
        }
    }

    async fn report_failure(&self, action: UserAction, error: &PipelineError, region: CaptureRegion) {
        tracing::warn!("Action {} failed: {}", action, error);

        // The image is already on disk; tell the user before the rebuild error.
        if let Some(image_path) = error.written_image() {
            let message = format!("Image saved.\n{}", image_path.display());
            self.sink.notify(Notification::success(message, region)).await;
        }

        let message = format!("{}\n{}", error, error.remediation_hint());
        self.sink.notify(Notification::error(message, region)).await;
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use tokio::sync::Mutex;

    use super::*;
    use crate::{
        capture::{ImageBuffer, MockBackend},
        model::GalleryLayout,
        notify::Severity,
    };

    #[derive(Default)]
    struct Recorder(Mutex<Vec<Notification>>);

    #[async_trait]
    impl NotificationSink for Recorder {
        async fn notify(&self, notification: Notification) {
            self.0.lock().await.push(notification);
        }
    }

    struct NoClipboard;

    #[async_trait]
    impl ClipboardReader for NoClipboard {
        async fn read_image(&self) -> Result<Option<ImageBuffer>, PipelineError> {
            Ok(None)
        }
    }

    #[async_trait]
    impl ClipboardWriter for NoClipboard {
        async fn write_text(&self, _text: &str) -> Result<(), PipelineError> {
            Err(PipelineError::CopyPathFailed {
                reason: "no clipboard".to_string(),
            })
        }
    }

    fn dispatcher(dir: &std::path::Path, sink: Arc<Recorder>) -> Dispatcher {
        let layout = GalleryLayout::new(dir);
        layout.ensure_images_dir().unwrap();
        let orch = CaptureOrchestrator::new(Arc::new(MockBackend::new()), layout);
        Dispatcher::new(Arc::new(orch), Arc::new(NoClipboard), Arc::new(NoClipboard), sink)
    }

    #[test]
    fn test_action_display() {
        assert_eq!(UserAction::PublishClipboard.to_string(), "publish-clipboard");
        assert_eq!(serde_json::to_string(&UserAction::CopyPath).unwrap(), r#""copy_path""#);
    }

    #[tokio::test]
    async fn test_auto_publish_sends_two_notifications() {
        let dir = tempfile::tempdir().unwrap();
        let sink = Arc::new(Recorder::default());
        let config = SessionConfig::builder()
            .region(CaptureRegion::new(0, 0, 32, 32))
            .auto_publish(true)
            .build();

        dispatcher(dir.path(), sink.clone())
            .handle_user_action(UserAction::Capture, &config)
            .await
            .unwrap();

        let seen = sink.0.lock().await;
        assert_eq!(seen.len(), 2);
        assert!(seen.iter().all(|n| n.severity == Severity::Success));
        assert!(seen.iter().all(|n| n.region == config.selected_region));
        assert!(seen[0].message.starts_with("Screenshot saved."));
    }

    #[tokio::test]
    async fn test_copy_path_failure_is_notified() {
        let dir = tempfile::tempdir().unwrap();
        let sink = Arc::new(Recorder::default());

        let err = dispatcher(dir.path(), sink.clone())
            .handle_user_action(UserAction::CopyPath, &SessionConfig::builder().build())
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::CopyPathFailed { .. }));
        let seen = sink.0.lock().await;
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].severity, Severity::Error);
        assert_eq!(seen[0].severity.color(), "red");
    }
}
