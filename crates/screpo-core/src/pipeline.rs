//! Capture orchestration
//!
//! [`CaptureOrchestrator`] ties the capture backend, file naming, PNG
//! persistence and the gallery builder together. Each call is independent
//! and reads everything it needs from the [`SessionConfig`] it is given.
//!
//! # Flow
//!
//! ```text
//! capture(region) ──> name ──> encode + write img/{name} ──> [auto_publish] build gallery
//!       │                              │                               │
//!  CaptureFailed                  WriteFailed                    PublishFailed
//! ```
//!
//! The gallery is never rebuilt after a failed capture or write. A failed
//! rebuild leaves the written image in place.

use std::{
    fs::{self, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{
    capture::{ImageBuffer, ScreenCapture},
    error::{GalleryError, PipelineError, PipelineResult},
    gallery::{self, GallerySummary},
    model::{GalleryLayout, SessionConfig},
    naming::{CLIPBOARD_LABEL, FileNamer, SCREENSHOT_LABEL},
    util::encode::encode_png,
};

/// Result of a successful capture or clipboard save
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureOutcome {
    /// Image written to the images folder
    pub image_path: PathBuf,
    /// Gallery rebuild result when auto-publish is enabled
    pub gallery:    Option<GallerySummary>,
}

/// Runs the capture, clipboard-save and page-generation actions
pub struct CaptureOrchestrator {
    capturer: Arc<dyn ScreenCapture>,
    namer:    FileNamer,
    layout:   GalleryLayout,
}

impl CaptureOrchestrator {
    /// Creates an orchestrator writing into `layout`
    pub fn new(capturer: Arc<dyn ScreenCapture>, layout: GalleryLayout) -> Self {
        Self {
            capturer,
            namer: FileNamer::png(),
            layout,
        }
    }

    /// Destination layout
    pub fn layout(&self) -> &GalleryLayout {
        &self.layout
    }

    /// Captures the selected region, saves it and optionally rebuilds the gallery
    pub async fn capture_and_maybe_publish(
        &self,
        config: &SessionConfig,
    ) -> PipelineResult<CaptureOutcome> {
        let image = self
            .capturer
            .capture(&config.selected_region)
            .await
            .map_err(|e| {
                tracing::warn!("Capture of {} failed: {}", config.selected_region, e);
                PipelineError::CaptureFailed(e)
            })?;

        let image_path = self
            .save(image, SCREENSHOT_LABEL)
            .await
            .map_err(|(path, reason)| PipelineError::WriteFailed { path, reason })?;

        self.finish(image_path, config).await
    }

    /// Saves a clipboard image and optionally rebuilds the gallery
    ///
    /// `None` means the clipboard held no image: nothing is written.
    pub async fn publish_clipboard_image(
        &self,
        image: Option<ImageBuffer>,
        config: &SessionConfig,
    ) -> PipelineResult<CaptureOutcome> {
        let image = image.ok_or(PipelineError::ClipboardEmpty)?;

        let image_path = self
            .save(image, CLIPBOARD_LABEL)
            .await
            .map_err(|(path, reason)| PipelineError::ClipboardSaveFailed { path, reason })?;

        self.finish(image_path, config).await
    }

    /// Rebuilds the gallery without capturing
    pub async fn generate_page(&self, config: &SessionConfig) -> PipelineResult<GallerySummary> {
        self.rebuild(&config.title_text)
            .await
            .map_err(|source| PipelineError::PublishFailed {
                image_path: None,
                source,
            })
    }

    async fn finish(
        &self,
        image_path: PathBuf,
        config: &SessionConfig,
    ) -> PipelineResult<CaptureOutcome> {
        if !config.auto_publish {
            return Ok(CaptureOutcome {
                image_path,
                gallery: None,
            });
        }

        match self.rebuild(&config.title_text).await {
            Ok(summary) => Ok(CaptureOutcome {
                image_path,
                gallery: Some(summary),
            }),
            Err(source) => Err(PipelineError::PublishFailed {
                image_path: Some(image_path),
                source,
            }),
        }
    }

    async fn rebuild(&self, title: &str) -> Result<GallerySummary, GalleryError> {
        gallery::build_in_background(
            self.layout.images_dir.clone(),
            self.layout.index_path.clone(),
            title.to_string(),
        )
        .await
    }

    /// Encodes and writes `image`, returning the path or `(path, reason)`
    async fn save(&self, image: ImageBuffer, label: &str) -> Result<PathBuf, (PathBuf, String)> {
        let path = self.layout.images_dir.join(self.namer.generate_name(label));

        let target = path.clone();
        let written = tokio::task::spawn_blocking(move || -> Result<(), String> {
            let bytes = encode_png(&image).map_err(|e| e.to_string())?;
            write_new_file(&target, &bytes).map_err(|e| e.to_string())
        })
        .await;

        match written {
            Ok(Ok(())) => {
                tracing::info!("Saved {}", path.display());
                Ok(path)
            }
            Ok(Err(reason)) => {
                tracing::error!("Failed to save {}: {}", path.display(), reason);
                Err((path, reason))
            }
            Err(e) => Err((path, format!("write task failed: {e}"))),
        }
    }
}

/// Writes `bytes` to a file that must not exist yet
///
/// An existing file (two saves within one millisecond) is reported as
/// `AlreadyExists` and left untouched. A partially written file is removed.
pub(crate) fn write_new_file(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;

    if let Err(e) = file.write_all(bytes).and_then(|()| file.sync_all()) {
        drop(file);
        if let Err(cleanup) = fs::remove_file(path) {
            tracing::warn!("Could not remove partial file {}: {}", path.display(), cleanup);
        }
        return Err(e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{capture::MockBackend, model::CaptureRegion};

    fn orchestrator(dir: &Path) -> CaptureOrchestrator {
        let layout = GalleryLayout::new(dir);
        layout.ensure_images_dir().unwrap();
        CaptureOrchestrator::new(Arc::new(MockBackend::new()), layout)
    }

    fn config(auto_publish: bool) -> SessionConfig {
        SessionConfig::builder()
            .title("Test")
            .region(CaptureRegion::new(0, 0, 64, 48))
            .auto_publish(auto_publish)
            .build()
    }

    #[test]
    fn test_write_new_file_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.png");
        write_new_file(&path, b"first").unwrap();

        let err = write_new_file(&path, b"second").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(fs::read(&path).unwrap(), b"first");
    }

    #[tokio::test]
    async fn test_capture_without_publish() {
        let dir = tempfile::tempdir().unwrap();
        let orch = orchestrator(dir.path());

        let outcome = orch.capture_and_maybe_publish(&config(false)).await.unwrap();

        assert!(outcome.gallery.is_none());
        assert!(outcome.image_path.starts_with(dir.path().join("img")));
        let name = outcome.image_path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.ends_with("_Screenshot_.png"), "{name}");
        assert!(!orch.layout().index_path.exists());

        let decoded = image::open(&outcome.image_path).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (64, 48));
    }

    #[tokio::test]
    async fn test_capture_with_publish() {
        let dir = tempfile::tempdir().unwrap();
        let orch = orchestrator(dir.path());

        let outcome = orch.capture_and_maybe_publish(&config(true)).await.unwrap();

        let summary = outcome.gallery.unwrap();
        assert_eq!(summary.asset_count, 1);
        let html = fs::read_to_string(&summary.output_path).unwrap();
        assert!(html.contains("<h1>Test</h1>"));
    }

    #[tokio::test]
    async fn test_missing_images_dir_is_write_failure() {
        let dir = tempfile::tempdir().unwrap();
        let orch = CaptureOrchestrator::new(Arc::new(MockBackend::new()), GalleryLayout::new(dir.path()));

        let err = orch.capture_and_maybe_publish(&config(true)).await.unwrap_err();
        assert!(matches!(err, PipelineError::WriteFailed { .. }));
        assert!(!orch.layout().index_path.exists());
    }

    #[tokio::test]
    async fn test_clipboard_label() {
        let dir = tempfile::tempdir().unwrap();
        let orch = orchestrator(dir.path());

        let outcome = orch
            .publish_clipboard_image(Some(ImageBuffer::from_test_pattern(8, 8)), &config(false))
            .await
            .unwrap();
        let name = outcome.image_path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.ends_with("_ClipboardImage.png"), "{name}");
    }

    #[tokio::test]
    async fn test_generate_page_failure_has_no_image() {
        let dir = tempfile::tempdir().unwrap();
        let orch = orchestrator(dir.path());
        fs::create_dir(&orch.layout().index_path).unwrap();

        let err = orch.generate_page(&config(false)).await.unwrap_err();
        assert!(matches!(err, PipelineError::PublishFailed { image_path: None, .. }));
    }
}
