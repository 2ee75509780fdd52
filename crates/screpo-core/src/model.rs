//! Data models and type definitions for screpo
//!
//! This module defines the core types used throughout the pipeline:
//! - Platform and display backend detection types
//! - Capture regions and monitor descriptions
//! - The immutable per-call [`SessionConfig`]
//! - The on-disk [`GalleryLayout`] of a destination folder

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Name of the images subfolder inside a destination folder
pub const IMAGES_DIR_NAME: &str = "img";

/// Name of the generated gallery document inside a destination folder
pub const INDEX_FILE_NAME: &str = "index.html";

/// Title used when the user does not supply one
pub const DEFAULT_TITLE: &str = "スクリーンショット一覧";

/// Represents the display backend type for the current platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendType {
    /// No backend detected or not yet initialized
    None,
    /// Wayland display server (Linux)
    Wayland,
    /// X11 display server (Linux)
    X11,
    /// Windows desktop
    Windows,
    /// macOS desktop
    #[serde(rename = "macos")]
    MacOS,
}

impl BackendType {
    /// Returns the backend type as a lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendType::None => "none",
            BackendType::Wayland => "wayland",
            BackendType::X11 => "x11",
            BackendType::Windows => "windows",
            BackendType::MacOS => "macos",
        }
    }
}

impl std::fmt::Display for BackendType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Platform information including OS and display backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformInfo {
    /// Operating system name (e.g., "linux", "windows", "macos")
    pub os:      String,
    /// Detected display backend
    pub backend: BackendType,
}

impl PlatformInfo {
    /// Creates a new PlatformInfo instance
    pub fn new(os: String, backend: BackendType) -> Self {
        Self { os, backend }
    }
}

/// Rectangle in virtual-desktop coordinates identifying a capturable area
///
/// The origin is signed because monitors left of or above the primary
/// monitor have negative coordinates. Width and height are physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaptureRegion {
    /// Left edge
    pub x:      i32,
    /// Top edge
    pub y:      i32,
    /// Width in pixels
    pub width:  u32,
    /// Height in pixels
    pub height: u32,
}

impl CaptureRegion {
    /// Creates a new region
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns true if the region covers no pixels
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Right edge (exclusive)
    pub fn right(&self) -> i64 {
        i64::from(self.x) + i64::from(self.width)
    }

    /// Bottom edge (exclusive)
    pub fn bottom(&self) -> i64 {
        i64::from(self.y) + i64::from(self.height)
    }

    /// Returns true if `other` lies entirely within this region
    pub fn contains(&self, other: &CaptureRegion) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

impl std::fmt::Display for CaptureRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

/// A monitor as reported by the display enumeration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorInfo {
    /// Platform monitor identifier
    pub id:           u32,
    /// Human readable device name
    pub name:         String,
    /// Bounds of the monitor in virtual-desktop coordinates
    pub region:       CaptureRegion,
    /// Display scale factor. Region extents are already in physical pixels.
    pub scale_factor: f32,
    /// Whether the platform reports this monitor as primary
    pub is_primary:   bool,
}

/// Immutable configuration passed into the pipeline for every action
///
/// Replaces live widget state: the caller snapshots title, region and the
/// auto-publish flag once and hands the snapshot to each operation.
///
/// # Examples
///
/// ```
/// use screpo_core::model::{CaptureRegion, SessionConfig};
///
/// let config = SessionConfig::builder()
///     .title("Release notes")
///     .region(CaptureRegion::new(0, 0, 1920, 1080))
///     .auto_publish(true)
///     .build();
///
/// assert_eq!(config.title_text, "Release notes");
/// assert!(config.auto_publish);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Title written into the gallery document
    pub title_text:      String,
    /// Region captured by the capture action and used to anchor notifications
    pub selected_region: CaptureRegion,
    /// Rebuild the gallery after every successful capture or clipboard save
    pub auto_publish:    bool,
}

impl SessionConfig {
    /// Creates a builder with default values
    pub fn builder() -> SessionConfigBuilder {
        SessionConfigBuilder::default()
    }
}

/// Builder for [`SessionConfig`]
#[derive(Debug, Clone)]
pub struct SessionConfigBuilder {
    title_text:      String,
    selected_region: CaptureRegion,
    auto_publish:    bool,
}

impl Default for SessionConfigBuilder {
    fn default() -> Self {
        Self {
            title_text:      DEFAULT_TITLE.to_string(),
            selected_region: CaptureRegion::new(0, 0, 0, 0),
            auto_publish:    false,
        }
    }
}

impl SessionConfigBuilder {
    /// Sets the gallery title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title_text = title.into();
        self
    }

    /// Sets the selected capture region
    pub fn region(mut self, region: CaptureRegion) -> Self {
        self.selected_region = region;
        self
    }

    /// Enables or disables auto-publish
    pub fn auto_publish(mut self, enabled: bool) -> Self {
        self.auto_publish = enabled;
        self
    }

    /// Builds the immutable config
    pub fn build(self) -> SessionConfig {
        SessionConfig {
            title_text:      self.title_text,
            selected_region: self.selected_region,
            auto_publish:    self.auto_publish,
        }
    }
}

/// Paths that make up a destination folder
///
/// ```text
/// {root}/index.html
/// {root}/img/*.{png,jpg,jpeg,bmp}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryLayout {
    /// Destination folder selected by the user
    pub root:       PathBuf,
    /// Folder holding the image assets
    pub images_dir: PathBuf,
    /// Generated gallery document
    pub index_path: PathBuf,
}

impl GalleryLayout {
    /// Derives the layout for a destination folder without touching the disk
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        Self {
            images_dir: root.join(IMAGES_DIR_NAME),
            index_path: root.join(INDEX_FILE_NAME),
            root,
        }
    }

    /// Creates the images folder if it is missing
    pub fn ensure_images_dir(&self) -> std::io::Result<()> {
        if !self.images_dir.is_dir() {
            std::fs::create_dir_all(&self.images_dir)?;
            tracing::info!("Created images folder {}", self.images_dir.display());
        }
        Ok(())
    }
}
