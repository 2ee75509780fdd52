//! Destination folder fixtures
//!
//! [`TestFolder`] owns a temporary destination folder with its `img/`
//! subfolder already created. Files can be added with an explicit
//! modification time so gallery ordering is deterministic.

use std::{
    fs::{self, File},
    path::{Path, PathBuf},
    time::{Duration, SystemTime},
};

use screpo_core::model::GalleryLayout;
use tempfile::TempDir;

/// A temporary destination folder, deleted on drop
pub struct TestFolder {
    _dir:   TempDir,
    layout: GalleryLayout,
}

impl TestFolder {
    /// Creates an empty destination folder with `img/`
    ///
    /// # Panics
    ///
    /// Panics if the temporary folder cannot be created.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let layout = GalleryLayout::new(dir.path());
        layout.ensure_images_dir().expect("create img/");
        Self { _dir: dir, layout }
    }

    /// Layout of the folder
    pub fn layout(&self) -> &GalleryLayout {
        &self.layout
    }

    /// Destination root
    pub fn root(&self) -> &Path {
        &self.layout.root
    }

    /// `img/` folder
    pub fn images_dir(&self) -> &Path {
        &self.layout.images_dir
    }

    /// Path of `index.html`
    pub fn index_path(&self) -> &Path {
        &self.layout.index_path
    }

    /// Writes a file into `img/` with mtime `secs` after a fixed base time
    pub fn add_image_at(&self, name: &str, secs: u64) -> PathBuf {
        let path = self.images_dir().join(name);
        fs::write(&path, b"not really an image").expect("write fixture");
        set_mtime(&path, mtime(secs));
        path
    }

    /// Lists file names directly inside `img/`, sorted
    pub fn image_names(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.images_dir())
            .expect("read img/")
            .map(|e| e.expect("dir entry").file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    /// Reads the generated gallery document
    pub fn read_index(&self) -> String {
        fs::read_to_string(self.index_path()).expect("read index.html")
    }
}

impl Default for TestFolder {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed base time plus `secs`
pub fn mtime(secs: u64) -> SystemTime {
    // 2024-01-01T00:00:00Z
    SystemTime::UNIX_EPOCH + Duration::from_secs(1_704_067_200 + secs)
}

/// Sets the modification time of an existing file
pub fn set_mtime(path: &Path, time: SystemTime) {
    File::options()
        .write(true)
        .open(path)
        .and_then(|f| f.set_modified(time))
        .expect("set mtime");
}
