//! Static HTML gallery generation
//!
//! The gallery is always regenerated in full from the images folder: no
//! asset list is kept in memory, so the document can never list a file that
//! was deleted or miss one that was added.
//!
//! # Document shape
//!
//! ```text
//! <!DOCTYPE html>
//! <html lang="ja">
//!   <head> charset, viewport, <title>{title}</title>, fixed <style> </head>
//!   <body contenteditable="true">
//!     <h1>{title}</h1>
//!     <div><p>▼ {file} - 更新日時: {yyyy-MM-dd HH:mm:ss}</p><img src="img/{file}" alt="{file}"></div>
//!     ...one div per asset, oldest first...
//!   </body>
//! </html>
//! ```
//!
//! Title and file names are escaped by `maud`.
//!
//! Concurrent builds against the same folder are not coordinated: each one
//! persists a complete document and the last rename wins.

use std::{
    ffi::OsStr,
    fs,
    io::Write,
    path::{Path, PathBuf},
    time::SystemTime,
};

use chrono::{DateTime, Local};
use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::{error::GalleryError, model::IMAGES_DIR_NAME};

/// Extensions (compared case-insensitively) that count as gallery assets
pub const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

const STYLE: &str = "body { font-family: Arial, sans-serif; margin: 20px; }\n\
                     img { max-width: 800px; display: block; margin: 10px 0; }";

const MODIFIED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// An image file found in the images folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    /// Full path on disk
    pub path:      PathBuf,
    /// File name as shown in the document
    pub file_name: String,
    /// Last-modified time
    pub modified:  SystemTime,
}

impl ImageAsset {
    /// Last-modified time rendered in local time
    pub fn modified_label(&self) -> String {
        DateTime::<Local>::from(self.modified)
            .format(MODIFIED_FORMAT)
            .to_string()
    }
}

/// Result of a successful build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GallerySummary {
    /// Document that was written
    pub output_path: PathBuf,
    /// Number of assets listed
    pub asset_count: usize,
}

/// Returns true when `path` has one of [`IMAGE_EXTENSIONS`]
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| IMAGE_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
}

/// Lists the image assets directly inside `images_dir`, oldest first
///
/// Subfolders are not descended into. Files sharing a modification time
/// keep directory enumeration order (stable sort). A file that vanishes
/// between listing and stat is skipped.
pub fn scan_assets(images_dir: &Path) -> Result<Vec<ImageAsset>, GalleryError> {
    let scan_err = |source| GalleryError::Scan {
        path: images_dir.to_path_buf(),
        source,
    };

    let mut assets = Vec::new();
    for entry in fs::read_dir(images_dir).map_err(scan_err)? {
        let path = entry.map_err(scan_err)?.path();
        if !is_image_file(&path) {
            continue;
        }

        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::debug!("Skipping {}: {}", path.display(), e);
                continue;
            }
        };
        if !metadata.is_file() {
            continue;
        }

        let modified = metadata.modified().map_err(scan_err)?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        assets.push(ImageAsset {
            path,
            file_name,
            modified,
        });
    }

    assets.sort_by_key(|asset| asset.modified);
    Ok(assets)
}

/// Renders the gallery document for `assets` in the given order
pub fn render_document(assets: &[ImageAsset], title: &str) -> String {
    let markup: Markup = html! {
        (DOCTYPE)
        html lang="ja" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(STYLE)) }
            }
            body contenteditable="true" {
                h1 { (title) }
                @for asset in assets {
                    div {
                        p { "▼ " (asset.file_name) " - 更新日時: " (asset.modified_label()) }
                        img src=(format!("{}/{}", IMAGES_DIR_NAME, asset.file_name)) alt=(asset.file_name);
                    }
                }
            }
        }
    };
    markup.into_string()
}

/// Scans `images_dir` and overwrites `output_path` with a fresh document
///
/// The document is written to a temporary file next to `output_path` and
/// renamed over it, so readers never observe a partially written page.
pub fn build(
    images_dir: &Path,
    output_path: &Path,
    title: &str,
) -> Result<GallerySummary, GalleryError> {
    let assets = scan_assets(images_dir)?;
    let document = render_document(&assets, title);

    write_atomically(output_path, document.as_bytes())?;

    tracing::info!("Gallery written to {} ({} images)", output_path.display(), assets.len());
    Ok(GallerySummary {
        output_path: output_path.to_path_buf(),
        asset_count: assets.len(),
    })
}

/// Runs [`build`] on the blocking pool and waits for it
pub async fn build_in_background(
    images_dir: PathBuf,
    output_path: PathBuf,
    title: String,
) -> Result<GallerySummary, GalleryError> {
    tokio::task::spawn_blocking(move || build(&images_dir, &output_path, &title))
        .await
        .map_err(|e| GalleryError::Task(e.to_string()))?
}

fn write_atomically(output_path: &Path, bytes: &[u8]) -> Result<(), GalleryError> {
    let write_err = |source| GalleryError::Write {
        path: output_path.to_path_buf(),
        source,
    };

    let parent = match output_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::Builder::new()
        .prefix(".index-")
        .suffix(".html.tmp")
        .tempfile_in(parent)
        .map_err(write_err)?;
    tmp.write_all(bytes).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(fs::Permissions::from_mode(0o644))
            .map_err(write_err)?;
    }

    tmp.persist(output_path).map_err(|e| write_err(e.error))?;
    Ok(())
}
