//! Native folder picker

use std::path::PathBuf;

use screpo_core::startup::FolderPicker;

const DIALOG_TITLE: &str = "Select the folder to save screenshots in";

/// Folder picker backed by the native dialog
///
/// The dialog is modal and must be opened from the main thread; macOS
/// refuses to show it anywhere else.
#[derive(Debug, Clone)]
pub struct DialogFolderPicker {
    title: String,
}

impl DialogFolderPicker {
    pub fn new() -> Self {
        Self {
            title: DIALOG_TITLE.to_string(),
        }
    }
}

impl Default for DialogFolderPicker {
    fn default() -> Self {
        Self::new()
    }
}

impl FolderPicker for DialogFolderPicker {
    fn pick_folder(&self) -> Option<PathBuf> {
        rfd::FileDialog::new().set_title(&self.title).pick_folder()
    }
}
