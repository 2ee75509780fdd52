//! Timestamped file names for captured images
//!
//! Names have the shape `{yyyyMMddHHmmssfff}_{label}{extension}` in local
//! time. Two names taken more than a millisecond apart never collide; two
//! taken within the same millisecond for the same label do.

use chrono::{DateTime, Local, TimeZone};

/// Label used for screen captures
pub const SCREENSHOT_LABEL: &str = "Screenshot_";

/// Label used for clipboard saves
pub const CLIPBOARD_LABEL: &str = "ClipboardImage";

/// Extension of every file the pipeline writes
pub const PNG_EXTENSION: &str = ".png";

/// chrono format for the millisecond timestamp prefix
const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S%3f";

/// Generates file names from the current time and a label
///
/// # Examples
///
/// ```
/// use chrono::{Local, TimeZone};
/// use screpo_core::naming::FileNamer;
///
/// let namer = FileNamer::png();
/// let at = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
/// assert_eq!(namer.name_at(&at, "Screenshot_"), "20240309070501000_Screenshot_.png");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNamer {
    extension: String,
}

impl FileNamer {
    /// Creates a namer appending `extension` (including the dot)
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
        }
    }

    /// Namer for PNG files
    pub fn png() -> Self {
        Self::new(PNG_EXTENSION)
    }

    /// Extension appended to every name
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Name for `base_label` at the current local time
    pub fn generate_name(&self, base_label: &str) -> String {
        self.name_at(&Local::now(), base_label)
    }

    /// Name for `base_label` at an explicit time
    pub fn name_at<Tz>(&self, at: &DateTime<Tz>, base_label: &str) -> String
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        format!("{}_{}{}", at.format(TIMESTAMP_FORMAT), base_label, self.extension)
    }
}

impl Default for FileNamer {
    fn default() -> Self {
        Self::png()
    }
}
