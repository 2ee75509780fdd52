//! Test utilities for screpo integration tests
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! screpo-test-utils = { path = "../screpo-test-utils" }
//! ```
//!
//! # Modules
//!
//! - [`fixtures`]: destination folders and image files with controlled mtimes
//! - [`recorders`]: in-memory notification sink and clipboard
//!
//! ```ignore
//! use screpo_test_utils::{fixtures::TestFolder, recorders::RecordingNotifier};
//!
//! let folder = TestFolder::new();
//! folder.add_image_at("shot1.png", 10);
//! let sink = RecordingNotifier::new();
//! ```

pub mod fixtures;
pub mod recorders;
