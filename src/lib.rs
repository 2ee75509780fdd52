//! screpo: screenshot capture application
//!
//! Command-line front end and platform adapters for `screpo-core`.

pub mod app;
pub mod cli;
pub mod platform;
