//! screpo-core: screenshot-and-gallery pipeline
//!
//! Captures a monitor to a timestamped PNG, saves clipboard images and keeps
//! a static HTML gallery of the destination folder up to date. Platform
//! services (folder picker, global hotkey, clipboard, notifications) are
//! reached only through the capability traits defined here.

pub mod capture;
pub mod clipboard;
pub mod dispatch;
pub mod error;
pub mod gallery;
pub mod model;
pub mod naming;
pub mod notify;
pub mod pipeline;
pub mod startup;
pub mod util;
