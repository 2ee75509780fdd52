//! Platform service adapters
//!
//! Each module implements one screpo-core capability trait on top of an
//! ecosystem crate:
//!
//! | Capability | Adapter | Crate |
//! |------------|---------|-------|
//! | `FolderPicker` | [`DialogFolderPicker`] | rfd |
//! | `HotkeyRegistrar` | [`GlobalHotkeyRegistrar`] | global-hotkey |
//! | `ClipboardReader` / `ClipboardWriter` | [`SystemClipboard`] | arboard |
//! | `NotificationSink` | [`ConsoleNotifier`] | stdout |
//!
//! [`event_loop`] hosts the winit loop that global-hotkey needs on the main
//! thread during watch mode.

pub mod clipboard;
pub mod console;
pub mod event_loop;
pub mod hotkey;
pub mod picker;

pub use clipboard::SystemClipboard;
pub use console::{ConsoleCommand, ConsoleNotifier};
pub use hotkey::{GlobalHotkeyRegistrar, HotkeyGuard};
pub use picker::DialogFolderPicker;
