//! Display backend detection
//!
//! The capture backend needs a running display server. On Linux that means
//! a Wayland compositor or an X server; Windows and macOS always have one.

use std::env;

use crate::model::{BackendType, PlatformInfo};

/// Detects the current platform and display backend
///
/// On Linux `$WAYLAND_DISPLAY` is checked before `$DISPLAY`; an empty value
/// counts as unset. Windows and macOS always report their native backend and
/// any other OS reports [`BackendType::None`].
///
/// ```
/// use screpo_core::util::detect::detect_platform;
///
/// let platform = detect_platform();
/// println!("Running on {} ({})", platform.os, platform.backend);
/// ```
pub fn detect_platform() -> PlatformInfo {
    detect_platform_with_env(|key| env::var(key).ok())
}

fn detect_platform_with_env<F>(_env_provider: F) -> PlatformInfo
where
    F: Fn(&str) -> Option<String>,
{
    #[cfg(target_os = "linux")]
    {
        PlatformInfo::new("linux".to_string(), detect_linux_backend(&_env_provider))
    }

    #[cfg(target_os = "windows")]
    {
        PlatformInfo::new("windows".to_string(), BackendType::Windows)
    }

    #[cfg(target_os = "macos")]
    {
        PlatformInfo::new("macos".to_string(), BackendType::MacOS)
    }

    #[cfg(not(any(target_os = "linux", target_os = "windows", target_os = "macos")))]
    {
        PlatformInfo::new("unknown".to_string(), BackendType::None)
    }
}

#[cfg(target_os = "linux")]
fn detect_linux_backend<F>(env_provider: &F) -> BackendType
where
    F: Fn(&str) -> Option<String>,
{
    let is_set = |key| env_provider(key).is_some_and(|value: String| !value.is_empty());

    if is_set("WAYLAND_DISPLAY") {
        BackendType::Wayland
    } else if is_set("DISPLAY") {
        BackendType::X11
    } else {
        BackendType::None
    }
}
