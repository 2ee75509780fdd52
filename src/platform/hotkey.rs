//! Global hotkey registration
//!
//! Key presses are delivered on `GlobalHotKeyEvent::receiver()`, a blocking
//! channel shared by the whole process. [`forward_presses`] bridges it into
//! tokio.
//!
//! Register from the main thread while a
//! [`HotkeyLoop`](super::event_loop::HotkeyLoop) runs there; without that
//! loop Windows and macOS never deliver the presses.

use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState, hotkey::HotKey};
use screpo_core::{error::StartupError, startup::HotkeyRegistrar};
use tokio::sync::mpsc;

/// Registers hotkeys through the OS
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalHotkeyRegistrar;

/// Keeps a hotkey registered; unregisters it on drop
pub struct HotkeyGuard {
    manager: GlobalHotKeyManager,
    hotkey:  HotKey,
    combo:   String,
}

impl HotkeyGuard {
    /// Identifier carried by this hotkey's events
    pub fn id(&self) -> u32 {
        self.hotkey.id()
    }

    /// Combination as given by the user
    pub fn combo(&self) -> &str {
        &self.combo
    }
}

impl Drop for HotkeyGuard {
    fn drop(&mut self) {
        match self.manager.unregister(self.hotkey) {
            Ok(()) => tracing::info!("Hotkey {} unregistered", self.combo),
            Err(e) => tracing::warn!("Failed to unregister hotkey {}: {}", self.combo, e),
        }
    }
}

/// Parses a combination such as `Control+PrintScreen`
pub fn parse_combo(combo: &str) -> Result<HotKey, StartupError> {
    combo
        .parse::<HotKey>()
        .map_err(|e| StartupError::HotkeyRegistrationFailed {
            combo:  combo.to_string(),
            reason: e.to_string(),
        })
}

impl HotkeyRegistrar for GlobalHotkeyRegistrar {
    type Guard = HotkeyGuard;

    fn register(&self, combo: &str) -> Result<HotkeyGuard, StartupError> {
        let hotkey = parse_combo(combo)?;
        let failed = |reason: String| StartupError::HotkeyRegistrationFailed {
            combo: combo.to_string(),
            reason,
        };

        let manager = GlobalHotKeyManager::new().map_err(|e| failed(e.to_string()))?;
        manager.register(hotkey).map_err(|e| failed(e.to_string()))?;

        tracing::info!("Hotkey {} registered", combo);
        Ok(HotkeyGuard {
            manager,
            hotkey,
            combo: combo.to_string(),
        })
    }
}

/// Forwards presses of hotkey `id` to `tx` from a dedicated thread
///
/// The thread ends once `tx` is closed and the next event arrives.
pub fn forward_presses(id: u32, tx: mpsc::Sender<()>) {
    std::thread::spawn(move || {
        let receiver = GlobalHotKeyEvent::receiver();
        while let Ok(event) = receiver.recv() {
            if event.id != id || event.state != HotKeyState::Pressed {
                continue;
            }
            if tx.blocking_send(()).is_err() {
                break;
            }
        }
        tracing::debug!("Hotkey forwarder stopped");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_default_combo() {
        assert!(parse_combo(screpo_core::startup::DEFAULT_HOTKEY).is_ok());
    }

    #[test]
    fn test_invalid_combo_fails_before_touching_os() {
        let err = GlobalHotkeyRegistrar.register("Control+NoSuchKey").unwrap_err();
        match err {
            StartupError::HotkeyRegistrationFailed { combo, .. } => {
                assert_eq!(combo, "Control+NoSuchKey")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
