//! Main-thread event loop for watch mode
//!
//! global-hotkey delivers key presses through the event loop of the thread
//! that created its manager: a Win32 message pump on Windows, the main run
//! loop on macOS. Watch mode therefore runs a windowless winit loop on the
//! main thread, registers the hotkey there and keeps the async work on a
//! separate runtime thread. The runtime asks the loop to stop by sending
//! [`LoopEvent::Exit`] through an [`EventLoopProxy`].

use winit::{
    application::ApplicationHandler,
    error::EventLoopError,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop, EventLoopProxy},
    window::WindowId,
};

/// Events sent to the main loop from other threads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopEvent {
    /// Watch mode finished; leave the loop
    Exit,
}

/// Creates the loop without showing a dock icon or window
pub fn build_event_loop() -> Result<EventLoop<LoopEvent>, EventLoopError> {
    let mut builder = EventLoop::<LoopEvent>::with_user_event();

    #[cfg(target_os = "macos")]
    {
        use winit::platform::macos::{ActivationPolicy, EventLoopBuilderExtMacOS};
        builder.with_activation_policy(ActivationPolicy::Accessory);
    }

    let event_loop = builder.build()?;
    event_loop.set_control_flow(ControlFlow::Wait);
    Ok(event_loop)
}

/// Handler with no windows; it only waits for [`LoopEvent::Exit`]
#[derive(Debug, Default)]
pub struct HotkeyLoop;

impl ApplicationHandler<LoopEvent> for HotkeyLoop {
    fn resumed(&mut self, _event_loop: &ActiveEventLoop) {
        tracing::debug!("Event loop running");
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _id: WindowId, _event: WindowEvent) {}

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: LoopEvent) {
        match event {
            LoopEvent::Exit => {
                tracing::debug!("Event loop exit requested");
                event_loop.exit();
            }
        }
    }
}

/// Asks the loop behind `proxy` to exit
///
/// A loop that has already closed is not an error.
pub fn request_exit(proxy: &EventLoopProxy<LoopEvent>) {
    if proxy.send_event(LoopEvent::Exit).is_err() {
        tracing::debug!("Event loop already closed");
    }
}
