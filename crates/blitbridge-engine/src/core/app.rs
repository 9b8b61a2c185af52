use winit::event::WindowEvent;

use super::ctx::{FrameCtx, WindowCtx};

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract driven by the window runtime.
pub trait App {
    /// Called once after the window and GPU context exist, before any frame.
    fn on_start(&mut self, window: &WindowCtx<'_>) {
        let _ = window;
    }

    /// Called for every window event, before the runtime's own handling.
    fn on_window_event(&mut self, window: &WindowCtx<'_>, event: &WindowEvent) -> AppControl {
        let _ = (window, event);
        AppControl::Continue
    }

    /// Called once per redraw.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
