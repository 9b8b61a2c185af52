use winit::event::WindowEvent;

use crate::core::{App, AppControl, FrameCtx, WindowCtx};
use crate::input::platform::winit::translate_window_event;
use crate::render::Presenter;
use crate::time::FrameClock;

use super::frame_loop::{FrameLoop, GuestModule, LoopState};

/// Runs a [`FrameLoop`] inside the windowed runtime.
///
/// Each redraw steps the module once and presents the primary surface.
/// Window events are translated and fed to the module's bridge as they arrive.
pub struct BridgeApp<M: GuestModule> {
    frame_loop: FrameLoop<M>,
    presenter: Presenter,
    clear: wgpu::Color,
    input_clock: FrameClock,
    error: Option<anyhow::Error>,
}

impl<M: GuestModule> BridgeApp<M> {
    pub fn new(frame_loop: FrameLoop<M>) -> Self {
        Self {
            frame_loop,
            presenter: Presenter::new(),
            clear: wgpu::Color::BLACK,
            input_clock: FrameClock::new(),
            error: None,
        }
    }

    /// Color of the letterbox margins.
    pub fn with_clear_color(mut self, clear: wgpu::Color) -> Self {
        self.clear = clear;
        self
    }

    #[inline]
    pub fn frame_loop(&self) -> &FrameLoop<M> {
        &self.frame_loop
    }

    /// Error that stopped the loop, if any.
    pub fn take_error(&mut self) -> Option<anyhow::Error> {
        self.error.take()
    }

    pub fn into_parts(self) -> (FrameLoop<M>, Option<anyhow::Error>) {
        (self.frame_loop, self.error)
    }
}

impl<M: GuestModule> App for BridgeApp<M> {
    fn on_start(&mut self, window: &WindowCtx<'_>) {
        let (w, h) = window.logical_size();
        self.frame_loop.bridge_mut().set_viewport(w, h);
        log::debug!("viewport {w}x{h}, layout {:?}", self.frame_loop.bridge().device().layout());
    }

    fn on_window_event(&mut self, window: &WindowCtx<'_>, event: &WindowEvent) -> AppControl {
        if let Some(ev) = translate_window_event(window.scale_factor(), event) {
            let now_ms = self.input_clock.now_ms();
            self.frame_loop.bridge_mut().handle_event(ev, now_ms);
        }
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        match self.frame_loop.step(ctx.time.timestamp_ms()) {
            Ok(LoopState::Running) => {
                let device = self.frame_loop.bridge().device();
                ctx.present(&mut self.presenter, device.primary(), device.layout(), self.clear)
            }
            Ok(LoopState::Finished { .. }) => {
                ctx.runtime.close_window();
                AppControl::Exit
            }
            Err(err) => {
                log::error!("module aborted: {err:#}");
                self.error = Some(err);
                AppControl::Exit
            }
        }
    }
}
