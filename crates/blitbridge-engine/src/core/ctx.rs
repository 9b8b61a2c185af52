use winit::window::{Window, WindowId};

use crate::canvas::{ScreenLayout, Surface};
use crate::device::Gpu;
use crate::render::{Presenter, RenderCtx, RenderTarget};
use crate::time::FrameTime;
use crate::window::RuntimeCtx;

use super::app::AppControl;

/// Window handle plus read-only metadata.
pub struct WindowCtx<'a> {
    pub id: WindowId,
    pub window: &'a Window,
}

impl<'a> WindowCtx<'a> {
    /// Inner size in logical pixels.
    pub fn logical_size(&self) -> (f64, f64) {
        let logical = self.window.inner_size().to_logical::<f64>(self.window.scale_factor());
        (logical.width, logical.height)
    }

    #[inline]
    pub fn scale_factor(&self) -> f64 {
        self.window.scale_factor()
    }
}

/// Per-frame context passed to `App::on_frame`.
///
/// `'a` is the callback borrow; `'w` is the window borrow carried by `Gpu<'w>`.
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a mut Gpu<'w>,
    pub time: FrameTime,
    pub runtime: &'a mut RuntimeCtx,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    /// Acquires a frame, lets `presenter` draw `surface` with `layout`, and
    /// presents it. Surface errors skip the frame unless they are fatal.
    pub fn present(
        &mut self,
        presenter: &mut Presenter,
        surface: &Surface,
        layout: ScreenLayout,
        clear: wgpu::Color,
    ) -> AppControl {
        let (w, h) = self.window.logical_size();

        let mut frame = match self.gpu.acquire_frame() {
            Ok(f) => f,
            Err(err) => {
                let action = self.gpu.recover(&err);
                return if action.is_fatal() {
                    log::error!("surface lost beyond recovery ({err})");
                    AppControl::Exit
                } else {
                    AppControl::Continue
                };
            }
        };

        let rctx = RenderCtx::from_gpu(self.gpu, (w as f32, h as f32));

        // RenderTarget borrows frame.encoder; dropped before present_frame() takes frame.
        {
            let mut target = RenderTarget::from(&mut frame);
            presenter.present(&rctx, &mut target, surface, layout, clear);
        }

        self.window.window.pre_present_notify();
        self.gpu.present_frame(frame);

        AppControl::Continue
    }
}
