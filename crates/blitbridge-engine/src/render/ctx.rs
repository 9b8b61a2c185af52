use crate::device::{Gpu, GpuFrame};

/// What the presenter needs from the GPU layer for one frame.
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface_format: wgpu::TextureFormat,
    /// Window size in logical pixels; the layout is expressed in the same units.
    pub viewport: (f32, f32),
}

impl<'a> RenderCtx<'a> {
    pub fn from_gpu(gpu: &'a Gpu<'_>, viewport: (f32, f32)) -> Self {
        Self {
            device: gpu.device(),
            queue: gpu.queue(),
            surface_format: gpu.surface_format(),
            viewport,
        }
    }
}

/// Encoder and swapchain view of the frame being recorded.
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
}

impl<'a> From<&'a mut GpuFrame> for RenderTarget<'a> {
    fn from(frame: &'a mut GpuFrame) -> Self {
        Self {
            encoder: &mut frame.encoder,
            color_view: &frame.view,
        }
    }
}
