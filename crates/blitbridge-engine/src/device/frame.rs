/// One acquired swapchain image plus the encoder recording into it.
///
/// Short-lived: holding it blocks acquisition of the next image. Passing it
/// to `Gpu::present_frame` shows it.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}
