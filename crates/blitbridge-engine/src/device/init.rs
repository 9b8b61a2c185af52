/// Initialization parameters for the GPU layer.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Prefer an sRGB surface format. Surface pixels are sRGB-encoded bytes,
    /// so an sRGB target shows them unchanged.
    pub prefer_srgb: bool,

    /// `Fifo` paces the frame loop to the display refresh.
    pub present_mode: wgpu::PresentMode,

    /// A single textured quad per frame does not need the discrete GPU.
    pub power_preference: wgpu::PowerPreference,

    pub required_limits: wgpu::Limits,

    /// Hint only; support depends on platform/backend.
    pub desired_maximum_frame_latency: u32,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            power_preference: wgpu::PowerPreference::LowPower,
            required_limits: wgpu::Limits::downlevel_defaults(),
            desired_maximum_frame_latency: 2,
        }
    }
}

impl GpuInit {
    /// Defaults with presentation unthrottled (`AutoNoVsync`).
    pub fn unthrottled() -> Self {
        Self {
            present_mode: wgpu::PresentMode::AutoNoVsync,
            ..Self::default()
        }
    }
}
