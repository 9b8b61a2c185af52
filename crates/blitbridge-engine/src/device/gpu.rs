use anyhow::{Context, Result};
use winit::dpi::PhysicalSize;
use winit::window::Window;

use super::surface::{self, Swapchain};
use super::{GpuFrame, GpuInit, SurfaceErrorAction};

/// Device, queue and swapchain serving one window.
///
/// `'w` is the window borrow held by the swapchain surface.
pub struct Gpu<'w> {
    device: wgpu::Device,
    queue: wgpu::Queue,
    adapter_info: wgpu::AdapterInfo,
    swapchain: Swapchain<'w>,
}

impl<'w> Gpu<'w> {
    pub async fn new(window: &'w Window, init: GpuInit) -> Result<Self> {
        let size = window.inner_size();
        anyhow::ensure!(
            size.width > 0 && size.height > 0,
            "cannot present into a zero-sized window"
        );

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let surface = instance
            .create_surface(window)
            .context("window does not support a wgpu surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: init.power_preference,
                force_fallback_adapter: false,
                compatible_surface: Some(&surface),
            })
            .await
            .context("no GPU adapter can present to this window")?;

        let adapter_info = adapter.get_info();
        log::info!(
            "presenting with {} ({:?}, {:?})",
            adapter_info.name,
            adapter_info.backend,
            adapter_info.device_type
        );

        let (device, queue) = open_device(&adapter, init.required_limits).await?;

        let caps = surface.get_capabilities(&adapter);
        let format = surface::choose_surface_format(&caps.formats, init.prefer_srgb)
            .context("adapter reports no surface formats for this window")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode: init.present_mode,
            desired_maximum_frame_latency: init.desired_maximum_frame_latency,
            alpha_mode: surface::choose_alpha_mode(&caps.alpha_modes),
            view_formats: Vec::new(),
        };
        let swapchain = Swapchain::new(surface, &device, config);

        Ok(Self { device, queue, adapter_info, swapchain })
    }

    #[inline]
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    #[inline]
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn adapter_info(&self) -> &wgpu::AdapterInfo {
        &self.adapter_info
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.swapchain.format()
    }

    /// Drawable size in physical pixels; zero while minimized.
    pub fn size(&self) -> PhysicalSize<u32> {
        self.swapchain.size()
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.swapchain.resize(&self.device, new_size);
    }

    /// Next swapchain image with a fresh encoder.
    pub fn acquire_frame(&self) -> Result<GpuFrame, wgpu::SurfaceError> {
        self.swapchain.acquire(&self.device)
    }

    /// Submits the recorded commands and shows the image.
    pub fn present_frame(&self, frame: GpuFrame) {
        let GpuFrame { surface_texture, encoder, .. } = frame;
        self.queue.submit([encoder.finish()]);
        surface_texture.present();
    }

    pub fn recover(&self, err: &wgpu::SurfaceError) -> SurfaceErrorAction {
        self.swapchain.recover(&self.device, err)
    }
}

async fn open_device(
    adapter: &wgpu::Adapter,
    required_limits: wgpu::Limits,
) -> Result<(wgpu::Device, wgpu::Queue)> {
    adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some("blitbridge device"),
            required_features: wgpu::Features::empty(),
            required_limits,
            experimental_features: wgpu::ExperimentalFeatures::disabled(),
            memory_hints: wgpu::MemoryHints::MemoryUsage,
            trace: wgpu::Trace::Off,
        })
        .await
        .context("adapter refused to open a device")
}
