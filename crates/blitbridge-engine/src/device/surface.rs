use winit::dpi::PhysicalSize;

use super::{GpuFrame, SurfaceErrorAction};

/// Picks the swapchain format, preferring 8-bit sRGB when asked to.
pub(crate) fn choose_surface_format(
    formats: &[wgpu::TextureFormat],
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    let first = *formats.first()?;

    if prefer_srgb {
        let preferred = [
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        ];
        if let Some(f) = preferred.into_iter().find(|f| formats.contains(f)) {
            return Some(f);
        }
    }

    Some(first)
}

/// The primary surface is opaque, so `Opaque` is preferred when offered.
pub(crate) fn choose_alpha_mode(modes: &[wgpu::CompositeAlphaMode]) -> wgpu::CompositeAlphaMode {
    if modes.contains(&wgpu::CompositeAlphaMode::Opaque) {
        wgpu::CompositeAlphaMode::Opaque
    } else {
        modes.first().copied().unwrap_or(wgpu::CompositeAlphaMode::Auto)
    }
}

/// A window surface plus the configuration it was last given.
///
/// `size` tracks the window even while it is zero-area (minimized); the
/// surface itself keeps its last non-zero configuration.
pub(crate) struct Swapchain<'w> {
    surface: wgpu::Surface<'w>,
    config: wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
}

impl<'w> Swapchain<'w> {
    pub(crate) fn new(
        surface: wgpu::Surface<'w>,
        device: &wgpu::Device,
        config: wgpu::SurfaceConfiguration,
    ) -> Self {
        surface.configure(device, &config);
        log::debug!(
            "swapchain {:?} {}x{} ({:?})",
            config.format,
            config.width,
            config.height,
            config.present_mode
        );
        let size = PhysicalSize::new(config.width, config.height);
        Self { surface, config, size }
    }

    #[inline]
    pub(crate) fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    #[inline]
    pub(crate) fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    fn drawable(&self) -> bool {
        self.size.width > 0 && self.size.height > 0
    }

    pub(crate) fn resize(&mut self, device: &wgpu::Device, new_size: PhysicalSize<u32>) {
        self.size = new_size;
        if !self.drawable() {
            return;
        }
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(device, &self.config);
    }

    pub(crate) fn acquire(
        &self,
        device: &wgpu::Device,
    ) -> Result<GpuFrame, wgpu::SurfaceError> {
        let surface_texture = self.surface.get_current_texture()?;
        let view = surface_texture.texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some("blitbridge swapchain view"),
            ..Default::default()
        });
        let encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("blitbridge frame encoder"),
        });
        Ok(GpuFrame { surface_texture, view, encoder })
    }

    /// Lost/outdated surfaces are reconfigured in place; out-of-memory is fatal.
    pub(crate) fn recover(
        &self,
        device: &wgpu::Device,
        err: &wgpu::SurfaceError,
    ) -> SurfaceErrorAction {
        match err {
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
                if self.drawable() {
                    self.surface.configure(device, &self.config);
                }
                SurfaceErrorAction::Reconfigured
            }
            wgpu::SurfaceError::OutOfMemory => SurfaceErrorAction::Fatal,
            wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => {
                log::debug!("surface acquisition failed ({err}); skipping frame");
                SurfaceErrorAction::SkipFrame
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::{CompositeAlphaMode, TextureFormat};

    #[test]
    fn srgb_preferred_when_available() {
        let formats = [TextureFormat::Bgra8Unorm, TextureFormat::Bgra8UnormSrgb];
        assert_eq!(choose_surface_format(&formats, true), Some(TextureFormat::Bgra8UnormSrgb));
        assert_eq!(choose_surface_format(&formats, false), Some(TextureFormat::Bgra8Unorm));
    }

    #[test]
    fn no_formats_means_no_surface() {
        assert_eq!(choose_surface_format(&[], true), None);
    }

    #[test]
    fn opaque_alpha_preferred() {
        let modes = [CompositeAlphaMode::PreMultiplied, CompositeAlphaMode::Opaque];
        assert_eq!(choose_alpha_mode(&modes), CompositeAlphaMode::Opaque);
        assert_eq!(choose_alpha_mode(&[]), CompositeAlphaMode::Auto);
    }
}
