use bytemuck::{Pod, Zeroable};

use crate::canvas::{Resolution, ScreenLayout, Surface};

use super::{RenderCtx, RenderTarget};

/// Uniform block of `present.wgsl`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct PresentUniform {
    pub viewport: [f32; 2],
    pub origin: [f32; 2],
    pub size: [f32; 2],
    pub _pad: [f32; 2],
}

impl PresentUniform {
    /// Places the primary surface per `layout` inside `viewport` (logical px).
    pub fn new(viewport: (f32, f32), layout: ScreenLayout, res: Resolution) -> Self {
        let (x, y, w, h) = layout.dest_rect(res);
        Self {
            viewport: [viewport.0.max(1.0), viewport.1.max(1.0)],
            origin: [x, y],
            size: [w, h],
            _pad: [0.0; 2],
        }
    }
}

/// Texture format matching the swapchain's encoding, so sRGB bytes written by
/// the canvas reach the screen unchanged.
fn texture_format_for(surface_format: wgpu::TextureFormat) -> wgpu::TextureFormat {
    if surface_format.is_srgb() {
        wgpu::TextureFormat::Rgba8UnormSrgb
    } else {
        wgpu::TextureFormat::Rgba8Unorm
    }
}

fn layout_entry(
    binding: u32,
    visibility: wgpu::ShaderStages,
    ty: wgpu::BindingType,
) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry { binding, visibility, ty, count: None }
}

/// Pipeline and bind group layout for one swapchain format.
struct QuadPipeline {
    format: wgpu::TextureFormat,
    pipeline: wgpu::RenderPipeline,
    bind_layout: wgpu::BindGroupLayout,
}

impl QuadPipeline {
    fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::include_wgsl!("shaders/present.wgsl"));

        let bind_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("blitbridge present bindings"),
            entries: &[
                layout_entry(
                    0,
                    wgpu::ShaderStages::VERTEX,
                    wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<PresentUniform>() as u64,
                        ),
                    },
                ),
                layout_entry(
                    1,
                    wgpu::ShaderStages::FRAGMENT,
                    wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                ),
                layout_entry(
                    2,
                    wgpu::ShaderStages::FRAGMENT,
                    wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                ),
            ],
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("blitbridge present layout"),
            bind_group_layouts: &[&bind_layout],
            immediate_size: 0,
        });

        // The primary surface is opaque; no blending.
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("blitbridge present pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(format.into())],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        Self { format, pipeline, bind_layout }
    }
}

/// GPU copy of the primary surface.
struct ScreenTexture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    /// Surface revision last written; `None` forces an upload.
    revision: Option<u64>,
}

impl ScreenTexture {
    fn new(device: &wgpu::Device, width: u32, height: u32, format: wgpu::TextureFormat) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("blitbridge screen texture"),
            size: wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&Default::default());
        Self { texture, view, revision: None }
    }

    fn matches(&self, width: u32, height: u32, format: wgpu::TextureFormat) -> bool {
        let size = self.texture.size();
        size.width == width && size.height == height && self.texture.format() == format
    }

    fn sync(&mut self, queue: &wgpu::Queue, surface: &Surface) {
        if self.revision == Some(surface.revision()) {
            return;
        }
        queue.write_texture(
            self.texture.as_image_copy(),
            surface.as_bytes(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(surface.width() * 4),
                rows_per_image: None,
            },
            self.texture.size(),
        );
        self.revision = Some(surface.revision());
    }
}

/// Uploads the primary surface and draws it as one scaled quad.
///
/// GPU objects are built on first use and rebuilt only when the swapchain
/// format or surface size changes. The texture is rewritten only when the
/// surface's revision moved.
#[derive(Default)]
pub struct Presenter {
    pipeline: Option<QuadPipeline>,
    screen: Option<ScreenTexture>,
    sampler: Option<wgpu::Sampler>,
    uniform: Option<wgpu::Buffer>,
    bind_group: Option<wgpu::BindGroup>,
}

impl Presenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears `target` to `clear` and draws `surface` placed by `layout`.
    pub fn present(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        surface: &Surface,
        layout: ScreenLayout,
        clear: wgpu::Color,
    ) {
        self.prepare(ctx, surface);

        let res = Resolution::new(surface.width(), surface.height());
        let uniform = PresentUniform::new(ctx.viewport, layout, res);

        let (Some(pipeline), Some(bind_group), Some(ubo)) =
            (&self.pipeline, &self.bind_group, &self.uniform)
        else {
            return;
        };
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&uniform));

        let mut pass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("blitbridge present pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                depth_slice: None,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear),
                    store: wgpu::StoreOp::Store,
                },
            })],
            ..Default::default()
        });
        pass.set_pipeline(&pipeline.pipeline);
        pass.set_bind_group(0, bind_group, &[]);
        pass.draw(0..4, 0..1);
    }

    /// Brings every GPU object in line with the swapchain format and `surface`.
    fn prepare(&mut self, ctx: &RenderCtx<'_>, surface: &Surface) {
        let device = ctx.device;

        if self.pipeline.as_ref().is_none_or(|p| p.format != ctx.surface_format) {
            self.pipeline = Some(QuadPipeline::new(device, ctx.surface_format));
            self.bind_group = None;
        }

        let (w, h) = (surface.width(), surface.height());
        let tex_format = texture_format_for(ctx.surface_format);
        if self.screen.as_ref().is_none_or(|s| !s.matches(w, h, tex_format)) {
            log::debug!("screen texture {w}x{h} {tex_format:?}");
            self.screen = Some(ScreenTexture::new(device, w, h, tex_format));
            self.bind_group = None;
        }

        let sampler = &*self.sampler.get_or_insert_with(|| {
            // Nearest both ways so pixels stay square at any scale.
            device.create_sampler(&wgpu::SamplerDescriptor {
                label: Some("blitbridge nearest sampler"),
                mag_filter: wgpu::FilterMode::Nearest,
                min_filter: wgpu::FilterMode::Nearest,
                mipmap_filter: wgpu::MipmapFilterMode::Nearest,
                ..Default::default()
            })
        });

        let ubo = &*self.uniform.get_or_insert_with(|| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("blitbridge present uniform"),
                size: std::mem::size_of::<PresentUniform>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        });

        let (Some(pipeline), Some(screen)) = (&self.pipeline, &mut self.screen) else {
            return;
        };
        screen.sync(ctx.queue, surface);

        if self.bind_group.is_none() {
            self.bind_group = Some(device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("blitbridge present bind group"),
                layout: &pipeline.bind_layout,
                entries: &[
                    wgpu::BindGroupEntry { binding: 0, resource: ubo.as_entire_binding() },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(&screen.view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::Sampler(sampler),
                    },
                ],
            }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::ScaleRequest;

    #[test]
    fn uniform_places_surface_at_layout_margins() {
        let res = Resolution::new(256, 192);
        let layout = ScreenLayout::compute(ScaleRequest::Factor(2.0), (800.0, 600.0), res);
        let u = PresentUniform::new((800.0, 600.0), layout, res);

        assert_eq!(u.viewport, [800.0, 600.0]);
        assert_eq!(u.origin, [144.0, 108.0]);
        assert_eq!(u.size, [512.0, 384.0]);
    }

    #[test]
    fn degenerate_viewport_is_clamped() {
        let res = Resolution::DEFAULT;
        let layout = ScreenLayout::compute(ScaleRequest::Auto, (0.0, 0.0), res);
        let u = PresentUniform::new((0.0, 0.0), layout, res);
        assert_eq!(u.viewport, [1.0, 1.0]);
    }

    #[test]
    fn uniform_is_sixteen_byte_aligned() {
        assert_eq!(std::mem::size_of::<PresentUniform>() % 16, 0);
    }

    #[test]
    fn texture_encoding_follows_swapchain() {
        assert_eq!(
            texture_format_for(wgpu::TextureFormat::Bgra8UnormSrgb),
            wgpu::TextureFormat::Rgba8UnormSrgb
        );
        assert_eq!(
            texture_format_for(wgpu::TextureFormat::Bgra8Unorm),
            wgpu::TextureFormat::Rgba8Unorm
        );
    }
}
