use std::num::NonZeroU32;

use super::color::{CompositeOp, Rgba};
use super::error::DeviceError;
use super::layout::{fit_scale_factor, next_cycle_factor, Resolution, ScaleRequest, ScreenLayout};
use super::palette::Palette;
use super::surface::{PixelRect, PixelView, Surface};

/// Largest accepted surface edge, in pixels.
pub const MAX_SURFACE_DIM: u32 = 16_384;

/// Largest accepted surface area, in pixels (64 MiB of RGBA).
pub const MAX_SURFACE_PIXELS: u64 = 4096 * 4096;

/// Stable surface handle. Handle 0 is the primary (on-screen) surface.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct SurfaceId(pub u32);

impl SurfaceId {
    pub const PRIMARY: SurfaceId = SurfaceId(0);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Reusable blit geometry: source size and destination size.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct BlitGeometry {
    pub src_w: i32,
    pub src_h: i32,
    pub dst_w: i32,
    pub dst_h: i32,
}

impl BlitGeometry {
    #[inline]
    pub const fn new(src_w: i32, src_h: i32, dst_w: i32, dst_h: i32) -> Self {
        Self { src_w, src_h, dst_w, dst_h }
    }
}

/// Indexed multi-surface 2D canvas.
///
/// Owns every surface, the palette, the target/source registers, the blit
/// geometry record and the on-screen layout of the primary surface. All
/// drawing happens on the CPU; the presenter uploads the primary surface.
#[derive(Debug, Clone)]
pub struct RenderDevice {
    resolution: Resolution,
    palette: Palette,
    surfaces: Vec<Surface>,
    target: SurfaceId,
    source: Option<SurfaceId>,
    geometry: BlitGeometry,
    viewport: (f64, f64),
    layout: ScreenLayout,
}

impl RenderDevice {
    /// Creates a device with the primary surface (opaque black) at `resolution`.
    pub fn new(resolution: Resolution, palette: Palette) -> Self {
        let primary = Surface::filled(resolution.width, resolution.height, Rgba::BLACK);
        let viewport = (resolution.width as f64, resolution.height as f64);

        Self {
            resolution,
            palette,
            surfaces: vec![primary],
            target: SurfaceId::PRIMARY,
            source: None,
            geometry: BlitGeometry::default(),
            viewport,
            layout: ScreenLayout::compute(ScaleRequest::Auto, viewport, resolution),
        }
    }

    // ── queries ───────────────────────────────────────────────────────────

    #[inline]
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    #[inline]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    #[inline]
    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    pub fn surface(&self, id: SurfaceId) -> Option<&Surface> {
        self.surfaces.get(id.index())
    }

    #[inline]
    pub fn primary(&self) -> &Surface {
        &self.surfaces[0]
    }

    #[inline]
    pub fn render_target(&self) -> SurfaceId {
        self.target
    }

    #[inline]
    pub fn render_source(&self) -> Option<SurfaceId> {
        self.source
    }

    #[inline]
    pub fn geometry(&self) -> BlitGeometry {
        self.geometry
    }

    #[inline]
    pub fn layout(&self) -> ScreenLayout {
        self.layout
    }

    #[inline]
    pub fn viewport(&self) -> (f64, f64) {
        self.viewport
    }

    /// Composite mode of the current render target.
    pub fn composite_op(&self) -> CompositeOp {
        self.target_surface().state().composite
    }

    fn check(&self, id: SurfaceId) -> Result<SurfaceId, DeviceError> {
        if id.index() < self.surfaces.len() {
            Ok(id)
        } else {
            Err(DeviceError::InvalidHandle {
                handle: id.0 as i64,
                surface_count: self.surfaces.len(),
            })
        }
    }

    fn color(&self, index: u32) -> Result<Rgba, DeviceError> {
        self.palette.get(index).ok_or(DeviceError::PaletteIndex {
            index: index as i64,
            palette_len: self.palette.len(),
        })
    }

    fn target_surface(&self) -> &Surface {
        &self.surfaces[self.target.index()]
    }

    fn target_mut(&mut self) -> &mut Surface {
        let idx = self.target.index();
        &mut self.surfaces[idx]
    }

    // ── surfaces ──────────────────────────────────────────────────────────

    /// Allocates a new offscreen surface and returns its handle.
    ///
    /// Missing dimensions default to the logical resolution. When `pixels` is
    /// given it must hold exactly `width * height * 4` RGBA bytes. Failures are
    /// logged and yield [`SurfaceId::PRIMARY`] instead of an error.
    pub fn create_surface(
        &mut self,
        pixels: Option<&[u8]>,
        width: Option<NonZeroU32>,
        height: Option<NonZeroU32>,
    ) -> SurfaceId {
        let w = width.map_or(self.resolution.width, NonZeroU32::get);
        let h = height.map_or(self.resolution.height, NonZeroU32::get);

        match Self::build_surface(pixels, w, h) {
            Ok(surface) => {
                let id = SurfaceId(self.surfaces.len() as u32);
                self.surfaces.push(surface);
                log::debug!("created surface {} ({w}x{h})", id.0);
                id
            }
            Err(reason) => {
                log::warn!("create_surface({w}x{h}) failed: {reason}");
                SurfaceId::PRIMARY
            }
        }
    }

    fn build_surface(pixels: Option<&[u8]>, w: u32, h: u32) -> Result<Surface, String> {
        if w > MAX_SURFACE_DIM || h > MAX_SURFACE_DIM {
            return Err(format!("exceeds maximum edge of {MAX_SURFACE_DIM}px"));
        }
        if u64::from(w) * u64::from(h) > MAX_SURFACE_PIXELS {
            return Err(format!("exceeds maximum area of {MAX_SURFACE_PIXELS}px"));
        }

        let Some(bytes) = pixels else {
            return Surface::try_new(w, h).map_err(|e| format!("cannot allocate pixels: {e}"));
        };

        let expected = w as usize * h as usize * 4;
        if bytes.len() != expected {
            return Err(format!(
                "pixel data is {} bytes, expected {expected}",
                bytes.len()
            ));
        }

        let texels = bytemuck::try_cast_slice::<u8, Rgba>(bytes)
            .map_err(|e| format!("pixel data not castable to RGBA: {e}"))?;
        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(texels.len())
            .map_err(|e| format!("cannot allocate pixels: {e}"))?;
        pixels.extend_from_slice(texels);

        Surface::from_pixels(w, h, pixels).ok_or_else(|| "pixel count mismatch".to_string())
    }

    pub fn set_render_target(&mut self, id: SurfaceId) -> Result<(), DeviceError> {
        self.target = self.check(id)?;
        Ok(())
    }

    pub fn set_render_source(&mut self, id: SurfaceId) -> Result<(), DeviceError> {
        self.source = Some(self.check(id)?);
        Ok(())
    }

    // ── colors ────────────────────────────────────────────────────────────

    pub fn set_line_color(&mut self, index: u32) -> Result<(), DeviceError> {
        let c = self.color(index)?;
        self.target_mut().state_mut().stroke = c;
        Ok(())
    }

    pub fn set_fill_color(&mut self, index: u32) -> Result<(), DeviceError> {
        let c = self.color(index)?;
        self.target_mut().state_mut().fill = c;
        Ok(())
    }

    /// Tints the existing content of the render target with palette color `index`.
    ///
    /// Sets the fill color, switches the target to [`CompositeOp::SourceIn`] and
    /// fills the whole target. The composite mode is left at `SourceIn`; any
    /// later drawing on this surface composites the same way.
    pub fn set_color_mod(&mut self, index: u32) -> Result<(), DeviceError> {
        self.set_fill_color(index)?;
        self.target_mut().state_mut().composite = CompositeOp::SourceIn;
        self.fill_rect(0, 0, None, None);
        Ok(())
    }

    // ── drawing ───────────────────────────────────────────────────────────

    pub fn set_rect_size(&mut self, geometry: BlitGeometry) {
        self.geometry = geometry;
    }

    /// Blits `(sx, sy, src_w, src_h)` of the render source to `(dx, dy, dst_w, dst_h)`
    /// of the render target using the recorded geometry.
    pub fn render_copy(&mut self, sx: i32, sy: i32, dx: i32, dy: i32) -> Result<(), DeviceError> {
        let source = self.source.ok_or(DeviceError::NoRenderSource)?;
        let g = self.geometry;
        let src_rect = PixelRect::new(sx, sy, g.src_w, g.src_h);
        let dst_rect = PixelRect::new(dx, dy, g.dst_w, g.dst_h);

        let (s, t) = (source.index(), self.target.index());
        if s == t {
            let snapshot = self.surfaces[s].pixels().to_vec();
            let surface = &mut self.surfaces[t];
            let view = PixelView {
                width: surface.width(),
                height: surface.height(),
                pixels: &snapshot,
            };
            surface.blit_from(&view, src_rect, dst_rect);
        } else {
            let (src, dst) = pair_mut(&mut self.surfaces, s, t);
            dst.blit_from(&src.view(), src_rect, dst_rect);
        }
        Ok(())
    }

    /// Fills a rectangle of the render target. `None` extents cover the full
    /// target width/height.
    pub fn fill_rect(&mut self, x: i32, y: i32, w: Option<i32>, h: Option<i32>) {
        let target = self.target_mut();
        let w = w.unwrap_or(target.width() as i32);
        let h = h.unwrap_or(target.height() as i32);
        target.fill_rect(PixelRect::new(x, y, w, h));
    }

    pub fn begin_path(&mut self) {
        self.target_mut().state_mut().path.clear();
    }

    pub fn close_path(&mut self) {
        self.target_mut().state_mut().path.close();
    }

    pub fn move_to(&mut self, x: i32, y: i32) {
        self.target_mut().state_mut().path.move_to(x, y);
    }

    pub fn line_to(&mut self, x: i32, y: i32) {
        self.target_mut().state_mut().path.line_to(x, y);
    }

    pub fn stroke(&mut self) {
        self.target_mut().stroke_path();
    }

    // ── layout ────────────────────────────────────────────────────────────

    /// Records the viewport size (logical pixels) used by layout computations.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport = (width.max(0.0), height.max(0.0));
    }

    /// Applies `request` to the primary surface's on-screen presentation.
    pub fn set_scale_factor(&mut self, request: ScaleRequest) {
        self.layout = ScreenLayout::compute(request, self.viewport, self.resolution);
        log::debug!(
            "scale factor {} (margins {}, {})",
            self.layout.scale,
            self.layout.margin_x,
            self.layout.margin_y
        );
    }

    /// Advances the manual zoom cycle `0..=10`; `0` presents at 1x.
    pub fn toggle_scale_factor(&mut self) {
        let next = next_cycle_factor(self.layout.scale);
        self.set_scale_factor(ScaleRequest::from_raw(next as f64));
    }

    /// Recomputes the best-fit factor for the current viewport and applies it.
    pub fn fit_to_viewport(&mut self) {
        let factor = fit_scale_factor(self.viewport, self.resolution);
        self.set_scale_factor(ScaleRequest::Factor(factor));
    }
}

/// Borrows `v[a]` shared and `v[b]` mutably. `a` and `b` must differ.
fn pair_mut<T>(v: &mut [T], a: usize, b: usize) -> (&T, &mut T) {
    debug_assert_ne!(a, b);
    if a < b {
        let (lo, hi) = v.split_at_mut(b);
        (&lo[a], &mut hi[0])
    } else {
        let (lo, hi) = v.split_at_mut(a);
        (&hi[0], &mut lo[b])
    }
}
