use std::collections::TryReserveError;

use super::color::{CompositeOp, Rgba};
use super::path::{rasterize_line, Path};

/// Integer rectangle in surface pixels. Width/height may be negative, in which
/// case the rectangle extends left/up from its origin.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl PixelRect {
    #[inline]
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Returns the rectangle with non-negative extents (as `i64` to avoid overflow).
    fn normalized(self) -> (i64, i64, i64, i64) {
        let (mut x, mut y, mut w, mut h) = (self.x as i64, self.y as i64, self.w as i64, self.h as i64);
        if w < 0 {
            x += w;
            w = -w;
        }
        if h < 0 {
            y += h;
            h = -h;
        }
        (x, y, w, h)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.w == 0 || self.h == 0
    }
}

/// Read-only view of a surface's pixels, used as a blit source.
#[derive(Debug, Copy, Clone)]
pub struct PixelView<'a> {
    pub width: u32,
    pub height: u32,
    pub pixels: &'a [Rgba],
}

impl PixelView<'_> {
    #[inline]
    fn get(&self, x: i64, y: i64) -> Option<Rgba> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        self.pixels.get(y as usize * self.width as usize + x as usize).copied()
    }
}

/// Per-surface drawing state, equivalent to a 2D context's style registers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrawState {
    pub stroke: Rgba,
    pub fill: Rgba,
    pub composite: CompositeOp,
    pub path: Path,
}

/// A rectangular RGBA pixel buffer with its own drawing state.
#[derive(Debug, Clone)]
pub struct Surface {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
    state: DrawState,
    revision: u64,
}

impl Surface {
    /// Creates a transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Rgba::TRANSPARENT)
    }

    pub fn filled(width: u32, height: u32, color: Rgba) -> Self {
        Self::with_pixels(width, height, vec![color; width as usize * height as usize])
    }

    /// Like [`Surface::new`], but reports allocation failure instead of aborting.
    pub fn try_new(width: u32, height: u32) -> Result<Self, TryReserveError> {
        let len = width as usize * height as usize;
        let mut pixels = Vec::new();
        pixels.try_reserve_exact(len)?;
        pixels.resize(len, Rgba::TRANSPARENT);
        Ok(Self::with_pixels(width, height, pixels))
    }

    fn with_pixels(width: u32, height: u32, pixels: Vec<Rgba>) -> Self {
        Self {
            width,
            height,
            pixels,
            state: DrawState {
                stroke: Rgba::BLACK,
                fill: Rgba::BLACK,
                ..DrawState::default()
            },
            revision: 0,
        }
    }

    /// Creates a surface from row-major pixels. `pixels.len()` must equal `width * height`.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Rgba>) -> Option<Self> {
        if pixels.len() != width as usize * height as usize {
            return None;
        }
        Some(Self::with_pixels(width, height, pixels))
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// Raw RGBA bytes, row-major.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Monotonic counter bumped by every pixel-modifying operation.
    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    #[inline]
    pub fn state(&self) -> &DrawState {
        &self.state
    }

    #[inline]
    pub fn state_mut(&mut self) -> &mut DrawState {
        &mut self.state
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y as usize * self.width as usize + x as usize).copied()
    }

    pub fn view(&self) -> PixelView<'_> {
        PixelView {
            width: self.width,
            height: self.height,
            pixels: &self.pixels,
        }
    }

    #[inline]
    fn blend_at(&mut self, x: i64, y: i64, src: Rgba, op: CompositeOp) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let idx = y as usize * self.width as usize + x as usize;
        self.pixels[idx] = op.apply(src, self.pixels[idx]);
    }

    /// Clips a normalized rect to the surface, returning `(x0, y0, x1, y1)` (exclusive end).
    fn clip(&self, x: i64, y: i64, w: i64, h: i64) -> Option<(i64, i64, i64, i64)> {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w).min(self.width as i64);
        let y1 = (y + h).min(self.height as i64);
        if x0 >= x1 || y0 >= y1 {
            None
        } else {
            Some((x0, y0, x1, y1))
        }
    }

    /// Fills `rect` with the current fill color using the current composite mode.
    pub fn fill_rect(&mut self, rect: PixelRect) {
        let (x, y, w, h) = rect.normalized();
        let Some((x0, y0, x1, y1)) = self.clip(x, y, w, h) else { return };

        let color = self.state.fill;
        let op = self.state.composite;
        for py in y0..y1 {
            for px in x0..x1 {
                self.blend_at(px, py, color, op);
            }
        }
        self.touch();
    }

    /// Strokes the current path with a 1-pixel line in the current stroke color.
    ///
    /// The path is kept; callers start a new one with `begin_path`.
    pub fn stroke_path(&mut self) {
        let color = self.state.stroke;
        let op = self.state.composite;
        let segments: Vec<_> = self.state.path.segments().collect();
        if segments.is_empty() {
            return;
        }

        let bounds = (self.width, self.height);
        let mut prev_end = None;
        for (a, b) in segments {
            let include_start = prev_end != Some(a);
            rasterize_line(a, b, include_start, bounds, |x, y| {
                self.blend_at(x, y, color, op)
            });
            prev_end = Some(b);
        }
        self.touch();
    }

    /// Copies `src_rect` of `source` into `dst_rect` of this surface, scaling with
    /// nearest-neighbour sampling. Destination pixels whose sample falls outside
    /// the source are left untouched.
    pub fn blit_from(&mut self, source: &PixelView<'_>, src_rect: PixelRect, dst_rect: PixelRect) {
        if src_rect.is_empty() || dst_rect.is_empty() {
            return;
        }

        let (sx, sy, sw, sh) = src_rect.normalized();
        let (dx, dy, dw, dh) = dst_rect.normalized();
        let Some((x0, y0, x1, y1)) = self.clip(dx, dy, dw, dh) else { return };

        let op = self.state.composite;
        for py in y0..y1 {
            // Sample at the destination pixel centre.
            let v = sy + ((2 * (py - dy) + 1) * sh) / (2 * dh);
            for px in x0..x1 {
                let u = sx + ((2 * (px - dx) + 1) * sw) / (2 * dw);
                if let Some(c) = source.get(u, v) {
                    self.blend_at(px, py, c, op);
                }
            }
        }
        self.touch();
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}
