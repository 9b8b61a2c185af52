use bytemuck::{Pod, Zeroable};

/// Straight-alpha 8-bit RGBA pixel.
///
/// This is the storage format of every surface and of palette entries. The
/// layout is `#[repr(C)]` so pixel rows can be viewed as raw RGBA bytes for
/// texture upload and image export.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash, Pod, Zeroable)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 255);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn is_transparent(self) -> bool {
        self.a == 0
    }

    /// Composites `self` over `dst` (Porter-Duff source-over, straight alpha).
    #[inline]
    pub fn over(self, dst: Rgba) -> Rgba {
        match self.a {
            255 => return self,
            0 => return dst,
            _ => {}
        }

        let sa = self.a as u32;
        let da = dst.a as u32;
        let dst_weight = da * (255 - sa) / 255;
        let out_a = sa + dst_weight;

        if out_a == 0 {
            return Rgba::TRANSPARENT;
        }

        let mix = |s: u8, d: u8| -> u8 {
            let v = (s as u32 * sa + d as u32 * dst_weight) / out_a;
            v.min(255) as u8
        };

        Rgba {
            r: mix(self.r, dst.r),
            g: mix(self.g, dst.g),
            b: mix(self.b, dst.b),
            a: out_a.min(255) as u8,
        }
    }

    /// Composites `self` into `dst` keeping only the part covered by `dst`
    /// (Porter-Duff source-in). Transparent destination pixels stay transparent.
    #[inline]
    pub fn source_in(self, dst: Rgba) -> Rgba {
        if dst.a == 0 {
            return Rgba::TRANSPARENT;
        }

        let a = (self.a as u32 * dst.a as u32 / 255) as u8;
        Rgba { a, ..self }
    }
}

impl From<[u8; 4]> for Rgba {
    #[inline]
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self { r, g, b, a }
    }
}

impl From<Rgba> for [u8; 4] {
    #[inline]
    fn from(c: Rgba) -> Self {
        [c.r, c.g, c.b, c.a]
    }
}

/// Pixel compositing mode of a surface.
///
/// Mirrors the two modes the device verbs can select: normal painting and the
/// tint mode set by `set_color_mod`.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum CompositeOp {
    #[default]
    SourceOver,
    SourceIn,
}

impl CompositeOp {
    #[inline]
    pub fn apply(self, src: Rgba, dst: Rgba) -> Rgba {
        match self {
            CompositeOp::SourceOver => src.over(dst),
            CompositeOp::SourceIn => src.source_in(dst),
        }
    }
}
