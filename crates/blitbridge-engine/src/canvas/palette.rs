use std::fmt;

use super::color::Rgba;

/// Built-in 16-color palette, one RGBA quadruple per entry.
#[rustfmt::skip]
pub const DEFAULT_PALETTE: [u8; 64] = [
    0x00, 0x00, 0x00, 0x00, // transparent
    0x00, 0x00, 0x00, 0xff, // black
    0x3e, 0xb8, 0x49, 0xff, // medium green
    0x74, 0xd0, 0x7d, 0xff, // light green
    0x59, 0x55, 0xe0, 0xff, // dark blue
    0x80, 0x76, 0xf1, 0xff, // light blue
    0xb9, 0x5e, 0x51, 0xff, // dark red
    0x65, 0xdb, 0xef, 0xff, // cyan
    0xdb, 0x65, 0x59, 0xff, // medium red
    0xff, 0x89, 0x7d, 0xff, // light red
    0xcc, 0xc3, 0x5e, 0xff, // dark yellow
    0xde, 0xd0, 0x87, 0xff, // light yellow
    0x3a, 0xa2, 0x41, 0xff, // dark green
    0xb7, 0x66, 0xb5, 0xff, // magenta
    0xcc, 0xcc, 0xcc, 0xff, // gray
    0xff, 0xff, 0xff, 0xff, // white
];

/// Error returned by [`Palette::from_rgba_bytes`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteError {
    Empty,
    /// Byte count is not a multiple of four.
    Truncated { len: usize },
}

impl fmt::Display for PaletteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaletteError::Empty => write!(f, "palette has no entries"),
            PaletteError::Truncated { len } => {
                write!(f, "palette length {len} is not a multiple of 4 (RGBA)")
            }
        }
    }
}

impl std::error::Error for PaletteError {}

/// Immutable indexed color table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    entries: Vec<Rgba>,
}

impl Palette {
    /// Builds a palette from a flat `R,G,B,A,R,G,B,A,...` byte sequence.
    pub fn from_rgba_bytes(bytes: &[u8]) -> Result<Self, PaletteError> {
        if bytes.is_empty() {
            return Err(PaletteError::Empty);
        }
        if bytes.len() % 4 != 0 {
            return Err(PaletteError::Truncated { len: bytes.len() });
        }

        let entries = bytes
            .chunks_exact(4)
            .map(|c| Rgba::new(c[0], c[1], c[2], c[3]))
            .collect();

        Ok(Self { entries })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolves an index, or `None` when it is out of range.
    #[inline]
    pub fn get(&self, index: u32) -> Option<Rgba> {
        self.entries.get(index as usize).copied()
    }

    pub fn entries(&self) -> &[Rgba] {
        &self.entries
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            entries: DEFAULT_PALETTE
                .chunks_exact(4)
                .map(|c| Rgba::new(c[0], c[1], c[2], c[3]))
                .collect(),
        }
    }
}
