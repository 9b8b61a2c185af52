use std::fmt;

/// Contract violation reported by the render device.
///
/// These indicate a mismatch between the module and the host (the module is the
/// only caller), so the bridge treats them as fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// Surface handle outside `0..surface_count`.
    InvalidHandle { handle: i64, surface_count: usize },
    /// Palette index outside `0..palette_len`.
    PaletteIndex { index: i64, palette_len: usize },
    /// `render_copy` issued before any `set_render_source`.
    NoRenderSource,
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceError::InvalidHandle { handle, surface_count } => write!(
                f,
                "invalid surface handle {handle} (valid: 0..{surface_count})"
            ),
            DeviceError::PaletteIndex { index, palette_len } => write!(
                f,
                "palette index {index} out of range (palette has {palette_len} entries)"
            ),
            DeviceError::NoRenderSource => write!(f, "render_copy called with no render source set"),
        }
    }
}

impl std::error::Error for DeviceError {}
