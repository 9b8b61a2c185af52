use std::num::NonZeroU32;

use crate::canvas::{BlitGeometry, DeviceError};

use super::context::Bridge;

/// The fixed set of host functions a module may call.
///
/// Arguments and results use the module's wire types. Implementations convert
/// them once (wire `0` for "unset" becomes `None`, negative handles become
/// contract violations) before touching the device. A returned `DeviceError`
/// is fatal for the module.
pub trait HostImports {
    /// Pops the next input code, `0` when none is pending.
    fn get_keydown(&mut self) -> i32;

    /// `pixels` is the module memory slice for a non-null pointer, already
    /// bounds-checked by the caller. Returns the new handle or `0` on failure.
    fn create_texture(&mut self, pixels: Option<&[u8]>, width: u32, height: u32) -> i32;

    fn set_render_target(&mut self, handle: i32) -> Result<(), DeviceError>;
    fn set_render_source(&mut self, handle: i32) -> Result<(), DeviceError>;

    fn set_line_color(&mut self, index: i32) -> Result<(), DeviceError>;
    fn set_fill_color(&mut self, index: i32) -> Result<(), DeviceError>;
    fn set_color_mod(&mut self, index: i32) -> Result<(), DeviceError>;

    fn set_rect_size(&mut self, sw: i32, sh: i32, dw: i32, dh: i32);
    fn render_copy(&mut self, sx: i32, sy: i32, dx: i32, dy: i32) -> Result<(), DeviceError>;
    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32);

    fn toggle_scale_factor(&mut self);

    fn begin_path(&mut self);
    fn close_path(&mut self);
    fn move_to(&mut self, x: i32, y: i32);
    fn line_to(&mut self, x: i32, y: i32);
    fn stroke(&mut self);
}

/// Wire `0` means "use the default".
#[inline]
fn unset_if_zero(v: i32) -> Option<i32> {
    (v != 0).then_some(v)
}

impl HostImports for Bridge {
    fn get_keydown(&mut self) -> i32 {
        self.input_mut().poll_next_key().wire()
    }

    fn create_texture(&mut self, pixels: Option<&[u8]>, width: u32, height: u32) -> i32 {
        let id = self
            .device_mut()
            .create_surface(pixels, NonZeroU32::new(width), NonZeroU32::new(height));
        i32::try_from(id.0).unwrap_or_else(|_| {
            log::warn!("surface handle {} does not fit the wire type", id.0);
            0
        })
    }

    fn set_render_target(&mut self, handle: i32) -> Result<(), DeviceError> {
        let id = self.surface_id(handle)?;
        self.device_mut().set_render_target(id)
    }

    fn set_render_source(&mut self, handle: i32) -> Result<(), DeviceError> {
        let id = self.surface_id(handle)?;
        self.device_mut().set_render_source(id)
    }

    fn set_line_color(&mut self, index: i32) -> Result<(), DeviceError> {
        let idx = self.palette_index(index)?;
        self.device_mut().set_line_color(idx)
    }

    fn set_fill_color(&mut self, index: i32) -> Result<(), DeviceError> {
        let idx = self.palette_index(index)?;
        self.device_mut().set_fill_color(idx)
    }

    fn set_color_mod(&mut self, index: i32) -> Result<(), DeviceError> {
        let idx = self.palette_index(index)?;
        self.device_mut().set_color_mod(idx)
    }

    fn set_rect_size(&mut self, sw: i32, sh: i32, dw: i32, dh: i32) {
        self.device_mut().set_rect_size(BlitGeometry::new(sw, sh, dw, dh));
    }

    fn render_copy(&mut self, sx: i32, sy: i32, dx: i32, dy: i32) -> Result<(), DeviceError> {
        self.device_mut().render_copy(sx, sy, dx, dy)
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32) {
        self.device_mut().fill_rect(x, y, unset_if_zero(w), unset_if_zero(h));
    }

    fn toggle_scale_factor(&mut self) {
        self.device_mut().toggle_scale_factor();
    }

    fn begin_path(&mut self) {
        self.device_mut().begin_path();
    }

    fn close_path(&mut self) {
        self.device_mut().close_path();
    }

    fn move_to(&mut self, x: i32, y: i32) {
        self.device_mut().move_to(x, y);
    }

    fn line_to(&mut self, x: i32, y: i32) {
        self.device_mut().line_to(x, y);
    }

    fn stroke(&mut self) {
        self.device_mut().stroke();
    }
}
