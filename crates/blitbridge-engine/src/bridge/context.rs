use crate::canvas::{DeviceError, RenderDevice, ScaleRequest, SurfaceId};
use crate::input::{InputEvent, InputMultiplexer};

use super::config::BridgeConfig;

/// Host-side state shared with one module instance.
///
/// Owns the render device and the input multiplexer. Nothing here is global;
/// every module instance gets its own `Bridge`.
#[derive(Debug, Clone)]
pub struct Bridge {
    device: RenderDevice,
    input: InputMultiplexer,
    fixed_scale: Option<f64>,
}

impl Bridge {
    pub fn new(config: BridgeConfig) -> Self {
        let BridgeConfig {
            resolution,
            palette,
            gestures,
            fixed_scale,
        } = config;

        let mut bridge = Self {
            device: RenderDevice::new(resolution, palette),
            input: InputMultiplexer::new(gestures),
            fixed_scale,
        };

        let (w, h) = (resolution.width as f64, resolution.height as f64);
        bridge.set_viewport(w, h);
        bridge
    }

    #[inline]
    pub fn device(&self) -> &RenderDevice {
        &self.device
    }

    #[inline]
    pub fn device_mut(&mut self) -> &mut RenderDevice {
        &mut self.device
    }

    #[inline]
    pub fn input(&self) -> &InputMultiplexer {
        &self.input
    }

    #[inline]
    pub fn input_mut(&mut self) -> &mut InputMultiplexer {
        &mut self.input
    }

    /// Routes a platform event. Returns `true` if it was consumed as input.
    pub fn handle_event(&mut self, event: InputEvent, now_ms: f64) -> bool {
        match event {
            InputEvent::Resized { width, height } => {
                self.set_viewport(width, height);
                false
            }
            other => self.input.apply(other, now_ms),
        }
    }

    /// Records a new viewport size and re-applies the scale factor: the fixed
    /// one if configured, otherwise the best fit.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.device.set_viewport(width, height);
        match self.fixed_scale {
            Some(f) => self.device.set_scale_factor(ScaleRequest::from_raw(f)),
            None => self.device.fit_to_viewport(),
        }
    }

    // ── wire conversions ──────────────────────────────────────────────────

    pub(crate) fn surface_id(&self, raw: i32) -> Result<SurfaceId, DeviceError> {
        u32::try_from(raw)
            .map(SurfaceId)
            .map_err(|_| DeviceError::InvalidHandle {
                handle: raw as i64,
                surface_count: self.device.surface_count(),
            })
    }

    pub(crate) fn palette_index(&self, raw: i32) -> Result<u32, DeviceError> {
        u32::try_from(raw).map_err(|_| DeviceError::PaletteIndex {
            index: raw as i64,
            palette_len: self.device.palette().len(),
        })
    }
}

impl Default for Bridge {
    fn default() -> Self {
        Self::new(BridgeConfig::default())
    }
}
