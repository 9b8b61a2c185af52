use crate::canvas::{Palette, Resolution};
use crate::input::GestureConfig;

/// Construction parameters for a [`Bridge`](super::Bridge).
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Size of the primary surface and default size of new surfaces.
    pub resolution: Resolution,

    pub palette: Palette,

    pub gestures: GestureConfig,

    /// Fixed presentation scale. `None` fits the viewport on every resize.
    pub fixed_scale: Option<f64>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            resolution: Resolution::DEFAULT,
            palette: Palette::default(),
            gestures: GestureConfig::default(),
            fixed_scale: None,
        }
    }
}
