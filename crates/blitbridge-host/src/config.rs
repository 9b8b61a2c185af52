//! Turns parsed arguments into engine configuration.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use blitbridge_engine::bridge::{BridgeConfig, HeadlessConfig};
use blitbridge_engine::canvas::Palette;
use blitbridge_engine::device::GpuInit;
use blitbridge_engine::logging::LoggingConfig;
use blitbridge_engine::window::RuntimeConfig;
use winit::dpi::LogicalSize;

use crate::cli::Args;

/// Everything the host needs to start a run.
#[derive(Debug, Clone)]
pub struct HostConfig {
    pub bridge: BridgeConfig,
    pub headless: Option<HeadlessConfig>,
    pub runtime: RuntimeConfig,
    pub gpu: GpuInit,
    pub logging: LoggingConfig,
}

impl HostConfig {
    pub fn from_args(args: &Args) -> Result<Self> {
        let mut bridge = BridgeConfig::default();
        if let Some(path) = &args.palette {
            bridge.palette = load_palette(path)?;
        }
        if let Some(scale) = args.scale {
            anyhow::ensure!(scale.is_finite() && scale >= 0.0, "--scale must be a non-negative number");
            bridge.fixed_scale = Some(scale);
        }

        let headless = args.headless.then(|| HeadlessConfig {
            max_frames: (args.frames > 0).then_some(args.frames),
            frame_ms: args.frame_ms,
        });

        let runtime = RuntimeConfig {
            title: args.title.clone(),
            initial_size: window_size_for(&bridge),
            ..RuntimeConfig::default()
        };

        let gpu = if args.no_vsync {
            GpuInit::unthrottled()
        } else {
            GpuInit::default()
        };

        let logging = match &args.log {
            Some(filter) => LoggingConfig::with_filter(filter.clone()),
            None => LoggingConfig::default(),
        };

        Ok(Self {
            bridge,
            headless,
            runtime,
            gpu,
            logging,
        })
    }
}

fn load_palette(path: &Path) -> Result<Palette> {
    let bytes = fs::read(path).with_context(|| format!("failed to read palette {}", path.display()))?;
    Palette::from_rgba_bytes(&bytes).with_context(|| format!("invalid palette {}", path.display()))
}

/// Default window: three times the logical resolution, or the fixed scale.
fn window_size_for(bridge: &BridgeConfig) -> LogicalSize<f64> {
    let scale = match bridge.fixed_scale {
        Some(f) if f >= 1.0 => f.floor(),
        _ => 3.0,
    };
    LogicalSize::new(
        bridge.resolution.width as f64 * scale,
        bridge.resolution.height as f64 * scale,
    )
}
