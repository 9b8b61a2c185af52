use std::path::Path;

use anyhow::{Context, Result};
use blitbridge_engine::canvas::Surface;
use image::{ImageFormat, RgbaImage};

/// Writes `surface` as an RGBA PNG.
pub fn write_png(surface: &Surface, path: &Path) -> Result<()> {
    let image = RgbaImage::from_raw(surface.width(), surface.height(), surface.as_bytes().to_vec())
        .context("surface buffer does not match its dimensions")?;

    image
        .save_with_format(path, ImageFormat::Png)
        .with_context(|| format!("failed to write snapshot {}", path.display()))?;

    log::info!("snapshot written to {}", path.display());
    Ok(())
}
