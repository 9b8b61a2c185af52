//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

/// Runs a pixel-art wasm module in a window, or headless.
#[derive(Debug, Parser)]
#[command(name = "blitbridge", version)]
pub struct Args {
    /// Compiled module (`.wasm`, or `.wat` text).
    pub module: PathBuf,

    /// Raw RGBA palette file (4 bytes per entry) replacing the default 16 colors.
    #[arg(long = "palette", value_name = "FILE")]
    pub palette: Option<PathBuf>,

    /// Fixed presentation scale. Without it the window refits on every resize to
    /// the largest scale, in 0.1 steps, that keeps the whole screen visible.
    #[arg(long = "scale")]
    pub scale: Option<f64>,

    /// Run without a window.
    #[arg(long = "headless")]
    pub headless: bool,

    /// Headless frame limit. `0` runs until the module finishes.
    #[arg(long = "frames", default_value_t = 600, requires = "headless")]
    pub frames: u64,

    /// Headless timestamp step in milliseconds.
    #[arg(long = "frame-ms", default_value_t = 1000.0 / 60.0, requires = "headless")]
    pub frame_ms: f64,

    /// Write the primary surface to this PNG when the run ends.
    #[arg(long = "snapshot", value_name = "PNG")]
    pub snapshot: Option<PathBuf>,

    /// Log filter (`env_logger` syntax). Defaults to `RUST_LOG`.
    #[arg(long = "log", value_name = "FILTER")]
    pub log: Option<String>,

    /// Window title.
    #[arg(long = "title", default_value = "blitbridge")]
    pub title: String,

    /// Present without waiting for vsync.
    #[arg(long = "no-vsync")]
    pub no_vsync: bool,
}

#[cfg(test)]
mod tests {
    use super::Args;
    use clap::{CommandFactory, Parser};

    #[test]
    fn module_path_alone_uses_defaults() {
        let args = Args::parse_from(["blitbridge", "game.wasm"]);
        assert_eq!(args.module.to_str(), Some("game.wasm"));
        assert!(!args.headless);
        assert_eq!(args.frames, 600);
        assert!(args.scale.is_none());
        assert_eq!(args.title, "blitbridge");
    }

    #[test]
    fn headless_flags_parse() {
        let args = Args::parse_from([
            "blitbridge",
            "game.wasm",
            "--headless",
            "--frames",
            "0",
            "--frame-ms",
            "10",
            "--snapshot",
            "out.png",
        ]);
        assert!(args.headless);
        assert_eq!(args.frames, 0);
        assert_eq!(args.frame_ms, 10.0);
        assert_eq!(args.snapshot.as_deref().and_then(|p| p.to_str()), Some("out.png"));
    }

    #[test]
    fn fractional_scale_is_accepted_and_documented() {
        let args = Args::parse_from(["blitbridge", "game.wasm", "--scale", "2.5"]);
        assert_eq!(args.scale, Some(2.5));

        let help = Args::command().render_long_help().to_string();
        assert!(help.contains("0.1 steps"));
        assert!(!help.contains("integer scale"));
    }

    #[test]
    fn frame_limit_requires_headless() {
        assert!(Args::try_parse_from(["blitbridge", "game.wasm", "--frames", "5"]).is_err());
    }

    #[test]
    fn module_is_required() {
        assert!(Args::try_parse_from(["blitbridge"]).is_err());
    }
}
