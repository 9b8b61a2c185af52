mod cli;
mod config;
mod snapshot;
mod wasm;

use anyhow::Result;
use blitbridge_engine::bridge::{Bridge, BridgeApp, FrameLoop, LoopState};
use blitbridge_engine::logging::init_logging;
use blitbridge_engine::window::Runtime;
use clap::Parser;

use cli::Args;
use config::HostConfig;
use wasm::WasmModule;

fn main() {
    if let Err(err) = run() {
        eprintln!("blitbridge: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();
    let config = HostConfig::from_args(&args)?;
    init_logging(config.logging.clone());

    log::info!("loading {}", args.module.display());
    let module = WasmModule::from_file(&args.module, Bridge::new(config.bridge.clone()))?;
    let mut frame_loop = FrameLoop::start(module, 0.0)?;

    let state = match config.headless {
        Some(headless) => frame_loop.run_headless(headless)?,
        None => {
            let app = Runtime::run(config.runtime, config.gpu, BridgeApp::new(frame_loop))?;
            let (lp, error) = app.into_parts();
            frame_loop = lp;
            if let Some(err) = error {
                return Err(err);
            }
            frame_loop.state()
        }
    };

    match state {
        LoopState::Finished { code } => log::info!("module finished ({code}) after {} frames", frame_loop.frames()),
        LoopState::Running => log::info!("stopped after {} frames", frame_loop.frames()),
    }

    if let Some(path) = &args.snapshot {
        snapshot::write_png(frame_loop.bridge().device().primary(), path)?;
    }
    Ok(())
}
