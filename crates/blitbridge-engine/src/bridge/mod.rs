//! Host side of the module boundary.
//!
//! A [`Bridge`] is the state one module instance draws into and reads input
//! from. [`HostImports`] is the fixed call surface the module sees, in wire
//! types. [`FrameLoop`] drives `init`/`update` against any [`GuestModule`],
//! either headless or inside the window runtime through [`BridgeApp`].

mod app;
mod config;
mod context;
mod frame_loop;
mod imports;

pub use app::BridgeApp;
pub use config::BridgeConfig;
pub use context::Bridge;
pub use frame_loop::{FrameLoop, GuestModule, HeadlessConfig, LoopState};
pub use imports::HostImports;
