//! Blitbridge engine crate.
//!
//! Host-side runtime for sandboxed pixel-art modules: an indexed-palette
//! software canvas, input multiplexing, and the platform + GPU pieces that
//! put the canvas on screen.

pub mod bridge;
pub mod canvas;
pub mod core;
pub mod device;
pub mod input;
pub mod logging;
pub mod render;
pub mod time;
pub mod window;
