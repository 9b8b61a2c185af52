//! Window + runtime loop.
//!
//! Owns the `winit` event loop and the single presentation window, and wires
//! them to the GPU layer and a `core::App`.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig, RuntimeCtx};
