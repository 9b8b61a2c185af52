//! Time subsystem.
//!
//! One `FrameClock` per window; `tick()` once per presented frame. The
//! resulting `FrameTime::timestamp_ms` is what the module's `update` sees.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
