//! GPU device + surface management.
//!
//! Creates the wgpu instance/adapter/device/queue for a window, keeps the
//! swapchain configured across resizes and hands out one frame at a time.

mod error;
mod frame;
mod gpu;
mod init;
mod surface;

pub use error::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use gpu::Gpu;
pub use init::GpuInit;
