//! Software render device.
//!
//! Every surface is a CPU-side RGBA buffer; the primary surface (handle 0) is
//! what the presenter uploads and shows on screen each frame.

pub mod color;
pub mod device;
pub mod error;
pub mod layout;
pub mod palette;
pub mod path;
pub mod surface;

pub use color::{CompositeOp, Rgba};
pub use device::{BlitGeometry, RenderDevice, SurfaceId, MAX_SURFACE_DIM, MAX_SURFACE_PIXELS};
pub use error::DeviceError;
pub use layout::{fit_scale_factor, Resolution, ScaleRequest, ScreenLayout};
pub use palette::{Palette, PaletteError, DEFAULT_PALETTE};
pub use surface::{PixelRect, Surface};
