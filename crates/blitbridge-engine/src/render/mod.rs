//! GPU presentation of the primary surface.
//!
//! Drawing itself happens on the CPU in `canvas`. This module only uploads
//! the primary surface into a texture and draws it as one nearest-sampled
//! quad at the layout's position and scale.
//!
//! Convention: geometry is in logical pixels (top-left origin, +Y down);
//! the vertex shader converts to NDC using a viewport uniform.

mod ctx;
mod presenter;

pub use ctx::{RenderCtx, RenderTarget};
pub use presenter::{PresentUniform, Presenter};
