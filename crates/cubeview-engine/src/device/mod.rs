//! GPU device + off-screen surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue without a window
//! - creating the color/depth render targets that stand in for a canvas
//! - the error types reported by initialization and readback

mod error;
mod gpu;
mod init;
mod surface;

pub use error::{FrameError, InitError, ShaderStage};
pub use gpu::Gpu;
pub use init::SurfaceInit;
pub use surface::{check_size, OffscreenSurface, COLOR_FORMAT, DEPTH_FORMAT};
pub(crate) use surface::padded_bytes_per_row;
