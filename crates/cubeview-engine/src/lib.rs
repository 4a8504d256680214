//! cubeview engine crate.
//!
//! Renders a rotating, per-face colored cube into an off-screen wgpu target
//! and reads every frame back as RGBA bytes.
//!
//! ```no_run
//! use cubeview_engine::RenderContext;
//!
//! let mut ctx = RenderContext::initialize(50, 50)?;
//! let frame = ctx.render_frame(0.05)?;
//! assert_eq!(frame.len(), 50 * 50 * 4);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod color;
pub mod device;
pub mod geometry;
pub mod logging;
pub mod readback;
pub mod render;
pub mod time;

mod context;

pub use color::rgb_to_hex;
pub use context::RenderContext;
pub use device::{FrameError, InitError, SurfaceInit};
pub use readback::PixelBuffer;
