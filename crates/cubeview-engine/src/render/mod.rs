//! GPU rendering subsystem.
//!
//! The cube renderer owns its GPU resources (program, mesh buffers, matrix
//! uniforms) and draws through a [`BindScope`] so every binding is paired with
//! the draw that uses it.
//!
//! Convention:
//! - model space is the unit cube `[-1, 1]^3`, right-handed, camera looks down -Z
//! - clip-space depth is wgpu's `[0, 1]`

mod bind;
mod ctx;
mod cube;

pub mod camera;
pub mod program;

pub use bind::{BindScope, ClearValues};
pub use camera::RotationState;
pub use ctx::{RenderCtx, RenderTarget};
pub use cube::CubeRenderer;
