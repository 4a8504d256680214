//! Time subsystem.
//!
//! Provides stable, testable frame timing utilities without coupling to the
//! render loop. Intended usage:
//! - one `FrameClock` per render loop
//! - call `tick()` once per rendered frame to obtain `FrameTime`

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
