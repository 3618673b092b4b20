//! Time subsystem.
//!
//! Provides stable, testable frame timing utilities.
//! Intended usage:
//! - one `FrameClock` per graphics context
//! - call `tick()` once per composited frame to obtain `FrameTime`
//! - in fixed-rate mode, sleep `FrameTime::wait` before the next frame

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
