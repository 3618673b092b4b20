//! RGSS engine core.
//!
//! This crate owns the pieces every RGSS-compatible player needs underneath
//! its script bindings:
//! - `list`: arena-backed intrusive lists
//! - `scene`: element ordering and compositing into a draw list
//! - `pool`: budgeted cache of GPU render targets
//! - `value`: Color, Tone, Rect and Table with their binary encodings
//! - `graphics`: the per-frame driver tying them together

pub mod config;
pub mod device;
pub mod error;
pub mod graphics;
pub mod list;
pub mod logging;
pub mod pool;
pub mod render;
pub mod scene;
pub mod time;
pub mod value;

pub use config::{EngineConfig, RgssVersion};
pub use error::{EngineError, ErrorKind};
pub use graphics::Graphics;
