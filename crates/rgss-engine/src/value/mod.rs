//! Script-visible value types with fixed binary encodings.
//!
//! `Color`, `Tone`, `Rect` and `Table` round-trip through the host language's
//! marshal format (little-endian, see [`Serializable`]). Each carries a
//! [`Revision`] that advances on every mutation so GPU-side caches derived from
//! the value can tell when they are stale.

mod color;
mod rect;
mod revision;
mod serial;
mod table;
mod tone;

pub use color::Color;
pub use rect::Rect;
pub use revision::{Revision, RevisionWatch};
pub use serial::Serializable;
pub use table::Table;
pub use tone::Tone;
