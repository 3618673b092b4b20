//! Composite output.
//!
//! Compositing a scene does not talk to the GPU directly. It records a
//! [`DrawList`]: an ordered stream of [`DrawCmd`]s, each carrying the clip
//! rect in effect when it was recorded. A renderer replays the stream front to
//! back.
//!
//! Convention:
//! - commands appear in paint order (back-to-front)
//! - `BeginOffscreen`/`EndOffscreen` bracket the commands drawn into a pooled
//!   render target; the list holds that target checked out until its owner
//!   hands it back to the pool

mod cmd;
mod list;
mod params;

pub use cmd::DrawCmd;
pub use list::{DrawItem, DrawList};
pub use params::EffectParams;
