//! Scene graph: ordered element lists and compositing.
//!
//! Responsibilities:
//! - own elements and scenes behind generation-checked handles
//! - keep every scene sorted by (`z`, `sprite_y` in modern mode, creation stamp)
//! - walk a scene front to back, recording draw commands
//!
//! Drawable kinds are isolated per file under `scene::drawable`.

mod composite;
mod ctx;
mod geometry;
mod graph;
mod id;
mod key;

pub mod drawable;

pub use composite::composite;
pub use ctx::{CreationClock, GraphCtx, TieBreak};
pub use geometry::Geometry;
pub use graph::SceneGraph;
pub use id::{ElementId, SceneId};
pub use key::OrderKey;
