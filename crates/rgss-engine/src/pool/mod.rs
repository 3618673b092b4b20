//! GPU texture/framebuffer pool.
//!
//! Transient render targets (viewport effect passes, tilemap atlases) are
//! requested and released many times per second. [`TexPool`] keeps released
//! targets around, keyed by exact size, and hands them back on the next
//! matching request. Cached memory is bounded by a byte budget; the globally
//! least-recently-released target is evicted first.
//!
//! Allocation itself is delegated to a [`TextureBackend`].

mod recording;
mod tex_pool;
mod texfbo;

pub use recording::{BackendCall, RecordingBackend};
pub use tex_pool::{TexPool, TexPoolConfig, TexPoolStats};
pub use texfbo::{FboId, TexFbo, TexId, TextureBackend};
