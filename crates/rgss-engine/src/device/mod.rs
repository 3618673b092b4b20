//! GPU device and pooled render-target allocation.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue (headless, no surface)
//! - backing the texture pool with real wgpu textures

mod gpu;
mod init;
mod textures;

pub use gpu::Gpu;
pub use init::GpuInit;
pub use textures::{PooledTarget, WgpuTextures};
