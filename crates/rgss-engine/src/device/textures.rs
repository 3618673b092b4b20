use std::collections::HashMap;

use crate::pool::{FboId, TexFbo, TexId, TextureBackend};

/// GPU objects behind one pooled [`TexFbo`].
///
/// The texture is the sampled side, the view is the render-target side.
#[derive(Debug)]
pub struct PooledTarget {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

/// [`TextureBackend`] allocating RGBA8 render targets on a wgpu device.
///
/// Handles are plain ids; a renderer resolves them with [`target`](Self::target).
pub struct WgpuTextures {
    device: wgpu::Device,
    max_texture_size: u32,
    next_id: u32,
    live: HashMap<u32, PooledTarget>,
}

impl WgpuTextures {
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

    pub fn new(device: &wgpu::Device) -> Self {
        Self {
            device: device.clone(),
            max_texture_size: device.limits().max_texture_dimension_2d,
            next_id: 1,
            live: HashMap::new(),
        }
    }

    /// GPU objects for a live handle.
    pub fn target(&self, texfbo: TexFbo) -> Option<&PooledTarget> {
        self.live.get(&texfbo.tex.0)
    }

    /// Number of handles created and not yet destroyed.
    pub fn live(&self) -> usize {
        self.live.len()
    }
}

impl TextureBackend for WgpuTextures {
    fn max_texture_size(&self) -> u32 {
        self.max_texture_size
    }

    fn create_texfbo(&mut self, width: u32, height: u32) -> TexFbo {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1).max(1);

        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("rgss pooled target"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_SRC
                | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        self.live.insert(id, PooledTarget { texture, view });

        TexFbo {
            tex: TexId(id),
            fbo: FboId(id),
            width,
            height,
        }
    }

    fn destroy_texfbo(&mut self, texfbo: TexFbo) {
        if texfbo.is_null() {
            return;
        }
        if let Some(target) = self.live.remove(&texfbo.tex.0) {
            target.texture.destroy();
        }
    }
}
