use core::fmt;

/// Opaque texture object id. Zero is the null texture.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct TexId(pub u32);

/// Opaque framebuffer (render target) id. Zero is the null framebuffer.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct FboId(pub u32);

/// A texture bound to a framebuffer, plus its pixel size.
///
/// Two handles are equal when they name the same GPU objects; the size is
/// carried along for bookkeeping only.
#[derive(Copy, Clone, Default)]
pub struct TexFbo {
    pub tex: TexId,
    pub fbo: FboId,
    pub width: u32,
    pub height: u32,
}

impl TexFbo {
    /// The null handle. Releasing it is harmless.
    pub const NULL: TexFbo = TexFbo {
        tex: TexId(0),
        fbo: FboId(0),
        width: 0,
        height: 0,
    };

    #[inline]
    pub fn is_null(&self) -> bool {
        self.tex.0 == 0 && self.fbo.0 == 0
    }

    /// Bytes held on the GPU, assuming 4 bytes per pixel.
    #[inline]
    pub fn byte_cost(&self) -> usize {
        (self.width as usize)
            .saturating_mul(self.height as usize)
            .saturating_mul(4)
    }
}

impl PartialEq for TexFbo {
    fn eq(&self, other: &Self) -> bool {
        self.tex == other.tex && self.fbo == other.fbo
    }
}

impl Eq for TexFbo {}

impl fmt::Debug for TexFbo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TexFbo(tex {}, fbo {}, {}x{})",
            self.tex.0, self.fbo.0, self.width, self.height
        )
    }
}

/// Graphics API calls the pool delegates to.
///
/// Creation and destruction are infallible from the pool's point of view; a
/// backend that cannot allocate aborts.
pub trait TextureBackend {
    /// Largest width/height a texture may have on this device.
    fn max_texture_size(&self) -> u32;

    /// Allocates a texture, allocates a framebuffer and binds them together.
    fn create_texfbo(&mut self, width: u32, height: u32) -> TexFbo;

    /// Frees both objects. Null ids are ignored.
    fn destroy_texfbo(&mut self, texfbo: TexFbo);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_ignores_size() {
        let a = TexFbo { tex: TexId(1), fbo: FboId(2), width: 8, height: 8 };
        let b = TexFbo { width: 16, ..a };
        assert_eq!(a, b);
        assert_ne!(a, TexFbo { tex: TexId(3), ..a });
    }

    #[test]
    fn null_handle() {
        assert!(TexFbo::NULL.is_null());
        assert_eq!(TexFbo::NULL.byte_cost(), 0);
        assert_eq!(TexFbo { width: 10, height: 5, ..TexFbo::NULL }.byte_cost(), 200);
    }
}
