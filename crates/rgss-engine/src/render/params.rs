use bytemuck::{Pod, Zeroable};

/// Per-draw color effects, laid out for a uniform buffer.
///
/// All components are normalized:
/// - `color`: blend color, alpha = blend strength
/// - `tone`: rgb shift in `[-1, 1]`, w = gray amount in `[0, 1]`
/// - `flash`: flash color, alpha already faded by the remaining duration
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct EffectParams {
    pub color: [f32; 4],
    pub tone: [f32; 4],
    pub flash: [f32; 4],
    pub opacity: f32,
    pub _pad: [f32; 3], // 16-byte alignment
}

impl EffectParams {
    #[inline]
    pub fn new(color: [f32; 4], tone: [f32; 4], flash: [f32; 4], opacity: f32) -> Self {
        Self {
            color,
            tone,
            flash,
            opacity,
            _pad: [0.0; 3],
        }
    }

    /// Whether applying these params changes any pixel (opacity aside).
    #[inline]
    pub fn is_active(&self) -> bool {
        self.color[3] > 0.0 || self.tone != [0.0; 4] || self.flash[3] > 0.0
    }

    /// Raw bytes for `queue.write_buffer`.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}
