use super::revision::Revision;
use super::serial::{self, Reader, Serializable};
use crate::error::FormatError;

/// RGBA color in the script-visible 0–255 domain.
///
/// Channels are clamped to `[0, 255]` by every setter. A normalized `[0, 1]`
/// copy is kept alongside for shader upload.
///
/// Encoding: 32 bytes, four `f64` (red, green, blue, alpha).
#[derive(Debug, Copy, Clone, Default)]
pub struct Color {
    red: f64,
    green: f64,
    blue: f64,
    alpha: f64,
    norm: [f32; 4],
    revision: Revision,
}

impl PartialEq for Color {
    fn eq(&self, other: &Self) -> bool {
        self.red == other.red
            && self.green == other.green
            && self.blue == other.blue
            && self.alpha == other.alpha
    }
}

#[inline]
fn clamp_channel(v: f64) -> f64 {
    v.clamp(0.0, 255.0)
}

impl Color {
    pub const SERIAL_SIZE: usize = 32;

    pub fn new(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        let mut c = Self::default();
        c.red = clamp_channel(red);
        c.green = clamp_channel(green);
        c.blue = clamp_channel(blue);
        c.alpha = clamp_channel(alpha);
        c.update_internal();
        c
    }

    /// Opaque color (alpha 255).
    #[inline]
    pub fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::new(red, green, blue, 255.0)
    }

    #[inline]
    pub fn red(&self) -> f64 {
        self.red
    }

    #[inline]
    pub fn green(&self) -> f64 {
        self.green
    }

    #[inline]
    pub fn blue(&self) -> f64 {
        self.blue
    }

    #[inline]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn set(&mut self, red: f64, green: f64, blue: f64, alpha: f64) {
        self.red = clamp_channel(red);
        self.green = clamp_channel(green);
        self.blue = clamp_channel(blue);
        self.alpha = clamp_channel(alpha);
        self.changed();
    }

    pub fn set_red(&mut self, v: f64) {
        self.red = clamp_channel(v);
        self.changed();
    }

    pub fn set_green(&mut self, v: f64) {
        self.green = clamp_channel(v);
        self.changed();
    }

    pub fn set_blue(&mut self, v: f64) {
        self.blue = clamp_channel(v);
        self.changed();
    }

    pub fn set_alpha(&mut self, v: f64) {
        self.alpha = clamp_channel(v);
        self.changed();
    }

    /// Channels scaled to `[0, 1]`.
    #[inline]
    pub fn normalized(&self) -> [f32; 4] {
        self.norm
    }

    /// A color only blends into its target when alpha is non-zero.
    #[inline]
    pub fn is_effective(&self) -> bool {
        self.alpha > 0.0
    }

    #[inline]
    pub fn revision(&self) -> Revision {
        self.revision
    }

    fn changed(&mut self) {
        self.update_internal();
        self.revision.bump();
    }

    fn update_internal(&mut self) {
        self.norm = [
            (self.red / 255.0) as f32,
            (self.green / 255.0) as f32,
            (self.blue / 255.0) as f32,
            (self.alpha / 255.0) as f32,
        ];
    }
}

impl Serializable for Color {
    fn serial_size(&self) -> usize {
        Self::SERIAL_SIZE
    }

    fn serialize(&self, buf: &mut Vec<u8>) {
        for v in [self.red, self.green, self.blue, self.alpha] {
            buf.extend_from_slice(&v.to_le_bytes());
        }
    }

    /// Stored channels are taken as-is (no clamping) so re-encoding is lossless.
    fn deserialize(data: &[u8]) -> Result<Self, FormatError> {
        serial::expect_len("Color", data, Self::SERIAL_SIZE)?;
        let mut r = Reader::new(data);
        let mut c = Self::default();
        c.red = r.f64();
        c.green = r.f64();
        c.blue = r.f64();
        c.alpha = r.f64();
        c.update_internal();
        Ok(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_transparent_black() {
        let c = Color::default();
        assert_eq!(c, Color::new(0.0, 0.0, 0.0, 0.0));
        assert!(!c.is_effective());
    }

    #[test]
    fn setters_clamp_to_byte_range() {
        let mut c = Color::new(300.0, -5.0, 128.0, 255.5);
        assert_eq!((c.red(), c.green(), c.blue(), c.alpha()), (255.0, 0.0, 128.0, 255.0));
        c.set_green(1000.0);
        assert_eq!(c.green(), 255.0);
    }

    #[test]
    fn normalized_tracks_mutation() {
        let mut c = Color::new(255.0, 0.0, 51.0, 255.0);
        assert_eq!(c.normalized(), [1.0, 0.0, 0.2, 1.0]);
        c.set_red(0.0);
        assert_eq!(c.normalized()[0], 0.0);
    }

    #[test]
    fn mutation_bumps_revision() {
        let mut c = Color::default();
        let before = c.revision();
        c.set(1.0, 2.0, 3.0, 4.0);
        assert_ne!(c.revision(), before);
    }

    #[test]
    fn encoding_layout() {
        let bytes = Color::new(1.0, 2.0, 3.0, 4.0).to_bytes();
        assert_eq!(bytes.len(), 32);
        assert_eq!(&bytes[0..8], &1.0f64.to_le_bytes());
        assert_eq!(&bytes[24..32], &4.0f64.to_le_bytes());
    }

    #[test]
    fn reencodes_identically() {
        for c in [Color::default(), Color::new(255.0, 255.0, 255.0, 255.0)] {
            let bytes = c.to_bytes();
            let back = Color::deserialize(&bytes).unwrap();
            assert_eq!(back.to_bytes(), bytes);
            assert_eq!(back, c);
        }
    }

    #[test]
    fn decode_rejects_wrong_length() {
        let bytes = Color::default().to_bytes();
        assert!(matches!(
            Color::deserialize(&bytes[..31]),
            Err(FormatError::Length { expected: 32, actual: 31, .. })
        ));
        let mut long = bytes.clone();
        long.push(0);
        assert!(Color::deserialize(&long).is_err());
    }
}
