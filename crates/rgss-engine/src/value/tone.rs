use super::revision::Revision;
use super::serial::{self, Reader, Serializable};
use crate::error::FormatError;

/// Color tone adjustment.
///
/// `red`/`green`/`blue` shift channels within `[-255, 255]`; `gray` desaturates
/// within `[0, 255]`.
///
/// Encoding: 32 bytes, four `f64` (red, green, blue, gray).
#[derive(Debug, Copy, Clone, Default)]
pub struct Tone {
    red: f64,
    green: f64,
    blue: f64,
    gray: f64,
    norm: [f32; 4],
    revision: Revision,
}

impl PartialEq for Tone {
    fn eq(&self, other: &Self) -> bool {
        self.red == other.red
            && self.green == other.green
            && self.blue == other.blue
            && self.gray == other.gray
    }
}

#[inline]
fn clamp_shift(v: f64) -> f64 {
    v.clamp(-255.0, 255.0)
}

#[inline]
fn clamp_gray(v: f64) -> f64 {
    v.clamp(0.0, 255.0)
}

impl Tone {
    pub const SERIAL_SIZE: usize = 32;

    pub fn new(red: f64, green: f64, blue: f64, gray: f64) -> Self {
        let mut t = Self::default();
        t.red = clamp_shift(red);
        t.green = clamp_shift(green);
        t.blue = clamp_shift(blue);
        t.gray = clamp_gray(gray);
        t.update_internal();
        t
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
    pub fn gray(&self) -> f64 {
        self.gray
    }

    pub fn set(&mut self, red: f64, green: f64, blue: f64, gray: f64) {
        self.red = clamp_shift(red);
        self.green = clamp_shift(green);
        self.blue = clamp_shift(blue);
        self.gray = clamp_gray(gray);
        self.changed();
    }

    pub fn set_red(&mut self, v: f64) {
        self.red = clamp_shift(v);
        self.changed();
    }

    pub fn set_green(&mut self, v: f64) {
        self.green = clamp_shift(v);
        self.changed();
    }

    pub fn set_blue(&mut self, v: f64) {
        self.blue = clamp_shift(v);
        self.changed();
    }

    pub fn set_gray(&mut self, v: f64) {
        self.gray = clamp_gray(v);
        self.changed();
    }

    /// A neutral tone leaves pixels untouched.
    #[inline]
    pub fn is_neutral(&self) -> bool {
        self.red == 0.0 && self.green == 0.0 && self.blue == 0.0 && self.gray == 0.0
    }

    /// Components scaled by 1/255 (shifts in `[-1, 1]`, gray in `[0, 1]`).
    #[inline]
    pub fn normalized(&self) -> [f32; 4] {
        self.norm
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
            (self.gray / 255.0) as f32,
        ];
    }
}

impl Serializable for Tone {
    fn serial_size(&self) -> usize {
        Self::SERIAL_SIZE
    }

    fn serialize(&self, buf: &mut Vec<u8>) {
        for v in [self.red, self.green, self.blue, self.gray] {
            buf.extend_from_slice(&v.to_le_bytes());
        }
    }

    fn deserialize(data: &[u8]) -> Result<Self, FormatError> {
        serial::expect_len("Tone", data, Self::SERIAL_SIZE)?;
        let mut r = Reader::new(data);
        let mut t = Self::default();
        t.red = r.f64();
        t.green = r.f64();
        t.blue = r.f64();
        t.gray = r.f64();
        t.update_internal();
        Ok(t)
    }
}
