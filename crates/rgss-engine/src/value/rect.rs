use super::revision::Revision;
use super::serial::{self, Reader, Serializable};
use crate::error::FormatError;

/// Integer rectangle (top-left origin), as exposed to scripts.
///
/// Encoding: 16 bytes, four `i32` (x, y, width, height).
#[derive(Debug, Copy, Clone, Default)]
pub struct Rect {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    revision: Revision,
}

impl PartialEq for Rect {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x
            && self.y == other.y
            && self.width == other.width
            && self.height == other.height
    }
}

impl Eq for Rect {}

impl Rect {
    pub const SERIAL_SIZE: usize = 16;

    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            revision: Revision::new(),
        }
    }

    #[inline]
    pub fn x(&self) -> i32 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> i32 {
        self.y
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn set(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.x = x;
        self.y = y;
        self.width = width;
        self.height = height;
        self.revision.bump();
    }

    pub fn set_x(&mut self, v: i32) {
        self.x = v;
        self.revision.bump();
    }

    pub fn set_y(&mut self, v: i32) {
        self.y = v;
        self.revision.bump();
    }

    pub fn set_width(&mut self, v: i32) {
        self.width = v;
        self.revision.bump();
    }

    pub fn set_height(&mut self, v: i32) {
        self.height = v;
        self.revision.bump();
    }

    /// Sets all fields to zero.
    pub fn empty(&mut self) {
        self.set(0, 0, 0, 0);
    }

    #[inline]
    pub fn revision(&self) -> Revision {
        self.revision
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Normalizes the rectangle so width/height are non-negative.
    #[inline]
    pub fn normalized(&self) -> Self {
        let (mut x, mut y, mut w, mut h) = (self.x, self.y, self.width, self.height);
        if w < 0 {
            x = x.saturating_add(w);
            w = w.saturating_neg();
        }
        if h < 0 {
            y = y.saturating_add(h);
            h = h.saturating_neg();
        }
        Rect::new(x, y, w, h)
    }

    /// Half-open containment: [min, max).
    #[inline]
    pub fn contains(&self, px: i32, py: i32) -> bool {
        let r = self.normalized();
        px >= r.x && py >= r.y && i64::from(px) < r.right() && i64::from(py) < r.bottom()
    }

    #[inline]
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let a = self.normalized();
        let b = other.normalized();

        let x0 = a.x.max(b.x);
        let y0 = a.y.max(b.y);
        let x1 = a.right().min(b.right());
        let y1 = a.bottom().min(b.bottom());

        if x1 <= i64::from(x0) || y1 <= i64::from(y0) {
            None
        } else {
            Some(Rect::new(
                x0,
                y0,
                saturate(x1 - i64::from(x0)),
                saturate(y1 - i64::from(y0)),
            ))
        }
    }

    #[inline]
    pub fn translated(&self, dx: i32, dy: i32) -> Rect {
        Rect::new(
            self.x.saturating_add(dx),
            self.y.saturating_add(dy),
            self.width,
            self.height,
        )
    }

    // Far edges, widened so coordinates near the i32 limits do not wrap.
    #[inline]
    fn right(&self) -> i64 {
        i64::from(self.x) + i64::from(self.width)
    }

    #[inline]
    fn bottom(&self) -> i64 {
        i64::from(self.y) + i64::from(self.height)
    }
}

#[inline]
fn saturate(v: i64) -> i32 {
    v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

impl Serializable for Rect {
    fn serial_size(&self) -> usize {
        Self::SERIAL_SIZE
    }

    fn serialize(&self, buf: &mut Vec<u8>) {
        for v in [self.x, self.y, self.width, self.height] {
            buf.extend_from_slice(&v.to_le_bytes());
        }
    }

    fn deserialize(data: &[u8]) -> Result<Self, FormatError> {
        serial::expect_len("Rect", data, Self::SERIAL_SIZE)?;
        let mut r = Reader::new(data);
        Ok(Rect::new(r.i32(), r.i32(), r.i32(), r.i32()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(x: i32, y: i32, w: i32, h: i32) -> Rect {
        Rect::new(x, y, w, h)
    }

    // ── normalized ────────────────────────────────────────────────────────

    #[test]
    fn normalized_negative_extent() {
        let n = r(10, 10, -4, -3).normalized();
        assert_eq!(n, r(6, 7, 4, 3));
    }

    // ── contains ──────────────────────────────────────────────────────────

    #[test]
    fn contains_is_half_open() {
        let rect = r(0, 0, 10, 10);
        assert!(rect.contains(0, 0));
        assert!(rect.contains(9, 9));
        assert!(!rect.contains(10, 10));
        assert!(!rect.contains(-1, 5));
    }

    // ── intersect ─────────────────────────────────────────────────────────

    #[test]
    fn intersect_overlapping() {
        assert_eq!(r(0, 0, 10, 10).intersect(&r(5, 5, 10, 10)), Some(r(5, 5, 5, 5)));
    }

    #[test]
    fn intersect_near_i32_limit() {
        let far = r(i32::MAX - 5, 0, 100, 10);
        assert!(far.intersect(&r(0, 0, 640, 480)).is_none());
        assert_eq!(far.intersect(&far), Some(r(i32::MAX - 5, 0, 100, 10)));
        assert!(far.contains(i32::MAX, 5));
        assert_eq!(far.translated(10, 0).x(), i32::MAX);
        assert_eq!(r(i32::MIN, 0, -1, 1).normalized(), r(i32::MIN, 0, 1, 1));
    }

    #[test]
    fn intersect_touching_edge_returns_none() {
        assert!(r(0, 0, 10, 10).intersect(&r(10, 0, 10, 10)).is_none());
    }

    // ── mutation ──────────────────────────────────────────────────────────

    #[test]
    fn setters_bump_revision() {
        let mut rect = r(1, 2, 3, 4);
        let before = rect.revision();
        rect.set_width(9);
        assert_ne!(rect.revision(), before);
        rect.empty();
        assert_eq!(rect, r(0, 0, 0, 0));
        assert!(rect.is_empty());
    }

    // ── encoding ──────────────────────────────────────────────────────────

    #[test]
    fn encoding_layout() {
        let bytes = r(1, -2, 3, 4).to_bytes();
        assert_eq!(bytes.len(), 16);
        assert_eq!(&bytes[4..8], &(-2i32).to_le_bytes());
    }

    #[test]
    fn reencodes_identically() {
        for rect in [r(0, 0, 0, 0), r(i32::MAX, i32::MIN, i32::MAX, i32::MIN)] {
            let bytes = rect.to_bytes();
            let back = Rect::deserialize(&bytes).unwrap();
            assert_eq!(back, rect);
            assert_eq!(back.to_bytes(), bytes);
        }
    }

    #[test]
    fn decode_rejects_wrong_length() {
        assert!(Rect::deserialize(&[0u8; 15]).is_err());
        assert!(Rect::deserialize(&[0u8; 17]).is_err());
    }
}
