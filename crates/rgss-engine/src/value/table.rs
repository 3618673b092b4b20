use super::revision::Revision;
use super::serial::{Reader, Serializable};
use crate::error::FormatError;

const HEADER_SIZE: usize = 20;

/// Dense 3-D array of `i16` (map data, tile priorities, flash data).
///
/// Cells are stored x-fastest, then y, then z.
///
/// Two access layers:
/// - [`at`](Self::at) / [`set_at`](Self::set_at): raw, for internal callers
///   that already know the indices are in range
/// - [`get`](Self::get) / [`set`](Self::set): script-facing; out-of-range
///   reads return `None`, out-of-range writes are ignored
///
/// Encoding: 20-byte header (`i32` dimensionality, xsize, ysize, zsize,
/// element count) followed by `element count` little-endian `i16` cells.
#[derive(Debug, Clone, Default)]
pub struct Table {
    xsize: usize,
    ysize: usize,
    zsize: usize,
    data: Vec<i16>,
    revision: Revision,
}

impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        self.xsize == other.xsize
            && self.ysize == other.ysize
            && self.zsize == other.zsize
            && self.data == other.data
    }
}

impl Table {
    pub fn new(xsize: usize, ysize: usize, zsize: usize) -> Self {
        Self {
            xsize,
            ysize,
            zsize,
            data: vec![0; xsize * ysize * zsize],
            revision: Revision::new(),
        }
    }

    #[inline]
    pub fn xsize(&self) -> usize {
        self.xsize
    }

    #[inline]
    pub fn ysize(&self) -> usize {
        self.ysize
    }

    #[inline]
    pub fn zsize(&self) -> usize {
        self.zsize
    }

    /// Number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn revision(&self) -> Revision {
        self.revision
    }

    /// Dimensionality written to the header: the highest axis whose extent exceeds 1.
    pub fn dimensionality(&self) -> i32 {
        if self.zsize > 1 {
            3
        } else if self.ysize > 1 {
            2
        } else {
            1
        }
    }

    #[inline]
    fn index(&self, x: usize, y: usize, z: usize) -> usize {
        x + self.xsize * (y + self.ysize * z)
    }

    #[inline]
    fn in_range(&self, x: i32, y: i32, z: i32) -> Option<(usize, usize, usize)> {
        let (x, y, z) = (
            usize::try_from(x).ok()?,
            usize::try_from(y).ok()?,
            usize::try_from(z).ok()?,
        );
        (x < self.xsize && y < self.ysize && z < self.zsize).then_some((x, y, z))
    }

    // ── raw access ────────────────────────────────────────────────────────

    /// Reads a cell without range checking the individual axes.
    ///
    /// Callers must keep `x < xsize`, `y < ysize`, `z < zsize`.
    #[inline]
    pub fn at(&self, x: usize, y: usize, z: usize) -> i16 {
        debug_assert!(x < self.xsize && y < self.ysize && z < self.zsize);
        self.data[self.index(x, y, z)]
    }

    /// Writes a cell without range checking the individual axes.
    #[inline]
    pub fn set_at(&mut self, x: usize, y: usize, z: usize, value: i16) {
        debug_assert!(x < self.xsize && y < self.ysize && z < self.zsize);
        let i = self.index(x, y, z);
        self.data[i] = value;
        self.revision.bump();
    }

    // ── script access ─────────────────────────────────────────────────────

    pub fn get(&self, x: i32, y: i32, z: i32) -> Option<i16> {
        let (x, y, z) = self.in_range(x, y, z)?;
        Some(self.at(x, y, z))
    }

    pub fn set(&mut self, x: i32, y: i32, z: i32, value: i16) {
        if let Some((x, y, z)) = self.in_range(x, y, z) {
            self.set_at(x, y, z, value);
        }
    }

    /// Changes the extents, keeping every cell inside both the old and the new
    /// volume. Newly exposed cells are zero.
    pub fn resize(&mut self, xsize: usize, ysize: usize, zsize: usize) {
        if (xsize, ysize, zsize) == (self.xsize, self.ysize, self.zsize) {
            return;
        }

        let mut data = vec![0; xsize * ysize * zsize];
        let (cx, cy, cz) = (
            self.xsize.min(xsize),
            self.ysize.min(ysize),
            self.zsize.min(zsize),
        );
        for z in 0..cz {
            for y in 0..cy {
                let src = self.index(0, y, z);
                let dst = xsize * (y + ysize * z);
                data[dst..dst + cx].copy_from_slice(&self.data[src..src + cx]);
            }
        }

        self.xsize = xsize;
        self.ysize = ysize;
        self.zsize = zsize;
        self.data = data;
        self.revision.bump();
    }
}

impl Serializable for Table {
    fn serial_size(&self) -> usize {
        HEADER_SIZE + self.data.len() * 2
    }

    fn serialize(&self, buf: &mut Vec<u8>) {
        buf.reserve(self.serial_size());
        for v in [
            self.dimensionality(),
            self.xsize as i32,
            self.ysize as i32,
            self.zsize as i32,
            self.data.len() as i32,
        ] {
            buf.extend_from_slice(&v.to_le_bytes());
        }
        for cell in &self.data {
            buf.extend_from_slice(&cell.to_le_bytes());
        }
    }

    /// The dimensionality field is informational and is not checked.
    fn deserialize(data: &[u8]) -> Result<Self, FormatError> {
        if data.len() < HEADER_SIZE {
            return Err(FormatError::TruncatedHeader { actual: data.len() });
        }

        let mut r = Reader::new(data);
        let _dimensionality = r.i32();
        let (x, y, z) = (r.i32(), r.i32(), r.i32());
        let declared = r.i32();

        if x < 0 || y < 0 || z < 0 {
            return Err(FormatError::NegativeExtent { x, y, z });
        }
        let Some(computed) = i64::from(x)
            .checked_mul(i64::from(y))
            .and_then(|xy| xy.checked_mul(i64::from(z)))
        else {
            log::debug!("table decode: extents {x}*{y}*{z} overflow");
            return Err(FormatError::ExtentOverflow { x, y, z });
        };
        if computed != i64::from(declared) {
            log::debug!("table decode: header count {declared} != {x}*{y}*{z}");
            return Err(FormatError::ElementCount {
                declared: i64::from(declared),
                computed,
            });
        }

        let count = computed as usize;
        let expected = HEADER_SIZE.saturating_add(count.saturating_mul(2));
        if data.len() != expected {
            log::debug!("table decode: {} bytes for {count} cells", data.len());
            return Err(FormatError::Length {
                kind: "Table",
                expected,
                actual: data.len(),
            });
        }

        let cells = (0..count).map(|_| r.i16()).collect();
        Ok(Self {
            xsize: x as usize,
            ysize: y as usize,
            zsize: z as usize,
            data: cells,
            revision: Revision::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(dim: i32, x: i32, y: i32, z: i32, n: i32) -> Vec<u8> {
        [dim, x, y, z, n].iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    // ── access ────────────────────────────────────────────────────────────

    #[test]
    fn new_table_is_zeroed() {
        let t = Table::new(3, 2, 2);
        assert_eq!(t.len(), 12);
        assert_eq!(t.get(2, 1, 1), Some(0));
    }

    #[test]
    fn checked_access_out_of_range() {
        let mut t = Table::new(2, 2, 1);
        t.set(0, 1, 0, 7);
        assert_eq!(t.get(0, 1, 0), Some(7));
        assert_eq!(t.get(2, 0, 0), None);
        assert_eq!(t.get(-1, 0, 0), None);
        let rev = t.revision();
        t.set(5, 5, 5, 1);
        assert_eq!(t.revision(), rev);
    }

    #[test]
    fn layout_is_x_fastest() {
        let mut t = Table::new(2, 2, 2);
        t.set(1, 0, 0, 1);
        t.set(0, 1, 0, 2);
        t.set(0, 0, 1, 3);
        let bytes = t.to_bytes();
        let cell = |i: usize| i16::from_le_bytes([bytes[20 + i * 2], bytes[21 + i * 2]]);
        assert_eq!(cell(1), 1);
        assert_eq!(cell(2), 2);
        assert_eq!(cell(4), 3);
    }

    // ── resize ────────────────────────────────────────────────────────────

    #[test]
    fn resize_preserves_common_volume() {
        let mut t = Table::new(3, 3, 2);
        for z in 0..2 {
            for y in 0..3 {
                for x in 0..3 {
                    t.set(x, y, z, (x + 10 * y + 100 * z) as i16);
                }
            }
        }
        t.resize(2, 4, 3);
        assert_eq!((t.xsize(), t.ysize(), t.zsize()), (2, 4, 3));
        for z in 0..3 {
            for y in 0..4 {
                for x in 0..2 {
                    let expected = if y < 3 && z < 2 { (x + 10 * y + 100 * z) as i16 } else { 0 };
                    assert_eq!(t.get(x, y, z), Some(expected), "cell ({x},{y},{z})");
                }
            }
        }
    }

    #[test]
    fn resize_bumps_revision() {
        let mut t = Table::new(1, 1, 1);
        let rev = t.revision();
        t.resize(4, 1, 1);
        assert_ne!(t.revision(), rev);
    }

    // ── encoding ──────────────────────────────────────────────────────────

    #[test]
    fn header_dimensionality() {
        assert_eq!(Table::new(4, 1, 1).dimensionality(), 1);
        assert_eq!(Table::new(4, 3, 1).dimensionality(), 2);
        assert_eq!(Table::new(1, 1, 2).dimensionality(), 3);
    }

    #[test]
    fn reencodes_identically() {
        let mut max = Table::new(2, 2, 1);
        max.set(0, 0, 0, i16::MAX);
        max.set(1, 1, 0, i16::MIN);
        for t in [Table::new(0, 0, 0), Table::new(3, 1, 1), max] {
            let bytes = t.to_bytes();
            assert_eq!(bytes.len(), t.serial_size());
            let back = Table::deserialize(&bytes).unwrap();
            assert_eq!(back, t);
            assert_eq!(back.to_bytes(), bytes);
        }
    }

    #[test]
    fn decode_rejects_truncated_payload() {
        let mut bytes = header(2, 2, 2, 1, 4);
        bytes.extend_from_slice(&[0u8; 6]);
        assert!(matches!(
            Table::deserialize(&bytes),
            Err(FormatError::Length { expected: 28, actual: 26, .. })
        ));
    }

    #[test]
    fn decode_rejects_count_mismatch() {
        let mut bytes = header(2, 2, 2, 1, 3);
        bytes.extend_from_slice(&[0u8; 6]);
        assert!(matches!(
            Table::deserialize(&bytes),
            Err(FormatError::ElementCount { declared: 3, computed: 4 })
        ));
    }

    #[test]
    fn decode_rejects_short_header() {
        assert!(matches!(
            Table::deserialize(&[0u8; 19]),
            Err(FormatError::TruncatedHeader { actual: 19 })
        ));
    }

    #[test]
    fn decode_rejects_negative_extent() {
        let bytes = header(1, -1, 1, 1, -1);
        assert!(matches!(
            Table::deserialize(&bytes),
            Err(FormatError::NegativeExtent { .. })
        ));
    }

    #[test]
    fn decode_rejects_overflowing_extents() {
        let bytes = header(3, i32::MAX, i32::MAX, i32::MAX, 1);
        assert_eq!(
            Table::deserialize(&bytes),
            Err(FormatError::ExtentOverflow {
                x: i32::MAX,
                y: i32::MAX,
                z: i32::MAX
            })
        );
    }

    #[test]
    fn decode_rejects_count_beyond_header_range() {
        // 65536 * 65536 fits an i64 but no i32 count can declare it.
        let bytes = header(2, 65536, 65536, 1, 0);
        assert!(matches!(
            Table::deserialize(&bytes),
            Err(FormatError::ElementCount {
                declared: 0,
                computed: 4_294_967_296
            })
        ));
    }

    #[test]
    fn decode_ignores_dimensionality_field() {
        let mut bytes = header(3, 1, 1, 1, 1);
        bytes.extend_from_slice(&9i16.to_le_bytes());
        let t = Table::deserialize(&bytes).unwrap();
        assert_eq!(t.get(0, 0, 0), Some(9));
    }
}
