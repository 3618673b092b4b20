use crate::error::FormatError;

/// Fixed-layout binary encoding shared with the host's marshal format.
///
/// All multi-byte fields are little-endian.
pub trait Serializable: Sized {
    /// Encoded length in bytes.
    fn serial_size(&self) -> usize;

    /// Appends the encoding of `self` to `buf`.
    fn serialize(&self, buf: &mut Vec<u8>);

    /// Decodes a value. The input length must match the encoding exactly.
    fn deserialize(data: &[u8]) -> Result<Self, FormatError>;

    fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.serial_size());
        self.serialize(&mut buf);
        buf
    }
}

pub(super) fn expect_len(kind: &'static str, data: &[u8], expected: usize) -> Result<(), FormatError> {
    if data.len() == expected {
        Ok(())
    } else {
        Err(FormatError::Length {
            kind,
            expected,
            actual: data.len(),
        })
    }
}

/// Little-endian cursor over already length-checked input.
pub(super) struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub(super) fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn take<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        out.copy_from_slice(&self.data[self.pos..self.pos + N]);
        self.pos += N;
        out
    }

    pub(super) fn f64(&mut self) -> f64 {
        f64::from_le_bytes(self.take())
    }

    pub(super) fn i32(&mut self) -> i32 {
        i32::from_le_bytes(self.take())
    }

    pub(super) fn i16(&mut self) -> i16 {
        i16::from_le_bytes(self.take())
    }
}
