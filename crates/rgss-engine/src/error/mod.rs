//! Engine error taxonomy.
//!
//! Two failure classes cross the core's boundary and must stay distinguishable
//! for the embedding host:
//! - [`FormatError`]: serialized value data does not match its fixed encoding
//! - [`ResourceLimitError`]: a GPU request exceeds the hardware's capability
//!
//! Misuse (double removal, setters on detached or disposed elements) is not an
//! error; those operations are no-ops.

use thiserror::Error;

/// Serialized payload does not match the fixed encoding contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("{kind} data is {actual} bytes, expected {expected}")]
    Length {
        kind: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("table header needs 20 bytes, got {actual}")]
    TruncatedHeader { actual: usize },

    #[error("table extents {x}x{y}x{z} are negative")]
    NegativeExtent { x: i32, y: i32, z: i32 },

    #[error("table extents {x}x{y}x{z} overflow the element count")]
    ExtentOverflow { x: i32, y: i32, z: i32 },

    #[error("table header declares {declared} elements, extents give {computed}")]
    ElementCount { declared: i64, computed: i64 },
}

/// A GPU resource request exceeds hardware capability.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceLimitError {
    #[error("texture size {width}x{height} exceeds the hardware limit of {max}")]
    TextureTooLarge { width: u32, height: u32, max: u32 },
}

/// Coarse error class, for host-side diagnostics.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    /// Corrupt or mismatched save data.
    Format,
    /// Texture too large for this GPU.
    ResourceLimit,
}

/// Umbrella error for operations that can fail either way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    ResourceLimit(#[from] ResourceLimitError),
}

impl EngineError {
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::Format(_) => ErrorKind::Format,
            EngineError::ResourceLimit(_) => ErrorKind::ResourceLimit,
        }
    }
}
