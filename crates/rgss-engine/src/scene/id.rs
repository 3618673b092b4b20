use core::fmt;

/// Handle to an element in a [`SceneGraph`](super::SceneGraph).
///
/// Carries a generation so handles to a disposed element stay dead after the
/// slot is reused.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId {
    pub(crate) idx: u32,
    pub(crate) generation: u32,
}

impl ElementId {
    /// Returns the raw slot index (for diagnostics only).
    #[inline]
    pub const fn index(self) -> u32 {
        self.idx
    }

    #[inline]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ElementId({}@gen{})", self.idx, self.generation)
    }
}

/// Handle to a scene in a [`SceneGraph`](super::SceneGraph).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SceneId {
    pub(crate) idx: u32,
    pub(crate) generation: u32,
}

impl SceneId {
    #[inline]
    pub const fn index(self) -> u32 {
        self.idx
    }

    #[inline]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SceneId({}@gen{})", self.idx, self.generation)
    }
}
