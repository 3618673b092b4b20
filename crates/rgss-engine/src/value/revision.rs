/// Mutation counter carried by value types.
///
/// Advances by one on every change notification.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Revision(u64);

impl Revision {
    #[inline]
    pub const fn new() -> Self {
        Self(0)
    }

    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Fires the "value changed" notification.
    #[inline]
    pub fn bump(&mut self) {
        self.0 = self.0.wrapping_add(1);
    }
}

/// Consumer-side view of a [`Revision`].
///
/// Holders of cached GPU state keep one watch per observed value.
#[derive(Debug, Copy, Clone, Default)]
pub struct RevisionWatch {
    seen: Option<Revision>,
}

impl RevisionWatch {
    /// Returns `true` (once) when `current` differs from the last observed revision.
    #[inline]
    pub fn changed(&mut self, current: Revision) -> bool {
        if self.seen == Some(current) {
            false
        } else {
            self.seen = Some(current);
            true
        }
    }

    /// Forgets the last observation; the next `changed` call reports a change.
    ///
    /// Needed when the observed value is replaced by an unrelated one.
    #[inline]
    pub fn reset(&mut self) {
        self.seen = None;
    }
}
