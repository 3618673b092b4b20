use core::cmp::Ordering;

use super::TieBreak;

/// Ordering key of a scene element.
///
/// Ordering rules:
/// 1) `z`: ascending (back-to-front)
/// 2) `sprite_y`: ascending, only under [`TieBreak::Modern`]
/// 3) `stamp`: ascending (creation order)
///
/// Stamps are unique, so the order is strict for any mode.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct OrderKey {
    pub z: i32,
    pub sprite_y: i32,
    pub stamp: u64,
}

impl OrderKey {
    #[inline]
    pub const fn new(z: i32, sprite_y: i32, stamp: u64) -> Self {
        Self { z, sprite_y, stamp }
    }

    #[inline]
    pub fn cmp_with(&self, other: &Self, tie: TieBreak) -> Ordering {
        match self.z.cmp(&other.z) {
            Ordering::Equal => {}
            o => return o,
        }
        if tie == TieBreak::Modern {
            match self.sprite_y.cmp(&other.sprite_y) {
                Ordering::Equal => {}
                o => return o,
            }
        }
        self.stamp.cmp(&other.stamp)
    }

    /// `self` is drawn strictly after `other`.
    #[inline]
    pub fn is_after(&self, other: &Self, tie: TieBreak) -> bool {
        self.cmp_with(other, tie) == Ordering::Greater
    }
}
