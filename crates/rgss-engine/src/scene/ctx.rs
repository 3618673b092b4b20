/// How elements with equal `z` are ordered.
///
/// RGSS1 ignores the sprite y coordinate entirely; RGSS2 and later draw lower
/// sprites on top of higher ones within the same layer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum TieBreak {
    /// Equal z: creation order.
    Legacy,
    /// Equal z: `sprite_y`, then creation order.
    #[default]
    Modern,
}

/// Monotonic source of creation stamps.
#[derive(Debug, Clone, Default)]
pub struct CreationClock {
    next: u64,
}

impl CreationClock {
    #[inline]
    pub const fn new() -> Self {
        Self { next: 0 }
    }

    /// A clock whose first stamp is `first`. Lets tests pin stamps.
    #[inline]
    pub const fn starting_at(first: u64) -> Self {
        Self { next: first }
    }

    #[inline]
    pub fn gen_stamp(&mut self) -> u64 {
        let stamp = self.next;
        self.next += 1;
        stamp
    }
}

/// Ordering context shared by every scene of a graph.
#[derive(Debug, Clone, Default)]
pub struct GraphCtx {
    pub tie_break: TieBreak,
    pub clock: CreationClock,
}

impl GraphCtx {
    pub fn new(tie_break: TieBreak) -> Self {
        Self {
            tie_break,
            clock: CreationClock::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stamps_are_monotonic() {
        let mut clock = CreationClock::starting_at(7);
        assert_eq!(clock.gen_stamp(), 7);
        assert_eq!(clock.gen_stamp(), 8);
        assert!(clock.gen_stamp() > 8);
    }
}
