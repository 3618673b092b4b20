//! Engine configuration.
//!
//! Plain structs with defaults; loading them from disk is the host's job.

use crate::pool::TexPoolConfig;
use crate::scene::TieBreak;

/// Which RGSS generation the engine emulates.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum RgssVersion {
    /// RPG Maker XP.
    Rgss1,
    /// RPG Maker VX.
    Rgss2,
    /// RPG Maker VX Ace.
    #[default]
    Rgss3,
}

impl RgssVersion {
    /// Maps 1, 2, 3; anything else is `None`.
    pub fn from_number(n: u32) -> Option<Self> {
        match n {
            1 => Some(RgssVersion::Rgss1),
            2 => Some(RgssVersion::Rgss2),
            3 => Some(RgssVersion::Rgss3),
            _ => None,
        }
    }

    /// RGSS1 orders equal-z elements by creation only.
    pub fn tie_break(self) -> TieBreak {
        match self {
            RgssVersion::Rgss1 => TieBreak::Legacy,
            RgssVersion::Rgss2 | RgssVersion::Rgss3 => TieBreak::Modern,
        }
    }

    pub fn default_frame_rate(self) -> u32 {
        match self {
            RgssVersion::Rgss1 => 40,
            RgssVersion::Rgss2 | RgssVersion::Rgss3 => 60,
        }
    }

    pub fn default_resolution(self) -> (u32, u32) {
        match self {
            RgssVersion::Rgss1 => (640, 480),
            RgssVersion::Rgss2 | RgssVersion::Rgss3 => (544, 416),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub rgss_version: RgssVersion,
    pub screen_width: u32,
    pub screen_height: u32,
    pub frame_rate: u32,
    /// Sleep to hold `frame_rate`; otherwise frames run as fast as they come.
    pub fixed_frame_rate: bool,
    pub texture_pool_budget: usize,
}

impl EngineConfig {
    /// Defaults for `version`: its native resolution and frame rate.
    pub fn for_version(rgss_version: RgssVersion) -> Self {
        let (screen_width, screen_height) = rgss_version.default_resolution();
        Self {
            rgss_version,
            screen_width,
            screen_height,
            frame_rate: rgss_version.default_frame_rate(),
            fixed_frame_rate: true,
            texture_pool_budget: TexPoolConfig::default().budget_bytes,
        }
    }

    #[inline]
    pub fn tie_break(&self) -> TieBreak {
        self.rgss_version.tie_break()
    }

    #[inline]
    pub fn pool_config(&self) -> TexPoolConfig {
        TexPoolConfig {
            budget_bytes: self.texture_pool_budget,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::for_version(RgssVersion::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_defaults() {
        let xp = EngineConfig::for_version(RgssVersion::Rgss1);
        assert_eq!((xp.screen_width, xp.screen_height, xp.frame_rate), (640, 480, 40));
        assert_eq!(xp.tie_break(), TieBreak::Legacy);

        let ace = EngineConfig::default();
        assert_eq!((ace.screen_width, ace.screen_height, ace.frame_rate), (544, 416, 60));
        assert_eq!(ace.tie_break(), TieBreak::Modern);
        assert_eq!(ace.pool_config().budget_bytes, 20_000_000);
    }

    #[test]
    fn version_numbers() {
        assert_eq!(RgssVersion::from_number(2), Some(RgssVersion::Rgss2));
        assert_eq!(RgssVersion::from_number(4), None);
    }
}
