use crate::value::Color;

/// Timed flash effect shared by sprites and viewports.
///
/// A flash with a color fades that color out over its duration. A flash
/// without a color hides the element until it runs out.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Flash {
    color: Option<Color>,
    duration: u32,
    remaining: u32,
}

impl Flash {
    /// Starts a flash lasting `duration` frames. A zero duration cancels.
    pub fn start(&mut self, color: Option<Color>, duration: u32) {
        self.color = color;
        self.duration = duration;
        self.remaining = duration;
    }

    /// Advances one frame.
    pub fn update(&mut self) {
        if self.remaining == 0 {
            return;
        }
        self.remaining -= 1;
        if self.remaining == 0 {
            self.color = None;
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.remaining > 0
    }

    #[inline]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Element is hidden for the remainder of the flash.
    #[inline]
    pub fn hides(&self) -> bool {
        self.is_active() && self.color.is_none()
    }

    /// Normalized flash color with alpha faded by the remaining time.
    pub fn params(&self) -> [f32; 4] {
        match self.color {
            Some(c) if self.is_active() => {
                let mut n = c.normalized();
                n[3] *= self.remaining as f32 / self.duration as f32;
                n
            }
            _ => [0.0; 4],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colored_flash_fades_out() {
        let mut f = Flash::default();
        f.start(Some(Color::new(255.0, 0.0, 0.0, 255.0)), 4);
        assert_eq!(f.params()[3], 1.0);
        f.update();
        assert_eq!(f.params()[3], 0.75);
        for _ in 0..3 {
            f.update();
        }
        assert!(!f.is_active());
        assert_eq!(f.params(), [0.0; 4]);
    }

    #[test]
    fn colorless_flash_hides() {
        let mut f = Flash::default();
        f.start(None, 2);
        assert!(f.hides());
        f.update();
        f.update();
        assert!(!f.hides());
    }

    #[test]
    fn zero_duration_is_inert() {
        let mut f = Flash::default();
        f.start(None, 0);
        assert!(!f.hides());
        f.update();
        assert!(!f.is_active());
    }
}
