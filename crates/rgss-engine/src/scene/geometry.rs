use crate::value::Rect;

/// Where a scene sits on screen.
///
/// `rect` is in screen pixels. `origin_x`/`origin_y` scroll the scene's
/// content: a member at scene position (x, y) lands on screen at
/// `(rect.x + x - origin_x, rect.y + y - origin_y)`.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Geometry {
    pub rect: Rect,
    pub origin_x: i32,
    pub origin_y: i32,
}

impl Geometry {
    #[inline]
    pub const fn new(rect: Rect, origin_x: i32, origin_y: i32) -> Self {
        Self {
            rect,
            origin_x,
            origin_y,
        }
    }

    /// The part of the scene that is visible, in scene coordinates.
    #[inline]
    pub fn visible_rect(&self) -> Rect {
        Rect::new(
            self.origin_x,
            self.origin_y,
            self.rect.width(),
            self.rect.height(),
        )
    }

    /// Offset that maps scene coordinates to screen pixels.
    #[inline]
    pub fn screen_offset(&self) -> (i32, i32) {
        (
            self.rect.x().saturating_sub(self.origin_x),
            self.rect.y().saturating_sub(self.origin_y),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scrolled_viewport_maps_to_screen() {
        let g = Geometry::new(Rect::new(10, 20, 100, 50), 5, 7);
        assert_eq!(g.visible_rect(), Rect::new(5, 7, 100, 50));
        assert_eq!(g.screen_offset(), (5, 13));
    }
}
