use crate::render::{DrawCmd, DrawList, EffectParams};
use crate::scene::{ElementId, Geometry};
use crate::value::{Color, Rect, Tone};

use super::{BitmapId, BitmapRef, BlendType, Flash, clamp_u8};

/// Recorded sprite draw.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteCmd {
    pub element: ElementId,
    pub bitmap: BitmapId,
    /// Source rect in bitmap pixels, clipped to the bitmap.
    pub src: Rect,
    /// Destination rect in screen pixels (before rotation).
    pub dest: Rect,
    /// Rotation pivot in screen pixels.
    pub pivot: (i32, i32),
    pub angle: f64,
    pub mirror: bool,
    pub blend: BlendType,
    pub bush_depth: i32,
    pub bush_opacity: u8,
    pub effect: EffectParams,
}

/// Bitmap drawn at a position, with zoom, rotation and color effects.
///
/// `y` is private: in modern ordering it doubles as the sort key, so moves go
/// through [`SceneGraph::move_sprite`](crate::scene::SceneGraph::move_sprite).
#[derive(Debug, Clone)]
pub struct Sprite {
    bitmap: Option<BitmapRef>,
    x: i32,
    y: i32,
    pub ox: i32,
    pub oy: i32,
    pub zoom_x: f64,
    pub zoom_y: f64,
    pub angle: f64,
    pub mirror: bool,
    opacity: u8,
    pub blend: BlendType,
    pub bush_depth: i32,
    bush_opacity: u8,
    pub src_rect: Rect,
    pub color: Color,
    pub tone: Tone,
    pub flash: Flash,

    // Cached from the owning scene.
    geometry: Geometry,
}

impl Default for Sprite {
    fn default() -> Self {
        Self {
            bitmap: None,
            x: 0,
            y: 0,
            ox: 0,
            oy: 0,
            zoom_x: 1.0,
            zoom_y: 1.0,
            angle: 0.0,
            mirror: false,
            opacity: 255,
            blend: BlendType::Normal,
            bush_depth: 0,
            bush_opacity: 128,
            src_rect: Rect::default(),
            color: Color::default(),
            tone: Tone::default(),
            flash: Flash::default(),
            geometry: Geometry::default(),
        }
    }
}

impl Sprite {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn bitmap(&self) -> Option<BitmapRef> {
        self.bitmap
    }

    /// Replaces the bitmap. `src_rect` is reset to cover the whole new bitmap.
    pub fn set_bitmap(&mut self, bitmap: Option<BitmapRef>) {
        self.bitmap = bitmap;
        match bitmap {
            Some(b) => self.src_rect.set(0, 0, b.width as i32, b.height as i32),
            None => self.src_rect.empty(),
        }
    }

    #[inline]
    pub fn x(&self) -> i32 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> i32 {
        self.y
    }

    #[inline]
    pub fn set_x(&mut self, x: i32) {
        self.x = x;
    }

    #[inline]
    pub(crate) fn set_y(&mut self, y: i32) {
        self.y = y;
    }

    #[inline]
    pub fn opacity(&self) -> u8 {
        self.opacity
    }

    #[inline]
    pub fn set_opacity(&mut self, v: i32) {
        self.opacity = clamp_u8(v);
    }

    #[inline]
    pub fn bush_opacity(&self) -> u8 {
        self.bush_opacity
    }

    #[inline]
    pub fn set_bush_opacity(&mut self, v: i32) {
        self.bush_opacity = clamp_u8(v);
    }

    /// Advances the flash timer by one frame.
    pub fn update(&mut self) {
        self.flash.update();
    }

    pub(crate) fn on_geometry_change(&mut self, geometry: &Geometry) {
        self.geometry = *geometry;
    }

    /// Source rect clipped to the bitmap, or `None` when nothing is left.
    fn clipped_src(&self) -> Option<Rect> {
        let b = self.bitmap?;
        self.src_rect
            .intersect(&Rect::new(0, 0, b.width as i32, b.height as i32))
    }

    /// Destination rect in scene coordinates, unrotated.
    pub fn dest_rect(&self) -> Option<Rect> {
        let src = self.clipped_src()?;
        let w = (src.width() as f64 * self.zoom_x.abs()).round() as i32;
        let h = (src.height() as f64 * self.zoom_y.abs()).round() as i32;
        let x = self.x.saturating_sub((self.ox as f64 * self.zoom_x).round() as i32);
        let y = self.y.saturating_sub((self.oy as f64 * self.zoom_y).round() as i32);
        Some(Rect::new(x, y, w, h))
    }

    /// Unrotated sprites entirely outside the scene are skipped.
    pub fn is_culled(&self) -> bool {
        if self.angle != 0.0 {
            return false;
        }
        match self.dest_rect() {
            Some(dest) => dest.intersect(&self.geometry.visible_rect()).is_none(),
            None => true,
        }
    }

    pub(crate) fn draw(&self, element: ElementId, out: &mut DrawList) {
        let Some(bitmap) = self.bitmap else {
            return;
        };
        if self.opacity == 0 || self.flash.hides() || self.is_culled() {
            return;
        }
        let (Some(src), Some(dest)) = (self.clipped_src(), self.dest_rect()) else {
            return;
        };

        let (dx, dy) = self.geometry.screen_offset();
        out.push(DrawCmd::Sprite(SpriteCmd {
            element,
            bitmap: bitmap.id,
            src,
            dest: dest.translated(dx, dy),
            pivot: (self.x.saturating_add(dx), self.y.saturating_add(dy)),
            angle: self.angle,
            mirror: self.mirror,
            blend: self.blend,
            bush_depth: self.bush_depth,
            bush_opacity: self.bush_opacity,
            effect: EffectParams::new(
                self.color.normalized(),
                self.tone.normalized(),
                self.flash.params(),
                self.opacity as f32 / 255.0,
            ),
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id() -> ElementId {
        ElementId {
            idx: 0,
            generation: 0,
        }
    }

    fn sprite_on_screen() -> Sprite {
        let mut s = Sprite::new();
        s.set_bitmap(Some(BitmapRef::new(BitmapId(1), 32, 32)));
        s.on_geometry_change(&Geometry::new(Rect::new(0, 0, 640, 480), 0, 0));
        s
    }

    // ── bitmap / src_rect ─────────────────────────────────────────────────

    #[test]
    fn set_bitmap_resets_src_rect() {
        let mut s = sprite_on_screen();
        s.src_rect.set(4, 4, 8, 8);
        s.set_bitmap(Some(BitmapRef::new(BitmapId(2), 64, 16)));
        assert_eq!(s.src_rect, Rect::new(0, 0, 64, 16));
        s.set_bitmap(None);
        assert!(s.src_rect.is_empty());
    }

    #[test]
    fn dest_rect_applies_origin_and_zoom() {
        let mut s = sprite_on_screen();
        s.set_x(100);
        s.set_y(50);
        s.ox = 16;
        s.oy = 16;
        s.zoom_x = 2.0;
        assert_eq!(s.dest_rect(), Some(Rect::new(68, 34, 64, 32)));
    }

    // ── culling ───────────────────────────────────────────────────────────

    #[test]
    fn offscreen_sprite_records_nothing() {
        let mut s = sprite_on_screen();
        s.set_x(700);
        let mut out = DrawList::new();
        s.draw(id(), &mut out);
        assert!(out.is_empty());

        // Rotated sprites are never culled.
        s.angle = 45.0;
        s.draw(id(), &mut out);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn coordinates_near_i32_limits_are_culled() {
        let mut s = sprite_on_screen();
        let mut out = DrawList::new();
        s.set_x(i32::MAX - 5);
        s.draw(id(), &mut out);
        s.set_x(i32::MIN);
        s.ox = i32::MAX;
        s.draw(id(), &mut out);
        assert!(out.is_empty());

        // Rotated, so not culled: the pivot saturates instead of wrapping.
        s.set_x(i32::MAX);
        s.ox = 0;
        s.angle = 90.0;
        s.on_geometry_change(&Geometry::new(Rect::new(10, 0, 640, 480), 0, 0));
        s.draw(id(), &mut out);
        let DrawCmd::Sprite(cmd) = &out.items()[0].cmd else {
            panic!("expected sprite");
        };
        assert_eq!(cmd.pivot.0, i32::MAX);
    }

    #[test]
    fn transparent_or_hidden_sprite_records_nothing() {
        let mut s = sprite_on_screen();
        let mut out = DrawList::new();
        s.set_opacity(-5);
        s.draw(id(), &mut out);
        s.set_opacity(255);
        s.flash.start(None, 3);
        s.draw(id(), &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn draw_maps_to_screen_space() {
        let mut s = sprite_on_screen();
        s.on_geometry_change(&Geometry::new(Rect::new(10, 10, 100, 100), 4, 2));
        s.set_x(20);
        s.set_y(30);
        let mut out = DrawList::new();
        s.draw(id(), &mut out);
        let DrawCmd::Sprite(cmd) = &out.items()[0].cmd else {
            panic!("expected sprite");
        };
        assert_eq!(cmd.dest, Rect::new(26, 38, 32, 32));
        assert_eq!(cmd.effect.opacity, 1.0);
    }
}
