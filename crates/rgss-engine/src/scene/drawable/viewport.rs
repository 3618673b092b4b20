use crate::render::EffectParams;
use crate::scene::{Geometry, SceneId};
use crate::value::{Color, Rect, Tone};

use super::Flash;

/// What compositing a viewport needs, copied out of the element.
#[derive(Debug, Copy, Clone)]
pub(crate) struct ViewportPass {
    pub child: SceneId,
    /// On-screen area, clipped to the parent scene.
    pub screen_rect: Rect,
    pub effect: Option<EffectParams>,
}

/// Clipped sub-scene with its own origin and color effects.
///
/// The child scene is created and destroyed together with the element by the
/// [`SceneGraph`](crate::scene::SceneGraph); its geometry is the viewport rect.
#[derive(Debug, Clone, Default)]
pub struct Viewport {
    rect: Rect,
    ox: i32,
    oy: i32,
    pub color: Color,
    pub tone: Tone,
    pub flash: Flash,

    child: Option<SceneId>,
    parent_offset: (i32, i32),
    screen_rect: Option<Rect>,
}

impl Viewport {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            ..Self::default()
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    #[inline]
    pub fn origin(&self) -> (i32, i32) {
        (self.ox, self.oy)
    }

    #[inline]
    pub fn child_scene(&self) -> Option<SceneId> {
        self.child
    }

    /// Visible on-screen area, `None` when fully outside its parent.
    #[inline]
    pub fn screen_rect(&self) -> Option<Rect> {
        self.screen_rect
    }

    #[inline]
    pub fn is_on_screen(&self) -> bool {
        self.screen_rect.is_some()
    }

    /// Effect applied to the composited children, `None` when it would be a no-op.
    pub fn effect(&self) -> Option<EffectParams> {
        let flash = if self.flash.hides() {
            [0.0; 4]
        } else {
            self.flash.params()
        };
        let params = EffectParams::new(self.color.normalized(), self.tone.normalized(), flash, 1.0);
        params.is_active().then_some(params)
    }

    pub fn update(&mut self) {
        self.flash.update();
    }

    pub(crate) fn set_rect(&mut self, rect: Rect) {
        self.rect = rect;
    }

    pub(crate) fn set_origin(&mut self, ox: i32, oy: i32) {
        self.ox = ox;
        self.oy = oy;
    }

    pub(crate) fn set_child(&mut self, child: SceneId) {
        self.child = Some(child);
    }

    /// Geometry for the child scene: the viewport rect on screen, scrolled by its origin.
    pub(crate) fn child_geometry(&self) -> Geometry {
        let (dx, dy) = self.parent_offset;
        Geometry::new(self.rect.translated(dx, dy), self.ox, self.oy)
    }

    pub(crate) fn on_geometry_change(&mut self, parent: &Geometry) -> Geometry {
        self.parent_offset = parent.screen_offset();
        let child = self.child_geometry();
        self.screen_rect = child.rect.intersect(&parent.rect);
        child
    }

    pub(crate) fn pass(&self) -> Option<ViewportPass> {
        if self.flash.hides() {
            return None;
        }
        Some(ViewportPass {
            child: self.child?,
            screen_rect: self.screen_rect?,
            effect: self.effect(),
        })
    }
}
