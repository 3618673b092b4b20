use crate::render::{DrawCmd, DrawList, EffectParams};
use crate::scene::{ElementId, Geometry};
use crate::value::{Color, Rect, Tone};

use super::{BitmapId, BitmapRef, BlendType, clamp_u8};

/// Recorded plane draw: the bitmap tiled across `quad`.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaneCmd {
    pub element: ElementId,
    pub bitmap: BitmapId,
    /// Covered area in screen pixels (the whole scene).
    pub quad: Rect,
    /// Texture scroll in bitmap pixels, before zoom.
    pub scroll: (i32, i32),
    pub zoom: (f64, f64),
    pub blend: BlendType,
    pub effect: EffectParams,
}

/// Bitmap tiled over the whole scene, scrolled by `ox`/`oy`.
#[derive(Debug, Clone)]
pub struct Plane {
    pub bitmap: Option<BitmapRef>,
    pub ox: i32,
    pub oy: i32,
    pub zoom_x: f64,
    pub zoom_y: f64,
    opacity: u8,
    pub blend: BlendType,
    pub color: Color,
    pub tone: Tone,

    quad: Rect,
    origin: (i32, i32),
}

impl Default for Plane {
    fn default() -> Self {
        Self {
            bitmap: None,
            ox: 0,
            oy: 0,
            zoom_x: 1.0,
            zoom_y: 1.0,
            opacity: 255,
            blend: BlendType::Normal,
            color: Color::default(),
            tone: Tone::default(),
            quad: Rect::default(),
            origin: (0, 0),
        }
    }
}

impl Plane {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn opacity(&self) -> u8 {
        self.opacity
    }

    #[inline]
    pub fn set_opacity(&mut self, v: i32) {
        self.opacity = clamp_u8(v);
    }

    /// Area the plane covers, in screen pixels.
    #[inline]
    pub fn quad(&self) -> Rect {
        self.quad
    }

    pub(crate) fn on_geometry_change(&mut self, geometry: &Geometry) {
        self.quad = geometry.rect;
        self.origin = (geometry.origin_x, geometry.origin_y);
    }

    pub(crate) fn draw(&self, element: ElementId, out: &mut DrawList) {
        let Some(bitmap) = self.bitmap else {
            return;
        };
        if self.opacity == 0 || self.quad.is_empty() || bitmap.width == 0 || bitmap.height == 0 {
            return;
        }

        out.push(DrawCmd::Plane(PlaneCmd {
            element,
            bitmap: bitmap.id,
            quad: self.quad,
            scroll: (
                self.ox.wrapping_add(self.origin.0),
                self.oy.wrapping_add(self.origin.1),
            ),
            zoom: (self.zoom_x, self.zoom_y),
            blend: self.blend,
            effect: EffectParams::new(
                self.color.normalized(),
                self.tone.normalized(),
                [0.0; 4],
                self.opacity as f32 / 255.0,
            ),
        }));
    }
}
