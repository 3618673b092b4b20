//! Drawable element kinds.
//!
//! Each kind lives in its own file together with the command payload it
//! records into a [`DrawList`](crate::render::DrawList). Dispatch is a plain
//! `match` over [`Drawable`]; compositing itself lives in `scene::composite`.

mod flash;
mod plane;
mod sprite;
mod tilemap;
mod viewport;
mod window;

pub use flash::Flash;
pub use plane::{Plane, PlaneCmd};
pub use sprite::{Sprite, SpriteCmd};
pub use tilemap::{Tilemap, TilemapCmd};
pub use viewport::Viewport;
pub use window::{Window, WindowCmd};

pub(crate) use viewport::ViewportPass;

use super::{Geometry, SceneId};

/// Opaque handle to bitmap pixels owned by the host.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct BitmapId(pub u32);

/// A bitmap handle plus the size the element needs for layout.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BitmapRef {
    pub id: BitmapId,
    pub width: u32,
    pub height: u32,
}

impl BitmapRef {
    #[inline]
    pub const fn new(id: BitmapId, width: u32, height: u32) -> Self {
        Self { id, width, height }
    }
}

/// Blend equation used when the element is drawn.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum BlendType {
    #[default]
    Normal,
    Add,
    Sub,
}

impl BlendType {
    /// Maps the script-side integer (0, 1, 2). Unknown values fall back to normal.
    pub fn from_raw(v: i32) -> Self {
        match v {
            1 => BlendType::Add,
            2 => BlendType::Sub,
            _ => BlendType::Normal,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum DrawableKind {
    Sprite,
    Plane,
    Window,
    Tilemap,
    Viewport,
}

/// Closed set of element kinds a scene can hold.
#[derive(Debug)]
pub enum Drawable {
    Sprite(Sprite),
    Plane(Plane),
    Window(Window),
    Tilemap(Tilemap),
    Viewport(Viewport),
}

impl Drawable {
    pub fn kind(&self) -> DrawableKind {
        match self {
            Drawable::Sprite(_) => DrawableKind::Sprite,
            Drawable::Plane(_) => DrawableKind::Plane,
            Drawable::Window(_) => DrawableKind::Window,
            Drawable::Tilemap(_) => DrawableKind::Tilemap,
            Drawable::Viewport(_) => DrawableKind::Viewport,
        }
    }

    /// `z` a freshly created element starts with.
    pub fn default_z(&self) -> i32 {
        match self {
            Drawable::Window(_) => Window::DEFAULT_Z,
            _ => 0,
        }
    }

    /// Recomputes state that depends on the owning scene's geometry.
    ///
    /// Returns the child scene and its new geometry when the element owns one.
    pub(crate) fn on_geometry_change(&mut self, geometry: &Geometry) -> Option<(SceneId, Geometry)> {
        match self {
            Drawable::Sprite(s) => s.on_geometry_change(geometry),
            Drawable::Plane(p) => p.on_geometry_change(geometry),
            Drawable::Window(w) => w.on_geometry_change(geometry),
            Drawable::Tilemap(t) => t.on_geometry_change(geometry),
            Drawable::Viewport(v) => {
                let child_geometry = v.on_geometry_change(geometry);
                return v.child_scene().map(|child| (child, child_geometry));
            }
        }
        None
    }
}

impl From<Sprite> for Drawable {
    fn from(v: Sprite) -> Self {
        Drawable::Sprite(v)
    }
}

impl From<Plane> for Drawable {
    fn from(v: Plane) -> Self {
        Drawable::Plane(v)
    }
}

impl From<Window> for Drawable {
    fn from(v: Window) -> Self {
        Drawable::Window(v)
    }
}

impl From<Tilemap> for Drawable {
    fn from(v: Tilemap) -> Self {
        Drawable::Tilemap(v)
    }
}

impl From<Viewport> for Drawable {
    fn from(v: Viewport) -> Self {
        Drawable::Viewport(v)
    }
}

/// Script-side opacity values are clamped into a byte.
#[inline]
pub(crate) fn clamp_u8(v: i32) -> u8 {
    v.clamp(0, 255) as u8
}
