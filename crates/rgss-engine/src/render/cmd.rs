use crate::pool::TexFbo;
use crate::scene::ElementId;
use crate::scene::drawable::{PlaneCmd, SpriteCmd, TilemapCmd, WindowCmd};
use crate::value::Rect;

use super::EffectParams;

/// Renderer-agnostic draw command stream.
///
/// Extending the stream:
/// - add the drawable under `scene::drawable::*` with its `*Cmd` payload
/// - add a new variant here
/// - record it from the drawable's `draw`
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Sprite(SpriteCmd),
    Plane(PlaneCmd),
    Window(WindowCmd),
    Tilemap(TilemapCmd),

    /// Redirect subsequent commands into `target`, which covers `rect` on screen.
    BeginOffscreen { target: TexFbo, rect: Rect },

    /// Stop redirecting; blend `target` back at `rect` through `effect`.
    EndOffscreen {
        target: TexFbo,
        rect: Rect,
        effect: EffectParams,
    },
}

impl DrawCmd {
    /// The element that recorded this command, if any.
    pub fn element(&self) -> Option<ElementId> {
        match self {
            DrawCmd::Sprite(c) => Some(c.element),
            DrawCmd::Plane(c) => Some(c.element),
            DrawCmd::Window(c) => Some(c.element),
            DrawCmd::Tilemap(c) => Some(c.element),
            DrawCmd::BeginOffscreen { .. } | DrawCmd::EndOffscreen { .. } => None,
        }
    }
}
