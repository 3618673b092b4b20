use crate::error::ResourceLimitError;
use crate::pool::{TexPool, TextureBackend};
use crate::render::{DrawCmd, DrawList};

use super::drawable::{Drawable, ViewportPass};
use super::{ElementId, SceneGraph, SceneId};

/// Records one frame of `scene` into `out`, back to front.
///
/// Invisible elements are skipped but stay in place. Viewports recurse into
/// their child scene, clipped to their on-screen rect; a viewport with an
/// active color effect draws its children into a pooled offscreen target that
/// `out` keeps checked out (see [`DrawList::take_targets`]).
///
/// Fails when a pooled surface cannot be allocated. Commands recorded up to
/// that point stay in `out`.
pub fn composite<B: TextureBackend>(
    graph: &mut SceneGraph,
    scene: SceneId,
    pool: &mut TexPool<B>,
    out: &mut DrawList,
) -> Result<(), ResourceLimitError> {
    let Some(list) = graph.scene_list(scene) else {
        return Ok(());
    };
    let end = graph.links().end(list);
    let mut cur = graph.links().begin(list);

    while cur != end {
        let next = graph.links().next(cur).unwrap_or(end);
        if let Some(id) = graph.links().owner(cur) {
            draw_element(graph, id, pool, out)?;
        }
        cur = next;
    }
    Ok(())
}

fn draw_element<B: TextureBackend>(
    graph: &mut SceneGraph,
    id: ElementId,
    pool: &mut TexPool<B>,
    out: &mut DrawList,
) -> Result<(), ResourceLimitError> {
    let Some(el) = graph.element_mut(id) else {
        return Ok(());
    };
    if !el.visible {
        return Ok(());
    }

    match &mut el.drawable {
        Drawable::Sprite(s) => s.draw(id, out),
        Drawable::Plane(p) => p.draw(id, out),
        Drawable::Window(w) => w.draw(id, out),
        Drawable::Tilemap(t) => t.draw(id, pool, out)?,
        Drawable::Viewport(v) => {
            if let Some(pass) = v.pass() {
                composite_viewport(graph, pass, pool, out)?;
            }
        }
    }
    Ok(())
}

fn composite_viewport<B: TextureBackend>(
    graph: &mut SceneGraph,
    pass: ViewportPass,
    pool: &mut TexPool<B>,
    out: &mut DrawList,
) -> Result<(), ResourceLimitError> {
    let rect = pass.screen_rect;

    let Some(effect) = pass.effect else {
        out.push_clip(rect);
        let res = composite(graph, pass.child, pool, out);
        out.pop_clip();
        return res;
    };

    // Extents are positive: `screen_rect` comes from a successful intersection.
    let target = pool.request(rect.width() as u32, rect.height() as u32)?;
    out.hold_target(target);
    out.push(DrawCmd::BeginOffscreen { target, rect });
    out.push_clip(rect);
    let res = composite(graph, pass.child, pool, out);
    out.pop_clip();
    out.push(DrawCmd::EndOffscreen {
        target,
        rect,
        effect,
    });
    res
}
