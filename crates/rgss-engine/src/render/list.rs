use crate::pool::TexFbo;
use crate::scene::ElementId;
use crate::value::Rect;

use super::DrawCmd;

/// A single draw item: command + clip rect.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    pub cmd: DrawCmd,
    /// Scissor rect in screen pixels. `None` = no clipping (draw everywhere).
    pub clip_rect: Option<Rect>,
}

/// Recorded draw stream for a frame.
///
/// Items are kept in the order they were pushed, which is paint order:
/// the scene graph walks its lists already sorted.
///
/// Performance characteristics:
/// - `push()` is O(1)
/// - `clear()` keeps capacity, so a warmed list does not allocate per frame
///
/// # Clipping
///
/// Use [`push_clip`](Self::push_clip) / [`pop_clip`](Self::pop_clip) to scope
/// commands to a scissor rect. Clips are intersected with the current parent.
#[derive(Debug, Default)]
pub struct DrawList {
    items: Vec<DrawItem>,

    /// Stack of active scissor rects.
    /// The top is always the current effective clip, already intersected with all parents.
    clip_stack: Vec<Rect>,

    /// Offscreen targets referenced by recorded commands, still checked out.
    targets: Vec<TexFbo>,
}

impl DrawList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears recorded items and the clip stack. Keeps allocated capacity for reuse.
    ///
    /// Held targets are not touched; hand them back with
    /// [`take_targets`](Self::take_targets) first.
    #[inline]
    pub fn clear(&mut self) {
        self.items.clear();
        self.clip_stack.clear();
    }

    #[inline]
    pub fn items(&self) -> &[DrawItem] {
        &self.items
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Elements in the order their commands were recorded.
    pub fn elements(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.items.iter().filter_map(|item| item.cmd.element())
    }

    /// Records a command under the current clip rect.
    #[inline]
    pub fn push(&mut self, cmd: DrawCmd) {
        self.items.push(DrawItem {
            cmd,
            clip_rect: self.clip_stack.last().copied(),
        });
    }

    /// Keeps `target` checked out for as long as the recorded stream uses it.
    #[inline]
    pub fn hold_target(&mut self, target: TexFbo) {
        self.targets.push(target);
    }

    /// Offscreen targets held by the stream, for releasing back to the pool.
    #[inline]
    pub fn take_targets(&mut self) -> Vec<TexFbo> {
        std::mem::take(&mut self.targets)
    }

    #[inline]
    pub fn held_targets(&self) -> &[TexFbo] {
        &self.targets
    }

    /// Current effective clip.
    #[inline]
    pub fn clip(&self) -> Option<Rect> {
        self.clip_stack.last().copied()
    }

    /// Begins a scissor region. Calls must be balanced with [`pop_clip`](Self::pop_clip).
    #[inline]
    pub fn push_clip(&mut self, rect: Rect) {
        let effective = match self.clip_stack.last() {
            None => rect,
            // No overlap produces a zero-area rect so the renderer skips those draws.
            Some(parent) => parent.intersect(&rect).unwrap_or_default(),
        };
        self.clip_stack.push(effective);
    }

    /// Ends the most recent scissor region.
    ///
    /// # Panics
    /// Panics (debug only) if called without a matching `push_clip`.
    #[inline]
    pub fn pop_clip(&mut self) {
        debug_assert!(!self.clip_stack.is_empty(), "pop_clip called without matching push_clip");
        self.clip_stack.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::TexFbo;

    fn begin(x: i32) -> DrawCmd {
        DrawCmd::BeginOffscreen {
            target: TexFbo::NULL,
            rect: Rect::new(x, 0, 1, 1),
        }
    }

    #[test]
    fn push_keeps_order() {
        let mut list = DrawList::new();
        list.push(begin(1));
        list.push(begin(2));
        let xs: Vec<_> = list
            .items()
            .iter()
            .map(|i| match &i.cmd {
                DrawCmd::BeginOffscreen { rect, .. } => rect.x(),
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(xs, vec![1, 2]);
    }

    #[test]
    fn clips_intersect_with_parent() {
        let mut list = DrawList::new();
        list.push_clip(Rect::new(0, 0, 100, 100));
        list.push_clip(Rect::new(50, 50, 100, 100));
        list.push(begin(0));
        assert_eq!(list.items()[0].clip_rect, Some(Rect::new(50, 50, 50, 50)));
        list.pop_clip();
        list.pop_clip();
        list.push(begin(0));
        assert_eq!(list.items()[1].clip_rect, None);
    }

    #[test]
    fn disjoint_clip_is_empty() {
        let mut list = DrawList::new();
        list.push_clip(Rect::new(0, 0, 10, 10));
        list.push_clip(Rect::new(20, 20, 10, 10));
        assert!(list.clip().unwrap().is_empty());
    }

    #[test]
    fn clear_resets_items_and_clips() {
        let mut list = DrawList::new();
        list.push_clip(Rect::new(0, 0, 10, 10));
        list.push(begin(0));
        list.clear();
        assert!(list.is_empty());
        assert_eq!(list.clip(), None);
    }

    #[test]
    fn targets_survive_clear_until_taken() {
        let mut list = DrawList::new();
        list.hold_target(TexFbo::NULL);
        list.clear();
        assert_eq!(list.held_targets().len(), 1);
        assert_eq!(list.take_targets().len(), 1);
        assert!(list.held_targets().is_empty());
    }
}
