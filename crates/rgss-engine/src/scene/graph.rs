use crate::list::{Links, List, NodeId};
use crate::pool::TexFbo;
use crate::value::Rect;

use super::drawable::{Drawable, DrawableKind, Plane, Sprite, Tilemap, Viewport, Window};
use super::{ElementId, Geometry, GraphCtx, OrderKey, SceneId, TieBreak};

#[derive(Debug)]
pub(crate) struct Element {
    pub(crate) key: OrderKey,
    pub(crate) visible: bool,
    pub(crate) scene: Option<SceneId>,
    pub(crate) node: NodeId,
    pub(crate) drawable: Drawable,
}

#[derive(Debug)]
struct Scene {
    list: List,
    geometry: Geometry,
    /// Viewport element whose child this scene is.
    owner: Option<ElementId>,
}

#[derive(Debug)]
struct Slot<T> {
    generation: u32,
    entry: Option<T>,
}

/// Slot arena with generation-checked keys and a free list.
#[derive(Debug)]
struct Arena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
}

impl<T> Arena<T> {
    fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Key the next `insert` will return.
    fn vacant_key(&self) -> (u32, u32) {
        match self.free.last() {
            Some(&idx) => (idx, self.slots[idx as usize].generation),
            None => (self.slots.len() as u32, 0),
        }
    }

    fn insert(&mut self, value: T) -> (u32, u32) {
        if let Some(idx) = self.free.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.entry = Some(value);
            (idx, slot.generation)
        } else {
            let idx = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                entry: Some(value),
            });
            (idx, 0)
        }
    }

    fn get(&self, idx: u32, generation: u32) -> Option<&T> {
        let slot = self.slots.get(idx as usize)?;
        if slot.generation != generation {
            return None;
        }
        slot.entry.as_ref()
    }

    fn get_mut(&mut self, idx: u32, generation: u32) -> Option<&mut T> {
        let slot = self.slots.get_mut(idx as usize)?;
        if slot.generation != generation {
            return None;
        }
        slot.entry.as_mut()
    }

    fn remove(&mut self, idx: u32, generation: u32) -> Option<T> {
        let slot = self.slots.get_mut(idx as usize)?;
        if slot.generation != generation {
            return None;
        }
        let value = slot.entry.take()?;
        // Old handles fail validation from here on.
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(idx);
        Some(value)
    }

    fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.slots.iter_mut().filter_map(|s| s.entry.as_mut())
    }
}

/// Owner of every scene and element.
///
/// Elements live in a generation-checked arena; each scene is an intrusive
/// list of element links kept sorted by [`OrderKey`] under the graph's
/// [`TieBreak`]. Stale handles are ignored by every operation.
///
/// Ordering is maintained on write: attaching and every key change splice the
/// element into place with a linear scan, so compositing is a plain forward
/// walk.
#[derive(Debug)]
pub struct SceneGraph {
    ctx: GraphCtx,
    links: Links<ElementId>,
    elements: Arena<Element>,
    scenes: Arena<Scene>,
}

impl SceneGraph {
    pub fn new(ctx: GraphCtx) -> Self {
        Self {
            ctx,
            links: Links::new(),
            elements: Arena::new(),
            scenes: Arena::new(),
        }
    }

    #[inline]
    pub fn ctx(&self) -> &GraphCtx {
        &self.ctx
    }

    #[inline]
    pub fn tie_break(&self) -> TieBreak {
        self.ctx.tie_break
    }

    #[inline]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub(crate) fn links(&self) -> &Links<ElementId> {
        &self.links
    }

    #[inline]
    pub(crate) fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.idx, id.generation)
    }

    #[inline]
    pub(crate) fn element_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(id.idx, id.generation)
    }

    #[inline]
    fn scene(&self, id: SceneId) -> Option<&Scene> {
        self.scenes.get(id.idx, id.generation)
    }

    #[inline]
    pub(crate) fn scene_list(&self, id: SceneId) -> Option<List> {
        self.scene(id).map(|s| s.list)
    }

    // ── scenes ────────────────────────────────────────────────────────────

    pub fn create_scene(&mut self, geometry: Geometry) -> SceneId {
        self.create_scene_owned(geometry, None)
    }

    fn create_scene_owned(&mut self, geometry: Geometry, owner: Option<ElementId>) -> SceneId {
        let list = self.links.new_list();
        let (idx, generation) = self.scenes.insert(Scene {
            list,
            geometry,
            owner,
        });
        let id = SceneId { idx, generation };
        log::debug!("created {id:?}");
        id
    }

    /// Destroys a scene. Members survive, detached from any scene.
    pub fn destroy_scene(&mut self, scene: SceneId) {
        let Some(s) = self.scenes.remove(scene.idx, scene.generation) else {
            return;
        };
        let members: Vec<ElementId> = self.links.iter(s.list).collect();
        for &id in &members {
            if let Some(el) = self.element_mut(id) {
                el.scene = None;
            }
        }
        self.links.free_list(s.list);
        log::debug!("destroyed {scene:?}, {} members detached", members.len());
    }

    #[inline]
    pub fn contains_scene(&self, scene: SceneId) -> bool {
        self.scene(scene).is_some()
    }

    #[inline]
    pub fn geometry(&self, scene: SceneId) -> Option<Geometry> {
        self.scene(scene).map(|s| s.geometry)
    }

    /// Replaces a scene's geometry and notifies its members.
    pub fn set_geometry(&mut self, scene: SceneId, geometry: Geometry) {
        match self.scenes.get_mut(scene.idx, scene.generation) {
            Some(s) => s.geometry = geometry,
            None => return,
        }
        self.notify_geometry_change(scene);
    }

    /// Lets every member recompute its geometry-dependent state.
    ///
    /// Child scenes of member viewports are updated recursively. Order is untouched.
    pub fn notify_geometry_change(&mut self, scene: SceneId) {
        let Some(s) = self.scene(scene) else {
            return;
        };
        let geometry = s.geometry;
        let members: Vec<ElementId> = self.links.iter(s.list).collect();
        for id in members {
            let Some(el) = self.element_mut(id) else {
                continue;
            };
            if let Some((child, child_geometry)) = el.drawable.on_geometry_change(&geometry) {
                self.set_geometry(child, child_geometry);
            }
        }
    }

    /// Members in composite order.
    pub fn members(&self, scene: SceneId) -> impl Iterator<Item = ElementId> + '_ {
        self.scene(scene)
            .map(|s| self.links.iter(s.list))
            .into_iter()
            .flatten()
    }

    pub fn len(&self, scene: SceneId) -> usize {
        self.scene(scene).map_or(0, |s| self.links.len(s.list))
    }

    /// Every adjacent pair of members is in strictly increasing order.
    pub fn is_sorted(&self, scene: SceneId) -> bool {
        let keys: Vec<OrderKey> = self
            .members(scene)
            .filter_map(|id| self.element(id).map(|e| e.key))
            .collect();
        keys.windows(2)
            .all(|w| w[1].is_after(&w[0], self.ctx.tie_break))
    }

    // ── element lifecycle ─────────────────────────────────────────────────

    /// Creates an element, optionally attached to `scene`.
    ///
    /// Viewports get their child scene here.
    pub fn spawn(&mut self, drawable: impl Into<Drawable>, scene: Option<SceneId>) -> ElementId {
        let mut drawable = drawable.into();
        let (idx, generation) = self.elements.vacant_key();
        let id = ElementId { idx, generation };

        let node = self.links.alloc(id);
        if let Drawable::Viewport(v) = &mut drawable {
            let child = self.create_scene_owned(v.child_geometry(), Some(id));
            v.set_child(child);
        }

        let key = OrderKey::new(drawable.default_z(), 0, self.ctx.clock.gen_stamp());
        let inserted = self.elements.insert(Element {
            key,
            visible: true,
            scene: None,
            node,
            drawable,
        });
        debug_assert_eq!(inserted, (idx, generation));

        if let Some(scene) = scene {
            self.attach(id, scene);
        }
        id
    }

    pub fn spawn_viewport(&mut self, rect: Rect, parent: Option<SceneId>) -> ElementId {
        self.spawn(Viewport::new(rect), parent)
    }

    /// Unlinks and frees an element, returning its drawable.
    ///
    /// A viewport's child scene is destroyed; its members stay alive, detached.
    /// Pooled resources still held by the drawable are the caller's to return,
    /// which is why only `Graphics::dispose` reaches this.
    pub(crate) fn dispose(&mut self, id: ElementId) -> Option<Drawable> {
        self.detach(id);
        let el = self.elements.remove(id.idx, id.generation)?;
        self.links.release(el.node);
        if let Drawable::Viewport(v) = &el.drawable {
            if let Some(child) = v.child_scene() {
                self.destroy_scene(child);
            }
        }
        Some(el.drawable)
    }

    #[inline]
    pub fn contains(&self, id: ElementId) -> bool {
        self.element(id).is_some()
    }

    pub fn kind(&self, id: ElementId) -> Option<DrawableKind> {
        self.element(id).map(|e| e.drawable.kind())
    }

    pub fn scene_of(&self, id: ElementId) -> Option<SceneId> {
        self.element(id).and_then(|e| e.scene)
    }

    pub fn z(&self, id: ElementId) -> Option<i32> {
        self.element(id).map(|e| e.key.z)
    }

    pub fn sprite_y(&self, id: ElementId) -> Option<i32> {
        self.element(id).map(|e| e.key.sprite_y)
    }

    pub fn creation_stamp(&self, id: ElementId) -> Option<u64> {
        self.element(id).map(|e| e.key.stamp)
    }

    pub fn is_visible(&self, id: ElementId) -> Option<bool> {
        self.element(id).map(|e| e.visible)
    }

    pub fn is_linked(&self, id: ElementId) -> bool {
        self.element(id)
            .is_some_and(|e| self.links.is_linked(e.node))
    }

    // ── membership ────────────────────────────────────────────────────────

    /// `scene` is `viewport`'s child scene or nested somewhere below it.
    fn is_within(&self, mut scene: SceneId, viewport: ElementId) -> bool {
        loop {
            let Some(owner) = self.scene(scene).and_then(|s| s.owner) else {
                return false;
            };
            if owner == viewport {
                return true;
            }
            match self.scene_of(owner) {
                Some(parent) => scene = parent,
                None => return false,
            }
        }
    }

    /// Detaches from the current scene (if any) and takes on `scene`'s geometry.
    fn adopt(&mut self, id: ElementId, scene: SceneId) -> bool {
        let Some(geometry) = self.geometry(scene) else {
            return false;
        };
        if self.is_within(scene, id) {
            log::warn!("refusing to attach {id:?} inside its own child scene {scene:?}");
            return false;
        }
        self.detach(id);
        let Some(el) = self.element_mut(id) else {
            return false;
        };
        el.scene = Some(scene);
        if let Some((child, child_geometry)) = el.drawable.on_geometry_change(&geometry) {
            self.set_geometry(child, child_geometry);
        }
        true
    }

    /// Inserts into `scene` at its ordered position.
    pub fn attach(&mut self, id: ElementId, scene: SceneId) {
        if self.adopt(id, scene) {
            self.link_sorted(id, None);
        }
    }

    /// Inserts into `anchor`'s scene, scanning from `anchor` onwards.
    ///
    /// Falls back to a scan from the head when `id` sorts before `anchor`.
    pub fn insert_after(&mut self, id: ElementId, anchor: ElementId) {
        if id == anchor {
            return;
        }
        let Some((scene, anchor_key, anchor_node)) = self
            .element(anchor)
            .and_then(|a| Some((a.scene?, a.key, a.node)))
        else {
            return;
        };
        if !self.adopt(id, scene) {
            return;
        }
        let Some(key) = self.element(id).map(|e| e.key) else {
            return;
        };
        let from = key
            .is_after(&anchor_key, self.ctx.tie_break)
            .then_some(anchor_node);
        self.link_sorted(id, from);
    }

    /// Removes from the current scene. A no-op when already detached.
    pub fn detach(&mut self, id: ElementId) {
        let Some(el) = self.element_mut(id) else {
            return;
        };
        let Some(scene) = el.scene.take() else {
            return;
        };
        let node = el.node;
        if let Some(list) = self.scene_list(scene) {
            self.links.remove(list, node);
        }
    }

    /// Moves an element back into order after its key changed.
    pub fn reinsert(&mut self, id: ElementId) {
        let Some(el) = self.element(id) else {
            return;
        };
        let node = el.node;
        let Some(list) = el.scene.and_then(|s| self.scene_list(s)) else {
            return;
        };
        self.links.remove(list, node);
        self.link_sorted(id, None);
    }

    fn link_sorted(&mut self, id: ElementId, from: Option<NodeId>) {
        let Some(el) = self.element(id) else {
            return;
        };
        let (key, node) = (el.key, el.node);
        let Some(list) = el.scene.and_then(|s| self.scene_list(s)) else {
            return;
        };
        let tie = self.ctx.tie_break;
        let end = self.links.end(list);

        let mut cur = match from {
            Some(anchor) => self.links.next(anchor).unwrap_or(end),
            None => self.links.begin(list),
        };
        while cur != end {
            let other_is_after = self
                .links
                .owner(cur)
                .and_then(|other| self.element(other))
                .is_some_and(|other| other.key.is_after(&key, tie));
            if other_is_after {
                break;
            }
            cur = self.links.next(cur).unwrap_or(end);
        }
        self.links.insert_before(list, node, cur);
    }

    // ── ordering keys ─────────────────────────────────────────────────────

    /// Sets `z`. Reorders immediately when the element is in a scene.
    pub fn set_z(&mut self, id: ElementId, z: i32) {
        let Some(el) = self.element_mut(id) else {
            return;
        };
        if el.key.z == z {
            return;
        }
        el.key.z = z;
        if el.scene.is_some() {
            self.reinsert(id);
        }
    }

    /// Sets the secondary key. Reorders immediately when the element is in a scene.
    pub fn set_sprite_y(&mut self, id: ElementId, sprite_y: i32) {
        let Some(el) = self.element_mut(id) else {
            return;
        };
        if el.key.sprite_y == sprite_y {
            return;
        }
        el.key.sprite_y = sprite_y;
        if el.scene.is_some() && self.ctx.tie_break == TieBreak::Modern {
            self.reinsert(id);
        }
    }

    pub fn set_visible(&mut self, id: ElementId, visible: bool) {
        if let Some(el) = self.element_mut(id) {
            el.visible = visible;
        }
    }

    /// Moves a sprite. In modern ordering its `y` is also the secondary key.
    pub fn move_sprite(&mut self, id: ElementId, x: i32, y: i32) {
        let Some(sprite) = self.sprite_mut(id) else {
            return;
        };
        sprite.set_x(x);
        sprite.set_y(y);
        if self.ctx.tie_break == TieBreak::Modern {
            self.set_sprite_y(id, y);
        }
    }

    // ── viewports ─────────────────────────────────────────────────────────

    pub fn viewport_scene(&self, id: ElementId) -> Option<SceneId> {
        self.viewport(id).and_then(Viewport::child_scene)
    }

    pub fn set_viewport_rect(&mut self, id: ElementId, rect: Rect) {
        self.update_viewport(id, |v| v.set_rect(rect));
    }

    pub fn set_viewport_origin(&mut self, id: ElementId, ox: i32, oy: i32) {
        self.update_viewport(id, |v| v.set_origin(ox, oy));
    }

    fn update_viewport(&mut self, id: ElementId, f: impl FnOnce(&mut Viewport)) {
        let parent = self.scene_of(id).and_then(|s| self.geometry(s));
        let Some(v) = self.viewport_mut(id) else {
            return;
        };
        f(v);
        let child_geometry = match parent {
            Some(g) => v.on_geometry_change(&g),
            None => v.child_geometry(),
        };
        if let Some(child) = v.child_scene() {
            self.set_geometry(child, child_geometry);
        }
    }

    // ── drawable access ───────────────────────────────────────────────────

    pub fn drawable(&self, id: ElementId) -> Option<&Drawable> {
        self.element(id).map(|e| &e.drawable)
    }

    pub fn sprite(&self, id: ElementId) -> Option<&Sprite> {
        match self.drawable(id)? {
            Drawable::Sprite(s) => Some(s),
            _ => None,
        }
    }

    pub fn sprite_mut(&mut self, id: ElementId) -> Option<&mut Sprite> {
        match &mut self.element_mut(id)?.drawable {
            Drawable::Sprite(s) => Some(s),
            _ => None,
        }
    }

    pub fn plane(&self, id: ElementId) -> Option<&Plane> {
        match self.drawable(id)? {
            Drawable::Plane(p) => Some(p),
            _ => None,
        }
    }

    pub fn plane_mut(&mut self, id: ElementId) -> Option<&mut Plane> {
        match &mut self.element_mut(id)?.drawable {
            Drawable::Plane(p) => Some(p),
            _ => None,
        }
    }

    pub fn window(&self, id: ElementId) -> Option<&Window> {
        match self.drawable(id)? {
            Drawable::Window(w) => Some(w),
            _ => None,
        }
    }

    pub fn window_mut(&mut self, id: ElementId) -> Option<&mut Window> {
        match &mut self.element_mut(id)?.drawable {
            Drawable::Window(w) => Some(w),
            _ => None,
        }
    }

    pub fn tilemap(&self, id: ElementId) -> Option<&Tilemap> {
        match self.drawable(id)? {
            Drawable::Tilemap(t) => Some(t),
            _ => None,
        }
    }

    pub fn tilemap_mut(&mut self, id: ElementId) -> Option<&mut Tilemap> {
        match &mut self.element_mut(id)?.drawable {
            Drawable::Tilemap(t) => Some(t),
            _ => None,
        }
    }

    pub fn viewport(&self, id: ElementId) -> Option<&Viewport> {
        match self.drawable(id)? {
            Drawable::Viewport(v) => Some(v),
            _ => None,
        }
    }

    pub fn viewport_mut(&mut self, id: ElementId) -> Option<&mut Viewport> {
        match &mut self.element_mut(id)?.drawable {
            Drawable::Viewport(v) => Some(v),
            _ => None,
        }
    }

    /// Takes every tilemap atlas out of the graph (for teardown).
    pub fn take_atlases(&mut self) -> Vec<TexFbo> {
        self.elements
            .values_mut()
            .filter_map(|el| match &mut el.drawable {
                Drawable::Tilemap(t) => t.take_atlas(),
                _ => None,
            })
            .collect()
    }
}
