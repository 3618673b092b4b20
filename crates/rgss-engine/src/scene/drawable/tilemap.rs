use crate::error::ResourceLimitError;
use crate::pool::{TexFbo, TexPool, TextureBackend};
use crate::render::{DrawCmd, DrawList};
use crate::scene::{ElementId, Geometry};
use crate::value::{Rect, Revision, RevisionWatch, Table};

use super::BitmapRef;

pub const TILE_SIZE: i32 = 32;

// Autotile strip on the left of the atlas: 7 autotiles of 96x128, 4 animation frames each.
const AUTOTILE_AREA_W: u32 = 4 * 96;
const AUTOTILE_AREA_H: u32 = 7 * 128;

/// Recorded tilemap draw.
#[derive(Debug, Clone, PartialEq)]
pub struct TilemapCmd {
    pub element: ElementId,
    pub atlas: TexFbo,
    /// Atlas was (re)allocated; the tileset must be blitted into it.
    pub atlas_rebuilt: bool,
    /// Map or priority data changed; layer geometry must be regenerated.
    pub layers_dirty: bool,
    pub flash_dirty: bool,
    /// Visible area in tiles.
    pub region: Rect,
    /// Screen position of the region's top-left tile.
    pub origin: (i32, i32),
}

/// Grid of tiles from a tileset, layered by priority.
///
/// The tileset is packed into an atlas render target obtained from the texture
/// pool; a tileset change releases the old atlas and requests a new one.
#[derive(Debug, Default)]
pub struct Tilemap {
    tileset: Option<BitmapRef>,
    map_data: Option<Table>,
    priorities: Option<Table>,
    flash_data: Option<Table>,
    ox: i32,
    oy: i32,

    atlas: Option<TexFbo>,
    atlas_stale: bool,
    map_watch: RevisionWatch,
    priority_watch: RevisionWatch,
    flash_watch: RevisionWatch,
    geometry: Geometry,
    region: Rect,
}

fn revision_of(table: &Option<Table>) -> Revision {
    table.as_ref().map(Table::revision).unwrap_or_default()
}

impl Tilemap {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn tileset(&self) -> Option<BitmapRef> {
        self.tileset
    }

    pub fn set_tileset(&mut self, tileset: Option<BitmapRef>) {
        if self.tileset != tileset {
            self.tileset = tileset;
            self.atlas_stale = true;
        }
    }

    #[inline]
    pub fn map_data(&self) -> Option<&Table> {
        self.map_data.as_ref()
    }

    /// In-place edits are picked up at the next draw.
    #[inline]
    pub fn map_data_mut(&mut self) -> Option<&mut Table> {
        self.map_data.as_mut()
    }

    pub fn set_map_data(&mut self, table: Option<Table>) {
        self.map_data = table;
        self.map_watch.reset();
    }

    #[inline]
    pub fn priorities(&self) -> Option<&Table> {
        self.priorities.as_ref()
    }

    #[inline]
    pub fn priorities_mut(&mut self) -> Option<&mut Table> {
        self.priorities.as_mut()
    }

    pub fn set_priorities(&mut self, table: Option<Table>) {
        self.priorities = table;
        self.priority_watch.reset();
    }

    #[inline]
    pub fn flash_data(&self) -> Option<&Table> {
        self.flash_data.as_ref()
    }

    #[inline]
    pub fn flash_data_mut(&mut self) -> Option<&mut Table> {
        self.flash_data.as_mut()
    }

    pub fn set_flash_data(&mut self, table: Option<Table>) {
        self.flash_data = table;
        self.flash_watch.reset();
    }

    #[inline]
    pub fn origin(&self) -> (i32, i32) {
        (self.ox, self.oy)
    }

    pub fn set_origin(&mut self, ox: i32, oy: i32) {
        self.ox = ox;
        self.oy = oy;
        self.update_region();
    }

    /// Visible area in tiles, including one tile of overscan on each axis.
    #[inline]
    pub fn visible_region(&self) -> Rect {
        self.region
    }

    #[inline]
    pub fn atlas(&self) -> Option<TexFbo> {
        self.atlas
    }

    /// Removes the atlas so the caller can hand it back to the pool.
    pub fn take_atlas(&mut self) -> Option<TexFbo> {
        self.atlas.take()
    }

    /// Atlas size for a tileset, wrapping tall tilesets into extra columns.
    pub fn atlas_size(tileset: BitmapRef, max_texture_size: u32) -> (u32, u32) {
        let column_h = (max_texture_size / TILE_SIZE as u32 * TILE_SIZE as u32).max(TILE_SIZE as u32);
        let tiles_h = tileset.height.max(TILE_SIZE as u32);
        let columns = tiles_h.div_ceil(column_h);
        let height = tiles_h.min(column_h).max(AUTOTILE_AREA_H.min(column_h));
        (AUTOTILE_AREA_W + columns * tileset.width, height)
    }

    pub(crate) fn on_geometry_change(&mut self, geometry: &Geometry) {
        self.geometry = *geometry;
        self.update_region();
    }

    fn update_region(&mut self) {
        let vis = self.geometry.visible_rect();
        let x0 = vis.x().saturating_add(self.ox).div_euclid(TILE_SIZE);
        let y0 = vis.y().saturating_add(self.oy).div_euclid(TILE_SIZE);
        let w = vis.width().max(0).saturating_add(TILE_SIZE - 1) / TILE_SIZE + 1;
        let h = vis.height().max(0).saturating_add(TILE_SIZE - 1) / TILE_SIZE + 1;
        self.region = Rect::new(x0, y0, w, h);
    }

    fn rebuild_atlas<B: TextureBackend>(
        &mut self,
        tileset: BitmapRef,
        pool: &mut TexPool<B>,
    ) -> Result<TexFbo, ResourceLimitError> {
        if let Some(old) = self.atlas.take() {
            pool.release(old);
        }
        let (w, h) = Self::atlas_size(tileset, pool.max_texture_size());
        let atlas = pool.request(w, h)?;
        log::debug!("tilemap atlas {w}x{h} for tileset {:?}", tileset.id);
        self.atlas = Some(atlas);
        self.atlas_stale = false;
        Ok(atlas)
    }

    pub(crate) fn draw<B: TextureBackend>(
        &mut self,
        element: ElementId,
        pool: &mut TexPool<B>,
        out: &mut DrawList,
    ) -> Result<(), ResourceLimitError> {
        let Some(tileset) = self.tileset else {
            return Ok(());
        };
        if self.map_data.is_none() {
            return Ok(());
        }

        let (atlas, atlas_rebuilt) = match self.atlas {
            Some(atlas) if !self.atlas_stale => (atlas, false),
            _ => (self.rebuild_atlas(tileset, pool)?, true),
        };

        let map_changed = self.map_watch.changed(revision_of(&self.map_data));
        let priorities_changed = self.priority_watch.changed(revision_of(&self.priorities));
        let flash_dirty = self.flash_watch.changed(revision_of(&self.flash_data));

        let (dx, dy) = self.geometry.screen_offset();
        out.push(DrawCmd::Tilemap(TilemapCmd {
            element,
            atlas,
            atlas_rebuilt,
            layers_dirty: atlas_rebuilt || map_changed || priorities_changed,
            flash_dirty,
            region: self.region,
            origin: (
                (self.region.x() * TILE_SIZE)
                    .saturating_sub(self.ox)
                    .saturating_add(dx),
                (self.region.y() * TILE_SIZE)
                    .saturating_sub(self.oy)
                    .saturating_add(dy),
            ),
        }));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{RecordingBackend, TexPoolConfig};
    use crate::scene::drawable::BitmapId;

    fn id() -> ElementId {
        ElementId {
            idx: 2,
            generation: 0,
        }
    }

    fn pool() -> TexPool<RecordingBackend> {
        TexPool::new(RecordingBackend::new(2048), TexPoolConfig::default())
    }

    fn ready_tilemap() -> Tilemap {
        let mut t = Tilemap::new();
        t.set_tileset(Some(BitmapRef::new(BitmapId(1), 256, 512)));
        t.set_map_data(Some(Table::new(20, 15, 3)));
        t.on_geometry_change(&Geometry::new(Rect::new(0, 0, 640, 480), 0, 0));
        t
    }

    fn last_cmd(out: &DrawList) -> TilemapCmd {
        match &out.items().last().unwrap().cmd {
            DrawCmd::Tilemap(cmd) => cmd.clone(),
            other => panic!("expected tilemap, got {other:?}"),
        }
    }

    // ── atlas ─────────────────────────────────────────────────────────────

    #[test]
    fn atlas_size_wraps_tall_tilesets() {
        let small = BitmapRef::new(BitmapId(0), 256, 512);
        assert_eq!(Tilemap::atlas_size(small, 2048), (384 + 256, 896));

        let tall = BitmapRef::new(BitmapId(0), 256, 5000);
        assert_eq!(Tilemap::atlas_size(tall, 2048), (384 + 3 * 256, 2048));
    }

    #[test]
    fn atlas_is_requested_once_and_rebuilt_on_tileset_change() {
        let mut pool = pool();
        let mut t = ready_tilemap();
        let mut out = DrawList::new();

        t.draw(id(), &mut pool, &mut out).unwrap();
        t.draw(id(), &mut pool, &mut out).unwrap();
        assert_eq!(pool.backend().created(), 1);
        assert!(last_cmd(&out).atlas.fbo.0 != 0);
        assert!(!last_cmd(&out).atlas_rebuilt);

        let first = t.atlas().unwrap();
        t.set_tileset(Some(BitmapRef::new(BitmapId(2), 256, 512)));
        t.draw(id(), &mut pool, &mut out).unwrap();
        // Same size class: the released atlas comes straight back.
        assert_eq!(t.atlas(), Some(first));
        assert!(last_cmd(&out).atlas_rebuilt);
        assert_eq!(pool.stats().hits, 1);
    }

    #[test]
    fn oversized_atlas_fails() {
        let mut pool = TexPool::new(RecordingBackend::new(512), TexPoolConfig::default());
        let mut t = ready_tilemap();
        let mut out = DrawList::new();
        let err = t.draw(id(), &mut pool, &mut out).unwrap_err();
        assert!(matches!(err, ResourceLimitError::TextureTooLarge { .. }));
        assert!(out.is_empty());
    }

    // ── change detection ──────────────────────────────────────────────────

    #[test]
    fn map_edits_mark_layers_dirty_once() {
        let mut pool = pool();
        let mut t = ready_tilemap();
        let mut out = DrawList::new();

        t.draw(id(), &mut pool, &mut out).unwrap();
        assert!(last_cmd(&out).layers_dirty);
        t.draw(id(), &mut pool, &mut out).unwrap();
        assert!(!last_cmd(&out).layers_dirty);

        t.map_data_mut().unwrap().set(1, 1, 0, 48);
        t.draw(id(), &mut pool, &mut out).unwrap();
        assert!(last_cmd(&out).layers_dirty);

        t.set_map_data(Some(Table::new(20, 15, 3)));
        t.draw(id(), &mut pool, &mut out).unwrap();
        assert!(last_cmd(&out).layers_dirty);
    }

    #[test]
    fn no_map_data_draws_nothing() {
        let mut pool = pool();
        let mut t = ready_tilemap();
        t.set_map_data(None);
        let mut out = DrawList::new();
        t.draw(id(), &mut pool, &mut out).unwrap();
        assert!(out.is_empty());
        assert_eq!(pool.backend().created(), 0);
    }

    // ── region ────────────────────────────────────────────────────────────

    #[test]
    fn region_follows_scroll() {
        let mut t = ready_tilemap();
        assert_eq!(t.visible_region(), Rect::new(0, 0, 21, 16));
        t.set_origin(40, -10);
        assert_eq!(t.visible_region(), Rect::new(1, -1, 21, 16));
    }
}
