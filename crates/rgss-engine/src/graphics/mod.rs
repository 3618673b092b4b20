//! The `Graphics` context: screen scene, texture pool and frame loop.
//!
//! Mirrors what scripts see as the `Graphics` module. One instance owns every
//! element created through it; handles stay valid until `dispose`.

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::pool::{TexPool, TextureBackend};
use crate::render::DrawList;
use crate::scene::drawable::{Drawable, Plane, Sprite, Tilemap, Window};
use crate::scene::{self, ElementId, Geometry, GraphCtx, SceneGraph, SceneId};
use crate::time::{FrameClock, FrameTime};
use crate::value::Rect;

pub struct Graphics<B: TextureBackend> {
    config: EngineConfig,
    graph: SceneGraph,
    screen: SceneId,
    pool: TexPool<B>,
    draw_list: DrawList,
    clock: FrameClock,
    frame_count: u64,
    shut_down: bool,
}

fn screen_geometry(width: u32, height: u32) -> Geometry {
    Geometry::new(Rect::new(0, 0, width as i32, height as i32), 0, 0)
}

impl<B: TextureBackend> Graphics<B> {
    pub fn new(config: EngineConfig, backend: B) -> Self {
        let mut graph = SceneGraph::new(GraphCtx::new(config.tie_break()));
        let screen = graph.create_scene(screen_geometry(config.screen_width, config.screen_height));
        let pool = TexPool::new(backend, config.pool_config());
        let clock = FrameClock::new(config.frame_rate, config.fixed_frame_rate);

        log::info!(
            "graphics: {:?}, {}x{} at {} fps ({}), pool budget {} bytes",
            config.rgss_version,
            config.screen_width,
            config.screen_height,
            config.frame_rate,
            if config.fixed_frame_rate { "fixed" } else { "variable" },
            config.texture_pool_budget
        );

        Self {
            config,
            graph,
            screen,
            pool,
            draw_list: DrawList::new(),
            clock,
            frame_count: 0,
            shut_down: false,
        }
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[inline]
    pub fn screen(&self) -> SceneId {
        self.screen
    }

    #[inline]
    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    #[inline]
    pub fn graph_mut(&mut self) -> &mut SceneGraph {
        &mut self.graph
    }

    #[inline]
    pub fn pool(&self) -> &TexPool<B> {
        &self.pool
    }

    #[inline]
    pub fn pool_mut(&mut self) -> &mut TexPool<B> {
        &mut self.pool
    }

    /// Commands recorded by the last [`update`](Self::update).
    #[inline]
    pub fn draw_list(&self) -> &DrawList {
        &self.draw_list
    }

    // ── elements ──────────────────────────────────────────────────────────

    /// Scene for new elements: the viewport's child scene, or the screen.
    fn target_scene(&self, viewport: Option<ElementId>) -> SceneId {
        viewport
            .and_then(|v| self.graph.viewport_scene(v))
            .unwrap_or(self.screen)
    }

    fn create(&mut self, drawable: impl Into<Drawable>, viewport: Option<ElementId>) -> ElementId {
        let scene = self.target_scene(viewport);
        self.graph.spawn(drawable, Some(scene))
    }

    pub fn create_sprite(&mut self, viewport: Option<ElementId>) -> ElementId {
        self.create(Sprite::new(), viewport)
    }

    pub fn create_plane(&mut self, viewport: Option<ElementId>) -> ElementId {
        self.create(Plane::new(), viewport)
    }

    pub fn create_window(&mut self, viewport: Option<ElementId>) -> ElementId {
        self.create(Window::new(), viewport)
    }

    pub fn create_tilemap(&mut self, viewport: Option<ElementId>) -> ElementId {
        self.create(Tilemap::new(), viewport)
    }

    pub fn create_viewport(&mut self, rect: Rect) -> ElementId {
        self.graph.spawn_viewport(rect, Some(self.screen))
    }

    /// Frees an element and returns its pooled resources. Stale handles are ignored.
    pub fn dispose(&mut self, id: ElementId) {
        if let Some(Drawable::Tilemap(mut t)) = self.graph.dispose(id) {
            if let Some(atlas) = t.take_atlas() {
                self.pool.release(atlas);
            }
        }
    }

    // ── frame loop ────────────────────────────────────────────────────────

    /// Composites the screen into the draw list and advances the clock.
    ///
    /// Offscreen targets held by the previous frame's list go back to the pool
    /// first. In fixed-rate mode the caller sleeps for the returned `wait`.
    pub fn update(&mut self) -> Result<FrameTime, EngineError> {
        self.return_targets();
        self.draw_list.clear();
        scene::composite(&mut self.graph, self.screen, &mut self.pool, &mut self.draw_list)?;
        self.frame_count += 1;
        Ok(self.clock.tick())
    }

    fn return_targets(&mut self) {
        for target in self.draw_list.take_targets() {
            self.pool.release(target);
        }
    }

    #[inline]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    pub fn set_frame_count(&mut self, count: u64) {
        self.frame_count = count;
    }

    #[inline]
    pub fn frame_rate(&self) -> u32 {
        self.config.frame_rate
    }

    pub fn set_frame_rate(&mut self, frame_rate: u32) {
        let frame_rate = frame_rate.clamp(1, 120);
        self.config.frame_rate = frame_rate;
        self.clock.set_frame_rate(frame_rate);
    }

    /// Forgets elapsed time so the next frame does not try to catch up.
    pub fn frame_reset(&mut self) {
        self.clock.reset();
    }

    pub fn resize_screen(&mut self, width: u32, height: u32) {
        self.config.screen_width = width;
        self.config.screen_height = height;
        self.graph
            .set_geometry(self.screen, screen_geometry(width, height));
        log::debug!("screen resized to {width}x{height}");
    }

    /// Tears down pooled resources. Idempotent; also runs on drop.
    ///
    /// The pool is disabled first, so every surface handed back from here on
    /// is destroyed instead of cached.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        self.pool.disable();
        self.return_targets();
        for atlas in self.graph.take_atlases() {
            self.pool.release(atlas);
        }
        self.pool.clear();
        log::info!("graphics shut down after {} frames", self.frame_count);
    }
}

impl<B: TextureBackend> Drop for Graphics<B> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
