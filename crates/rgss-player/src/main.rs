use std::thread;

use anyhow::{Context, Result};
use clap::Parser;
use rgss_engine::device::{Gpu, GpuInit};
use rgss_engine::logging::{LoggingConfig, init_logging};
use rgss_engine::pool::{RecordingBackend, TextureBackend};
use rgss_engine::render::DrawCmd;
use rgss_engine::scene::drawable::{BitmapId, BitmapRef};
use rgss_engine::value::{Color, Rect, Table, Tone};
use rgss_engine::{EngineConfig, Graphics, RgssVersion};

#[derive(Parser, Debug)]
#[command(name = "rgss-player", version, about = "Runs a demo scene against rgss-engine")]
struct Cli {
    /// RGSS version to emulate (selects ordering, frame rate and resolution).
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..=3))]
    rgss: u32,

    /// Number of frames to composite before exiting.
    #[arg(long, default_value_t = 120)]
    frames: u64,

    /// Only accept a software adapter.
    #[arg(long)]
    software: bool,
}

/// A title-screen-like scene: map, a few sprites, a tinted viewport and a window.
fn build_demo<B: TextureBackend>(g: &mut Graphics<B>) {
    let (w, h) = (g.config().screen_width as i32, g.config().screen_height as i32);

    let map = g.create_tilemap(None);
    if let Some(t) = g.graph_mut().tilemap_mut(map) {
        t.set_tileset(Some(BitmapRef::new(BitmapId(1), 256, 1024)));
        let mut data = Table::new(20, 15, 3);
        for y in 0..15 {
            for x in 0..20 {
                data.set(x, y, 0, 384 + ((x + y) % 8) as i16);
            }
        }
        t.set_map_data(Some(data));
    }

    let hero_bitmap = BitmapRef::new(BitmapId(2), 32, 48);
    for i in 0..4 {
        let s = g.create_sprite(None);
        if let Some(sprite) = g.graph_mut().sprite_mut(s) {
            sprite.set_bitmap(Some(hero_bitmap));
            sprite.ox = 16;
            sprite.oy = 48;
        }
        g.graph_mut().move_sprite(s, 96 + i * 64, 200 - i * 24);
    }

    let vp = g.create_viewport(Rect::new(0, 0, w, h / 3));
    if let Some(v) = g.graph_mut().viewport_mut(vp) {
        v.tone = Tone::new(-34.0, -34.0, 0.0, 68.0);
    }
    let cloud = g.create_plane(Some(vp));
    if let Some(p) = g.graph_mut().plane_mut(cloud) {
        p.bitmap = Some(BitmapRef::new(BitmapId(3), 128, 128));
        p.set_opacity(160);
    }

    let win = g.create_window(None);
    if let Some(window) = g.graph_mut().window_mut(win) {
        window.windowskin = Some(BitmapRef::new(BitmapId(4), 128, 128));
        window.x = 0;
        window.y = h - 128;
        window.width = w;
        window.height = 128;
        window.set_openness(0);
    }

    // Flash the first sprite white once the scene is up.
    let first = g
        .graph()
        .members(g.screen())
        .find(|&id| g.graph().sprite(id).is_some());
    if let Some(sprite) = first.and_then(|id| g.graph_mut().sprite_mut(id)) {
        sprite.flash.start(Some(Color::rgb(255.0, 255.0, 255.0)), 20);
    }
}

fn run<B: TextureBackend>(mut g: Graphics<B>, frames: u64) -> Result<()> {
    build_demo(&mut g);

    let window = g
        .graph()
        .members(g.screen())
        .find(|&id| g.graph().window(id).is_some());

    for frame in 0..frames {
        // Open the message window over the first 16 frames.
        if let Some(win) = window {
            if let Some(w) = g.graph_mut().window_mut(win) {
                w.set_openness(((frame + 1) * 16).min(255) as i32);
            }
        }
        let ids: Vec<_> = g.graph().members(g.screen()).collect();
        for id in ids {
            if let Some(s) = g.graph_mut().sprite_mut(id) {
                s.update();
            }
        }

        let ft = g.update().context("composite failed")?;

        if frame % 30 == 0 {
            summarize(&g, frame);
        }
        if !ft.wait.is_zero() {
            thread::sleep(ft.wait);
        }
    }

    let stats = g.pool().stats();
    log::info!(
        "pool: {} allocations, {} hits, {} evictions, {} bytes cached",
        stats.allocations,
        stats.hits,
        stats.evictions,
        stats.cached_bytes
    );
    g.shutdown();
    Ok(())
}

fn summarize<B: TextureBackend>(g: &Graphics<B>, frame: u64) {
    let mut counts = [0usize; 5];
    for item in g.draw_list().items() {
        let slot = match item.cmd {
            DrawCmd::Sprite(_) => 0,
            DrawCmd::Plane(_) => 1,
            DrawCmd::Window(_) => 2,
            DrawCmd::Tilemap(_) => 3,
            DrawCmd::BeginOffscreen { .. } | DrawCmd::EndOffscreen { .. } => 4,
        };
        counts[slot] += 1;
    }
    log::info!(
        "frame {frame}: {} sprites, {} planes, {} windows, {} tilemaps, {} offscreen markers",
        counts[0],
        counts[1],
        counts[2],
        counts[3],
        counts[4]
    );
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let cli = Cli::parse();
    let version = RgssVersion::from_number(cli.rgss)
        .with_context(|| format!("unknown RGSS version {}", cli.rgss))?;
    let config = EngineConfig::for_version(version);
    let frames = cli.frames;

    let init = GpuInit {
        force_fallback_adapter: cli.software,
        ..GpuInit::default()
    };
    match Gpu::new_headless_blocking(init) {
        Ok(gpu) => run(Graphics::new(config, gpu.textures()), frames),
        Err(e) => {
            log::warn!("no GPU available ({e:#}); running against the recording backend");
            run(Graphics::new(config, RecordingBackend::new(8192)), frames)
        }
    }
}
