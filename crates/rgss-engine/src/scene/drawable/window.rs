use crate::render::{DrawCmd, DrawList};
use crate::scene::{ElementId, Geometry};
use crate::value::{Rect, Tone};

use super::{BitmapId, BitmapRef, clamp_u8};

/// Recorded window draw.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowCmd {
    pub element: ElementId,
    pub windowskin: Option<BitmapId>,
    pub contents: Option<BitmapId>,
    /// Frame rect in screen pixels, already shrunk vertically by openness.
    pub frame: Rect,
    /// Contents scroll.
    pub scroll: (i32, i32),
    pub opacity: u8,
    pub back_opacity: u8,
    pub contents_opacity: u8,
    /// Cursor rect relative to the contents area. Empty when hidden.
    pub cursor_rect: Rect,
    pub active: bool,
    pub pause: bool,
    pub tone: [f32; 4],
}

/// Windowskin frame with a scrollable contents bitmap.
#[derive(Debug, Clone)]
pub struct Window {
    pub windowskin: Option<BitmapRef>,
    pub contents: Option<BitmapRef>,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub ox: i32,
    pub oy: i32,
    opacity: u8,
    back_opacity: u8,
    contents_opacity: u8,
    openness: u8,
    pub cursor_rect: Rect,
    pub active: bool,
    pub pause: bool,
    pub tone: Tone,

    offset: (i32, i32),
}

impl Default for Window {
    fn default() -> Self {
        Self {
            windowskin: None,
            contents: None,
            x: 0,
            y: 0,
            width: 0,
            height: 0,
            ox: 0,
            oy: 0,
            opacity: 255,
            back_opacity: 192,
            contents_opacity: 255,
            openness: 255,
            cursor_rect: Rect::default(),
            active: true,
            pause: false,
            tone: Tone::default(),
            offset: (0, 0),
        }
    }
}

impl Window {
    /// Windows sit above map sprites unless told otherwise.
    pub const DEFAULT_Z: i32 = 100;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn opacity(&self) -> u8 {
        self.opacity
    }

    pub fn set_opacity(&mut self, v: i32) {
        self.opacity = clamp_u8(v);
    }

    pub fn back_opacity(&self) -> u8 {
        self.back_opacity
    }

    pub fn set_back_opacity(&mut self, v: i32) {
        self.back_opacity = clamp_u8(v);
    }

    pub fn contents_opacity(&self) -> u8 {
        self.contents_opacity
    }

    pub fn set_contents_opacity(&mut self, v: i32) {
        self.contents_opacity = clamp_u8(v);
    }

    pub fn openness(&self) -> u8 {
        self.openness
    }

    pub fn set_openness(&mut self, v: i32) {
        self.openness = clamp_u8(v);
    }

    pub fn is_open(&self) -> bool {
        self.openness == 255
    }

    pub fn is_closed(&self) -> bool {
        self.openness == 0
    }

    pub(crate) fn on_geometry_change(&mut self, geometry: &Geometry) {
        self.offset = geometry.screen_offset();
    }

    /// Frame rect in scene coordinates; opening windows grow from the middle.
    pub fn frame_rect(&self) -> Rect {
        let h = (i64::from(self.height) * i64::from(self.openness) / 255) as i32;
        let top = self.y.saturating_add(self.height.saturating_sub(h) / 2);
        Rect::new(self.x, top, self.width, h)
    }

    pub(crate) fn draw(&self, element: ElementId, out: &mut DrawList) {
        if self.openness == 0 || self.width <= 0 || self.height <= 0 {
            return;
        }
        let frame = self.frame_rect();
        if frame.is_empty() {
            return;
        }

        // Contents and cursor only show once fully open.
        let open = self.is_open();
        out.push(DrawCmd::Window(WindowCmd {
            element,
            windowskin: self.windowskin.map(|b| b.id),
            contents: self.contents.filter(|_| open).map(|b| b.id),
            frame: frame.translated(self.offset.0, self.offset.1),
            scroll: (self.ox, self.oy),
            opacity: self.opacity,
            back_opacity: self.back_opacity,
            contents_opacity: self.contents_opacity,
            cursor_rect: if open { self.cursor_rect } else { Rect::default() },
            active: self.active,
            pause: self.pause && open,
            tone: self.tone.normalized(),
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id() -> ElementId {
        ElementId {
            idx: 1,
            generation: 0,
        }
    }

    fn window(w: i32, h: i32) -> Window {
        let mut win = Window::new();
        win.width = w;
        win.height = h;
        win
    }

    #[test]
    fn closed_window_draws_nothing() {
        let mut win = window(100, 100);
        win.set_openness(0);
        let mut out = DrawList::new();
        win.draw(id(), &mut out);
        assert!(out.is_empty());
        assert!(win.is_closed());
    }

    #[test]
    fn half_open_window_is_centered_and_hides_contents() {
        let mut win = window(100, 100);
        win.contents = Some(BitmapRef::new(BitmapId(4), 68, 68));
        win.set_openness(128);
        win.on_geometry_change(&Geometry::new(Rect::new(0, 0, 640, 480), 0, 0));
        let mut out = DrawList::new();
        win.draw(id(), &mut out);
        let DrawCmd::Window(cmd) = &out.items()[0].cmd else {
            panic!("expected window");
        };
        assert_eq!(cmd.frame, Rect::new(0, 25, 100, 50));
        assert_eq!(cmd.contents, None);
    }

    #[test]
    fn opacity_setters_clamp() {
        let mut win = window(1, 1);
        win.set_back_opacity(1000);
        win.set_contents_opacity(-1);
        assert_eq!(win.back_opacity(), 255);
        assert_eq!(win.contents_opacity(), 0);
    }
}
