use super::texfbo::{FboId, TexFbo, TexId, TextureBackend};

/// One call observed by a [`RecordingBackend`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BackendCall {
    Create(TexFbo),
    Destroy(TexFbo),
}

/// CPU-only backend that hands out sequential ids and records every call.
///
/// Used by tests and by headless runs on machines without a GPU adapter.
#[derive(Debug)]
pub struct RecordingBackend {
    max_texture_size: u32,
    next_id: u32,
    calls: Vec<BackendCall>,
    live: usize,
}

impl RecordingBackend {
    pub fn new(max_texture_size: u32) -> Self {
        Self {
            max_texture_size,
            next_id: 1,
            calls: Vec::new(),
            live: 0,
        }
    }

    pub fn calls(&self) -> &[BackendCall] {
        &self.calls
    }

    pub fn created(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, BackendCall::Create(_)))
            .count()
    }

    pub fn destroyed(&self) -> Vec<TexFbo> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                BackendCall::Destroy(t) => Some(*t),
                BackendCall::Create(_) => None,
            })
            .collect()
    }

    /// Objects created and not yet destroyed.
    pub fn live(&self) -> usize {
        self.live
    }
}

impl TextureBackend for RecordingBackend {
    fn max_texture_size(&self) -> u32 {
        self.max_texture_size
    }

    fn create_texfbo(&mut self, width: u32, height: u32) -> TexFbo {
        let id = self.next_id;
        self.next_id += 1;
        let t = TexFbo {
            tex: TexId(id),
            fbo: FboId(id),
            width,
            height,
        };
        self.live += 1;
        self.calls.push(BackendCall::Create(t));
        t
    }

    fn destroy_texfbo(&mut self, texfbo: TexFbo) {
        if texfbo.is_null() {
            return;
        }
        self.live = self.live.saturating_sub(1);
        self.calls.push(BackendCall::Destroy(texfbo));
    }
}
