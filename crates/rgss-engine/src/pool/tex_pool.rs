use std::collections::{HashMap, VecDeque};

use crate::error::ResourceLimitError;
use crate::list::{Links, List, NodeId};

use super::texfbo::{TexFbo, TextureBackend};

/// Pool configuration.
#[derive(Debug, Clone, Copy)]
pub struct TexPoolConfig {
    /// Maximum bytes retained across all size classes (4 bytes per pixel).
    pub budget_bytes: usize,
}

impl Default for TexPoolConfig {
    fn default() -> Self {
        Self {
            budget_bytes: 20_000_000,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub struct TexPoolStats {
    /// Objects currently checked in.
    pub cached_objects: usize,
    /// Bytes currently checked in.
    pub cached_bytes: usize,
    /// Backend allocations performed on cache misses.
    pub allocations: u64,
    pub hits: u64,
    pub evictions: u64,
    /// Releases that destroyed the object instead of caching it.
    pub destroyed_on_release: u64,
}

/// Bucket key: exact pixel dimensions, no rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct SizeClass {
    width: u32,
    height: u32,
}

impl SizeClass {
    #[inline]
    fn of(t: &TexFbo) -> Self {
        Self {
            width: t.width,
            height: t.height,
        }
    }
}

/// Budgeted cache of released texture/framebuffer pairs.
///
/// - `request` pops the most recently released object of the exact size, or
///   allocates a fresh one (checked out, not cached)
/// - `release` checks an object in, first evicting the globally
///   least-recently-released objects until it fits the budget
///
/// Recency is a single queue across all size classes. Within a size class the
/// bucket is ordered oldest-to-newest, so the globally oldest entry is always
/// at the front of its bucket.
pub struct TexPool<B: TextureBackend> {
    backend: B,
    config: TexPoolConfig,
    stats: TexPoolStats,
    disabled: bool,

    // Head = most recently released, tail = eviction candidate.
    links: Links<TexFbo>,
    recency: List,
    buckets: HashMap<SizeClass, VecDeque<NodeId>>,
}

impl<B: TextureBackend> TexPool<B> {
    pub fn new(backend: B, config: TexPoolConfig) -> Self {
        let mut links = Links::new();
        let recency = links.new_list();
        Self {
            backend,
            config,
            stats: TexPoolStats::default(),
            disabled: false,
            links,
            recency,
            buckets: HashMap::new(),
        }
    }

    #[inline]
    pub fn stats(&self) -> TexPoolStats {
        self.stats
    }

    #[inline]
    pub fn config(&self) -> TexPoolConfig {
        self.config
    }

    #[inline]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[inline]
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    #[inline]
    pub fn max_texture_size(&self) -> u32 {
        self.backend.max_texture_size()
    }

    #[inline]
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Checks out a `width`×`height` render target.
    ///
    /// Fails without touching the backend if either dimension exceeds the
    /// hardware texture size.
    pub fn request(&mut self, width: u32, height: u32) -> Result<TexFbo, ResourceLimitError> {
        if let Some(t) = self.take_cached(SizeClass { width, height }) {
            self.stats.hits += 1;
            log::trace!("texpool hit {t:?}");
            return Ok(t);
        }

        let max = self.backend.max_texture_size();
        if width > max || height > max {
            log::warn!("texpool: refusing {width}x{height} texture (hardware limit {max})");
            return Err(ResourceLimitError::TextureTooLarge { width, height, max });
        }

        let t = self.backend.create_texfbo(width, height);
        self.stats.allocations += 1;
        log::debug!("texpool miss: allocated {t:?}");
        Ok(t)
    }

    /// Checks a render target back in (or destroys it, see type docs).
    pub fn release(&mut self, t: TexFbo) {
        if t.is_null() {
            self.backend.destroy_texfbo(t);
            return;
        }

        if self.disabled {
            self.destroy_now(t);
            return;
        }

        let cost = t.byte_cost();
        if cost > self.config.budget_bytes {
            log::debug!("texpool: {t:?} exceeds the whole budget, destroying");
            self.destroy_now(t);
            return;
        }

        while self.stats.cached_bytes + cost > self.config.budget_bytes {
            if !self.evict_oldest() {
                break;
            }
        }

        let node = self.links.alloc(t);
        self.links.prepend(self.recency, node);
        self.buckets
            .entry(SizeClass::of(&t))
            .or_default()
            .push_back(node);
        self.stats.cached_objects += 1;
        self.stats.cached_bytes += cost;
    }

    /// Stops caching. Every later `release` destroys its object immediately.
    ///
    /// One-way; used while tearing down so nothing is parked in a pool that
    /// will never be drained.
    pub fn disable(&mut self) {
        if !self.disabled {
            log::info!(
                "texpool disabled ({} objects, {} bytes still cached)",
                self.stats.cached_objects,
                self.stats.cached_bytes
            );
        }
        self.disabled = true;
    }

    /// Destroys every cached object.
    pub fn clear(&mut self) {
        let mut n = 0usize;
        while let Some(t) = self.unlink_oldest() {
            self.backend.destroy_texfbo(t);
            n += 1;
        }
        if n > 0 {
            log::debug!("texpool cleared {n} cached objects");
        }
    }

    fn destroy_now(&mut self, t: TexFbo) {
        self.backend.destroy_texfbo(t);
        self.stats.destroyed_on_release += 1;
    }

    fn take_cached(&mut self, key: SizeClass) -> Option<TexFbo> {
        let bucket = self.buckets.get_mut(&key)?;
        let node = bucket.pop_back()?;
        if bucket.is_empty() {
            self.buckets.remove(&key);
        }
        let t = self.links.owner(node)?;
        self.links.remove(self.recency, node);
        self.links.release(node);

        self.stats.cached_objects -= 1;
        self.stats.cached_bytes -= t.byte_cost();
        Some(t)
    }

    fn unlink_oldest(&mut self) -> Option<TexFbo> {
        let node = self.links.last(self.recency)?;
        let t = self.links.owner(node)?;
        let key = SizeClass::of(&t);

        if let Some(bucket) = self.buckets.get_mut(&key) {
            if bucket.front() == Some(&node) {
                bucket.pop_front();
            } else {
                bucket.retain(|&n| n != node);
            }
            if bucket.is_empty() {
                self.buckets.remove(&key);
            }
        }
        self.links.remove(self.recency, node);
        self.links.release(node);

        self.stats.cached_objects -= 1;
        self.stats.cached_bytes -= t.byte_cost();
        Some(t)
    }

    fn evict_oldest(&mut self) -> bool {
        match self.unlink_oldest() {
            Some(t) => {
                log::debug!("texpool evicted {t:?}");
                self.backend.destroy_texfbo(t);
                self.stats.evictions += 1;
                true
            }
            None => false,
        }
    }
}

impl<B: TextureBackend> Drop for TexPool<B> {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{BackendCall, RecordingBackend};

    const COST_8: usize = 8 * 8 * 4;

    fn pool(budget_bytes: usize) -> TexPool<RecordingBackend> {
        TexPool::new(RecordingBackend::new(4096), TexPoolConfig { budget_bytes })
    }

    // ── request / release ─────────────────────────────────────────────────

    #[test]
    fn release_then_request_hits() {
        let mut p = pool(1 << 20);
        let a = p.request(8, 8).unwrap();
        p.release(a);
        let b = p.request(8, 8).unwrap();
        assert_eq!(a, b);
        assert_eq!(p.backend().created(), 1);
        assert_eq!(p.stats().hits, 1);
        assert_eq!(p.stats().cached_objects, 0);
        assert_eq!(p.stats().cached_bytes, 0);
    }

    #[test]
    fn new_objects_are_checked_out() {
        let mut p = pool(1 << 20);
        let _a = p.request(8, 8).unwrap();
        assert_eq!(p.stats().cached_objects, 0);
        assert_eq!(p.stats().allocations, 1);
    }

    #[test]
    fn size_classes_are_exact() {
        let mut p = pool(1 << 20);
        let a = p.request(8, 8).unwrap();
        p.release(a);
        let b = p.request(8, 9).unwrap();
        assert_ne!(a, b);
        assert_eq!(p.stats().cached_objects, 1);
    }

    #[test]
    fn bucket_is_lifo() {
        let mut p = pool(1 << 20);
        let a = p.request(8, 8).unwrap();
        let b = p.request(8, 8).unwrap();
        p.release(a);
        p.release(b);
        assert_eq!(p.request(8, 8).unwrap(), b);
        assert_eq!(p.request(8, 8).unwrap(), a);
    }

    // ── budget ────────────────────────────────────────────────────────────

    #[test]
    fn eviction_keeps_cache_within_budget() {
        let mut p = pool(2 * COST_8);
        let t: Vec<_> = (0..3).map(|_| p.request(8, 8).unwrap()).collect();
        for &x in &t {
            p.release(x);
            assert!(p.stats().cached_bytes <= 2 * COST_8);
        }
        assert_eq!(p.stats().cached_objects, 2);
        assert_eq!(p.stats().evictions, 1);
        assert_eq!(p.backend().destroyed(), vec![t[0]]);
    }

    #[test]
    fn eviction_order_spans_size_classes() {
        let mut p = pool(COST_8 + 4 * 4 * 4);
        let big = p.request(8, 8).unwrap();
        let small = p.request(4, 4).unwrap();
        let small2 = p.request(4, 4).unwrap();
        p.release(big);
        p.release(small);
        // Admitting another 4x4 must evict the older 8x8, not the 4x4.
        p.release(small2);
        assert_eq!(p.backend().destroyed(), vec![big]);
        assert_eq!(p.request(4, 4).unwrap(), small2);
        assert_eq!(p.request(4, 4).unwrap(), small);
    }

    #[test]
    fn oversized_release_is_destroyed() {
        let mut p = pool(COST_8 - 1);
        let a = p.request(8, 8).unwrap();
        p.release(a);
        assert_eq!(p.stats().cached_objects, 0);
        assert_eq!(p.stats().destroyed_on_release, 1);
        assert_eq!(p.backend().destroyed(), vec![a]);
    }

    // ── limits ────────────────────────────────────────────────────────────

    #[test]
    fn request_beyond_hardware_limit_fails_without_gpu_call() {
        let mut p = pool(1 << 20);
        let err = p.request(4097, 16).unwrap_err();
        assert_eq!(
            err,
            ResourceLimitError::TextureTooLarge {
                width: 4097,
                height: 16,
                max: 4096
            }
        );
        assert!(p.request(16, 5000).is_err());
        assert!(p.backend().calls().is_empty());
    }

    // ── disable / teardown ────────────────────────────────────────────────

    #[test]
    fn disabled_pool_destroys_on_release() {
        let mut p = pool(1 << 20);
        let a = p.request(8, 8).unwrap();
        p.release(a);
        let a = p.request(8, 8).unwrap();
        let before = p.stats();

        p.disable();
        p.release(a);

        assert_eq!(p.backend().destroyed(), vec![a]);
        assert_eq!(p.stats().cached_objects, before.cached_objects);
        assert_eq!(p.stats().cached_bytes, before.cached_bytes);
        assert!(p.is_disabled());
    }

    #[test]
    fn null_release_is_not_cached() {
        let mut p = pool(1 << 20);
        p.release(TexFbo::NULL);
        assert_eq!(p.stats().cached_objects, 0);
        assert!(p.backend().calls().is_empty());
    }

    #[test]
    fn clear_destroys_cached_objects() {
        let mut p = pool(1 << 20);
        let a = p.request(8, 8).unwrap();
        let b = p.request(2, 2).unwrap();
        p.release(a);
        p.release(b);
        p.clear();
        assert_eq!(p.stats().cached_objects, 0);
        assert_eq!(p.backend().live(), 0);
        assert!(p.backend().calls().contains(&BackendCall::Destroy(a)));
    }
}
