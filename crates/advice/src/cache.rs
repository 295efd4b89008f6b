//! Bounded response cache for advice text.
//!
//! Modeled explicitly (keyed, bounded, invalidate-able) rather than as
//! hidden state on the prompter: the cache key is (area, score decile), so
//! small score jitter within a band reuses the same advice.

use std::collections::{HashMap, VecDeque};

use anyhow::Result;
use parking_lot::Mutex;
use tracing::debug;

use learnscope_model::{DifficultyLevel, KnowledgeArea};

use crate::AdvicePrompter;

/// Default number of cached entries.
pub const DEFAULT_CAPACITY: usize = 64;

type CacheKey = (KnowledgeArea, u8);

/// Bounded map from (area, score decile) to advice text.
///
/// Eviction is oldest-insertion-first once capacity is reached.
#[derive(Debug)]
pub struct AdviceCache {
    capacity: usize,
    inner: Mutex<CacheInner>,
}

#[derive(Debug, Default)]
struct CacheInner {
    entries: HashMap<CacheKey, String>,
    order: VecDeque<CacheKey>,
}

impl AdviceCache {
    /// Create a cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            inner: Mutex::new(CacheInner::default()),
        }
    }

    /// Cached advice for an area/score, if present.
    pub fn get(&self, area: KnowledgeArea, score: f64) -> Option<String> {
        let key = cache_key(area, score);
        self.inner.lock().entries.get(&key).cloned()
    }

    /// Store advice for an area/score, evicting the oldest entry at capacity.
    pub fn put(&self, area: KnowledgeArea, score: f64, advice: String) {
        let key = cache_key(area, score);
        let mut inner = self.inner.lock();
        if inner.entries.insert(key, advice).is_none() {
            inner.order.push_back(key);
            if inner.order.len() > self.capacity {
                if let Some(oldest) = inner.order.pop_front() {
                    inner.entries.remove(&oldest);
                }
            }
        }
    }

    /// Drop every cached entry.
    pub fn invalidate(&self) {
        let mut inner = self.inner.lock();
        inner.entries.clear();
        inner.order.clear();
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for AdviceCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// Score decile in 0..=9; scores share advice within a band.
fn cache_key(area: KnowledgeArea, score: f64) -> CacheKey {
    let decile = ((score.clamp(0.0, 1.0) * 10.0).floor() as u8).min(9);
    (area, decile)
}

/// An [`AdvicePrompter`] that caches successful advice responses.
///
/// Only `advice_for` is cached; failures are never cached, so a recovering
/// collaborator is retried on the next call.
pub struct CachedPrompter<P> {
    inner: P,
    cache: AdviceCache,
}

impl<P> CachedPrompter<P> {
    /// Wrap a prompter with a default-capacity cache.
    pub fn new(inner: P) -> Self {
        Self::with_cache(inner, AdviceCache::default())
    }

    /// Wrap a prompter with an explicit cache.
    pub fn with_cache(inner: P, cache: AdviceCache) -> Self {
        Self { inner, cache }
    }

    /// Access the cache, e.g. to invalidate after a model change.
    pub fn cache(&self) -> &AdviceCache {
        &self.cache
    }
}

impl<P: AdvicePrompter> AdvicePrompter for CachedPrompter<P> {
    fn advice_for(&self, area: KnowledgeArea, score: f64) -> Result<String> {
        if let Some(cached) = self.cache.get(area, score) {
            debug!(area = %area, score, "advice cache hit");
            return Ok(cached);
        }
        let advice = self.inner.advice_for(area, score)?;
        self.cache.put(area, score, advice.clone());
        Ok(advice)
    }

    fn explain(&self, concept: &str, level: DifficultyLevel) -> Result<String> {
        self.inner.explain(concept, level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingPrompter {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingPrompter {
        fn new(fail: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail,
            }
        }
    }

    impl AdvicePrompter for CountingPrompter {
        fn advice_for(&self, area: KnowledgeArea, _score: f64) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(anyhow!("unavailable"))
            } else {
                Ok(format!("advice for {area}"))
            }
        }

        fn explain(&self, concept: &str, _level: DifficultyLevel) -> Result<String> {
            Ok(concept.to_string())
        }
    }

    #[test]
    fn test_same_decile_hits_cache() {
        let prompter = CachedPrompter::new(CountingPrompter::new(false));
        prompter.advice_for(KnowledgeArea::Gans, 0.51).unwrap();
        prompter.advice_for(KnowledgeArea::Gans, 0.59).unwrap();
        assert_eq!(prompter.inner.calls.load(Ordering::SeqCst), 1);
        assert_eq!(prompter.cache().len(), 1);
    }

    #[test]
    fn test_different_decile_misses() {
        let prompter = CachedPrompter::new(CountingPrompter::new(false));
        prompter.advice_for(KnowledgeArea::Gans, 0.51).unwrap();
        prompter.advice_for(KnowledgeArea::Gans, 0.61).unwrap();
        assert_eq!(prompter.inner.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_failures_are_not_cached() {
        let prompter = CachedPrompter::new(CountingPrompter::new(true));
        assert!(prompter.advice_for(KnowledgeArea::Gans, 0.5).is_err());
        assert!(prompter.advice_for(KnowledgeArea::Gans, 0.5).is_err());
        assert_eq!(prompter.inner.calls.load(Ordering::SeqCst), 2);
        assert!(prompter.cache().is_empty());
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let cache = AdviceCache::new(2);
        cache.put(KnowledgeArea::Gans, 0.1, "a".into());
        cache.put(KnowledgeArea::Gans, 0.3, "b".into());
        cache.put(KnowledgeArea::Gans, 0.5, "c".into());
        assert_eq!(cache.len(), 2);
        assert!(cache.get(KnowledgeArea::Gans, 0.1).is_none());
        assert_eq!(cache.get(KnowledgeArea::Gans, 0.5).as_deref(), Some("c"));
    }

    #[test]
    fn test_invalidate() {
        let cache = AdviceCache::new(4);
        cache.put(KnowledgeArea::Pytorch, 0.5, "a".into());
        cache.invalidate();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_score_one_maps_to_top_decile() {
        let cache = AdviceCache::new(4);
        cache.put(KnowledgeArea::Pytorch, 1.0, "top".into());
        assert_eq!(cache.get(KnowledgeArea::Pytorch, 0.95).as_deref(), Some("top"));
    }
}
