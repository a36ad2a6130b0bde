// ─────────────────────────────────────────────────────────────────────
// Ontoguard — Embedding Cache
// ─────────────────────────────────────────────────────────────────────
//! Memoized text → vector lookups against the embedding collaborator.
//!
//! The reference text is embedded once per session and reused every
//! turn, so this is the only state shared across concurrent turns. It
//! is an explicit injected service, never a module-level singleton:
//! isolated test instances coexist freely.
//!
//! Concurrency contract: reads take a shared lock and never block each
//! other once an entry exists. Concurrent misses on the same key may
//! both call the provider; the embedding is deterministic for
//! identical input, so the first insert wins and the duplicate result
//! is discarded.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use ontoguard_types::OntoguardResult;

use crate::providers::EmbeddingProvider;

/// Cache introspection for diagnostics.
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub size: usize,
    pub keys: Vec<String>,
}

/// Text-keyed embedding cache over an embedding provider.
///
/// Keys are exact text; no normalization is applied. Provider failures
/// propagate and are never stored; a later retry of the same key goes
/// back to the provider.
pub struct EmbeddingCache {
    provider: Arc<dyn EmbeddingProvider>,
    entries: RwLock<HashMap<String, Arc<Vec<f64>>>>,
    enabled: bool,
}

impl EmbeddingCache {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, enabled: bool) -> Self {
        Self {
            provider,
            entries: RwLock::new(HashMap::new()),
            enabled,
        }
    }

    /// Return the embedding for `text`, computing and storing it on a
    /// miss. A hit is indistinguishable in value from a fresh call.
    pub fn get(&self, text: &str) -> OntoguardResult<Arc<Vec<f64>>> {
        if !self.enabled {
            return Ok(Arc::new(self.provider.embed(text)?));
        }

        if let Some(hit) = self.entries.read().get(text) {
            return Ok(Arc::clone(hit));
        }

        // Miss: compute outside any lock (the provider may be slow),
        // then insert-if-absent so a racing turn's entry is reused.
        let fresh = Arc::new(self.provider.embed(text)?);
        let mut entries = self.entries.write();
        let entry = entries
            .entry(text.to_string())
            .or_insert_with(|| Arc::clone(&fresh));
        Ok(Arc::clone(entry))
    }

    /// Eagerly compute and store `text`'s embedding. Used once at
    /// session start for the reference text.
    pub fn preload(&self, text: &str) -> OntoguardResult<()> {
        self.get(text).map(|_| ())
    }

    pub fn stats(&self) -> CacheStats {
        let entries = self.entries.read();
        CacheStats {
            size: entries.len(),
            keys: entries.keys().cloned().collect(),
        }
    }

    /// Full invalidation.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Uncached pass-through to the provider, for per-turn candidate
    /// texts that would only pollute the cache.
    pub fn embed_uncached(&self, text: &str) -> OntoguardResult<Vec<f64>> {
        self.provider.embed(text)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::providers::ExternalEmbedding;
    use ontoguard_types::OntoguardError;

    fn counting_provider(calls: Arc<AtomicUsize>) -> Arc<dyn EmbeddingProvider> {
        Arc::new(ExternalEmbedding::new(move |text| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![text.len() as f64, 1.0])
        }))
    }

    #[test]
    fn test_second_get_is_a_hit() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = EmbeddingCache::new(counting_provider(Arc::clone(&calls)), true);

        let first = cache.get("reference text").unwrap();
        let second = cache.get("reference text").unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_distinct_keys_computed_separately() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = EmbeddingCache::new(counting_provider(Arc::clone(&calls)), true);

        cache.get("text one").unwrap();
        cache.get("text two").unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.stats().size, 2);
    }

    #[test]
    fn test_exact_key_no_normalization() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = EmbeddingCache::new(counting_provider(Arc::clone(&calls)), true);

        cache.get("Text").unwrap();
        cache.get("text").unwrap();
        cache.get("text ").unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_preload_then_hit() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = EmbeddingCache::new(counting_provider(Arc::clone(&calls)), true);

        cache.preload("Purpose: assist. Limits: none. Ethics: care.").unwrap();
        cache.get("Purpose: assist. Limits: none. Ethics: care.").unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failure_not_cached() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_inner = Arc::clone(&calls);
        let provider = Arc::new(ExternalEmbedding::new(move |text| {
            let n = calls_inner.fetch_add(1, Ordering::SeqCst);
            if n == 0 {
                Err(OntoguardError::Embedding("transient".into()))
            } else {
                Ok(vec![text.len() as f64])
            }
        }));
        let cache = EmbeddingCache::new(provider, true);

        assert!(cache.get("key").is_err());
        assert_eq!(cache.stats().size, 0);

        // Retry goes back to the provider and succeeds.
        assert!(cache.get("key").is_ok());
        assert_eq!(cache.stats().size, 1);
    }

    #[test]
    fn test_clear_invalidates() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = EmbeddingCache::new(counting_provider(Arc::clone(&calls)), true);

        cache.get("a").unwrap();
        cache.clear();
        assert_eq!(cache.stats().size, 0);

        cache.get("a").unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_disabled_cache_always_misses() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = EmbeddingCache::new(counting_provider(Arc::clone(&calls)), false);

        let a = cache.get("same").unwrap();
        let b = cache.get("same").unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(*a, *b); // values still identical
        assert_eq!(cache.stats().size, 0);
    }

    #[test]
    fn test_stats_keys() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = EmbeddingCache::new(counting_provider(calls), true);

        cache.get("alpha").unwrap();
        let stats = cache.stats();
        assert_eq!(stats.size, 1);
        assert_eq!(stats.keys, vec!["alpha".to_string()]);
    }

    #[test]
    fn test_concurrent_gets_share_one_entry() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = Arc::new(EmbeddingCache::new(counting_provider(Arc::clone(&calls)), true));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || cache.get("shared reference").unwrap())
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        // Racing misses may compute more than once, but exactly one
        // entry survives and later reads are hits.
        assert_eq!(cache.stats().size, 1);
        let before = calls.load(Ordering::SeqCst);
        cache.get("shared reference").unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), before);
    }
}
