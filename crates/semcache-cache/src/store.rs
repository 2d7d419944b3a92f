use std::collections::HashMap;

use parking_lot::Mutex;
use semcache_core::{CacheConfig, CacheError, CacheStats, Entry, Metadata, Result};
use semcache_vector::topk;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use uuid::Uuid;

use crate::eviction::EvictionPolicy;
use crate::invalidate::InvalidationCriteria;

/// A successful lookup: the matching entry and the similarity score that
/// qualified it.
#[derive(Debug, Clone)]
pub struct Hit {
    pub entry: Entry,
    pub similarity: f64,
}

struct CacheInner {
    by_id: HashMap<String, Entry>,
    by_query: HashMap<String, String>,
    embeddings: Vec<(String, Vec<f64>)>,
    eviction: EvictionPolicy,
    stats: CacheStats,
}

impl CacheInner {
    fn remove_id(&mut self, id: &str) -> Option<Entry> {
        let entry = self.by_id.remove(id)?;
        if self.by_query.get(&entry.query).map(|v| v.as_str()) == Some(id) {
            self.by_query.remove(&entry.query);
        }
        self.embeddings.retain(|(eid, _)| eid != id);
        self.eviction.remove(id);
        Some(entry)
    }

    /// Purge every id the eviction policy reports as expired. Returns the
    /// number removed.
    fn sweep_expired(&mut self) -> usize {
        let expired = self.eviction.expired();
        for id in &expired {
            if self.remove_id(id).is_some() {
                debug!(id = %id, reason = "expired", "evicting entry");
            }
        }
        expired.len()
    }
}

/// The concurrent, bounded, semantically-indexed cache store.
///
/// All public operations acquire a single exclusive lock over a
/// [`CacheInner`] (per the specification's concurrency model: the simplest
/// correct implementation uses one exclusive lock for every call, rather
/// than fine-grained per-index sharding). Top-k scans dispatch to
/// `semcache_vector::topk`, which runs rayon-parallel above a size
/// threshold; that is purely an execution-strategy detail inside the held
/// lock and never changes ranking or tie-break order.
pub struct CacheStore {
    config: CacheConfig,
    inner: Mutex<CacheInner>,
}

impl CacheStore {
    /// Validate `config` (coercing or rejecting per `strict`) and build an
    /// empty store.
    pub fn new(config: CacheConfig, strict: bool) -> Result<Self> {
        let config = config.validate(strict)?;
        let eviction = EvictionPolicy::from_config(&config);
        tracing::info!(
            max_entries = config.max_entries,
            metric = ?config.similarity_metric,
            policy = ?config.eviction_policy,
            "cache store constructed"
        );
        Ok(Self {
            config,
            inner: Mutex::new(CacheInner {
                by_id: HashMap::new(),
                by_query: HashMap::new(),
                embeddings: Vec::new(),
                eviction,
                stats: CacheStats::default(),
            }),
        })
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    fn check_cancelled(token: &CancellationToken) -> Result<()> {
        if token.is_cancelled() {
            return Err(CacheError::Cancelled);
        }
        Ok(())
    }

    /// Insert a new entry, evicting a victim if capacity is exceeded.
    pub fn set(
        &self,
        query: String,
        response: String,
        embedding: Vec<f64>,
        metadata: Metadata,
        token: &CancellationToken,
    ) -> Result<Entry> {
        if embedding.is_empty() {
            return Err(CacheError::InvalidEmbedding(
                "embedding must be non-empty".into(),
            ));
        }
        Self::check_cancelled(token)?;

        let mut inner = self.inner.lock();
        inner.sweep_expired();

        // Duplicate query text: the prior entry is removed from every index
        // first, so it is not left discoverable only via embedding scan.
        if let Some(prior_id) = inner.by_query.get(&query).cloned() {
            inner.remove_id(&prior_id);
        }

        let id = Uuid::new_v4().to_string();
        let entry = Entry::new(id.clone(), query.clone(), response, embedding.clone(), metadata);

        inner.by_id.insert(id.clone(), entry.clone());
        inner.by_query.insert(query, id.clone());
        inner.embeddings.push((id.clone(), embedding));

        if let Some(victim) = inner.eviction.add(&id) {
            if inner.remove_id(&victim).is_some() {
                inner.stats.evictions += 1;
                debug!(id = %victim, reason = "capacity", "evicting entry");
            }
        }

        inner.stats.total_entries = inner.by_id.len();
        Ok(entry)
    }

    /// Look up the single best-scoring entry. Misses when the store is
    /// empty or the best score falls below the configured threshold.
    pub fn get(&self, embedding: &[f64], token: &CancellationToken) -> Result<Hit> {
        if embedding.is_empty() {
            return Err(CacheError::InvalidEmbedding(
                "embedding must be non-empty".into(),
            ));
        }
        Self::check_cancelled(token)?;

        let mut inner = self.inner.lock();
        inner.sweep_expired();

        if inner.embeddings.is_empty() {
            inner.stats.misses += 1;
            return Err(CacheError::Miss);
        }

        let vectors: Vec<Vec<f64>> = inner.embeddings.iter().map(|(_, v)| v.clone()).collect();
        let (best_idx, best_score) =
            match topk::find_most_similar(embedding, &vectors, self.config.similarity_metric) {
                Some(pair) => pair,
                None => {
                    inner.stats.misses += 1;
                    return Err(CacheError::Miss);
                }
            };

        if best_score < self.config.similarity_threshold {
            inner.stats.misses += 1;
            return Err(CacheError::Miss);
        }

        let id = inner.embeddings[best_idx].0.clone();
        inner.eviction.touch(&id);
        let entry = inner
            .by_id
            .get_mut(&id)
            .ok_or_else(|| CacheError::Invariant("id present in embeddings but not by_id".into()))?;
        entry.touch();
        let entry = entry.clone();
        inner.stats.hits += 1;

        Ok(Hit {
            entry,
            similarity: best_score,
        })
    }

    /// Exact-match lookup by the original query text.
    pub fn get_by_query(&self, query: &str, token: &CancellationToken) -> Result<Entry> {
        Self::check_cancelled(token)?;

        let mut inner = self.inner.lock();
        inner.sweep_expired();

        let id = match inner.by_query.get(query).cloned() {
            Some(id) => id,
            None => {
                inner.stats.misses += 1;
                return Err(CacheError::Miss);
            }
        };

        inner.eviction.touch(&id);
        let entry = inner
            .by_id
            .get_mut(&id)
            .ok_or_else(|| CacheError::Invariant("by_query points at missing id".into()))?;
        entry.touch();
        let entry = entry.clone();
        inner.stats.hits += 1;
        Ok(entry)
    }

    /// Rank every stored entry against `embedding` and return up to `k` hits
    /// meeting the similarity threshold, in descending score order. Each
    /// returned entry is touched, in descending-score order, so that under
    /// the LRU-with-TTL policy the freshest touch is the highest-scoring one.
    pub fn get_top_k(
        &self,
        embedding: &[f64],
        k: usize,
        token: &CancellationToken,
    ) -> Result<Vec<Hit>> {
        if embedding.is_empty() {
            return Err(CacheError::InvalidEmbedding(
                "embedding must be non-empty".into(),
            ));
        }
        Self::check_cancelled(token)?;

        let mut inner = self.inner.lock();
        inner.sweep_expired();

        if inner.embeddings.is_empty() || k == 0 {
            if k != 0 {
                inner.stats.misses += 1;
            }
            return Ok(Vec::new());
        }

        let ids: Vec<String> = inner.embeddings.iter().map(|(id, _)| id.clone()).collect();
        let vectors: Vec<Vec<f64>> = inner.embeddings.iter().map(|(_, v)| v.clone()).collect();
        let ranked = topk::top_k(embedding, &vectors, self.config.similarity_metric, k);

        let mut hits = Vec::new();
        for (idx, score) in ranked {
            if score < self.config.similarity_threshold {
                continue;
            }
            let id = ids[idx].clone();
            inner.eviction.touch(&id);
            if let Some(entry) = inner.by_id.get_mut(&id) {
                entry.touch();
                hits.push(Hit {
                    entry: entry.clone(),
                    similarity: score,
                });
            }
        }

        if hits.is_empty() {
            inner.stats.misses += 1;
        } else {
            inner.stats.hits += hits.len() as u64;
        }

        Ok(hits)
    }

    /// Remove a single entry by id.
    pub fn remove(&self, id: &str, token: &CancellationToken) -> Result<()> {
        Self::check_cancelled(token)?;

        let mut inner = self.inner.lock();
        match inner.remove_id(id) {
            Some(_) => {
                inner.stats.total_entries = inner.by_id.len();
                Ok(())
            }
            None => Err(CacheError::Miss),
        }
    }

    /// Remove every entry matching `criteria`. Returns the count removed.
    pub fn invalidate(
        &self,
        criteria: &InvalidationCriteria,
        token: &CancellationToken,
    ) -> Result<usize> {
        Self::check_cancelled(token)?;

        let mut inner = self.inner.lock();
        let matching: Vec<String> = inner
            .by_id
            .values()
            .filter(|entry| criteria.matches(entry))
            .map(|entry| entry.id.clone())
            .collect();

        let count = matching.len();
        for id in matching {
            inner.remove_id(&id);
        }
        inner.stats.total_entries = inner.by_id.len();
        Ok(count)
    }

    /// Wipe every entry. Hit/miss counters are retained; `total_entries`
    /// resets to 0.
    pub fn clear(&self, token: &CancellationToken) -> Result<()> {
        Self::check_cancelled(token)?;

        let mut inner = self.inner.lock();
        inner.by_id.clear();
        inner.by_query.clear();
        inner.embeddings.clear();
        inner.eviction.clear();
        inner.stats.total_entries = 0;
        Ok(())
    }

    /// A snapshot of the current counters, including the derived hit rate.
    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats.clone()
    }

    pub fn size(&self) -> usize {
        self.inner.lock().by_id.len()
    }
}
