use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{CacheError, Result};

/// Similarity metric identifiers. These literal strings cross process
/// boundaries unchanged (see the serde rename attributes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityMetric {
    Cosine,
    Euclidean,
    #[serde(rename = "dot_product")]
    DotProduct,
    Manhattan,
}

impl Default for SimilarityMetric {
    fn default() -> Self {
        SimilarityMetric::Cosine
    }
}

/// The four pluggable eviction policy variants (see `semcache_cache::eviction`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvictionPolicyKind {
    Lru,
    Ttl,
    Relevance,
    #[serde(rename = "lru_with_ttl")]
    LruWithTtl,
}

impl Default for EvictionPolicyKind {
    fn default() -> Self {
        EvictionPolicyKind::LruWithTtl
    }
}

/// Cache configuration, built via `Default` plus field assignment and then
/// validated with [`CacheConfig::validate`].
///
/// Two validation modes exist: permissive (the default; out-of-range values
/// are coerced back to their defaults and a warning is logged) and strict
/// (the same out-of-range values instead produce
/// [`CacheError::PolicyViolation`]). This mirrors the
/// `CacheConfig`/`QueryCacheConfig` pattern in the cache crate this project
/// grew from, which defaults permissively but lets callers opt into hard
/// failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub max_entries: usize,
    pub similarity_threshold: f64,
    pub similarity_metric: SimilarityMetric,
    pub ttl: Duration,
    pub eviction_policy: EvictionPolicyKind,
    /// Relevance policy: starting score for a freshly inserted id, in `[0,1]`.
    pub relevance_initial_score: f64,
    /// Relevance policy: how much each touch moves the score toward 1.0.
    pub relevance_touch_alpha: f64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            similarity_threshold: 0.85,
            similarity_metric: SimilarityMetric::default(),
            ttl: Duration::from_secs(24 * 60 * 60),
            eviction_policy: EvictionPolicyKind::default(),
            relevance_initial_score: 0.9,
            relevance_touch_alpha: 0.1,
        }
    }
}

impl CacheConfig {
    /// Validate `self` in place, either coercing invalid fields to their
    /// defaults (`strict = false`) or rejecting the whole config
    /// (`strict = true`) with `CacheError::PolicyViolation`.
    pub fn validate(mut self, strict: bool) -> Result<Self> {
        let defaults = Self::default();

        if self.max_entries == 0 {
            if strict {
                return Err(CacheError::PolicyViolation(
                    "max_entries must be positive".into(),
                ));
            }
            warn!(
                coerced = defaults.max_entries,
                "max_entries <= 0, coercing to default"
            );
            self.max_entries = defaults.max_entries;
        }

        if !(self.similarity_threshold > 0.0 && self.similarity_threshold <= 1.0) {
            if strict {
                return Err(CacheError::PolicyViolation(
                    "similarity_threshold must be in (0, 1]".into(),
                ));
            }
            warn!(
                requested = self.similarity_threshold,
                coerced = defaults.similarity_threshold,
                "similarity_threshold outside (0,1], coercing to default"
            );
            self.similarity_threshold = defaults.similarity_threshold;
        }

        if self.ttl.is_zero() {
            if strict {
                return Err(CacheError::PolicyViolation("ttl must be positive".into()));
            }
            warn!(coerced = ?defaults.ttl, "ttl <= 0, coercing to default");
            self.ttl = defaults.ttl;
        }

        if !(0.0..=1.0).contains(&self.relevance_initial_score) {
            if strict {
                return Err(CacheError::PolicyViolation(
                    "relevance_initial_score must be in [0, 1]".into(),
                ));
            }
            self.relevance_initial_score = defaults.relevance_initial_score;
        }

        if !(0.0..=1.0).contains(&self.relevance_touch_alpha) {
            if strict {
                return Err(CacheError::PolicyViolation(
                    "relevance_touch_alpha must be in [0, 1]".into(),
                ));
            }
            self.relevance_touch_alpha = defaults.relevance_touch_alpha;
        }

        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = CacheConfig::default();
        assert_eq!(cfg.max_entries, 10_000);
        assert_eq!(cfg.similarity_threshold, 0.85);
    }

    #[test]
    fn coerced_replaces_invalid_values() {
        let cfg = CacheConfig {
            max_entries: 0,
            similarity_threshold: 1.5,
            similarity_metric: SimilarityMetric::Euclidean,
            ttl: Duration::ZERO,
            eviction_policy: EvictionPolicyKind::Lru,
            ..Default::default()
        }
        .validate(false)
        .unwrap();

        assert_eq!(cfg.max_entries, 10_000);
        assert_eq!(cfg.similarity_threshold, 0.85);
        assert_eq!(cfg.ttl, Duration::from_secs(24 * 60 * 60));
        // non-coerced fields pass through untouched
        assert_eq!(cfg.similarity_metric, SimilarityMetric::Euclidean);
        assert_eq!(cfg.eviction_policy, EvictionPolicyKind::Lru);
    }

    #[test]
    fn strict_rejects_invalid_values() {
        let err = CacheConfig {
            max_entries: 0,
            ..Default::default()
        }
        .validate(true)
        .unwrap_err();
        assert!(matches!(err, CacheError::PolicyViolation(_)));
    }

    #[test]
    fn strict_accepts_valid_values() {
        let cfg = CacheConfig {
            max_entries: 100,
            ttl: Duration::from_secs(60),
            eviction_policy: EvictionPolicyKind::Ttl,
            ..Default::default()
        }
        .validate(true)
        .unwrap();
        assert_eq!(cfg.max_entries, 100);
    }
}
