mod lru;
mod lru_ttl;
mod relevance;
mod ttl;

pub use lru::LruPolicy;
pub use lru_ttl::LruWithTtlPolicy;
pub use relevance::RelevancePolicy;
pub use ttl::TtlPolicy;

use semcache_core::{CacheConfig, EvictionPolicyKind};

/// The four pluggable eviction policies as a closed sum type, per the
/// specification's design note: a fifth policy would require extending this
/// enum and the match arms below, rather than open-ended subclassing.
#[derive(Debug, Clone)]
pub enum EvictionPolicy {
    Lru(LruPolicy),
    Ttl(TtlPolicy),
    Relevance(RelevancePolicy),
    LruWithTtl(LruWithTtlPolicy),
}

impl EvictionPolicy {
    pub fn from_config(config: &CacheConfig) -> Self {
        match config.eviction_policy {
            EvictionPolicyKind::Lru => EvictionPolicy::Lru(LruPolicy::new(config.max_entries)),
            EvictionPolicyKind::Ttl => EvictionPolicy::Ttl(TtlPolicy::new(config.ttl)),
            EvictionPolicyKind::Relevance => EvictionPolicy::Relevance(RelevancePolicy::new(
                config.max_entries,
                config.relevance_initial_score,
                config.relevance_touch_alpha,
            )),
            EvictionPolicyKind::LruWithTtl => EvictionPolicy::LruWithTtl(LruWithTtlPolicy::new(
                config.max_entries,
                config.ttl,
            )),
        }
    }

    /// Inform the policy that `id` was just inserted (or re-inserted).
    /// Returns the victim id if capacity was exceeded.
    pub fn add(&mut self, id: &str) -> Option<String> {
        match self {
            EvictionPolicy::Lru(p) => p.add(id),
            EvictionPolicy::Ttl(p) => p.add(id),
            EvictionPolicy::Relevance(p) => p.add(id),
            EvictionPolicy::LruWithTtl(p) => p.add(id),
        }
    }

    /// Record an access to `id` without altering stored payload.
    pub fn touch(&mut self, id: &str) {
        match self {
            EvictionPolicy::Lru(p) => p.touch(id),
            EvictionPolicy::Ttl(p) => p.touch(id),
            EvictionPolicy::Relevance(p) => p.touch(id),
            EvictionPolicy::LruWithTtl(p) => p.touch(id),
        }
    }

    pub fn remove(&mut self, id: &str) {
        match self {
            EvictionPolicy::Lru(p) => p.remove(id),
            EvictionPolicy::Ttl(p) => p.remove(id),
            EvictionPolicy::Relevance(p) => p.remove(id),
            EvictionPolicy::LruWithTtl(p) => p.remove(id),
        }
    }

    /// Ids that have aged past TTL. Always empty for LRU and relevance.
    pub fn expired(&self) -> Vec<String> {
        match self {
            EvictionPolicy::Lru(_) => Vec::new(),
            EvictionPolicy::Ttl(p) => p.expired(),
            EvictionPolicy::Relevance(_) => Vec::new(),
            EvictionPolicy::LruWithTtl(p) => p.expired(),
        }
    }

    pub fn size(&self) -> usize {
        match self {
            EvictionPolicy::Lru(p) => p.size(),
            EvictionPolicy::Ttl(p) => p.size(),
            EvictionPolicy::Relevance(p) => p.size(),
            EvictionPolicy::LruWithTtl(p) => p.size(),
        }
    }

    pub fn clear(&mut self) {
        match self {
            EvictionPolicy::Lru(p) => p.clear(),
            EvictionPolicy::Ttl(p) => p.clear(),
            EvictionPolicy::Relevance(p) => p.clear(),
            EvictionPolicy::LruWithTtl(p) => p.clear(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn from_config_selects_variant() {
        let mut config = CacheConfig::default();
        config.eviction_policy = EvictionPolicyKind::Ttl;
        config.ttl = Duration::from_millis(5);
        let mut policy = EvictionPolicy::from_config(&config);
        policy.add("a");
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(policy.expired(), vec!["a".to_string()]);
    }
}
