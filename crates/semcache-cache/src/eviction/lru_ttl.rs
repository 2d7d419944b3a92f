use std::time::Duration;

use super::lru::LruPolicy;
use super::ttl::TtlPolicy;

/// The default composite policy: LRU ordering for capacity eviction, plus a
/// per-id insertion timestamp for TTL expiry. `add`/`touch`/`remove` behave
/// as in [`LruPolicy`]; `expired` behaves as in [`TtlPolicy`]. The cache
/// store treats both a capacity victim and an age victim as an eviction.
#[derive(Debug, Clone)]
pub struct LruWithTtlPolicy {
    lru: LruPolicy,
    ttl: TtlPolicy,
}

impl LruWithTtlPolicy {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            lru: LruPolicy::new(capacity),
            ttl: TtlPolicy::new(ttl),
        }
    }

    pub fn add(&mut self, id: &str) -> Option<String> {
        self.ttl.add(id);
        let victim = self.lru.add(id);
        if let Some(v) = &victim {
            self.ttl.remove(v);
        }
        victim
    }

    pub fn touch(&mut self, id: &str) {
        self.lru.touch(id);
        self.ttl.touch(id);
    }

    pub fn remove(&mut self, id: &str) {
        self.lru.remove(id);
        self.ttl.remove(id);
    }

    pub fn expired(&self) -> Vec<String> {
        self.ttl.expired()
    }

    pub fn size(&self) -> usize {
        self.lru.size()
    }

    pub fn clear(&mut self) {
        self.lru.clear();
        self.ttl.clear();
    }
}
