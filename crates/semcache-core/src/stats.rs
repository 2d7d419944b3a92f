use serde::{Deserialize, Serialize};

/// Cache performance statistics, in the vein of `codegraph-cache`'s
/// `CacheMetrics` — a plain serializable snapshot, no owned sink.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub total_entries: usize,
}

impl CacheStats {
    /// `hits / (hits + misses)`, or 0.0 when nothing has been looked up yet.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_rate_zero_when_no_requests() {
        assert_eq!(CacheStats::default().hit_rate(), 0.0);
    }

    #[test]
    fn hit_rate_computed() {
        let stats = CacheStats {
            hits: 2,
            misses: 1,
            evictions: 0,
            total_entries: 1,
        };
        assert!((stats.hit_rate() - 0.6666666).abs() < 1e-5);
    }

    #[test]
    fn stats_round_trip_through_json() {
        let stats = CacheStats {
            hits: 5,
            misses: 2,
            evictions: 1,
            total_entries: 4,
        };
        let json = serde_json::to_string(&stats).unwrap();
        let restored: CacheStats = serde_json::from_str(&json).unwrap();
        assert_eq!(stats, restored);
    }
}
