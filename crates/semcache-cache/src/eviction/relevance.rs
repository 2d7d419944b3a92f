use std::collections::HashMap;

#[derive(Debug, Clone)]
struct Scored {
    score: f64,
    /// Monotonic insertion sequence, used to break score ties toward the
    /// earliest-inserted entry.
    seq: u64,
}

/// Relevance-scored eviction. Each id carries a score in `[0, 1]` that starts
/// at `initial_score` and moves monotonically toward 1.0 on every touch,
/// saturating there. At capacity, the lowest-scoring id is evicted; ties are
/// broken by earliest insertion.
#[derive(Debug, Clone)]
pub struct RelevancePolicy {
    capacity: usize,
    initial_score: f64,
    touch_alpha: f64,
    scores: HashMap<String, Scored>,
    next_seq: u64,
}

impl RelevancePolicy {
    pub fn new(capacity: usize, initial_score: f64, touch_alpha: f64) -> Self {
        Self {
            capacity: capacity.max(1),
            initial_score: initial_score.clamp(0.0, 1.0),
            touch_alpha: touch_alpha.clamp(0.0, 1.0),
            scores: HashMap::new(),
            next_seq: 0,
        }
    }

    /// Insert `id` at the initial score. Returns the lowest-scoring id
    /// (ties broken by earliest insertion) if capacity was exceeded.
    pub fn add(&mut self, id: &str) -> Option<String> {
        if !self.scores.contains_key(id) {
            let seq = self.next_seq;
            self.next_seq += 1;
            self.scores.insert(
                id.to_string(),
                Scored {
                    score: self.initial_score,
                    seq,
                },
            );
        }

        if self.scores.len() > self.capacity {
            return self.evict_lowest();
        }
        None
    }

    /// Move `id`'s score toward 1.0: `s <- min(1, s + (1 - s) * alpha)`.
    pub fn touch(&mut self, id: &str) {
        if let Some(entry) = self.scores.get_mut(id) {
            entry.score = (entry.score + (1.0 - entry.score) * self.touch_alpha).min(1.0);
        }
    }

    pub fn remove(&mut self, id: &str) {
        self.scores.remove(id);
    }

    pub fn size(&self) -> usize {
        self.scores.len()
    }

    pub fn clear(&mut self) {
        self.scores.clear();
    }

    fn evict_lowest(&mut self) -> Option<String> {
        let victim = self
            .scores
            .iter()
            .min_by(|(_, a), (_, b)| {
                a.score
                    .partial_cmp(&b.score)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| a.seq.cmp(&b.seq))
            })
            .map(|(id, _)| id.clone());

        if let Some(id) = &victim {
            self.scores.remove(id);
        }
        victim
    }
}
