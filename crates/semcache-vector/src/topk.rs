use rayon::prelude::*;
use semcache_core::SimilarityMetric;

use crate::metrics::score;

/// Switch to rayon's parallel iterator once the collection is large enough
/// that per-item overhead is worth paying for. Pure execution-strategy
/// detail; never changes the ranking or tie-break contract below.
const PARALLEL_THRESHOLD: usize = 512;

/// Rank every vector in `collection` against `query` under `metric` and
/// return the indices of the `k` highest-scoring entries, in descending
/// score order. Ties are broken by lower original index (stable with
/// respect to input order) — this is a contract the cache store relies on,
/// not an implementation detail.
///
/// Returns an empty vector if `collection` is empty or `k` is 0. If `k`
/// exceeds `collection.len()`, the full ranking is returned.
pub fn top_k(
    query: &[f64],
    collection: &[Vec<f64>],
    metric: SimilarityMetric,
    k: usize,
) -> Vec<(usize, f64)> {
    if collection.is_empty() || k == 0 {
        return Vec::new();
    }

    let mut scored: Vec<(usize, f64)> = if collection.len() >= PARALLEL_THRESHOLD {
        collection
            .par_iter()
            .enumerate()
            .map(|(idx, v)| (idx, score(query, v, metric)))
            .collect()
    } else {
        collection
            .iter()
            .enumerate()
            .map(|(idx, v)| (idx, score(query, v, metric)))
            .collect()
    };

    scored.sort_by(|a, b| match b.1.partial_cmp(&a.1) {
        Some(std::cmp::Ordering::Equal) | None => a.0.cmp(&b.0),
        Some(ordering) => ordering,
    });

    scored.truncate(k);
    scored
}

/// The single highest-scoring entry in `collection`, equivalent to
/// `top_k(query, collection, metric, 1).first()`.
pub fn find_most_similar(
    query: &[f64],
    collection: &[Vec<f64>],
    metric: SimilarityMetric,
) -> Option<(usize, f64)> {
    top_k(query, collection, metric, 1).into_iter().next()
}
