pub mod metrics;
pub mod topk;

pub use metrics::{cosine, dot, euclidean, manhattan, normalize_l2, score, score_raw};
pub use topk::{find_most_similar, top_k};
