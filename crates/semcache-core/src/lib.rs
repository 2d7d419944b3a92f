pub mod config;
pub mod entry;
pub mod error;
pub mod stats;

pub use config::{CacheConfig, EvictionPolicyKind, SimilarityMetric};
pub use entry::{Entry, Metadata, MetadataValue};
pub use error::{CacheError, Result};
pub use stats::CacheStats;
