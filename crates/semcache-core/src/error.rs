use thiserror::Error;

/// Stable error identities for the cache core.
///
/// `Miss` and `InvalidEmbedding`/`PolicyViolation` are the sentinels callers
/// are expected to match on; `Invariant` is reserved for internal invariant
/// breaches and should never be observed outside of a bug.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CacheError {
    /// No entry met the similarity threshold, or the lookup key was not found.
    #[error("cache miss")]
    Miss,

    /// An empty embedding was presented to `Set` or `Get`.
    #[error("invalid embedding: {0}")]
    InvalidEmbedding(String),

    /// Configuration was refused by strict-mode validation.
    #[error("policy violation: {0}")]
    PolicyViolation(String),

    /// An internal invariant was violated; must be impossible in correct code.
    #[error("internal invariant violated: {0}")]
    Invariant(String),

    /// The caller's cancellation token fired before any state was mutated.
    #[error("operation cancelled")]
    Cancelled,
}

impl CacheError {
    pub fn is_miss(&self) -> bool {
        matches!(self, CacheError::Miss)
    }
}

pub type Result<T> = std::result::Result<T, CacheError>;
