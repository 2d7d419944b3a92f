use std::time::SystemTime;

use semcache_core::{Entry, Metadata};

/// Criteria for [`crate::CacheStore::invalidate`]. All specified fields must
/// match (logical AND); a criteria value of `None` is not considered for
/// matching.
#[derive(Debug, Clone, Default)]
pub struct InvalidationCriteria {
    /// Exact query text match.
    pub match_query: Option<String>,
    /// Every key/value pair here must be present and equal on the entry's
    /// metadata.
    pub match_metadata: Option<Metadata>,
    /// Entry's `created_at` must be strictly older than this timestamp.
    pub older_than: Option<SystemTime>,
}

impl InvalidationCriteria {
    pub fn matches(&self, entry: &Entry) -> bool {
        if let Some(query) = &self.match_query {
            if &entry.query != query {
                return false;
            }
        }

        if let Some(metadata) = &self.match_metadata {
            for (key, value) in metadata {
                match entry.metadata.get(key) {
                    Some(existing) if existing == value => {}
                    _ => return false,
                }
            }
        }

        if let Some(older_than) = self.older_than {
            if entry.created_at >= older_than {
                return false;
            }
        }

        // A criteria with no fields set matches nothing — invalidation must
        // be scoped explicitly rather than wiping the whole cache by accident.
        if self.match_query.is_none() && self.match_metadata.is_none() && self.older_than.is_none()
        {
            return false;
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn entry(query: &str, metadata: Metadata) -> Entry {
        Entry::new(
            "id".into(),
            query.into(),
            "resp".into(),
            vec![1.0],
            metadata,
        )
    }

    #[test]
    fn empty_criteria_matches_nothing() {
        let e = entry("q", HashMap::new());
        assert!(!InvalidationCriteria::default().matches(&e));
    }

    #[test]
    fn match_query_exact() {
        let e = entry("q1", HashMap::new());
        let criteria = InvalidationCriteria {
            match_query: Some("q1".into()),
            ..Default::default()
        };
        assert!(criteria.matches(&e));

        let criteria_no = InvalidationCriteria {
            match_query: Some("q2".into()),
            ..Default::default()
        };
        assert!(!criteria_no.matches(&e));
    }

    #[test]
    fn match_metadata_requires_all_pairs() {
        let mut md = HashMap::new();
        md.insert("type".to_string(), "test".into());
        md.insert("owner".to_string(), "alice".into());
        let e = entry("q", md);

        let mut want = HashMap::new();
        want.insert("type".to_string(), "test".into());
        let criteria = InvalidationCriteria {
            match_metadata: Some(want),
            ..Default::default()
        };
        assert!(criteria.matches(&e));

        let mut want_mismatch = HashMap::new();
        want_mismatch.insert("type".to_string(), "prod".into());
        let criteria_no = InvalidationCriteria {
            match_metadata: Some(want_mismatch),
            ..Default::default()
        };
        assert!(!criteria_no.matches(&e));
    }
}
