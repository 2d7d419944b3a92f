use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

use semcache_cache::CacheStore;
use semcache_core::CacheConfig;
use tokio_util::sync::CancellationToken;

fn token() -> CancellationToken {
    CancellationToken::new()
}

#[test]
fn test_cache_basic_operations() {
    let store = CacheStore::new(CacheConfig::default(), false).unwrap();
    let entry = store
        .set(
            "hello".into(),
            "world".into(),
            vec![1.0, 0.0],
            HashMap::new(),
            &token(),
        )
        .unwrap();
    assert_eq!(store.size(), 1);

    let fetched = store.get_by_query("hello", &token()).unwrap();
    assert_eq!(fetched.id, entry.id);
    assert_eq!(fetched.response, "world");

    store.remove(&entry.id, &token()).unwrap();
    assert_eq!(store.size(), 0);
}

#[test]
fn test_query_cache_semantic_similarity() {
    let store = CacheStore::new(
        CacheConfig {
            similarity_threshold: 0.8,
            ..Default::default()
        },
        false,
    )
    .unwrap();

    store
        .set(
            "What is 2+2?".into(),
            "4".into(),
            vec![1.0, 0.0, 0.0],
            HashMap::new(),
            &token(),
        )
        .unwrap();

    let hit = store.get(&[0.99, 0.01, 0.0], &token()).unwrap();
    assert_eq!(hit.entry.response, "4");
    assert!(hit.similarity >= 0.99);

    let miss = store.get(&[0.0, 0.0, 1.0], &token());
    assert!(miss.is_err());
}

#[test]
fn test_cache_invalidation() {
    let store = CacheStore::new(CacheConfig::default(), false).unwrap();

    let mut test_md = HashMap::new();
    test_md.insert("type".to_string(), "test".into());
    let mut prod_md = HashMap::new();
    prod_md.insert("type".to_string(), "prod".into());

    store
        .set("q0".into(), "r0".into(), vec![1.0, 0.0, 0.0], test_md.clone(), &token())
        .unwrap();
    store
        .set("q1".into(), "r1".into(), vec![0.0, 1.0, 0.0], prod_md, &token())
        .unwrap();
    store
        .set("q2".into(), "r2".into(), vec![0.0, 0.0, 1.0], test_md.clone(), &token())
        .unwrap();

    let criteria = semcache_cache::InvalidationCriteria {
        match_metadata: Some(test_md),
        ..Default::default()
    };
    let removed = store.invalidate(&criteria, &token()).unwrap();
    assert_eq!(removed, 2);
    assert_eq!(store.size(), 1);
}

#[test]
fn test_memory_optimization() {
    let store = CacheStore::new(
        CacheConfig {
            max_entries: 3,
            eviction_policy: semcache_core::EvictionPolicyKind::Lru,
            similarity_threshold: 0.5,
            ..Default::default()
        },
        false,
    )
    .unwrap();

    for i in 0..4 {
        store
            .set(
                format!("q{i}"),
                format!("r{i}"),
                vec![i as f64, 0.0],
                HashMap::new(),
                &token(),
            )
            .unwrap();
    }

    assert_eq!(store.size(), 3);
    assert!(store.get_by_query("q0", &token()).is_err());
    let stats = store.stats();
    assert_eq!(stats.evictions, 1);
}

#[test]
fn test_cache_metrics() {
    let store = CacheStore::new(
        CacheConfig {
            similarity_threshold: 0.9,
            ..Default::default()
        },
        false,
    )
    .unwrap();

    store
        .set("q".into(), "r".into(), vec![1.0, 0.0], HashMap::new(), &token())
        .unwrap();
    store.get(&[1.0, 0.0], &token()).unwrap();
    store.get(&[1.0, 0.0], &token()).unwrap();
    let _ = store.get(&[0.0, 1.0], &token());

    let stats = store.stats();
    assert_eq!(stats.total_entries, 1);
    assert_eq!(stats.hits, 2);
    assert_eq!(stats.misses, 1);
    assert!((stats.hit_rate() - 2.0 / 3.0).abs() < 1e-6);
}

/// 10 concurrent writers insert distinct embeddings into a capacity-100
/// cache, then 10 concurrent readers query; no operation panics, the final
/// size never exceeds capacity, and every invariant holds.
#[test]
fn test_concurrent_access() {
    let store = Arc::new(
        CacheStore::new(
            CacheConfig {
                max_entries: 100,
                similarity_threshold: 0.99,
                ..Default::default()
            },
            false,
        )
        .unwrap(),
    );

    let mut writers = Vec::new();
    for i in 0..10 {
        let store = Arc::clone(&store);
        writers.push(thread::spawn(move || {
            store
                .set(
                    format!("writer-{i}"),
                    format!("response-{i}"),
                    vec![i as f64, 1.0, 0.0],
                    HashMap::new(),
                    &token(),
                )
                .unwrap();
        }));
    }
    for w in writers {
        w.join().unwrap();
    }

    assert!(store.size() <= 10);
    let stats = store.stats();
    assert_eq!(stats.total_entries, store.size());

    let mut readers = Vec::new();
    for i in 0..10 {
        let store = Arc::clone(&store);
        readers.push(thread::spawn(move || {
            let _ = store.get(&[i as f64, 1.0, 0.0], &token());
        }));
    }
    for r in readers {
        r.join().unwrap();
    }

    assert!(store.size() <= 100);
    let stats = store.stats();
    assert_eq!(stats.total_entries, store.size());
    assert!(stats.hits + stats.misses >= 10);
}
