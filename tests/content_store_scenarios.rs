//! Integration tests for the content store
//!
//! Drives the store through its public API the way a forwarder would.

use std::sync::Arc;
use std::time::Duration;

use icn_content_store::{
    spawn_trim_task, CachedMessage, Config, ContentObject, ContentStore, EvictionPolicy, ManualClock,
    Name, SharedContentStore, StoreError,
};
use tokio::sync::RwLock;

fn content(uri: &str) -> Arc<ContentObject> {
    Arc::new(ContentObject::new(uri, format!("data for {}", uri)))
}

fn name(uri: &str) -> Name {
    Name::from_uri(uri)
}

// == Eviction ==

#[test]
fn test_lru_scenario() {
    let mut store = ContentStore::new(2);

    store.insert(content("/c1"), 0).unwrap();
    store.insert(content("/c2"), 0).unwrap();
    assert!(store.find(&name("/c1")).is_some());
    store.insert(content("/c3"), 0).unwrap();

    assert_eq!(store.len(), 2);
    assert!(store.contains(&name("/c1")));
    assert!(!store.contains(&name("/c2")));
    assert!(store.contains(&name("/c3")));
}

#[test]
fn test_expiry_precedence_scenario() {
    let mut store = ContentStore::new(2);

    store
        .insert(Arc::new(ContentObject::new("/a", "a").with_expiry_time(100)), 0)
        .unwrap();
    store.insert(content("/b"), 0).unwrap();
    assert!(store.find(&name("/a")).is_some());

    store.insert(content("/c"), 150).unwrap();

    assert!(!store.contains(&name("/a")));
    assert!(store.contains(&name("/b")));
    assert!(store.contains(&name("/c")));

    let stats = store.stats();
    assert_eq!(stats.expiry_evictions, 1);
    assert_eq!(stats.lru_evictions, 0);
}

#[test]
fn test_trim_scenario() {
    let mut store = ContentStore::new(5);

    store
        .insert(Arc::new(ContentObject::new("/exp", "e").with_expiry_time(100)), 0)
        .unwrap();
    store.insert(content("/x"), 0).unwrap();
    store.insert(content("/y"), 0).unwrap();

    assert_eq!(store.trim(50), 0);
    assert_eq!(store.len(), 3);

    assert_eq!(store.trim(150), 1);
    assert_eq!(store.len(), 2);
    assert_eq!(store.lru_order(), vec![name("/y"), name("/x")]);
}

#[test]
fn test_store_from_config() {
    let config = Config {
        capacity: 2,
        evict_expired: false,
        evict_past_rct: false,
        ..Config::default()
    };
    let mut store = ContentStore::from_config(&config);
    assert_eq!(store.limit(), 2);
    assert_eq!(store.policy(), EvictionPolicy::lru_only());

    store
        .insert(Arc::new(ContentObject::new("/a", "a").with_expiry_time(100)), 0)
        .unwrap();
    store.insert(content("/b"), 0).unwrap();
    store.find(&name("/a")).unwrap();
    store.insert(content("/c"), 150).unwrap();

    // Plain LRU: the expired entry survives because it was touched last
    assert!(store.contains(&name("/a")));
    assert!(!store.contains(&name("/b")));
}

// == Forwarder lookups ==

#[test]
fn test_serve_honours_deadlines() {
    let mut store = ContentStore::new(10);

    store
        .insert(Arc::new(ContentObject::new("/video/seg1", "s1").with_expiry_time(1000)), 0)
        .unwrap();
    store
        .insert(
            Arc::new(ContentObject::new("/video/seg2", "s2").with_recommended_cache_time(500)),
            0,
        )
        .unwrap();

    assert!(store.serve(&name("/video/seg1"), 999).is_some());
    assert!(store.serve(&name("/video/seg1"), 1001).is_none());

    let last = store.serve(&name("/video/seg2"), 600).unwrap();
    assert_eq!(&last.payload()[..], b"s2");
    assert!(store.serve(&name("/video/seg2"), 601).is_none());

    assert!(store.is_empty());
    assert_eq!(store.stats().stale_removals, 2);
}

#[test]
fn test_found_message_outlives_eviction() {
    let mut store = ContentStore::new(1);
    store.insert(content("/held"), 0).unwrap();

    let held = store.find(&name("/held")).unwrap();
    store.insert(content("/other"), 0).unwrap();

    assert!(!store.contains(&name("/held")));
    assert_eq!(held.name(), &name("/held"));
    assert_eq!(Arc::strong_count(&held), 1);
}

#[test]
fn test_errors_are_reported() {
    let mut store = ContentStore::new(3);

    let err = store
        .insert(Arc::new(ContentObject::new("/late", "x").with_expiry_time(10)), 10)
        .unwrap_err();
    assert!(matches!(err, StoreError::Expired { expiry: 10, now: 10, .. }));
    assert!(err.to_string().contains("/late"));

    store.set_limit(0);
    assert_eq!(store.insert(content("/a"), 0), Err(StoreError::ZeroCapacity));
}

#[test]
fn test_stats_serialize_to_json() {
    let mut store = ContentStore::new(4);
    store.insert(content("/a"), 0).unwrap();
    store.find(&name("/a")).unwrap();

    let json = serde_json::to_value(store.stats()).unwrap();
    assert_eq!(json["adds"], 1);
    assert_eq!(json["hits"], 1);
    assert_eq!(json["total_entries"], 1);
    assert_eq!(json["capacity"], 4);
}

// == Shared store ==

#[tokio::test]
async fn test_shared_store_with_trim_task() {
    let store: SharedContentStore<ContentObject> = Arc::new(RwLock::new(ContentStore::new(16)));
    let clock = Arc::new(ManualClock::new(0));

    let handle = spawn_trim_task(store.clone(), clock.clone(), Duration::from_millis(10));

    let mut writers = Vec::new();
    for worker in 0..4u64 {
        let store = store.clone();
        writers.push(tokio::spawn(async move {
            for i in 0..4u64 {
                let uri = format!("/worker{}/item{}", worker, i);
                let object = ContentObject::new(uri.as_str(), "v").with_expiry_time(100 + i);
                store.write().await.insert(Arc::new(object), 0).unwrap();
            }
        }));
    }
    for writer in writers {
        writer.await.unwrap();
    }
    assert_eq!(store.read().await.len(), 16);

    clock.set(102);
    tokio::time::sleep(Duration::from_millis(80)).await;

    {
        let guard = store.read().await;
        // Deadlines 100, 101 passed; 102 and 103 have not
        assert_eq!(guard.len(), 8);
        let sizes = guard.index_sizes();
        assert_eq!(sizes.lru, 8);
        assert_eq!(sizes.by_expiry, 8);
    }

    handle.abort();
}
