//! Unit tests for cache keys, entries, TTL tiers, diagnostics and stores

use levelcache::cache::{
    evict_if_expired, sanitize_part, CacheEntry, CacheKey, CacheLayer, CacheMeta, Clock,
    DurableStore, InMemoryStore, ManualClock, StoreError, TtlTier,
};
use serde_json::json;
use std::collections::HashMap;

#[test]
fn test_compose_sanitizes_parts() {
    let key = CacheKey::compose("fd", "/prices/snapshot", ["aapl"]);
    assert_eq!(key.as_str(), "FD_PRICES_SNAPSHOT_AAPL");

    let key = CacheKey::compose("news", "everything", ["brk.b", ""]);
    assert_eq!(key.to_string(), "NEWS_EVERYTHING_BRK_B");
}

#[test]
fn test_sanitize_part() {
    assert_eq!(sanitize_part("BTC-USD"), "BTC_USD");
    assert_eq!(sanitize_part("a_b c"), "A_B_C");
}

#[test]
fn test_keys_compare_exactly() {
    assert_ne!(CacheKey::new("aapl"), CacheKey::new("AAPL"));
    assert_eq!(CacheKey::from("AAPL"), CacheKey::new("AAPL".to_string()));
}

#[test]
fn test_entry_validity_window() {
    let entry = CacheEntry::new(json!(1), 10_000, 60);

    assert_eq!(entry.expires_at_ms, 70_000);
    assert!(entry.is_valid_at(69_999));
    assert!(!entry.is_valid_at(70_000));
    assert_eq!(entry.age_seconds(25_500), 15.5);
    assert_eq!(entry.remaining_ms(69_000), 1_000);
    assert_eq!(entry.remaining_ms(80_000), 0);
}

#[test]
fn test_eviction_rechecks_current_entry() {
    let mut entries = HashMap::new();
    entries.insert("k".to_string(), CacheEntry::new(json!(1), 10_000, 60));

    // Still valid, so a stale expiry check must not drop it
    assert!(!evict_if_expired(&mut entries, "k", 69_999));
    assert!(entries.contains_key("k"));

    assert!(evict_if_expired(&mut entries, "k", 70_000));
    assert!(!entries.contains_key("k"));
    assert!(!evict_if_expired(&mut entries, "missing", 70_000));
}

#[test]
fn test_ttl_tiers() {
    assert_eq!(TtlTier::Realtime.as_secs(), 60);
    assert_eq!(TtlTier::Short.as_secs(), 900);
    assert_eq!(TtlTier::Medium.as_secs(), 14_400);
    assert_eq!(TtlTier::Long.as_secs(), 86_400);
    assert_eq!(TtlTier::Weekly.as_secs(), 604_800);
}

#[test]
fn test_ttl_for_endpoint() {
    assert_eq!(TtlTier::for_endpoint("insider-trades"), TtlTier::Weekly);
    assert_eq!(TtlTier::for_endpoint("company/facts"), TtlTier::Weekly);
    assert_eq!(TtlTier::for_endpoint("prices/snapshot"), TtlTier::Realtime);
    assert_eq!(TtlTier::for_endpoint("news"), TtlTier::Short);
    assert_eq!(TtlTier::for_endpoint("financial-metrics"), TtlTier::Long);
}

#[test]
fn test_debug_headers_hide_layer_by_default() {
    let meta = CacheMeta::hit(CacheLayer::Durable, 42.6, 3);

    let headers = meta.debug_headers(false);
    assert_eq!(
        headers,
        vec![
            ("X-Response-Time", "3ms".to_string()),
            ("X-Cache", "HIT".to_string()),
            ("Age", "43".to_string()),
        ]
    );

    let headers = meta.debug_headers(true);
    assert_eq!(headers.last(), Some(&("X-Cache-Layer", "DURABLE".to_string())));
}

#[test]
fn test_origin_meta() {
    let meta = CacheMeta::origin(120);
    assert!(!meta.hit);
    assert_eq!(meta.layer, CacheLayer::Origin);
    assert_eq!(meta.debug_headers(false)[1].1, "MISS");
    assert_eq!(serde_json::to_value(meta.layer).unwrap(), json!("ORIGIN"));
}

#[test]
fn test_manual_clock() {
    let clock = ManualClock::new(1_000);
    clock.advance(500);
    assert_eq!(clock.now_ms(), 1_500);
    clock.set(10);
    assert_eq!(clock.now_ms(), 10);
}

#[test]
fn test_in_memory_store_offline() {
    let store = InMemoryStore::new();
    let entry = CacheEntry::new(json!({"a": 1}), 0, 60);

    tokio_test::block_on(async {
        tokio_test::assert_ok!(store.set("k", &entry).await);
        assert_eq!(store.get("k").await.unwrap(), Some(entry.clone()));

        store.set_offline(true);
        assert!(matches!(store.get("k").await, Err(StoreError::Unavailable(_))));
        assert!(store.remove("k").await.is_err());

        store.set_offline(false);
        tokio_test::assert_ok!(store.remove("k").await);
        assert!(store.is_empty().await);
    });
}
