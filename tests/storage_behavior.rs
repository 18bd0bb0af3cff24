//! Behavior-driven tests for client-local persistence
//!
//! Cache, ratings and slideshow settings share one file-backed key-value
//! store; corrupt state must always read as absent.

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use quoterace_core::{
    CachePolicy, CachedRecord, CanonicalRecord, FileKeyValueStore, KeyValueStore,
    MemoryKeyValueStore, Provenance, Rating, RatingsStore, RecordCache, SettingsStore,
    SharedStore, SlideshowSettings, SourceId, UtcDateTime,
};
use quoterace_tests::entry_ids;
use tempfile::tempdir;

fn live_record(id: &str) -> CanonicalRecord {
    quoterace_tests::live_record(id, SourceId::Zenquotes)
}

#[tokio::test]
async fn cached_records_survive_a_restart() {
    // Given: a record cached through one store handle
    let dir = tempdir().expect("temp dir");
    let first: SharedStore = Arc::new(FileKeyValueStore::new(dir.path()));
    RecordCache::with_default_policy(first).record(live_record("z-1")).await;

    // When: a new process opens the same directory
    let reopened: SharedStore = Arc::new(FileKeyValueStore::new(dir.path()));
    let cache = RecordCache::with_default_policy(reopened);

    // Then: the record is there with its original provenance and a timestamp
    let entries = cache.entries().await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].record().provenance(), Provenance::Source(SourceId::Zenquotes));

    // And: the file uses the documented layout
    let raw = fs::read_to_string(dir.path().join("quote-racer-cache.json")).expect("cache file");
    let value: serde_json::Value = serde_json::from_str(&raw).expect("json array");
    assert_eq!(value[0]["id"], "z-1");
    assert_eq!(value[0]["provenance"], "api.viewbits.com");
    assert!(value[0]["cachedAt"].is_string());
}

#[tokio::test]
async fn capacity_eviction_keeps_the_most_recent_records() {
    // Given: a cache limited to three records
    let store: SharedStore = Arc::new(MemoryKeyValueStore::new());
    let cache = RecordCache::new(
        store,
        CachePolicy {
            capacity: 3,
            retention: Duration::from_secs(60),
        },
    );

    // When: five distinct records are written
    for index in 0..5 {
        cache.record(live_record(&format!("r-{index}"))).await;
        tokio::time::sleep(Duration::from_millis(2)).await;
    }

    // Then: only the three newest remain, newest first
    assert_eq!(entry_ids(&cache.entries().await), vec!["r-4", "r-3", "r-2"]);
}

#[tokio::test]
async fn records_past_retention_are_pruned_when_sampled() {
    // Given: one entry cached 25 hours ago and one cached just now
    let store = Arc::new(MemoryKeyValueStore::new());
    let now = UtcDateTime::now();
    let entries = vec![
        CachedRecord::new(live_record("fresh"), now),
        CachedRecord::new(live_record("stale"), now.earlier_by(Duration::from_secs(25 * 60 * 60))),
    ];
    store
        .set(
            "quote-racer-cache",
            &serde_json::to_string(&entries).expect("encode"),
        )
        .expect("seed");
    let cache = RecordCache::with_default_policy(store.clone());

    // When
    let sampled = cache.sample_one().await.expect("fresh entry survives");

    // Then: the stale entry is gone from storage as well
    assert_eq!(sampled.id(), "fresh");
    assert_eq!(entry_ids(&cache.entries().await), vec!["fresh"]);
}

#[tokio::test]
async fn corrupt_files_read_as_absent() {
    // Given: every persisted key holds garbage
    let dir = tempdir().expect("temp dir");
    let store = FileKeyValueStore::new(dir.path());
    for key in [
        "quote-racer-cache",
        "quote-racer-ratings",
        "quote-racer-slideshow-settings",
    ] {
        store.set(key, "\u{0}garbage{").expect("seed");
    }
    let store: SharedStore = Arc::new(store);

    // When / Then: each consumer falls back to its empty or default state
    assert!(RecordCache::with_default_policy(Arc::clone(&store))
        .sample_one()
        .await
        .is_none());
    assert!(RatingsStore::new(Arc::clone(&store)).all().is_empty());
    assert_eq!(SettingsStore::new(store).load(), SlideshowSettings::default());
}

#[test]
fn ratings_and_settings_persist_independently() {
    // Given: one shared store
    let dir = tempdir().expect("temp dir");
    let store: SharedStore = Arc::new(FileKeyValueStore::new(dir.path()));
    let ratings = RatingsStore::new(Arc::clone(&store));
    let settings = SettingsStore::new(Arc::clone(&store));

    // When: a rating and new settings are saved
    ratings.save("420", Rating::new(3).expect("valid"));
    settings
        .save(SlideshowSettings {
            enabled: false,
            interval_seconds: 15,
        })
        .expect("valid settings");

    // Then: both are readable through fresh handles and kept under separate keys
    let reopened: SharedStore = Arc::new(FileKeyValueStore::new(dir.path()));
    assert_eq!(
        RatingsStore::new(Arc::clone(&reopened)).get("420").map(Rating::value),
        Some(3)
    );
    let loaded = SettingsStore::new(reopened).load();
    assert!(!loaded.enabled);
    assert_eq!(loaded.interval_seconds, 15);

    let raw = fs::read_to_string(dir.path().join("quote-racer-slideshow-settings.json"))
        .expect("settings file");
    assert_eq!(raw, r#"{"enabled":false,"intervalSeconds":15}"#);
}

#[tokio::test]
async fn unwritable_store_degrades_to_an_empty_cache() {
    // Given: the data directory path is occupied by a regular file
    let dir = tempdir().expect("temp dir");
    let blocked = dir.path().join("blocked");
    fs::write(&blocked, "not a directory").expect("seed");
    let cache = RecordCache::with_default_policy(Arc::new(FileKeyValueStore::new(&blocked)));

    // When: a record is written and sampled
    cache.record(live_record("lost")).await;

    // Then: nothing propagates and the cache reads as empty
    assert!(cache.sample_one().await.is_none());
}
