//! Persisted, capacity- and age-bounded cache of normalized records.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::warn;

use crate::store::{SharedStore, CACHE_KEY};
use crate::{CachedRecord, CanonicalRecord, StoreError, UtcDateTime};

/// Default number of records kept.
pub const DEFAULT_CACHE_CAPACITY: usize = 10;
/// Default age after which a record is pruned.
pub const DEFAULT_CACHE_RETENTION: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub capacity: usize,
    pub retention: Duration,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CACHE_CAPACITY,
            retention: DEFAULT_CACHE_RETENTION,
        }
    }
}

#[derive(Clone)]
struct CacheInner {
    store: SharedStore,
    policy: CachePolicy,
}

impl CacheInner {
    /// Newest first. Entries that fail to decode are skipped individually.
    fn load(&self) -> Vec<CachedRecord> {
        let raw = match self.store.get(CACHE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(error) => {
                warn!(error = %error, "failed to read record cache, treating as empty");
                return Vec::new();
            }
        };

        let values = match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(values)) => values,
            Ok(_) => {
                warn!("record cache is not an array, treating as empty");
                return Vec::new();
            }
            Err(error) => {
                warn!(error = %error, "record cache is corrupt, treating as empty");
                return Vec::new();
            }
        };

        let mut entries = values
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<CachedRecord>(value) {
                Ok(entry) => Some(entry),
                Err(error) => {
                    warn!(error = %error, "skipping corrupt record cache entry");
                    None
                }
            })
            .collect::<Vec<_>>();
        entries.sort_by(|left, right| right.cached_at().cmp(&left.cached_at()));
        entries
    }

    fn persist(&self, entries: &[CachedRecord]) {
        let result = serde_json::to_string(entries)
            .map_err(|source| StoreError::Encoding {
                key: String::from(CACHE_KEY),
                source,
            })
            .and_then(|encoded| self.store.set(CACHE_KEY, &encoded));

        if let Err(error) = result {
            warn!(error = %error, "failed to persist record cache");
        }
    }

    fn prune_expired(&self, entries: &mut Vec<CachedRecord>, now: UtcDateTime) -> bool {
        let before = entries.len();
        entries.retain(|entry| entry.cached_at().age_at(now) <= self.policy.retention);
        entries.len() != before
    }

    fn record(&self, record: CanonicalRecord) {
        let now = UtcDateTime::now();

        let mut entries = self.load();
        entries.retain(|entry| entry.record().id() != record.id());
        entries.insert(0, CachedRecord::new(record, now));
        self.prune_expired(&mut entries, now);
        entries.truncate(self.policy.capacity);

        self.persist(&entries);
    }

    fn sample_one(&self) -> Option<CanonicalRecord> {
        let mut entries = self.load();
        if self.prune_expired(&mut entries, UtcDateTime::now()) {
            self.persist(&entries);
        }

        if entries.is_empty() {
            return None;
        }
        let index = fastrand::usize(..entries.len());
        Some(entries.swap_remove(index).into_record())
    }

    fn clear(&self) {
        if let Err(error) = self.store.remove(CACHE_KEY) {
            warn!(error = %error, "failed to clear record cache");
        }
    }
}

/// Runs store I/O on the blocking pool. A panicked task reads as `None`.
async fn on_blocking_pool<T, F>(task: F) -> Option<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    match tokio::task::spawn_blocking(task).await {
        Ok(value) => Some(value),
        Err(error) => {
            warn!(error = %error, "record cache task failed");
            None
        }
    }
}

/// Best-effort record cache over a [`KeyValueStore`](crate::store::KeyValueStore).
///
/// Storage failures never propagate; the cache behaves as empty instead.
/// Store access runs on tokio's blocking pool while the lock is held.
#[derive(Clone)]
pub struct RecordCache {
    inner: Arc<tokio::sync::RwLock<CacheInner>>,
}

impl RecordCache {
    pub fn new(store: SharedStore, policy: CachePolicy) -> Self {
        Self {
            inner: Arc::new(tokio::sync::RwLock::new(CacheInner { store, policy })),
        }
    }

    pub fn with_default_policy(store: SharedStore) -> Self {
        Self::new(store, CachePolicy::default())
    }

    /// Insert or replace by id, stamp now, prune by age, then truncate to capacity.
    pub async fn record(&self, record: CanonicalRecord) {
        let inner = self.inner.write().await;
        let worker = inner.clone();
        on_blocking_pool(move || worker.record(record)).await;
    }

    /// Uniformly random unexpired record, persisting the pruned set if it shrank.
    pub async fn sample_one(&self) -> Option<CanonicalRecord> {
        let inner = self.inner.write().await;
        let worker = inner.clone();
        on_blocking_pool(move || worker.sample_one()).await.flatten()
    }

    /// Stored entries, newest first. Expired entries are not filtered here.
    pub async fn entries(&self) -> Vec<CachedRecord> {
        let inner = self.inner.read().await;
        let worker = inner.clone();
        on_blocking_pool(move || worker.load())
            .await
            .unwrap_or_default()
    }

    pub async fn clear(&self) {
        let inner = self.inner.write().await;
        let worker = inner.clone();
        on_blocking_pool(move || worker.clear()).await;
    }

    pub async fn policy(&self) -> CachePolicy {
        self.inner.read().await.policy
    }
}
