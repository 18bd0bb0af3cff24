use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{info, warn};

use crate::cache::{CachePolicy, RecordCache};
use crate::config::{EngineConfig, DEFAULT_TIMEOUT};
use crate::fallback::{FallbackChain, StaticCorpus};
use crate::fetch::SourceFailure;
use crate::http_client::{HttpClient, ReqwestHttpClient};
use crate::race::RaceCoordinator;
use crate::registry::SourceRegistry;
use crate::store::{FileKeyValueStore, MemoryKeyValueStore, SharedStore};
use crate::{CanonicalRecord, Provenance};

/// Output of one [`QuoteEngine::acquire`] call.
#[derive(Debug, Clone, Serialize)]
pub struct EngineResult {
    pub record: CanonicalRecord,
    pub provenance: Provenance,
    pub latency_ms: u64,
    /// Per-source diagnostics; never an error for the caller.
    pub failures: Vec<SourceFailure>,
}

/// Race, then fall back. The single entry point for presentation code.
#[derive(Clone)]
pub struct QuoteEngine {
    registry: Arc<SourceRegistry>,
    coordinator: RaceCoordinator,
    cache: RecordCache,
    fallback: FallbackChain,
    store: SharedStore,
    default_timeout: Duration,
}

impl QuoteEngine {
    pub fn builder() -> QuoteEngineBuilder {
        QuoteEngineBuilder::default()
    }

    /// Production wiring: reqwest transport and file-backed stores under `config.data_dir`.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::builder()
            .with_registry(config.registry())
            .with_http_client(Arc::new(ReqwestHttpClient::new()))
            .with_store(Arc::new(FileKeyValueStore::new(config.data_dir.clone())))
            .with_cache_policy(config.cache_policy())
            .with_default_timeout(config.timeout)
            .with_request_timeout(config.per_request_timeout)
            .build()
    }

    /// Always yields a record: live winner, else a cached record, else the offline corpus.
    pub async fn acquire(&self, timeout: Option<Duration>) -> EngineResult {
        let started = Instant::now();
        let deadline = timeout.unwrap_or(self.default_timeout);

        match self.coordinator.race(&self.registry, deadline).await {
            Ok(win) => {
                self.cache.record(win.record.clone()).await;
                EngineResult {
                    provenance: win.record.provenance(),
                    record: win.record,
                    latency_ms: elapsed_ms(started),
                    failures: win.failures,
                }
            }
            Err(failure) => {
                warn!(
                    sources = failure.failures.len(),
                    deadline_expired = failure.deadline_expired,
                    "{failure}; using fallback"
                );
                let record = self.fallback.resolve().await;
                info!(provenance = %record.provenance(), id = record.id(), "served fallback record");
                EngineResult {
                    provenance: record.provenance(),
                    record,
                    latency_ms: elapsed_ms(started),
                    failures: failure.failures,
                }
            }
        }
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    pub fn cache(&self) -> &RecordCache {
        &self.cache
    }

    /// Key-value store shared with ratings and settings.
    pub fn store(&self) -> SharedStore {
        Arc::clone(&self.store)
    }

    pub const fn default_timeout(&self) -> Duration {
        self.default_timeout
    }
}

/// Builder for [`QuoteEngine`].
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use quoterace_core::{MemoryKeyValueStore, QuoteEngine, ScriptedHttpClient};
///
/// let engine = QuoteEngine::builder()
///     .with_http_client(Arc::new(ScriptedHttpClient::new()))
///     .with_store(Arc::new(MemoryKeyValueStore::new()))
///     .build();
/// ```
#[derive(Default)]
pub struct QuoteEngineBuilder {
    registry: Option<SourceRegistry>,
    http_client: Option<Arc<dyn HttpClient>>,
    store: Option<SharedStore>,
    cache_policy: CachePolicy,
    corpus: Option<StaticCorpus>,
    default_timeout: Option<Duration>,
    request_timeout: Option<Duration>,
}

impl QuoteEngineBuilder {
    pub fn with_registry(mut self, registry: SourceRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn with_http_client(mut self, http_client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(http_client);
        self
    }

    pub fn with_store(mut self, store: SharedStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_cache_policy(mut self, policy: CachePolicy) -> Self {
        self.cache_policy = policy;
        self
    }

    pub fn with_corpus(mut self, corpus: StaticCorpus) -> Self {
        self.corpus = Some(corpus);
        self
    }

    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = Some(timeout);
        self
    }

    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Unset collaborators default to all sources, reqwest, and an in-memory store.
    pub fn build(self) -> QuoteEngine {
        let http_client = self
            .http_client
            .unwrap_or_else(|| Arc::new(ReqwestHttpClient::new()));
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryKeyValueStore::new()));
        let cache = RecordCache::new(Arc::clone(&store), self.cache_policy);
        let fallback = FallbackChain::new(cache.clone(), self.corpus.unwrap_or_default());

        QuoteEngine {
            registry: Arc::new(self.registry.unwrap_or_default()),
            coordinator: RaceCoordinator::new(http_client).with_request_timeout(self.request_timeout),
            cache,
            fallback,
            store,
            default_timeout: self.default_timeout.unwrap_or(DEFAULT_TIMEOUT),
        }
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis().min(u128::from(u64::MAX)) as u64
}
