//! # Quoterace Core
//!
//! Acquisition engine that races several independent quote sources,
//! normalizes their response shapes into one canonical record, and degrades
//! to a local cache and then a bundled corpus so a caller always gets a
//! record within a bounded time.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`cache`] | Persisted, capacity- and age-bounded record cache |
//! | [`config`] | Engine configuration and `QUOTERACE_*` environment overrides |
//! | [`domain`] | Canonical record, provenance and timestamps |
//! | [`engine`] | `QuoteEngine` facade and its builder |
//! | [`error`] | Validation, configuration and storage errors |
//! | [`fallback`] | Cache-then-corpus fallback chain |
//! | [`fetch`] | Per-source outcomes and failure classification |
//! | [`http_client`] | HTTP transport abstraction (reqwest and scripted) |
//! | [`normalize`] | Per-source payload normalizers |
//! | [`race`] | First-valid-response-wins race coordinator |
//! | [`ratings`] | Record ratings store |
//! | [`registry`] | Source descriptors and registry |
//! | [`settings`] | Slideshow settings store |
//! | [`source`] | Known source identifiers |
//! | [`store`] | Key-value persistence backends |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use quoterace_core::{EngineConfig, QuoteEngine};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = QuoteEngine::from_config(&EngineConfig::from_env()?);
//!
//!     let result = engine.acquire(None).await;
//!     println!("{} ({})", result.record.text(), result.provenance);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  CLI / caller   │
//! └────────┬────────┘
//!          │ acquire
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │  QuoteEngine    │────▶│ Fallback Chain   │──▶ RecordCache / StaticCorpus
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ Race Coordinator│────▶│ HTTP Client      │
//! │ (one task/source)     │ (reqwest/scripted)
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ Normalizers     │
//! └─────────────────┘
//! ```

pub mod cache;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod fallback;
pub mod fetch;
pub mod http_client;
pub mod normalize;
pub mod race;
pub mod ratings;
pub mod registry;
pub mod settings;
pub mod source;
pub mod store;

pub use cache::{CachePolicy, RecordCache, DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_RETENTION};
pub use config::{EngineConfig, DEFAULT_DATA_DIR, DEFAULT_TIMEOUT};
pub use domain::{format_source_label, CachedRecord, CanonicalRecord, Provenance, UtcDateTime};
pub use engine::{EngineResult, QuoteEngine, QuoteEngineBuilder};
pub use error::{ConfigError, StoreError, ValidationError};
pub use fallback::{FallbackChain, StaticCorpus};
pub use fetch::{CancelReason, FetchError, FetchErrorKind, SourceFailure, SourceOutcome};
pub use http_client::{
    HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient, ScriptedHttpClient,
    ScriptedReply,
};
pub use race::{AggregateFailure, RaceCoordinator, RaceResult, RaceWin};
pub use ratings::{Rating, RatingsStore, MAX_RATING, MIN_RATING};
pub use registry::{SourceDescriptor, SourceRegistry, SourceRegistryBuilder};
pub use settings::{SettingsStore, SlideshowSettings};
pub use source::SourceId;
pub use store::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore, SharedStore};
