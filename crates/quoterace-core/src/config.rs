//! Engine configuration with environment-variable overrides.
//!
//! | Variable | Meaning |
//! |----------|---------|
//! | `QUOTERACE_TIMEOUT_MS` | race deadline in milliseconds |
//! | `QUOTERACE_REQUEST_TIMEOUT_MS` | optional cap on each individual request |
//! | `QUOTERACE_DATA_DIR` | directory holding the persisted stores |
//! | `QUOTERACE_DISABLED_SOURCES` | comma-separated source names to skip |
//! | `QUOTERACE_<SOURCE>_URL` | address override for one source |

use std::collections::{BTreeMap, BTreeSet};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::cache::{CachePolicy, DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_RETENTION};
use crate::registry::{SourceRegistry, SourceRegistryBuilder};
use crate::{ConfigError, SourceId};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5_000);
pub const DEFAULT_DATA_DIR: &str = ".quoterace";

const TIMEOUT_ENV: &str = "QUOTERACE_TIMEOUT_MS";
const REQUEST_TIMEOUT_ENV: &str = "QUOTERACE_REQUEST_TIMEOUT_MS";
const DATA_DIR_ENV: &str = "QUOTERACE_DATA_DIR";
const DISABLED_SOURCES_ENV: &str = "QUOTERACE_DISABLED_SOURCES";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub timeout: Duration,
    pub per_request_timeout: Option<Duration>,
    pub cache_capacity: usize,
    pub cache_retention: Duration,
    pub data_dir: PathBuf,
    pub disabled_sources: BTreeSet<SourceId>,
    pub address_overrides: BTreeMap<SourceId, String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            per_request_timeout: None,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            cache_retention: DEFAULT_CACHE_RETENTION,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            disabled_sources: BTreeSet::new(),
            address_overrides: BTreeMap::new(),
        }
    }
}

impl EngineConfig {
    /// Defaults overlaid with `QUOTERACE_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`EngineConfig::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(TIMEOUT_ENV) {
            config.timeout = parse_millis(TIMEOUT_ENV, &value)?;
        }
        if let Some(value) = lookup(REQUEST_TIMEOUT_ENV) {
            config.per_request_timeout = Some(parse_millis(REQUEST_TIMEOUT_ENV, &value)?);
        }
        if let Some(value) = lookup(DATA_DIR_ENV).filter(|value| !value.trim().is_empty()) {
            config.data_dir = PathBuf::from(value);
        }
        if let Some(value) = lookup(DISABLED_SOURCES_ENV) {
            for name in value.split(',').map(str::trim).filter(|name| !name.is_empty()) {
                let source = name.parse::<SourceId>().map_err(|error| ConfigError::InvalidEnv {
                    name: DISABLED_SOURCES_ENV,
                    value: value.clone(),
                    reason: error.to_string(),
                })?;
                config.disabled_sources.insert(source);
            }
        }
        for source in SourceId::ALL {
            if let Some(address) = lookup(source.address_env_var()) {
                let address = address.trim();
                if address.is_empty() {
                    continue;
                }
                url::Url::parse(address).map_err(|error| ConfigError::InvalidEnv {
                    name: source.address_env_var(),
                    value: address.to_owned(),
                    reason: error.to_string(),
                })?;
                config.address_overrides.insert(source, address.to_owned());
            }
        }

        Ok(config)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    pub fn cache_policy(&self) -> CachePolicy {
        CachePolicy {
            capacity: self.cache_capacity,
            retention: self.cache_retention,
        }
    }

    pub fn registry(&self) -> SourceRegistry {
        let mut builder = SourceRegistryBuilder::new();
        for source in &self.disabled_sources {
            builder = builder.with_source_enabled(*source, false);
        }
        for (source, address) in &self.address_overrides {
            builder = builder.with_address(*source, address.clone());
        }
        builder.build()
    }
}

fn parse_millis(name: &'static str, value: &str) -> Result<Duration, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidEnv {
        name,
        value: value.to_owned(),
        reason: reason.to_owned(),
    };

    let millis = value
        .trim()
        .parse::<u64>()
        .map_err(|_| invalid("expected a whole number of milliseconds"))?;
    if millis == 0 {
        return Err(invalid("must be greater than zero"));
    }
    Ok(Duration::from_millis(millis))
}
