use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::store::{SharedStore, SETTINGS_KEY};
use crate::{StoreError, ValidationError};

pub const MIN_INTERVAL_SECONDS: u64 = 1;

/// Slideshow settings as persisted: `{enabled, intervalSeconds}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredSettings")]
pub struct SlideshowSettings {
    pub enabled: bool,
    pub interval_seconds: u64,
}

/// Stored shape; a missing or `null` field falls back to its own default.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSettings {
    enabled: Option<bool>,
    interval_seconds: Option<u64>,
}

impl From<StoredSettings> for SlideshowSettings {
    fn from(stored: StoredSettings) -> Self {
        let defaults = Self::default();
        Self {
            enabled: stored.enabled.unwrap_or(defaults.enabled),
            interval_seconds: stored.interval_seconds.unwrap_or(defaults.interval_seconds),
        }
    }
}

impl Default for SlideshowSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_seconds: 7,
        }
    }
}

impl SlideshowSettings {
    pub fn validate(self) -> Result<Self, ValidationError> {
        if self.interval_seconds < MIN_INTERVAL_SECONDS {
            return Err(ValidationError::IntervalTooShort {
                value: self.interval_seconds,
                min: MIN_INTERVAL_SECONDS,
            });
        }
        Ok(self)
    }

    pub const fn interval(self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }
}

/// Load-at-startup, save-on-change access to [`SlideshowSettings`].
#[derive(Clone)]
pub struct SettingsStore {
    store: SharedStore,
}

impl SettingsStore {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Persisted settings, or defaults when absent, corrupt, or invalid.
    pub fn load(&self) -> SlideshowSettings {
        let raw = match self.store.get(SETTINGS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return SlideshowSettings::default(),
            Err(error) => {
                warn!(error = %error, "failed to read slideshow settings, using defaults");
                return SlideshowSettings::default();
            }
        };

        let parsed = serde_json::from_str::<SlideshowSettings>(&raw)
            .map_err(|error| error.to_string())
            .and_then(|settings| settings.validate().map_err(|error| error.to_string()));
        match parsed {
            Ok(settings) => settings,
            Err(reason) => {
                warn!(reason = %reason, "slideshow settings are invalid, using defaults");
                SlideshowSettings::default()
            }
        }
    }

    pub fn save(&self, settings: SlideshowSettings) -> Result<(), ValidationError> {
        let settings = settings.validate()?;
        let result = serde_json::to_string(&settings)
            .map_err(|source| StoreError::Encoding {
                key: String::from(SETTINGS_KEY),
                source,
            })
            .and_then(|encoded| self.store.set(SETTINGS_KEY, &encoded));

        if let Err(error) = result {
            warn!(error = %error, "failed to persist slideshow settings");
        }
        Ok(())
    }
}
