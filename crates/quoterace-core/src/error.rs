use thiserror::Error;

/// Validation and contract errors exposed by `quoterace-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing quote text (field '{field}')")]
    MissingText { field: &'static str },
    #[error("invalid response format: expected {expected}")]
    InvalidFormat { expected: &'static str },
    #[error("response array '{field}' must contain at least one element")]
    EmptyArray { field: &'static str },
    #[error("malformed payload: {reason}")]
    MalformedPayload { reason: String },

    #[error("record id cannot be empty")]
    EmptyRecordId,
    #[error("invalid provenance '{value}', expected a source label, 'cache' or 'offline'")]
    InvalidProvenance { value: String },
    #[error("invalid source '{value}', expected one of dummyjson, zenquotes, programming, catfact, randomuser")]
    InvalidSource { value: String },

    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },

    #[error("rating must be between {min} and {max}: {value}")]
    RatingOutOfRange { value: i64, min: u8, max: u8 },
    #[error("slideshow interval must be at least {min} second(s): {value}")]
    IntervalTooShort { value: u64, min: u64 },
}

/// Configuration errors raised while reading engine settings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("environment variable {name} has invalid value '{value}': {reason}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        reason: String,
    },
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Failures of the persistent key-value layer.
///
/// Callers in this crate log and swallow these; they are surfaced only by the
/// raw [`KeyValueStore`](crate::store::KeyValueStore) API.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage i/o failed for key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("storage encoding failed for key '{key}': {source}")]
    Encoding {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("storage key '{key}' is not a valid key name")]
    InvalidKey { key: String },
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
}
