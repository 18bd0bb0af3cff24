//! Per-source request outcomes and their error classification.

use std::fmt::{Display, Formatter};

use serde::{Serialize, Serializer};

use crate::{CanonicalRecord, SourceId, ValidationError};

/// Classification of a single source failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchErrorKind {
    /// Transport or connection failure.
    Network,
    /// Upstream answered with a non-2xx status.
    HttpStatus,
    /// Payload could not be decoded or normalized.
    Validation,
    /// Request abandoned because the race was won elsewhere or the deadline fired.
    Cancelled,
}

impl FetchErrorKind {
    pub const fn code(self) -> &'static str {
        match self {
            Self::Network => "fetch.network",
            Self::HttpStatus => "fetch.http_status",
            Self::Validation => "fetch.validation",
            Self::Cancelled => "fetch.cancelled",
        }
    }
}

/// Why a request was cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CancelReason {
    RaceWon,
    Deadline,
}

/// Structured per-source error collected by the race coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    kind: FetchErrorKind,
    message: String,
    status: Option<u16>,
}

impl FetchError {
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::Network,
            message: message.into(),
            status: None,
        }
    }

    pub fn http_status(status: u16) -> Self {
        Self {
            kind: FetchErrorKind::HttpStatus,
            message: format!("HTTP error! status: {status}"),
            status: Some(status),
        }
    }

    pub fn validation(error: &ValidationError) -> Self {
        Self {
            kind: FetchErrorKind::Validation,
            message: error.to_string(),
            status: None,
        }
    }

    pub fn cancelled(reason: CancelReason) -> Self {
        let message = match reason {
            CancelReason::RaceWon => "request cancelled: another source won the race",
            CancelReason::Deadline => "request cancelled: deadline expired",
        };
        Self {
            kind: FetchErrorKind::Cancelled,
            message: String::from(message),
            status: None,
        }
    }

    pub const fn kind(&self) -> FetchErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn status(&self) -> Option<u16> {
        self.status
    }

    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }
}

impl Display for FetchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for FetchError {}

impl Serialize for FetchError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        #[derive(Serialize)]
        struct Wire<'a> {
            code: &'static str,
            message: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            status: Option<u16>,
        }

        Wire {
            code: self.code(),
            message: &self.message,
            status: self.status,
        }
        .serialize(serializer)
    }
}

/// A failure attributed to one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFailure {
    pub source: SourceId,
    pub error: FetchError,
}

impl Display for SourceFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.source, self.error)
    }
}

/// Result of one in-flight request; produced exactly once per source per race.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOutcome {
    Success {
        record: CanonicalRecord,
        source: SourceId,
    },
    Failure(SourceFailure),
}

impl SourceOutcome {
    pub fn failure(source: SourceId, error: FetchError) -> Self {
        Self::Failure(SourceFailure { source, error })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_error_keeps_status() {
        let error = FetchError::http_status(500);
        assert_eq!(error.kind(), FetchErrorKind::HttpStatus);
        assert_eq!(error.status(), Some(500));
        assert_eq!(error.to_string(), "HTTP error! status: 500 (fetch.http_status)");
    }

    #[test]
    fn validation_error_carries_message() {
        let error = FetchError::validation(&ValidationError::MissingText { field: "quote" });
        assert_eq!(error.code(), "fetch.validation");
        assert!(error.message().contains("Missing quote text"));
    }

    #[test]
    fn failure_serializes_with_code() {
        let failure = SourceFailure {
            source: SourceId::Catfact,
            error: FetchError::cancelled(CancelReason::Deadline),
        };

        let value = serde_json::to_value(&failure).expect("serializes");

        assert_eq!(value["source"], "catfact");
        assert_eq!(value["error"]["code"], "fetch.cancelled");
        assert!(value["error"].get("status").is_none());
    }
}
