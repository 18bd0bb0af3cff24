use serde::{Deserialize, Serialize};

use crate::{Provenance, UtcDateTime, ValidationError};

/// Canonical quote record every source is normalized into.
///
/// `text` is never empty: construction and deserialization both reject it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RecordFields")]
pub struct CanonicalRecord {
    id: String,
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    author: Option<String>,
    provenance: Provenance,
}

impl CanonicalRecord {
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        author: Option<String>,
        provenance: Provenance,
    ) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::EmptyRecordId);
        }

        let text = text.into();
        if text.trim().is_empty() {
            return Err(ValidationError::MissingText { field: "text" });
        }

        let author = author
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());

        Ok(Self {
            id,
            text,
            author,
            provenance,
        })
    }

    /// Compile-time corpus entries; covered by the corpus tests instead of runtime checks.
    pub(crate) fn bundled(id: &'static str, text: &'static str, author: &'static str) -> Self {
        Self {
            id: id.to_owned(),
            text: text.to_owned(),
            author: Some(author.to_owned()),
            provenance: Provenance::Offline,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    pub const fn provenance(&self) -> Provenance {
        self.provenance
    }

    /// Same record re-attributed, e.g. when it is served from the cache.
    pub fn with_provenance(mut self, provenance: Provenance) -> Self {
        self.provenance = provenance;
        self
    }
}

#[derive(Deserialize)]
struct RecordFields {
    id: String,
    text: String,
    #[serde(default)]
    author: Option<String>,
    provenance: Provenance,
}

impl TryFrom<RecordFields> for CanonicalRecord {
    type Error = ValidationError;

    fn try_from(fields: RecordFields) -> Result<Self, Self::Error> {
        Self::new(fields.id, fields.text, fields.author, fields.provenance)
    }
}

/// Canonical record plus the time it entered the cache.
///
/// Persisted as `{id, text, author?, provenance, cachedAt}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CachedRecordWire", into = "CachedRecordWire")]
pub struct CachedRecord {
    record: CanonicalRecord,
    cached_at: UtcDateTime,
}

impl CachedRecord {
    pub fn new(record: CanonicalRecord, cached_at: UtcDateTime) -> Self {
        Self { record, cached_at }
    }

    pub fn record(&self) -> &CanonicalRecord {
        &self.record
    }

    pub fn into_record(self) -> CanonicalRecord {
        self.record
    }

    pub const fn cached_at(&self) -> UtcDateTime {
        self.cached_at
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CachedRecordWire {
    id: String,
    text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    author: Option<String>,
    provenance: Provenance,
    cached_at: UtcDateTime,
}

impl TryFrom<CachedRecordWire> for CachedRecord {
    type Error = ValidationError;

    fn try_from(wire: CachedRecordWire) -> Result<Self, Self::Error> {
        let record = CanonicalRecord::new(wire.id, wire.text, wire.author, wire.provenance)?;
        Ok(Self::new(record, wire.cached_at))
    }
}

impl From<CachedRecord> for CachedRecordWire {
    fn from(value: CachedRecord) -> Self {
        let CanonicalRecord {
            id,
            text,
            author,
            provenance,
        } = value.record;
        Self {
            id,
            text,
            author,
            provenance,
            cached_at: value.cached_at,
        }
    }
}
