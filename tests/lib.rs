//! Shared fixtures for the quoterace integration suites.

use quoterace_core::{CachedRecord, CanonicalRecord, Provenance, SourceId};

/// Live record from `source` whose text is derived from `id`.
pub fn live_record(id: &str, source: SourceId) -> CanonicalRecord {
    CanonicalRecord::new(
        id,
        format!("quote {id}"),
        Some(String::from("Someone")),
        Provenance::Source(source),
    )
    .expect("valid record")
}

/// Record ids in stored order.
pub fn entry_ids(entries: &[CachedRecord]) -> Vec<String> {
    entries
        .iter()
        .map(|entry| entry.record().id().to_owned())
        .collect()
}
