//! Degraded answers used after every live source failed.

use tracing::debug;

use crate::cache::RecordCache;
use crate::{CanonicalRecord, Provenance};

/// Static corpus entry; `(id, text, author)`.
type CorpusEntry = (&'static str, &'static str, &'static str);

const BUNDLED_QUOTES: [CorpusEntry; 3] = [
    (
        "fallback-1",
        "The only way to do great work is to love what you do.",
        "Steve Jobs",
    ),
    (
        "fallback-2",
        "Innovation distinguishes between a leader and a follower.",
        "Steve Jobs",
    ),
    (
        "fallback-3",
        "Life is what happens to you while you are busy making other plans.",
        "John Lennon",
    ),
];

/// Bundled, non-empty set of records tagged `offline`.
///
/// Non-emptiness is structural: there is always a first record.
#[derive(Debug, Clone)]
pub struct StaticCorpus {
    first: CanonicalRecord,
    rest: Vec<CanonicalRecord>,
}

impl Default for StaticCorpus {
    fn default() -> Self {
        let [(id, text, author), remaining @ ..] = BUNDLED_QUOTES;
        Self {
            first: CanonicalRecord::bundled(id, text, author),
            rest: remaining
                .iter()
                .map(|&(id, text, author)| CanonicalRecord::bundled(id, text, author))
                .collect(),
        }
    }
}

impl StaticCorpus {
    /// `None` when `records` is empty; every record is re-tagged `offline`.
    pub fn new(records: Vec<CanonicalRecord>) -> Option<Self> {
        let mut records = records
            .into_iter()
            .map(|record| record.with_provenance(Provenance::Offline));
        let first = records.next()?;
        Some(Self {
            first,
            rest: records.collect(),
        })
    }

    pub fn records(&self) -> impl Iterator<Item = &CanonicalRecord> {
        std::iter::once(&self.first).chain(self.rest.iter())
    }

    pub fn len(&self) -> usize {
        1 + self.rest.len()
    }

    /// Uniformly random entry.
    pub fn pick(&self) -> CanonicalRecord {
        match fastrand::usize(..self.len()) {
            0 => self.first.clone(),
            index => self.rest[index - 1].clone(),
        }
    }
}

/// Cache first, then the static corpus.
#[derive(Clone)]
pub struct FallbackChain {
    cache: RecordCache,
    corpus: StaticCorpus,
}

impl FallbackChain {
    pub fn new(cache: RecordCache, corpus: StaticCorpus) -> Self {
        Self { cache, corpus }
    }

    /// Never fails: the corpus always has at least one record.
    pub async fn resolve(&self) -> CanonicalRecord {
        if let Some(record) = self.cache.sample_one().await {
            debug!(id = record.id(), "serving cached record");
            return record.with_provenance(Provenance::Cache);
        }

        debug!("cache empty, serving offline record");
        self.corpus.pick()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::store::MemoryKeyValueStore;
    use crate::SourceId;

    #[test]
    fn bundled_corpus_is_complete_and_offline() {
        let corpus = StaticCorpus::default();
        assert_eq!(corpus.len(), BUNDLED_QUOTES.len());
        assert!(corpus.records().all(|record| {
            record.provenance() == Provenance::Offline
                && !record.text().trim().is_empty()
                && !record.id().is_empty()
        }));
    }

    #[test]
    fn empty_corpus_is_rejected() {
        assert!(StaticCorpus::new(Vec::new()).is_none());
    }

    #[tokio::test]
    async fn cached_record_is_preferred_and_retagged() {
        let cache = RecordCache::with_default_policy(Arc::new(MemoryKeyValueStore::new()));
        let live = CanonicalRecord::new(
            "user-1",
            "Ms Ada Lovelace",
            None,
            Provenance::Source(SourceId::Randomuser),
        )
        .expect("valid record");
        cache.record(live).await;

        let chain = FallbackChain::new(cache, StaticCorpus::default());
        let record = chain.resolve().await;

        assert_eq!(record.id(), "user-1");
        assert_eq!(record.provenance(), Provenance::Cache);
    }

    #[tokio::test]
    async fn empty_cache_falls_through_to_corpus() {
        let cache = RecordCache::with_default_policy(Arc::new(MemoryKeyValueStore::new()));
        let chain = FallbackChain::new(cache, StaticCorpus::default());

        let record = chain.resolve().await;

        assert_eq!(record.provenance(), Provenance::Offline);
        assert!(record.id().starts_with("fallback-"));
    }
}
