use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Debug, Formatter};

use serde_json::Value;

use crate::normalize::{normalizer_for, Normalizer};
use crate::{CanonicalRecord, SourceId, ValidationError};

/// One upstream endpoint paired with its normalizer.
///
/// The normalizer is bound from the [`SourceId`] when the descriptor is
/// built, never by inspecting the address.
#[derive(Clone)]
pub struct SourceDescriptor {
    id: SourceId,
    address: String,
    normalize: Normalizer,
}

impl SourceDescriptor {
    pub fn new(id: SourceId, address: impl Into<String>) -> Self {
        Self {
            id,
            address: address.into(),
            normalize: normalizer_for(id),
        }
    }

    pub fn with_default_address(id: SourceId) -> Self {
        Self::new(id, id.default_address())
    }

    pub const fn id(&self) -> SourceId {
        self.id
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn normalize(&self, payload: &Value) -> Result<CanonicalRecord, ValidationError> {
        (self.normalize)(payload)
    }
}

impl Debug for SourceDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceDescriptor")
            .field("id", &self.id)
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// Fixed, ordered set of sources raced per invocation.
///
/// Order only affects diagnostics; it never decides the winner.
#[derive(Debug, Clone)]
pub struct SourceRegistry {
    sources: Vec<SourceDescriptor>,
}

impl Default for SourceRegistry {
    fn default() -> Self {
        SourceRegistryBuilder::new().build()
    }
}

impl SourceRegistry {
    pub fn new(sources: Vec<SourceDescriptor>) -> Self {
        Self { sources }
    }

    pub fn builder() -> SourceRegistryBuilder {
        SourceRegistryBuilder::new()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SourceDescriptor> {
        self.sources.iter()
    }

    pub fn get(&self, id: SourceId) -> Option<&SourceDescriptor> {
        self.sources.iter().find(|descriptor| descriptor.id == id)
    }

    pub fn ids(&self) -> Vec<SourceId> {
        self.sources.iter().map(SourceDescriptor::id).collect()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

/// Builder for a [`SourceRegistry`] over the known sources.
///
/// # Example
///
/// ```rust,ignore
/// use quoterace_core::{SourceId, SourceRegistry};
///
/// let registry = SourceRegistry::builder()
///     .with_source_enabled(SourceId::Randomuser, false)
///     .with_address(SourceId::Dummyjson, "http://localhost:8080/quote")
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct SourceRegistryBuilder {
    enabled: BTreeSet<SourceId>,
    addresses: BTreeMap<SourceId, String>,
}

impl Default for SourceRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceRegistryBuilder {
    /// All known sources enabled at their default addresses.
    pub fn new() -> Self {
        Self {
            enabled: SourceId::ALL.into_iter().collect(),
            addresses: BTreeMap::new(),
        }
    }

    /// Start from an empty set and enable only the listed sources.
    pub fn only(sources: impl IntoIterator<Item = SourceId>) -> Self {
        Self {
            enabled: sources.into_iter().collect(),
            addresses: BTreeMap::new(),
        }
    }

    pub fn with_source_enabled(mut self, source: SourceId, enabled: bool) -> Self {
        if enabled {
            self.enabled.insert(source);
        } else {
            self.enabled.remove(&source);
        }
        self
    }

    pub fn with_address(mut self, source: SourceId, address: impl Into<String>) -> Self {
        self.addresses.insert(source, address.into());
        self
    }

    pub fn build(self) -> SourceRegistry {
        let sources = SourceId::ALL
            .into_iter()
            .filter(|source| self.enabled.contains(source))
            .map(|source| match self.addresses.get(&source) {
                Some(address) => SourceDescriptor::new(source, address.clone()),
                None => SourceDescriptor::with_default_address(source),
            })
            .collect();

        SourceRegistry::new(sources)
    }
}
