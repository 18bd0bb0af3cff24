//! # Domain Models
//!
//! Canonical domain types for quoterace.
//!
//! ## Models
//!
//! | Type | Description |
//! |------|-------------|
//! | [`CanonicalRecord`] | Normalized quote with non-empty text |
//! | [`CachedRecord`] | Canonical record plus its cache timestamp |
//! | [`Provenance`] | Live source label, `cache`, or `offline` |
//! | [`UtcDateTime`] | UTC timestamp |
//!
//! ## Validation
//!
//! Invariants are enforced at construction time, including when records are
//! read back from persisted storage:
//!
//! ```rust,ignore
//! use quoterace_core::{CanonicalRecord, Provenance, ValidationError};
//!
//! let empty = CanonicalRecord::new("q-1", "", None, Provenance::Offline);
//! assert!(matches!(empty, Err(ValidationError::MissingText { .. })));
//! ```

mod provenance;
mod record;
mod timestamp;

pub use provenance::{format_source_label, Provenance};
pub use record::{CachedRecord, CanonicalRecord};
pub use timestamp::UtcDateTime;
