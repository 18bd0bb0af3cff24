use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::{SourceId, ValidationError};

const CACHE_LABEL: &str = "cache";
const OFFLINE_LABEL: &str = "offline";

/// Where a canonical record came from.
///
/// Serializes as a plain string: the source label (for example
/// `dummyjson.com`), `cache`, or `offline`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Provenance {
    Source(SourceId),
    Cache,
    Offline,
}

impl Provenance {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Source(source) => source.label(),
            Self::Cache => CACHE_LABEL,
            Self::Offline => OFFLINE_LABEL,
        }
    }

    pub const fn is_live(self) -> bool {
        matches!(self, Self::Source(_))
    }

    pub const fn source(self) -> Option<SourceId> {
        match self {
            Self::Source(source) => Some(source),
            Self::Cache | Self::Offline => None,
        }
    }

    /// Human-facing label for display surfaces.
    pub fn display_label(self) -> String {
        format_source_label(self.as_str()).unwrap_or_else(|| self.as_str().to_owned())
    }
}

impl Display for Provenance {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provenance {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            CACHE_LABEL => Ok(Self::Cache),
            OFFLINE_LABEL => Ok(Self::Offline),
            other => SourceId::from_label(other).map(Self::Source).ok_or_else(|| {
                ValidationError::InvalidProvenance {
                    value: other.to_owned(),
                }
            }),
        }
    }
}

impl TryFrom<String> for Provenance {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Provenance> for String {
    fn from(value: Provenance) -> Self {
        value.as_str().to_owned()
    }
}

/// Formats a raw provenance or source string for display.
///
/// Returns `None` for an empty input. URLs collapse to their host name;
/// unparsable URLs and plain labels are returned unchanged.
pub fn format_source_label(source: &str) -> Option<String> {
    if source.is_empty() {
        return None;
    }

    match source {
        CACHE_LABEL => return Some(String::from("Cached result")),
        OFFLINE_LABEL => return Some(String::from("Offline fallback")),
        _ => {}
    }

    if source.starts_with("http://") || source.starts_with("https://") {
        return Some(
            Url::parse(source)
                .ok()
                .and_then(|url| url.host_str().map(str::to_owned))
                .unwrap_or_else(|| source.to_owned()),
        );
    }

    Some(source.to_owned())
}
