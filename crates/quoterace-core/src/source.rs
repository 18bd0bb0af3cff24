use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Canonical identifiers of the upstream quote sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceId {
    Dummyjson,
    Zenquotes,
    Programming,
    Catfact,
    Randomuser,
}

impl SourceId {
    pub const ALL: [Self; 5] = [
        Self::Dummyjson,
        Self::Zenquotes,
        Self::Programming,
        Self::Catfact,
        Self::Randomuser,
    ];

    /// Short name used on the command line and in configuration.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dummyjson => "dummyjson",
            Self::Zenquotes => "zenquotes",
            Self::Programming => "programming",
            Self::Catfact => "catfact",
            Self::Randomuser => "randomuser",
        }
    }

    /// Fixed provenance label stamped on records this source produces.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Dummyjson => "dummyjson.com",
            Self::Zenquotes => "api.viewbits.com",
            Self::Programming => "programming-quotesapi.vercel.app",
            Self::Catfact => "catfact.ninja",
            Self::Randomuser => "randomuser.me",
        }
    }

    pub const fn default_address(self) -> &'static str {
        match self {
            Self::Dummyjson => "https://dummyjson.com/quotes/random",
            Self::Zenquotes => "https://api.viewbits.com/v1/zenquotes?mode=random",
            Self::Programming => "https://programming-quotesapi.vercel.app/api/random",
            Self::Catfact => "https://catfact.ninja/fact",
            Self::Randomuser => "https://randomuser.me/api/",
        }
    }

    /// Environment variable that overrides [`default_address`](Self::default_address).
    pub const fn address_env_var(self) -> &'static str {
        match self {
            Self::Dummyjson => "QUOTERACE_DUMMYJSON_URL",
            Self::Zenquotes => "QUOTERACE_ZENQUOTES_URL",
            Self::Programming => "QUOTERACE_PROGRAMMING_URL",
            Self::Catfact => "QUOTERACE_CATFACT_URL",
            Self::Randomuser => "QUOTERACE_RANDOMUSER_URL",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|source| source.label() == label)
    }
}

impl Display for SourceId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceId {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "dummyjson" => Ok(Self::Dummyjson),
            "zenquotes" => Ok(Self::Zenquotes),
            "programming" => Ok(Self::Programming),
            "catfact" => Ok(Self::Catfact),
            "randomuser" => Ok(Self::Randomuser),
            other => Err(ValidationError::InvalidSource {
                value: other.to_owned(),
            }),
        }
    }
}
