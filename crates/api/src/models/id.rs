use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// External identifier of a bundle entity (range, result, moniker, ...).
///
/// Correlation uses process-local integers; bundles store them as strings so
/// readers never depend on the numbering scheme of a particular indexer run.
/// The empty string is reserved for "no value".
#[derive(
    Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, JsonSchema,
)]
#[serde(transparent)]
pub struct Id(String);

impl Id {
    pub const NONE: Id = Id(String::new());

    /// Remaps a process-local id. Zero is the correlator's "unset" value.
    pub fn from_internal(id: u64) -> Self {
        if id == 0 {
            Self::NONE
        } else {
            Id(id.to_string())
        }
    }

    pub fn from_optional(id: Option<u64>) -> Self {
        id.map_or(Self::NONE, Self::from_internal)
    }

    pub fn is_none(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Id(s.to_string())
    }
}

impl From<String> for Id {
    fn from(s: String) -> Self {
        Id(s)
    }
}
