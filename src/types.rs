use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

/// A nested configuration tree. Interior nodes are `Value::Object`.
pub type ConfigMap = Map<String, Value>;

/// The type an override's raw string is cast to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    String,
    Boolean,
    Integer,
    Float,
    Json,
}

impl ValueKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::String => "string",
            ValueKind::Boolean => "boolean",
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
            ValueKind::Json => "json",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One parsed `path=value` override, already cast to its typed value.
#[derive(Debug, Clone, PartialEq)]
pub struct OverrideEntry {
    /// Dotted path, e.g. `"section.key"`.
    pub path: String,
    pub value: Value,
    /// The flag occurrence this entry was parsed from, when it came from a
    /// command line. Errors raised while applying the entry name it.
    pub origin: Option<OverrideOrigin>,
}

/// A flag and the raw text it was given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideOrigin {
    pub flag: String,
    pub raw: String,
}
