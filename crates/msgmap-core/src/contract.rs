//! Contract records and catalog entries.
//!
//! A [`ContractRecord`] is one observation of a declared publish/subscribe
//! intent at a single source location. The merger reduces many records into
//! [`CatalogEntry`] values, the durable catalog shape. Both serialize with
//! PascalCase field names; that layout is the catalog file format.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Whether a contract declares publishing or subscribing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Publish,
    Subscribe,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Publish => write!(f, "Publish"),
            Direction::Subscribe => write!(f, "Subscribe"),
        }
    }
}

/// One extracted contract observation, pre-merge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContractRecord {
    /// Message name. Records with an empty name are discarded by the merger.
    pub name: String,
    /// Synthesized payload schema; `None` when the payload type was
    /// unresolvable at the declaration site.
    pub schema: Option<String>,
    pub description: Option<String>,
    pub module: Option<String>,
    /// Compilation-unit identity of the declaring project.
    pub assembly: String,
    /// `path:line` of the declaration site.
    pub location: String,
    pub direction: Direction,
}

/// One deduplicated catalog entry, post-merge.
///
/// Same shape as [`ContractRecord`], but `location` is a newline-joined list
/// of every contributing site and the scalar fields are the winners of
/// conflict resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CatalogEntry {
    pub name: String,
    pub schema: Option<String>,
    pub description: Option<String>,
    pub module: Option<String>,
    pub assembly: String,
    pub location: String,
    pub direction: Direction,
}

impl From<CatalogEntry> for ContractRecord {
    fn from(entry: CatalogEntry) -> Self {
        ContractRecord {
            name: entry.name,
            schema: entry.schema,
            description: entry.description,
            module: entry.module,
            assembly: entry.assembly,
            location: entry.location,
            direction: entry.direction,
        }
    }
}
