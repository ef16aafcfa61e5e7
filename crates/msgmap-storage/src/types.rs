//! Row types for catalog ingest and queries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One incoming contract report, as received from a scanner or analyzer.
///
/// Every field is optional at the wire level; the supersession rule keys on
/// `assembly_name` and `compilation_id` as-is (absent values compare as
/// absent).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestRecord {
    pub direction: Option<String>,
    pub message_name: Option<String>,
    pub message_schema: Option<String>,
    pub message_description: Option<String>,
    pub module_name: Option<String>,
    pub assembly_name: Option<String>,
    pub compilation_id: Option<String>,
    pub location: Option<String>,
}

/// One stored catalog row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredMessage {
    pub id: i64,
    pub direction: Option<String>,
    pub message_name: Option<String>,
    pub message_schema: Option<String>,
    pub message_description: Option<String>,
    pub module_name: Option<String>,
    pub assembly_name: Option<String>,
    pub compilation_id: Option<String>,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}
