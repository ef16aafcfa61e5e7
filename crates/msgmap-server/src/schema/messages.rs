//! Message ingest/query request and response types.

use serde::{Deserialize, Serialize};

use msgmap_storage::StoredMessage;

/// Query parameters of one contract report. The schema itself travels as
/// the text/plain request body, not as a parameter.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestParams {
    pub direction: Option<String>,
    pub message_name: Option<String>,
    pub message_description: Option<String>,
    pub module_name: Option<String>,
    pub assembly_name: Option<String>,
    pub compilation_id: Option<String>,
    pub location: Option<String>,
}

/// Response from ingesting a report.
#[derive(Debug, Clone, Serialize)]
pub struct IngestResponse {
    /// Row id of the stored message.
    pub id: i64,
}

/// Response for listing all messages.
#[derive(Debug, Clone, Serialize)]
pub struct MessageListResponse {
    pub messages: Vec<StoredMessage>,
}

/// Response for the distinct-modules query.
#[derive(Debug, Clone, Serialize)]
pub struct ModulesResponse {
    pub modules: Vec<Option<String>>,
}

/// Response for the distinct-message-names query.
#[derive(Debug, Clone, Serialize)]
pub struct MessageNamesResponse {
    pub names: Vec<Option<String>>,
}
