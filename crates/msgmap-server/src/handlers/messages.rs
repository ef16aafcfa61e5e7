//! Message ingest and query handlers.

use axum::extract::{Query, State};
use axum::Json;

use msgmap_storage::IngestRecord;

use crate::error::ApiError;
use crate::schema::messages::{
    IngestParams, IngestResponse, MessageListResponse, MessageNamesResponse, ModulesResponse,
};
use crate::state::AppState;

/// Ingests one contract report.
///
/// `POST /messages` -- metadata as query parameters, the synthesized schema
/// as a text/plain body. Prior rows for the reporting assembly with a
/// differing compilation id are superseded before the insert.
pub async fn ingest(
    State(state): State<AppState>,
    Query(params): Query<IngestParams>,
    body: String,
) -> Result<Json<IngestResponse>, ApiError> {
    let record = IngestRecord {
        direction: trimmed(params.direction),
        message_name: trimmed(params.message_name),
        message_schema: trimmed(Some(body)),
        message_description: trimmed(params.message_description),
        module_name: trimmed(params.module_name),
        assembly_name: trimmed(params.assembly_name),
        compilation_id: trimmed(params.compilation_id),
        location: trimmed(params.location),
    };
    let mut store = state.store.lock().await;
    let id = store.ingest(&record)?;
    tracing::debug!(id, message = ?record.message_name, "contract report ingested");
    Ok(Json(IngestResponse { id }))
}

/// Lists all stored messages.
///
/// `GET /messages`
pub async fn list(State(state): State<AppState>) -> Result<Json<MessageListResponse>, ApiError> {
    let store = state.store.lock().await;
    let messages = store.list()?;
    Ok(Json(MessageListResponse { messages }))
}

/// Distinct module names (assembly name where no module was reported).
///
/// `GET /modules`
pub async fn distinct_modules(
    State(state): State<AppState>,
) -> Result<Json<ModulesResponse>, ApiError> {
    let store = state.store.lock().await;
    let modules = store.distinct_modules()?;
    Ok(Json(ModulesResponse { modules }))
}

/// Distinct message names.
///
/// `GET /message-names`
pub async fn distinct_message_names(
    State(state): State<AppState>,
) -> Result<Json<MessageNamesResponse>, ApiError> {
    let store = state.store.lock().await;
    let names = store.distinct_message_names()?;
    Ok(Json(MessageNamesResponse { names }))
}

/// Empty and whitespace-only values are stored as absent.
fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
