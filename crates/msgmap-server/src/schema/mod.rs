//! API schema types for request/response definitions.
//!
//! Types use serde derives for JSON serialization/deserialization; ingest
//! parameters use the camelCase wire names reporters send.

pub mod messages;
