//! HTTP/JSON API server for the message-contract catalog.
//!
//! Accepts per-site contract reports from scanners and live analyzers
//! (query-parameter metadata plus a text/plain schema body) and exposes the
//! catalog's list and distinct queries. Ingest applies the supersession
//! rule: each compilation run replaces the previous snapshot for its
//! assembly.

pub mod error;
pub mod handlers;
pub mod router;
pub mod schema;
pub mod state;
