//! SQLite persistence for the message-contract catalog.
//!
//! [`CatalogStore`] is the ingest/query backend behind the catalog server.
//! Ingest follows the supersession rule: a compilation run fully replaces
//! the previous catalog snapshot for its assembly -- on every insert, prior
//! rows for the same assembly with a differing compilation id are deleted
//! first.
//!
//! # Modules
//!
//! - [`error`]: StorageError enum with all failure modes
//! - [`types`]: ingest/query row types
//! - [`schema`]: SQL schema and migration setup
//! - [`store`]: CatalogStore implementation

pub mod error;
pub mod schema;
pub mod store;
pub mod types;

// Re-export key types for ergonomic use.
pub use error::StorageError;
pub use store::CatalogStore;
pub use types::{IngestRecord, StoredMessage};
