//! SQLite-backed catalog store.
//!
//! Every write is wrapped in a transaction. The supersession rule makes
//! ingest self-cleaning: stale rows never need a separate sweep, they are
//! evicted the moment a newer compilation of their assembly reports.

use chrono::Utc;
use rusqlite::{params, Connection, Row};

use crate::error::StorageError;
use crate::types::{IngestRecord, StoredMessage};

/// The catalog's ingest/query backend.
pub struct CatalogStore {
    conn: Connection,
}

impl CatalogStore {
    /// Opens (or creates) the catalog database at `path`.
    pub fn new(path: &str) -> Result<Self, StorageError> {
        let conn = crate::schema::open_database(path)?;
        Ok(CatalogStore { conn })
    }

    /// Opens an in-memory catalog database (for testing).
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = crate::schema::open_in_memory()?;
        Ok(CatalogStore { conn })
    }

    /// Inserts one contract report, superseding the reporting assembly's
    /// previous snapshot: all prior rows for the same assembly whose
    /// compilation id differs from the incoming one are deleted first.
    ///
    /// Returns the rowid of the inserted message.
    pub fn ingest(&mut self, record: &IngestRecord) -> Result<i64, StorageError> {
        let tx = self.conn.transaction()?;
        // `IS NOT` is null-aware: rows without a compilation id are also
        // superseded by a report that carries one, and vice versa.
        tx.execute(
            "DELETE FROM messages WHERE assembly_name IS ?1 AND compilation_id IS NOT ?2",
            params![record.assembly_name, record.compilation_id],
        )?;
        tx.execute(
            "INSERT INTO messages (direction, message_name, message_schema,
                 message_description, module_name, assembly_name,
                 compilation_id, location, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                record.direction,
                record.message_name,
                record.message_schema,
                record.message_description,
                record.module_name,
                record.assembly_name,
                record.compilation_id,
                record.location,
                Utc::now(),
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(id)
    }

    /// All stored messages, oldest first.
    pub fn list(&self) -> Result<Vec<StoredMessage>, StorageError> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, direction, message_name, message_schema,
                    message_description, module_name, assembly_name,
                    compilation_id, location, created_at
             FROM messages ORDER BY id",
        )?;
        let rows = stmt.query_map([], row_to_message)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Distinct module names, falling back to the assembly name for rows
    /// without one.
    pub fn distinct_modules(&self) -> Result<Vec<Option<String>>, StorageError> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT DISTINCT COALESCE(module_name, assembly_name) FROM messages ORDER BY 1",
        )?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Distinct message names.
    pub fn distinct_message_names(&self) -> Result<Vec<Option<String>>, StorageError> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT DISTINCT message_name FROM messages ORDER BY 1")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

fn row_to_message(row: &Row<'_>) -> rusqlite::Result<StoredMessage> {
    Ok(StoredMessage {
        id: row.get(0)?,
        direction: row.get(1)?,
        message_name: row.get(2)?,
        message_schema: row.get(3)?,
        message_description: row.get(4)?,
        module_name: row.get(5)?,
        assembly_name: row.get(6)?,
        compilation_id: row.get(7)?,
        location: row.get(8)?,
        created_at: row.get(9)?,
    })
}
