//! Application state with a shared [`CatalogStore`].
//!
//! The store is wrapped in `Arc<tokio::sync::Mutex<_>>` for use with axum
//! handlers. `tokio::sync::Mutex` (async-aware) is used instead of
//! `std::sync::Mutex` so handlers await the lock without blocking the tokio
//! runtime; `rusqlite::Connection` is `!Sync`, which rules out an `RwLock`.

use std::sync::Arc;

use msgmap_storage::CatalogStore;

use crate::error::ApiError;

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    /// The shared catalog store (async Mutex -- non-blocking await).
    pub store: Arc<tokio::sync::Mutex<CatalogStore>>,
}

impl AppState {
    /// Creates an `AppState` backed by the SQLite database at `db_path`.
    pub fn new(db_path: &str) -> Result<Self, ApiError> {
        let store = CatalogStore::new(db_path)
            .map_err(|e| ApiError::InternalError(e.to_string()))?;
        Ok(AppState {
            store: Arc::new(tokio::sync::Mutex::new(store)),
        })
    }

    /// Creates an `AppState` with an in-memory database (for testing).
    pub fn in_memory() -> Result<Self, ApiError> {
        let store = CatalogStore::in_memory()
            .map_err(|e| ApiError::InternalError(e.to_string()))?;
        Ok(AppState {
            store: Arc::new(tokio::sync::Mutex::new(store)),
        })
    }
}
