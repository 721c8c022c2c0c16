//! Application state for the HTTP server.

use std::sync::Arc;

use crate::db::TableRepository;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Table service for database operations
    pub tables: Arc<TableRepository>,
}

impl AppState {
    /// Create a new application state with the given table service.
    pub fn new(tables: Arc<TableRepository>) -> Self {
        Self { tables }
    }
}
