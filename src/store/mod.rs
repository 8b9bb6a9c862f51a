//! Remote tabular store abstraction.
//!
//! The planner persists into named tables of rows, each row identified
//! by a store-assigned id and carrying a free-form field map. Three
//! operations are enough for every caller: list, create, delete. There
//! is no update; replacing a row means creating its successor and
//! deleting it.

mod memory;
mod rest;

use std::fmt;
use std::future::Future;

use serde_json::{Map, Value};

pub use memory::MemoryTableStore;
pub use rest::RestTableStore;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Field map of a single row, keyed by column name.
pub type Fields = Map<String, Value>;

/// One row in a remote table.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Store-assigned row id, e.g. `rec8FnKpYxM2a1bQ`.
    pub id: String,
    pub fields: Fields,
}

/// A tabular CRUD backend.
///
/// Implemented by [`RestTableStore`] for the hosted service and by
/// [`MemoryTableStore`] for tests. Every method is a single remote
/// operation; callers get no retry or batching.
pub trait TableStore: Send + Sync {
    /// List every row of a table, in the store's iteration order.
    fn list_rows(&self, table: &str) -> impl Future<Output = Result<Vec<Row>>> + Send;

    /// Create a row and return it with its assigned id.
    fn create_row(&self, table: &str, fields: Fields)
        -> impl Future<Output = Result<Row>> + Send;

    /// Delete a row by id. Deleting an unknown id is an error.
    fn delete_row(&self, table: &str, id: &str) -> impl Future<Output = Result<()>> + Send;
}

/// Errors from remote store operations.
///
/// Any of these aborts the surrounding interaction; there is no retry
/// and no partial-success signaling.
#[derive(Debug)]
pub enum StoreError {
    /// Request never produced a response (connect, DNS, timeout).
    Http(String),
    /// The store answered with a non-success status.
    Api { status: u16, message: String },
    /// The response body could not be decoded.
    Decode(String),
    /// No row with the given id exists in the table.
    RowNotFound { table: String, id: String },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Http(e) => write!(f, "Store request failed: {}", e),
            StoreError::Api { status, message } => {
                write!(f, "Store returned status {}: {}", status, message)
            }
            StoreError::Decode(e) => write!(f, "Failed to decode store response: {}", e),
            StoreError::RowNotFound { table, id } => {
                write!(f, "No row '{}' in table '{}'", id, table)
            }
        }
    }
}

impl std::error::Error for StoreError {}
