//! Keeps in-memory planner state consistent with the remote store.
//!
//! The in-memory ordered sequence is the sole source of truth during a
//! session; the remote table is a mirror. Mutations are per-record
//! operations keyed by the row ids retained at load time. The one
//! exception is [`RecordSync::rewrite`], which rebuilds the mirror by
//! deleting every remote row and recreating the sequence from scratch,
//! and is explicitly not atomic.
//!
//! Nothing here guards against concurrent sessions writing the same
//! tables: the outcome is last-writer-wins, and interleaved deletes
//! and creates from two sessions can lose or duplicate rows.

mod journal_sync;
mod record;
mod task_sync;

use std::fmt;

use crate::store::StoreError;

pub use journal_sync::{JournalSync, JOURNAL_ENTRY_FIELD};
pub use record::{Record, RecordSync, TableRecord};
pub use task_sync::TaskSync;

/// Errors from sync operations.
#[derive(Debug)]
pub enum SyncError {
    /// The remote store failed; the interaction aborts.
    Store(StoreError),
    /// A mutation addressed an index outside the current sequence.
    IndexOutOfRange { index: usize, len: usize },
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::Store(e) => write!(f, "Store error: {}", e),
            SyncError::IndexOutOfRange { index, len } => {
                write!(f, "Index {} out of range (list has {} item(s))", index, len)
            }
        }
    }
}

impl std::error::Error for SyncError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SyncError::Store(e) => Some(e),
            SyncError::IndexOutOfRange { .. } => None,
        }
    }
}

impl From<StoreError> for SyncError {
    fn from(e: StoreError) -> Self {
        SyncError::Store(e)
    }
}
