//! Macro Planner
//!
//! A personal task and journal tracker backed by a remote tabular
//! store. The in-memory session state is the source of truth while the
//! program runs; the remote tables mirror it, one row per record.

pub mod commands;
pub mod config;
pub mod models;
pub mod server;
pub mod session;
pub mod store;
pub mod sync;

pub use config::{Config, ConfigError};
pub use models::{Category, Horizon, JournalEntry, Priority, PrioritySummary, Task};
pub use session::Session;
pub use store::{Fields, MemoryTableStore, RestTableStore, Row, StoreError, TableStore};
pub use sync::{JournalSync, Record, RecordSync, SyncError, TableRecord, TaskSync};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
