//! Per-session planner state.
//!
//! One [`Session`] is created per interaction context (a CLI
//! invocation, or the lifetime of a dashboard server process) and
//! dropped with nothing persisted beyond what its mutations already
//! wrote to the remote store.

use crate::models::PrioritySummary;
use crate::store::TableStore;
use crate::sync::{JournalSync, SyncError, TaskSync};

/// Both tables' in-memory state, loaded at session start.
#[derive(Debug)]
pub struct Session<S> {
    pub tasks: TaskSync<S>,
    pub journal: JournalSync<S>,
}

impl<S: TableStore + Clone> Session<S> {
    /// Reads both tables from the remote store.
    pub async fn start(
        store: S,
        tasks_table: impl Into<String>,
        journal_table: impl Into<String>,
    ) -> Result<Self, SyncError> {
        let tasks = TaskSync::load(store.clone(), tasks_table).await?;
        let journal = JournalSync::load(store, journal_table).await?;
        tracing::info!(
            tasks = tasks.len(),
            journal_entries = journal.len(),
            "session started"
        );
        Ok(Self { tasks, journal })
    }

    /// Re-reads both tables, replacing in-memory state.
    pub async fn refresh(&mut self) -> Result<(), SyncError> {
        self.tasks.reload().await?;
        self.journal.reload().await?;
        Ok(())
    }

    /// Task counts per priority, derived from current in-memory state.
    pub fn priority_summary(&self) -> PrioritySummary {
        PrioritySummary::from_tasks(self.tasks.values())
    }
}
