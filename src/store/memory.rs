//! In-memory implementation of [`TableStore`].
//!
//! Backs the sync tests and works as an offline stand-in for the
//! hosted service. Row ids follow the `rec{N}` shape the REST store
//! hands out, with a process-local counter.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{Fields, Result, Row, StoreError, TableStore};

#[derive(Debug, Default)]
struct Inner {
    tables: HashMap<String, Vec<Row>>,
    next_id: u64,
}

/// A tabular store held entirely in process memory.
///
/// Cloning shares the underlying tables, so a clone sees every write.
#[derive(Debug, Clone, Default)]
pub struct MemoryTableStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryTableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current contents of a table, for assertions.
    pub fn snapshot(&self, table: &str) -> Vec<Row> {
        let inner = self.inner.lock().unwrap();
        inner.tables.get(table).cloned().unwrap_or_default()
    }

    /// Seed a table with rows built from field maps.
    pub fn seed(&self, table: &str, rows: impl IntoIterator<Item = Fields>) {
        let mut inner = self.inner.lock().unwrap();
        for fields in rows {
            inner.next_id += 1;
            let id = format!("rec{}", inner.next_id);
            inner
                .tables
                .entry(table.to_string())
                .or_default()
                .push(Row { id, fields });
        }
    }
}

impl TableStore for MemoryTableStore {
    async fn list_rows(&self, table: &str) -> Result<Vec<Row>> {
        Ok(self.snapshot(table))
    }

    async fn create_row(&self, table: &str, fields: Fields) -> Result<Row> {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let row = Row {
            id: format!("rec{}", inner.next_id),
            fields,
        };
        inner
            .tables
            .entry(table.to_string())
            .or_default()
            .push(row.clone());
        Ok(row)
    }

    async fn delete_row(&self, table: &str, id: &str) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        let rows = inner
            .tables
            .get_mut(table)
            .ok_or_else(|| StoreError::RowNotFound {
                table: table.to_string(),
                id: id.to_string(),
            })?;
        let before = rows.len();
        rows.retain(|row| row.id != id);
        if rows.len() == before {
            return Err(StoreError::RowNotFound {
                table: table.to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(title: &str) -> Fields {
        let mut map = Fields::new();
        map.insert("Title".to_string(), json!(title));
        map
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let store = MemoryTableStore::new();
        let a = store.create_row("Tasks", fields("a")).await.unwrap();
        let b = store.create_row("Tasks", fields("b")).await.unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(store.snapshot("Tasks").len(), 2);
    }

    #[tokio::test]
    async fn test_list_unknown_table_is_empty() {
        let store = MemoryTableStore::new();
        assert!(store.list_rows("Tasks").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_removes_only_that_row() {
        let store = MemoryTableStore::new();
        let a = store.create_row("Tasks", fields("a")).await.unwrap();
        let b = store.create_row("Tasks", fields("b")).await.unwrap();

        store.delete_row("Tasks", &a.id).await.unwrap();

        let remaining = store.list_rows("Tasks").await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, b.id);
    }

    #[tokio::test]
    async fn test_delete_unknown_id_errors() {
        let store = MemoryTableStore::new();
        store.create_row("Tasks", fields("a")).await.unwrap();
        let err = store.delete_row("Tasks", "recMissing").await.unwrap_err();
        assert!(matches!(err, StoreError::RowNotFound { .. }));
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = MemoryTableStore::new();
        let clone = store.clone();
        store.create_row("Journal", Fields::new()).await.unwrap();
        assert_eq!(clone.snapshot("Journal").len(), 1);
    }
}
