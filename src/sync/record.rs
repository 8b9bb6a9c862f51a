use crate::store::{Fields, TableStore};

use super::SyncError;

/// Maps a record type to and from a remote row's field map.
///
/// `from_fields` is the schema-with-defaults boundary: every absent
/// field, and every present field holding a value the schema does not
/// recognize, is silently replaced by the type's default. Malformed
/// rows are repaired, never rejected.
pub trait TableRecord: Clone {
    fn from_fields(fields: &Fields) -> Self;
    fn to_fields(&self) -> Fields;
}

/// A record together with the remote row currently mirroring it.
///
/// `row_id` is `None` while the record has no remote counterpart,
/// which only happens after a partially failed [`RecordSync::rewrite`].
#[derive(Debug, Clone, PartialEq)]
pub struct Record<T> {
    pub row_id: Option<String>,
    pub value: T,
}

/// One table's worth of session state: the ordered in-memory sequence
/// plus the store handle needed to keep the remote mirror current.
///
/// Operations are synchronous with respect to the caller's session:
/// each one runs to completion before the next interaction. Failures
/// abort the operation and leave the in-memory sequence untouched; the
/// remote table may be left partial (an orphan row after a failed
/// `edit`, a half-rebuilt table after a failed `rewrite`). There is no
/// retry and no rollback.
#[derive(Debug)]
pub struct RecordSync<S, T> {
    store: S,
    table: String,
    records: Vec<Record<T>>,
}

impl<S: TableStore, T: TableRecord> RecordSync<S, T> {
    /// Reads every row of `table` into memory, applying field defaults
    /// and keeping row ids. Order follows the store's iteration order.
    pub async fn load(store: S, table: impl Into<String>) -> Result<Self, SyncError> {
        let mut sync = Self {
            store,
            table: table.into(),
            records: Vec::new(),
        };
        sync.reload().await?;
        Ok(sync)
    }

    /// Replaces the in-memory sequence with the remote table's current
    /// contents.
    pub async fn reload(&mut self) -> Result<(), SyncError> {
        let rows = self.store.list_rows(&self.table).await?;
        self.records = rows
            .into_iter()
            .map(|row| Record {
                value: T::from_fields(&row.fields),
                row_id: Some(row.id),
            })
            .collect();
        tracing::debug!(table = %self.table, count = self.records.len(), "loaded records");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.records.get(index).map(|r| &r.value)
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.records.iter().map(|r| &r.value)
    }

    pub fn records(&self) -> &[Record<T>] {
        &self.records
    }

    /// Appends a record: creates its remote row, then commits it to the
    /// in-memory sequence.
    pub async fn add(&mut self, value: T) -> Result<(), SyncError> {
        let row = self.store.create_row(&self.table, value.to_fields()).await?;
        self.records.push(Record {
            row_id: Some(row.id),
            value,
        });
        Ok(())
    }

    /// Replaces only the record at `index`; every other element and the
    /// sequence order are unchanged.
    ///
    /// The store has no row update, so the replacement row is created
    /// first and the old row deleted after. If the delete fails, the
    /// error propagates with the in-memory sequence unchanged and the
    /// old row still present remotely next to the new one.
    pub async fn edit(&mut self, index: usize, value: T) -> Result<(), SyncError> {
        if index >= self.records.len() {
            return Err(SyncError::IndexOutOfRange {
                index,
                len: self.records.len(),
            });
        }

        let row = self.store.create_row(&self.table, value.to_fields()).await?;
        if let Some(old_id) = &self.records[index].row_id {
            self.store.delete_row(&self.table, old_id).await?;
        }
        self.records[index] = Record {
            row_id: Some(row.id),
            value,
        };
        Ok(())
    }

    /// Removes the record at `index`, preserving the relative order of
    /// the rest, and returns its value.
    pub async fn remove(&mut self, index: usize) -> Result<T, SyncError> {
        if index >= self.records.len() {
            return Err(SyncError::IndexOutOfRange {
                index,
                len: self.records.len(),
            });
        }

        if let Some(row_id) = &self.records[index].row_id {
            self.store.delete_row(&self.table, row_id).await?;
        }
        Ok(self.records.remove(index).value)
    }

    /// Rebuilds the remote mirror from scratch: deletes every row the
    /// table currently holds, then recreates one row per in-memory
    /// record, in sequence order. Row ids are regenerated; content is
    /// preserved.
    ///
    /// Not atomic. A failure mid-operation leaves the table partial:
    /// records not yet recreated keep `row_id: None` until a later
    /// `rewrite` or `reload` reconciles them.
    pub async fn rewrite(&mut self) -> Result<(), SyncError> {
        let existing = self.store.list_rows(&self.table).await?;
        for row in existing {
            self.store.delete_row(&self.table, &row.id).await?;
        }
        for record in &mut self.records {
            record.row_id = None;
        }
        for record in &mut self.records {
            let row = self
                .store
                .create_row(&self.table, record.value.to_fields())
                .await?;
            record.row_id = Some(row.id);
        }
        tracing::debug!(table = %self.table, count = self.records.len(), "rewrote table");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{self, MemoryTableStore, Row, StoreError};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    /// Minimal record for exercising the sync contract.
    #[derive(Debug, Clone, PartialEq)]
    struct Note {
        body: String,
    }

    impl Note {
        fn new(body: &str) -> Self {
            Self {
                body: body.to_string(),
            }
        }
    }

    impl TableRecord for Note {
        fn from_fields(fields: &Fields) -> Self {
            Self {
                body: fields
                    .get("Body")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            }
        }

        fn to_fields(&self) -> Fields {
            let mut fields = Fields::new();
            fields.insert("Body".to_string(), json!(self.body));
            fields
        }
    }

    /// Store double whose `create_row` starts failing once a number of
    /// creates have succeeded.
    #[derive(Clone)]
    struct FailingCreates {
        inner: MemoryTableStore,
        remaining: Arc<Mutex<usize>>,
    }

    impl FailingCreates {
        fn after(inner: MemoryTableStore, successes: usize) -> Self {
            Self {
                inner,
                remaining: Arc::new(Mutex::new(successes)),
            }
        }
    }

    impl TableStore for FailingCreates {
        async fn list_rows(&self, table: &str) -> store::Result<Vec<Row>> {
            self.inner.list_rows(table).await
        }

        async fn create_row(&self, table: &str, fields: Fields) -> store::Result<Row> {
            {
                let mut remaining = self.remaining.lock().unwrap();
                if *remaining == 0 {
                    return Err(StoreError::Http("connection reset".to_string()));
                }
                *remaining -= 1;
            }
            self.inner.create_row(table, fields).await
        }

        async fn delete_row(&self, table: &str, id: &str) -> store::Result<()> {
            self.inner.delete_row(table, id).await
        }
    }

    async fn empty_sync() -> (MemoryTableStore, RecordSync<MemoryTableStore, Note>) {
        let store = MemoryTableStore::new();
        let sync = RecordSync::load(store.clone(), "Notes").await.unwrap();
        (store, sync)
    }

    #[tokio::test]
    async fn test_load_empty_table() {
        let (_, sync) = empty_sync().await;
        assert!(sync.is_empty());
        assert_eq!(sync.len(), 0);
    }

    #[tokio::test]
    async fn test_add_persists_and_keeps_row_id() {
        let (store, mut sync) = empty_sync().await;
        sync.add(Note::new("first")).await.unwrap();

        assert_eq!(sync.len(), 1);
        assert!(sync.records()[0].row_id.is_some());
        assert_eq!(store.snapshot("Notes").len(), 1);
    }

    #[tokio::test]
    async fn test_edit_replaces_only_that_element() {
        let (store, mut sync) = empty_sync().await;
        for body in ["a", "b", "c"] {
            sync.add(Note::new(body)).await.unwrap();
        }

        sync.edit(1, Note::new("B")).await.unwrap();

        let bodies: Vec<_> = sync.values().map(|n| n.body.as_str()).collect();
        assert_eq!(bodies, ["a", "B", "c"]);
        // Remote mirror holds exactly one row per record.
        assert_eq!(store.snapshot("Notes").len(), 3);
    }

    #[tokio::test]
    async fn test_remove_preserves_relative_order() {
        let (store, mut sync) = empty_sync().await;
        for body in ["a", "b", "c", "d"] {
            sync.add(Note::new(body)).await.unwrap();
        }

        let removed = sync.remove(1).await.unwrap();
        assert_eq!(removed.body, "b");

        let bodies: Vec<_> = sync.values().map(|n| n.body.as_str()).collect();
        assert_eq!(bodies, ["a", "c", "d"]);
        assert_eq!(store.snapshot("Notes").len(), 3);
    }

    #[tokio::test]
    async fn test_mutations_out_of_range() {
        let (_, mut sync) = empty_sync().await;
        sync.add(Note::new("only")).await.unwrap();

        let err = sync.edit(1, Note::new("x")).await.unwrap_err();
        assert!(matches!(
            err,
            SyncError::IndexOutOfRange { index: 1, len: 1 }
        ));
        let err = sync.remove(5).await.unwrap_err();
        assert!(matches!(
            err,
            SyncError::IndexOutOfRange { index: 5, len: 1 }
        ));
    }

    #[tokio::test]
    async fn test_rewrite_then_reload_round_trips_content() {
        let (store, mut sync) = empty_sync().await;
        for body in ["a", "b", "c"] {
            sync.add(Note::new(body)).await.unwrap();
        }
        sync.edit(0, Note::new("A")).await.unwrap();
        sync.remove(2).await.unwrap();

        let before: Vec<_> = sync.values().cloned().collect();
        let ids_before: Vec<_> = sync.records().iter().map(|r| r.row_id.clone()).collect();

        sync.rewrite().await.unwrap();
        let ids_after: Vec<_> = sync.records().iter().map(|r| r.row_id.clone()).collect();
        // Content round-trips; identity does not.
        assert_ne!(ids_before, ids_after);

        let mut reloaded: RecordSync<_, Note> =
            RecordSync::load(store, "Notes").await.unwrap();
        let after: Vec<_> = reloaded.values().cloned().collect();
        assert_eq!(before, after);

        // A second rewrite of the reloaded state is idempotent in content.
        reloaded.rewrite().await.unwrap();
        let again: Vec<_> = reloaded.values().cloned().collect();
        assert_eq!(before, again);
    }

    #[tokio::test]
    async fn test_rewrite_drops_rows_from_other_sessions() {
        let (store, mut sync) = empty_sync().await;
        sync.add(Note::new("mine")).await.unwrap();

        // Another session wrote a row this one never loaded.
        store.seed("Notes", [Note::new("theirs").to_fields()]);

        sync.rewrite().await.unwrap();

        // The rebuild dropped the foreign row: last writer wins.
        let rows = store.snapshot("Notes");
        assert_eq!(rows.len(), 1);
        assert_eq!(Note::from_fields(&rows[0].fields).body, "mine");
    }

    #[tokio::test]
    async fn test_failed_rewrite_leaves_remote_partial() {
        let plain = MemoryTableStore::new();
        let failing = FailingCreates::after(plain.clone(), 4);
        let mut sync: RecordSync<_, Note> =
            RecordSync::load(failing, "Notes").await.unwrap();
        for body in ["a", "b", "c"] {
            sync.add(Note::new(body)).await.unwrap();
        }

        // One create left: the rebuild deletes all three rows, then
        // fails on the second create.
        let err = sync.rewrite().await.unwrap_err();
        assert!(matches!(err, SyncError::Store(StoreError::Http(_))));

        // Partial remote state, and the unwritten tail is unmirrored.
        assert_eq!(plain.snapshot("Notes").len(), 1);
        assert!(sync.records()[0].row_id.is_some());
        assert!(sync.records()[1].row_id.is_none());
        assert!(sync.records()[2].row_id.is_none());

        // In-memory content survives untouched.
        let bodies: Vec<_> = sync.values().map(|n| n.body.as_str()).collect();
        assert_eq!(bodies, ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_failed_edit_keeps_memory_unchanged() {
        let plain = MemoryTableStore::new();
        let failing = FailingCreates::after(plain.clone(), 1);
        let mut sync: RecordSync<_, Note> =
            RecordSync::load(failing, "Notes").await.unwrap();
        sync.add(Note::new("original")).await.unwrap();

        let err = sync.edit(0, Note::new("changed")).await.unwrap_err();
        assert!(matches!(err, SyncError::Store(_)));
        assert_eq!(sync.get(0).unwrap().body, "original");
    }
}
