//! Journal table mapping: a single Entry column.

use serde_json::{json, Value};

use crate::models::JournalEntry;
use crate::store::Fields;

use super::record::{RecordSync, TableRecord};

pub const JOURNAL_ENTRY_FIELD: &str = "Entry";

/// Session state for the journal table.
pub type JournalSync<S> = RecordSync<S, JournalEntry>;

impl TableRecord for JournalEntry {
    fn from_fields(fields: &Fields) -> Self {
        JournalEntry {
            text: fields
                .get(JOURNAL_ENTRY_FIELD)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        }
    }

    fn to_fields(&self) -> Fields {
        let mut fields = Fields::new();
        fields.insert(JOURNAL_ENTRY_FIELD.to_string(), json!(self.text));
        fields
    }
}
