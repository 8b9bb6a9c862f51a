//! Task table mapping.
//!
//! Columns: Title, Category, Horizon, Priority, Notes. Absent or
//! unrecognized values load as the field's default; nothing is
//! rejected at this boundary.

use serde_json::{json, Value};

use crate::models::Task;
use crate::store::Fields;

use super::record::{RecordSync, TableRecord};

const TITLE: &str = "Title";
const CATEGORY: &str = "Category";
const HORIZON: &str = "Horizon";
const PRIORITY: &str = "Priority";
const NOTES: &str = "Notes";

/// Session state for the tasks table.
pub type TaskSync<S> = RecordSync<S, Task>;

fn text_field(fields: &Fields, name: &str) -> String {
    fields
        .get(name)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn enum_field<T: std::str::FromStr + Default>(fields: &Fields, name: &str) -> T {
    fields
        .get(name)
        .and_then(Value::as_str)
        .and_then(|s| s.parse().ok())
        .unwrap_or_default()
}

impl TableRecord for Task {
    fn from_fields(fields: &Fields) -> Self {
        Task {
            title: text_field(fields, TITLE),
            category: enum_field(fields, CATEGORY),
            horizon: enum_field(fields, HORIZON),
            priority: enum_field(fields, PRIORITY),
            notes: text_field(fields, NOTES),
        }
    }

    fn to_fields(&self) -> Fields {
        let mut fields = Fields::new();
        fields.insert(TITLE.to_string(), json!(self.title));
        fields.insert(CATEGORY.to_string(), json!(self.category.to_string()));
        fields.insert(HORIZON.to_string(), json!(self.horizon.to_string()));
        fields.insert(PRIORITY.to_string(), json!(self.priority.to_string()));
        fields.insert(NOTES.to_string(), json!(self.notes));
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Horizon, Priority};

    #[test]
    fn test_fields_round_trip() {
        let task = Task::new("Pay rent")
            .with_category(Category::Responsibility)
            .with_horizon(Horizon::LongTerm)
            .with_priority(Priority::Urgent)
            .with_notes("first of the month");

        let restored = Task::from_fields(&task.to_fields());
        assert_eq!(restored, task);
    }

    #[test]
    fn test_missing_fields_load_as_defaults() {
        let task = Task::from_fields(&Fields::new());
        assert_eq!(task.title, "");
        assert_eq!(task.category, Category::Task);
        assert_eq!(task.horizon, Horizon::ShortTerm);
        assert_eq!(task.priority, Priority::Important);
        assert_eq!(task.notes, "");
    }

    #[test]
    fn test_unrecognized_values_load_as_defaults() {
        let mut fields = Fields::new();
        fields.insert("Title".to_string(), json!("odd row"));
        fields.insert("Category".to_string(), json!("Errand"));
        fields.insert("Priority".to_string(), json!(7));

        let task = Task::from_fields(&fields);
        assert_eq!(task.title, "odd row");
        assert_eq!(task.category, Category::Task);
        assert_eq!(task.priority, Priority::Important);
    }

    #[test]
    fn test_to_fields_uses_stored_column_values() {
        let fields = Task::new("x").with_horizon(Horizon::LongTerm).to_fields();
        assert_eq!(fields["Horizon"], json!("Long-Term (3+ months)"));
        assert_eq!(fields["Category"], json!("Task"));
        assert_eq!(fields["Priority"], json!("Important"));
    }
}
