use serde::Serialize;

use super::task::{Priority, Task};

/// Count of tasks per priority, derived from the in-memory task list.
///
/// All four priorities are always present, zero or not. Recomputed on
/// demand and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PrioritySummary {
    pub urgent: usize,
    pub important: usize,
    pub defer: usize,
    pub wish: usize,
}

impl PrioritySummary {
    pub fn from_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let mut summary = Self::default();
        for task in tasks {
            match task.priority {
                Priority::Urgent => summary.urgent += 1,
                Priority::Important => summary.important += 1,
                Priority::Defer => summary.defer += 1,
                Priority::Wish => summary.wish += 1,
            }
        }
        summary
    }

    pub fn count(&self, priority: Priority) -> usize {
        match priority {
            Priority::Urgent => self.urgent,
            Priority::Important => self.important,
            Priority::Defer => self.defer,
            Priority::Wish => self.wish,
        }
    }

    pub fn total(&self) -> usize {
        self.urgent + self.important + self.defer + self.wish
    }

    /// (priority, count) pairs in summary display order.
    pub fn entries(&self) -> impl Iterator<Item = (Priority, usize)> + '_ {
        Priority::ALL.into_iter().map(|p| (p, self.count(p)))
    }
}
