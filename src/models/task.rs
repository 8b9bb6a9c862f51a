use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What kind of item a task is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Category {
    #[default]
    Task,
    Responsibility,
    Wish,
    Goal,
}

impl Category {
    /// All categories, in the order they are offered to the user.
    pub const ALL: [Category; 4] = [
        Category::Task,
        Category::Responsibility,
        Category::Wish,
        Category::Goal,
    ];
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Task => write!(f, "Task"),
            Category::Responsibility => write!(f, "Responsibility"),
            Category::Wish => write!(f, "Wish"),
            Category::Goal => write!(f, "Goal"),
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "task" => Ok(Category::Task),
            "responsibility" => Ok(Category::Responsibility),
            "wish" => Ok(Category::Wish),
            "goal" => Ok(Category::Goal),
            _ => Err(format!(
                "Invalid category '{}'. Valid options: task, responsibility, wish, goal",
                s
            )),
        }
    }
}

/// A task's planning timeframe bucket.
///
/// The display strings match the values stored in the remote table
/// exactly, en dash included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Horizon {
    #[default]
    #[serde(rename = "Short-Term (0–3 months)")]
    ShortTerm,
    #[serde(rename = "Long-Term (3+ months)")]
    LongTerm,
}

impl Horizon {
    pub const ALL: [Horizon; 2] = [Horizon::ShortTerm, Horizon::LongTerm];
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Horizon::ShortTerm => write!(f, "Short-Term (0–3 months)"),
            Horizon::LongTerm => write!(f, "Long-Term (3+ months)"),
        }
    }
}

impl FromStr for Horizon {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Short-Term (0–3 months)" => Ok(Horizon::ShortTerm),
            "Long-Term (3+ months)" => Ok(Horizon::LongTerm),
            _ => match s.to_lowercase().as_str() {
                "short" | "short-term" | "shortterm" => Ok(Horizon::ShortTerm),
                "long" | "long-term" | "longterm" => Ok(Horizon::LongTerm),
                _ => Err(format!(
                    "Invalid horizon '{}'. Valid options: short, long",
                    s
                )),
            },
        }
    }
}

/// How urgent a task is. Drives the sidebar summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Priority {
    Urgent,
    #[default]
    Important,
    Defer,
    Wish,
}

impl Priority {
    /// All priorities, in summary display order.
    pub const ALL: [Priority; 4] = [
        Priority::Urgent,
        Priority::Important,
        Priority::Defer,
        Priority::Wish,
    ];

    /// Icon shown next to the priority in list and summary output.
    pub fn icon(&self) -> &'static str {
        match self {
            Priority::Urgent => "🔴",
            Priority::Important => "🟡",
            Priority::Defer => "⚪",
            Priority::Wish => "💭",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Urgent => write!(f, "Urgent"),
            Priority::Important => write!(f, "Important"),
            Priority::Defer => write!(f, "Defer"),
            Priority::Wish => write!(f, "Wish"),
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "urgent" => Ok(Priority::Urgent),
            "important" => Ok(Priority::Important),
            "defer" => Ok(Priority::Defer),
            "wish" => Ok(Priority::Wish),
            _ => Err(format!(
                "Invalid priority '{}'. Valid options: urgent, important, defer, wish",
                s
            )),
        }
    }
}

/// A planner item: something to do, look after, or aim for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub title: String,
    pub category: Category,
    pub horizon: Horizon,
    pub priority: Priority,
    pub notes: String,
}

impl Task {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            category: Category::default(),
            horizon: Horizon::default(),
            priority: Priority::default(),
            notes: String::new(),
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn with_horizon(mut self, horizon: Horizon) -> Self {
        self.horizon = horizon;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({}, {}, {})",
            self.priority.icon(),
            self.title,
            self.category,
            self.horizon,
            self.priority
        )?;
        if !self.notes.is_empty() {
            write!(f, "\n  📝 {}", self.notes)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_display_round_trip() {
        for category in Category::ALL {
            let parsed = Category::from_str(&category.to_string()).unwrap();
            assert_eq!(parsed, category);
        }
    }

    #[test]
    fn test_category_from_str_invalid() {
        assert!(Category::from_str("chore").is_err());
        assert!(Category::from_str("").is_err());
    }

    #[test]
    fn test_horizon_accepts_stored_and_short_forms() {
        assert_eq!(
            Horizon::from_str("Short-Term (0–3 months)").unwrap(),
            Horizon::ShortTerm
        );
        assert_eq!(
            Horizon::from_str("Long-Term (3+ months)").unwrap(),
            Horizon::LongTerm
        );
        assert_eq!(Horizon::from_str("short").unwrap(), Horizon::ShortTerm);
        assert_eq!(Horizon::from_str("LONG").unwrap(), Horizon::LongTerm);
        assert!(Horizon::from_str("mid").is_err());
    }

    #[test]
    fn test_priority_icons() {
        assert_eq!(Priority::Urgent.icon(), "🔴");
        assert_eq!(Priority::Important.icon(), "🟡");
        assert_eq!(Priority::Defer.icon(), "⚪");
        assert_eq!(Priority::Wish.icon(), "💭");
    }

    #[test]
    fn test_priority_json_uses_stored_value() {
        let json = serde_json::to_string(&Priority::Urgent).unwrap();
        assert_eq!(json, "\"Urgent\"");
        let parsed: Priority = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Priority::Urgent);
    }

    #[test]
    fn test_horizon_json_uses_stored_value() {
        let json = serde_json::to_string(&Horizon::ShortTerm).unwrap();
        assert_eq!(json, "\"Short-Term (0–3 months)\"");
        let parsed: Horizon = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Horizon::ShortTerm);
    }

    #[test]
    fn test_task_builder() {
        let task = Task::new("Pay rent")
            .with_priority(Priority::Urgent)
            .with_notes("before the 1st");
        assert_eq!(task.title, "Pay rent");
        assert_eq!(task.category, Category::Task);
        assert_eq!(task.horizon, Horizon::ShortTerm);
        assert_eq!(task.priority, Priority::Urgent);
        assert_eq!(task.notes, "before the 1st");
    }

    #[test]
    fn test_task_display() {
        let task = Task::new("Pay rent").with_priority(Priority::Urgent);
        let output = format!("{}", task);
        assert!(output.contains("🔴"));
        assert!(output.contains("Pay rent"));
        assert!(output.contains("Urgent"));
        assert!(!output.contains("📝"));

        let with_notes = task.with_notes("transfer from savings");
        let output = format!("{}", with_notes);
        assert!(output.contains("📝 transfer from savings"));
    }
}
