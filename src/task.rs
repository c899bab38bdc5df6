//! Task data structure and related functionality.
//!
//! This module defines the core `Task` struct that represents a single to-do
//! item, its stable identifier, and the value types used to create and patch
//! tasks in the store.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::fields::Priority;

/// Stable identifier assigned to a task when it is created.
///
/// Zero is never assigned; records loaded without an id carry zero until the
/// store renumbers them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A single to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(default)]
    pub id: TaskId,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub completed: bool,
}

/// Fields for a task about to be inserted; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub text: String,
    pub date: Option<NaiveDate>,
    pub priority: Priority,
}

impl NewTask {
    /// A text-only task with default priority and no date.
    pub fn text(text: impl Into<String>) -> Self {
        NewTask {
            text: text.into(),
            date: None,
            priority: Priority::default(),
        }
    }
}

/// Shallow patch merged into an existing task. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub text: Option<String>,
    pub date: Option<Option<NaiveDate>>,
    pub priority: Option<Priority>,
}

impl TaskPatch {
    /// Merge this patch into `task`.
    pub fn apply(&self, task: &mut Task) {
        if let Some(text) = &self.text {
            task.text = text.clone();
        }
        if let Some(date) = self.date {
            task.date = date;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_record_without_id_or_details() {
        let task: Task = serde_json::from_str(r#"{"text":"buy milk","completed":true}"#).unwrap();
        assert_eq!(task.id, TaskId(0));
        assert_eq!(task.text, "buy milk");
        assert_eq!(task.date, None);
        assert_eq!(task.priority, Priority::Medium);
        assert!(task.completed);
    }

    #[test]
    fn test_date_serialised_as_iso_and_omitted_when_absent() {
        let mut task = Task {
            id: TaskId(4),
            text: "file taxes".into(),
            date: NaiveDate::from_ymd_opt(2024, 1, 15),
            priority: Priority::High,
            completed: false,
        };
        let json = serde_json::to_string(&task).unwrap();
        assert!(json.contains("\"date\":\"2024-01-15\""));
        assert!(json.contains("\"id\":4"));

        task.date = None;
        let json = serde_json::to_string(&task).unwrap();
        assert!(!json.contains("date"));
    }

    #[test]
    fn test_patch_leaves_unset_fields_and_completion() {
        let mut task = Task {
            id: TaskId(1),
            text: "old".into(),
            date: NaiveDate::from_ymd_opt(2024, 3, 1),
            priority: Priority::Low,
            completed: true,
        };
        TaskPatch { text: Some("new".into()), ..TaskPatch::default() }.apply(&mut task);
        assert_eq!(task.text, "new");
        assert_eq!(task.date, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(task.priority, Priority::Low);
        assert!(task.completed);

        TaskPatch { date: Some(None), ..TaskPatch::default() }.apply(&mut task);
        assert_eq!(task.date, None);
    }
}
