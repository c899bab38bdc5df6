//! Derived, filtered and sorted views of the task store.

use std::cmp::Reverse;

use chrono::NaiveDate;

use crate::fields::StatusFilter;
use crate::task::{Task, TaskId};

/// One displayed row, carrying where it came from in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewRow<'a> {
    /// Position of the task in the store at derivation time.
    pub index: usize,
    pub task: &'a Task,
}

impl ViewRow<'_> {
    pub fn id(&self) -> TaskId {
        self.task.id
    }
}

/// Status filter plus text search. Recomputed on every read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskQuery {
    pub filter: StatusFilter,
    pub search: String,
}

impl TaskQuery {
    /// Run the pipeline: status filter, then text search, then a stable sort
    /// by descending priority.
    pub fn apply<'a>(&self, tasks: &'a [Task], today: NaiveDate) -> Vec<ViewRow<'a>> {
        let needle = self.search.to_lowercase();
        let mut rows: Vec<ViewRow<'a>> = tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| self.matches_status(t, today))
            .filter(|(_, t)| needle.is_empty() || t.text.to_lowercase().contains(&needle))
            .map(|(index, task)| ViewRow { index, task })
            .collect();
        // `sort_by_key` is stable, so equal priorities keep their order.
        rows.sort_by_key(|r| Reverse(r.task.priority.rank()));
        rows
    }

    fn matches_status(&self, task: &Task, today: NaiveDate) -> bool {
        match self.filter {
            StatusFilter::All => true,
            StatusFilter::Completed => task.completed,
            StatusFilter::Pending => !task.completed,
            StatusFilter::Today => task.date == Some(today),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::Priority;

    fn task(id: u64, text: &str, priority: Priority, completed: bool, date: Option<NaiveDate>) -> Task {
        Task { id: TaskId(id), text: text.into(), date, priority, completed }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    fn texts(rows: &[ViewRow<'_>]) -> Vec<String> {
        rows.iter().map(|r| r.task.text.clone()).collect()
    }

    #[test]
    fn test_equal_priorities_keep_order() {
        let tasks = vec![
            task(1, "a", Priority::Medium, false, None),
            task(2, "b", Priority::Medium, false, None),
        ];
        let rows = TaskQuery::default().apply(&tasks, today());
        assert_eq!(texts(&rows), vec!["a", "b"]);
    }

    #[test]
    fn test_sort_descending_by_priority_and_tracks_store_index() {
        let tasks = vec![
            task(1, "low", Priority::Low, false, None),
            task(2, "med1", Priority::Medium, false, None),
            task(3, "high", Priority::High, false, None),
            task(4, "med2", Priority::Medium, false, None),
        ];
        let rows = TaskQuery::default().apply(&tasks, today());
        assert_eq!(texts(&rows), vec!["high", "med1", "med2", "low"]);
        let indices: Vec<usize> = rows.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![2, 1, 3, 0]);
        assert_eq!(rows[0].id(), TaskId(3));
    }

    #[test]
    fn test_today_filter() {
        let tasks = vec![
            task(1, "due today", Priority::Medium, false, NaiveDate::from_ymd_opt(2024, 1, 15)),
            task(2, "due tomorrow", Priority::Medium, false, NaiveDate::from_ymd_opt(2024, 1, 16)),
            task(3, "undated", Priority::Medium, false, None),
        ];
        let query = TaskQuery { filter: StatusFilter::Today, search: String::new() };
        assert_eq!(texts(&query.apply(&tasks, today())), vec!["due today"]);
    }

    #[test]
    fn test_status_filters() {
        let tasks = vec![
            task(1, "done", Priority::Medium, true, None),
            task(2, "open", Priority::Medium, false, None),
        ];
        let mut query = TaskQuery { filter: StatusFilter::Completed, search: String::new() };
        assert_eq!(texts(&query.apply(&tasks, today())), vec!["done"]);
        query.filter = StatusFilter::Pending;
        assert_eq!(texts(&query.apply(&tasks, today())), vec!["open"]);
        query.filter = StatusFilter::All;
        assert_eq!(query.apply(&tasks, today()).len(), 2);
    }

    #[test]
    fn test_search_is_case_insensitive_and_runs_after_filter() {
        let tasks = vec![
            task(1, "Buy MILK", Priority::Low, false, None),
            task(2, "milk the cow", Priority::High, true, None),
            task(3, "Call mom", Priority::High, false, None),
        ];
        let mut query = TaskQuery { filter: StatusFilter::All, search: "Milk".into() };
        assert_eq!(texts(&query.apply(&tasks, today())), vec!["milk the cow", "Buy MILK"]);
        query.filter = StatusFilter::Pending;
        assert_eq!(texts(&query.apply(&tasks, today())), vec!["Buy MILK"]);
        query.search = "nothing".into();
        assert!(query.apply(&tasks, today()).is_empty());
    }
}
