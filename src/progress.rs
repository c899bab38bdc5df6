//! Completion progress derived from the task list.

use crate::task::Task;

/// Completed/total counts with a rounded percentage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
    pub percent: u8,
}

impl Progress {
    /// Percentage of completed tasks rounded to the nearest integer; 0 when empty.
    pub fn of(tasks: &[Task]) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|t| t.completed).count();
        let percent = if total == 0 {
            0
        } else {
            (completed as f64 / total as f64 * 100.0).round() as u8
        };
        Progress { completed, total, percent }
    }
}
