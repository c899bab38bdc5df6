//! Command implementations for the CLI interface.
//!
//! Each handler drives the shared `TaskListView`, so the CLI applies exactly
//! the same validation and persistence rules as the terminal UI.

use chrono::{Local, NaiveDate};
use clap::Subcommand;
use clap_complete::{generate, Shell};

use crate::dates::format_due_relative;
use crate::editor::CommitOutcome;
use crate::error::TaskListError;
use crate::fields::{Priority, Profile, StatusFilter};
use crate::query::ViewRow;
use crate::task::TaskId;
use crate::tui::run::run_tui;
use crate::view::TaskListView;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive UI interface.
    Ui,

    /// Add a new task.
    Add {
        /// What needs doing.
        text: String,
        /// Due date: YYYY-MM-DD, "today", "tomorrow", "friday" or "in Nd".
        #[arg(long)]
        date: Option<String>,
        /// Priority: high | medium | low (default medium).
        #[arg(long, value_enum)]
        priority: Option<Priority>,
    },

    /// List tasks, highest priority first.
    List {
        /// Status filter: all | completed | pending | today.
        #[arg(long, value_enum, default_value_t = StatusFilter::All)]
        filter: StatusFilter,
        /// Case-insensitive text search.
        #[arg(long)]
        search: Option<String>,
        /// Limit number of rows printed.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Change an existing task. Omitted fields keep their value.
    Edit {
        id: u64,
        #[arg(long)]
        text: Option<String>,
        #[arg(long)]
        date: Option<String>,
        #[arg(long, value_enum)]
        priority: Option<Priority>,
    },

    /// Toggle a task between pending and completed.
    Toggle { id: u64 },

    /// Delete a task.
    Delete { id: u64 },

    /// Show how many tasks are completed.
    Progress,

    /// Generate shell completion scripts.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Notice for `--date`/`--priority` given under a profile that has no such fields.
fn ignored_details_notice(profile: Profile, date: Option<&str>, priority: Option<Priority>) -> Option<&'static str> {
    if !profile.has_details() && (date.is_some() || priority.is_some()) {
        Some("--date and --priority are only used with --profile dated; ignoring them")
    } else {
        None
    }
}

fn exit_with(context: &str, e: TaskListError) -> ! {
    eprintln!("{context}: {e}");
    std::process::exit(1);
}

/// Launch the terminal UI.
pub fn cmd_ui(view: TaskListView) {
    if let Err(e) = run_tui(view) {
        eprintln!("UI error: {e}");
        std::process::exit(1);
    }
}

/// Add a new task.
pub fn cmd_add(view: &mut TaskListView, text: String, date: Option<String>, priority: Option<Priority>) {
    if let Some(notice) = ignored_details_notice(view.profile(), date.as_deref(), priority) {
        eprintln!("{notice}");
    }
    let draft = &mut view.editor_mut().draft;
    draft.text = text;
    draft.date = date.unwrap_or_default();
    draft.priority = priority.unwrap_or_default();
    match view.commit(today()) {
        Ok(CommitOutcome::Inserted(id)) => println!("Added task {id}"),
        Ok(CommitOutcome::Updated(id)) => println!("Updated task {id}"),
        Err(e) => exit_with("Could not add task", e),
    }
}

/// List tasks with optional filters.
pub fn cmd_list(view: &mut TaskListView, filter: StatusFilter, search: Option<String>, limit: Option<usize>) {
    if !view.profile().has_query() && (filter != StatusFilter::All || search.is_some()) {
        eprintln!("Filters and search are only available with --profile dated");
    }
    view.set_filter(filter);
    view.set_search(search.unwrap_or_default());

    let today = today();
    let mut rows = view.rows(today);
    if let Some(n) = limit {
        rows.truncate(n);
    }
    if rows.is_empty() {
        println!("No tasks.");
    } else {
        print_table(&rows, view.profile().has_details(), today);
    }
    let progress = view.progress();
    println!("\n{}% Completed ({}/{})", progress.percent, progress.completed, progress.total);
}

/// Edit the text, date or priority of a task.
pub fn cmd_edit(
    view: &mut TaskListView,
    id: u64,
    text: Option<String>,
    date: Option<String>,
    priority: Option<Priority>,
) {
    if let Some(notice) = ignored_details_notice(view.profile(), date.as_deref(), priority) {
        eprintln!("{notice}");
    }
    if let Err(e) = view.start_edit(TaskId(id)) {
        exit_with("Could not edit task", e);
    }
    let draft = &mut view.editor_mut().draft;
    if let Some(text) = text {
        draft.text = text;
    }
    if let Some(date) = date {
        draft.date = date;
    }
    if let Some(priority) = priority {
        draft.priority = priority;
    }
    match view.commit(today()) {
        Ok(_) => println!("Updated task {id}"),
        Err(e) => exit_with("Could not update task", e),
    }
}

/// Toggle completion of a task.
pub fn cmd_toggle(view: &mut TaskListView, id: u64) {
    match view.toggle(TaskId(id)) {
        Ok(true) => println!("Task {id} completed."),
        Ok(false) => println!("Task {id} reopened."),
        Err(e) => exit_with("Could not toggle task", e),
    }
}

/// Delete a task.
pub fn cmd_delete(view: &mut TaskListView, id: u64) {
    match view.delete(TaskId(id)) {
        Ok(task) => println!("Deleted task {id}: {}", task.text),
        Err(e) => exit_with("Could not delete task", e),
    }
}

/// Print completion progress.
pub fn cmd_progress(view: &TaskListView) {
    let p = view.progress();
    println!("{}% Completed ({}/{} tasks)", p.percent, p.completed, p.total);
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;
    use crate::cli::Cli;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}

/// Print rows in a formatted table.
pub fn print_table(rows: &[ViewRow<'_>], details: bool, today: NaiveDate) {
    if details {
        println!("{:<5} {:<4} {:<7} {:<12} {}", "ID", "Done", "Pri", "Due", "Task");
    } else {
        println!("{:<5} {:<4} {}", "ID", "Done", "Task");
    }
    for row in rows {
        let t = row.task;
        let done = if t.completed { "[x]" } else { "[ ]" };
        if details {
            println!(
                "{:<5} {:<4} {:<7} {:<12} {}",
                t.id,
                done,
                t.priority.label(),
                format_due_relative(t.date, today),
                truncate(&t.text, 60)
            );
        } else {
            println!("{:<5} {:<4} {}", t.id, done, truncate(&t.text, 72));
        }
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly10!", 10), "exactly10!");
        assert_eq!(truncate("much longer text", 6), "much …");
        assert_eq!(truncate("héllo wörld", 4), "hél…");
    }

    #[test]
    fn test_basic_profile_notices_ignored_details() {
        assert!(ignored_details_notice(Profile::Basic, Some("today"), None).is_some());
        assert!(ignored_details_notice(Profile::Basic, None, Some(Priority::High)).is_some());
        assert_eq!(ignored_details_notice(Profile::Basic, None, None), None);
        assert_eq!(ignored_details_notice(Profile::Dated, Some("today"), Some(Priority::Low)), None);
    }
}
