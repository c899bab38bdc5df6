//! # tl - Personal Task List
//!
//! A small task list with a terminal user interface (TUI) and a scripting CLI.
//!
//! ## Key Features
//!
//! - **Tasks with priorities and due dates**: High / Medium / Low, sorted highest first
//! - **Filtering and search**: All, Completed, Pending or Due Today, plus case-insensitive search
//! - **Progress**: percentage of completed tasks, shown as a gauge in the UI
//! - **Two profiles**: `dated` (date + priority required) or `basic` (text only)
//! - **Local File Storage**: one JSON file, rewritten atomically after every change
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the UI
//! tl ui
//!
//! # Add a task via CLI
//! tl add "Renew passport" --date "in 2w" --priority high
//!
//! # List pending tasks that mention "passport"
//! tl list --filter pending --search passport
//!
//! # Mark task 3 as done
//! tl toggle 3
//! ```
//!
//! Data is stored in `~/.tasklist/tasks.json` unless `--db` is given.
//! `--ephemeral` keeps everything in memory for the current session.

use std::path::PathBuf;

use clap::Parser;
use tracing::debug;

pub mod cli;
pub mod cmd;
pub mod dates;
pub mod editor;
pub mod error;
pub mod fields;
pub mod logging;
pub mod progress;
pub mod query;
pub mod storage;
pub mod store;
pub mod task;
pub mod view;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod input;
    pub mod run;
    pub mod task_form;
    pub mod utils;
}

use cli::Cli;
use cmd::*;
use storage::{JsonFileStorage, MemoryStorage, TaskStorage};
use view::TaskListView;

/// Directory holding the default task file and UI log.
fn data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".tasklist")
}

fn main() {
    let cli = Cli::parse();
    let data_dir = data_dir();

    // The UI owns the terminal, so it logs to a file.
    if matches!(cli.command, Commands::Ui) {
        let log_path = cli.log_file.clone().unwrap_or_else(|| data_dir.join("tasklist.log"));
        if let Err(e) = logging::init_file(&log_path, cli.verbose) {
            eprintln!("Failed to open log file {}: {}", log_path.display(), e);
            std::process::exit(1);
        }
    } else {
        logging::init_stderr(cli.verbose);
    }

    if let Commands::Completions { shell } = cli.command {
        cmd_completions(shell);
        return;
    }

    let storage: Box<dyn TaskStorage> = if cli.ephemeral {
        Box::new(MemoryStorage::new())
    } else {
        let db_path = cli.db.clone().unwrap_or_else(|| data_dir.join("tasks.json"));
        Box::new(JsonFileStorage::new(db_path))
    };
    debug!(profile = ?cli.profile, storage = %storage.describe(), "starting");

    let mut view = TaskListView::load(storage, cli.profile);

    match cli.command {
        Commands::Ui => cmd_ui(view),
        Commands::Add { text, date, priority } => cmd_add(&mut view, text, date, priority),
        Commands::List { filter, search, limit } => cmd_list(&mut view, filter, search, limit),
        Commands::Edit { id, text, date, priority } => cmd_edit(&mut view, id, text, date, priority),
        Commands::Toggle { id } => cmd_toggle(&mut view, id),
        Commands::Delete { id } => cmd_delete(&mut view, id),
        Commands::Progress => cmd_progress(&view),
        Commands::Completions { .. } => unreachable!("completions handled above"),
    }
}
