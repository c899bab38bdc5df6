use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;
use crate::fields::Profile;

/// Personal task list with a terminal UI.
/// Storage defaults to ~/.tasklist/tasks.json or a path passed via --db.
#[derive(Parser)]
#[command(name = "tl", version, about = "Personal task list")]
pub struct Cli {
    /// Path to the JSON task file.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// dated: tasks carry due dates and priorities; basic: text only.
    #[arg(long, value_enum, global = true, default_value_t = Profile::Dated)]
    pub profile: Profile,

    /// Keep tasks in memory for this session only.
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// Log file used while the UI is running.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Log debug output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}
