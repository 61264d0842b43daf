use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::model::TaskStatus;

#[derive(Parser)]
#[command(name = "daylist", version, about = "Daily tasks and notes in the terminal")]
pub struct Cli {
    /// Disable colored output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Directory holding storage.json
    #[arg(long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Config file (default: <config dir>/daylist/config.toml)
    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// More log output (repeat for more)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Less log output
    #[arg(short = 'q', long = "quiet", action = clap::ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Defaults to `today`
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Greeting, clock and today's tasks
    #[command(alias = "t")]
    Today,

    /// Add a task to today
    #[command(aliases = ["a", "new"])]
    Add {
        /// Task title, e.g. "Buy milk"
        title: String,
    },

    /// List the tasks of one day
    #[command(aliases = ["l", "ls"])]
    List {
        #[command(flatten)]
        day: DayArg,
    },

    /// Show every day that has tasks, most recent first
    #[command(aliases = ["history", "h"])]
    Days,

    /// Show one task
    #[command(alias = "v")]
    View {
        /// Position in the day list or task id
        task: String,

        #[command(flatten)]
        day: DayArg,
    },

    /// Mark a task as completed
    #[command(alias = "d")]
    Done {
        /// Position in the day list or task id
        task: String,

        #[command(flatten)]
        day: DayArg,
    },

    /// Mark a task as closed
    #[command(alias = "cl")]
    Close {
        /// Position in the day list or task id
        task: String,

        #[command(flatten)]
        day: DayArg,
    },

    /// Put a task back to pending
    #[command(aliases = ["u", "undone"])]
    Reopen {
        /// Position in the day list or task id
        task: String,

        #[command(flatten)]
        day: DayArg,
    },

    /// Set a task's status
    #[command(alias = "st")]
    Status {
        /// Position in the day list or task id
        task: String,

        #[arg(value_enum)]
        status: TaskStatus,

        #[command(flatten)]
        day: DayArg,
    },

    /// Delete a task
    #[command(aliases = ["x", "rm", "del"])]
    Delete {
        /// Position in the day list or task id
        task: String,

        #[command(flatten)]
        day: DayArg,
    },

    /// Move a task within its day
    #[command(alias = "mv")]
    Move {
        /// Position in the day list or task id
        task: String,

        #[command(flatten)]
        target: MoveTarget,

        #[command(flatten)]
        day: DayArg,
    },

    /// Counts and completion progress
    Stats {
        /// Count every stored task instead of one day
        #[arg(short = 'a', long = "all")]
        all: bool,

        #[command(flatten)]
        day: DayArg,
    },

    /// Freeform notes
    #[command(alias = "n")]
    Note {
        #[command(subcommand)]
        command: NoteCommands,
    },

    /// Show or change the color theme
    Theme {
        #[arg(value_enum)]
        mode: Option<ThemeMode>,
    },

    /// Show or set the name used in the greeting
    Name { name: Option<String> },

    /// Generate shell completions
    #[command(aliases = ["comp", "completion"])]
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Args, Clone, Debug, Default)]
pub struct DayArg {
    /// Day to work on: "today", "yesterday", "YYYY-MM-DD", or "DDMMYYYY"
    #[arg(short = 'd', long = "day")]
    pub day: Option<String>,
}

#[derive(Args, Clone, Debug)]
#[group(required = true, multiple = false)]
pub struct MoveTarget {
    /// Place right before this task
    #[arg(long = "before")]
    pub before: Option<String>,

    /// Place right after this task
    #[arg(long = "after")]
    pub after: Option<String>,

    /// Move to the top of the day
    #[arg(long = "top")]
    pub top: bool,

    /// Move to the bottom of the day
    #[arg(long = "bottom")]
    pub bottom: bool,
}

#[derive(Subcommand)]
pub enum NoteCommands {
    /// Add a note
    #[command(aliases = ["a", "new"])]
    Add { content: String },

    /// List notes, newest first
    #[command(aliases = ["l", "ls"])]
    List,

    /// Delete a note by position or id
    #[command(aliases = ["x", "rm", "del"])]
    Delete { note: String },
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum ThemeMode {
    Toggle,
    Dark,
    Light,
}

/// Log level used when `RUST_LOG` is unset. `-q` wins over `-v`.
fn log_level(verbose: u8, quiet: u8) -> &'static str {
    match (quiet, verbose) {
        (0, 0) => "warn",
        (0, 1) => "info",
        (0, 2) => "debug",
        (0, _) => "trace",
        (1, _) => "warn",
        _ => "error",
    }
}

pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(log_level(verbose, quiet)).context("invalid log filter")?,
    };

    let stderr = std::io::stderr();
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(stderr.is_terminal())
        .try_init();
    if installed.is_err() {
        debug!("log subscriber was already installed");
    }
    Ok(())
}
