//! CLI argument parsing for Habitual.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "hb",
    about = "Track daily habits and streaks",
    version,
    after_help = "Logs are written to: ~/.local/share/habitual/logs/habitual.log"
)]
pub struct Cli {
    /// Data directory (default: platform data dir, or data_dir from config)
    #[arg(short = 'd', long, global = true)]
    pub dir: Option<PathBuf>,

    /// Config file (default: ~/.config/habitual/habitual.yml)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create a new habit
    Add {
        /// Habit name
        name: String,

        /// Description
        #[arg(short = 'D', long, default_value = "")]
        description: String,

        /// Color identifier (e.g. "#4caf50")
        #[arg(short, long)]
        color: Option<String>,
    },

    /// Edit a habit
    Edit {
        /// Habit number as shown by `list`
        index: usize,

        /// New name
        #[arg(short, long)]
        name: Option<String>,

        /// New description
        #[arg(short = 'D', long)]
        description: Option<String>,

        /// New color
        #[arg(short, long)]
        color: Option<String>,
    },

    /// Delete a habit
    Delete {
        /// Habit number as shown by `list`
        index: usize,
    },

    /// Mark or unmark a day as completed
    Toggle {
        /// Habit number as shown by `list`
        index: usize,

        /// Day (YYYY-MM-DD, YYYYMMDD, today, yesterday)
        #[arg(default_value = "today")]
        day: String,
    },

    /// List habits with their recent days and current streak
    List,

    /// Show one habit in detail
    Show {
        /// Habit number as shown by `list`
        index: usize,
    },

    /// Completion statistics over a trailing window
    Stats {
        /// Window size in days (default: window_days from config)
        #[arg(short, long)]
        window: Option<u32>,
    },
}
