//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// A simple stopwatch with lap splits.
///
/// Run `smpl run` and type key names (space, l, r, left, right, ?, q), one
/// per line.
#[derive(Debug, Parser)]
#[command(name = "smpl", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start an interactive stopwatch session.
    Run {
        /// Print the recorded laps as JSON when the session ends.
        #[arg(long)]
        json: bool,
    },

    /// Show or change the color theme.
    #[command(subcommand)]
    Theme(ThemeAction),

    /// Format a millisecond duration as mm:ss.
    Format {
        /// Duration in milliseconds.
        ms: u64,
    },
}

/// Theme operations.
#[derive(Debug, Subcommand)]
pub enum ThemeAction {
    /// Print the current theme.
    Show,
    /// Switch to the next theme.
    Next,
    /// Switch to the previous theme.
    Prev,
    /// Switch to a theme by name (e.g., sky-blue).
    Set {
        /// Theme slug.
        name: String,
    },
    /// List all themes.
    List,
}
