//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::window::WindowMode;

/// Stats command arguments.
#[derive(Debug, Args)]
pub struct StatsCommand {
    /// Time window to aggregate
    #[arg(short, long, value_enum)]
    pub window: Option<WindowArg>,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Import command arguments.
#[derive(Debug, Args)]
pub struct ImportCommand {
    /// Path to a JSON file containing an array of flight records
    pub file: PathBuf,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Window selector argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WindowArg {
    /// The current calendar day
    Today,
    /// The 30 calendar days ending today
    Last30d,
}

impl From<WindowArg> for WindowMode {
    fn from(arg: WindowArg) -> Self {
        match arg {
            WindowArg::Today => Self::Today,
            WindowArg::Last30d => Self::Last30d,
        }
    }
}
