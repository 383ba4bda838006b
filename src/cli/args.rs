//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Hierarchical play registry: folder-driven categories, toggleable plays
#[derive(Parser, Debug)]
#[command(name = "playreg")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Project directory holding .playreg.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    /// Plays directory (overrides config)
    #[arg(short, long, global = true, value_hint = ValueHint::DirPath)]
    pub plays_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the play hierarchy
    Tree {
        /// Plays to disable before printing (display name, repeatable)
        #[arg(short, long)]
        disable: Vec<String>,
        /// Draw with box characters instead of indentation
        #[arg(long)]
        fancy: bool,
    },

    /// List enabled plays in traversal order
    Enabled {
        /// Plays to disable before listing (display name, repeatable)
        #[arg(short, long)]
        disable: Vec<String>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings
    Show,
    /// Show config file locations
    Path,
    /// Print a commented config template
    Template,
}
