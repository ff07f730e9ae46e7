use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::{Blame, Fame, Tree};

/// Who owns the lines of a Git repository
#[derive(Parser)]
#[command(
    name = "gitfame",
    version,
    about = "Per-contributor line, commit and file counts from git blame",
    long_about = None,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// More logging on stderr (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// JSON language table ([{"name": .., "extensions": [..]}]) instead of the bundled one
    #[arg(long, global = true)]
    pub language_table: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Lines, commits and files per contributor
    Fame(Fame),

    /// Parsed blame of a single file
    Blame(Blame),

    /// Tracked files and their languages
    Tree(Tree),
}
