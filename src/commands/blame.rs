use anyhow::Result;
use clap::Args;

use crate::commands::Global;
use crate::domain::{blame, git::GitCli};
use crate::presentation::blame::dump;

/// Parsed blame of one file: commit table, then lines in file order
#[derive(Debug, Args)]
pub struct Blame {
    /// File path relative to the repository root
    #[arg(short, long)]
    pub file: String,

    #[arg(short, long, default_value = ".")]
    pub repository: String,

    #[arg(short = 'R', long, default_value = "HEAD")]
    pub revision: String,
}

impl super::Runnable for Blame {
    fn run(self, _g: &Global) -> Result<()> {
        let git = GitCli::discover(&self.repository, &self.revision)?;
        let parsed = blame::blame_file(&git, &self.file, &self.revision)?;
        print!("{}", dump(&parsed));
        Ok(())
    }
}
