use anyhow::Result;
use clap::Args;

use crate::commands::Global;
use crate::domain::git::{GitCli, HistorySource};
use crate::domain::tree::{self, parse_ls_tree};
use crate::error::FameError;

/// Tracked files at a revision, with the language of each
#[derive(Debug, Args)]
pub struct Tree {
    #[arg(short, long, default_value = ".")]
    pub repository: String,

    #[arg(short = 'R', long, default_value = "HEAD")]
    pub revision: String,
}

impl super::Runnable for Tree {
    fn run(self, g: &Global) -> Result<()> {
        let git = GitCli::discover(&self.repository, &self.revision)?;
        let table = g.languages()?;
        let paths = parse_ls_tree(&git.list_tree(&self.revision)?).map_err(|source| {
            FameError::Parse {
                path: format!("ls-tree {}", self.revision),
                source,
            }
        })?;
        let tree = tree::Tree::from_paths(git.root(), paths)?;

        let mut out = String::new();
        for (id, path) in tree.listing() {
            let node = tree.node(id);
            if node.is_file() {
                let lang = table.language_of(node.extension());
                out.push_str(&format!("{path}\t{lang}\n"));
            } else {
                out.push_str(&format!("{path}/\n"));
            }
        }
        print!("{out}");
        Ok(())
    }
}
