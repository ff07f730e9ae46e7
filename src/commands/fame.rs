use anyhow::{Context, Result};
use clap::Args;

use crate::commands::Global;
use crate::domain::filter::{FileFilter, FilterOpts};
use crate::domain::git::{GitCli, HistorySource};
use crate::domain::ranking::{self, SortKey};
use crate::domain::stats::{self, Identity};
use crate::domain::tree::{parse_ls_tree, Tree};
use crate::error::FameError;
use crate::presentation::report::{self, OutputFormat};

/// Lines, commits and files per contributor at one revision.
#[derive(Debug, Args)]
pub struct Fame {
    /// Directory to analyse: a working tree root or any directory inside it
    #[arg(short, long, default_value = ".")]
    pub repository: String,

    /// Revision to blame
    #[arg(short = 'R', long, default_value = "HEAD")]
    pub revision: String,

    /// Sort keys, any of: lines, commits, files, names (lines, commits and
    /// files are always appended as tie-breakers)
    #[arg(short, long, value_delimiter = ',')]
    pub order_by: Vec<String>,

    /// Credit lines to the committer instead of the author
    #[arg(short = 'C', long)]
    pub use_committer: bool,

    /// Only files with these extensions, e.g. ".go,.rs"
    #[arg(short, long, value_delimiter = ',')]
    pub extensions: Vec<String>,

    /// Only files in these languages, e.g. "go,rust"
    #[arg(short, long, value_delimiter = ',')]
    pub languages: Vec<String>,

    /// Skip files matching any of these globs
    #[arg(short = 'x', long, value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Keep only files matching at least one of these globs
    #[arg(short = 't', long, value_delimiter = ',')]
    pub restrict_to: Vec<String>,

    /// Output format: tabular, pretty, json, json-lines, csv
    #[arg(short, long, default_value = "tabular")]
    pub format: String,

    /// Number of threads for parallel blame (0 = rayon default)
    #[arg(long, default_value = "0")]
    pub threads: usize,
}

impl Fame {
    fn filter_opts(&self) -> FilterOpts {
        FilterOpts {
            extensions: self.extensions.clone(),
            languages: self.languages.clone(),
            exclude: self.exclude.clone(),
            restrict: self.restrict_to.clone(),
        }
    }
}

impl super::Runnable for Fame {
    fn run(self, g: &Global) -> Result<()> {
        let keys = SortKey::parse_list(&self.order_by)?;
        let format: OutputFormat = self.format.parse()?;
        let identity = if self.use_committer {
            Identity::Committer
        } else {
            Identity::Author
        };

        let git = GitCli::discover(&self.repository, &self.revision)?;
        let table = g.languages()?;
        let opts = self.filter_opts();
        let filter = FileFilter::new(&opts, &table)?;

        let run_inner = || -> Result<stats::FameStats> {
            let listing = git.list_tree(&self.revision)?;
            let paths = parse_ls_tree(&listing).map_err(|source| FameError::Parse {
                path: format!("ls-tree {}", self.revision),
                source,
            })?;
            let tree = Tree::from_paths(git.root(), paths)?;
            let stats = stats::collect_stats(&git, &tree, &filter, &self.revision, identity)
                .with_context(|| format!("collecting blame statistics at {}", self.revision))?;
            Ok(stats)
        };

        let stats = if self.threads > 0 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.threads)
                .build()?;
            pool.install(run_inner)?
        } else {
            run_inner()?
        };

        let units = ranking::rank(&stats, &keys);
        print!("{}", report::render(&units, format)?);
        Ok(())
    }
}
