use anyhow::Result;
use std::path::PathBuf;

use crate::domain::languages::LanguageTable;

#[derive(Debug, Clone, Default)]
pub struct Global {
    /// Language table overriding the bundled one
    pub language_table: Option<PathBuf>,
}

impl Global {
    pub fn languages(&self) -> crate::error::Result<LanguageTable> {
        match &self.language_table {
            Some(path) => LanguageTable::load(path),
            None => LanguageTable::bundled(),
        }
    }
}

pub trait Runnable {
    fn run(self, g: &Global) -> Result<()>;
}

pub mod blame;
pub mod fame;
pub mod tree;

pub use blame::Blame;
pub use fame::Fame;
pub use tree::Tree;
