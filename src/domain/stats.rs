use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, info};

use crate::domain::blame::{self, FileBlame};
use crate::domain::filter::FileFilter;
use crate::domain::git::HistorySource;
use crate::domain::tree::Tree;
use crate::error::{FameError, Result};

/// Which signature a line is credited to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Identity {
    #[default]
    Author,
    Committer,
}

impl Identity {
    pub fn key(self) -> &'static str {
        match self {
            Identity::Author => blame::AUTHOR,
            Identity::Committer => blame::COMMITTER,
        }
    }
}

/// Running totals for one contributor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContributorStats {
    /// Lines per (commit, file). Folding the same file twice overwrites
    /// rather than double counts.
    shares: BTreeMap<(String, String), usize>,
    pub commits: BTreeSet<String>,
    pub files: BTreeSet<String>,
}

impl ContributorStats {
    pub fn lines(&self) -> usize {
        self.shares.values().sum()
    }

    fn record(&mut self, hash: &str, path: &str, lines: usize) {
        self.commits.insert(hash.to_string());
        self.files.insert(path.to_string());
        self.shares
            .insert((hash.to_string(), path.to_string()), lines);
    }

    fn merge(&mut self, other: ContributorStats) {
        self.commits.extend(other.commits);
        self.files.extend(other.files);
        self.shares.extend(other.shares);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FameStats {
    pub files_scanned: usize,
    pub data: HashMap<String, ContributorStats>,
}

impl FameStats {
    /// Folds one file's commit table in. A commit without the identity key
    /// is credited to the empty-named contributor.
    pub fn fold(&mut self, path: &str, blame: &FileBlame, identity: Identity) {
        for commit in blame.commits() {
            let name = commit.get(identity.key());
            self.data
                .entry(name.to_string())
                .or_default()
                .record(&commit.hash, path, commit.lines);
        }
        self.files_scanned += 1;
    }

    pub fn merge(mut self, other: FameStats) -> FameStats {
        self.files_scanned += other.files_scanned;
        for (name, stats) in other.data {
            self.data.entry(name).or_default().merge(stats);
        }
        self
    }
}

/// Filters the tree, then blames every accepted file on the current rayon
/// pool. Each worker folds into its own partial stats; partials are merged
/// by contributor name. The first error stops the run.
pub fn collect_stats(
    source: &dyn HistorySource,
    tree: &Tree,
    filter: &FileFilter<'_>,
    revision: &str,
    identity: Identity,
) -> Result<FameStats> {
    let mut accepted = Vec::new();
    tree.walk(|id| {
        if filter.accepts(tree, id)? {
            accepted.push(tree.path(id));
        }
        Ok(())
    })?;
    info!(
        tracked = tree.files().len(),
        accepted = accepted.len(),
        "filtered repository tree"
    );

    let stats = accepted
        .par_iter()
        .map(|path| {
            debug!(file = %path, "blaming");
            blame::blame_file(source, path, revision).map(|b| (path, b))
        })
        .try_fold(FameStats::default, |mut acc, parsed| {
            let (path, blame) = parsed?;
            acc.fold(path, &blame, identity);
            Ok::<_, FameError>(acc)
        })
        .try_reduce(FameStats::default, |a, b| Ok(a.merge(b)))?;

    info!(
        files = stats.files_scanned,
        contributors = stats.data.len(),
        "collected blame statistics"
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::blame::parse_porcelain;
    use crate::domain::filter::FilterOpts;
    use crate::domain::git::testing::{commit_files, FakeHistory};
    use crate::domain::git::GitCli;
    use crate::domain::languages::LanguageTable;
    use crate::domain::tree::parse_ls_tree;

    const MAIN_GO: &str = "\
aaa 1 1 2
author Alice
committer Carol
\tpackage main
aaa 2 2
\t
bbb 1 3 1
author Bob
committer Carol
\tfunc main() {}
";

    const UTIL_GO: &str = "\
aaa 1 1 1
author Alice
committer Carol
\tpackage util
ccc 5 2 1
author Alice
committer Alice
\tfunc Util() {}
";

    fn history() -> FakeHistory {
        FakeHistory::default()
            .with_file("main.go", MAIN_GO)
            .with_file("pkg/util.go", UTIL_GO)
            .with_empty_file("pkg/empty.go", "ddd\nBob\nBob")
            .with_file("notes.md", "eee 1 1 1\nauthor Dan\ncommitter Dan\n\t# notes\n")
    }

    fn collect(
        source: &dyn HistorySource,
        root: &std::path::Path,
        opts: FilterOpts,
        identity: Identity,
    ) -> Result<FameStats> {
        let table = LanguageTable::bundled().unwrap();
        let filter = FileFilter::new(&opts, &table)?;
        let paths = parse_ls_tree(&source.list_tree("HEAD")?)?;
        let tree = Tree::from_paths(root, paths)?;
        collect_stats(source, &tree, &filter, "HEAD", identity)
    }

    fn run(history: &FakeHistory, opts: FilterOpts, identity: Identity) -> Result<FameStats> {
        collect(history, std::path::Path::new("/repo"), opts, identity)
    }

    fn run_git(dir: &std::path::Path, opts: FilterOpts) -> Result<FameStats> {
        let git = GitCli::discover(dir.to_str().unwrap(), "HEAD")?;
        collect(&git, git.root(), opts, Identity::Author)
    }

    #[test]
    fn totals_per_author() {
        let stats = run(&history(), FilterOpts::default(), Identity::Author).unwrap();
        assert_eq!(stats.files_scanned, 4);

        let alice = &stats.data["Alice"];
        assert_eq!(alice.lines(), 4);
        assert_eq!(alice.commits.len(), 2);
        assert_eq!(alice.files.len(), 2);

        let bob = &stats.data["Bob"];
        assert_eq!(bob.lines(), 1);
        assert_eq!(bob.commits.len(), 2);
        assert_eq!(bob.files.len(), 2);
    }

    #[test]
    fn empty_file_counts_as_touched_with_no_lines() {
        let stats = run(
            &history(),
            FilterOpts {
                restrict: vec!["pkg/empty.go".into()],
                ..Default::default()
            },
            Identity::Author,
        )
        .unwrap();
        let bob = &stats.data["Bob"];
        assert_eq!(bob.lines(), 0);
        assert_eq!(bob.files.len(), 1);
        assert_eq!(bob.commits.len(), 1);
    }

    #[test]
    fn committer_identity() {
        let stats = run(&history(), FilterOpts::default(), Identity::Committer).unwrap();
        assert_eq!(stats.data["Carol"].lines(), 4);
        assert_eq!(stats.data["Alice"].lines(), 1);
        assert_eq!(stats.data["Dan"].lines(), 1);
    }

    #[test]
    fn filter_applies_before_blame() {
        let stats = run(
            &history(),
            FilterOpts {
                extensions: vec![".md".into()],
                ..Default::default()
            },
            Identity::Author,
        )
        .unwrap();
        assert_eq!(stats.files_scanned, 1);
        assert_eq!(stats.data.keys().collect::<Vec<_>>(), vec!["Dan"]);
    }

    #[test]
    fn missing_identity_key_goes_to_empty_name() {
        let history = FakeHistory::default().with_file("a.txt", "fff 1 1 1\nsummary x\n\tline\n");
        let stats = run(&history, FilterOpts::default(), Identity::Author).unwrap();
        assert_eq!(stats.data[""].lines(), 1);
    }

    #[test]
    fn first_error_aborts_the_run() {
        let history = history().with_file("broken.go", "zzz one 1\n\tx\n");
        let err = run(&history, FilterOpts::default(), Identity::Author).unwrap_err();
        assert!(matches!(err, FameError::Parse { ref path, .. } if path == "broken.go"));
    }

    #[test]
    fn refolding_a_file_does_not_double_count() {
        let blame = parse_porcelain(MAIN_GO).unwrap();
        let mut stats = FameStats::default();
        stats.fold("main.go", &blame, Identity::Author);
        stats.fold("main.go", &blame, Identity::Author);
        assert_eq!(stats.data["Alice"].lines(), 2);
        assert_eq!(stats.data["Bob"].lines(), 1);
    }

    #[test]
    fn merge_unions_sets_and_sums_lines() {
        let mut left = FameStats::default();
        left.fold("main.go", &parse_porcelain(MAIN_GO).unwrap(), Identity::Author);
        let mut right = FameStats::default();
        right.fold("pkg/util.go", &parse_porcelain(UTIL_GO).unwrap(), Identity::Author);

        let merged = left.merge(right);
        let alice = &merged.data["Alice"];
        assert_eq!(alice.lines(), 4);
        assert_eq!(alice.commits.len(), 2);
        assert_eq!(alice.files.len(), 2);
        assert_eq!(merged.files_scanned, 2);
    }

    #[test]
    fn same_result_on_any_pool_size() {
        let history = history();
        let single = rayon::ThreadPoolBuilder::new()
            .num_threads(1)
            .build()
            .unwrap()
            .install(|| run(&history, FilterOpts::default(), Identity::Author))
            .unwrap();
        let many = rayon::ThreadPoolBuilder::new()
            .num_threads(4)
            .build()
            .unwrap()
            .install(|| run(&history, FilterOpts::default(), Identity::Author))
            .unwrap();
        assert_eq!(single, many);
    }

    #[test]
    fn git_repository_with_non_ascii_file_name() {
        let dir = tempfile::TempDir::new().unwrap();
        commit_files(
            dir.path(),
            &[("main.go", "package main\n\nfunc main() {}\n"), ("\u{fc}.go", "package u\n")],
        );

        let stats = run_git(dir.path(), FilterOpts::default()).unwrap();
        assert_eq!(stats.files_scanned, 2);
        let alice = &stats.data["Alice"];
        assert_eq!(alice.lines(), 4);
        assert!(alice.files.contains("\u{fc}.go"));
    }

    #[test]
    fn git_subdirectory_scopes_files_and_globs() {
        let dir = tempfile::TempDir::new().unwrap();
        commit_files(
            dir.path(),
            &[
                ("top.go", "package top\n"),
                ("sub/a.go", "package sub\n"),
                ("sub/gen/b.go", "package gen\n"),
            ],
        );

        let stats = run_git(
            &dir.path().join("sub"),
            FilterOpts {
                exclude: vec!["gen/*".into()],
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(stats.files_scanned, 1);
        assert_eq!(
            stats.data["Alice"].files.iter().collect::<Vec<_>>(),
            vec!["a.go"]
        );
    }
}
