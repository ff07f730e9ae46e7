use git2::Repository;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

use crate::error::{FameError, Result};

pub struct RepoExt(pub Repository);

impl RepoExt {
    pub fn open(path: &str) -> Result<Self> {
        Repository::discover(path)
            .map(Self)
            .map_err(|e| FameError::RepositoryPath {
                path: PathBuf::from(path),
                message: e.message().to_string(),
            })
    }

    /// Working tree root; bare repositories have none.
    pub fn root(&self) -> Result<PathBuf> {
        self.0
            .workdir()
            .map(Path::to_path_buf)
            .ok_or_else(|| FameError::RepositoryPath {
                path: self.0.path().to_path_buf(),
                message: "repository has no working directory".into(),
            })
    }

    /// Fails unless `revision` names something that peels to a commit.
    pub fn check_revision(&self, revision: &str) -> Result<()> {
        let unknown = |e: git2::Error| FameError::UnknownRevision {
            revision: revision.to_string(),
            message: e.message().to_string(),
        };
        self.0
            .revparse_single(revision)
            .and_then(|obj| obj.peel_to_commit())
            .map(|_| ())
            .map_err(unknown)
    }
}

/// Text-producing history queries. Everything downstream depends only on
/// the textual output, not on how it is produced.
pub trait HistorySource: Sync {
    /// `git ls-tree -r -z` style records: `<mode> <type> <hash>\t<path>\0`,
    /// paths relative to the source's root directory.
    fn list_tree(&self, revision: &str) -> Result<String>;

    /// Porcelain blame of one file at `revision`.
    fn blame(&self, path: &str, revision: &str) -> Result<String>;

    /// Hash, author and committer of the last change to `path`, newline separated.
    fn last_change(&self, path: &str, revision: &str) -> Result<String>;
}

/// Runs the `git` binary inside one directory of a working tree. Listing
/// and blame are scoped to that directory.
#[derive(Debug, Clone)]
pub struct GitCli {
    root: PathBuf,
}

impl GitCli {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Checks that `path` lies in a working tree where `revision` exists and
    /// scopes the runner to `path` itself, not the working tree root.
    pub fn discover(path: &str, revision: &str) -> Result<Self> {
        let repo = RepoExt::open(path)?;
        let workdir = repo.root()?;
        repo.check_revision(revision)?;

        let dir = Path::new(path)
            .canonicalize()
            .map_err(|e| FameError::RepositoryPath {
                path: PathBuf::from(path),
                message: e.to_string(),
            })?;
        debug!(workdir = %workdir.display(), dir = %dir.display(), "resolved repository");
        Ok(Self::new(dir))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        let command = format!("git {}", args.join(" "));
        debug!(%command, root = %self.root.display(), "running git");

        let output = Command::new("git")
            .arg("-C")
            .arg(&self.root)
            .args(args)
            .output()
            .map_err(|e| FameError::Command {
                command: command.clone(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(FameError::Command {
                command,
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl HistorySource for GitCli {
    fn list_tree(&self, revision: &str) -> Result<String> {
        self.run(&["ls-tree", "-r", "-z", revision])
    }

    fn blame(&self, path: &str, revision: &str) -> Result<String> {
        self.run(&["blame", "--porcelain", revision, "--", path])
    }

    fn last_change(&self, path: &str, revision: &str) -> Result<String> {
        self.run(&[
            "log",
            "-1",
            "--pretty=format:%H%n%an%n%cn",
            revision,
            "--",
            path,
        ])
    }
}
