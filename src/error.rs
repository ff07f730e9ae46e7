use std::path::PathBuf;
use thiserror::Error;

/// Problems with the text returned by git itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("malformed blame header {0:?}")]
    MalformedHeader(String),

    #[error("malformed blame metadata line {0:?}")]
    MalformedMetadata(String),

    #[error("blame block starting at {0:?} has no content line")]
    TruncatedBlock(String),

    #[error("invalid ls-tree record {0:?}")]
    InvalidTreeOutput(String),

    #[error("invalid last-change metadata {0:?}")]
    InvalidFallbackMetadata(String),
}

#[derive(Debug, Error)]
pub enum FameError {
    // parameters
    #[error("unexpected sort key: {0}")]
    InvalidSortKey(String),

    #[error("invalid glob pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        source: globset::Error,
    },

    #[error("undefined language(s) in filter: {}", .0.join(", "))]
    UndefinedLanguage(Vec<String>),

    #[error("unexpected format: {0:?}")]
    UnknownFormat(String),

    // path resolution
    #[error("cannot open repository at {path}: {message}")]
    RepositoryPath { path: PathBuf, message: String },

    #[error("unknown revision {revision:?}: {message}")]
    UnknownRevision { revision: String, message: String },

    // language info
    #[error("cannot load language table from {path}: {message}")]
    LanguageTable { path: String, message: String },

    // statistics collection
    #[error("command `{command}` failed: {message}")]
    Command { command: String, message: String },

    #[error("{path}: {source}")]
    Parse { path: String, source: ParseError },

    #[error("cannot make {path} relative to {root}")]
    RelativePath { path: PathBuf, root: PathBuf },

    #[error("{0} is both a file and a directory")]
    PathCollision(String),

    // output formatting
    #[error("cannot serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl From<ParseError> for FameError {
    fn from(source: ParseError) -> Self {
        FameError::Parse {
            path: "<unknown>".to_string(),
            source,
        }
    }
}

impl FameError {
    /// Process exit status for this error's category.
    pub fn exit_code(&self) -> i32 {
        match self {
            FameError::InvalidSortKey(_)
            | FameError::InvalidPattern { .. }
            | FameError::UndefinedLanguage(_)
            | FameError::UnknownFormat(_) => 1,
            FameError::RepositoryPath { .. } | FameError::UnknownRevision { .. } => 2,
            FameError::LanguageTable { .. } => 3,
            FameError::Command { .. }
            | FameError::Parse { .. }
            | FameError::RelativePath { .. }
            | FameError::PathCollision(_) => 4,
            FameError::Serialize(_) => 5,
        }
    }
}

pub type Result<T> = std::result::Result<T, FameError>;
