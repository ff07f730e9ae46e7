//! Porcelain blame parsing.
//!
//! One report is a sequence of blocks:
//!
//! ```text
//! <hash> <orig-line> <final-line> [<group-size>]
//! <key> <value>          (first sighting of a hash only)
//! boundary               (optional, root commits)
//! \t<content>
//! ```

use std::collections::{BTreeMap, HashMap};
use tracing::info;

use crate::domain::git::HistorySource;
use crate::error::{FameError, ParseError, Result};

/// Upstream emits this in place of a header for some malformed hashes.
const NIL_MARKER: &str = " <nil>";
const BOUNDARY: &str = "boundary";

pub const AUTHOR: &str = "author";
pub const COMMITTER: &str = "committer";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub hash: String,
    /// Open-ended header fields. Aggregation reads only `author` and `committer`.
    pub meta: BTreeMap<String, String>,
    /// Lines of the parsed file attributed to this commit.
    pub lines: usize,
}

impl Commit {
    pub fn new(hash: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            meta: BTreeMap::new(),
            lines: 0,
        }
    }

    pub fn get(&self, key: &str) -> &str {
        self.meta.get(key).map_or("", String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// Index into [`FileBlame::commits`].
    pub commit: usize,
    pub prev_line: u64,
    pub cur_line: u64,
    pub content: String,
}

/// Commit table and lines of one file, in the order the report listed them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileBlame {
    commits: Vec<Commit>,
    index: HashMap<String, usize>,
    lines: Vec<Line>,
}

impl FileBlame {
    pub fn commits(&self) -> &[Commit] {
        &self.commits
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn commit_of(&self, line: &Line) -> &Commit {
        &self.commits[line.commit]
    }

    /// Returns the commit's index and whether it was seen for the first time.
    fn intern(&mut self, hash: &str) -> (usize, bool) {
        if let Some(&i) = self.index.get(hash) {
            return (i, false);
        }
        let i = self.commits.len();
        self.commits.push(Commit::new(hash));
        self.index.insert(hash.to_string(), i);
        (i, true)
    }

    fn count_lines(&mut self) {
        for commit in &mut self.commits {
            commit.lines = 0;
        }
        for line in &self.lines {
            self.commits[line.commit].lines += 1;
        }
    }
}

fn parse_header(header: &str) -> std::result::Result<(&str, u64, u64), ParseError> {
    let malformed = || ParseError::MalformedHeader(header.to_string());
    let parts: Vec<&str> = header.split_whitespace().collect();
    if !(3..=4).contains(&parts.len()) {
        return Err(malformed());
    }
    let prev = parts[1].parse::<u64>().map_err(|_| malformed())?;
    let cur = parts[2].parse::<u64>().map_err(|_| malformed())?;
    if let Some(group) = parts.get(3) {
        group.parse::<u64>().map_err(|_| malformed())?;
    }
    Ok((parts[0], prev, cur))
}

/// Parses porcelain blame text. Pure: the same text always yields the same result.
pub fn parse_porcelain(text: &str) -> std::result::Result<FileBlame, ParseError> {
    let mut blame = FileBlame::default();
    // content lines are literal, so a trailing '\r' stays
    let mut rows = text.split_terminator('\n');

    while let Some(header) = rows.next() {
        if header == NIL_MARKER {
            continue;
        }
        let (hash, prev_line, cur_line) = parse_header(header)?;
        let (commit, first_sighting) = blame.intern(hash);

        let content = loop {
            let Some(row) = rows.next() else {
                return Err(ParseError::TruncatedBlock(header.to_string()));
            };
            if let Some(content) = row.strip_prefix('\t') {
                break content;
            }
            if row == BOUNDARY {
                continue;
            }
            let Some((key, value)) = row.split_once(' ') else {
                return Err(ParseError::MalformedMetadata(row.to_string()));
            };
            if first_sighting {
                blame.commits[commit]
                    .meta
                    .insert(key.to_string(), value.to_string());
            }
        };

        blame.lines.push(Line {
            commit,
            prev_line,
            cur_line,
            content: content.to_string(),
        });
    }

    if !blame.lines.is_empty() {
        blame.count_lines();
    }
    Ok(blame)
}

/// Parses `<hash>\n<author>\n<committer>` into a zero-line commit.
pub fn parse_last_change(text: &str) -> std::result::Result<Commit, ParseError> {
    let fields: Vec<&str> = text.lines().collect();
    let [hash, author, committer] = fields.as_slice() else {
        return Err(ParseError::InvalidFallbackMetadata(text.to_string()));
    };
    if hash.trim().is_empty() {
        return Err(ParseError::InvalidFallbackMetadata(text.to_string()));
    }

    let mut commit = Commit::new(hash.trim());
    commit.meta.insert(AUTHOR.to_string(), author.to_string());
    commit.meta.insert(COMMITTER.to_string(), committer.to_string());
    Ok(commit)
}

/// Blames `path` at `revision`. A file whose report holds no blocks is
/// credited to the last commit that touched it, with zero lines.
pub fn blame_file(source: &dyn HistorySource, path: &str, revision: &str) -> Result<FileBlame> {
    let at = |source: ParseError| FameError::Parse {
        path: path.to_string(),
        source,
    };

    let text = source.blame(path, revision)?;
    let mut blame = parse_porcelain(&text).map_err(at)?;

    if blame.commits.is_empty() {
        let output = source.last_change(path, revision)?;
        info!(file = path, last_change = %output.replace('\n', " "), "found empty file");
        let commit = parse_last_change(&output).map_err(at)?;
        blame.index.insert(commit.hash.clone(), 0);
        blame.commits.push(commit);
    }
    Ok(blame)
}
