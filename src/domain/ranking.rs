use serde::Serialize;
use std::cmp::Ordering;
use std::str::FromStr;

use crate::domain::stats::FameStats;
use crate::error::FameError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Lines,
    Commits,
    Files,
    Names,
}

impl FromStr for SortKey {
    type Err = FameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lines" => Ok(SortKey::Lines),
            "commits" => Ok(SortKey::Commits),
            "files" => Ok(SortKey::Files),
            "names" => Ok(SortKey::Names),
            _ => Err(FameError::InvalidSortKey(s.to_string())),
        }
    }
}

impl SortKey {
    pub fn parse_list(tokens: &[String]) -> Result<Vec<SortKey>, FameError> {
        tokens.iter().map(|t| t.parse()).collect()
    }

    fn compare(self, a: &ReportUnit, b: &ReportUnit) -> Ordering {
        match self {
            SortKey::Lines => b.lines.cmp(&a.lines),
            SortKey::Commits => b.commits.cmp(&a.commits),
            SortKey::Files => b.files.cmp(&a.files),
            SortKey::Names => a.name.cmp(&b.name),
        }
    }
}

/// One ranked contributor, ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportUnit {
    pub name: String,
    pub lines: usize,
    pub commits: usize,
    pub files: usize,
}

/// Orders contributors by `keys`, then by lines, commits and files (all
/// descending) where not already given, and finally by name ascending.
pub fn rank(stats: &FameStats, keys: &[SortKey]) -> Vec<ReportUnit> {
    let mut order = keys.to_vec();
    for implicit in [SortKey::Lines, SortKey::Commits, SortKey::Files] {
        if !order.contains(&implicit) {
            order.push(implicit);
        }
    }

    let mut units: Vec<ReportUnit> = stats
        .data
        .iter()
        .map(|(name, c)| ReportUnit {
            name: name.clone(),
            lines: c.lines(),
            commits: c.commits.len(),
            files: c.files.len(),
        })
        .collect();

    units.sort_by(|a, b| {
        order
            .iter()
            .fold(Ordering::Equal, |acc, key| acc.then_with(|| key.compare(a, b)))
            .then_with(|| a.name.cmp(&b.name))
    });
    units
}
