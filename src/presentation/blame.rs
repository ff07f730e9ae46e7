use std::collections::HashMap;

use crate::domain::blame::{Commit, FileBlame};
use crate::utils::fmt_epoch;

const EPOCH_KEYS: &[&str] = &["author-time", "committer-time"];

/// Commit table ordered by commit time, then the lines in file order.
pub fn dump(blame: &FileBlame) -> String {
    let mut commits: Vec<&Commit> = blame.commits().iter().collect();
    commits.sort_by(|a, b| {
        a.get("committer-time")
            .cmp(b.get("committer-time"))
            .then_with(|| a.hash.cmp(&b.hash))
    });

    let mut out = String::from("Num\tHash (Meta)\n");
    let mut numbers: HashMap<&str, usize> = HashMap::new();
    for (num, commit) in commits.iter().enumerate() {
        numbers.insert(commit.hash.as_str(), num);
        out.push_str(&format!("{num}\t{}\t{} lines\n", commit.hash, commit.lines));
        for (key, value) in &commit.meta {
            let tabs = if key.len() < 8 { "\t\t" } else { "\t" };
            match EPOCH_KEYS.contains(&key.as_str()).then(|| fmt_epoch(value)).flatten() {
                Some(date) => out.push_str(&format!("\t{key}{tabs}{value} ({date})\n")),
                None => out.push_str(&format!("\t{key}{tabs}{value}\n")),
            }
        }
    }

    out.push_str("\nNum\tCommit\tContent\n");
    let mut lines: Vec<_> = blame.lines().iter().collect();
    lines.sort_by_key(|l| l.cur_line);
    for line in lines {
        let num = numbers[blame.commit_of(line).hash.as_str()];
        out.push_str(&format!("{}\t{num}\t{}\n", line.cur_line, line.content));
    }
    out
}
