//! Repository tree built from a flat list of tracked paths.
//!
//! Nodes live in one arena owned by [`Tree`]; parents are indices into it,
//! used only to rebuild paths. Children are kept in a `BTreeMap`, so every
//! traversal visits siblings in name order.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{FameError, ParseError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
pub enum NodeKind {
    File,
    Dir(BTreeMap<String, NodeId>),
}

#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub parent: Option<NodeId>,
    pub kind: NodeKind,
}

impl Node {
    pub fn is_file(&self) -> bool {
        matches!(self.kind, NodeKind::File)
    }

    /// Substring from the last `.` of the name, dot included; empty if none.
    pub fn extension(&self) -> &str {
        self.name.rfind('.').map_or("", |i| &self.name[i..])
    }
}

#[derive(Debug, Clone)]
pub struct Tree {
    root: PathBuf,
    nodes: Vec<Node>,
}

impl Tree {
    const ROOT: NodeId = NodeId(0);

    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let name = root.display().to_string();
        Self {
            root,
            nodes: vec![Node {
                name,
                parent: None,
                kind: NodeKind::Dir(BTreeMap::new()),
            }],
        }
    }

    /// Builds the tree for `paths`, each a `/`-separated file path relative
    /// to `root`. A name used both as a file and as a directory is rejected.
    pub fn from_paths<I, S>(root: impl Into<PathBuf>, paths: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tree = Self::new(root);
        for path in paths {
            tree.insert(path.as_ref())?;
        }
        Ok(tree)
    }

    pub fn insert(&mut self, path: &str) -> Result<NodeId> {
        let components: Vec<&str> = path.split('/').filter(|c| !c.is_empty()).collect();
        let Some((file_name, dirs)) = components.split_last() else {
            return Err(FameError::Parse {
                path: path.to_string(),
                source: ParseError::InvalidTreeOutput(path.to_string()),
            });
        };

        let mut current = Self::ROOT;
        for dir in dirs {
            current = match self.child(current, dir) {
                Some(id) if !self.nodes[id.0].is_file() => id,
                Some(_) => return Err(FameError::PathCollision(self.join(current, dir))),
                None => self.push(current, dir, NodeKind::Dir(BTreeMap::new())),
            };
        }

        match self.child(current, file_name) {
            Some(id) if self.nodes[id.0].is_file() => Ok(id),
            Some(_) => Err(FameError::PathCollision(self.join(current, file_name))),
            None => Ok(self.push(current, file_name, NodeKind::File)),
        }
    }

    fn child(&self, dir: NodeId, name: &str) -> Option<NodeId> {
        match &self.nodes[dir.0].kind {
            NodeKind::Dir(kids) => kids.get(name).copied(),
            NodeKind::File => None,
        }
    }

    fn push(&mut self, parent: NodeId, name: &str, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            name: name.to_string(),
            parent: Some(parent),
            kind,
        });
        if let NodeKind::Dir(kids) = &mut self.nodes[parent.0].kind {
            kids.insert(name.to_string(), id);
        }
        id
    }

    fn join(&self, dir: NodeId, name: &str) -> String {
        let prefix = self.path(dir);
        if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{prefix}/{name}")
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Path relative to the root, `/`-separated. Empty for the root itself.
    pub fn path(&self, id: NodeId) -> String {
        let mut names = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let node = &self.nodes[current.0];
            if node.parent.is_some() {
                names.push(node.name.as_str());
            }
            cursor = node.parent;
        }
        names.reverse();
        names.join("/")
    }

    /// Absolute path: the root joined with the relative one.
    pub fn full_path(&self, id: NodeId) -> PathBuf {
        self.path(id)
            .split('/')
            .filter(|c| !c.is_empty())
            .fold(self.root.clone(), |acc, c| acc.join(c))
    }

    /// Files in depth-first, name-ordered traversal.
    pub fn files(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_files(Self::ROOT, &mut out);
        out
    }

    fn collect_files(&self, dir: NodeId, out: &mut Vec<NodeId>) {
        if let NodeKind::Dir(kids) = &self.nodes[dir.0].kind {
            for &id in kids.values() {
                match self.nodes[id.0].kind {
                    NodeKind::File => out.push(id),
                    NodeKind::Dir(_) => self.collect_files(id, out),
                }
            }
        }
    }

    /// Visits files in traversal order, stopping at the first error.
    pub fn walk<F>(&self, visit: F) -> Result<()>
    where
        F: FnMut(NodeId) -> Result<()>,
    {
        self.files().into_iter().try_for_each(visit)
    }

    /// Every node with its display path, directories before their contents.
    pub fn listing(&self) -> Vec<(NodeId, String)> {
        let mut out = Vec::new();
        self.collect_listing(Self::ROOT, &mut out);
        out
    }

    fn collect_listing(&self, id: NodeId, out: &mut Vec<(NodeId, String)>) {
        let display = if id == Self::ROOT {
            self.root.display().to_string()
        } else {
            self.path(id)
        };
        out.push((id, display));
        if let NodeKind::Dir(kids) = &self.nodes[id.0].kind {
            for &kid in kids.values() {
                self.collect_listing(kid, out);
            }
        }
    }
}

/// Extracts file paths from `git ls-tree -r -z` output. Records are
/// NUL-terminated `<mode> <type> <hash>\t<path>`; entries that are not
/// blobs (submodule gitlinks) are skipped.
pub fn parse_ls_tree(output: &str) -> std::result::Result<Vec<String>, ParseError> {
    let mut paths = Vec::new();
    for record in output.split_terminator('\0') {
        let invalid = || ParseError::InvalidTreeOutput(record.to_string());
        let mut parts = record.split('\t');
        let (Some(head), Some(path), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(invalid());
        };
        match head.split_whitespace().nth(1) {
            Some("blob") => paths.push(path.to_string()),
            Some(_) => continue,
            None => return Err(invalid()),
        }
    }
    Ok(paths)
}
