use globset::{Glob, GlobBuilder, GlobSet, GlobSetBuilder};

use crate::domain::languages::LanguageTable;
use crate::domain::tree::{NodeId, Tree};
use crate::error::{FameError, Result};

/// Raw filter options, as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct FilterOpts {
    pub extensions: Vec<String>,
    pub languages: Vec<String>,
    pub exclude: Vec<String>,
    pub restrict: Vec<String>,
}

/// Validated per-file predicate. Building it checks every glob and
/// language up front, so no file is blamed with a bad configuration.
#[derive(Debug, Clone)]
pub struct FileFilter<'a> {
    extensions: Vec<String>,
    languages: Vec<String>,
    exclude: Option<GlobSet>,
    restrict: Option<GlobSet>,
    table: &'a LanguageTable,
}

/// A whole-set failure names every pattern in the set.
fn set_error(patterns: &[String], source: globset::Error) -> FameError {
    FameError::InvalidPattern {
        pattern: patterns.join(","),
        source,
    }
}

/// Shell-style globs where `*` and `?` stay within one path segment.
fn build_globset(patterns: &[String]) -> Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let invalid = |pattern: &str, source| FameError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    };
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob: Glob = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .map_err(|e| invalid(pattern, e))?;
        builder.add(glob);
    }
    builder
        .build()
        .map(Some)
        .map_err(|e| set_error(patterns, e))
}

impl<'a> FileFilter<'a> {
    pub fn new(opts: &FilterOpts, table: &'a LanguageTable) -> Result<Self> {
        Ok(Self {
            extensions: opts.extensions.clone(),
            languages: table.resolve(&opts.languages)?,
            exclude: build_globset(&opts.exclude)?,
            restrict: build_globset(&opts.restrict)?,
            table,
        })
    }

    /// Whether `file` takes part in the statistics. Checks run in order and
    /// stop at the first rejection: extension, language, exclude, restrict.
    pub fn accepts(&self, tree: &Tree, file: NodeId) -> Result<bool> {
        let ext = tree.node(file).extension();

        if !self.extensions.is_empty() && !self.extensions.iter().any(|e| e == ext) {
            return Ok(false);
        }

        if !self.languages.is_empty() {
            let lang = self.table.language_of(ext);
            if !self.languages.iter().any(|l| l == lang) {
                return Ok(false);
            }
        }

        let full = tree.full_path(file);
        let rel = full
            .strip_prefix(tree.root())
            .map_err(|_| FameError::RelativePath {
                path: full.clone(),
                root: tree.root().to_path_buf(),
            })?;

        if self.exclude.as_ref().is_some_and(|set| set.is_match(rel)) {
            return Ok(false);
        }

        if self.restrict.as_ref().is_some_and(|set| !set.is_match(rel)) {
            return Ok(false);
        }

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> Tree {
        Tree::from_paths(
            "/repo",
            ["main.py", "main.go", "src/x.go", "lib/x.go", "src/deep/y.go", "README"],
        )
        .unwrap()
    }

    fn accepted(opts: FilterOpts) -> Vec<String> {
        let table = LanguageTable::bundled().unwrap();
        let filter = FileFilter::new(&opts, &table).unwrap();
        let tree = tree();
        tree.files()
            .into_iter()
            .filter(|&id| filter.accepts(&tree, id).unwrap())
            .map(|id| tree.path(id))
            .collect()
    }

    #[test]
    fn no_options_accepts_everything() {
        assert_eq!(accepted(FilterOpts::default()).len(), 6);
    }

    #[test]
    fn extension_allow_list() {
        let got = accepted(FilterOpts {
            extensions: vec![".go".into()],
            ..Default::default()
        });
        assert!(!got.contains(&"main.py".to_string()));
        assert!(got.contains(&"main.go".to_string()));
        assert!(!got.contains(&"README".to_string()));
    }

    #[test]
    fn language_allow_list() {
        let got = accepted(FilterOpts {
            languages: vec!["Python".into()],
            ..Default::default()
        });
        assert_eq!(got, vec!["main.py"]);
    }

    #[test]
    fn restrict_keeps_only_matches() {
        let got = accepted(FilterOpts {
            restrict: vec!["src/*".into()],
            ..Default::default()
        });
        // `*` does not cross a separator
        assert_eq!(got, vec!["src/x.go"]);
    }

    #[test]
    fn exclude_wins_over_restrict() {
        let got = accepted(FilterOpts {
            restrict: vec!["src/*".into(), "*.go".into()],
            exclude: vec!["src/x.go".into()],
            ..Default::default()
        });
        assert_eq!(got, vec!["main.go"]);
    }

    #[test]
    fn bracket_and_question_mark() {
        let got = accepted(FilterOpts {
            restrict: vec!["[ls]*/?.go".into()],
            ..Default::default()
        });
        assert_eq!(got, vec!["lib/x.go", "src/x.go"]);
    }

    #[test]
    fn invalid_glob_is_configuration_error() {
        let table = LanguageTable::bundled().unwrap();
        let opts = FilterOpts {
            exclude: vec!["src/[".into()],
            ..Default::default()
        };
        let err = FileFilter::new(&opts, &table).unwrap_err();
        assert!(matches!(err, FameError::InvalidPattern { ref pattern, .. } if pattern == "src/["));
    }

    #[test]
    fn undefined_language_is_configuration_error() {
        let table = LanguageTable::bundled().unwrap();
        let opts = FilterOpts {
            languages: vec!["cobolx".into()],
            ..Default::default()
        };
        assert!(matches!(
            FileFilter::new(&opts, &table),
            Err(FameError::UndefinedLanguage(_))
        ));
    }

    #[test]
    fn accepting_twice_gives_same_answer() {
        let table = LanguageTable::bundled().unwrap();
        let opts = FilterOpts {
            extensions: vec![".go".into()],
            restrict: vec!["src/*".into()],
            ..Default::default()
        };
        let filter = FileFilter::new(&opts, &table).unwrap();
        let tree = tree();
        for id in tree.files() {
            assert_eq!(filter.accepts(&tree, id).unwrap(), filter.accepts(&tree, id).unwrap());
        }
    }

    #[test]
    fn set_error_names_all_patterns() {
        let source = Glob::new("[").unwrap_err();
        let err = set_error(&["src/*".into(), "*.go".into()], source);
        assert!(matches!(err, FameError::InvalidPattern { ref pattern, .. } if pattern == "src/*,*.go"));
        assert_eq!(err.exit_code(), 1);
    }
}
