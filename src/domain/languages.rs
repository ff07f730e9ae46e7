use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::error::{FameError, Result};

const BUNDLED: &str = include_str!("../../configs/language_extensions.json");

#[derive(Debug, Deserialize)]
struct LanguageEntry {
    name: String,
    extensions: Vec<String>,
}

/// Extension ↔ language lookup, loaded once and passed around read-only.
/// Language names are lowercased; extensions keep their leading dot.
#[derive(Debug, Clone, Default)]
pub struct LanguageTable {
    ext_to_lang: HashMap<String, String>,
    lang_to_exts: BTreeMap<String, Vec<String>>,
}

impl LanguageTable {
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED, "<bundled>")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path).map_err(|e| FameError::LanguageTable {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&data, &path.display().to_string())
    }

    pub fn from_json(data: &str, origin: &str) -> Result<Self> {
        let entries: Vec<LanguageEntry> =
            serde_json::from_str(data).map_err(|e| FameError::LanguageTable {
                path: origin.to_string(),
                message: e.to_string(),
            })?;

        let mut table = Self::default();
        for entry in entries {
            let lang = entry.name.to_lowercase();
            for ext in &entry.extensions {
                table.ext_to_lang.insert(ext.clone(), lang.clone());
            }
            table.lang_to_exts.insert(lang, entry.extensions);
        }
        Ok(table)
    }

    /// Language for `ext` (e.g. `".rs"`), or `""` when unmapped.
    pub fn language_of(&self, ext: &str) -> &str {
        self.ext_to_lang.get(ext).map_or("", String::as_str)
    }

    /// Lowercases `languages` and rejects any the table does not define.
    pub fn resolve(&self, languages: &[String]) -> Result<Vec<String>> {
        let lowered: Vec<String> = languages.iter().map(|l| l.to_lowercase()).collect();
        let unknown: Vec<String> = lowered
            .iter()
            .filter(|l| !self.lang_to_exts.contains_key(l.as_str()))
            .cloned()
            .collect();
        if !unknown.is_empty() {
            return Err(FameError::UndefinedLanguage(unknown));
        }
        Ok(lowered)
    }
}
