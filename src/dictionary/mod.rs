//! @dose
//! purpose: Dictionary Store. Holds the compound-token dictionary and the semantic-pattern
//!     dictionary as plain entry lists, with loaders for caller-supplied TOML and JSON files.
//!
//! when-editing:
//!     - !DictionarySet is pure data; ordering and compilation belong to the engine
//!     - New file formats are dispatched by extension in DictionarySet::load
//!
//! invariants:
//!     - extend() keeps one entry per key; the incoming entry wins
//!     - builtin() is deterministic and never fails
//!
//! gotchas:
//!     - JSON dictionaries are key -> value objects, TOML dictionaries are arrays of tables
//!     - find_reverse_conflicts is a report, it does not reject anything

mod builtin;

pub use builtin::{COMMENT_GLOSSARY, TOKENS as BUILTIN_TOKENS};

use crate::error::CodecError;
use crate::types::{PatternEntry, TokenEntry};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// The two dictionaries consumed by the engine
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DictionarySet {
    pub tokens: Vec<TokenEntry>,
    pub patterns: Vec<PatternEntry>,
}

/// Pair of token entries whose replacements overlap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReverseConflict {
    /// Entry whose replacement is contained in the other one
    pub shorter: TokenEntry,
    /// Entry whose replacement contains the shorter one
    pub longer: TokenEntry,
}

#[derive(Deserialize)]
struct TomlDictionary {
    #[serde(default, rename = "token")]
    tokens: Vec<TokenEntry>,
    #[serde(default, rename = "pattern")]
    patterns: Vec<PatternEntry>,
}

#[derive(Deserialize)]
struct JsonDictionary {
    #[serde(default)]
    tokens: BTreeMap<String, String>,
    #[serde(default)]
    patterns: BTreeMap<String, String>,
}

impl DictionarySet {
    pub fn new(tokens: Vec<TokenEntry>, patterns: Vec<PatternEntry>) -> Self {
        Self { tokens, patterns }
    }

    /// Dictionaries shipped with the crate
    pub fn builtin() -> Self {
        Self {
            tokens: builtin::TOKENS
                .iter()
                .map(|(from, to)| TokenEntry::new(*from, *to))
                .collect(),
            patterns: builtin::PATTERNS
                .iter()
                .map(|(template, target)| PatternEntry::new(*template, *target))
                .collect(),
        }
    }

    /// Parse a TOML dictionary (`[[token]]` and `[[pattern]]` tables)
    pub fn from_toml_str(content: &str) -> Result<Self, CodecError> {
        let parsed: TomlDictionary =
            toml::from_str(content).map_err(|e| CodecError::Dictionary(e.to_string()))?;
        Ok(Self::new(parsed.tokens, parsed.patterns))
    }

    /// Parse a JSON dictionary (`{"tokens": {...}, "patterns": {...}}`)
    pub fn from_json_str(content: &str) -> Result<Self, CodecError> {
        let parsed: JsonDictionary =
            serde_json::from_str(content).map_err(|e| CodecError::Dictionary(e.to_string()))?;
        Ok(Self::new(
            parsed
                .tokens
                .into_iter()
                .map(|(from, to)| TokenEntry::new(from, to))
                .collect(),
            parsed
                .patterns
                .into_iter()
                .map(|(template, target)| PatternEntry::new(template, target))
                .collect(),
        ))
    }

    /// Load a dictionary file, picking the format from its extension
    pub fn load(path: &Path) -> Result<Self, CodecError> {
        let content = fs::read_to_string(path)
            .map_err(|e| CodecError::Dictionary(format!("{}: {}", path.display(), e)))?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content),
            Some("toml") => Self::from_toml_str(&content),
            other => Err(CodecError::Dictionary(format!(
                "{}: unsupported dictionary format {:?}",
                path.display(),
                other.unwrap_or("")
            ))),
        }
    }

    /// Merge another set into this one; entries with an existing key are replaced
    pub fn extend(&mut self, other: DictionarySet) {
        for entry in other.tokens {
            match self.tokens.iter_mut().find(|e| e.from == entry.from) {
                Some(existing) => *existing = entry,
                None => self.tokens.push(entry),
            }
        }
        for entry in other.patterns {
            match self.patterns.iter_mut().find(|e| e.template == entry.template) {
                Some(existing) => *existing = entry,
                None => self.patterns.push(entry),
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty() && self.patterns.is_empty()
    }
}

/// Every pair where one replacement is a substring of a different, longer replacement.
pub fn find_reverse_conflicts(tokens: &[TokenEntry]) -> Vec<ReverseConflict> {
    let mut conflicts = Vec::new();
    for shorter in tokens {
        if shorter.to.is_empty() {
            continue;
        }
        for longer in tokens {
            if longer.to.len() > shorter.to.len() && longer.to.contains(shorter.to.as_str()) {
                conflicts.push(ReverseConflict {
                    shorter: shorter.clone(),
                    longer: longer.clone(),
                });
            }
        }
    }
    conflicts
}
