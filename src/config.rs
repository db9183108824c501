//! @dose
//! purpose: Configuration file parsing for glyphpack.toml. Holds default compress/decompress
//!     options, extra dictionaries, repair patches, the input size limit and the log level.
//!
//! when-editing:
//!     - !Config is loaded once at startup and passed through the call chain
//!     - !Dictionary paths are relative to the project root
//!     - CLI flags override these values in the command modules, never here
//!
//! invariants:
//!     - Config::load returns default config if glyphpack.toml doesn't exist
//!     - Inline dictionary entries are merged after dictionary files, so they win
//!
//! gotchas:
//!     - Config::load runs before logging is initialised, so its warnings go to stderr directly
//!     - replace_builtin = true with no files and no inline entries gives an engine that
//!       changes nothing

use crate::dictionary::DictionarySet;
use crate::engine::{Engine, DEFAULT_MAX_INPUT_BYTES};
use crate::error::CodecError;
use crate::formatter::{LiteralPatch, RepairPass};
use crate::types::{CompressOptions, DecompressOptions, PatternEntry, TokenEntry};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "glyphpack.toml";

/// Main configuration structure matching glyphpack.toml
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub compress: CompressOptions,
    pub decompress: DecompressOptions,
    pub dictionary: DictionaryConfig,
    pub repair: RepairConfig,
    pub limits: LimitsConfig,
    pub log: LogConfig,
}

/// Extra dictionaries
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct DictionaryConfig {
    /// Dictionary files (.toml or .json), merged in order
    pub files: Vec<PathBuf>,

    /// Inline token entries: key -> replacement
    pub tokens: BTreeMap<String, String>,

    /// Inline pattern entries: template -> target
    pub patterns: BTreeMap<String, String>,

    /// Start from an empty dictionary instead of the built-in one
    pub replace_builtin: bool,
}

/// Repair pass configuration
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RepairConfig {
    /// Re-translate glossary words found in comments
    pub glossary: bool,

    /// Literal fixes appended after the built-in rules
    #[serde(rename = "patch")]
    pub patches: Vec<LiteralPatch>,
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            glossary: true,
            patches: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Inputs larger than this are rejected
    pub max_input_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// tracing filter used when RUST_LOG is unset and --verbose is off
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from glyphpack.toml in the given root directory
    pub fn load(root: &Path) -> Self {
        let config_path = root.join(CONFIG_FILE);

        if !config_path.exists() {
            return Self::default();
        }

        match fs::read_to_string(&config_path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Warning: Failed to parse {}: {}", CONFIG_FILE, e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("Warning: Failed to read {}: {}", CONFIG_FILE, e);
                Self::default()
            }
        }
    }

    /// Built-in dictionaries (unless replaced) plus configured files and inline entries
    pub fn dictionary_set(&self, root: &Path) -> Result<DictionarySet, CodecError> {
        let mut set = if self.dictionary.replace_builtin {
            DictionarySet::default()
        } else {
            DictionarySet::builtin()
        };

        for file in &self.dictionary.files {
            let path = if file.is_absolute() {
                file.clone()
            } else {
                root.join(file)
            };
            set.extend(DictionarySet::load(&path)?);
        }

        set.extend(DictionarySet::new(
            self.dictionary
                .tokens
                .iter()
                .map(|(from, to)| TokenEntry::new(from.as_str(), to.as_str()))
                .collect(),
            self.dictionary
                .patterns
                .iter()
                .map(|(template, target)| PatternEntry::new(template.as_str(), target.as_str()))
                .collect(),
        ));
        Ok(set)
    }

    pub fn repair_pass(&self) -> RepairPass {
        let pass = if self.repair.glossary {
            RepairPass::builtin()
        } else {
            RepairPass::without_glossary()
        };
        pass.with_patches(self.repair.patches.iter().cloned())
    }

    /// Engine for this configuration
    pub fn engine(&self, root: &Path) -> Result<Engine, CodecError> {
        let set = self.dictionary_set(root)?;
        Ok(Engine::new(&set)
            .with_repair(self.repair_pass())
            .with_max_input_bytes(self.limits.max_input_bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.compress.remove_comments);
        assert!(config.compress.use_pattern_tier);
        assert!(config.decompress.format_output);
        assert!(config.repair.glossary);
        assert_eq!(config.limits.max_input_bytes, DEFAULT_MAX_INPUT_BYTES);
        assert_eq!(config.log.level, "warn");
    }

    #[test]
    fn test_load_missing_config() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::load(temp_dir.path());
        assert!(config.dictionary.files.is_empty());
        assert!(!config.dictionary.replace_builtin);
    }

    #[test]
    fn test_load_invalid_config_falls_back() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILE), "[compress\nbroken").unwrap();
        let config = Config::load(temp_dir.path());
        assert!(config.compress.use_pattern_tier);
    }

    #[test]
    fn test_load_full_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_content = r#"
[compress]
remove_comments = true
use_pattern_tier = false

[decompress]
format_output = false

[dictionary]
files = ["extra.toml"]
replace_builtin = true

[dictionary.tokens]
"handler" = "柄"

[repair]
glossary = false

[[repair.patch]]
find = "user profle"
replace = "user profile"

[limits]
max_input_bytes = 1024

[log]
level = "debug"
"#;
        fs::write(temp_dir.path().join(CONFIG_FILE), config_content).unwrap();

        let config = Config::load(temp_dir.path());
        assert!(config.compress.remove_comments);
        assert!(!config.compress.use_pattern_tier);
        assert!(!config.compress.preserve_line_breaks);
        assert!(!config.decompress.format_output);
        assert!(config.decompress.preserve_comments);
        assert_eq!(config.dictionary.files, vec![PathBuf::from("extra.toml")]);
        assert!(config.dictionary.replace_builtin);
        assert_eq!(config.dictionary.tokens.get("handler").map(String::as_str), Some("柄"));
        assert!(!config.repair.glossary);
        assert_eq!(config.repair.patches.len(), 1);
        assert_eq!(config.repair.patches[0].replace, "user profile");
        assert_eq!(config.limits.max_input_bytes, 1024);
        assert_eq!(config.log.level, "debug");
    }

    #[test]
    fn test_dictionary_set_merges_files_and_inline_entries() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("extra.toml"),
            r#"
[[token]]
from = "handler"
to = "柄"

[[token]]
from = "widget"
to = "件"
"#,
        )
        .unwrap();

        let mut config = Config::default();
        config.dictionary.files = vec![PathBuf::from("extra.toml")];
        config.dictionary.replace_builtin = true;
        config
            .dictionary
            .tokens
            .insert("widget".to_string(), "部".to_string());

        let set = config.dictionary_set(temp_dir.path()).unwrap();
        assert_eq!(set.tokens.len(), 2);
        assert!(set.patterns.is_empty());
        let widget = set.tokens.iter().find(|e| e.from == "widget").unwrap();
        assert_eq!(widget.to, "部");
    }

    #[test]
    fn test_dictionary_set_keeps_builtin_by_default() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::default();
        let set = config.dictionary_set(temp_dir.path()).unwrap();
        assert_eq!(set, DictionarySet::builtin());
    }

    #[test]
    fn test_missing_dictionary_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.dictionary.files = vec![PathBuf::from("nope.toml")];
        let err = config.dictionary_set(temp_dir.path()).unwrap_err();
        assert!(matches!(err, CodecError::Dictionary(_)));
    }

    #[test]
    fn test_repair_pass_from_config() {
        let mut config = Config::default();
        config.repair.glossary = false;
        config.repair.patches.push(LiteralPatch {
            find: "profle".to_string(),
            replace: "profile".to_string(),
        });
        let names = config.repair_pass().names().join(",");
        assert!(!names.contains("comment-glossary"));
        assert!(names.ends_with("literal-patch"));
    }

    #[test]
    fn test_engine_uses_limits() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.limits.max_input_bytes = 16;
        let engine = config.engine(temp_dir.path()).unwrap();
        assert_eq!(engine.max_input_bytes(), 16);
    }
}
