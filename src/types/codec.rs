//! @dose
//! purpose: Core data types shared by the dictionary store, the engine and the CLI:
//!     dictionary entries, the compression method enum and the per-call option structs.
//!
//! when-editing:
//!     - !Method::from_str is the only place method names are parsed; keep the alias list
//!       in sync with the CLI help text
//!     - Option structs derive Deserialize so glyphpack.toml can carry defaults
//!
//! invariants:
//!     - Method::Plain is a classification result only, it is never accepted as a request
//!     - Entries are plain string pairs; no entry carries typed placeholders
//!
//! gotchas:
//!     - Placeholder numbering in PatternEntry is local to that entry ($1..$n)

use crate::error::CodecError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Compound-token dictionary entry: literal source fragment -> dense replacement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenEntry {
    /// Source fragment (e.g. "function", "console.log")
    pub from: String,
    /// Replacement character sequence (e.g. "函")
    pub to: String,
}

impl TokenEntry {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Semantic pattern entry: template with $1..$n placeholders -> symbol target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternEntry {
    /// Whole-pattern template (e.g. "await fetch($1)")
    pub template: String,
    /// Target symbol, optionally with an argument list (e.g. "ᄀ($1)")
    pub target: String,
}

impl PatternEntry {
    pub fn new(template: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            target: target.into(),
        }
    }
}

/// Compression method, either requested by a caller or detected from content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Method {
    /// No dense characters at all
    Plain,
    /// Keyword-level substitution only
    CharacterTier,
    /// Whole-pattern substitution plus character tier for the remainder
    PatternTier,
    /// Detect from content (decompression) or use the richest tier (compression)
    Auto,
}

impl Default for Method {
    fn default() -> Self {
        Method::Auto
    }
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Plain => "plain",
            Method::CharacterTier => "characterTier",
            Method::PatternTier => "patternTier",
            Method::Auto => "auto",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "characterTier" | "character-tier" | "character" | "char" => Ok(Method::CharacterTier),
            "patternTier" | "pattern-tier" | "pattern" => Ok(Method::PatternTier),
            "auto" => Ok(Method::Auto),
            other => Err(CodecError::UnknownMethod(other.to_string())),
        }
    }
}

/// Options for a single compress call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CompressOptions {
    /// Drop comments instead of carrying them through untouched
    pub remove_comments: bool,
    /// Keep line breaks when collapsing whitespace
    pub preserve_line_breaks: bool,
    /// Run whole-pattern substitution before the character tier
    pub use_pattern_tier: bool,
}

impl Default for CompressOptions {
    fn default() -> Self {
        Self {
            remove_comments: false,
            preserve_line_breaks: false,
            use_pattern_tier: true,
        }
    }
}

impl CompressOptions {
    /// Options for an explicit method request. Auto picks the pattern tier.
    pub fn for_method(method: Method) -> Result<Self, CodecError> {
        let use_pattern_tier = match method {
            Method::CharacterTier => false,
            Method::PatternTier | Method::Auto => true,
            Method::Plain => return Err(CodecError::UnknownMethod(method.to_string())),
        };
        Ok(Self {
            use_pattern_tier,
            ..Self::default()
        })
    }

    pub fn method(&self) -> Method {
        if self.use_pattern_tier {
            Method::PatternTier
        } else {
            Method::CharacterTier
        }
    }
}

/// Options for a single decompress call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DecompressOptions {
    /// Re-insert line breaks and operator spacing
    pub format_output: bool,
    /// Keep comments in the reconstructed source
    pub preserve_comments: bool,
    /// Reversal path; Auto classifies the input first
    #[serde(skip)]
    pub method: Method,
}

impl Default for DecompressOptions {
    fn default() -> Self {
        Self {
            format_output: true,
            preserve_comments: true,
            method: Method::Auto,
        }
    }
}
