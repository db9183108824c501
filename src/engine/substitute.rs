//! @dose
//! purpose: Character Substituter. Whole-word replacement of dictionary keys with their dense
//!     replacement characters, longest key first.
//!
//! when-editing:
//!     - !Word boundaries are only added on key edges that are word characters, so keys like
//!       `console.log` still match as a unit
//!     - Rules are compiled once in TokenSubstituter::new
//!
//! invariants:
//!     - compress() is total: no match leaves the text unchanged
//!     - "get" never matches inside "target"
//!
//! gotchas:
//!     - Dense replacements are themselves word characters, which keeps later keys from
//!       matching across an earlier replacement

use crate::error::CodecError;
use crate::types::TokenEntry;
use regex::{NoExpand, Regex};
use std::collections::HashSet;

/// One compiled key -> replacement rule
#[derive(Debug, Clone)]
pub struct TokenRule {
    pub from: String,
    pub to: String,
    regex: Regex,
}

impl TokenRule {
    pub fn compile(entry: &TokenEntry) -> Result<Self, CodecError> {
        if entry.from.is_empty() {
            return Err(CodecError::malformed(&entry.from, "empty key"));
        }
        if entry.to.is_empty() {
            return Err(CodecError::malformed(&entry.from, "empty replacement"));
        }
        let regex = Regex::new(&word_pattern(&entry.from))
            .map_err(|e| CodecError::malformed(&entry.from, e.to_string()))?;
        Ok(Self {
            from: entry.from.clone(),
            to: entry.to.clone(),
            regex,
        })
    }

    pub fn apply(&self, text: &str) -> String {
        self.regex.replace_all(text, NoExpand(&self.to)).into_owned()
    }
}

fn is_regex_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn word_pattern(key: &str) -> String {
    let mut pattern = String::new();
    if key.chars().next().is_some_and(is_regex_word) {
        pattern.push_str(r"\b");
    }
    pattern.push_str(&regex::escape(key));
    if key.chars().next_back().is_some_and(is_regex_word) {
        pattern.push_str(r"\b");
    }
    pattern
}

/// Longest-key-first token rules
pub struct TokenSubstituter {
    rules: Vec<TokenRule>,
}

impl TokenSubstituter {
    pub fn new(entries: &[TokenEntry]) -> Self {
        let mut sorted: Vec<&TokenEntry> = entries.iter().collect();
        sorted.sort_by(|a, b| {
            b.from
                .chars()
                .count()
                .cmp(&a.from.chars().count())
                .then_with(|| a.from.cmp(&b.from))
        });

        let mut seen = HashSet::new();
        let mut rules = Vec::with_capacity(sorted.len());
        for entry in sorted {
            if !seen.insert(entry.from.as_str()) {
                tracing::warn!("Skipping token {:?}: duplicate key", entry.from);
                continue;
            }
            match TokenRule::compile(entry) {
                Ok(rule) => rules.push(rule),
                Err(e) => tracing::warn!("Skipping token: {}", e),
            }
        }
        Self { rules }
    }

    pub fn rules(&self) -> &[TokenRule] {
        &self.rules
    }

    pub fn compress(&self, text: &str) -> String {
        let mut result = text.to_string();
        for rule in &self.rules {
            result = rule.apply(&result);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn substituter(pairs: &[(&str, &str)]) -> TokenSubstituter {
        let entries: Vec<TokenEntry> = pairs.iter().map(|(f, t)| TokenEntry::new(*f, *t)).collect();
        TokenSubstituter::new(&entries)
    }

    #[test]
    fn test_whole_word_only() {
        let s = substituter(&[("get", "拿")]);
        assert_eq!(s.compress("get(target); obj.get()"), "拿(target); obj.拿()");
        assert_eq!(s.compress("getter forget"), "getter forget");
    }

    #[test]
    fn test_longest_key_first() {
        let s = substituter(&[("console", "控"), ("console.log", "控印")]);
        assert_eq!(s.rules()[0].from, "console.log");
        assert_eq!(s.compress("console.log(console)"), "控印(控)");
    }

    #[test]
    fn test_adjacent_replacements_keep_separator() {
        let s = substituter(&[("async", "异"), ("function", "函")]);
        assert_eq!(s.compress("async function f() {}"), "异 函 f() {}");
    }

    #[test]
    fn test_non_word_edge_keys() {
        let s = substituter(&[("=>", "⇒")]);
        assert_eq!(s.compress("(a)=>a"), "(a)⇒a");
    }

    #[test]
    fn test_no_match_is_noop() {
        let s = substituter(&[("function", "函")]);
        assert_eq!(s.compress("let x = 1;"), "let x = 1;");
        assert_eq!(s.compress(""), "");
    }

    #[test]
    fn test_replacement_with_dollar_is_literal() {
        let s = substituter(&[("jquery", "$1")]);
        assert_eq!(s.compress("jquery"), "$1");
    }

    #[test]
    fn test_skips_malformed_and_duplicate_entries() {
        let s = substituter(&[("", "x"), ("a", ""), ("return", "返"), ("return", "R")]);
        assert_eq!(s.rules().len(), 1);
        assert_eq!(s.compress("return 1"), "返 1");
    }
}
