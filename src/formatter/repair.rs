//! @dose
//! purpose: The repair pass. An ordered list of independent text fixups applied after raw
//!     dictionary reversal to undo systematic reconstruction artifacts (split URLs, broken
//!     arrows, spaced MIME types, untranslated words left in comments).
//!
//! when-editing:
//!     - !Each rule is self-contained; adding or removing one never touches the reverser
//!     - !Rule order is the Vec order; the built-in list is documented in RepairPass::builtin
//!     - Caller-specific string fixes belong in LiteralPatch (loaded from glyphpack.toml),
//!       not in the built-in list
//!
//! invariants:
//!     - Every rule is a total function: no match means the text is returned unchanged
//!     - CommentGlossary only rewrites comment segments
//!
//! gotchas:
//!     - Regex rules run over strings too; that is where URLs and MIME types live

use super::lexer::map_comments;
use crate::dictionary::COMMENT_GLOSSARY;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

/// A single repair step
pub trait RepairRule: Send + Sync {
    /// Short rule name used in logs
    fn name(&self) -> &str;

    /// Apply the fix, returning the repaired text
    fn apply(&self, text: &str) -> String;
}

static URL_SPACING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(https?|wss?|ftp)\s*:\s*/\s*/\s*").unwrap());
static ARROW_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"=\s+>").unwrap());
static CONTENT_TYPE_SPACING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(['"])Content\s*-\s*Type(['"])\s*:\s*"#).unwrap());
static JSON_MIME_SPACING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"application\s*/\s*json").unwrap());
static JSON_METHOD_SPACING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bJSON\s*\.\s*(stringify|parse)\s*\(").unwrap());

/// Regex find/replace rule over a shared, compiled-once pattern
pub struct RegexRepair {
    name: &'static str,
    pattern: &'static Regex,
    replacement: &'static str,
}

impl RegexRepair {
    fn builtin(name: &'static str, pattern: &'static Regex, replacement: &'static str) -> Self {
        Self {
            name,
            pattern,
            replacement,
        }
    }
}

impl RepairRule for RegexRepair {
    fn name(&self) -> &str {
        self.name
    }

    fn apply(&self, text: &str) -> String {
        self.pattern.replace_all(text, self.replacement).into_owned()
    }
}

/// Re-translates glossary words that leaked into comments
pub struct CommentGlossary {
    entries: Vec<(String, String)>,
}

impl CommentGlossary {
    pub fn new(mut entries: Vec<(String, String)>) -> Self {
        // longest term first so compound words win over their parts
        entries.sort_by(|a, b| {
            b.0.chars()
                .count()
                .cmp(&a.0.chars().count())
                .then_with(|| a.0.cmp(&b.0))
        });
        Self { entries }
    }

    pub fn builtin() -> Self {
        Self::new(
            COMMENT_GLOSSARY
                .iter()
                .map(|(term, word)| (term.to_string(), word.to_string()))
                .collect(),
        )
    }
}

impl RepairRule for CommentGlossary {
    fn name(&self) -> &str {
        "comment-glossary"
    }

    fn apply(&self, text: &str) -> String {
        map_comments(text, |comment| {
            let mut fixed = comment.to_string();
            for (term, word) in &self.entries {
                if fixed.contains(term.as_str()) {
                    fixed = fixed.replace(term.as_str(), &format!(" {} ", word));
                }
            }
            tidy_comment(&fixed)
        })
    }
}

/// Collapse the double spaces glossary substitution leaves behind, keeping line structure
fn tidy_comment(comment: &str) -> String {
    comment
        .split('\n')
        .map(|line| {
            let mut out = String::with_capacity(line.len());
            let mut last_space = false;
            for c in line.chars() {
                if c == ' ' {
                    if !last_space {
                        out.push(c);
                    }
                    last_space = true;
                } else {
                    out.push(c);
                    last_space = false;
                }
            }
            out
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim_end_matches(' ')
        .to_string()
}

/// Caller-supplied literal fix for one observed artifact
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LiteralPatch {
    pub find: String,
    pub replace: String,
}

impl RepairRule for LiteralPatch {
    fn name(&self) -> &str {
        "literal-patch"
    }

    fn apply(&self, text: &str) -> String {
        if self.find.is_empty() {
            return text.to_string();
        }
        text.replace(&self.find, &self.replace)
    }
}

/// Ordered repair pipeline
#[derive(Default)]
pub struct RepairPass {
    rules: Vec<Box<dyn RepairRule>>,
}

impl RepairPass {
    /// Empty pass
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Built-in rules, in order: URL spacing, arrow tokens, Content-Type spacing,
    /// application/json spacing, JSON method spacing, comment glossary.
    pub fn builtin() -> Self {
        let mut pass = Self::without_glossary();
        pass.push(Box::new(CommentGlossary::builtin()));
        pass
    }

    /// Built-in regex rules only
    pub fn without_glossary() -> Self {
        let mut pass = Self::new();
        pass.push(Box::new(RegexRepair::builtin("url-spacing", &URL_SPACING, "$1://")));
        pass.push(Box::new(RegexRepair::builtin("arrow-token", &ARROW_TOKEN, "=>")));
        pass.push(Box::new(RegexRepair::builtin(
            "content-type-spacing",
            &CONTENT_TYPE_SPACING,
            "${1}Content-Type${2}: ",
        )));
        pass.push(Box::new(RegexRepair::builtin(
            "json-mime-spacing",
            &JSON_MIME_SPACING,
            "application/json",
        )));
        pass.push(Box::new(RegexRepair::builtin(
            "json-method-spacing",
            &JSON_METHOD_SPACING,
            "JSON.$1(",
        )));
        pass
    }

    pub fn push(&mut self, rule: Box<dyn RepairRule>) {
        self.rules.push(rule);
    }

    /// Append caller-supplied literal patches
    pub fn with_patches(mut self, patches: impl IntoIterator<Item = LiteralPatch>) -> Self {
        for patch in patches {
            self.push(Box::new(patch));
        }
        self
    }

    pub fn names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn apply(&self, text: &str) -> String {
        let mut result = text.to_string();
        for rule in &self.rules {
            let next = rule.apply(&result);
            if next != result {
                tracing::debug!(rule = rule.name(), "repair rule changed output");
            }
            result = next;
        }
        result
    }
}
