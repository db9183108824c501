//! @dose
//! purpose: Pattern Matcher / Compressor. Turns each semantic-pattern entry into a regex whose
//!     placeholders are capture groups, then rewrites matches into `SYMBOL(args)` calls.
//!
//! when-editing:
//!     - !Rules run longest template first, sequentially: rule i+1 sees the output of rule i
//!     - !A match is only rewritten when every captured value survives the argument syntax
//!       (see args::is_safe_argument); otherwise the search resumes one character later
//!     - Template whitespace is flexible; literal punctuation may be surrounded by whitespace
//!
//! invariants:
//!     - Every placeholder used by a target is captured by its template
//!     - A placeholder repeated in a template must capture the same text each time
//!     - Malformed entries are logged and skipped, never fatal
//!
//! gotchas:
//!     - Placeholders at the very start or end of a template only capture an identifier or
//!       member chain, otherwise the leftmost match would swallow everything before it
//!     - Inner placeholders stop at `;`, so a capture never spans statements and a rejected
//!       match costs at most one statement of rescanning
//!     - The regex crate has no backreferences, so repeated placeholders are checked after
//!       matching

use super::args::is_safe_argument;
use super::classify::is_pattern_symbol;
use crate::error::CodecError;
use crate::types::PatternEntry;
use once_cell::sync::Lazy;
use regex::{Captures, Regex, RegexBuilder};
use std::collections::HashMap;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$(\d+)").unwrap());

/// Capture for a placeholder between two pieces of literal text; never crosses a `;`
const INNER_CAPTURE: &str = r"([^;]*?)";
/// Capture for a placeholder at either end of a template
const EDGE_CAPTURE: &str = r"([\p{L}\p{N}_$.]+)";
/// Compiled size cap per rule; larger templates are reported as malformed
const RULE_SIZE_LIMIT: usize = 1 << 20;

/// Literal text or a numbered placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Piece {
    Text(String),
    Slot(usize),
}

pub(crate) fn split_placeholders(s: &str) -> Vec<Piece> {
    let mut pieces = Vec::new();
    let mut last = 0;
    for caps in PLACEHOLDER.captures_iter(s) {
        let Some(whole) = caps.get(0) else { continue };
        let Ok(n) = caps[1].parse::<usize>() else {
            continue;
        };
        if whole.start() > last {
            pieces.push(Piece::Text(s[last..whole.start()].to_string()));
        }
        pieces.push(Piece::Slot(n));
        last = whole.end();
    }
    if last < s.len() {
        pieces.push(Piece::Text(s[last..].to_string()));
    }
    pieces
}

/// Parsed target: symbol plus the placeholder numbers of its arguments, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSpec {
    pub symbol: String,
    pub args: Vec<usize>,
}

impl TargetSpec {
    pub fn parse(target: &str) -> Result<Self, CodecError> {
        let target = target.trim();
        let (symbol, args) = match target.find('(') {
            None => (target, Vec::new()),
            Some(open) => {
                let inner = target[open + 1..]
                    .strip_suffix(')')
                    .ok_or_else(|| CodecError::malformed(target, "argument list is not closed"))?;
                let mut args = Vec::new();
                for part in inner.split(',') {
                    let n = part
                        .trim()
                        .strip_prefix('$')
                        .and_then(|d| d.parse::<usize>().ok())
                        .ok_or_else(|| {
                            CodecError::malformed(target, format!("argument {:?} is not a placeholder", part))
                        })?;
                    if args.contains(&n) {
                        return Err(CodecError::malformed(target, format!("placeholder ${} repeated", n)));
                    }
                    args.push(n);
                }
                (&target[..open], args)
            }
        };

        match symbol.chars().next() {
            None => return Err(CodecError::malformed(target, "empty symbol")),
            Some(c) if !is_pattern_symbol(c) => {
                return Err(CodecError::malformed(
                    target,
                    "symbol must start with a character from a reserved pattern block",
                ))
            }
            _ => {}
        }
        if symbol.chars().any(|c| c.is_whitespace() || matches!(c, ',' | ')' | '$')) {
            return Err(CodecError::malformed(target, "symbol contains reserved characters"));
        }

        Ok(Self {
            symbol: symbol.to_string(),
            args,
        })
    }

    pub fn render(&self, args: &[&str]) -> String {
        if self.args.is_empty() {
            self.symbol.clone()
        } else {
            format!("{}({})", self.symbol, args.join(","))
        }
    }
}

/// One compiled pattern entry
#[derive(Debug, Clone)]
pub struct PatternRule {
    template: String,
    pieces: Vec<Piece>,
    regex: Regex,
    /// placeholder number for capture group i + 1
    captures: Vec<usize>,
    target: TargetSpec,
}

impl PatternRule {
    pub fn compile(entry: &PatternEntry) -> Result<Self, CodecError> {
        let template = entry.template.trim();
        let pieces = split_placeholders(template);
        let target = TargetSpec::parse(&entry.target)?;

        if !pieces
            .iter()
            .any(|p| matches!(p, Piece::Text(t) if !t.trim().is_empty()))
        {
            return Err(CodecError::malformed(template, "template has no literal text"));
        }
        if pieces
            .windows(2)
            .any(|w| matches!(w, [Piece::Slot(_), Piece::Slot(_)]))
        {
            return Err(CodecError::malformed(template, "adjacent placeholders"));
        }
        for n in &target.args {
            if !pieces.contains(&Piece::Slot(*n)) {
                return Err(CodecError::malformed(
                    template,
                    format!("target uses ${} which the template never captures", n),
                ));
            }
        }

        let (pattern, captures) = synthesize(template, &pieces);
        let regex = RegexBuilder::new(&pattern)
            .size_limit(RULE_SIZE_LIMIT)
            .build()
            .map_err(|e| CodecError::malformed(template, e.to_string()))?;

        Ok(Self {
            template: template.to_string(),
            pieces,
            regex,
            captures,
            target,
        })
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn target(&self) -> &TargetSpec {
        &self.target
    }

    /// Fill the template with arguments given in target order. Missing values are empty.
    pub fn expand(&self, args: &[&str]) -> String {
        let values: HashMap<usize, &str> = self
            .target
            .args
            .iter()
            .copied()
            .zip(args.iter().copied())
            .collect();
        let mut out = String::with_capacity(self.template.len());
        for piece in &self.pieces {
            match piece {
                Piece::Text(t) => out.push_str(t),
                Piece::Slot(n) => out.push_str(values.get(n).copied().unwrap_or("")),
            }
        }
        out
    }

    fn replacement(&self, caps: &Captures) -> Option<String> {
        let mut values: HashMap<usize, &str> = HashMap::new();
        for (i, n) in self.captures.iter().enumerate() {
            let value = caps.get(i + 1).map(|m| m.as_str().trim()).unwrap_or("");
            if !is_safe_argument(value) {
                return None;
            }
            match values.get(n) {
                Some(prev) if *prev != value => return None,
                _ => {
                    values.insert(*n, value);
                }
            }
        }
        let args: Vec<&str> = self
            .target
            .args
            .iter()
            .map(|n| values.get(n).copied().unwrap_or(""))
            .collect();
        Some(self.target.render(&args))
    }

    /// Rewrite every acceptable match, returning the new text and the rewrite count
    pub fn apply(&self, text: &str) -> (String, usize) {
        let mut out = String::with_capacity(text.len());
        let mut copied = 0;
        let mut pos = 0;
        let mut count = 0;

        while pos < text.len() {
            let Some(caps) = self.regex.captures_at(text, pos) else {
                break;
            };
            let Some(whole) = caps.get(0) else { break };

            match self.replacement(&caps) {
                Some(rewritten) if whole.end() > whole.start() => {
                    out.push_str(&text[copied..whole.start()]);
                    out.push_str(&rewritten);
                    copied = whole.end();
                    pos = whole.end();
                    count += 1;
                }
                _ => {
                    // retry from the next character; a later start may match cleanly
                    pos = whole.start()
                        + text[whole.start()..]
                            .chars()
                            .next()
                            .map(|c| c.len_utf8())
                            .unwrap_or(1);
                }
            }
        }

        out.push_str(&text[copied..]);
        (out, count)
    }
}

fn is_regex_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Build the matching regex for a template and the placeholder number of each group
fn synthesize(template: &str, pieces: &[Piece]) -> (String, Vec<usize>) {
    let mut pattern = String::new();
    let mut captures = Vec::new();

    if template.chars().next().is_some_and(is_regex_word) {
        pattern.push_str(r"\b");
    }

    for (idx, piece) in pieces.iter().enumerate() {
        match piece {
            Piece::Slot(n) => {
                let at_edge = idx == 0 || idx == pieces.len() - 1;
                pattern.push_str(if at_edge { EDGE_CAPTURE } else { INNER_CAPTURE });
                captures.push(*n);
            }
            Piece::Text(text) => {
                let slot_before = idx > 0;
                let slot_after = idx + 1 < pieces.len();
                pattern.push_str(&literal_pattern(text, slot_before, slot_after));
            }
        }
    }

    if template.chars().next_back().is_some_and(is_regex_word) {
        pattern.push_str(r"\b");
    }
    (pattern, captures)
}

/// Escape literal template text with flexible whitespace.
///
/// Whitespace between two word characters (a placeholder counts as one) needs at least one
/// whitespace character in the input; anywhere next to punctuation it is optional.
fn literal_pattern(text: &str, slot_before: bool, slot_after: bool) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            while i < chars.len() && chars[i].is_whitespace() {
                i += 1;
            }
            let prev_word = match out_last_literal(&chars, i) {
                Some(p) => is_regex_word(p),
                None => slot_before,
            };
            let next_word = match chars.get(i) {
                Some(n) => is_regex_word(*n),
                None => slot_after,
            };
            out.push_str(if prev_word && next_word { r"\s+" } else { r"\s*" });
            continue;
        }

        out.push_str(&regex::escape(&c.to_string()));
        if let Some(&next) = chars.get(i + 1) {
            if !next.is_whitespace() && (!is_regex_word(c) || !is_regex_word(next)) {
                out.push_str(r"\s*");
            }
        }
        i += 1;
    }
    out
}

/// Last non-whitespace character before the whitespace run ending at `run_end`
fn out_last_literal(chars: &[char], run_end: usize) -> Option<char> {
    chars[..run_end].iter().rev().find(|c| !c.is_whitespace()).copied()
}

/// Longest-template-first rule list
pub struct PatternCompressor {
    rules: Vec<PatternRule>,
}

impl PatternCompressor {
    pub fn new(entries: &[PatternEntry]) -> Self {
        let mut sorted: Vec<&PatternEntry> = entries.iter().collect();
        sorted.sort_by(|a, b| {
            b.template
                .trim()
                .chars()
                .count()
                .cmp(&a.template.trim().chars().count())
                .then_with(|| a.template.cmp(&b.template))
        });

        let mut rules = Vec::with_capacity(sorted.len());
        for entry in sorted {
            match PatternRule::compile(entry) {
                Ok(rule) => rules.push(rule),
                Err(e) => tracing::warn!("Skipping pattern: {}", e),
            }
        }
        Self { rules }
    }

    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    pub fn compress(&self, text: &str) -> String {
        let mut result = text.to_string();
        for rule in &self.rules {
            let (next, count) = rule.apply(&result);
            if count > 0 {
                tracing::debug!(template = rule.template(), count, "pattern rule matched");
            }
            result = next;
        }
        result
    }
}
