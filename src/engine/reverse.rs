//! @dose
//! purpose: Decompressor / Reverser. Undoes both tiers: pattern symbols are expanded back into
//!     their templates first, then dense characters are swapped back to their dictionary keys.
//!
//! when-editing:
//!     - !Pattern reversal must run before token reversal; expanded arguments may still hold
//!       dense characters
//!     - !Token reversal goes shortest replacement first, so every rule is shielded against the
//!       longer replacements that contain it
//!
//! invariants:
//!     - reverse_tokens(compress_tokens(x)) == x for text free of dense characters
//!     - PatternReverser reaches a fixed point or stops after MAX_PATTERN_PASSES
//!
//! gotchas:
//!     - Argument counts are lenient: missing arguments expand to empty text, extras are dropped
//!     - A symbol that needs arguments but is not followed by a closed `(...)` is left as-is

use super::args::{find_closing, split_top_level};
use super::classify::is_pattern_symbol;
use super::pattern::PatternRule;
use super::substitute::TokenRule;
use regex::{Captures, Regex};
use std::collections::HashSet;

/// Nested pattern calls unwrap one level per pass
pub const MAX_PATTERN_PASSES: usize = 8;

/// One dense replacement -> key rule, shielded from longer replacements
struct ShieldedRule {
    from: String,
    regex: Regex,
}

impl ShieldedRule {
    fn apply(&self, text: &str) -> String {
        self.regex
            .replace_all(text, |caps: &Captures| {
                if let Some(kept) = caps.name("keep") {
                    kept.as_str().to_string()
                } else {
                    self.from.clone()
                }
            })
            .into_owned()
    }
}

/// Shortest-replacement-first token reversal
pub struct TokenReverser {
    rules: Vec<ShieldedRule>,
}

impl TokenReverser {
    pub fn new(rules: &[TokenRule]) -> Self {
        let mut seen = HashSet::new();
        let mut unique: Vec<&TokenRule> = Vec::with_capacity(rules.len());
        for rule in rules {
            if seen.insert(rule.to.as_str()) {
                unique.push(rule);
            } else {
                tracing::warn!(
                    "Replacement {:?} is used by more than one key; {:?} will not be restored",
                    rule.to,
                    rule.from
                );
            }
        }

        unique.sort_by(|a, b| {
            a.to.chars()
                .count()
                .cmp(&b.to.chars().count())
                .then_with(|| a.to.cmp(&b.to))
        });

        let mut compiled = Vec::with_capacity(unique.len());
        for rule in &unique {
            let mut shields: Vec<&str> = unique
                .iter()
                .filter(|other| other.to.len() > rule.to.len() && other.to.contains(rule.to.as_str()))
                .map(|other| other.to.as_str())
                .collect();
            shields.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then_with(|| a.cmp(b)));

            let own = regex::escape(&rule.to);
            let pattern = if shields.is_empty() {
                own
            } else {
                let alternation: Vec<String> = shields.iter().map(|s| regex::escape(s)).collect();
                format!("(?P<keep>{})|{}", alternation.join("|"), own)
            };
            match Regex::new(&pattern) {
                Ok(regex) => compiled.push(ShieldedRule {
                    from: rule.from.clone(),
                    regex,
                }),
                Err(e) => tracing::warn!("Skipping reverse rule for {:?}: {}", rule.from, e),
            }
        }

        Self { rules: compiled }
    }

    pub fn reverse(&self, text: &str) -> String {
        let mut result = text.to_string();
        for rule in &self.rules {
            result = rule.apply(&result);
        }
        result
    }
}

/// Symbol-driven pattern expansion
pub struct PatternReverser {
    /// longest symbol first
    rules: Vec<PatternRule>,
}

impl PatternReverser {
    pub fn new(rules: &[PatternRule]) -> Self {
        let mut seen = HashSet::new();
        let mut unique = Vec::with_capacity(rules.len());
        for rule in rules {
            if seen.insert(rule.target().symbol.clone()) {
                unique.push(rule.clone());
            } else {
                tracing::warn!(
                    "Symbol {} is used by more than one pattern; {:?} will not be restored",
                    rule.target().symbol,
                    rule.template()
                );
            }
        }
        unique.sort_by(|a, b| {
            let (a, b) = (&a.target().symbol, &b.target().symbol);
            b.chars().count().cmp(&a.chars().count()).then_with(|| a.cmp(b))
        });
        Self { rules: unique }
    }

    /// Expand until no symbol is left or the pass limit is hit
    pub fn reverse(&self, text: &str) -> String {
        let mut result = text.to_string();
        for pass in 0..MAX_PATTERN_PASSES {
            let (next, count) = self.reverse_once(&result);
            result = next;
            if count == 0 {
                break;
            }
            if pass + 1 == MAX_PATTERN_PASSES {
                tracing::warn!("Pattern reversal stopped after {} passes", MAX_PATTERN_PASSES);
            }
        }
        result
    }

    /// Expand every symbol occurrence once, returning the new text and the expansion count
    pub fn reverse_once(&self, text: &str) -> (String, usize) {
        let mut out = String::with_capacity(text.len() * 2);
        let mut count = 0;
        let mut i = 0;

        while i < text.len() {
            let rest = &text[i..];
            let Some(c) = rest.chars().next() else { break };

            if is_pattern_symbol(c) {
                if let Some((expanded, consumed)) = self.expand_at(rest) {
                    out.push_str(&expanded);
                    i += consumed;
                    count += 1;
                    continue;
                }
            }
            out.push(c);
            i += c.len_utf8();
        }

        (out, count)
    }

    /// Expansion and consumed byte length for a symbol call at the start of `rest`
    fn expand_at(&self, rest: &str) -> Option<(String, usize)> {
        for rule in &self.rules {
            let symbol = rule.target().symbol.as_str();
            let Some(after) = rest.strip_prefix(symbol) else {
                continue;
            };
            if rule.target().args.is_empty() {
                return Some((rule.expand(&[]), symbol.len()));
            }
            let Some(close) = find_closing(after) else {
                tracing::debug!(symbol, "symbol without a closed argument list");
                continue;
            };
            let args = split_top_level(&after[1..close]);
            return Some((rule.expand(&args), symbol.len() + close + 1));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PatternEntry, TokenEntry};

    fn token_rules(pairs: &[(&str, &str)]) -> Vec<TokenRule> {
        pairs
            .iter()
            .map(|(f, t)| TokenRule::compile(&TokenEntry::new(*f, *t)).unwrap())
            .collect()
    }

    fn pattern_rules(pairs: &[(&str, &str)]) -> Vec<PatternRule> {
        pairs
            .iter()
            .map(|(t, s)| PatternRule::compile(&PatternEntry::new(*t, *s)).unwrap())
            .collect()
    }

    #[test]
    fn test_token_reverse_basic() {
        let reverser = TokenReverser::new(&token_rules(&[("function", "函"), ("return", "返")]));
        assert_eq!(reverser.reverse("函 f(){返 1;}"), "function f(){return 1;}");
    }

    #[test]
    fn test_shorter_replacement_does_not_corrupt_longer() {
        let reverser = TokenReverser::new(&token_rules(&[("console", "控"), ("console.log", "控印")]));
        assert_eq!(reverser.reverse("控印(控)"), "console.log(console)");
    }

    #[test]
    fn test_shield_prefers_longest_container() {
        let reverser = TokenReverser::new(&token_rules(&[
            ("a", "甲"),
            ("ab", "甲乙"),
            ("abc", "甲乙丙"),
        ]));
        assert_eq!(reverser.reverse("甲乙丙 甲乙 甲"), "abc ab a");
    }

    #[test]
    fn test_duplicate_replacement_first_wins() {
        let reverser = TokenReverser::new(&token_rules(&[("alpha", "甲"), ("beta", "甲")]));
        assert_eq!(reverser.reverse("甲"), "alpha");
    }

    #[test]
    fn test_pattern_reverse_with_arguments() {
        let reverser = PatternReverser::new(&pattern_rules(&[(
            "fetch($1).then(($2) => $2.json())",
            "ᄁ($1,$2)",
        )]));
        assert_eq!(
            reverser.reverse("const p = ᄁ(url,res);"),
            "const p = fetch(url).then((res) => res.json());"
        );
    }

    #[test]
    fn test_pattern_reverse_reordered_arguments() {
        let reverser = PatternReverser::new(&pattern_rules(&[("const $1 = require($2);", "ཀ($2,$1)")]));
        assert_eq!(reverser.reverse("ཀ('fs',fs)"), "const fs = require('fs');");
    }

    #[test]
    fn test_pattern_reverse_lenient_argument_count() {
        let reverser = PatternReverser::new(&pattern_rules(&[("f($1, $2)", "ᄀ($1,$2)")]));
        assert_eq!(reverser.reverse("ᄀ(a)"), "f(a, )");
        assert_eq!(reverser.reverse("ᄀ(a,b,c)"), "f(a, b)");
    }

    #[test]
    fn test_pattern_reverse_nested_calls() {
        let reverser = PatternReverser::new(&pattern_rules(&[
            ("JSON.stringify($1, null, 2)", "ბ($1)"),
            ("export default $1;", "ཁ($1)"),
        ]));
        assert_eq!(
            reverser.reverse("ཁ(ბ(cfg))"),
            "export default JSON.stringify(cfg, null, 2);"
        );
    }

    #[test]
    fn test_pattern_reverse_dotted_variants() {
        let reverser = PatternReverser::new(&pattern_rules(&[
            ("method: 'POST'", "ꨀ.ꨁ"),
            ("method: 'GET'", "ꨀ.ꨂ"),
        ]));
        assert_eq!(reverser.reverse("{ꨀ.ꨂ}"), "{method: 'GET'}");
        assert_eq!(reverser.reverse("{ꨀ.ꨁ}"), "{method: 'POST'}");
    }

    #[test]
    fn test_pattern_reverse_keeps_unclosed_call() {
        let reverser = PatternReverser::new(&pattern_rules(&[("f($1)", "ᄀ($1)")]));
        assert_eq!(reverser.reverse("ᄀ(x"), "ᄀ(x");
        assert_eq!(reverser.reverse_once("ᄀ(x").1, 0);
    }

    #[test]
    fn test_pattern_reverse_nested_same_symbol() {
        let reverser = PatternReverser::new(&pattern_rules(&[("wrap($1)", "ᄀ($1)")]));
        assert_eq!(reverser.reverse("ᄀ(ᄀ(x))"), "wrap(wrap(x))");
    }
}
