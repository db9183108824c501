//! @dose
//! purpose: Splits JavaScript-ish text into code, string, regex-literal and comment segments
//!     so whitespace, comment and repair passes never rewrite the inside of a literal.
//!
//! when-editing:
//!     - !Segments always tile the input exactly; concatenating every segment.text gives
//!       back the source byte for byte
//!     - Regex literals are detected by the previous significant code character, or by the
//!       previous word when it is a keyword such as `return` or its built-in replacement
//!
//! invariants:
//!     - Unterminated strings end at the newline (template literals at end of input)
//!     - Unterminated block comments run to the end of input
//!
//! gotchas:
//!     - This is a lexer, not a parser: a `/` after any other word or dense character is
//!       treated as division
//!     - Only the built-in replacements of the regex keywords are known; a custom dictionary
//!       that renames `return` gets division after its symbol

use super::optimize::is_word_char;
use crate::dictionary::BUILTIN_TOKENS;
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::ops::Range;

/// Kind of a lexical segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Code,
    String,
    Regex,
    LineComment,
    BlockComment,
}

/// A borrowed slice of the source with its kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub kind: SegmentKind,
    pub text: &'a str,
}

impl Segment<'_> {
    pub fn is_comment(&self) -> bool {
        matches!(self.kind, SegmentKind::LineComment | SegmentKind::BlockComment)
    }

    pub fn is_code(&self) -> bool {
        self.kind == SegmentKind::Code
    }
}

/// Characters after which a `/` starts a regex literal rather than a division
const REGEX_PRECEDERS: &str = "(,=:[!&|?{};+-*%<>~^";

/// Keywords after which a `/` starts a regex literal
const REGEX_KEYWORDS: &[&str] = &[
    "return", "typeof", "case", "throw", "delete", "void", "in", "of", "instanceof", "new",
    "yield", "await", "else", "do",
];

/// Regex keywords plus their built-in dense replacements
static REGEX_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    let mut words: HashSet<&'static str> = REGEX_KEYWORDS.iter().copied().collect();
    words.extend(
        BUILTIN_TOKENS
            .iter()
            .filter(|(from, _)| REGEX_KEYWORDS.contains(from))
            .map(|(_, to)| *to),
    );
    words
});

/// Split source into segments
pub fn segments(source: &str) -> Vec<Segment<'_>> {
    let chars: Vec<(usize, char)> = source.char_indices().collect();
    let n = chars.len();
    let byte_at = |i: usize| if i < n { chars[i].0 } else { source.len() };

    let mut out = Vec::new();
    let mut code_start = 0;
    let mut last_significant: Option<char> = None;
    // char range of the most recent word
    let mut word: Range<usize> = 0..0;
    let mut i = 0;

    while i < n {
        let c = chars[i].1;
        let next = chars.get(i + 1).map(|(_, c)| *c);

        let (kind, end) = match c {
            '"' | '\'' | '`' => (SegmentKind::String, scan_string(&chars, i, c)),
            '/' if next == Some('/') => (SegmentKind::LineComment, scan_line_comment(&chars, i)),
            '/' if next == Some('*') => (SegmentKind::BlockComment, scan_block_comment(&chars, i)),
            '/' if regex_allowed(last_significant, &chars[word.clone()]) => match scan_regex(&chars, i) {
                Some(end) => (SegmentKind::Regex, end),
                None => {
                    last_significant = Some('/');
                    i += 1;
                    continue;
                }
            },
            '\\' => {
                last_significant = Some('\\');
                i = (i + 2).min(n);
                continue;
            }
            _ => {
                if !c.is_whitespace() {
                    if is_word_char(c) {
                        if word.end != i {
                            word.start = i;
                        }
                        word.end = i + 1;
                    }
                    last_significant = Some(c);
                }
                i += 1;
                continue;
            }
        };

        if code_start < i {
            out.push(Segment {
                kind: SegmentKind::Code,
                text: &source[byte_at(code_start)..byte_at(i)],
            });
        }
        out.push(Segment {
            kind,
            text: &source[byte_at(i)..byte_at(end)],
        });
        if matches!(kind, SegmentKind::String | SegmentKind::Regex) {
            last_significant = Some('"');
        }
        i = end;
        code_start = end;
    }

    if code_start < n {
        out.push(Segment {
            kind: SegmentKind::Code,
            text: &source[byte_at(code_start)..],
        });
    }
    out
}

/// Rewrite code segments with `f`, copying every other segment verbatim
pub fn map_code<F>(source: &str, mut f: F) -> String
where
    F: FnMut(&str) -> String,
{
    let mut out = String::with_capacity(source.len());
    for seg in segments(source) {
        if seg.is_code() {
            out.push_str(&f(seg.text));
        } else {
            out.push_str(seg.text);
        }
    }
    out
}

/// Rewrite comment segments with `f`, copying every other segment verbatim
pub fn map_comments<F>(source: &str, mut f: F) -> String
where
    F: FnMut(&str) -> String,
{
    let mut out = String::with_capacity(source.len());
    for seg in segments(source) {
        if seg.is_comment() {
            out.push_str(&f(seg.text));
        } else {
            out.push_str(seg.text);
        }
    }
    out
}

fn regex_allowed(last_significant: Option<char>, word: &[(usize, char)]) -> bool {
    match last_significant {
        None => true,
        Some(c) if is_word_char(c) => {
            let word: String = word.iter().map(|(_, c)| *c).collect();
            REGEX_WORDS.contains(word.as_str())
        }
        Some(c) => REGEX_PRECEDERS.contains(c),
    }
}

fn scan_string(chars: &[(usize, char)], start: usize, quote: char) -> usize {
    let n = chars.len();
    let mut j = start + 1;
    while j < n {
        let c = chars[j].1;
        if c == '\\' {
            j += 2;
            continue;
        }
        if c == quote {
            return j + 1;
        }
        if c == '\n' && quote != '`' {
            return j;
        }
        j += 1;
    }
    n
}

fn scan_line_comment(chars: &[(usize, char)], start: usize) -> usize {
    chars[start..]
        .iter()
        .position(|(_, c)| *c == '\n')
        .map(|p| start + p)
        .unwrap_or(chars.len())
}

fn scan_block_comment(chars: &[(usize, char)], start: usize) -> usize {
    let n = chars.len();
    let mut j = start + 2;
    while j + 1 < n {
        if chars[j].1 == '*' && chars[j + 1].1 == '/' {
            return j + 2;
        }
        j += 1;
    }
    n
}

fn scan_regex(chars: &[(usize, char)], start: usize) -> Option<usize> {
    let n = chars.len();
    let mut j = start + 1;
    let mut in_class = false;
    while j < n {
        match chars[j].1 {
            '\n' => return None,
            '\\' => {
                j += 2;
                continue;
            }
            '[' => in_class = true,
            ']' => in_class = false,
            '/' if !in_class => {
                j += 1;
                while j < n && chars[j].1.is_ascii_alphabetic() {
                    j += 1;
                }
                return Some(j);
            }
            _ => {}
        }
        j += 1;
    }
    None
}
