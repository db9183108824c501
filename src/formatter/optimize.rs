//! @dose
//! purpose: Whitespace and comment normalisation around the substitution passes. Comments are
//!     either dropped or swapped for private-use placeholders so no rule fires inside them;
//!     whitespace is collapsed before matching and squeezed around delimiters afterwards.
//!
//! when-editing:
//!     - !Only code segments are rewritten; strings, regex literals and comments pass through
//!     - !A line comment is always followed by a newline in the output, otherwise the code
//!       after it would be commented out
//!     - normalize_whitespace is the comparison form used for round-trip checks
//!
//! invariants:
//!     - Whitespace between two word characters is never removed (that would merge tokens)
//!     - restore_comments(protect_comments(x)) == x
//!
//! gotchas:
//!     - Placeholders use U+E000/U+E001 which the classifier ignores
//!     - `+`, `-`, `/` and `.` are not delimiters: squeezing `a - -b` or `a / /re/` changes meaning

use super::lexer::{map_code, segments, SegmentKind};
use once_cell::sync::Lazy;
use regex::Regex;

/// Opens a protected comment placeholder
pub const COMMENT_OPEN: char = '\u{E000}';
/// Closes a protected comment placeholder
pub const COMMENT_CLOSE: char = '\u{E001}';

/// Characters next to which whitespace can be dropped without merging tokens
const DELIMITERS: &str = "{}()[];,:=<>!&|?";

static HORIZONTAL_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\S\n]+").unwrap());
static LINE_BREAKS: Lazy<Regex> = Lazy::new(|| Regex::new(r" ?\n\s*").unwrap());
static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\x{E000}(\d+)\x{E001}").unwrap());

fn is_delimiter(c: char) -> bool {
    DELIMITERS.contains(c)
}

pub(crate) fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Remove every comment. Block comments leave a single space behind.
pub fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    for seg in segments(source) {
        match seg.kind {
            SegmentKind::LineComment => {}
            SegmentKind::BlockComment => out.push(' '),
            _ => out.push_str(seg.text),
        }
    }
    out
}

/// Replace every comment with a numbered placeholder, returning the comments in order
pub fn protect_comments(source: &str) -> (String, Vec<String>) {
    let mut out = String::with_capacity(source.len());
    let mut comments = Vec::new();
    for seg in segments(source) {
        if seg.is_comment() {
            out.push(COMMENT_OPEN);
            out.push_str(&comments.len().to_string());
            out.push(COMMENT_CLOSE);
            comments.push(seg.text.to_string());
        } else {
            out.push_str(seg.text);
        }
    }
    (out, comments)
}

/// Put protected comments back. Unknown placeholder numbers are left as they are.
pub fn restore_comments(text: &str, comments: &[String]) -> String {
    if comments.is_empty() {
        return text.to_string();
    }
    PLACEHOLDER
        .replace_all(text, |caps: &regex::Captures| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|idx| comments.get(idx))
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Collapse horizontal whitespace and blank lines in code before pattern matching
pub fn prenormalize(source: &str) -> String {
    let collapsed = map_code(source, |code| {
        let code = HORIZONTAL_WS.replace_all(code, " ");
        LINE_BREAKS.replace_all(&code, "\n").into_owned()
    });
    collapsed.trim().to_string()
}

/// Final whitespace squeeze on compressed text
pub fn optimize_whitespace(text: &str, preserve_line_breaks: bool) -> String {
    let segs = segments(text);
    let mut out = String::with_capacity(text.len());
    let mut after_line_comment = false;

    for (idx, seg) in segs.iter().enumerate() {
        if !seg.is_code() {
            out.push_str(seg.text);
            after_line_comment = seg.kind == SegmentKind::LineComment;
            continue;
        }

        let next_segment_start = segs.get(idx + 1).and_then(|s| s.text.chars().next());
        let chars: Vec<char> = seg.text.chars().collect();
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];
            if !c.is_whitespace() {
                out.push(c);
                after_line_comment = false;
                i += 1;
                continue;
            }

            let start = i;
            while i < chars.len() && chars[i].is_whitespace() {
                i += 1;
            }
            if after_line_comment {
                out.push('\n');
                after_line_comment = false;
                continue;
            }

            let has_newline = chars[start..i].contains(&'\n');
            let prev = out.chars().next_back();
            let next = chars.get(i).copied().or(next_segment_start);
            let (Some(prev), Some(next)) = (prev, next) else {
                continue;
            };

            if has_newline && preserve_line_breaks {
                out.push('\n');
            } else if !is_delimiter(prev) && !is_delimiter(next) {
                out.push(' ');
            }
        }
    }

    out.trim_end().to_string()
}

/// Comparison form: whitespace kept only as a single space between two word characters
pub fn normalize_whitespace(text: &str) -> String {
    let chars: Vec<char> = text.trim().chars().collect();
    let mut out = String::with_capacity(chars.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if !c.is_whitespace() {
            out.push(c);
            i += 1;
            continue;
        }
        while i < chars.len() && chars[i].is_whitespace() {
            i += 1;
        }
        let prev = out.chars().next_back();
        let next = chars.get(i).copied();
        if let (Some(prev), Some(next)) = (prev, next) {
            if is_word_char(prev) && is_word_char(next) {
                out.push(' ');
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_comments() {
        let source = "let a = 1; // trailing\n/* block */let b = '//kept';";
        assert_eq!(strip_comments(source), "let a = 1; \n let b = '//kept';");
    }

    #[test]
    fn test_protect_and_restore_comments() {
        let source = "a(); // one\n/* two */ b();";
        let (protected, comments) = protect_comments(source);
        assert_eq!(comments, vec!["// one".to_string(), "/* two */".to_string()]);
        assert!(!protected.contains("one"));
        assert!(protected.contains('\u{E000}'));
        assert_eq!(restore_comments(&protected, &comments), source);
    }

    #[test]
    fn test_restore_ignores_unknown_placeholder() {
        let text = "x\u{E000}7\u{E001}";
        assert_eq!(restore_comments(text, &["// a".to_string()]), text);
    }

    #[test]
    fn test_prenormalize() {
        let source = "  function  f() {\n\n\t  return   1;   \n}  ";
        assert_eq!(prenormalize(source), "function f() {\nreturn 1;\n}");
    }

    #[test]
    fn test_prenormalize_keeps_strings() {
        assert_eq!(prenormalize("x =  'a   b'"), "x = 'a   b'");
    }

    #[test]
    fn test_optimize_whitespace_squeezes_delimiters() {
        assert_eq!(
            optimize_whitespace("function test() {\n  return 42;\n}", false),
            "function test(){return 42;}"
        );
    }

    #[test]
    fn test_optimize_whitespace_keeps_word_separation() {
        assert_eq!(optimize_whitespace("异 函 f ( a )", false), "异 函 f(a)");
        assert_eq!(optimize_whitespace("a + b", false), "a + b");
    }

    #[test]
    fn test_optimize_whitespace_preserves_line_breaks() {
        assert_eq!(
            optimize_whitespace("a = 1;\n\n  b = 2;", true),
            "a=1;\nb=2;"
        );
    }

    #[test]
    fn test_optimize_whitespace_line_comment_keeps_newline() {
        assert_eq!(
            optimize_whitespace("a(); // note\n   b();", false),
            "a();// note\nb();"
        );
    }

    #[test]
    fn test_optimize_whitespace_leaves_strings() {
        assert_eq!(optimize_whitespace("x = 'a  ,  b' ;", false), "x='a  ,  b';");
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(
            normalize_whitespace("function test() {\n  return 42;\n}"),
            "function test(){return 42;}"
        );
        assert_eq!(
            normalize_whitespace(" a   =  b +  c "),
            normalize_whitespace("a=b+c")
        );
        assert_eq!(normalize_whitespace(""), "");
    }
}
