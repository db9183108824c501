//! @dose
//! purpose: Turns squeezed, decompressed code back into something a human can read: operator
//!     and keyword spacing, one statement per line, and brace-depth indentation.
//!
//! when-editing:
//!     - !Spacing rules run on code segments first; layout runs after, over all segments
//!     - Output is readable, not identical to the original whitespace
//!
//! invariants:
//!     - Strings, regex literals and comments are copied unchanged
//!     - `;` inside parentheses (for headers) never starts a new line
//!
//! gotchas:
//!     - Object literals are laid out like blocks; that is accepted for readability
//!     - `<` and `>` alone are left unspaced (JSX and generics in comments of examples)

use super::lexer::{map_code, segments, SegmentKind};
use once_cell::sync::Lazy;
use regex::Regex;

const INDENT: &str = "  ";

static OPERATORS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\s*(>>>=|===|!==|\*\*=|<<=|>>=|\?\?=|\|\|=|&&=|==|!=|<=|>=|&&|\|\||\+=|-=|\*=|/=|%=|&=|\|=|\^=|=>|=)\s*",
    )
    .unwrap()
});
static KEYWORD_PAREN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(if|for|while|switch|catch)\s*\(").unwrap());
static PAREN_BRACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\)\s*\{").unwrap());
static KEYWORD_BRACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(else|try|finally|do)\s*\{").unwrap());
static BRACE_KEYWORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\}\s*(else|catch|finally)\b").unwrap());

/// Words that stay on the closing-brace line
const BRACE_CONTINUATIONS: &[&str] = &["else", "catch", "finally", "while"];

/// Reformat code for reading
pub fn reformat(text: &str) -> String {
    let spaced = map_code(text, |code| {
        let code = OPERATORS.replace_all(code, " $1 ");
        let code = KEYWORD_PAREN.replace_all(&code, "$1 (");
        let code = PAREN_BRACE.replace_all(&code, ") {");
        let code = KEYWORD_BRACE.replace_all(&code, "$1 {");
        BRACE_KEYWORD.replace_all(&code, "} $1").into_owned()
    });
    layout(&spaced)
}

struct Layout {
    out: String,
    depth: usize,
    parens: usize,
    line_start: bool,
}

impl Layout {
    fn newline(&mut self) {
        while self.out.ends_with(' ') {
            self.out.pop();
        }
        if !self.out.is_empty() && !self.out.ends_with('\n') {
            self.out.push('\n');
        }
        self.line_start = true;
    }

    fn indent_if_needed(&mut self) {
        if self.line_start {
            for _ in 0..self.depth {
                self.out.push_str(INDENT);
            }
            self.line_start = false;
        }
    }

    fn push(&mut self, c: char) {
        if self.line_start && c.is_whitespace() {
            return;
        }
        self.indent_if_needed();
        self.out.push(c);
    }

    fn push_str(&mut self, s: &str) {
        self.indent_if_needed();
        self.out.push_str(s);
    }
}

fn layout(text: &str) -> String {
    let mut state = Layout {
        out: String::with_capacity(text.len() + text.len() / 4),
        depth: 0,
        parens: 0,
        line_start: true,
    };

    for seg in segments(text) {
        if seg.kind != SegmentKind::Code {
            state.push_str(seg.text);
            continue;
        }

        let chars: Vec<char> = seg.text.chars().collect();
        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];
            match c {
                '(' | '[' => {
                    state.parens += 1;
                    state.push(c);
                }
                ')' | ']' => {
                    state.parens = state.parens.saturating_sub(1);
                    state.push(c);
                }
                ';' => {
                    state.push(c);
                    if state.parens == 0 {
                        state.newline();
                    }
                }
                '{' => {
                    let next = next_non_ws(&chars, i + 1);
                    if next.map(|j| chars[j]) == Some('}') {
                        state.push_str("{}");
                        i = next.unwrap_or(i);
                        after_close(&mut state, &chars, i + 1);
                    } else {
                        state.push(c);
                        state.depth += 1;
                        state.newline();
                    }
                }
                '}' => {
                    state.depth = state.depth.saturating_sub(1);
                    state.newline();
                    state.push(c);
                    after_close(&mut state, &chars, i + 1);
                }
                '\n' => state.newline(),
                _ => state.push(c),
            }
            i += 1;
        }
    }

    state.out.trim_end().to_string()
}

fn after_close(state: &mut Layout, chars: &[char], from: usize) {
    let Some(j) = next_non_ws(chars, from) else {
        state.newline();
        return;
    };
    if matches!(chars[j], ';' | ')' | ',' | '.' | ']') {
        return;
    }
    let rest: String = chars[j..].iter().take(8).collect();
    let continues = BRACE_CONTINUATIONS.iter().any(|kw| {
        rest.starts_with(kw)
            && !rest[kw.len()..]
                .chars()
                .next()
                .map(|c| c.is_alphanumeric() || c == '_')
                .unwrap_or(false)
    });
    if !continues {
        state.newline();
    }
}

fn next_non_ws(chars: &[char], from: usize) -> Option<usize> {
    (from..chars.len()).find(|&j| !chars[j].is_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reformat_function() {
        assert_eq!(
            reformat("function test(){return 42;}"),
            "function test() {\n  return 42;\n}"
        );
    }

    #[test]
    fn test_reformat_operators() {
        assert_eq!(reformat("const a=b===c&&d;"), "const a = b === c && d;");
        assert_eq!(reformat("x+=1;"), "x += 1;");
    }

    #[test]
    fn test_reformat_compound_assignment() {
        let cases = [
            ("x%=2;", "x %= 2;"),
            ("n>>=1;", "n >>= 1;"),
            ("n>>>=1;", "n >>>= 1;"),
            ("n<<=1;", "n <<= 1;"),
            ("x**=2;", "x **= 2;"),
            ("a||=b;", "a ||= b;"),
            ("a&&=b;", "a &&= b;"),
            ("r??=s;", "r ??= s;"),
            ("f|=4;", "f |= 4;"),
            ("f&=4;", "f &= 4;"),
            ("f^=4;", "f ^= 4;"),
        ];
        for (input, expected) in cases {
            assert_eq!(reformat(input), expected, "{}", input);
        }
        assert_eq!(reformat("a<=b&&c>=d;"), "a <= b && c >= d;");
    }

    #[test]
    fn test_reformat_arrow() {
        assert_eq!(reformat("const f=(a)=>a;"), "const f = (a) => a;");
    }

    #[test]
    fn test_reformat_keyword_spacing_and_else() {
        assert_eq!(
            reformat("if(a){b();}else{c();}"),
            "if (a) {\n  b();\n} else {\n  c();\n}"
        );
    }

    #[test]
    fn test_reformat_for_header_stays_on_one_line() {
        assert_eq!(
            reformat("for(let i=0;i<n;i++){f(i);}"),
            "for (let i = 0;i<n;i++) {\n  f(i);\n}"
        );
    }

    #[test]
    fn test_reformat_empty_block() {
        assert_eq!(reformat("function f(){}g();"), "function f() {}\ng();");
    }

    #[test]
    fn test_reformat_leaves_strings() {
        assert_eq!(reformat("x='a=b;{c}';"), "x = 'a=b;{c}';");
    }

    #[test]
    fn test_reformat_try_catch() {
        assert_eq!(
            reformat("try{a();}catch(e){b(e);}"),
            "try {\n  a();\n} catch (e) {\n  b(e);\n}"
        );
    }

    #[test]
    fn test_reformat_line_comment() {
        assert_eq!(reformat("// note\na();"), "// note\na();");
    }
}
