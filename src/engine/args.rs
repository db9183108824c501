//! Argument-list scanning shared by pattern compression and pattern reversal.
//!
//! A pattern-tier call is `SYMBOL(arg,arg,...)`. Compression only emits arguments that
//! survive [`split_top_level`]; reversal uses [`find_closing`] to delimit the list.

use super::classify::PATTERN_ANCHOR;
use crate::formatter::COMMENT_OPEN;

/// Walks a string tracking bracket depth and string literals
struct Scanner {
    stack: Vec<char>,
    quote: Option<char>,
    escaped: bool,
}

enum Step {
    /// Character at bracket depth zero, outside any string
    TopLevel(char),
    /// Character nested in brackets or inside a string
    Nested,
    /// Closing bracket that does not match the open one
    Mismatch,
}

impl Scanner {
    fn new() -> Self {
        Self {
            stack: Vec::new(),
            quote: None,
            escaped: false,
        }
    }

    fn step(&mut self, c: char) -> Step {
        if let Some(q) = self.quote {
            if self.escaped {
                self.escaped = false;
            } else if c == '\\' {
                self.escaped = true;
            } else if c == q {
                self.quote = None;
            }
            return Step::Nested;
        }
        match c {
            '"' | '\'' | '`' => {
                self.quote = Some(c);
                Step::Nested
            }
            '(' | '[' | '{' => {
                self.stack.push(c);
                Step::Nested
            }
            ')' | ']' | '}' => {
                let open = match c {
                    ')' => '(',
                    ']' => '[',
                    _ => '{',
                };
                match self.stack.pop() {
                    Some(top) if top == open => {
                        if self.stack.is_empty() {
                            // the closer itself sits at depth zero once popped
                            Step::TopLevel(c)
                        } else {
                            Step::Nested
                        }
                    }
                    _ => Step::Mismatch,
                }
            }
            _ if self.stack.is_empty() => Step::TopLevel(c),
            _ => Step::Nested,
        }
    }

    fn balanced(&self) -> bool {
        self.stack.is_empty() && self.quote.is_none()
    }
}

/// True when `value` can be written as one argument and read back unchanged:
/// balanced brackets and quotes, no top-level `,` or `;`, no reserved markers.
pub(crate) fn is_safe_argument(value: &str) -> bool {
    if value.contains(COMMENT_OPEN) || value.contains(PATTERN_ANCHOR) {
        return false;
    }
    let mut scanner = Scanner::new();
    for c in value.chars() {
        match scanner.step(c) {
            Step::Mismatch => return false,
            Step::TopLevel(',') | Step::TopLevel(';') => return false,
            _ => {}
        }
    }
    scanner.balanced()
}

/// Byte offset of the `)` matching the `(` at the start of `s`
pub(crate) fn find_closing(s: &str) -> Option<usize> {
    if !s.starts_with('(') {
        return None;
    }
    let mut scanner = Scanner::new();
    for (i, c) in s.char_indices() {
        match scanner.step(c) {
            Step::Mismatch => return None,
            Step::TopLevel(')') if scanner.balanced() => return Some(i),
            _ => {}
        }
    }
    None
}

/// Split an argument list on commas at depth zero
pub(crate) fn split_top_level(inner: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut scanner = Scanner::new();
    let mut start = 0;
    for (i, c) in inner.char_indices() {
        if let Step::TopLevel(',') = scanner.step(c) {
            parts.push(inner[start..i].trim());
            start = i + 1;
        }
    }
    parts.push(inner[start..].trim());
    parts
}
