//! @dose
//! purpose: Method Classifier. Decides which reversal path a document needs by looking at the
//!     Unicode blocks its characters come from; the compressed format has no header.
//!
//! when-editing:
//!     - !Any character from PATTERN_RANGES (or the anchor) means pattern tier, which implies
//!       character-tier reversal must also run afterwards
//!     - Keep PATTERN_RANGES disjoint from CJK_RANGES
//!
//! invariants:
//!     - ASCII-only text is Plain
//!     - Non-ASCII text with no recognised block is AmbiguousMethod, never a guess
//!
//! gotchas:
//!     - Comment placeholders (private use area) are neither CJK nor pattern symbols

use crate::error::CodecError;
use crate::types::Method;
use std::ops::RangeInclusive;

/// Trailing marker appended to every pattern-tier document (TIBETAN MARK INITIAL YIG MGO MDUN MA)
pub const PATTERN_ANCHOR: char = '\u{0F04}';

/// Blocks reserved for character-tier replacements
pub const CJK_RANGES: &[RangeInclusive<u32>] = &[
    0x3400..=0x4DBF, // CJK Unified Ideographs Extension A
    0x4E00..=0x9FFF, // CJK Unified Ideographs
    0xF900..=0xFAFF, // CJK Compatibility Ideographs
];

/// Blocks reserved for pattern-tier symbols
pub const PATTERN_RANGES: &[RangeInclusive<u32>] = &[
    0x0F00..=0x0FFF, // Tibetan
    0x10A0..=0x10FF, // Georgian
    0x1100..=0x11FF, // Hangul Jamo
    0x13A0..=0x13FF, // Cherokee
    0x3130..=0x318F, // Hangul Compatibility Jamo
    0xA980..=0xA9DF, // Javanese
    0xAA00..=0xAA5F, // Cham
    0xAA80..=0xAADF, // Tai Viet
    0xAC00..=0xD7AF, // Hangul Syllables
];

fn in_ranges(c: char, ranges: &[RangeInclusive<u32>]) -> bool {
    let cp = c as u32;
    ranges.iter().any(|r| r.contains(&cp))
}

pub fn is_cjk(c: char) -> bool {
    in_ranges(c, CJK_RANGES)
}

pub fn is_pattern_symbol(c: char) -> bool {
    c == PATTERN_ANCHOR || in_ranges(c, PATTERN_RANGES)
}

/// Characters cost one token each in the estimate
pub fn is_dense(c: char) -> bool {
    is_cjk(c) || is_pattern_symbol(c)
}

/// Classify a document by the character blocks it contains.
///
/// Stops at the first pattern-tier character; otherwise scans the whole text.
pub fn classify_method(text: &str) -> Result<Method, CodecError> {
    let mut saw_cjk = false;
    let mut saw_other = false;

    for c in text.chars() {
        if is_pattern_symbol(c) {
            return Ok(Method::PatternTier);
        }
        if is_cjk(c) {
            saw_cjk = true;
        } else if !c.is_ascii() {
            saw_other = true;
        }
    }

    if saw_cjk {
        Ok(Method::CharacterTier)
    } else if saw_other {
        Err(CodecError::AmbiguousMethod(
            "text contains non-ASCII characters but no compression markers".to_string(),
        ))
    } else {
        Ok(Method::Plain)
    }
}
