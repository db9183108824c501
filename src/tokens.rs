//! @dose
//! purpose: Token cost figures for reports. estimate_token_count is the cheap cost model used
//!     for statistics; count_tokens uses tiktoken for a real tokenizer count.
//!
//! when-editing:
//!     - !The tokenizer is lazily initialized and cached for performance
//!     - Uses cl100k_base encoding (GPT-4/ChatGPT) as a reasonable approximation for Claude
//!
//! invariants:
//!     - count_tokens always returns a valid count (falls back to the estimate on error)
//!     - Neither function affects compression; they only feed reporting
//!
//! gotchas:
//!     - Different LLMs use different tokenizers; cl100k_base is an approximation
//!     - First call has initialization overhead; subsequent calls are fast

use crate::engine::is_dense;
use once_cell::sync::Lazy;
use tiktoken_rs::CoreBPE;

/// Characters per token for non-dense text
const CHARS_PER_TOKEN: usize = 4;

/// Cached tokenizer instance for performance
static TOKENIZER: Lazy<Option<CoreBPE>> = Lazy::new(|| tiktoken_rs::cl100k_base().ok());

/// Heuristic token cost.
///
/// With `assume_dense_script`, every run of ordinary characters costs ⌈len/4⌉ and each
/// CJK or pattern-symbol character costs 1. Without it the whole text is costed as
/// ordinary characters.
pub fn estimate_token_count(text: &str, assume_dense_script: bool) -> usize {
    if !assume_dense_script {
        return text.chars().count().div_ceil(CHARS_PER_TOKEN);
    }

    let mut total = 0;
    let mut run: usize = 0;
    for c in text.chars() {
        if is_dense(c) {
            total += run.div_ceil(CHARS_PER_TOKEN) + 1;
            run = 0;
        } else {
            run += 1;
        }
    }
    total + run.div_ceil(CHARS_PER_TOKEN)
}

/// Count tokens in the given text using tiktoken's cl100k_base encoding.
///
/// Falls back to the dense-script estimate if tokenizer initialization fails.
pub fn count_tokens(text: &str) -> usize {
    match TOKENIZER.as_ref() {
        Some(tokenizer) => tokenizer.encode_ordinary(text).len(),
        None => estimate_token_count(text, true),
    }
}
