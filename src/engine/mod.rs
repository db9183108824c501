//! @dose
//! purpose: The substitution engine. Engine compiles a DictionarySet into sorted rule lists once
//!     and runs the compress and decompress pipelines over them.
//!
//! when-editing:
//!     - !Every rule list is built in Engine::new; nothing sorts or compiles on the hot path
//!     - !Dictionaries are passed in explicitly; there is no process-wide "current dictionary"
//!       besides the cached Engine::builtin()
//!     - Each tier is also exposed on its own for tests and tooling
//!
//! invariants:
//!     - Pattern reversal runs before token reversal
//!     - Pattern-tier output always ends with PATTERN_ANCHOR
//!     - Empty, whitespace-only and oversized input is InvalidInput for both directions
//!
//! gotchas:
//!     - Round trips are only equal after normalize_whitespace; see verify_round_trip
//!     - Character-tier output of text with no dictionary words is still plain ASCII, so it
//!       classifies as Plain
//!
//! flows:
//!     - Compress: check -> strip/protect comments -> prenormalize -> patterns -> tokens
//!       -> restore comments -> optimize whitespace -> anchor
//!     - Decompress: check -> classify -> drop anchor -> reverse patterns -> reverse tokens
//!       -> repair -> strip comments -> reformat

mod args;
mod classify;
mod pattern;
mod reverse;
mod substitute;

pub use classify::{
    classify_method, is_cjk, is_dense, is_pattern_symbol, CJK_RANGES, PATTERN_ANCHOR,
    PATTERN_RANGES,
};
pub use pattern::{PatternCompressor, PatternRule, TargetSpec};
pub use reverse::{PatternReverser, TokenReverser, MAX_PATTERN_PASSES};
pub use substitute::{TokenRule, TokenSubstituter};

use crate::dictionary::{find_reverse_conflicts, DictionarySet};
use crate::error::CodecError;
use crate::formatter::{
    normalize_whitespace, optimize_whitespace, prenormalize, protect_comments, reformat,
    restore_comments, strip_comments, RepairPass,
};
use crate::types::{CompressOptions, DecompressOptions, Method};
use once_cell::sync::Lazy;

/// Default input size guard (4 MiB)
pub const DEFAULT_MAX_INPUT_BYTES: usize = 4 * 1024 * 1024;

/// Characters of context reported on each side of a drift
const DRIFT_SNIPPET_CHARS: usize = 40;

static BUILTIN: Lazy<Engine> = Lazy::new(|| Engine::new(&DictionarySet::builtin()));

/// Compiled dictionaries plus the repair pass
pub struct Engine {
    patterns: PatternCompressor,
    tokens: TokenSubstituter,
    pattern_reverser: PatternReverser,
    token_reverser: TokenReverser,
    repair: RepairPass,
    max_input_bytes: usize,
}

impl Engine {
    pub fn new(dictionaries: &DictionarySet) -> Self {
        for conflict in find_reverse_conflicts(&dictionaries.tokens) {
            tracing::warn!(
                "Replacement {:?} for {:?} is contained in {:?} for {:?}",
                conflict.shorter.to,
                conflict.shorter.from,
                conflict.longer.to,
                conflict.longer.from
            );
        }

        let patterns = PatternCompressor::new(&dictionaries.patterns);
        let tokens = TokenSubstituter::new(&dictionaries.tokens);
        let pattern_reverser = PatternReverser::new(patterns.rules());
        let token_reverser = TokenReverser::new(tokens.rules());

        tracing::debug!(
            patterns = patterns.rules().len(),
            tokens = tokens.rules().len(),
            "compiled dictionaries"
        );

        Self {
            patterns,
            tokens,
            pattern_reverser,
            token_reverser,
            repair: RepairPass::builtin(),
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
        }
    }

    /// Engine over the built-in dictionaries, compiled on first use
    pub fn builtin() -> &'static Engine {
        &BUILTIN
    }

    pub fn with_repair(mut self, repair: RepairPass) -> Self {
        self.repair = repair;
        self
    }

    pub fn with_max_input_bytes(mut self, max_input_bytes: usize) -> Self {
        self.max_input_bytes = max_input_bytes;
        self
    }

    pub fn max_input_bytes(&self) -> usize {
        self.max_input_bytes
    }

    fn check_input(&self, text: &str) -> Result<(), CodecError> {
        if text.trim().is_empty() {
            return Err(CodecError::InvalidInput("input is empty".to_string()));
        }
        if text.len() > self.max_input_bytes {
            return Err(CodecError::InvalidInput(format!(
                "input is {} bytes, limit is {}",
                text.len(),
                self.max_input_bytes
            )));
        }
        Ok(())
    }

    pub fn compress(&self, source: &str, options: &CompressOptions) -> Result<String, CodecError> {
        self.check_input(source)?;

        let (text, comments) = if options.remove_comments {
            (strip_comments(source), Vec::new())
        } else {
            protect_comments(source)
        };

        let mut text = prenormalize(&text);
        if options.use_pattern_tier {
            text = self.compress_patterns(&text);
        }
        text = self.compress_tokens(&text);
        text = restore_comments(&text, &comments);

        let mut out = optimize_whitespace(&text, options.preserve_line_breaks);
        if options.use_pattern_tier {
            out.push(PATTERN_ANCHOR);
        }

        tracing::debug!(
            method = %options.method(),
            input_bytes = source.len(),
            output_bytes = out.len(),
            "compressed"
        );
        Ok(out)
    }

    /// Compress with a method given by name (`characterTier`, `patternTier`, `auto`)
    pub fn compress_with_method(&self, source: &str, method: &str) -> Result<String, CodecError> {
        let options = CompressOptions::for_method(method.parse()?)?;
        self.compress(source, &options)
    }

    pub fn decompress(&self, compressed: &str, options: &DecompressOptions) -> Result<String, CodecError> {
        self.check_input(compressed)?;
        let method = resolve_method(compressed, options.method)?;

        let body = compressed.trim_end();
        let body = body.strip_suffix(PATTERN_ANCHOR).unwrap_or(body);

        let mut text = if method == Method::PatternTier {
            self.reverse_patterns(body)
        } else {
            body.to_string()
        };
        text = self.reverse_tokens(&text);
        text = self.repair(&text);

        if !options.preserve_comments {
            text = strip_comments(&text).trim().to_string();
        }
        if options.format_output {
            text = reformat(&text);
        }

        tracing::debug!(
            method = %method,
            input_bytes = compressed.len(),
            output_bytes = text.len(),
            "decompressed"
        );
        Ok(text)
    }

    /// Decompress with a method given by name; `auto` classifies the input
    pub fn decompress_with_method(&self, compressed: &str, method: &str) -> Result<String, CodecError> {
        let options = DecompressOptions {
            method: method.parse()?,
            ..DecompressOptions::default()
        };
        self.decompress(compressed, &options)
    }

    pub fn compress_patterns(&self, text: &str) -> String {
        self.patterns.compress(text)
    }

    pub fn compress_tokens(&self, text: &str) -> String {
        self.tokens.compress(text)
    }

    pub fn reverse_patterns(&self, text: &str) -> String {
        self.pattern_reverser.reverse(text)
    }

    pub fn reverse_tokens(&self, text: &str) -> String {
        self.token_reverser.reverse(text)
    }

    pub fn repair(&self, text: &str) -> String {
        self.repair.apply(text)
    }

    pub fn pattern_rules(&self) -> &[PatternRule] {
        self.patterns.rules()
    }

    pub fn token_rules(&self) -> &[TokenRule] {
        self.tokens.rules()
    }
}

fn resolve_method(text: &str, requested: Method) -> Result<Method, CodecError> {
    match requested {
        Method::Auto => match classify_method(text)? {
            Method::Plain => Err(CodecError::AmbiguousMethod(
                "text contains no compression markers".to_string(),
            )),
            method => Ok(method),
        },
        Method::Plain => Err(CodecError::UnknownMethod(requested.to_string())),
        method => Ok(method),
    }
}

/// Compare a reconstruction against its original after whitespace normalisation.
///
/// On mismatch the offset is a character offset into the normalised original.
pub fn verify_round_trip(original: &str, reconstructed: &str) -> Result<(), CodecError> {
    let expected = normalize_whitespace(original);
    let found = normalize_whitespace(reconstructed);
    if expected == found {
        return Ok(());
    }

    let offset = expected
        .chars()
        .zip(found.chars())
        .take_while(|(a, b)| a == b)
        .count();
    Err(CodecError::ReconstructionDrift {
        offset,
        expected: expected.chars().skip(offset).take(DRIFT_SNIPPET_CHARS).collect(),
        found: found.chars().skip(offset).take(DRIFT_SNIPPET_CHARS).collect(),
    })
}
