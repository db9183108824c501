//! @dose
//! purpose: Error taxonomy for the substitution engine. Every fallible library operation
//!     returns CodecError; the binary wraps it in anyhow with context.
//!
//! when-editing:
//!     - !MalformedRule is built by the rule compilers and logged, never returned from
//!       compress/decompress
//!     - Messages are user facing (printed by main.rs), keep them short and specific
//!
//! invariants:
//!     - UnknownMethod always carries the rejected method name verbatim
//!     - ReconstructionDrift is only produced by verify_round_trip
//!
//! do-not:
//!     - Never add a catch-all variant; callers match on these

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown compression method: {0} (expected characterTier, patternTier or auto)")]
    UnknownMethod(String),

    #[error("Unable to determine compression method: {0}")]
    AmbiguousMethod(String),

    #[error("Malformed rule {rule:?}: {reason}")]
    MalformedRule { rule: String, reason: String },

    #[error("Reconstruction drift at offset {offset}: expected {expected:?}, found {found:?}")]
    ReconstructionDrift {
        offset: usize,
        expected: String,
        found: String,
    },

    #[error("Failed to load dictionary: {0}")]
    Dictionary(String),
}

impl CodecError {
    pub(crate) fn malformed(rule: &str, reason: impl Into<String>) -> Self {
        CodecError::MalformedRule {
            rule: rule.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_method_message_names_method() {
        let err = CodecError::UnknownMethod("rot13".to_string());
        assert!(err.to_string().contains("rot13"));
    }

    #[test]
    fn test_malformed_helper() {
        let err = CodecError::malformed("fetch($1", "unbalanced");
        assert_eq!(
            err,
            CodecError::MalformedRule {
                rule: "fetch($1".to_string(),
                reason: "unbalanced".to_string()
            }
        );
        assert!(err.to_string().contains("unbalanced"));
    }
}
