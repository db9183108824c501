//! @dose
//! purpose: This is the library crate root for glyphpack, exposing the substitution engine for
//!     use as both a CLI tool and a library. It re-exports the engine, dictionaries, options and
//!     reporting helpers for convenient access by consumers.
//!
//! when-editing:
//!     - !All public modules must be declared here with pub mod
//!     - !Re-exports should include commonly used types and functions
//!     - Keep the re-export list organized by module
//!
//! invariants:
//!     - The public API surface is stable - all re-exported items are public contract
//!     - Every library operation returns CodecError; anyhow stays in the commands
//!
//! do-not:
//!     - Never initialise logging from library code; only the binary calls init_logging
//!
//! gotchas:
//!     - The lib.rs is separate from main.rs - library consumers get lib, CLI gets main
//!     - Engine::builtin() is a shared static; build an Engine for custom dictionaries

pub mod cli;
pub mod commands;
pub mod config;
pub mod dictionary;
pub mod engine;
pub mod error;
pub mod formatter;
pub mod logging;
pub mod tokens;
pub mod types;

// Re-export main types for convenience
pub use cli::{Cli, Commands};
pub use config::Config;
pub use dictionary::{find_reverse_conflicts, DictionarySet, ReverseConflict};
pub use engine::{classify_method, verify_round_trip, Engine};
pub use error::CodecError;
pub use formatter::{normalize_whitespace, reformat, RepairPass, RepairRule};
pub use tokens::{count_tokens, estimate_token_count};
pub use types::{CompressOptions, DecompressOptions, Method, PatternEntry, TokenEntry};
