//! @dose
//! purpose: This module implements the verify command: compress each input, decompress the
//!     result with the same method and check that the reconstruction matches the original
//!     after whitespace normalisation.
//!
//! when-editing:
//!     - !Comments are compared only when they survive compression; --remove-comments in the
//!       [compress] config compares against the comment-free original
//!
//! invariants:
//!     - A drift failure names the character offset into the normalised original
//!
//! gotchas:
//!     - Verification is whitespace-insensitive, so reformatting differences never fail it

use super::compress::compress_options;
use super::io::{self, map_inputs, report_failures, write_output};
use crate::cli::{CompressArgs, VerifyArgs};
use crate::config::Config;
use crate::engine::{verify_round_trip, Engine};
use crate::formatter::strip_comments;
use crate::types::{CompressOptions, DecompressOptions};
use anyhow::{Context, Result};
use std::path::Path;

/// Compress, decompress and compare one source text
pub fn check_round_trip(source: &str, engine: &Engine, options: &CompressOptions) -> Result<()> {
    let compressed = engine.compress(source, options)?;
    let restored = engine.decompress(
        &compressed,
        &DecompressOptions {
            method: options.method(),
            ..DecompressOptions::default()
        },
    )?;

    let expected = if options.remove_comments {
        strip_comments(source)
    } else {
        source.to_string()
    };
    verify_round_trip(&expected, &restored)?;
    Ok(())
}

pub fn run_verify(args: &VerifyArgs, root: &Path, config: &Config) -> Result<()> {
    let engine = config.engine(root).context("Failed to load dictionaries")?;
    let options = compress_options(
        &CompressArgs {
            method: args.method.clone(),
            ..CompressArgs::default()
        },
        config,
    )?;
    let inputs = io::inputs(&args.input, root);

    let results = map_inputs(&inputs, |source| check_round_trip(source, &engine, &options));

    let reported: Vec<Result<()>> = inputs
        .iter()
        .zip(results)
        .map(|(input, result)| {
            result?;
            write_output(None, &format!("OK {}", input.label()))
        })
        .collect();

    report_failures(&inputs, &reported)
}
