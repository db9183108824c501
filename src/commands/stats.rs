//! @dose
//! purpose: This module implements the stats command: compress each input in memory and
//!     report sizes, the dense-script token estimate and the tiktoken count before and after.
//!
//! when-editing:
//!     - !Nothing is written to disk; stats is read-only
//!     - The JSON shape (camelCase keys) is consumed by scripts, add fields rather than rename
//!
//! invariants:
//!     - Savings are computed from tiktoken counts; the estimate is reported alongside
//!
//! gotchas:
//!     - Text output is one line per input; JSON output is an array even for one input

use super::compress::compress_options;
use super::io::{self, map_inputs, report_failures, write_output};
use crate::cli::{CompressArgs, StatsArgs};
use crate::config::Config;
use crate::engine::Engine;
use crate::tokens::{count_tokens, estimate_token_count};
use crate::types::{CompressOptions, Method};
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

/// Size and token figures for one input
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressionStats {
    pub input: String,
    pub method: Method,
    pub original_bytes: usize,
    pub compressed_bytes: usize,
    pub original_chars: usize,
    pub compressed_chars: usize,
    pub original_estimate: usize,
    pub compressed_estimate: usize,
    pub original_tokens: usize,
    pub compressed_tokens: usize,
    pub token_savings_percent: f64,
}

impl CompressionStats {
    pub fn measure(
        input: String,
        source: &str,
        engine: &Engine,
        options: &CompressOptions,
    ) -> Result<Self> {
        let compressed = engine.compress(source, options)?;
        let original_tokens = count_tokens(source);
        let compressed_tokens = count_tokens(&compressed);
        let token_savings_percent = if original_tokens == 0 {
            0.0
        } else {
            (original_tokens as f64 - compressed_tokens as f64) * 100.0 / original_tokens as f64
        };

        Ok(Self {
            input,
            method: options.method(),
            original_bytes: source.len(),
            compressed_bytes: compressed.len(),
            original_chars: source.chars().count(),
            compressed_chars: compressed.chars().count(),
            original_estimate: estimate_token_count(source, false),
            compressed_estimate: estimate_token_count(&compressed, true),
            original_tokens,
            compressed_tokens,
            token_savings_percent,
        })
    }

    fn summary(&self) -> String {
        format!(
            "{}: {} -> {} bytes, tokens {} -> {} ({:.1}% saved), estimate {} -> {} [{}]",
            self.input,
            self.original_bytes,
            self.compressed_bytes,
            self.original_tokens,
            self.compressed_tokens,
            self.token_savings_percent,
            self.original_estimate,
            self.compressed_estimate,
            self.method
        )
    }
}

pub fn run_stats(args: &StatsArgs, root: &Path, config: &Config) -> Result<()> {
    let engine = config.engine(root).context("Failed to load dictionaries")?;
    let options = compress_options(
        &CompressArgs {
            method: args.method.clone(),
            ..CompressArgs::default()
        },
        config,
    )?;
    let inputs = io::inputs(&args.input, root);

    let results = map_inputs(&inputs, |source| {
        CompressionStats::measure(String::new(), source, &engine, &options)
    });

    let mut collected = Vec::with_capacity(inputs.len());
    let checked: Vec<Result<()>> = inputs
        .iter()
        .zip(results)
        .map(|(input, result)| {
            let mut stats = result?;
            stats.input = input.label();
            collected.push(stats);
            Ok(())
        })
        .collect();
    report_failures(&inputs, &checked)?;

    if args.json {
        write_output(None, &serde_json::to_string_pretty(&collected)?)
    } else {
        let lines: Vec<String> = collected.iter().map(CompressionStats::summary).collect();
        write_output(None, &lines.join("\n"))
    }
}
