//! @dose
//! purpose: This module implements the decompress command: reconstruct source text from
//!     compressed input, with the reversal method detected from content unless --method is
//!     given.
//!
//! when-editing:
//!     - !--write derives the output name by dropping the .glyph suffix and refuses other names
//!     - --no-format and --strip-comments override [decompress] in glyphpack.toml
//!
//! invariants:
//!     - Plain ASCII input without --method fails with the ambiguous-method error
//!
//! gotchas:
//!     - --method characterTier on pattern-tier input leaves pattern symbols in the output

use super::io::{self, map_inputs, report_failures, resolve, unglyph_path, write_output};
use crate::cli::DecompressArgs;
use crate::config::Config;
use crate::types::DecompressOptions;
use anyhow::{Context, Result};
use std::path::Path;

/// Config defaults with the command-line flags applied on top
pub fn decompress_options(args: &DecompressArgs, config: &Config) -> Result<DecompressOptions> {
    let mut options = config.decompress;
    if let Some(method) = &args.method {
        options.method = method.parse()?;
    }
    if args.no_format {
        options.format_output = false;
    }
    if args.strip_comments {
        options.preserve_comments = false;
    }
    Ok(options)
}

pub fn run_decompress(args: &DecompressArgs, root: &Path, config: &Config) -> Result<()> {
    let engine = config.engine(root).context("Failed to load dictionaries")?;
    let options = decompress_options(args, config)?;
    let inputs = io::inputs(&args.input, root);

    if args.output.is_some() && inputs.len() > 1 {
        anyhow::bail!("--output needs exactly one input");
    }

    let results = map_inputs(&inputs, |compressed| Ok(engine.decompress(compressed, &options)?));

    let written: Vec<Result<()>> = inputs
        .iter()
        .zip(results)
        .map(|(input, result)| {
            let restored = result?;
            let target = match (&args.output, args.write, input.path()) {
                (Some(output), _, _) => Some(resolve(output, root)),
                (None, true, Some(path)) => Some(unglyph_path(path)?),
                _ => None,
            };
            write_output(target.as_deref(), &restored)?;
            if let Some(target) = target {
                tracing::info!("Decompressed {} -> {}", input.label(), target.display());
            }
            Ok(())
        })
        .collect();

    report_failures(&inputs, &written)
}
