//! @dose
//! purpose: This module implements the compress command. It builds the engine from
//!     glyphpack.toml, merges CLI flags over the configured compress options and writes each
//!     compressed input to stdout, --output, or a .glyph file next to the input.
//!
//! when-editing:
//!     - !CLI flags only switch options on; turning a configured option off is done in the
//!       config file
//!     - --method overrides [compress].use_pattern_tier
//!
//! invariants:
//!     - --output is only valid with a single input
//!     - Inputs are compressed in parallel; output order matches input order
//!
//! flows:
//!     - Resolve: config + flags -> CompressOptions, config -> Engine
//!     - Compress: every input through Engine::compress
//!     - Write: stdout, --output, or <input>.glyph

use super::io::{self, glyph_path, map_inputs, report_failures, resolve, write_output};
use crate::cli::CompressArgs;
use crate::config::Config;
use crate::types::{CompressOptions, Method};
use anyhow::{Context, Result};
use std::path::Path;

/// Config defaults with the command-line flags applied on top
pub fn compress_options(args: &CompressArgs, config: &Config) -> Result<CompressOptions> {
    let mut options = config.compress;
    if let Some(method) = &args.method {
        let method: Method = method.parse()?;
        options.use_pattern_tier = CompressOptions::for_method(method)?.use_pattern_tier;
    }
    options.remove_comments |= args.remove_comments;
    options.preserve_line_breaks |= args.preserve_line_breaks;
    Ok(options)
}

pub fn run_compress(args: &CompressArgs, root: &Path, config: &Config) -> Result<()> {
    let engine = config.engine(root).context("Failed to load dictionaries")?;
    let options = compress_options(args, config)?;
    let inputs = io::inputs(&args.input, root);

    if args.output.is_some() && inputs.len() > 1 {
        anyhow::bail!("--output needs exactly one input");
    }

    let results = map_inputs(&inputs, |source| Ok(engine.compress(source, &options)?));

    let written: Vec<Result<()>> = inputs
        .iter()
        .zip(results)
        .map(|(input, result)| {
            let compressed = result?;
            let target = match (&args.output, args.write, input.path()) {
                (Some(output), _, _) => Some(resolve(output, root)),
                (None, true, Some(path)) => Some(glyph_path(path)),
                _ => None,
            };
            write_output(target.as_deref(), &compressed)?;
            if let Some(target) = target {
                tracing::info!("Compressed {} -> {}", input.label(), target.display());
            }
            Ok(())
        })
        .collect();

    report_failures(&inputs, &written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::InputOptions;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn args_for(inputs: Vec<PathBuf>) -> CompressArgs {
        CompressArgs {
            input: InputOptions { inputs },
            ..CompressArgs::default()
        }
    }

    #[test]
    fn test_compress_writes_glyph_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join("app.js"),
            "function test() { return 42; }\n",
        )
        .unwrap();

        let mut args = args_for(vec![PathBuf::from("app.js")]);
        args.write = true;
        run_compress(&args, temp_dir.path(), &Config::default()).unwrap();

        let output = fs::read_to_string(temp_dir.path().join("app.js.glyph")).unwrap();
        assert_eq!(output, "函 test(){返 42;}༄");
    }

    #[test]
    fn test_compress_to_output_file_with_method() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("app.js"), "const x = 1;").unwrap();

        let mut args = args_for(vec![PathBuf::from("app.js")]);
        args.output = Some(PathBuf::from("out.txt"));
        args.method = Some("characterTier".to_string());
        run_compress(&args, temp_dir.path(), &Config::default()).unwrap();

        let output = fs::read_to_string(temp_dir.path().join("out.txt")).unwrap();
        assert_eq!(output, "常 x=1;");
    }

    #[test]
    fn test_compress_rejects_output_with_many_inputs() {
        let temp_dir = TempDir::new().unwrap();
        let mut args = args_for(vec![PathBuf::from("a.js"), PathBuf::from("b.js")]);
        args.output = Some(PathBuf::from("out.txt"));
        assert!(run_compress(&args, temp_dir.path(), &Config::default()).is_err());
    }

    #[test]
    fn test_compress_missing_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let mut args = args_for(vec![PathBuf::from("missing.js")]);
        args.write = true;
        assert!(run_compress(&args, temp_dir.path(), &Config::default()).is_err());
    }

    #[test]
    fn test_compress_many_inputs() {
        let temp_dir = TempDir::new().unwrap();
        let names = ["a.js", "b.js", "c.js"];
        for name in names {
            fs::write(temp_dir.path().join(name), "let value = null;").unwrap();
        }
        let mut args = args_for(names.iter().map(PathBuf::from).collect());
        args.write = true;
        run_compress(&args, temp_dir.path(), &Config::default()).unwrap();

        for name in names {
            let output =
                fs::read_to_string(temp_dir.path().join(format!("{}.glyph", name))).unwrap();
            assert_eq!(output, "让 值=空;༄");
        }
    }

    #[test]
    fn test_compress_options_merge() {
        let mut config = Config::default();
        config.compress.preserve_line_breaks = true;

        let mut args = CompressArgs::default();
        args.method = Some("character".to_string());
        args.remove_comments = true;
        let options = compress_options(&args, &config).unwrap();
        assert!(!options.use_pattern_tier);
        assert!(options.remove_comments);
        assert!(options.preserve_line_breaks);

        args.method = Some("rot13".to_string());
        let err = compress_options(&args, &config).unwrap_err();
        assert!(err.to_string().contains("rot13"));
    }
}
