//! @dose
//! purpose: This module defines the command-line interface for glyphpack using the clap derive
//!     macros. It specifies all commands (compress, decompress, detect, stats, verify) and
//!     their arguments.
//!
//! when-editing:
//!     - !Each command struct must derive Args and be added to the Commands enum
//!     - !Global flags (root, verbose) are defined on Cli and propagate to all subcommands
//!     - Boolean overrides of glyphpack.toml come in pairs only where the config default is true
//!
//! invariants:
//!     - The Cli struct is the root parser that clap uses to parse command-line arguments
//!     - Each subcommand has its own Args struct with typed fields
//!     - PathBuf is used for all file/directory path arguments to ensure proper path handling
//!
//! do-not:
//!     - Never add positional arguments that could conflict with subcommands
//!
//! gotchas:
//!     - Every command accepts "-" as input to read from stdin
//!     - Method names are parsed by the library, so `--method rot13` fails at run time with
//!       the library's UnknownMethod message rather than a clap error

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "glyphpack")]
#[command(author, version, about = "Reversible dictionary and pattern compression for JavaScript")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to project root (defaults to current directory)
    #[arg(short, long, global = true)]
    pub root: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compress JavaScript source
    Compress(CompressArgs),

    /// Reconstruct source from compressed text
    Decompress(DecompressArgs),

    /// Report which compression method a text uses
    Detect(DetectArgs),

    /// Show size and token figures for a compression round
    Stats(StatsArgs),

    /// Compress, decompress and compare against the original
    Verify(VerifyArgs),
}

/// Input files shared by every command
#[derive(Args, Clone, Default)]
pub struct InputOptions {
    /// Files to process (use "-" or nothing for stdin)
    #[arg(value_name = "PATH")]
    pub inputs: Vec<PathBuf>,
}

#[derive(Args, Default)]
pub struct CompressArgs {
    #[command(flatten)]
    pub input: InputOptions,

    /// Output file for a single input (defaults to stdout, or <input>.glyph with --write)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write each result next to its input with a .glyph suffix
    #[arg(short, long)]
    pub write: bool,

    /// Compression method: characterTier, patternTier or auto
    #[arg(short, long)]
    pub method: Option<String>,

    /// Drop comments
    #[arg(long)]
    pub remove_comments: bool,

    /// Keep line breaks
    #[arg(long)]
    pub preserve_line_breaks: bool,
}

#[derive(Args, Default)]
pub struct DecompressArgs {
    #[command(flatten)]
    pub input: InputOptions,

    /// Output file for a single input (defaults to stdout, or <input> minus .glyph with --write)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write each result next to its input with the .glyph suffix removed
    #[arg(short, long)]
    pub write: bool,

    /// Reversal method: characterTier, patternTier or auto
    #[arg(short, long)]
    pub method: Option<String>,

    /// Skip reformatting; keep the squeezed layout
    #[arg(long)]
    pub no_format: bool,

    /// Drop comments from the reconstruction
    #[arg(long)]
    pub strip_comments: bool,
}

#[derive(Args, Default)]
pub struct DetectArgs {
    #[command(flatten)]
    pub input: InputOptions,
}

#[derive(Args, Default)]
pub struct StatsArgs {
    #[command(flatten)]
    pub input: InputOptions,

    /// Compression method: characterTier, patternTier or auto
    #[arg(short, long)]
    pub method: Option<String>,

    /// Emit JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Default)]
pub struct VerifyArgs {
    #[command(flatten)]
    pub input: InputOptions,

    /// Compression method: characterTier, patternTier or auto
    #[arg(short, long)]
    pub method: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_compress() {
        let cli = Cli::try_parse_from(["glyphpack", "compress"]).unwrap();
        let Commands::Compress(args) = cli.command else {
            panic!("Expected Compress")
        };
        assert!(args.input.inputs.is_empty());
        assert!(args.output.is_none());
        assert!(!args.write);
        assert!(args.method.is_none());

        let cli = Cli::try_parse_from([
            "glyphpack",
            "compress",
            "a.js",
            "b.js",
            "--write",
            "--method",
            "characterTier",
            "--remove-comments",
            "--preserve-line-breaks",
        ])
        .unwrap();
        let Commands::Compress(args) = cli.command else {
            panic!("Expected Compress")
        };
        assert_eq!(args.input.inputs.len(), 2);
        assert!(args.write);
        assert_eq!(args.method.as_deref(), Some("characterTier"));
        assert!(args.remove_comments);
        assert!(args.preserve_line_breaks);

        let cli = Cli::try_parse_from(["glyphpack", "compress", "-", "-o", "out.glyph"]).unwrap();
        let Commands::Compress(args) = cli.command else {
            panic!("Expected Compress")
        };
        assert_eq!(args.input.inputs, vec![PathBuf::from("-")]);
        assert_eq!(args.output, Some(PathBuf::from("out.glyph")));
    }

    #[test]
    fn test_parse_decompress() {
        let cli = Cli::try_parse_from([
            "glyphpack",
            "decompress",
            "a.js.glyph",
            "--no-format",
            "--strip-comments",
        ])
        .unwrap();
        let Commands::Decompress(args) = cli.command else {
            panic!("Expected Decompress")
        };
        assert_eq!(args.input.inputs, vec![PathBuf::from("a.js.glyph")]);
        assert!(args.no_format);
        assert!(args.strip_comments);
        assert!(!args.write);
    }

    #[test]
    fn test_parse_stats_and_verify() {
        let cli = Cli::try_parse_from(["glyphpack", "stats", "a.js", "--json"]).unwrap();
        let Commands::Stats(args) = cli.command else {
            panic!("Expected Stats")
        };
        assert!(args.json);

        let cli = Cli::try_parse_from(["glyphpack", "verify", "a.js", "-m", "patternTier"]).unwrap();
        let Commands::Verify(args) = cli.command else {
            panic!("Expected Verify")
        };
        assert_eq!(args.method.as_deref(), Some("patternTier"));
    }

    /// Test global flags (-v, --verbose, -r, --root)
    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from(["glyphpack", "-v", "detect"]).unwrap();
        assert!(cli.verbose);
        let cli = Cli::try_parse_from(["glyphpack", "--verbose", "detect"]).unwrap();
        assert!(cli.verbose);

        let cli = Cli::try_parse_from(["glyphpack", "-r", "/tmp/project", "compress"]).unwrap();
        assert_eq!(cli.root, Some(PathBuf::from("/tmp/project")));

        // Flags after command
        let cli = Cli::try_parse_from(["glyphpack", "stats", "-v"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn test_error_cases() {
        assert!(Cli::try_parse_from(["glyphpack"]).is_err());
        assert!(Cli::try_parse_from(["glyphpack", "invalid"]).is_err());
        assert!(Cli::try_parse_from(["glyphpack", "detect", "--json"]).is_err());
    }

    #[test]
    fn test_help_output() {
        let mut cmd = Cli::command();
        let help = format!("{}", cmd.render_help());
        for name in ["compress", "decompress", "detect", "stats", "verify"] {
            assert!(help.contains(name), "missing {}", name);
        }
    }
}
