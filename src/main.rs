//! @dose
//! purpose: This is the CLI entry point for glyphpack. It parses command-line arguments using
//!     clap, determines the project root directory, loads glyphpack.toml, sets up logging and
//!     dispatches to the appropriate command handler.
//!
//! when-editing:
//!     - !All command handlers are imported from the glyphpack crate
//!     - !The root directory defaults to current working directory if not specified
//!     - Error messages are printed to stderr and exit with code 1
//!
//! invariants:
//!     - One and only one subcommand is always executed per invocation
//!     - The process exits with 0 on success, 1 on any error
//!     - Logging is initialised after the config is loaded, so config warnings use eprintln
//!
//! do-not:
//!     - Never add business logic here - delegate to command modules
//!     - Never panic - always use proper error handling
//!
//! gotchas:
//!     - The --root flag can be placed before or after the subcommand due to global flag
//!     - Verbose mode is also a global flag and raises the log level to debug

use anyhow::Context;
use clap::Parser;
use glyphpack::cli::{Cli, Commands};
use glyphpack::commands::{run_compress, run_decompress, run_detect, run_stats, run_verify};
use glyphpack::config::Config;
use glyphpack::logging::init_logging;
use std::env;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Determine root directory
    let root = match cli.root {
        Some(root) => root,
        None => env::current_dir().context("Failed to get current directory")?,
    };

    let config = Config::load(&root);
    init_logging(cli.verbose, &config.log.level);
    tracing::debug!("Project root: {}", root.display());

    match cli.command {
        Commands::Compress(args) => run_compress(&args, &root, &config),
        Commands::Decompress(args) => run_decompress(&args, &root, &config),
        Commands::Detect(args) => run_detect(&args, &root),
        Commands::Stats(args) => run_stats(&args, &root, &config),
        Commands::Verify(args) => run_verify(&args, &root, &config),
    }
}
