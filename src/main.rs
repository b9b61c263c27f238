//! rmgen CLI - run map scripts, preview maps and render seed batches.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod cli;

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// rmgen - random RTS map generation from JSON scripts
#[derive(Parser, Debug)]
#[command(name = "rmgen")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log more (-v for debug, -vv for trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate one map from a script
    Generate {
        /// Map script (JSON)
        #[arg(required = true)]
        script: PathBuf,

        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Write the map export (JSON) to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Report format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },

    /// Print an ASCII rendering of a generated map
    Preview {
        /// Map script (JSON)
        #[arg(required = true)]
        script: PathBuf,

        /// Random seed (default: random)
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Generate many seeds of one script in parallel
    Batch {
        /// Map script (JSON)
        #[arg(required = true)]
        script: PathBuf,

        /// Number of maps to generate
        #[arg(short = 'n', long, default_value = "100")]
        maps: u64,

        /// First seed; map i uses seed + i (default: random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Number of parallel threads (default: all cores)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Save every map export into this directory
        #[arg(short, long)]
        out_dir: Option<PathBuf>,

        /// Report format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Show progress bar
        #[arg(short, long)]
        progress: bool,
    },
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let result = match args.command {
        Commands::Generate {
            script,
            seed,
            output,
            format,
        } => cli::generate::execute(&script, seed, output.as_deref(), format),

        Commands::Preview { script, seed } => cli::generate::preview(&script, seed),

        Commands::Batch {
            script,
            maps,
            seed,
            threads,
            out_dir,
            format,
            progress,
        } => cli::batch::execute(&script, maps, seed, threads, out_dir.as_deref(), format, progress),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
