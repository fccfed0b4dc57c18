//! framefx - run a filter chain over a sequence of frames
//!
//! Frames are read from PNG files in sorted order, one per tick, and each
//! result is written back as PNG.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use framefx_ops::{Backend, FilterChain};

mod commands;

#[derive(Parser)]
#[command(name = "framefx")]
#[command(author, version, about = "Frame-by-frame video filter pipeline")]
#[command(long_about = "
Runs an ordered chain of image filters over a sequence of frames.

Filters: gray, binary, histogram_eq, negative, pixelize, sobel, prewitt,
laplace, blur, erode, dilate. blur/erode/dilate run on the compute backend.

Examples:
  framefx filters                                    # List filters
  framefx run -i 'capture/*.png' -o out -c gray,sobel
  framefx run -i 'capture/*.png' -o out -c gray,binary --threshold 90 --fps 30
  framefx run -i 'capture/*.png' -o out -c blur,dilate --backend wgpu --keep-going
  framefx histogram frame.png -c gray,histogram_eq
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// List available filters
    #[command(visible_alias = "ls")]
    Filters,

    /// Process a frame sequence
    #[command(visible_alias = "r")]
    Run(RunArgs),

    /// Print the histogram of a filtered frame (binary excluded)
    #[command(visible_alias = "hist")]
    Histogram(HistogramArgs),
}

/// Chain and parameters shared by every processing command.
#[derive(Args, Clone)]
struct ChainArgs {
    /// Comma-separated filter chain, applied left to right
    #[arg(short, long)]
    chain: Option<FilterChain>,

    /// Binary threshold (0-255)
    #[arg(short, long, default_value = "127")]
    threshold: f32,

    /// Pixelize block size in pixels
    #[arg(short, long, default_value = "15")]
    block_size: u32,

    /// Compute backend for blur/erode/dilate: auto, cpu, wgpu
    #[arg(long, default_value = "auto")]
    backend: Backend,
}

impl ChainArgs {
    /// Requested chain; empty when `--chain` is absent.
    fn chain(&self) -> FilterChain {
        self.chain.clone().unwrap_or_default()
    }
}

/// Arguments for the `run` command.
#[derive(Args)]
struct RunArgs {
    /// Input frames (glob pattern, processed in sorted order)
    #[arg(short, long)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output: PathBuf,

    #[command(flatten)]
    chain: ChainArgs,

    /// Frames per second (0 = as fast as possible)
    #[arg(long, default_value = "0")]
    fps: f64,

    /// Write single-channel results as RGB
    #[arg(long)]
    rgb: bool,

    /// Skip frames whose cycle fails instead of aborting
    #[arg(short, long)]
    keep_going: bool,
}

/// Arguments for the `histogram` command.
#[derive(Args)]
struct HistogramArgs {
    /// Input frame
    input: PathBuf,

    #[command(flatten)]
    chain: ChainArgs,

    /// Print all 256 bins, including empty ones
    #[arg(short, long)]
    all: bool,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "framefx_cli=debug,framefx_ops=debug,framefx_gpu=debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    match cli.command {
        Commands::Filters => commands::filters::run(cli.verbose),
        Commands::Run(args) => commands::run::run(args, cli.verbose),
        Commands::Histogram(args) => commands::histogram::run(args, cli.verbose),
    }
}
