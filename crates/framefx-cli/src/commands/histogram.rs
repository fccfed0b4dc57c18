//! Histogram preview command

use crate::HistogramArgs;
use anyhow::Result;
use tracing::{info, trace};

use super::{build_pipeline, load_frame};

pub fn run(args: HistogramArgs, verbose: u8) -> Result<()> {
    trace!(input = %args.input.display(), chain = %args.chain.chain(), "histogram::run");

    let pipeline = build_pipeline(&args.chain)?;
    let frame = load_frame(&args.input)?;
    let (out, hist) = pipeline.preview(&frame)?;

    let total: u64 = hist.iter().sum();
    info!(w = out.width(), h = out.height(), pixels = total, "Histogram preview");
    if verbose > 0 {
        println!("{}: {}x{}, chain '{}'", args.input.display(), out.width(), out.height(), args.chain.chain());
    }

    for (value, &count) in hist.iter().enumerate() {
        if args.all || count > 0 {
            println!("{value:>3} {count}");
        }
    }
    Ok(())
}
