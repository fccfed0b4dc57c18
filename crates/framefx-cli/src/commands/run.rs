//! Frame sequence processing command

use crate::RunArgs;
use anyhow::{Context, Result, bail};
use framefx_ops::kernels;
use framefx_ops::Pipeline;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};
#[allow(unused_imports)]
use tracing::{debug, info, trace, warn};

use super::{build_pipeline, load_frame, save_frame};

pub fn run(args: RunArgs, verbose: u8) -> Result<()> {
    trace!(pattern = %args.input, chain = %args.chain.chain(), "run::run");

    if !args.fps.is_finite() || args.fps < 0.0 {
        bail!("Invalid fps: {}", args.fps);
    }
    let tick = (args.fps > 0.0).then(|| Duration::from_secs_f64(1.0 / args.fps));

    let files = collect_frames(&args.input)?;
    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("Failed to create: {}", args.output.display()))?;

    let pipeline = build_pipeline(&args.chain)?;
    info!(frames = files.len(), chain = %args.chain.chain(), backend = %args.chain.backend, "Starting run");
    if verbose > 0 {
        println!("Found {} frames matching '{}'", files.len(), args.input);
    }

    let mut processed = 0usize;
    let mut failed = 0usize;
    for (index, path) in files.iter().enumerate() {
        let started = Instant::now();
        let output = args.output.join(output_name(path, index));

        match cycle(&pipeline, path, &output, args.rgb) {
            Ok(()) => {
                processed += 1;
                debug!(frame = index, input = %path.display(), elapsed = ?started.elapsed(), "Cycle done");
            }
            Err(e) => {
                failed += 1;
                warn!(frame = index, input = %path.display(), error = %format!("{e:#}"), "Cycle failed");
                if !args.keep_going {
                    return Err(e.context(format!("Frame {} failed", path.display())));
                }
            }
        }

        // Hold the cycle to the tick interval
        if let Some(tick) = tick {
            if let Some(rest) = tick.checked_sub(started.elapsed()) {
                thread::sleep(rest);
            }
        }
    }

    info!(processed, failed, "Run complete");
    println!("Processed: {} frames, {} failed", processed, failed);
    Ok(())
}

/// One tick: acquire, apply, hand off.
fn cycle(pipeline: &Pipeline, input: &Path, output: &Path, rgb: bool) -> Result<()> {
    let frame = load_frame(input)?;
    let mut out = pipeline.process(&frame)?;
    if rgb {
        out = kernels::gray_to_rgb(&out)?;
    }
    save_frame(output, &out)
}

/// Input paths matching `pattern`, sorted.
fn collect_frames(pattern: &str) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = glob::glob(pattern)
        .with_context(|| format!("Invalid pattern: {pattern}"))?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .collect();
    if files.is_empty() {
        bail!("No files match pattern: {}", pattern);
    }
    files.sort();
    Ok(files)
}

fn output_name(input: &Path, index: usize) -> PathBuf {
    match input.file_stem() {
        Some(stem) => PathBuf::from(stem).with_extension("png"),
        None => PathBuf::from(format!("frame_{index:06}.png")),
    }
}
