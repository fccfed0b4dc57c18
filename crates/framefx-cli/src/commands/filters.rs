//! Filter listing command

use anyhow::Result;
use framefx_gpu::Backend;
use framefx_ops::FilterId;
use tracing::trace;

pub fn run(verbose: u8) -> Result<()> {
    trace!("filters::run");
    for id in FilterId::ALL {
        if id.is_gpu() {
            println!("{:<14} compute", id.name());
        } else {
            println!("{}", id.name());
        }
    }

    if verbose > 0 {
        println!();
        for backend in [Backend::Cpu, Backend::Wgpu] {
            let state = if backend.is_available() { "available" } else { "unavailable" };
            println!("backend {backend}: {state}");
        }
    }
    Ok(())
}
