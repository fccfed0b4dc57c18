//! CLI command implementations

pub mod filters;
pub mod histogram;
pub mod run;

use anyhow::{Context, Result, bail};
use framefx_core::{Channels, Frame};
use framefx_ops::{FilterParams, Pipeline};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
#[allow(unused_imports)]
use tracing::{debug, trace};

use crate::ChainArgs;

/// Build a session pipeline from the shared chain arguments.
pub fn build_pipeline(args: &ChainArgs) -> Result<Pipeline> {
    let params = FilterParams::new(args.threshold, args.block_size)
        .context("Invalid filter parameters")?;
    let chain = args.chain();
    debug!(chain = %chain, backend = %args.backend, ?params, "Building pipeline");
    Ok(Pipeline::with_chain(chain, params, args.backend))
}

/// Load a PNG frame; alpha is dropped, 16-bit and palette images are reduced to 8-bit.
pub fn load_frame(path: &Path) -> Result<Frame> {
    trace!(path = %path.display(), "load_frame");
    let file = File::open(path).with_context(|| format!("Failed to open: {}", path.display()))?;
    let mut decoder = png::Decoder::new(BufReader::new(file));
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);

    let mut reader = decoder
        .read_info()
        .with_context(|| format!("Failed to decode: {}", path.display()))?;
    let buf_size = reader
        .output_buffer_size()
        .context("Cannot determine output buffer size")?;
    let mut buf = vec![0u8; buf_size];
    let info = reader
        .next_frame(&mut buf)
        .with_context(|| format!("Failed to decode: {}", path.display()))?;
    buf.truncate(info.buffer_size());

    let (width, height) = (info.width, info.height);
    let frame = match (info.color_type, info.bit_depth) {
        (png::ColorType::Grayscale, png::BitDepth::Eight) => Frame::gray(width, height, buf)?,
        (png::ColorType::GrayscaleAlpha, png::BitDepth::Eight) => {
            let data = buf.chunks_exact(2).map(|ga| ga[0]).collect();
            Frame::gray(width, height, data)?
        }
        (png::ColorType::Rgb, png::BitDepth::Eight) => Frame::rgb(width, height, buf)?,
        (png::ColorType::Rgba, png::BitDepth::Eight) => {
            let data = buf.chunks_exact(4).flat_map(|px| [px[0], px[1], px[2]]).collect();
            Frame::rgb(width, height, data)?
        }
        (color_type, bit_depth) => {
            bail!("Unsupported PNG layout {:?} {:?}: {}", color_type, bit_depth, path.display())
        }
    };
    Ok(frame)
}

/// Save a frame as 8-bit PNG.
pub fn save_frame(path: &Path, frame: &Frame) -> Result<()> {
    trace!(path = %path.display(), "save_frame");
    let file = File::create(path).with_context(|| format!("Failed to create: {}", path.display()))?;

    let color_type = match frame.channels() {
        Channels::Gray => png::ColorType::Grayscale,
        Channels::Rgb => png::ColorType::Rgb,
    };
    let mut encoder = png::Encoder::new(BufWriter::new(file), frame.width(), frame.height());
    encoder.set_color(color_type);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder
        .write_header()
        .with_context(|| format!("Failed to save: {}", path.display()))?;
    writer
        .write_image_data(frame.data())
        .with_context(|| format!("Failed to save: {}", path.display()))?;
    writer
        .finish()
        .with_context(|| format!("Failed to save: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_gray_and_rgb() {
        let dir = tempfile::tempdir().unwrap();

        let gray = Frame::from_fn(7, 3, Channels::Gray, |x, y, _| (x * 30 + y) as u8);
        let path = dir.path().join("gray.png");
        save_frame(&path, &gray).unwrap();
        assert_eq!(load_frame(&path).unwrap(), gray);

        let rgb = Frame::from_fn(4, 5, Channels::Rgb, |x, y, c| (x * 50 + y * 10 + c as u32) as u8);
        let path = dir.path().join("rgb.png");
        save_frame(&path, &rgb).unwrap();
        assert_eq!(load_frame(&path).unwrap(), rgb);
    }

    #[test]
    fn test_rgba_drops_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rgba.png");

        let file = File::create(&path).unwrap();
        let mut encoder = png::Encoder::new(BufWriter::new(file), 2, 1);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(&[1, 2, 3, 255, 4, 5, 6, 0]).unwrap();
        writer.finish().unwrap();

        let frame = load_frame(&path).unwrap();
        assert_eq!(frame.channels(), Channels::Rgb);
        assert_eq!(frame.data(), &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_missing_file() {
        let err = load_frame(Path::new("/nonexistent/frame.png")).unwrap_err();
        assert!(err.to_string().contains("Failed to open"));
    }
}
