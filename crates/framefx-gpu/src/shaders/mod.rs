//! WGSL shader sources for the compute pipelines.
//! These are used by the wgpu backend when the `wgpu` feature is enabled.
//!
//! All three programs share one binding layout:
//! `src` (read-only f32 per pixel), `dst` (same size), `dims` = (w, h, 0, 0).
//! Work items outside the interior copy their source pixel unchanged.

#![allow(dead_code)] // Shaders used by wgpu backend

/// 5x5 box average.
pub const BLUR_IMAGE: &str = r#"
@group(0) @binding(0) var<storage, read> src: array<f32>;
@group(0) @binding(1) var<storage, read_write> dst: array<f32>;
@group(0) @binding(2) var<uniform> dims: vec4<u32>;  // w, h, 0, 0

@compute @workgroup_size(16, 16)
fn blur_image(@builtin(global_invocation_id) id: vec3<u32>) {
    let x = id.x;
    let y = id.y;
    let w = dims.x;
    let h = dims.y;
    if x >= w || y >= h { return; }

    let idx = y * w + x;
    if x < 2u || y < 2u || x + 2u >= w || y + 2u >= h {
        dst[idx] = src[idx];
        return;
    }

    var sum = 0.0;
    for (var j = 0u; j < 5u; j = j + 1u) {
        for (var i = 0u; i < 5u; i = i + 1u) {
            sum = sum + src[(y + j - 2u) * w + (x + i - 2u)];
        }
    }
    dst[idx] = sum / 25.0;
}
"#;

/// 3x3 minimum.
pub const ERODE_IMAGE: &str = r#"
@group(0) @binding(0) var<storage, read> src: array<f32>;
@group(0) @binding(1) var<storage, read_write> dst: array<f32>;
@group(0) @binding(2) var<uniform> dims: vec4<u32>;  // w, h, 0, 0

@compute @workgroup_size(16, 16)
fn erode_image(@builtin(global_invocation_id) id: vec3<u32>) {
    let x = id.x;
    let y = id.y;
    let w = dims.x;
    let h = dims.y;
    if x >= w || y >= h { return; }

    let idx = y * w + x;
    if x < 1u || y < 1u || x + 1u >= w || y + 1u >= h {
        dst[idx] = src[idx];
        return;
    }

    var v = 1.0;
    for (var j = 0u; j < 3u; j = j + 1u) {
        for (var i = 0u; i < 3u; i = i + 1u) {
            v = min(v, src[(y + j - 1u) * w + (x + i - 1u)]);
        }
    }
    dst[idx] = v;
}
"#;

/// 3x3 maximum.
pub const DILATE_IMAGE: &str = r#"
@group(0) @binding(0) var<storage, read> src: array<f32>;
@group(0) @binding(1) var<storage, read_write> dst: array<f32>;
@group(0) @binding(2) var<uniform> dims: vec4<u32>;  // w, h, 0, 0

@compute @workgroup_size(16, 16)
fn dilate_image(@builtin(global_invocation_id) id: vec3<u32>) {
    let x = id.x;
    let y = id.y;
    let w = dims.x;
    let h = dims.y;
    if x >= w || y >= h { return; }

    let idx = y * w + x;
    if x < 1u || y < 1u || x + 1u >= w || y + 1u >= h {
        dst[idx] = src[idx];
        return;
    }

    var v = 0.0;
    for (var j = 0u; j < 3u; j = j + 1u) {
        for (var i = 0u; i < 3u; i = i + 1u) {
            v = max(v, src[(y + j - 1u) * w + (x + i - 1u)]);
        }
    }
    dst[idx] = v;
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MorphOp;

    fn source(op: MorphOp) -> &'static str {
        match op {
            MorphOp::Blur => BLUR_IMAGE,
            MorphOp::Erode => ERODE_IMAGE,
            MorphOp::Dilate => DILATE_IMAGE,
        }
    }

    #[test]
    fn test_entry_points_present() {
        for op in MorphOp::ALL {
            let decl = format!("fn {}(", op.entry_point());
            assert!(source(op).contains(&decl), "{op:?} missing {decl}");
        }
    }

    #[test]
    fn test_shared_layout() {
        for op in MorphOp::ALL {
            let src = source(op);
            assert!(src.contains("@binding(0) var<storage, read> src"));
            assert!(src.contains("@binding(1) var<storage, read_write> dst"));
            assert!(src.contains("@binding(2) var<uniform> dims"));
            assert!(src.contains("@workgroup_size(16, 16)"));
        }
    }
}
