//! wgpu backend implementation.
//!
//! Runs the blur/erode/dilate programs as WGSL compute shaders.

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use tracing::debug;
use wgpu::util::DeviceExt;

use super::limits::WORKGROUP_DIM;
use super::{GpuLimits, GpuPrimitives, ImageHandle, MorphOp};
use crate::context::GpuContext;
use crate::shaders;
use crate::{GpuError, GpuResult};

// =============================================================================
// Uniform Buffers
// =============================================================================

/// Dimensions uniform: [width, height, 0, 0]
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct DimsUniform {
    dims: [u32; 4],
}

// =============================================================================
// WgpuImage Handle
// =============================================================================

/// Device buffer holding one normalized f32 frame.
pub struct WgpuImage {
    buffer: wgpu::Buffer,
    width: u32,
    height: u32,
    size_bytes: u64,
}

impl ImageHandle for WgpuImage {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn size_bytes(&self) -> u64 {
        self.size_bytes
    }
}

// =============================================================================
// Pipelines
// =============================================================================

struct Pipelines {
    blur: wgpu::ComputePipeline,
    erode: wgpu::ComputePipeline,
    dilate: wgpu::ComputePipeline,
}

impl Pipelines {
    fn get(&self, op: MorphOp) -> &wgpu::ComputePipeline {
        match op {
            MorphOp::Blur => &self.blur,
            MorphOp::Erode => &self.erode,
            MorphOp::Dilate => &self.dilate,
        }
    }
}

// =============================================================================
// WgpuPrimitives
// =============================================================================

/// wgpu GPU primitives implementation.
pub struct WgpuPrimitives {
    ctx: Arc<GpuContext>,
    pipelines: Pipelines,
    limits: GpuLimits,
}

impl WgpuPrimitives {
    /// Check if wgpu is available.
    pub fn is_available() -> bool {
        GpuContext::probe()
    }

    /// Acquire a device and build the three pipelines.
    pub fn new() -> GpuResult<Self> {
        Self::with_context(Arc::new(GpuContext::new()?))
    }

    /// Build pipelines on an existing context.
    pub fn with_context(ctx: Arc<GpuContext>) -> GpuResult<Self> {
        debug!(device = ctx.device_name(), backend = ?ctx.backend(), "Building compute pipelines");

        let device_limits = ctx.limits();
        let limits = GpuLimits {
            max_buffer_bytes: (device_limits.max_storage_buffer_binding_size as u64)
                .min(device_limits.max_buffer_size),
            max_workgroups_per_dim: device_limits.max_compute_workgroups_per_dimension,
        };

        let pipelines = Self::create_pipelines(&ctx);

        Ok(Self { ctx, pipelines, limits })
    }

    /// Underlying context.
    pub fn context(&self) -> &GpuContext {
        &self.ctx
    }

    fn create_pipelines(ctx: &GpuContext) -> Pipelines {
        let create_pipeline = |source: &str, op: MorphOp| -> wgpu::ComputePipeline {
            let module = ctx.create_shader(op.entry_point(), source);

            ctx.device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                label: Some(op.entry_point()),
                layout: None, // Auto layout
                module: &module,
                entry_point: Some(op.entry_point()),
                compilation_options: Default::default(),
                cache: None,
            })
        };

        Pipelines {
            blur: create_pipeline(shaders::BLUR_IMAGE, MorphOp::Blur),
            erode: create_pipeline(shaders::ERODE_IMAGE, MorphOp::Erode),
            dilate: create_pipeline(shaders::DILATE_IMAGE, MorphOp::Dilate),
        }
    }

    /// Create dims uniform buffer.
    fn create_dims_buffer(&self, w: u32, h: u32) -> wgpu::Buffer {
        let uniform = DimsUniform { dims: [w, h, 0, 0] };
        self.ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("dims_uniform"),
            contents: bytemuck::bytes_of(&uniform),
            usage: wgpu::BufferUsages::UNIFORM,
        })
    }

    /// Execute compute dispatch and wait.
    fn dispatch_and_wait(&self, pipeline: &wgpu::ComputePipeline, bind_group: &wgpu::BindGroup, workgroups: (u32, u32, u32)) {
        let mut encoder = self.ctx.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("compute_encoder"),
        });

        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("compute_pass"),
                timestamp_writes: None,
            });
            pass.set_pipeline(pipeline);
            pass.set_bind_group(0, bind_group, &[]);
            pass.dispatch_workgroups(workgroups.0, workgroups.1, workgroups.2);
        }

        self.ctx.submit_and_wait(encoder);
    }
}

impl GpuPrimitives for WgpuPrimitives {
    type Handle = WgpuImage;

    fn upload(&self, data: &[f32], width: u32, height: u32) -> GpuResult<WgpuImage> {
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(GpuError::BufferSizeMismatch { expected, actual: data.len() });
        }

        let size_bytes = (data.len() * 4) as u64;

        let buffer = self.ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("input_buffer"),
            contents: bytemuck::cast_slice(data),
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC | wgpu::BufferUsages::COPY_DST,
        });

        Ok(WgpuImage { buffer, width, height, size_bytes })
    }

    fn download(&self, handle: &WgpuImage) -> GpuResult<Vec<f32>> {
        let size = handle.size_bytes;

        // Create staging buffer
        let staging = self.ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("staging_buffer"),
            size,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        // Copy to staging
        let mut encoder = self.ctx.device.create_command_encoder(&Default::default());
        encoder.copy_buffer_to_buffer(&handle.buffer, 0, &staging, 0, size);
        self.ctx.queue.submit(std::iter::once(encoder.finish()));

        // Map and read
        let slice = staging.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |r| {
            let _ = tx.send(r);
        });
        self.ctx.device.poll(wgpu::Maintain::Wait);

        rx.recv()
            .map_err(|_| GpuError::OperationFailed("Map channel closed".into()))?
            .map_err(|e| GpuError::OperationFailed(format!("Map failed: {e}")))?;

        let data = slice.get_mapped_range();
        let result: Vec<f32> = bytemuck::cast_slice(&data).to_vec();
        drop(data);
        staging.unmap();

        Ok(result)
    }

    fn allocate(&self, width: u32, height: u32) -> GpuResult<WgpuImage> {
        let size_bytes = GpuLimits::frame_bytes(width, height);

        let buffer = self.ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("output_buffer"),
            size: size_bytes,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Ok(WgpuImage { buffer, width, height, size_bytes })
    }

    fn exec(&self, op: MorphOp, src: &WgpuImage, dst: &mut WgpuImage) -> GpuResult<()> {
        let (w, h) = src.dimensions();
        if dst.dimensions() != (w, h) {
            return Err(GpuError::BufferSizeMismatch {
                expected: (src.size_bytes / 4) as usize,
                actual: (dst.size_bytes / 4) as usize,
            });
        }

        let dims_buf = self.create_dims_buffer(w, h);
        let pipeline = self.pipelines.get(op);

        let layout = pipeline.get_bind_group_layout(0);
        let bind_group = self.ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(op.entry_point()),
            layout: &layout,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: src.buffer.as_entire_binding() },
                wgpu::BindGroupEntry { binding: 1, resource: dst.buffer.as_entire_binding() },
                wgpu::BindGroupEntry { binding: 2, resource: dims_buf.as_entire_binding() },
            ],
        });

        // One work item per pixel, 16x16 workgroups
        let workgroups = (w.div_ceil(WORKGROUP_DIM), h.div_ceil(WORKGROUP_DIM), 1);
        self.dispatch_and_wait(pipeline, &bind_group, workgroups);
        Ok(())
    }

    fn limits(&self) -> &GpuLimits {
        &self.limits
    }

    fn name(&self) -> &'static str {
        "wgpu"
    }
}
