//! GPU context and device management

use std::sync::Arc;
use wgpu::{Adapter, Device, DeviceDescriptor, Features, Instance, Queue};

use crate::{GpuError, GpuResult};

/// GPU context holding device and queue
pub struct GpuContext {
    pub(crate) device: Arc<Device>,
    pub(crate) queue: Arc<Queue>,
    adapter_info: wgpu::AdapterInfo,
    limits: wgpu::Limits,
}

impl GpuContext {
    /// Create new GPU context with default settings
    pub fn new() -> GpuResult<Self> {
        Self::with_power_preference(wgpu::PowerPreference::HighPerformance)
    }

    /// Create context with power preference
    pub fn with_power_preference(power: wgpu::PowerPreference) -> GpuResult<Self> {
        pollster::block_on(Self::new_async(power))
    }

    /// Check whether any adapter can be found, without creating a device.
    pub fn probe() -> bool {
        pollster::block_on(async {
            Self::request_adapter(wgpu::PowerPreference::HighPerformance)
                .await
                .is_some()
        })
    }

    async fn request_adapter(power: wgpu::PowerPreference) -> Option<Adapter> {
        let instance = Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: power,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
    }

    /// Async context creation
    async fn new_async(power: wgpu::PowerPreference) -> GpuResult<Self> {
        let adapter = Self::request_adapter(power)
            .await
            .ok_or(GpuError::NoAdapter)?;

        let adapter_info = adapter.get_info();
        let limits = adapter.limits();

        let (device, queue) = adapter
            .request_device(
                &DeviceDescriptor {
                    label: Some("framefx-gpu"),
                    required_features: Features::empty(),
                    required_limits: limits.clone(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    ..Default::default()
                },
                None,
            )
            .await
            .map_err(|e| GpuError::DeviceCreation(e.to_string()))?;

        Ok(Self {
            device: Arc::new(device),
            queue: Arc::new(queue),
            adapter_info,
            limits,
        })
    }

    /// Get adapter info (GPU name, vendor, etc.)
    pub fn adapter_info(&self) -> &wgpu::AdapterInfo {
        &self.adapter_info
    }

    /// Get device name
    pub fn device_name(&self) -> &str {
        &self.adapter_info.name
    }

    /// Get backend type (Vulkan, DX12, Metal, etc.)
    pub fn backend(&self) -> wgpu::Backend {
        self.adapter_info.backend
    }

    /// Limits the device was created with.
    pub fn limits(&self) -> &wgpu::Limits {
        &self.limits
    }

    /// Create a compute shader module
    pub(crate) fn create_shader(&self, label: &str, source: &str) -> wgpu::ShaderModule {
        self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        })
    }

    /// Submit work and wait for completion
    pub(crate) fn submit_and_wait(&self, encoder: wgpu::CommandEncoder) {
        self.queue.submit(std::iter::once(encoder.finish()));
        self.device.poll(wgpu::Maintain::Wait);
    }
}

impl std::fmt::Debug for GpuContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GpuContext")
            .field("device", &self.adapter_info.name)
            .field("backend", &self.adapter_info.backend)
            .finish()
    }
}
