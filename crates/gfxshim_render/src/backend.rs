//! wgpu implementations of the driver-object seam
//!
//! wgpu exposes texture usage and sampler comparison on every backend, but
//! never memory placement, so texture storage mode is always reported as
//! unsupported. wgpu does not report device memory either; the working-set
//! estimate for an adapter therefore uses the fixed fallback.

use crate::capability::{CapabilityQuery, OptionalProperty};
use crate::device::{DeviceLimits, DeviceType, GpuDevice};
use crate::sampler::SamplerDescriptorObject;
use crate::texture::TextureDescriptorObject;
use crate::types::{CompareFunction, StorageMode, TextureUsage};
use crate::BackendType;

/// PCI vendor id Apple GPUs report through other APIs.
pub const APPLE_VENDOR_ID: u32 = 0x106b;

impl From<wgpu::Backend> for BackendType {
    fn from(backend: wgpu::Backend) -> Self {
        match backend {
            wgpu::Backend::Metal => BackendType::Metal,
            wgpu::Backend::Dx12 => BackendType::DirectX12,
            wgpu::Backend::Vulkan => BackendType::Vulkan,
            wgpu::Backend::Gl => BackendType::OpenGL,
            wgpu::Backend::BrowserWebGpu => BackendType::WebGpu,
            wgpu::Backend::Empty => BackendType::Unknown,
        }
    }
}

impl From<wgpu::DeviceType> for DeviceType {
    fn from(device_type: wgpu::DeviceType) -> Self {
        match device_type {
            wgpu::DeviceType::IntegratedGpu => DeviceType::IntegratedGpu,
            wgpu::DeviceType::DiscreteGpu => DeviceType::DiscreteGpu,
            wgpu::DeviceType::VirtualGpu => DeviceType::VirtualGpu,
            wgpu::DeviceType::Cpu => DeviceType::Cpu,
            wgpu::DeviceType::Other => DeviceType::Other,
        }
    }
}

impl From<&wgpu::Limits> for DeviceLimits {
    fn from(limits: &wgpu::Limits) -> Self {
        Self {
            max_texture_dimension_1d: limits.max_texture_dimension_1d,
            max_texture_dimension_2d: limits.max_texture_dimension_2d,
            max_texture_dimension_3d: limits.max_texture_dimension_3d,
            max_texture_array_layers: limits.max_texture_array_layers,
            max_bind_groups: limits.max_bind_groups,
            max_uniform_buffer_binding_size: limits.max_uniform_buffer_binding_size,
            max_storage_buffer_binding_size: limits.max_storage_buffer_binding_size,
            max_vertex_buffers: limits.max_vertex_buffers,
            max_vertex_attributes: limits.max_vertex_attributes,
            max_compute_invocations_per_workgroup: limits.max_compute_invocations_per_workgroup,
            max_compute_workgroup_size: [
                limits.max_compute_workgroup_size_x,
                limits.max_compute_workgroup_size_y,
                limits.max_compute_workgroup_size_z,
            ],
        }
    }
}

/// Snapshot of a wgpu adapter's identity and limits.
#[derive(Debug, Clone)]
pub struct AdapterDevice {
    info: wgpu::AdapterInfo,
    limits: wgpu::Limits,
}

impl AdapterDevice {
    pub fn new(info: wgpu::AdapterInfo, limits: wgpu::Limits) -> Self {
        Self { info, limits }
    }

    pub fn from_adapter(adapter: &wgpu::Adapter) -> Self {
        Self::new(adapter.get_info(), adapter.limits())
    }

    pub fn info(&self) -> &wgpu::AdapterInfo {
        &self.info
    }
}

impl GpuDevice for AdapterDevice {
    fn name(&self) -> Option<String> {
        Some(self.info.name.clone())
    }

    fn vendor_id(&self) -> Option<u32> {
        match (self.info.vendor, self.info.backend) {
            // Metal has no PCI ids; every Metal device is Apple-driven
            (0, wgpu::Backend::Metal) => Some(APPLE_VENDOR_ID),
            (0, _) => None,
            (vendor, _) => Some(vendor),
        }
    }

    fn device_id(&self) -> Option<u32> {
        Some(self.info.device)
    }

    fn device_type(&self) -> DeviceType {
        self.info.device_type.into()
    }

    fn limits(&self) -> Option<DeviceLimits> {
        Some(DeviceLimits::from(&self.limits))
    }

    fn total_memory(&self) -> Option<u64> {
        None
    }

    fn recommended_working_set_size(&self) -> Option<u64> {
        None
    }

    fn backend(&self) -> BackendType {
        self.info.backend.into()
    }
}

impl From<CompareFunction> for wgpu::CompareFunction {
    fn from(function: CompareFunction) -> Self {
        match function {
            CompareFunction::Never => wgpu::CompareFunction::Never,
            CompareFunction::Less => wgpu::CompareFunction::Less,
            CompareFunction::Equal => wgpu::CompareFunction::Equal,
            CompareFunction::LessEqual => wgpu::CompareFunction::LessEqual,
            CompareFunction::Greater => wgpu::CompareFunction::Greater,
            CompareFunction::NotEqual => wgpu::CompareFunction::NotEqual,
            CompareFunction::GreaterEqual => wgpu::CompareFunction::GreaterEqual,
            CompareFunction::Always => wgpu::CompareFunction::Always,
        }
    }
}

impl From<wgpu::CompareFunction> for CompareFunction {
    fn from(function: wgpu::CompareFunction) -> Self {
        match function {
            wgpu::CompareFunction::Never => CompareFunction::Never,
            wgpu::CompareFunction::Less => CompareFunction::Less,
            wgpu::CompareFunction::Equal => CompareFunction::Equal,
            wgpu::CompareFunction::LessEqual => CompareFunction::LessEqual,
            wgpu::CompareFunction::Greater => CompareFunction::Greater,
            wgpu::CompareFunction::NotEqual => CompareFunction::NotEqual,
            wgpu::CompareFunction::GreaterEqual => CompareFunction::GreaterEqual,
            wgpu::CompareFunction::Always => CompareFunction::Always,
        }
    }
}

impl CapabilityQuery for wgpu::SamplerDescriptor<'_> {
    fn responds_to(&self, property: OptionalProperty) -> bool {
        property == OptionalProperty::SamplerCompareFunction
    }
}

impl SamplerDescriptorObject for wgpu::SamplerDescriptor<'_> {
    /// A sampler without comparison reads as `Never`, the native default.
    fn compare_function(&self) -> CompareFunction {
        self.compare.map_or(CompareFunction::Never, CompareFunction::from)
    }

    fn set_compare_function(&mut self, function: CompareFunction) -> bool {
        self.compare = Some(function.into());
        true
    }
}

/// wgpu usages without a counterpart in [`TextureUsage`]; preserved on writes.
const COPY_USAGES: wgpu::TextureUsages = wgpu::TextureUsages::COPY_SRC.union(wgpu::TextureUsages::COPY_DST);

/// Usage bits a wgpu texture descriptor can carry.
const REPRESENTABLE_USAGE: u32 = TextureUsage::SHADER_READ.bits()
    | TextureUsage::SHADER_WRITE.bits()
    | TextureUsage::RENDER_TARGET.bits()
    | TextureUsage::PIXEL_FORMAT_VIEW.bits();

impl CapabilityQuery for wgpu::TextureDescriptor<'_> {
    fn responds_to(&self, property: OptionalProperty) -> bool {
        property == OptionalProperty::TextureUsage
    }
}

impl TextureDescriptorObject for wgpu::TextureDescriptor<'_> {
    fn usage(&self) -> TextureUsage {
        let mut usage = TextureUsage::UNKNOWN;
        if self.usage.contains(wgpu::TextureUsages::TEXTURE_BINDING) {
            usage |= TextureUsage::SHADER_READ;
        }
        if self.usage.contains(wgpu::TextureUsages::STORAGE_BINDING) {
            usage |= TextureUsage::SHADER_WRITE;
        }
        if self.usage.contains(wgpu::TextureUsages::RENDER_ATTACHMENT) {
            usage |= TextureUsage::RENDER_TARGET;
        }
        if !self.view_formats.is_empty() {
            usage |= TextureUsage::PIXEL_FORMAT_VIEW;
        }
        usage
    }

    /// `PIXEL_FORMAT_VIEW` follows `view_formats`, which a usage write cannot
    /// change. Writes that disagree with it, or carry bits wgpu has no flag
    /// for, are refused and leave the descriptor untouched.
    fn set_usage(&mut self, usage: TextureUsage) -> bool {
        if usage.bits() & !REPRESENTABLE_USAGE != 0 {
            tracing::debug!(usage = usage.bits(), "texture usage has no wgpu equivalent");
            return false;
        }
        if usage.contains(TextureUsage::PIXEL_FORMAT_VIEW) == self.view_formats.is_empty() {
            tracing::debug!(
                usage = usage.bits(),
                view_formats = self.view_formats.len(),
                "texture usage disagrees with view formats"
            );
            return false;
        }

        let mut native = self.usage & COPY_USAGES;
        if usage.contains(TextureUsage::SHADER_READ) {
            native |= wgpu::TextureUsages::TEXTURE_BINDING;
        }
        if usage.contains(TextureUsage::SHADER_WRITE) {
            native |= wgpu::TextureUsages::STORAGE_BINDING;
        }
        if usage.contains(TextureUsage::RENDER_TARGET) {
            native |= wgpu::TextureUsages::RENDER_ATTACHMENT;
        }
        self.usage = native;
        true
    }

    // Unreachable through the shim: storage mode is never reported as supported.
    fn storage_mode(&self) -> StorageMode {
        StorageMode::Shared
    }

    fn set_storage_mode(&mut self, _mode: StorageMode) -> bool {
        false
    }
}
