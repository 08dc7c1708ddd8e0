//! GfxShim Render
//!
//! Version-independent access to optional driver properties, plus device
//! identity and memory queries.
//!
//! Every shimmed accessor asks the live object whether it implements the
//! property, then either delegates or substitutes a fixed default:
//!
//! | property             | default when unsupported |
//! |----------------------|--------------------------|
//! | texture usage        | `TextureUsage::UNKNOWN`  |
//! | texture storage mode | `StorageMode::Shared`    |
//! | sampler compare      | `CompareFunction::Always`|
//! | layer display sync   | `true`                   |
//!
//! Writes to unsupported properties do nothing and return `false`.

pub mod backend;
pub mod capability;
pub mod device;
pub mod layer;
pub mod sampler;
pub mod texture;
pub mod types;
pub mod window;

pub use wgpu;
pub use winit;

pub use backend::AdapterDevice;
pub use capability::{CapabilityQuery, OptionalProperty};
pub use device::{
    populate_device_properties, populate_device_properties_with, recommended_working_set_size, DeviceInfoError,
    DeviceLimits, DeviceProperties, DeviceType, GpuDevice, MemorySizeClass, WorkingSetPolicy,
};
pub use layer::{LayerObject, LayerShim};
pub use sampler::{SamplerDescriptorObject, SamplerDescriptorShim};
pub use texture::{TextureDescriptorObject, TextureDescriptorShim};
pub use types::{CompareFunction, Rect, Size, StorageMode, TextureUsage};
pub use window::SurfaceLayer;

/// Native graphics API behind a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendType {
    /// Metal (macOS, iOS)
    Metal,
    /// DirectX 12 (Windows)
    DirectX12,
    /// Vulkan (cross-platform)
    Vulkan,
    /// OpenGL / GLES (cross-platform, fallback)
    OpenGL,
    /// WebGPU (browser)
    WebGpu,
    /// No native API could be identified
    Unknown,
}
