//! Device identity, limits and memory budget
//!
//! [`populate_device_properties`] is called once per device at enumeration
//! time. It either returns a complete [`DeviceProperties`] or an error; a
//! partially resolved record is never handed out.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::BackendType;

const MEBI: u64 = 1024 * 1024;
const GIBI: u64 = 1024 * MEBI;

/// Physical type of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceType {
    IntegratedGpu,
    DiscreteGpu,
    VirtualGpu,
    Cpu,
    Other,
}

/// Resource limits reported by a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeviceLimits {
    pub max_texture_dimension_1d: u32,
    pub max_texture_dimension_2d: u32,
    pub max_texture_dimension_3d: u32,
    pub max_texture_array_layers: u32,
    pub max_bind_groups: u32,
    pub max_uniform_buffer_binding_size: u32,
    pub max_storage_buffer_binding_size: u32,
    pub max_vertex_buffers: u32,
    pub max_vertex_attributes: u32,
    pub max_compute_invocations_per_workgroup: u32,
    pub max_compute_workgroup_size: [u32; 3],
}

impl DeviceLimits {
    /// Checks the limits every device must report as non-zero. Storage buffer
    /// and compute limits may legitimately be zero on devices without compute.
    pub fn validate(&self) -> Result<(), DeviceInfoError> {
        let required = [
            ("max_texture_dimension_1d", self.max_texture_dimension_1d),
            ("max_texture_dimension_2d", self.max_texture_dimension_2d),
            ("max_texture_dimension_3d", self.max_texture_dimension_3d),
            ("max_texture_array_layers", self.max_texture_array_layers),
            ("max_bind_groups", self.max_bind_groups),
            ("max_uniform_buffer_binding_size", self.max_uniform_buffer_binding_size),
            ("max_vertex_buffers", self.max_vertex_buffers),
            ("max_vertex_attributes", self.max_vertex_attributes),
        ];

        match required.iter().find(|(_, value)| *value == 0) {
            Some(&(name, _)) => Err(DeviceInfoError::InvalidLimit { name }),
            None => Ok(()),
        }
    }
}

/// Coarse bucket of the usable working set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MemorySizeClass {
    /// Under 1 GiB
    Small,
    /// 1 GiB up to 4 GiB
    Medium,
    /// 4 GiB and above
    Large,
}

impl MemorySizeClass {
    pub fn from_bytes(bytes: u64) -> Self {
        if bytes < GIBI {
            MemorySizeClass::Small
        } else if bytes < 4 * GIBI {
            MemorySizeClass::Medium
        } else {
            MemorySizeClass::Large
        }
    }
}

/// Live device handle, as seen by the populator. `None` means the driver
/// could not resolve the field.
pub trait GpuDevice {
    fn name(&self) -> Option<String>;
    fn vendor_id(&self) -> Option<u32>;
    fn device_id(&self) -> Option<u32>;
    fn device_type(&self) -> DeviceType;
    fn limits(&self) -> Option<DeviceLimits>;
    /// Total device memory in bytes.
    fn total_memory(&self) -> Option<u64>;
    /// Driver's own estimate of usable memory in bytes.
    fn recommended_working_set_size(&self) -> Option<u64>;

    fn backend(&self) -> BackendType {
        BackendType::Unknown
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeviceInfoError {
    #[error("device name could not be resolved")]
    MissingName,

    #[error("device vendor id could not be resolved")]
    MissingVendorId,

    #[error("device id could not be resolved")]
    MissingDeviceId,

    #[error("device limits could not be resolved")]
    MissingLimits,

    #[error("device reports zero for required limit '{name}'")]
    InvalidLimit { name: &'static str },
}

/// How to estimate usable memory when the driver gives no recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkingSetPolicy {
    /// Share of total device memory to use when only the total is known.
    pub fallback_fraction: f64,
    /// Bytes to assume when the device reports no memory sizes at all.
    pub fallback_bytes: u64,
}

impl WorkingSetPolicy {
    pub const DEFAULT_FRACTION: f64 = 0.5;
    pub const DEFAULT_BYTES: u64 = 128 * MEBI;

    /// Driver recommendation if present, else a fraction of total memory (never
    /// more than the total), else the fixed fallback.
    pub fn estimate<D: GpuDevice + ?Sized>(&self, device: &D) -> u64 {
        if let Some(recommended) = device.recommended_working_set_size() {
            return recommended;
        }

        if let Some(total) = device.total_memory() {
            let fraction = if self.fallback_fraction.is_finite() {
                self.fallback_fraction.clamp(0.0, 1.0)
            } else {
                Self::DEFAULT_FRACTION
            };
            return ((total as f64 * fraction) as u64).min(total);
        }

        self.fallback_bytes
    }
}

impl Default for WorkingSetPolicy {
    fn default() -> Self {
        Self {
            fallback_fraction: Self::DEFAULT_FRACTION,
            fallback_bytes: Self::DEFAULT_BYTES,
        }
    }
}

/// Usable working-set estimate in bytes, using the default policy.
pub fn recommended_working_set_size<D: GpuDevice + ?Sized>(device: &D) -> u64 {
    WorkingSetPolicy::default().estimate(device)
}

/// Fully resolved description of one device.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceProperties {
    pub backend: BackendType,
    pub vendor_id: u32,
    pub device_id: u32,
    pub device_type: DeviceType,
    pub device_name: String,
    pub limits: DeviceLimits,
    pub working_set_size: u64,
    pub memory_size_class: MemorySizeClass,
    pub pipeline_cache_uuid: [u8; 16],
}

pub fn populate_device_properties<D: GpuDevice + ?Sized>(device: &D) -> Result<DeviceProperties, DeviceInfoError> {
    populate_device_properties_with(device, &WorkingSetPolicy::default())
}

pub fn populate_device_properties_with<D: GpuDevice + ?Sized>(
    device: &D,
    policy: &WorkingSetPolicy,
) -> Result<DeviceProperties, DeviceInfoError> {
    let result = resolve(device, policy);
    match &result {
        Ok(props) => tracing::debug!(
            name = %props.device_name,
            vendor_id = %format!("{:#06x}", props.vendor_id),
            device_id = %format!("{:#06x}", props.device_id),
            working_set = props.working_set_size,
            "populated device properties"
        ),
        Err(err) => tracing::warn!(%err, "device properties unavailable"),
    }
    result
}

fn resolve<D: GpuDevice + ?Sized>(device: &D, policy: &WorkingSetPolicy) -> Result<DeviceProperties, DeviceInfoError> {
    let device_name = device
        .name()
        .filter(|name| !name.trim().is_empty())
        .ok_or(DeviceInfoError::MissingName)?;
    let vendor_id = device.vendor_id().ok_or(DeviceInfoError::MissingVendorId)?;
    let device_id = device.device_id().ok_or(DeviceInfoError::MissingDeviceId)?;
    let limits = device.limits().ok_or(DeviceInfoError::MissingLimits)?;
    limits.validate()?;

    let working_set_size = policy.estimate(device);

    Ok(DeviceProperties {
        backend: device.backend(),
        vendor_id,
        device_id,
        device_type: device.device_type(),
        device_name,
        limits,
        working_set_size,
        memory_size_class: MemorySizeClass::from_bytes(working_set_size),
        pipeline_cache_uuid: pipeline_cache_uuid(vendor_id, device_id),
    })
}

/// Identifies pipeline caches built by this library version, on this OS
/// version, for this device. Any change invalidates previously saved caches.
fn pipeline_cache_uuid(vendor_id: u32, device_id: u32) -> [u8; 16] {
    let library = gfxshim_env::PlatformVersion::parse_lenient(env!("CARGO_PKG_VERSION"))
        .unwrap_or(gfxshim_env::PlatformVersion::MINIMUM);
    let library_packed = library.major * 10_000 + library.minor * 100 + library.patch;
    let os_packed = (gfxshim_env::platform_version_encoded() * 10_000.0).round() as u32;

    let mut uuid = [0u8; 16];
    uuid[0..4].copy_from_slice(&library_packed.to_be_bytes());
    uuid[4..8].copy_from_slice(&os_packed.to_be_bytes());
    uuid[8..12].copy_from_slice(&vendor_id.to_be_bytes());
    uuid[12..16].copy_from_slice(&device_id.to_be_bytes());
    uuid
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone)]
    struct MockDevice {
        name: Option<String>,
        vendor_id: Option<u32>,
        device_id: Option<u32>,
        limits: Option<DeviceLimits>,
        total_memory: Option<u64>,
        recommended: Option<u64>,
    }

    fn limits() -> DeviceLimits {
        DeviceLimits {
            max_texture_dimension_1d: 16384,
            max_texture_dimension_2d: 16384,
            max_texture_dimension_3d: 2048,
            max_texture_array_layers: 2048,
            max_bind_groups: 4,
            max_uniform_buffer_binding_size: 64 * 1024,
            max_storage_buffer_binding_size: 128 * 1024 * 1024,
            max_vertex_buffers: 8,
            max_vertex_attributes: 16,
            max_compute_invocations_per_workgroup: 1024,
            max_compute_workgroup_size: [1024, 1024, 64],
        }
    }

    fn well_formed() -> MockDevice {
        MockDevice {
            name: Some("Mock GPU".to_string()),
            vendor_id: Some(0x106b),
            device_id: Some(0xa070),
            limits: Some(limits()),
            total_memory: None,
            recommended: None,
        }
    }

    impl GpuDevice for MockDevice {
        fn name(&self) -> Option<String> { self.name.clone() }
        fn vendor_id(&self) -> Option<u32> { self.vendor_id }
        fn device_id(&self) -> Option<u32> { self.device_id }
        fn device_type(&self) -> DeviceType { DeviceType::IntegratedGpu }
        fn limits(&self) -> Option<DeviceLimits> { self.limits }
        fn total_memory(&self) -> Option<u64> { self.total_memory }
        fn recommended_working_set_size(&self) -> Option<u64> { self.recommended }
    }

    #[test]
    fn prefers_driver_recommendation() {
        let device = MockDevice {
            total_memory: Some(16 * GIBI),
            recommended: Some(12 * GIBI),
            ..well_formed()
        };
        assert_eq!(recommended_working_set_size(&device), 12 * GIBI);
    }

    #[test]
    fn falls_back_to_fraction_of_total() {
        let device = MockDevice { total_memory: Some(8 * GIBI), ..well_formed() };
        let estimate = recommended_working_set_size(&device);

        assert_eq!(estimate, 4 * GIBI);
        assert!(estimate <= 8 * GIBI);
    }

    #[test]
    fn falls_back_to_constant_without_reports() {
        assert_eq!(recommended_working_set_size(&well_formed()), 128 * MEBI);
    }

    #[test]
    fn policy_never_exceeds_total() {
        let device = MockDevice { total_memory: Some(2 * GIBI), ..well_formed() };
        let greedy = WorkingSetPolicy { fallback_fraction: 3.0, ..WorkingSetPolicy::default() };
        let broken = WorkingSetPolicy { fallback_fraction: f64::NAN, ..WorkingSetPolicy::default() };

        assert_eq!(greedy.estimate(&device), 2 * GIBI);
        assert_eq!(broken.estimate(&device), GIBI);
    }

    #[test]
    fn policy_deserializes_with_defaults() {
        let policy: WorkingSetPolicy = serde_json::from_str(r#"{ "fallback_fraction": 0.25 }"#).unwrap();
        assert_eq!(policy.fallback_fraction, 0.25);
        assert_eq!(policy.fallback_bytes, WorkingSetPolicy::DEFAULT_BYTES);
    }

    #[test]
    fn populates_well_formed_device() {
        let device = MockDevice { total_memory: Some(6 * GIBI), ..well_formed() };
        let props = populate_device_properties(&device).unwrap();

        assert_eq!(props.device_name, "Mock GPU");
        assert_eq!(props.vendor_id, 0x106b);
        assert_eq!(props.device_id, 0xa070);
        assert_eq!(props.device_type, DeviceType::IntegratedGpu);
        assert_eq!(props.backend, BackendType::Unknown);
        assert_eq!(props.limits, limits());
        assert_eq!(props.working_set_size, 3 * GIBI);
        assert!(props.working_set_size <= 6 * GIBI);
        assert_eq!(props.memory_size_class, MemorySizeClass::Medium);
        assert_eq!(&props.pipeline_cache_uuid[8..12], &0x106bu32.to_be_bytes());
        assert_eq!(&props.pipeline_cache_uuid[12..16], &0xa070u32.to_be_bytes());
    }

    #[test]
    fn device_without_memory_reports_still_populates() {
        let props = populate_device_properties(&well_formed()).unwrap();
        assert_eq!(props.working_set_size, WorkingSetPolicy::DEFAULT_BYTES);
        assert_eq!(props.memory_size_class, MemorySizeClass::Small);
    }

    #[test]
    fn unresolvable_fields_fail_the_whole_record() {
        let cases = [
            (MockDevice { name: None, ..well_formed() }, DeviceInfoError::MissingName),
            (MockDevice { name: Some("  ".into()), ..well_formed() }, DeviceInfoError::MissingName),
            (MockDevice { vendor_id: None, ..well_formed() }, DeviceInfoError::MissingVendorId),
            (MockDevice { device_id: None, ..well_formed() }, DeviceInfoError::MissingDeviceId),
            (MockDevice { limits: None, ..well_formed() }, DeviceInfoError::MissingLimits),
        ];

        for (device, expected) in cases {
            assert_eq!(populate_device_properties(&device), Err(expected));
        }
    }

    #[test]
    fn zero_required_limit_is_rejected() {
        let mut bad = limits();
        bad.max_bind_groups = 0;
        let device = MockDevice { limits: Some(bad), ..well_formed() };

        assert_eq!(
            populate_device_properties(&device),
            Err(DeviceInfoError::InvalidLimit { name: "max_bind_groups" })
        );
    }

    #[test]
    fn compute_limits_may_be_zero() {
        let mut no_compute = limits();
        no_compute.max_storage_buffer_binding_size = 0;
        no_compute.max_compute_invocations_per_workgroup = 0;
        no_compute.max_compute_workgroup_size = [0, 0, 0];

        assert!(no_compute.validate().is_ok());
    }

    #[test]
    fn size_classes() {
        assert_eq!(MemorySizeClass::from_bytes(512 * MEBI), MemorySizeClass::Small);
        assert_eq!(MemorySizeClass::from_bytes(GIBI), MemorySizeClass::Medium);
        assert_eq!(MemorySizeClass::from_bytes(4 * GIBI), MemorySizeClass::Large);
    }
}
