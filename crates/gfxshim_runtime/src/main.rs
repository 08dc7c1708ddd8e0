//! GfxShim Probe
//!
//! Reports what the shim layer sees on this machine: platform version, clock
//! calibration, and the populated properties of every graphics adapter.

mod settings;

use std::path::Path;

use anyhow::Result;
use gfxshim_metrics::{clock, PerformanceStatistics};
use gfxshim_render::{populate_device_properties_with, wgpu, AdapterDevice, GpuDevice};
use tracing_subscriber::EnvFilter;

use settings::ProbeSettings;

fn main() -> Result<()> {
    // Pin the epoch before anything else measures against it
    clock::epoch();

    let settings = match std::env::args().nth(1) {
        Some(path) => ProbeSettings::load(Path::new(&path))?,
        None => ProbeSettings::default(),
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let version = gfxshim_env::platform_version();
    tracing::info!(%version, encoded = version.encoded(), "platform");
    tracing::info!(period_ns = clock::tick_period_nanoseconds(), "monotonic clock");

    let mut stats = PerformanceStatistics::new();
    let start = clock::now();

    let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..Default::default()
    });

    let preferred = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
        power_preference: settings.power_preference.into(),
        compatible_surface: None,
        force_fallback_adapter: false,
    }))
    .map(|adapter| adapter.get_info());

    let adapters = instance.enumerate_adapters(wgpu::Backends::all());
    if adapters.is_empty() {
        tracing::warn!("no graphics adapters found");
    }

    let mut populated = 0usize;
    for adapter in &adapters {
        let device = AdapterDevice::from_adapter(adapter);
        let is_preferred = preferred.as_ref().is_some_and(|info| {
            info.name == device.info().name && info.backend == device.info().backend && info.device == device.info().device
        });

        match populate_device_properties_with(&device, &settings.working_set) {
            Ok(props) => {
                populated += 1;
                tracing::info!(
                    name = %props.device_name,
                    backend = ?props.backend,
                    device_type = ?props.device_type,
                    vendor_id = %format!("{:#06x}", props.vendor_id),
                    device_id = %format!("{:#06x}", props.device_id),
                    max_texture_2d = props.limits.max_texture_dimension_2d,
                    working_set_mib = props.working_set_size / (1024 * 1024),
                    memory_class = ?props.memory_size_class,
                    preferred = is_preferred,
                    "adapter"
                );
            }
            Err(err) => {
                tracing::warn!(name = ?device.name(), %err, "skipping adapter");
            }
        }
    }

    let elapsed_ms = stats.track("adapter_enumeration", start);
    tracing::info!(
        adapters = adapters.len(),
        populated,
        elapsed_ms,
        since_launch_ms = clock::elapsed_milliseconds(clock::Timestamp::ZERO, clock::Timestamp::ZERO),
        "probe complete"
    );

    Ok(())
}
